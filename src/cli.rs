//! Command-line entry points.
//!
//! `serve` runs the dashboard; the remaining commands drive the same service
//! actions from a terminal with a throwaway `Session`, printing the outcome
//! instead of rendering a page. Backend failures are reported as text and do
//! not change the exit code.

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::backend::types::{Brief, DEFAULT_DEPTH};
use crate::backend::{Backend, BackendError, HttpBackend};
use crate::config::DashboardConfig;
use crate::demo::DemoGenerator;
use crate::routes;
use crate::services::dashboard::{self as svc, HistoryView, Notice};
use crate::session::Session;
use crate::state::AppState;
use crate::view::ViewOptions;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("backend client setup failed: {0}")]
    Backend(#[from] BackendError),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "autogen", about = "AutoGen AI dashboard and backend client")]
pub struct Cli {
    /// Overrides `BACKEND_URL`.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the dashboard web server.
    Serve {
        /// Overrides `PORT`.
        #[arg(long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Client(ClientCommand),
}

/// Commands that talk to the backend once and print the outcome.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    /// Report whether the backend is reachable.
    Health,
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print the bearer token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Generate content for a brief, falling back to demo output.
    Generate {
        #[arg(long)]
        brief: String,
        #[arg(long, default_value_t = i64::from(DEFAULT_DEPTH))]
        depth: i64,
        #[arg(long, env = "AUTOGEN_TOKEN")]
        token: Option<String>,
    },
    /// Print recent generations.
    History {
        #[arg(long, env = "AUTOGEN_TOKEN")]
        token: Option<String>,
    },
}

/// Run the parsed command line against `config`.
///
/// # Errors
///
/// Returns an error if the backend client cannot be built, the server
/// cannot bind or output cannot be written.
pub async fn run(cli: Cli, mut config: DashboardConfig) -> Result<(), CliError> {
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    let http = HttpBackend::new(&config.backend_url, config.timeouts)?;
    config.backend_url = http.base_url().to_owned();
    let backend: Arc<dyn Backend> = Arc::new(http);

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config, backend).await
        }
        Command::Client(command) => {
            let mut out = std::io::stdout();
            execute(command, backend.as_ref(), &config, &mut out).await
        }
    }
}

async fn serve(config: DashboardConfig, backend: Arc<dyn Backend>) -> Result<(), CliError> {
    let addr = format!("0.0.0.0:{}", config.port);
    let backend_url = config.backend_url.clone();
    let dev_bypass = config.dev_bypass_active();
    let view = ViewOptions::for_config(&config);
    let state = AppState::new(config, view, backend);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| CliError::Bind { addr: addr.clone(), source })?;

    info!(%addr, %backend_url, dev_bypass, "autogen dashboard listening");
    axum::serve(listener, routes::app(state)).await.map_err(CliError::Serve)
}

/// Run one client command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error only if writing to `out` fails.
pub async fn execute(
    command: ClientCommand,
    backend: &dyn Backend,
    config: &DashboardConfig,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        ClientCommand::Health => {
            let status = svc::probe_backend(backend).await;
            if status.is_online() {
                writeln!(out, "Backend available: {}", config.backend_url)?;
            } else {
                writeln!(out, "Backend offline — using demo mode.")?;
            }
        }
        ClientCommand::Signup { email, password } => {
            let notice = svc::signup(backend, &email, &password).await;
            print_notice(out, &notice)?;
        }
        ClientCommand::Login { email, password } => {
            let mut session = Session::new();
            let notice = svc::login(backend, &mut session, &email, &password).await;
            print_notice(out, &notice)?;
            if let Some(token) = session.bearer() {
                writeln!(out, "{token}")?;
            }
        }
        ClientCommand::Generate { brief, depth, token } => {
            let mut session = session_with_token(config, token);
            let brief = Brief::new(brief, depth);
            let status = svc::probe_backend(backend).await;
            let demo = DemoGenerator::new(config.demo_delay());
            let outcome = svc::generate(backend, &demo, &mut session, status, &brief, false).await;
            print_notice(out, &outcome.notice)?;
            if let Some(result) = &session.last_generation {
                for (name, text) in result.sections() {
                    writeln!(out, "\n## {name}\n{text}")?;
                }
            }
        }
        ClientCommand::History { token } => {
            let mut session = session_with_token(config, token);
            let status = svc::probe_backend(backend).await;
            match svc::load_history(backend, &mut session, status).await {
                HistoryView::Entries(entries) => {
                    for entry in &entries {
                        writeln!(
                            out,
                            "{}\t{}\t{}",
                            entry.display_id(),
                            entry.display_created_at(),
                            entry.display_brief()
                        )?;
                    }
                }
                HistoryView::Empty => writeln!(out, "{}", svc::MSG_NO_HISTORY)?,
                HistoryView::Unavailable => writeln!(out, "{}", svc::MSG_HISTORY_UNAVAILABLE)?,
            }
        }
    }
    Ok(())
}

/// Session for a one-shot command: the explicit token wins over the bypass.
fn session_with_token(config: &DashboardConfig, token: Option<String>) -> Session {
    let mut session = Session::for_config(config);
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        session.token = Some(token);
    }
    session
}

fn print_notice(out: &mut dyn Write, notice: &Notice) -> std::io::Result<()> {
    writeln!(out, "[{}] {}", notice.level(), notice.message())
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
