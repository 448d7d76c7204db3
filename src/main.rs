mod backend;
mod cli;
mod config;
mod demo;
mod routes;
mod services;
mod session;
mod state;
mod view;

use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), cli::CliError> {
    // A missing .env is normal; real env vars still apply.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let args = cli::Cli::parse();
    let config = config::DashboardConfig::from_env();
    cli::run(args, config).await
}
