//! Dashboard actions: login, signup, logout, generate, history.
//!
//! DESIGN
//! ======
//! Every user action maps to one function that takes the backend, any
//! settings it needs, and the caller's `Session` explicitly. Each action
//! performs at most one live backend call and reports exactly one `Notice`.
//!
//! ERROR HANDLING
//! ==============
//! Failures collapse to two user-visible states. "Backend unavailable"
//! switches generation to demo output and history to an unavailable
//! message. "Request rejected" surfaces the backend's own message inline.
//! Nothing here returns `Err`; every path leaves the session usable.

use tracing::{info, warn};

use crate::backend::Backend;
use crate::backend::types::{BackendError, Brief, HISTORY_LIMIT, HistoryEntry};
use crate::demo::DemoGenerator;
use crate::session::Session;

// =============================================================================
// TYPES
// =============================================================================

/// Reachability of the backend as seen by the last health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Online,
    Offline,
}

impl BackendStatus {
    #[must_use]
    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

/// One user-visible outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Info(m) | Self::Warning(m) | Self::Error(m) => m,
        }
    }

    /// CSS class suffix used by the view.
    #[must_use]
    pub fn level(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Info(_) => "info",
            Self::Warning(_) => "warning",
            Self::Error(_) => "error",
        }
    }
}

/// Where a generation result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Live,
    Demo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutcome {
    pub notice: Notice,
    /// `None` when validation stopped the action before generating.
    pub source: Option<GenerationSource>,
}

/// What the history column shows.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Entries(Vec<HistoryEntry>),
    Empty,
    Unavailable,
}

pub const MSG_MISSING_CREDENTIALS: &str = "Please enter email and password.";
pub const MSG_BACKEND_UNAVAILABLE: &str = "Backend unavailable.";
pub const MSG_LOGGED_IN: &str = "Logged in successfully.";
pub const MSG_ACCOUNT_CREATED: &str = "Account created. Please log in.";
pub const MSG_LOGGED_OUT: &str = "Logged out.";
pub const MSG_EMPTY_BRIEF: &str = "Please enter a brief.";
pub const MSG_LOGIN_REQUIRED: &str = "Please log in to generate.";
pub const MSG_DONE: &str = "Done!";
pub const MSG_DONE_DEMO: &str = "Done! (demo output)";
pub const MSG_NO_HISTORY: &str = "No history yet.";
pub const MSG_HISTORY_UNAVAILABLE: &str = "History unavailable (demo mode).";

// =============================================================================
// ACTIONS
// =============================================================================

/// Probe `GET /health` once.
pub async fn probe_backend(backend: &dyn Backend) -> BackendStatus {
    if backend.health().await { BackendStatus::Online } else { BackendStatus::Offline }
}

/// Log in and store the returned token in `session`.
pub async fn login(backend: &dyn Backend, session: &mut Session, email: &str, password: &str) -> Notice {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Notice::Warning(MSG_MISSING_CREDENTIALS.into());
    }
    if !backend.health().await {
        return Notice::Error(MSG_BACKEND_UNAVAILABLE.into());
    }

    match backend.login(email, password).await {
        Ok(token) if !token.is_empty() => {
            info!(email, "login succeeded");
            session.login(token, email.to_owned());
            Notice::Success(MSG_LOGGED_IN.into())
        }
        Ok(_) | Err(BackendError::MissingToken) => {
            warn!(email, "login response carried no token");
            Notice::Error("Login failed: no token in response".into())
        }
        Err(e) => {
            warn!(email, error = %e, "login failed");
            Notice::Error(failure_message("Login", &e))
        }
    }
}

/// Create an account. Does not log the user in.
pub async fn signup(backend: &dyn Backend, email: &str, password: &str) -> Notice {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Notice::Warning(MSG_MISSING_CREDENTIALS.into());
    }
    if !backend.health().await {
        return Notice::Error(MSG_BACKEND_UNAVAILABLE.into());
    }

    match backend.signup(email, password).await {
        Ok(()) => {
            info!(email, "signup succeeded");
            Notice::Success(MSG_ACCOUNT_CREATED.into())
        }
        Err(e) => {
            warn!(email, error = %e, "signup failed");
            Notice::Error(failure_message("Signup", &e))
        }
    }
}

pub fn logout(session: &mut Session) -> Notice {
    session.logout();
    Notice::Info(MSG_LOGGED_OUT.into())
}

/// Generate content for `brief`, falling back to demo output.
///
/// When `status` is offline the live backend is never called. When online,
/// any live failure is logged and replaced by demo output.
pub async fn generate(
    backend: &dyn Backend,
    demo: &DemoGenerator,
    session: &mut Session,
    status: BackendStatus,
    brief: &Brief,
    require_login: bool,
) -> GenerateOutcome {
    if brief.is_blank() {
        return GenerateOutcome { notice: Notice::Warning(MSG_EMPTY_BRIEF.into()), source: None };
    }
    if require_login && !session.is_authenticated() {
        return GenerateOutcome { notice: Notice::Warning(MSG_LOGIN_REQUIRED.into()), source: None };
    }

    let (result, source) = match status {
        BackendStatus::Online => match backend.generate(session.bearer(), brief).await {
            Ok(result) => (result, GenerationSource::Live),
            Err(e) => {
                warn!(error = %e, unavailable = e.is_unavailable(), depth = brief.depth, "live generation failed, using demo output");
                (demo.generate(brief).await, GenerationSource::Demo)
            }
        },
        BackendStatus::Offline => (demo.generate(brief).await, GenerationSource::Demo),
    };

    info!(depth = brief.depth, sections = result.len(), source = ?source, "generation complete");
    session.last_generation = Some(result);
    let notice = match source {
        GenerationSource::Live => Notice::Success(MSG_DONE.into()),
        GenerationSource::Demo => Notice::Success(MSG_DONE_DEMO.into()),
    };
    GenerateOutcome { notice, source: Some(source) }
}

/// Load the history column for `session`.
pub async fn load_history(backend: &dyn Backend, session: &mut Session, status: BackendStatus) -> HistoryView {
    if !status.is_online() {
        return HistoryView::Unavailable;
    }

    match backend.history(session.bearer()).await {
        Ok(mut entries) => {
            entries.truncate(HISTORY_LIMIT);
            session.history = Some(entries.clone());
            if entries.is_empty() { HistoryView::Empty } else { HistoryView::Entries(entries) }
        }
        Err(e) => {
            warn!(error = %e, "history load failed");
            HistoryView::Unavailable
        }
    }
}

/// `"<Action> failed: <reason>"` for rejections, `"<Action> error: <e>"` otherwise.
#[must_use]
pub fn failure_message(action: &str, err: &BackendError) -> String {
    if let BackendError::Rejected { .. } = err {
        format!("{action} failed: {}", err.user_message())
    } else {
        format!("{action} error: {err}")
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
