//! Dashboard page and form actions.
//!
//! Each handler resolves the caller's `Session` from the cookie (creating
//! one on first visit), locks it, runs the matching service action against
//! it and re-renders the page with the resulting notice.

use axum::extract::{Form, State};
use axum::response::Html;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::info;

use crate::backend::types::{Brief, DEFAULT_DEPTH};
use crate::services::dashboard::{self as svc, BackendStatus, Notice};
use crate::session::{Session, SessionHandle};
use crate::state::AppState;
use crate::view::{PageModel, render_dashboard};

pub(crate) const COOKIE_NAME: &str = "autogen_session";

// =============================================================================
// SESSION PLUMBING
// =============================================================================

/// A resolved session handle plus the cookie jar to send back.
struct ActiveSession {
    handle: SessionHandle,
    jar: CookieJar,
}

/// Look up the caller's session, creating one (and its cookie) when the
/// cookie is missing or names a session this process does not know.
async fn resolve_session(state: &AppState, jar: CookieJar) -> ActiveSession {
    if let Some(id) = jar.get(COOKIE_NAME).map(|c| c.value().to_owned()) {
        if let Some(handle) = state.sessions.get(&id).await {
            return ActiveSession { handle, jar };
        }
    }

    let session = Session::for_config(&state.config);
    let dev_bypass = session.is_dev_bypass();
    let (id, handle) = state.sessions.create(session).await;
    let sessions = state.sessions.len().await;
    info!(dev_bypass, sessions, "session created");

    let cookie = Cookie::build((COOKIE_NAME, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure);
    ActiveSession { handle, jar: jar.add(cookie) }
}

/// Load history into `session` and render the page.
async fn render(
    state: &AppState,
    session: &mut Session,
    status: BackendStatus,
    notices: &[Notice],
    brief: &str,
    depth: u8,
) -> Html<String> {
    let history = svc::load_history(state.backend.as_ref(), session, status).await;

    Html(render_dashboard(&PageModel {
        options: &state.view,
        backend_url: &state.config.backend_url,
        dev_bypass: state.config.dev_bypass_active(),
        status,
        session,
        notices,
        history: &history,
        brief,
        depth,
    }))
}

// =============================================================================
// HANDLERS
// =============================================================================
//
// Each handler holds its session lock from the action through the render,
// so requests from one browser apply one after another.

#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    brief: String,
    #[serde(default)]
    depth: Option<String>,
}

/// Depth from a form field; missing or unparsable values use the default.
pub(crate) fn parse_depth(raw: Option<&str>) -> i64 {
    raw.and_then(|d| d.trim().parse::<i64>().ok())
        .unwrap_or(i64::from(DEFAULT_DEPTH))
}

/// `GET /`: render the dashboard.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let active = resolve_session(&state, jar).await;
    let mut session = active.handle.lock().await;
    let status = svc::probe_backend(state.backend.as_ref()).await;
    let page = render(&state, &mut session, status, &[], "", DEFAULT_DEPTH).await;
    (active.jar, page)
}

/// `POST /login`: authenticate against the backend and store the token.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> (CookieJar, Html<String>) {
    let active = resolve_session(&state, jar).await;
    let mut session = active.handle.lock().await;
    let notice = svc::login(state.backend.as_ref(), &mut session, &form.email, &form.password).await;
    let status = svc::probe_backend(state.backend.as_ref()).await;
    let page = render(&state, &mut session, status, &[notice], "", DEFAULT_DEPTH).await;
    (active.jar, page)
}

/// `POST /signup`: create an account; the user logs in separately.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> (CookieJar, Html<String>) {
    let active = resolve_session(&state, jar).await;
    let mut session = active.handle.lock().await;
    let notice = svc::signup(state.backend.as_ref(), &form.email, &form.password).await;
    let status = svc::probe_backend(state.backend.as_ref()).await;
    let page = render(&state, &mut session, status, &[notice], "", DEFAULT_DEPTH).await;
    (active.jar, page)
}

/// `POST /logout`: clear token and email from the session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let active = resolve_session(&state, jar).await;
    let mut session = active.handle.lock().await;
    let notice = svc::logout(&mut session);
    let status = svc::probe_backend(state.backend.as_ref()).await;
    let page = render(&state, &mut session, status, &[notice], "", DEFAULT_DEPTH).await;
    (active.jar, page)
}

/// `POST /generate`: live generation with demo fallback.
pub async fn generate(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<GenerateForm>,
) -> (CookieJar, Html<String>) {
    let active = resolve_session(&state, jar).await;
    let mut session = active.handle.lock().await;
    let brief = Brief::new(form.brief, parse_depth(form.depth.as_deref()));
    let status = svc::probe_backend(state.backend.as_ref()).await;
    let outcome = svc::generate(
        state.backend.as_ref(),
        &state.demo,
        &mut session,
        status,
        &brief,
        state.view.require_login,
    )
    .await;
    let page = render(&state, &mut session, status, &[outcome.notice], &brief.brief, brief.depth).await;
    (active.jar, page)
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
