//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard is a plain server-rendered page: every action is a form
//! post that performs one backend call and re-renders the page. `/healthz`
//! reports liveness of the dashboard itself, independent of the backend.

pub mod dashboard;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the dashboard router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/login", post(dashboard::login))
        .route("/signup", post(dashboard::signup))
        .route("/logout", post(dashboard::logout))
        .route("/generate", post(dashboard::generate))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
