//! Client side of the external generation service.
//!
//! DESIGN
//! ======
//! The service owns storage and the generation algorithm. This module only
//! speaks its plain JSON-over-HTTP contract. `Backend` is the seam: the web
//! routes and the CLI hold an `Arc<dyn Backend>`, production wires in
//! `HttpBackend`, tests wire in a recording mock.

pub mod http;
pub mod types;

pub use http::HttpBackend;
pub use types::{BackendError, Brief, GenerationResult, HistoryEntry};

/// Operations the generation service exposes.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `GET /health`; `true` only when the service is ready for generation.
    async fn health(&self) -> bool;

    /// `POST /signup`.
    async fn signup(&self, email: &str, password: &str) -> Result<(), BackendError>;

    /// `POST /login`, returning the bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<String, BackendError>;

    /// `POST /generate`. `token` is sent as a bearer credential when present.
    async fn generate(&self, token: Option<&str>, brief: &Brief) -> Result<GenerationResult, BackendError>;

    /// `GET /history`, most recent first.
    async fn history(&self, token: Option<&str>) -> Result<Vec<HistoryEntry>, BackendError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================
