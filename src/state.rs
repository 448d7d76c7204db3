//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed config, the view options, the backend client and the
//! session store. Per-browser data lives only in the store, keyed by the
//! session cookie.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::DashboardConfig;
use crate::demo::DemoGenerator;
use crate::session::SessionStore;
use crate::view::ViewOptions;

/// Shared application state, injected into Axum handlers via State extractor.
/// Cheap to clone; every field is Arc-backed or Copy.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub view: Arc<ViewOptions>,
    pub backend: Arc<dyn Backend>,
    pub demo: DemoGenerator,
    pub sessions: SessionStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: DashboardConfig, view: ViewOptions, backend: Arc<dyn Backend>) -> Self {
        let demo = DemoGenerator::new(config.demo_delay());
        let sessions = SessionStore::new(config.session_idle(), config.max_sessions);
        Self { config: Arc::new(config), view: Arc::new(view), backend, demo, sessions }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
