//! Dashboard configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Values are read once at startup (after `dotenvy` has loaded an optional
//! `.env`) into a typed struct that is shared through `AppState`. Malformed
//! numeric values fall back to their defaults instead of aborting startup.

use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_GENERATE_TIMEOUT_SECS: u64 = DEFAULT_REQUEST_TIMEOUT_SECS * 4;
pub const DEFAULT_DEMO_DELAY_MS: u64 = 700;
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 8 * 60 * 60;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Token stored in the session when the developer bypass is active.
pub const DEV_BYPASS_TOKEN: &str = "DEV-BYPASS-TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub health_secs: u64,
    pub generate_secs: u64,
}

impl BackendTimeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn health(&self) -> Duration {
        Duration::from_secs(self.health_secs)
    }

    #[must_use]
    pub fn generate(&self) -> Duration {
        Duration::from_secs(self.generate_secs)
    }
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            health_secs: DEFAULT_HEALTH_TIMEOUT_SECS,
            generate_secs: DEFAULT_GENERATE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub admin_bypass: bool,
    pub admin_email: String,
    pub require_login: bool,
    pub timeouts: BackendTimeouts,
    pub demo_delay_ms: u64,
    pub port: u16,
    pub cookie_secure: bool,
    /// Sessions unused for this long are evicted.
    pub session_idle_secs: u64,
    /// Upper bound on live sessions held in memory.
    pub max_sessions: usize,
    /// Page title override for this deployment.
    pub title: Option<String>,
    /// Page caption override for this deployment.
    pub caption: Option<String>,
}

impl DashboardConfig {
    /// Build typed dashboard config from environment variables.
    ///
    /// Optional:
    /// - `BACKEND_URL`: default `http://127.0.0.1:8000`
    /// - `ADMIN_BYPASS`: developer auto-login flag, default false
    /// - `ADMIN_EMAIL`: email used by the developer auto-login
    /// - `REQUIRE_LOGIN`: gate generation behind login, default false
    /// - `REQUEST_TIMEOUT_SECS`: default 10
    /// - `HEALTH_TIMEOUT_SECS`: default 3
    /// - `GENERATE_TIMEOUT_SECS`: default 40
    /// - `DEMO_DELAY_MS`: default 700
    /// - `PORT`: default 8501
    /// - `COOKIE_SECURE`: default false
    /// - `SESSION_IDLE_SECS`: default 28800 (8 hours)
    /// - `MAX_SESSIONS`: default 10000
    /// - `DASHBOARD_TITLE`, `DASHBOARD_CAPTION`: page text overrides
    #[must_use]
    pub fn from_env() -> Self {
        let backend_url = std::env::var("BACKEND_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        let admin_email = std::env::var("ADMIN_EMAIL")
            .map(|v| v.trim().to_string())
            .unwrap_or_default();
        let timeouts = BackendTimeouts {
            request_secs: env_parse("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            health_secs: env_parse("HEALTH_TIMEOUT_SECS", DEFAULT_HEALTH_TIMEOUT_SECS),
            generate_secs: env_parse("GENERATE_TIMEOUT_SECS", DEFAULT_GENERATE_TIMEOUT_SECS),
        };

        Self {
            backend_url,
            admin_bypass: env_bool("ADMIN_BYPASS").unwrap_or(false),
            admin_email,
            require_login: env_bool("REQUIRE_LOGIN").unwrap_or(false),
            timeouts,
            demo_delay_ms: env_parse("DEMO_DELAY_MS", DEFAULT_DEMO_DELAY_MS),
            port: env_parse("PORT", DEFAULT_PORT),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
            session_idle_secs: env_parse("SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS),
            max_sessions: env_parse("MAX_SESSIONS", DEFAULT_MAX_SESSIONS),
            title: env_text("DASHBOARD_TITLE"),
            caption: env_text("DASHBOARD_CAPTION"),
        }
    }

    /// The bypass only takes effect when an admin email is configured too.
    #[must_use]
    pub fn dev_bypass_active(&self) -> bool {
        self.admin_bypass && !self.admin_email.is_empty()
    }

    #[must_use]
    pub fn demo_delay(&self) -> Duration {
        Duration::from_millis(self.demo_delay_ms)
    }

    #[must_use]
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            admin_bypass: false,
            admin_email: String::new(),
            require_login: false,
            timeouts: BackendTimeouts::default(),
            demo_delay_ms: DEFAULT_DEMO_DELAY_MS,
            port: DEFAULT_PORT,
            cookie_secure: false,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
            title: None,
            caption: None,
        }
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_text(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
