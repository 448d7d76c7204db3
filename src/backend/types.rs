//! Backend wire types and errors.
//!
//! The generation backend owns storage and the generation algorithm; these
//! types only mirror what it sends back. Every field is optional on the wire
//! and absent fields deserialize to empty defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Section names the backend (and the demo fallback) produce.
pub const SECTION_PRD: &str = "PRD";
pub const SECTION_LANDING_PAGE: &str = "Landing Page";
pub const SECTION_FAQ: &str = "FAQ";
pub const SECTION_VIDEO_SCRIPT: &str = "Video Script";

#[cfg(test)]
pub const KNOWN_SECTIONS: [&str; 4] = [SECTION_PRD, SECTION_LANDING_PAGE, SECTION_FAQ, SECTION_VIDEO_SCRIPT];

/// Lowest and highest accepted detail level.
pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 3;
pub const DEFAULT_DEPTH: u8 = 2;

/// Maximum number of history entries shown.
pub const HISTORY_LIMIT: usize = 10;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend could not be reached (connect failure, timeout, transport).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a non-success status.
    #[error("request rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a body that could not be understood.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// Login succeeded but none of the known token fields were present.
    #[error("login response did not contain a token")]
    MissingToken,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl BackendError {
    /// Whether this failure belongs to the "backend unavailable" state rather
    /// than "request rejected".
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::HttpClientBuild(_))
    }

    /// Message shown to the user for a rejected request.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// BRIEF
// =============================================================================

/// A user-supplied product description plus the requested detail level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brief {
    pub brief: String,
    pub depth: u8,
}

impl Brief {
    /// Build a brief, clamping `depth` into `MIN_DEPTH..=MAX_DEPTH`.
    #[must_use]
    pub fn new(text: impl Into<String>, depth: i64) -> Self {
        Self { brief: text.into(), depth: clamp_depth(depth) }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.brief.trim().is_empty()
    }
}

#[must_use]
pub fn clamp_depth(depth: i64) -> u8 {
    let clamped = depth.clamp(i64::from(MIN_DEPTH), i64::from(MAX_DEPTH));
    u8::try_from(clamped).unwrap_or(DEFAULT_DEPTH)
}

// =============================================================================
// GENERATION RESULT
// =============================================================================

/// Generated documents keyed by section name, in the order the producer
/// emitted them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationResult {
    sections: Map<String, Value>,
}

impl GenerationResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.sections.insert(name.into(), Value::String(text.into()));
    }

    /// Text of a section. Non-string values are rendered as compact JSON.
    #[cfg(test)]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.sections.get(name).map(value_text)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section names in producer order.
    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// `(name, text)` pairs in producer order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, String)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), value_text(v)))
    }

    /// Build from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for anything other than a JSON object.
    pub fn from_value(value: Value) -> Result<Self, BackendError> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            other => Err(BackendError::Parse(format!("expected section object, got {}", json_kind(&other)))),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// One prior generation as reported by `GET /history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brief: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_documents")]
    pub documents: GenerationResult,
}

/// Accept strings, numbers or null where text is expected.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(value_text(&other)),
    })
}

/// Anything other than an object (including null) becomes an empty set.
fn lenient_documents<'de, D>(deserializer: D) -> Result<GenerationResult, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(GenerationResult::from_value(value).unwrap_or_default())
}

impl HistoryEntry {
    /// Brief text for display; `—` when the backend omitted it.
    #[must_use]
    pub fn display_brief(&self) -> &str {
        match self.brief.as_deref() {
            Some(b) if !b.is_empty() => b,
            _ => "—",
        }
    }

    #[must_use]
    pub fn display_created_at(&self) -> &str {
        self.created_at.as_deref().unwrap_or_default()
    }

    /// Identifier as text whether the backend sends numbers or strings.
    #[must_use]
    pub fn display_id(&self) -> String {
        value_text(&self.id)
    }
}

/// Parse a `GET /history` body. The list is kept in backend order and a
/// `null` body is an empty list.
///
/// # Errors
///
/// Returns `Parse` for invalid JSON, a non-array body or a malformed entry.
pub fn parse_history(body: &str) -> Result<Vec<HistoryEntry>, BackendError> {
    let value: Value = serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|e| BackendError::Parse(e.to_string())))
            .collect(),
        other => Err(BackendError::Parse(format!("expected history array, got {}", json_kind(&other)))),
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
