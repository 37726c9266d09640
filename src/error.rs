//! Error types.
//!
//! [`SyncError`] never leaves the engine: every variant is recovered where it
//! arises and only logged. [`ConfigError`] is the one error a caller sees.

use std::fmt;

use page::MatchPatternError;

// ─────────────────────────────────────────────────────────────────────────────
// SyncError
// ─────────────────────────────────────────────────────────────────────────────

/// Why one step of a sync pass could not run.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The list, a row or a label is not rendered (yet).
    NotFound(&'static str),
    /// A style value does not have the expected shape.
    UnparseableGeometry(String),
    /// An inferred row height below one pixel.
    DegenerateRowHeight(f64),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::UnparseableGeometry(value) => write!(f, "unparseable geometry `{value}`"),
            Self::DegenerateRowHeight(px) => write!(f, "degenerate row height {px}px"),
        }
    }
}

impl std::error::Error for SyncError {}

pub type SyncResult<T> = Result<T, SyncError>;

// ─────────────────────────────────────────────────────────────────────────────
// ConfigError
// ─────────────────────────────────────────────────────────────────────────────

/// Rejected configuration.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    EmptyHiddenLabels,
    EmptyMatches,
    InvalidMatch(MatchPatternError),
    EmptySectionLabel,
    EmptyMarkerAttr,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid config JSON: {err}"),
            Self::EmptyHiddenLabels => write!(f, "hidden_labels must name at least one row label"),
            Self::EmptyMatches => write!(f, "matches must contain at least one pattern"),
            Self::InvalidMatch(err) => write!(f, "{err}"),
            Self::EmptySectionLabel => write!(f, "section label must not be empty"),
            Self::EmptyMarkerAttr => write!(f, "row_height_attr must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidMatch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<MatchPatternError> for ConfigError {
    fn from(err: MatchPatternError) -> Self {
        Self::InvalidMatch(err)
    }
}
