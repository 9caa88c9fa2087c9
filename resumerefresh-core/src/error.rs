//! Core error types for `ResumeRefresh`.
//!
//! Every failure a refresh can produce is one of four kinds. Errors leaving a
//! pipeline step are tagged with the provider and step they came from; the
//! tag never hides the original kind.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters of fetched content kept in an extraction error.
pub const SAMPLE_LIMIT: usize = 200;

// ============================================================================
// Error Kind
// ============================================================================

/// The closed set of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid configuration.
    Configuration,
    /// Network failure or unexpected HTTP status.
    Transport,
    /// A token pattern did not match fetched content.
    Extraction,
    /// The upstream answered successfully but the body reports a failure.
    UpstreamSemantic,
}

impl ErrorKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration",
            Self::Transport => "Transport",
            Self::Extraction => "Extraction",
            Self::UpstreamSemantic => "UpstreamSemantic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Refresh Error
// ============================================================================

/// Error type for refresh operations.
///
/// `Clone` so a memoized step can hand the same failure to every consumer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// Missing/blank credentials, resume settings, or other invalid input.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection failure or a non-success status without a structured body.
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },

    /// A fixed pattern failed to match fetched content.
    #[error("Extraction failed: pattern `{pattern}` did not match (sample: {sample:?})")]
    Extraction {
        /// Source text of the pattern.
        pattern: String,
        /// Truncated sample of the searched text.
        sample: String,
    },

    /// The request succeeded at the transport level but the body reports failure.
    #[error("Upstream reported failure: {0}")]
    UpstreamSemantic(String),

    /// An error tagged with the provider and step that produced it.
    #[error("{provider} step `{step}` failed: {source}")]
    Step {
        /// Provider name.
        provider: String,
        /// Step name.
        step: String,
        /// The untagged error.
        source: Box<RefreshError>,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl RefreshError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a transport error without an HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a transport error for an unexpected HTTP status.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an extraction error, keeping a truncated sample of `text`.
    pub fn extraction(pattern: impl Into<String>, text: &str) -> Self {
        Self::Extraction {
            pattern: pattern.into(),
            sample: truncate_sample(text, SAMPLE_LIMIT),
        }
    }

    /// Creates an upstream semantic error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamSemantic(message.into())
    }

    /// Tags this error with the provider and step that produced it.
    ///
    /// An error that already carries a tag is returned unchanged, so a
    /// failure replayed through a dependent step still names its origin.
    #[must_use]
    pub fn in_step(self, provider: impl Into<String>, step: impl Into<String>) -> Self {
        match self {
            tagged @ Self::Step { .. } => tagged,
            other => Self::Step {
                provider: provider.into(),
                step: step.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the untagged error.
    pub fn root(&self) -> &RefreshError {
        match self {
            Self::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the kind of the untagged error.
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Extraction { .. } => ErrorKind::Extraction,
            Self::UpstreamSemantic(_) => ErrorKind::UpstreamSemantic,
            Self::Step { .. } => unreachable!("root() never returns a tagged error"),
        }
    }

    /// Returns `(provider, step)` if this error is tagged.
    pub fn origin(&self) -> Option<(&str, &str)> {
        match self {
            Self::Step { provider, step, .. } => Some((provider, step)),
            _ => None,
        }
    }

    /// Returns the HTTP status of a transport error, if any.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

impl From<serde_json::Error> for RefreshError {
    fn from(err: serde_json::Error) -> Self {
        Self::upstream(format!("malformed response body: {err}"))
    }
}

/// Truncates `text` to at most `limit` characters, marking the cut.
pub fn truncate_sample(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_step_preserves_kind() {
        let err = RefreshError::http_status(503, "Service Unavailable").in_step("naukri", "login");

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.origin(), Some(("naukri", "login")));
        assert_eq!(
            err.root(),
            &RefreshError::http_status(503, "Service Unavailable")
        );
    }

    #[test]
    fn test_in_step_does_not_rewrap() {
        let original = RefreshError::transport("connection reset").in_step("monster", "client_id");
        let replayed = original.clone().in_step("monster", "login");

        assert_eq!(replayed, original);
        assert_eq!(replayed.origin(), Some(("monster", "client_id")));
    }

    #[test]
    fn test_extraction_sample_truncated() {
        let text = "x".repeat(500);
        let err = RefreshError::extraction("client_id=\"([^\"]+)\"", &text);

        match err {
            RefreshError::Extraction { pattern, sample } => {
                assert_eq!(pattern, "client_id=\"([^\"]+)\"");
                assert_eq!(sample.chars().count(), SAMPLE_LIMIT + 1);
                assert!(sample.ends_with('…'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_sample_multibyte() {
        assert_eq!(truncate_sample("héllo", 2), "hé…");
        assert_eq!(truncate_sample("short", 10), "short");
    }

    #[test]
    fn test_display_includes_status_and_origin() {
        let err = RefreshError::http_status(401, "Unauthorized").in_step("instahyre", "login");
        let text = err.to_string();
        assert!(text.contains("instahyre"));
        assert!(text.contains("`login`"));
        assert!(text.contains("HTTP 401"));
    }

    #[test]
    fn test_json_error_is_upstream() {
        let err: RefreshError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::UpstreamSemantic);
    }
}
