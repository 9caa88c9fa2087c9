//! Fetch-layer error types.

use resumerefresh_core::{RefreshError, RunReport};
use thiserror::Error;

// ============================================================================
// Run Error
// ============================================================================

/// Why a run did not succeed.
#[derive(Debug, Error)]
pub enum RunError {
    /// Nothing could run: no provider enabled or invalid setup.
    #[error(transparent)]
    Configuration(RefreshError),

    /// Every enabled provider ran and at least one failed.
    #[error("{}", .0.summary())]
    Failed(RunReport),
}

impl RunError {
    /// Returns the report, if providers ran.
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            Self::Configuration(_) => None,
            Self::Failed(report) => Some(report),
        }
    }

    /// Returns true for configuration failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

// ============================================================================
// Transport Mapping
// ============================================================================

/// Maps a reqwest failure onto the transport error kind.
pub fn transport_error(err: &reqwest::Error) -> RefreshError {
    if let Some(status) = err.status() {
        return RefreshError::http_status(status.as_u16(), err.to_string());
    }
    if err.is_timeout() {
        return RefreshError::transport(format!("request timed out: {err}"));
    }
    if err.is_connect() {
        return RefreshError::transport(format!("connection failed: {err}"));
    }
    RefreshError::transport(err.to_string())
}
