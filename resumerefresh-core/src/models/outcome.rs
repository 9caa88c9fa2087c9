//! Per-provider outcomes and the aggregate run report.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ErrorKind, RefreshError};

// ============================================================================
// Pipeline Outcome
// ============================================================================

/// Result of running one provider pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Provider name.
    pub provider: String,
    /// `Ok` if every step succeeded, otherwise the failing step's error.
    pub result: Result<(), RefreshError>,
    /// How long the pipeline took.
    pub duration: Duration,
}

impl PipelineOutcome {
    /// Creates a successful outcome.
    pub fn success(provider: impl Into<String>, duration: Duration) -> Self {
        Self {
            provider: provider.into(),
            result: Ok(()),
            duration,
        }
    }

    /// Creates a failed outcome.
    pub fn failure(provider: impl Into<String>, error: RefreshError, duration: Duration) -> Self {
        Self {
            provider: provider.into(),
            result: Err(error),
            duration,
        }
    }

    /// Returns true if the pipeline succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the error if the pipeline failed.
    pub fn error(&self) -> Option<&RefreshError> {
        self.result.as_ref().err()
    }

    /// Returns a serializable view of this outcome.
    pub fn to_record(&self) -> OutcomeRecord {
        let error = self.error();
        OutcomeRecord {
            provider: self.provider.clone(),
            success: self.is_success(),
            error_kind: error.map(RefreshError::kind),
            step: error.and_then(|e| e.origin()).map(|(_, step)| step.to_string()),
            error: error.map(|e| e.root().to_string()),
            duration_ms: u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Flat, serializable form of a [`PipelineOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    /// Provider name.
    pub provider: String,
    /// Whether the pipeline succeeded.
    pub success: bool,
    /// Kind of the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Step that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}

// ============================================================================
// Run Report
// ============================================================================

/// Aggregate of every provider outcome in one run, in run order.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Total duration of the run.
    pub duration: Duration,
    /// Outcomes in the order the pipelines ran.
    pub outcomes: Vec<PipelineOutcome>,
}

impl RunReport {
    /// Creates a report from collected outcomes.
    pub fn new(started_at: DateTime<Utc>, duration: Duration, outcomes: Vec<PipelineOutcome>) -> Self {
        Self {
            started_at,
            duration,
            outcomes,
        }
    }

    /// Returns true if every provider succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(PipelineOutcome::is_success)
    }

    /// Returns the successful outcomes.
    pub fn successes(&self) -> Vec<&PipelineOutcome> {
        self.outcomes.iter().filter(|o| o.is_success()).collect()
    }

    /// Returns the failed outcomes.
    pub fn failures(&self) -> Vec<&PipelineOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success()).collect()
    }

    /// Returns the outcome for a provider, if it ran.
    pub fn outcome(&self, provider: &str) -> Option<&PipelineOutcome> {
        self.outcomes.iter().find(|o| o.provider == provider)
    }

    /// One-line summary naming every failing provider.
    pub fn summary(&self) -> String {
        let total = self.outcomes.len();
        let failures = self.failures();
        if failures.is_empty() {
            return format!("Refreshed resume on {total} of {total} providers");
        }

        let details = failures
            .iter()
            .filter_map(|o| {
                o.error()
                    .map(|e| format!("{} ({}: {})", o.provider, e.kind(), e.root()))
            })
            .collect::<Vec<_>>()
            .join("; ");

        format!(
            "Refreshed resume on {} of {total} providers; failed: {details}",
            total - failures.len()
        )
    }

    /// Returns serializable records for every outcome.
    pub fn records(&self) -> Vec<OutcomeRecord> {
        self.outcomes.iter().map(PipelineOutcome::to_record).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
