//! Runs every enabled refresher and aggregates the outcomes.
//!
//! Refreshers run one at a time, lowest priority number first. A failing
//! provider never stops the ones after it.

use std::time::Instant;

use chrono::Utc;
use resumerefresh_core::{PipelineOutcome, RefreshError, RunReport};
use tracing::{error, info, instrument, warn};

use crate::context::RefreshContext;
use crate::error::RunError;
use crate::refresher::{RefresherInfo, ResumeRefresher};

/// Message for a run with nothing to do.
pub const NO_PROVIDERS_ENABLED: &str = "No resume refreshers are enabled; set a username and \
     password for at least one provider (e.g. APP_NAUKRI_USERNAME and APP_NAUKRI_PASSWORD)";

// ============================================================================
// Orchestrator
// ============================================================================

/// An ordered list of refreshers.
pub struct Orchestrator {
    refreshers: Vec<Box<dyn ResumeRefresher>>,
}

impl Orchestrator {
    /// Creates an orchestrator; refreshers are sorted by priority, ties
    /// keeping the given order.
    pub fn new(mut refreshers: Vec<Box<dyn ResumeRefresher>>) -> Self {
        refreshers.sort_by_key(|r| r.priority());
        Self { refreshers }
    }

    /// Returns the number of refreshers.
    pub fn len(&self) -> usize {
        self.refreshers.len()
    }

    /// Returns true if there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.refreshers.is_empty()
    }

    /// Refreshers in run order.
    pub fn plan(&self) -> Vec<RefresherInfo> {
        self.refreshers
            .iter()
            .map(|r| RefresherInfo::from_refresher(r.as_ref()))
            .collect()
    }

    /// Runs every refresher in order.
    ///
    /// Returns the report if all succeeded, [`RunError::Failed`] with the
    /// full report otherwise, and [`RunError::Configuration`] without running
    /// anything when there are no refreshers.
    #[instrument(skip_all, fields(providers = self.refreshers.len()))]
    pub async fn run(&self, ctx: &RefreshContext) -> Result<RunReport, RunError> {
        if self.refreshers.is_empty() {
            error!("{NO_PROVIDERS_ENABLED}");
            return Err(RunError::Configuration(RefreshError::config(
                NO_PROVIDERS_ENABLED,
            )));
        }

        let started_at = Utc::now();
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(self.refreshers.len());

        for refresher in &self.refreshers {
            let provider = refresher.name();
            info!(provider, priority = refresher.priority(), "Refreshing resume");

            let attempt_start = Instant::now();
            let result = refresher.refresh(ctx).await;
            let duration = attempt_start.elapsed();

            match result {
                Ok(()) => {
                    info!(provider, duration = ?duration, "Resume refreshed");
                    outcomes.push(PipelineOutcome::success(provider, duration));
                }
                Err(err) => {
                    warn!(
                        provider,
                        kind = %err.kind(),
                        error = %err,
                        duration = ?duration,
                        "Resume refresh failed"
                    );
                    outcomes.push(PipelineOutcome::failure(provider, err, duration));
                }
            }
        }

        let report = RunReport::new(started_at, start.elapsed(), outcomes);
        if report.is_success() {
            info!(summary = %report.summary(), "Run complete");
            Ok(report)
        } else {
            error!(summary = %report.summary(), "Run finished with failures");
            Err(RunError::Failed(report))
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("plan", &self.plan())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
