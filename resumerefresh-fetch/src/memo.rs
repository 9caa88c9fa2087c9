//! Single-resolution asynchronous values.
//!
//! A [`Memoized`] wraps one pipeline step. The wrapped future runs the first
//! time anyone asks for the value; every other caller, concurrent or later,
//! receives a clone of that one result. Failures are replayed, never retried.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::future::BoxFuture;
use resumerefresh_core::RefreshError;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

type StepFuture<T> = BoxFuture<'static, Result<T, RefreshError>>;

/// A step result computed at most once and shared by every consumer.
///
/// Cloning is cheap and yields a handle to the same value.
pub struct Memoized<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    provider: String,
    step: &'static str,
    cell: OnceCell<Result<T, RefreshError>>,
    init: Mutex<Option<StepFuture<T>>>,
}

impl<T> Memoized<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wraps `future` as step `step` of `provider`. Nothing runs until the
    /// first [`get`](Self::get).
    pub fn new<F>(provider: impl Into<String>, step: &'static str, future: F) -> Self
    where
        F: Future<Output = Result<T, RefreshError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                provider: provider.into(),
                step,
                cell: OnceCell::new(),
                init: Mutex::new(Some(Box::pin(future))),
            }),
        }
    }

    /// Returns the step's result, running it on first use.
    ///
    /// Errors are tagged with this step unless they already carry the tag of
    /// an earlier step.
    pub async fn get(&self) -> Result<T, RefreshError> {
        self.inner.cell.get_or_init(|| self.run()).await.clone()
    }

    async fn run(&self) -> Result<T, RefreshError> {
        let provider = self.inner.provider.as_str();
        let step = self.inner.step;

        let init = {
            let mut slot = match self.inner.init.lock() {
                Ok(slot) => slot,
                Err(poisoned) => poisoned.into_inner(),
            };
            slot.take()
        };

        // The first caller was dropped mid-flight; the work is not restarted.
        let Some(init) = init else {
            warn!(provider, step, "Step abandoned before completing");
            return Err(
                RefreshError::transport("step was abandoned before completing")
                    .in_step(provider, step),
            );
        };

        debug!(provider, step, "Step started");
        let start = Instant::now();
        let result = init.await.map_err(|e| e.in_step(provider, step));
        let duration = start.elapsed();

        match &result {
            Ok(_) => info!(provider, step, duration = ?duration, "Step succeeded"),
            Err(error) => warn!(provider, step, error = %error, duration = ?duration, "Step failed"),
        }
        result
    }
}

impl<T> Clone for Memoized<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Memoized<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("provider", &self.inner.provider)
            .field("step", &self.inner.step)
            .field("resolved", &self.inner.cell.initialized())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
