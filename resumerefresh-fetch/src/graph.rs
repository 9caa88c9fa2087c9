//! Declared step graphs.
//!
//! Each provider states its steps and their predecessors up front. The graph
//! is checked when built and executed layer by layer: a layer holds every
//! step whose predecessors all sit in earlier layers, its steps run
//! concurrently, and a failing layer ends the run.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::join_all;
use resumerefresh_core::RefreshError;
use thiserror::Error;
use tracing::debug;

use crate::memo::Memoized;

// ============================================================================
// Step Definitions
// ============================================================================

/// A named step and the steps it must wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDef {
    /// Step name, unique within a graph.
    pub name: &'static str,
    /// Predecessors.
    pub after: &'static [&'static str],
}

impl StepDef {
    /// A step with no predecessors.
    pub const fn root(name: &'static str) -> Self {
        Self { name, after: &[] }
    }

    /// A step that waits for `after`.
    pub const fn after(name: &'static str, after: &'static [&'static str]) -> Self {
        Self { name, after }
    }
}

/// A step the graph can drive to completion.
#[async_trait]
pub trait Step: Send + Sync {
    /// Runs the step (or waits for its existing result).
    async fn resolve(&self) -> Result<(), RefreshError>;
}

#[async_trait]
impl<T> Step for Memoized<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn resolve(&self) -> Result<(), RefreshError> {
        self.get().await.map(|_| ())
    }
}

/// Invalid graph declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two steps share a name.
    #[error("duplicate step `{0}`")]
    DuplicateStep(String),

    /// A predecessor is not declared.
    #[error("step `{step}` waits for unknown step `{predecessor}`")]
    UnknownPredecessor {
        /// The waiting step.
        step: String,
        /// The missing predecessor.
        predecessor: String,
    },

    /// The remaining steps wait on each other.
    #[error("steps form a cycle: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

impl From<GraphError> for RefreshError {
    fn from(err: GraphError) -> Self {
        RefreshError::config(format!("invalid step graph: {err}"))
    }
}

// ============================================================================
// Step Graph
// ============================================================================

/// A validated, layered step graph.
#[derive(Debug, Clone)]
pub struct StepGraph {
    steps: Vec<StepDef>,
    layers: Vec<Vec<usize>>,
}

impl StepGraph {
    /// Validates the declarations and computes the layers.
    pub fn new(steps: &[StepDef]) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if index.insert(step.name, i).is_some() {
                return Err(GraphError::DuplicateStep(step.name.to_string()));
            }
        }

        for step in steps {
            if let Some(missing) = step.after.iter().find(|p| !index.contains_key(*p)) {
                return Err(GraphError::UnknownPredecessor {
                    step: step.name.to_string(),
                    predecessor: (*missing).to_string(),
                });
            }
        }

        let mut layer_of: Vec<Option<usize>> = vec![None; steps.len()];
        let mut layers: Vec<Vec<usize>> = Vec::new();
        let mut placed = 0;

        while placed < steps.len() {
            let depth = layers.len();
            let ready: Vec<usize> = (0..steps.len())
                .filter(|&i| layer_of[i].is_none())
                .filter(|&i| {
                    steps[i]
                        .after
                        .iter()
                        .all(|p| layer_of[index[p]].is_some_and(|d| d < depth))
                })
                .collect();

            if ready.is_empty() {
                let stuck = (0..steps.len())
                    .filter(|&i| layer_of[i].is_none())
                    .map(|i| steps[i].name.to_string())
                    .collect();
                return Err(GraphError::Cycle(stuck));
            }

            for &i in &ready {
                layer_of[i] = Some(depth);
            }
            placed += ready.len();
            layers.push(ready);
        }

        Ok(Self {
            steps: steps.to_vec(),
            layers,
        })
    }

    /// Step names per layer, in declaration order within each layer.
    pub fn layers(&self) -> Vec<Vec<&'static str>> {
        self.layers
            .iter()
            .map(|layer| layer.iter().map(|&i| self.steps[i].name).collect())
            .collect()
    }

    /// Steps with no predecessors.
    pub fn roots(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .filter(|s| s.after.is_empty())
            .map(|s| s.name)
            .collect()
    }

    /// Runs every step, layer by layer.
    ///
    /// All steps of a layer are awaited even if one fails; the first failure
    /// in declaration order is returned and later layers never start.
    /// `bindings` must name every step of the graph.
    pub async fn execute(
        &self,
        provider: &str,
        bindings: &[(&'static str, &dyn Step)],
    ) -> Result<(), RefreshError> {
        let mut resolved: Vec<&dyn Step> = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let binding = bindings
                .iter()
                .find(|(name, _)| *name == step.name)
                .map(|(_, s)| *s)
                .ok_or_else(|| {
                    RefreshError::config(format!("{provider} step `{}` has no implementation", step.name))
                })?;
            resolved.push(binding);
        }

        for (depth, layer) in self.layers.iter().enumerate() {
            debug!(
                provider,
                layer = depth,
                steps = ?layer.iter().map(|&i| self.steps[i].name).collect::<Vec<_>>(),
                "Running layer"
            );

            let results = join_all(layer.iter().map(|&i| resolved[i].resolve())).await;
            if let Some(error) = results.into_iter().find_map(Result::err) {
                return Err(error);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const DIAMOND: &[StepDef] = &[
        StepDef::root("login"),
        StepDef::root("upload_key"),
        StepDef::after("identity", &["login"]),
        StepDef::after("upload", &["identity", "upload_key"]),
    ];

    #[test]
    fn test_layers() {
        let graph = StepGraph::new(DIAMOND).unwrap();
        assert_eq!(
            graph.layers(),
            vec![vec!["login", "upload_key"], vec!["identity"], vec!["upload"]]
        );
        assert_eq!(graph.roots(), vec!["login", "upload_key"]);
    }

    #[test]
    fn test_rejects_unknown_predecessor() {
        let err = StepGraph::new(&[StepDef::after("upload", &["login"])]).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownPredecessor {
                step: "upload".into(),
                predecessor: "login".into()
            }
        );
    }

    #[test]
    fn test_rejects_cycle() {
        let err = StepGraph::new(&[
            StepDef::root("a"),
            StepDef::after("b", &["c"]),
            StepDef::after("c", &["b"]),
        ])
        .unwrap_err();
        assert_eq!(err, GraphError::Cycle(vec!["b".into(), "c".into()]));
    }

    #[test]
    fn test_rejects_duplicate() {
        let err = StepGraph::new(&[StepDef::root("a"), StepDef::root("a")]).unwrap_err();
        assert_eq!(err, GraphError::DuplicateStep("a".into()));
        assert!(RefreshError::from(err).is_configuration());
    }

    fn counted(
        name: &'static str,
        counter: &Arc<AtomicUsize>,
        result: Result<(), RefreshError>,
    ) -> Memoized<()> {
        let counter = Arc::clone(counter);
        Memoized::new("test", name, async move {
            counter.fetch_add(1, Ordering::SeqCst);
            result
        })
    }

    #[tokio::test]
    async fn test_failed_root_stops_later_layers() {
        let graph = StepGraph::new(DIAMOND).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let key_calls = Arc::new(AtomicUsize::new(0));
        let later = Arc::new(AtomicUsize::new(0));

        let login = counted("login", &calls, Err(RefreshError::http_status(500, "boom")));
        let key = counted("upload_key", &key_calls, Ok(()));
        let identity = counted("identity", &later, Ok(()));
        let upload = counted("upload", &later, Ok(()));

        let err = graph
            .execute(
                "test",
                &[
                    ("login", &login),
                    ("upload_key", &key),
                    ("identity", &identity),
                    ("upload", &upload),
                ],
            )
            .await
            .unwrap_err();

        assert_eq!(err.origin(), Some(("test", "login")));
        assert_eq!(err.status(), Some(500));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The independent root still completes.
        assert_eq!(key_calls.load(Ordering::SeqCst), 1);
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_roots_run_concurrently() {
        let graph = StepGraph::new(&[StepDef::root("a"), StepDef::root("b")]).unwrap();
        let a: Memoized<()> = Memoized::new("test", "a", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        });
        let b: Memoized<()> = Memoized::new("test", "b", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        });

        let start = std::time::Instant::now();
        graph.execute("test", &[("a", &a), ("b", &b)]).await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(390));
    }

    #[tokio::test]
    async fn test_missing_binding_is_configuration_error() {
        let graph = StepGraph::new(&[StepDef::root("a")]).unwrap();
        let err = graph.execute("test", &[]).await.unwrap_err();
        assert!(err.is_configuration());
    }
}
