//! The per-provider refresh contract.

use async_trait::async_trait;
use resumerefresh_core::{ProviderKind, RefreshError};
use serde::{Deserialize, Serialize};

use crate::context::RefreshContext;

/// One provider's resume refresh workflow.
///
/// ## Implementing a Refresher
///
/// ```ignore
/// struct ExampleRefresher { credentials: ProviderCredentials }
///
/// #[async_trait]
/// impl ResumeRefresher for ExampleRefresher {
///     fn kind(&self) -> ProviderKind {
///         ProviderKind::Naukri
///     }
///
///     fn priority(&self) -> u32 {
///         99
///     }
///
///     async fn refresh(&self, ctx: &RefreshContext) -> Result<(), RefreshError> {
///         let login = Memoized::new(self.name(), "login", login(ctx.http.clone(), ..));
///         GRAPH.execute(self.name(), &[("login", &login)]).await
///     }
/// }
/// ```
#[async_trait]
pub trait ResumeRefresher: Send + Sync {
    /// The provider this refresher drives.
    fn kind(&self) -> ProviderKind;

    /// Name used in logs and reports.
    fn name(&self) -> &'static str {
        self.kind().cli_name()
    }

    /// Run priority (lower runs first).
    fn priority(&self) -> u32;

    /// Runs the whole workflow. `Ok` only if every step succeeded.
    async fn refresh(&self, ctx: &RefreshContext) -> Result<(), RefreshError>;
}

/// Description of a refresher (for reporting).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefresherInfo {
    /// Provider name.
    pub name: String,
    /// Provider kind.
    pub kind: ProviderKind,
    /// Run priority.
    pub priority: u32,
}

impl RefresherInfo {
    /// Describes a refresher.
    pub fn from_refresher(refresher: &dyn ResumeRefresher) -> Self {
        Self {
            name: refresher.name().to_string(),
            kind: refresher.kind(),
            priority: refresher.priority(),
        }
    }
}
