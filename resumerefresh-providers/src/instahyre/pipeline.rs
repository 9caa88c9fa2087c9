//! Instahyre refresh pipeline.
//!
//! ```text
//! login ──► candidate_id ──► resume_id ──► upload_resume
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use resumerefresh_core::{AppConfig, ProviderCredentials, ProviderKind, RefreshError};
use resumerefresh_fetch::{Memoized, RefreshContext, ResumeRefresher, StepDef, StepGraph};
use tracing::instrument;

use super::api::InstahyreClient;
use crate::descriptor::{Site, SiteConfig};

/// Default site.
pub const SITE: SiteConfig = SiteConfig {
    base_url: "https://www.instahyre.com",
    send_referer: true,
};

/// Logs in and captures the session cookies.
pub const LOGIN: &str = "login";
/// Reads the candidate id from the profile page.
pub const CANDIDATE_ID: &str = "candidate_id";
/// Reads the current resume id.
pub const RESUME_ID: &str = "resume_id";
/// Replaces the resume.
pub const UPLOAD_RESUME: &str = "upload_resume";

/// Declared steps.
pub const STEPS: &[StepDef] = &[
    StepDef::root(LOGIN),
    StepDef::after(CANDIDATE_ID, &[LOGIN]),
    StepDef::after(RESUME_ID, &[LOGIN, CANDIDATE_ID]),
    StepDef::after(UPLOAD_RESUME, &[LOGIN, CANDIDATE_ID, RESUME_ID]),
];

/// Refreshes the resume on Instahyre.
#[derive(Debug)]
pub struct InstahyreRefresher {
    credentials: ProviderCredentials,
    site: Site,
    priority: u32,
    graph: StepGraph,
}

impl InstahyreRefresher {
    /// Creates a refresher.
    pub fn new(
        credentials: ProviderCredentials,
        site: Site,
        priority: u32,
    ) -> Result<Self, RefreshError> {
        Ok(Self {
            credentials,
            site,
            priority,
            graph: StepGraph::new(STEPS)?,
        })
    }

    /// Creates a refresher from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, RefreshError> {
        let kind = ProviderKind::Instahyre;
        let credentials = config.credentials(kind).ok_or_else(|| {
            RefreshError::config("Instahyre needs both a username and a password")
        })?;
        let site = SITE.resolve(config.provider(kind))?;
        Self::new(credentials, site, config.priority(kind))
    }
}

#[async_trait]
impl ResumeRefresher for InstahyreRefresher {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Instahyre
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    #[instrument(skip_all, fields(provider = self.name()))]
    async fn refresh(&self, ctx: &RefreshContext) -> Result<(), RefreshError> {
        let name = self.name();
        let client = Arc::new(InstahyreClient::new(Arc::clone(&ctx.http), self.site.clone()));

        let login = Memoized::new(name, LOGIN, {
            let client = Arc::clone(&client);
            let credentials = self.credentials.clone();
            async move { client.login(&credentials).await }
        });

        let candidate_id = Memoized::new(name, CANDIDATE_ID, {
            let client = Arc::clone(&client);
            let login = login.clone();
            async move {
                let session = login.get().await?;
                client.candidate_id(&session).await
            }
        });

        let resume_id = Memoized::new(name, RESUME_ID, {
            let client = Arc::clone(&client);
            let (login, candidate_id) = (login.clone(), candidate_id.clone());
            async move {
                let session = login.get().await?;
                let candidate_id = candidate_id.get().await?;
                client.resume_id(&session, &candidate_id).await
            }
        });

        let upload = Memoized::new(name, UPLOAD_RESUME, {
            let client = Arc::clone(&client);
            let (login, candidate_id, resume_id) =
                (login.clone(), candidate_id.clone(), resume_id.clone());
            let read = ctx.read_resume();
            let resume = ctx.resume.clone();
            async move {
                let session = login.get().await?;
                let candidate_id = candidate_id.get().await?;
                let resume_id = resume_id.get().await?;
                let bytes = read.await?;
                client
                    .upload_resume(
                        &session,
                        &candidate_id,
                        resume_id,
                        &resume.display_filename,
                        &bytes,
                    )
                    .await
            }
        });

        self.graph
            .execute(
                name,
                &[
                    (LOGIN, &login),
                    (CANDIDATE_ID, &candidate_id),
                    (RESUME_ID, &resume_id),
                    (UPLOAD_RESUME, &upload),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_a_chain() {
        let graph = StepGraph::new(STEPS).unwrap();
        assert_eq!(
            graph.layers(),
            vec![vec![LOGIN], vec![CANDIDATE_ID], vec![RESUME_ID], vec![UPLOAD_RESUME]]
        );
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let err = InstahyreRefresher::from_config(&AppConfig::default()).unwrap_err();
        assert!(err.is_configuration());
    }
}
