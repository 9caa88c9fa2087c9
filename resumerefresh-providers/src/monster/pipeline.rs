//! Monster refresh pipeline.
//!
//! ```text
//! client_id ──► login ──► authorize ──► session ──► profile_id ──► upload_resume ──► publish_update
//! ```
//!
//! There is no delete step; a new upload replaces the previous file.

use std::sync::Arc;

use async_trait::async_trait;
use resumerefresh_core::{AppConfig, ProviderCredentials, ProviderKind, RefreshError};
use resumerefresh_fetch::{Memoized, RefreshContext, ResumeRefresher, StepDef, StepGraph};
use tracing::instrument;

use super::api::MonsterClient;
use crate::descriptor::{Site, SiteConfig};

/// Default site.
pub const SITE: SiteConfig = SiteConfig {
    base_url: "https://www.monsterindia.com",
    send_referer: true,
};

/// Reads the OAuth client id.
pub const CLIENT_ID: &str = "client_id";
/// Submits the login form.
pub const LOGIN: &str = "login";
/// Reads the callback from the authorize redirect.
pub const AUTHORIZE: &str = "authorize";
/// Captures the session cookie from the callback.
pub const SESSION: &str = "session";
/// Reads the profile id.
pub const PROFILE_ID: &str = "profile_id";
/// Uploads the resume.
pub const UPLOAD_RESUME: &str = "upload_resume";
/// Announces the change.
pub const PUBLISH_UPDATE: &str = "publish_update";

/// Declared steps.
pub const STEPS: &[StepDef] = &[
    StepDef::root(CLIENT_ID),
    StepDef::after(LOGIN, &[CLIENT_ID]),
    StepDef::after(AUTHORIZE, &[LOGIN]),
    StepDef::after(SESSION, &[LOGIN, AUTHORIZE]),
    StepDef::after(PROFILE_ID, &[SESSION]),
    StepDef::after(UPLOAD_RESUME, &[SESSION, PROFILE_ID]),
    StepDef::after(PUBLISH_UPDATE, &[SESSION, PROFILE_ID, UPLOAD_RESUME]),
];

/// Refreshes the resume on Monster.
#[derive(Debug)]
pub struct MonsterRefresher {
    credentials: ProviderCredentials,
    site: Site,
    priority: u32,
    graph: StepGraph,
}

impl MonsterRefresher {
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
        let kind = ProviderKind::Monster;
        let credentials = config
            .credentials(kind)
            .ok_or_else(|| RefreshError::config("Monster needs both a username and a password"))?;
        let site = SITE.resolve(config.provider(kind))?;
        Self::new(credentials, site, config.priority(kind))
    }
}

#[async_trait]
impl ResumeRefresher for MonsterRefresher {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Monster
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    #[instrument(skip_all, fields(provider = self.name()))]
    async fn refresh(&self, ctx: &RefreshContext) -> Result<(), RefreshError> {
        let name = self.name();
        let client = Arc::new(MonsterClient::new(Arc::clone(&ctx.http), self.site.clone()));

        let client_id = Memoized::new(name, CLIENT_ID, {
            let client = Arc::clone(&client);
            async move { client.client_id().await }
        });

        let login = Memoized::new(name, LOGIN, {
            let client = Arc::clone(&client);
            let credentials = self.credentials.clone();
            let client_id = client_id.clone();
            async move {
                let client_id = client_id.get().await?;
                client.login(&credentials, &client_id).await
            }
        });

        let authorize = Memoized::new(name, AUTHORIZE, {
            let client = Arc::clone(&client);
            let login = login.clone();
            async move {
                let grant = login.get().await?;
                client.authorize(&grant).await
            }
        });

        let session = Memoized::new(name, SESSION, {
            let client = Arc::clone(&client);
            let (login, authorize) = (login.clone(), authorize.clone());
            async move {
                let grant = login.get().await?;
                let callback = authorize.get().await?;
                client.session(&grant, &callback).await
            }
        });

        let profile_id = Memoized::new(name, PROFILE_ID, {
            let client = Arc::clone(&client);
            let session = session.clone();
            async move {
                let session = session.get().await?;
                client.profile_id(&session).await
            }
        });

        let upload = Memoized::new(name, UPLOAD_RESUME, {
            let client = Arc::clone(&client);
            let (session, profile_id) = (session.clone(), profile_id.clone());
            let read = ctx.read_resume();
            let resume = ctx.resume.clone();
            async move {
                let session = session.get().await?;
                profile_id.get().await?;
                let bytes = read.await?;
                client
                    .upload_resume(&session, &resume.display_filename, resume.content_type(), bytes)
                    .await
            }
        });

        let publish = Memoized::new(name, PUBLISH_UPDATE, {
            let client = Arc::clone(&client);
            let (session, profile_id, upload) = (session.clone(), profile_id.clone(), upload.clone());
            async move {
                let session = session.get().await?;
                let profile_id = profile_id.get().await?;
                upload.get().await?;
                client.publish_update(&session, &profile_id).await
            }
        });

        self.graph
            .execute(
                name,
                &[
                    (CLIENT_ID, &client_id),
                    (LOGIN, &login),
                    (AUTHORIZE, &authorize),
                    (SESSION, &session),
                    (PROFILE_ID, &profile_id),
                    (UPLOAD_RESUME, &upload),
                    (PUBLISH_UPDATE, &publish),
                ],
            )
            .await
    }
}
