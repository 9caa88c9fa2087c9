//! Naukri refresh pipeline.
//!
//! ```text
//! login ──► profile_id ─────┐
//!                           ├──► delete_resume ──► upload_resume ──► advertise_resume
//! form_key ──► read_resume ─┘
//! ```
//!
//! The form key and the resume bytes are both in hand before anything is
//! deleted, so a site change that breaks extraction or an unreadable file
//! leaves the existing resume in place.

use std::sync::Arc;

use async_trait::async_trait;
use resumerefresh_core::{AppConfig, ProviderCredentials, ProviderKind, RefreshError};
use resumerefresh_fetch::{Memoized, RefreshContext, ResumeRefresher, StepDef, StepGraph};
use tracing::{debug, instrument};

use super::api::{NaukriClient, generate_file_key};
use crate::descriptor::{Site, SiteConfig};

/// Default site.
pub const SITE: SiteConfig = SiteConfig {
    base_url: "https://www.naukri.com",
    send_referer: false,
};

/// Logs in and captures the bearer token.
pub const LOGIN: &str = "login";
/// Reads the upload form key from the script bundle.
pub const FORM_KEY: &str = "form_key";
/// Reads the profile id.
pub const PROFILE_ID: &str = "profile_id";
/// Reads the resume bytes from disk.
pub const READ_RESUME: &str = "read_resume";
/// Removes the current resume.
pub const DELETE_RESUME: &str = "delete_resume";
/// Sends the file to the validation service.
pub const UPLOAD_RESUME: &str = "upload_resume";
/// Attaches the uploaded file to the profile.
pub const ADVERTISE_RESUME: &str = "advertise_resume";

/// Declared steps.
pub const STEPS: &[StepDef] = &[
    StepDef::root(LOGIN),
    StepDef::root(FORM_KEY),
    StepDef::after(PROFILE_ID, &[LOGIN]),
    StepDef::after(READ_RESUME, &[FORM_KEY]),
    StepDef::after(DELETE_RESUME, &[LOGIN, PROFILE_ID, FORM_KEY, READ_RESUME]),
    StepDef::after(UPLOAD_RESUME, &[FORM_KEY, READ_RESUME, DELETE_RESUME]),
    StepDef::after(ADVERTISE_RESUME, &[LOGIN, PROFILE_ID, FORM_KEY, UPLOAD_RESUME]),
];

/// Refreshes the resume on Naukri.
#[derive(Debug)]
pub struct NaukriRefresher {
    credentials: ProviderCredentials,
    site: Site,
    priority: u32,
    graph: StepGraph,
}

impl NaukriRefresher {
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
        let kind = ProviderKind::Naukri;
        let credentials = config
            .credentials(kind)
            .ok_or_else(|| RefreshError::config("Naukri needs both a username and a password"))?;
        let site = SITE.resolve(config.provider(kind))?;
        Self::new(credentials, site, config.priority(kind))
    }
}

#[async_trait]
impl ResumeRefresher for NaukriRefresher {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Naukri
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    #[instrument(skip_all, fields(provider = self.name()))]
    async fn refresh(&self, ctx: &RefreshContext) -> Result<(), RefreshError> {
        let name = self.name();
        let client = Arc::new(NaukriClient::new(Arc::clone(&ctx.http), self.site.clone()));
        let file_key: Arc<str> = generate_file_key(&mut rand::thread_rng()).into();
        debug!(file_key = %file_key, "Generated file key");

        let login = Memoized::new(name, LOGIN, {
            let client = Arc::clone(&client);
            let credentials = self.credentials.clone();
            async move { client.login(&credentials).await }
        });

        let form_key = Memoized::new(name, FORM_KEY, {
            let client = Arc::clone(&client);
            async move { client.form_key().await }
        });

        let profile_id = Memoized::new(name, PROFILE_ID, {
            let client = Arc::clone(&client);
            let login = login.clone();
            async move {
                let token = login.get().await?;
                client.profile_id(&token).await
            }
        });

        let resume_bytes = Memoized::new(name, READ_RESUME, {
            let form_key = form_key.clone();
            let read = ctx.read_resume();
            async move {
                form_key.get().await?;
                read.await.map(Arc::<[u8]>::from)
            }
        });

        let delete = Memoized::new(name, DELETE_RESUME, {
            let client = Arc::clone(&client);
            let (login, profile_id, form_key, resume_bytes) = (
                login.clone(),
                profile_id.clone(),
                form_key.clone(),
                resume_bytes.clone(),
            );
            async move {
                let token = login.get().await?;
                let profile_id = profile_id.get().await?;
                form_key.get().await?;
                resume_bytes.get().await?;
                client.delete_resume(&token, &profile_id).await
            }
        });

        let upload = Memoized::new(name, UPLOAD_RESUME, {
            let client = Arc::clone(&client);
            let (form_key, resume_bytes, delete) =
                (form_key.clone(), resume_bytes.clone(), delete.clone());
            let file_key = Arc::clone(&file_key);
            let resume = ctx.resume.clone();
            async move {
                let form_key = form_key.get().await?;
                let bytes = resume_bytes.get().await?;
                delete.get().await?;
                client
                    .upload_file(
                        &form_key,
                        &file_key,
                        &resume.display_filename,
                        resume.content_type(),
                        bytes.to_vec(),
                    )
                    .await
            }
        });

        let advertise = Memoized::new(name, ADVERTISE_RESUME, {
            let client = Arc::clone(&client);
            let (login, profile_id, form_key, upload) =
                (login.clone(), profile_id.clone(), form_key.clone(), upload.clone());
            let file_key = Arc::clone(&file_key);
            async move {
                let token = login.get().await?;
                let profile_id = profile_id.get().await?;
                let form_key = form_key.get().await?;
                upload.get().await?;
                client
                    .advertise_resume(&token, &profile_id, &form_key, &file_key)
                    .await
            }
        });

        self.graph
            .execute(
                name,
                &[
                    (LOGIN, &login),
                    (FORM_KEY, &form_key),
                    (PROFILE_ID, &profile_id),
                    (READ_RESUME, &resume_bytes),
                    (DELETE_RESUME, &delete),
                    (UPLOAD_RESUME, &upload),
                    (ADVERTISE_RESUME, &advertise),
                ],
            )
            .await
    }
}
