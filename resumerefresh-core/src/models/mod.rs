//! Domain models for `ResumeRefresh`.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider types (`ProviderKind`, credentials, metadata)
//! - [`resume`] - The resume file being uploaded
//! - [`outcome`] - Per-provider outcomes and the run report
//! - [`settings`] - Configuration model

mod outcome;
mod provider;
mod resume;
mod settings;

pub use outcome::{OutcomeRecord, PipelineOutcome, RunReport};
pub use provider::{ProviderCredentials, ProviderKind, ProviderMetadata};
pub use resume::ResumeArtifact;
pub use settings::{
    AppConfig, HttpSettings, ProviderSettings, ProvidersConfig, REDACTED, ResumeSettings,
};
