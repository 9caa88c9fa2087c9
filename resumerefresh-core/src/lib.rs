// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ResumeRefresh` Core
//!
//! Core types, models, and errors shared by every `ResumeRefresh` crate.
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`ProviderKind`] - The supported job portals
//! - [`ProviderCredentials`] - Login for one portal
//! - [`ProviderMetadata`] - Display info and default run priority
//!
//! ### Run Types
//! - [`ResumeArtifact`] - The file uploaded during a run
//! - [`PipelineOutcome`] - Result of one provider pipeline
//! - [`RunReport`] - Aggregate of a whole run
//!
//! ### Configuration
//! - [`AppConfig`] - Resume, provider and HTTP settings
//!
//! ### Errors
//! - [`RefreshError`] - Closed error taxonomy, tagged with step context
//! - [`ErrorKind`] - The four failure kinds

pub mod error;
pub mod models;

pub use error::{ErrorKind, RefreshError, SAMPLE_LIMIT, truncate_sample};

pub use models::{
    // Provider types
    ProviderCredentials,
    ProviderKind,
    ProviderMetadata,
    // Run types
    OutcomeRecord,
    PipelineOutcome,
    ResumeArtifact,
    RunReport,
    // Configuration
    AppConfig,
    HttpSettings,
    ProviderSettings,
    ProvidersConfig,
    REDACTED,
    ResumeSettings,
};
