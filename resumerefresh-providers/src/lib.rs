// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `ResumeRefresh` Providers
//!
//! Job portal implementations for `ResumeRefresh`.
//!
//! Each provider module includes:
//!
//! - **api**: A client for the portal's endpoints and its exchange types
//! - **pipeline**: The declared step graph and the refresher wiring it up
//! - **descriptor**: Static configuration (metadata, site defaults, steps)
//!
//! ## Supported Providers
//!
//! | Provider | Default priority | Login | Replaces resume by |
//! |----------|------------------|-------|--------------------|
//! | Instahyre | 1 | JSON, session cookies | `PUT` with inline base64 |
//! | Naukri | 99 | JSON, bearer token | delete, upload, advertise |
//! | Monster | 999 | form + OAuth redirect | multipart upload, publish |
//!
//! ## Usage
//!
//! ```ignore
//! use resumerefresh_providers::ProviderRegistry;
//!
//! let orchestrator = ProviderRegistry::orchestrator(&config, None)?;
//! let report = orchestrator.run(&ctx).await?;
//! ```

pub mod descriptor;
pub mod registry;

// Provider modules (alphabetical)
pub mod instahyre;
pub mod monster;
pub mod naukri;

// Re-export key types
pub use descriptor::{
    BROWSER_USER_AGENT, BuildRefresher, IsEnabled, ProviderDescriptor, ProviderDescriptorBuilder,
    Site, SiteConfig,
};
pub use registry::{ProviderRegistration, ProviderRegistry};

// Re-export provider descriptors
pub use instahyre::instahyre_descriptor;
pub use monster::monster_descriptor;
pub use naukri::naukri_descriptor;

// Re-export refreshers for convenience
pub use instahyre::InstahyreRefresher;
pub use monster::MonsterRefresher;
pub use naukri::NaukriRefresher;
