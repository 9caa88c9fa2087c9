//! Instahyre provider descriptor.

use resumerefresh_core::{AppConfig, ProviderKind, RefreshError};
use resumerefresh_fetch::ResumeRefresher;

use super::pipeline::{InstahyreRefresher, SITE, STEPS};
use crate::descriptor::ProviderDescriptor;

/// Creates the Instahyre provider descriptor.
pub fn instahyre_descriptor() -> ProviderDescriptor {
    ProviderDescriptor::builder(ProviderKind::Instahyre)
        .site(SITE)
        .steps(STEPS)
        .build_refresher(build)
        .build()
}

fn build(config: &AppConfig) -> Result<Box<dyn ResumeRefresher>, RefreshError> {
    Ok(Box::new(InstahyreRefresher::from_config(config)?))
}
