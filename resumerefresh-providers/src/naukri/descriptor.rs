//! Naukri provider descriptor.

use resumerefresh_core::{AppConfig, ProviderKind, RefreshError};
use resumerefresh_fetch::ResumeRefresher;

use super::pipeline::{NaukriRefresher, SITE, STEPS};
use crate::descriptor::ProviderDescriptor;

/// Creates the Naukri provider descriptor.
pub fn naukri_descriptor() -> ProviderDescriptor {
    ProviderDescriptor::builder(ProviderKind::Naukri)
        .site(SITE)
        .steps(STEPS)
        .build_refresher(build)
        .build()
}

fn build(config: &AppConfig) -> Result<Box<dyn ResumeRefresher>, RefreshError> {
    Ok(Box::new(NaukriRefresher::from_config(config)?))
}
