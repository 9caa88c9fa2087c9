//! Monster provider descriptor.

use resumerefresh_core::{AppConfig, ProviderKind, RefreshError};
use resumerefresh_fetch::ResumeRefresher;

use super::pipeline::{MonsterRefresher, SITE, STEPS};
use crate::descriptor::ProviderDescriptor;

/// Creates the Monster provider descriptor.
pub fn monster_descriptor() -> ProviderDescriptor {
    ProviderDescriptor::builder(ProviderKind::Monster)
        .site(SITE)
        .steps(STEPS)
        .build_refresher(build)
        .build()
}

fn build(config: &AppConfig) -> Result<Box<dyn ResumeRefresher>, RefreshError> {
    Ok(Box::new(MonsterRefresher::from_config(config)?))
}
