//! Provider registry for managing all provider descriptors.
//!
//! The registry provides static access to all provider configurations and
//! turns a loaded configuration into the ordered set of refreshers to run.

use std::collections::HashMap;
use std::sync::OnceLock;

use resumerefresh_core::{AppConfig, ProviderKind, RefreshError};
use resumerefresh_fetch::{Orchestrator, ResumeRefresher};
use tracing::{debug, warn};

use crate::descriptor::{BuildRefresher, ProviderDescriptor};
use crate::instahyre::instahyre_descriptor;
use crate::monster::monster_descriptor;
use crate::naukri::naukri_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all provider descriptors.
static DESCRIPTORS: OnceLock<Vec<ProviderDescriptor>> = OnceLock::new();

/// Static storage for CLI name to provider kind mapping.
static CLI_NAME_MAP: OnceLock<HashMap<String, ProviderKind>> = OnceLock::new();

/// Initializes all provider descriptors, in registration order.
fn init_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        instahyre_descriptor(),
        naukri_descriptor(),
        monster_descriptor(),
    ]
}

fn build_cli_name_map(descriptors: &[ProviderDescriptor]) -> HashMap<String, ProviderKind> {
    descriptors
        .iter()
        .map(|desc| (desc.cli_name().to_string(), desc.id))
        .collect()
}

// ============================================================================
// Registration
// ============================================================================

/// A provider as seen by one configuration.
#[derive(Clone, Copy)]
pub struct ProviderRegistration {
    /// Provider identifier.
    pub kind: ProviderKind,
    /// Effective priority (configured override or default).
    pub priority: u32,
    /// Whether the provider takes part in a run.
    pub enabled: bool,
    /// Refresher factory.
    pub build: BuildRefresher,
}

impl ProviderRegistration {
    /// Evaluates a descriptor against `config`.
    pub fn from_descriptor(descriptor: &ProviderDescriptor, config: &AppConfig) -> Self {
        Self {
            kind: descriptor.id,
            priority: config.priority(descriptor.id),
            enabled: descriptor.enabled(config),
            build: descriptor.build_refresher,
        }
    }

    /// Builds the refresher.
    pub fn instantiate(&self, config: &AppConfig) -> Result<Box<dyn ResumeRefresher>, RefreshError> {
        (self.build)(config)
    }
}

impl std::fmt::Debug for ProviderRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistration")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of all provider descriptors.
///
/// The registry is initialized lazily on first access and provides
/// thread-safe access to provider configurations.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider descriptors.
    pub fn all() -> &'static [ProviderDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a provider descriptor by kind.
    pub fn get(id: ProviderKind) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Returns the CLI name to provider kind mapping.
    pub fn cli_name_map() -> &'static HashMap<String, ProviderKind> {
        CLI_NAME_MAP.get_or_init(|| build_cli_name_map(Self::all()))
    }

    /// Looks up a provider by CLI name (case-insensitive).
    pub fn get_by_cli_name(name: &str) -> Option<&'static ProviderDescriptor> {
        let kind = Self::cli_name_map().get(&name.trim().to_ascii_lowercase())?;
        Self::get(*kind)
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all provider kinds.
    pub fn kinds() -> Vec<ProviderKind> {
        Self::all().iter().map(|d| d.id).collect()
    }

    /// Every provider evaluated against `config`, in run order.
    ///
    /// Sorted by priority; equal priorities keep registration order.
    pub fn registrations(config: &AppConfig) -> Vec<ProviderRegistration> {
        let mut registrations: Vec<_> = Self::all()
            .iter()
            .map(|d| ProviderRegistration::from_descriptor(d, config))
            .collect();
        registrations.sort_by_key(|r| r.priority);
        registrations
    }

    /// Enabled providers, optionally narrowed to the names in `filter`.
    ///
    /// A filter naming an unknown provider is a configuration error.
    pub fn enabled(
        config: &AppConfig,
        filter: Option<&[String]>,
    ) -> Result<Vec<ProviderRegistration>, RefreshError> {
        let selected = filter.map(Self::parse_filter).transpose()?;

        let registrations = Self::registrations(config)
            .into_iter()
            .filter(|r| selected.as_ref().is_none_or(|kinds| kinds.contains(&r.kind)))
            .filter(|r| {
                if !r.enabled && selected.is_some() {
                    warn!(provider = r.kind.cli_name(), "Selected provider has no credentials");
                }
                r.enabled
            })
            .collect::<Vec<_>>();

        debug!(
            providers = ?registrations.iter().map(|r| r.kind.cli_name()).collect::<Vec<_>>(),
            "Enabled providers"
        );
        Ok(registrations)
    }

    /// Builds a refresher for every enabled provider.
    pub fn build_refreshers(
        config: &AppConfig,
        filter: Option<&[String]>,
    ) -> Result<Vec<Box<dyn ResumeRefresher>>, RefreshError> {
        Self::enabled(config, filter)?
            .iter()
            .map(|r| r.instantiate(config))
            .collect()
    }

    /// Builds an orchestrator over every enabled provider.
    pub fn orchestrator(
        config: &AppConfig,
        filter: Option<&[String]>,
    ) -> Result<Orchestrator, RefreshError> {
        Ok(Orchestrator::new(Self::build_refreshers(config, filter)?))
    }

    fn parse_filter(names: &[String]) -> Result<Vec<ProviderKind>, RefreshError> {
        names
            .iter()
            .map(|name| {
                Self::get_by_cli_name(name).map(|d| d.id).ok_or_else(|| {
                    let known: Vec<_> = Self::all().iter().map(ProviderDescriptor::cli_name).collect();
                    RefreshError::config(format!(
                        "unknown provider `{}` (expected one of: {})",
                        name.trim(),
                        known.join(", ")
                    ))
                })
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
