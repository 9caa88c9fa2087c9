//! Provider descriptor system.
//!
//! A descriptor contains all the static configuration for a provider:
//! - Metadata (display name, default priority, home page)
//! - Site defaults (base URL, browser identity headers)
//! - The declared step graph
//! - How to decide enablement and build a refresher from configuration

use resumerefresh_core::{
    AppConfig, ProviderKind, ProviderMetadata, ProviderSettings, RefreshError,
};
use resumerefresh_fetch::{HttpRequest, Method, ResumeRefresher, StepDef, StepGraph};
use url::Url;

/// Desktop browser identity presented to the portals.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/104.0.5112.81 Safari/537.36";

/// Builds a refresher from configuration.
pub type BuildRefresher = fn(&AppConfig) -> Result<Box<dyn ResumeRefresher>, RefreshError>;

/// Decides whether a provider takes part in a run.
pub type IsEnabled = fn(&AppConfig) -> bool;

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Complete descriptor for a provider.
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub id: ProviderKind,
    /// Display metadata.
    pub metadata: ProviderMetadata,
    /// Site defaults.
    pub site: SiteConfig,
    /// Declared steps.
    pub steps: &'static [StepDef],
    /// Enablement override; credentials decide when unset.
    pub is_enabled: Option<IsEnabled>,
    /// Refresher factory.
    pub build_refresher: BuildRefresher,
}

impl ProviderDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder(id: ProviderKind) -> ProviderDescriptorBuilder {
        ProviderDescriptorBuilder::new(id)
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }

    /// Returns the CLI name.
    pub fn cli_name(&self) -> &str {
        &self.metadata.cli_name
    }

    /// Returns true if the provider should run under `config`.
    pub fn enabled(&self, config: &AppConfig) -> bool {
        match self.is_enabled {
            Some(is_enabled) => is_enabled(config),
            None => config.is_provider_enabled(self.id),
        }
    }

    /// Builds the refresher for this provider.
    pub fn build(&self, config: &AppConfig) -> Result<Box<dyn ResumeRefresher>, RefreshError> {
        (self.build_refresher)(config)
    }

    /// Validates and layers the declared steps.
    pub fn step_graph(&self) -> Result<StepGraph, RefreshError> {
        Ok(StepGraph::new(self.steps)?)
    }
}

impl std::fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("site", &self.site)
            .field("steps", &self.steps.iter().map(|s| s.name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Site
// ============================================================================

/// Built-in site defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteConfig {
    /// Base URL without a trailing slash.
    pub base_url: &'static str,
    /// Whether requests carry `Referer: <base_url>/`.
    pub send_referer: bool,
}

impl SiteConfig {
    /// Applies configuration overrides.
    pub fn resolve(&self, settings: &ProviderSettings) -> Result<Site, RefreshError> {
        let base_url = settings
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.base_url)
            .trim_end_matches('/')
            .to_string();

        Url::parse(&base_url)
            .map_err(|e| RefreshError::config(format!("invalid base URL `{base_url}`: {e}")))?;

        let user_agent = settings
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(BROWSER_USER_AGENT)
            .to_string();

        let referer = self.send_referer.then(|| format!("{base_url}/"));

        Ok(Site {
            base_url,
            user_agent,
            referer,
        })
    }
}

/// Effective site settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// User-Agent header.
    pub user_agent: String,
    /// Referer header, if the site expects one.
    pub referer: Option<String>,
}

impl Site {
    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A request carrying the browser identity headers.
    pub fn request(&self, method: Method, url: impl Into<String>) -> HttpRequest {
        let request = HttpRequest::new(method, url).header("User-Agent", self.user_agent.as_str());
        match &self.referer {
            Some(referer) => request.header("Referer", referer.as_str()),
            None => request,
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ProviderDescriptor`].
pub struct ProviderDescriptorBuilder {
    id: ProviderKind,
    metadata: Option<ProviderMetadata>,
    site: Option<SiteConfig>,
    steps: &'static [StepDef],
    is_enabled: Option<IsEnabled>,
    build_refresher: Option<BuildRefresher>,
}

impl ProviderDescriptorBuilder {
    /// Creates a new builder for the given provider.
    pub fn new(id: ProviderKind) -> Self {
        Self {
            id,
            metadata: None,
            site: None,
            steps: &[],
            is_enabled: None,
            build_refresher: None,
        }
    }

    /// Sets the metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: ProviderMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sets the site defaults.
    #[must_use]
    pub fn site(mut self, site: SiteConfig) -> Self {
        self.site = Some(site);
        self
    }

    /// Sets the declared steps.
    #[must_use]
    pub fn steps(mut self, steps: &'static [StepDef]) -> Self {
        self.steps = steps;
        self
    }

    /// Overrides the enablement predicate.
    #[must_use]
    pub fn is_enabled(mut self, is_enabled: IsEnabled) -> Self {
        self.is_enabled = Some(is_enabled);
        self
    }

    /// Sets the refresher factory.
    #[must_use]
    pub fn build_refresher(mut self, build: BuildRefresher) -> Self {
        self.build_refresher = Some(build);
        self
    }

    /// Builds the descriptor.
    ///
    /// Without an explicit predicate, the provider is enabled when both
    /// credential fields are non-blank. Without a factory, building fails
    /// with a configuration error.
    pub fn build(self) -> ProviderDescriptor {
        let id = self.id;
        ProviderDescriptor {
            id,
            metadata: self
                .metadata
                .unwrap_or_else(|| ProviderMetadata::for_provider(id)),
            site: self.site.unwrap_or(SiteConfig {
                base_url: "",
                send_referer: false,
            }),
            steps: self.steps,
            is_enabled: self.is_enabled,
            build_refresher: self.build_refresher.unwrap_or(not_buildable),
        }
    }
}

fn not_buildable(_config: &AppConfig) -> Result<Box<dyn ResumeRefresher>, RefreshError> {
    Err(RefreshError::config("provider has no refresher"))
}

// ============================================================================
// Tests
// ============================================================================
