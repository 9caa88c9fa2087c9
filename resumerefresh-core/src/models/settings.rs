//! Configuration model.
//!
//! The on-disk and in-memory shape of the application configuration. Loading,
//! environment overlay and validation live in the store crate; this module
//! only describes the data and answers questions about it.

use serde::{Deserialize, Serialize};

use super::provider::{ProviderCredentials, ProviderKind, ProviderMetadata};

/// Placeholder shown in place of a configured password.
pub const REDACTED: &str = "********";

// ============================================================================
// App Config
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// The resume uploaded to every provider.
    #[serde(default)]
    pub resume: ResumeSettings,
    /// Per-provider settings.
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpSettings,
}

impl AppConfig {
    /// Returns the settings for a provider.
    pub fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Instahyre => &self.providers.instahyre,
            ProviderKind::Naukri => &self.providers.naukri,
            ProviderKind::Monster => &self.providers.monster,
        }
    }

    /// Returns mutable settings for a provider.
    pub fn provider_mut(&mut self, kind: ProviderKind) -> &mut ProviderSettings {
        match kind {
            ProviderKind::Instahyre => &mut self.providers.instahyre,
            ProviderKind::Naukri => &mut self.providers.naukri,
            ProviderKind::Monster => &mut self.providers.monster,
        }
    }

    /// Returns the credentials for a provider, if both parts are non-blank.
    pub fn credentials(&self, kind: ProviderKind) -> Option<ProviderCredentials> {
        self.provider(kind).credentials()
    }

    /// Returns true if the provider has usable credentials.
    pub fn is_provider_enabled(&self, kind: ProviderKind) -> bool {
        self.credentials(kind).is_some()
    }

    /// Effective run priority of a provider (override or built-in default).
    pub fn priority(&self, kind: ProviderKind) -> u32 {
        self.provider(kind)
            .priority
            .unwrap_or_else(|| ProviderMetadata::for_provider(kind).default_priority)
    }

    /// Returns a copy with every password replaced by [`REDACTED`].
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for kind in ProviderKind::all() {
            let settings = copy.provider_mut(*kind);
            if settings.password.as_deref().is_some_and(|p| !p.is_empty()) {
                settings.password = Some(REDACTED.to_string());
            }
        }
        copy
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Where the resume lives and what it is called on the portals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSettings {
    /// Path to the resume file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// File name presented to the portals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Settings for all providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// instahyre.com
    #[serde(default)]
    pub instahyre: ProviderSettings,
    /// naukri.com
    #[serde(default)]
    pub naukri: ProviderSettings,
    /// monsterindia.com
    #[serde(default)]
    pub monster: ProviderSettings,
}

/// Settings for one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Run priority override (lower runs first).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    /// Base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// User-Agent override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ProviderSettings {
    /// Returns credentials if both username and password are non-blank.
    pub fn credentials(&self) -> Option<ProviderCredentials> {
        ProviderCredentials::from_parts(self.username.as_deref(), self.password.as_deref())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for failed requests (0 disables retrying).
    #[serde(default)]
    pub max_retries: u32,
    /// Emit trace events for every request and response.
    #[serde(default)]
    pub wire_log: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            wire_log: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
