//! Provider-related types.
//!
//! This module contains types related to job-portal providers:
//! - [`ProviderKind`] - Enum of supported providers
//! - [`ProviderCredentials`] - Login credentials (owned by one pipeline)
//! - [`ProviderMetadata`] - Display info and default ordering

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported job-portal providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// instahyre.com
    Instahyre,
    /// naukri.com
    Naukri,
    /// monsterindia.com
    Monster,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Instahyre => "Instahyre",
            Self::Naukri => "Naukri",
            Self::Monster => "Monster",
        }
    }

    /// Returns all available provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Instahyre, Self::Naukri, Self::Monster]
    }

    /// Returns the CLI name for this provider (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Instahyre => "instahyre",
            Self::Naukri => "naukri",
            Self::Monster => "monster",
        }
    }

    /// Returns the prefix used for this provider's environment variables.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Self::Instahyre => "APP_INSTAHYRE",
            Self::Naukri => "APP_NAUKRI",
            Self::Monster => "APP_MONSTER",
        }
    }

    /// Looks up a provider by CLI name (case-insensitive).
    pub fn from_cli_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.cli_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Provider Credentials
// ============================================================================

/// Username/password pair for one provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    /// Login name (email for most portals).
    pub username: String,
    /// Password.
    pub password: String,
}

impl ProviderCredentials {
    /// Creates credentials from a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials from optional parts; `None` unless both are non-blank.
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        let username = username.map(str::trim).filter(|s| !s.is_empty())?;
        let password = password.filter(|s| !s.trim().is_empty())?;
        Some(Self::new(username, password))
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Provider Metadata
// ============================================================================

/// Static description of a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// The provider this metadata describes.
    pub id: ProviderKind,
    /// Display name.
    pub display_name: String,
    /// CLI name.
    pub cli_name: String,
    /// Default run priority (lower runs first).
    pub default_priority: u32,
    /// Site home page.
    pub home_url: String,
    /// One-line description of the refresh flow.
    pub summary: String,
}

impl ProviderMetadata {
    /// Creates default metadata for a provider kind.
    pub fn for_provider(kind: ProviderKind) -> Self {
        let (default_priority, home_url, summary) = match kind {
            ProviderKind::Instahyre => (
                1,
                "https://www.instahyre.com/",
                "Replaces the resume in place; fails fast, so it runs first",
            ),
            ProviderKind::Naukri => (
                99,
                "https://www.naukri.com/",
                "Deletes and re-uploads the resume once the upload key is known",
            ),
            ProviderKind::Monster => (
                999,
                "https://www.monsterindia.com/",
                "Uploads over the existing resume; often fails upstream, so it runs last",
            ),
        };

        Self {
            id: kind,
            display_name: kind.display_name().to_string(),
            cli_name: kind.cli_name().to_string(),
            default_priority,
            home_url: home_url.to_string(),
            summary: summary.to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
