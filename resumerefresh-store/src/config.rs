//! Configuration management.
//!
//! Configuration is resolved in three layers: built-in defaults, the JSON
//! file, then `APP_*` environment variables. Blank values never override.

use std::path::{Path, PathBuf};

use resumerefresh_core::{AppConfig, ProviderKind, ProviderSettings, ResumeArtifact};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

/// Resume path variable.
pub const ENV_RESUME_PATH: &str = "APP_RESUME_PATH";
/// Resume display name variable.
pub const ENV_RESUME_FILENAME: &str = "APP_RESUME_FILENAME";
/// Request timeout variable.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "APP_HTTP_TIMEOUT_SECS";
/// Retry count variable.
pub const ENV_HTTP_MAX_RETRIES: &str = "APP_HTTP_MAX_RETRIES";
/// Wire logging variable.
pub const ENV_HTTP_WIRE_LOG: &str = "APP_HTTP_WIRE_LOG";

// ============================================================================
// Loaded Config
// ============================================================================

/// A resolved configuration and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Effective configuration.
    pub config: AppConfig,
    /// File that was consulted.
    pub path: PathBuf,
    /// Whether that file existed.
    pub file_found: bool,
    /// Environment variables that overrode a value, in application order.
    pub env_overrides: Vec<String>,
}

/// Loads the file at `path` (or the default path) and applies the process
/// environment.
pub async fn load(path: Option<&Path>) -> Result<LoadedConfig, StoreError> {
    load_with_env(path, std::env::vars()).await
}

/// Like [`load`], with an explicit environment.
pub async fn load_with_env<I>(path: Option<&Path>, vars: I) -> Result<LoadedConfig, StoreError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let path = path.map_or_else(default_config_path, Path::to_path_buf);
    let file = load_json::<AppConfig>(&path).await?;
    let file_found = file.is_some();
    let mut config = file.unwrap_or_default();

    if file_found {
        info!(path = %path.display(), "Loaded configuration");
    } else {
        debug!(path = %path.display(), "Config file not found, using defaults");
    }

    let env_overrides = apply_env_from(&mut config, vars)?;
    if !env_overrides.is_empty() {
        debug!(vars = ?env_overrides, "Applied environment overrides");
    }
    validate_http(&config)?;

    Ok(LoadedConfig {
        config,
        path,
        file_found,
        env_overrides,
    })
}

// ============================================================================
// Environment Overlay
// ============================================================================

/// Applies `APP_*` variables to `config`, returning the names that took
/// effect. Unrelated and blank variables are ignored.
pub fn apply_env_from<I>(config: &mut AppConfig, vars: I) -> Result<Vec<String>, StoreError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut applied = Vec::new();

    for (var, raw) in vars {
        let value = raw.trim();
        if value.is_empty() || !var.starts_with("APP_") {
            continue;
        }

        let matched = match var.as_str() {
            ENV_RESUME_PATH => {
                config.resume.path = Some(value.to_string());
                true
            }
            ENV_RESUME_FILENAME => {
                config.resume.filename = Some(value.to_string());
                true
            }
            ENV_HTTP_TIMEOUT_SECS => {
                let secs: u64 = parse_number(&var, value)?;
                if secs == 0 {
                    return Err(StoreError::InvalidEnv {
                        var: var.clone(),
                        value: value.to_string(),
                        reason: "timeout must be at least one second",
                    });
                }
                config.http.timeout_secs = secs;
                true
            }
            ENV_HTTP_MAX_RETRIES => {
                config.http.max_retries = parse_number(&var, value)?;
                true
            }
            ENV_HTTP_WIRE_LOG => {
                config.http.wire_log = parse_flag(&var, value)?;
                true
            }
            _ => apply_provider_var(config, &var, value, &raw)?,
        };

        if matched {
            applied.push(var);
        }
    }

    Ok(applied)
}

/// `raw` is the untrimmed value; passwords keep their surrounding whitespace.
fn apply_provider_var(
    config: &mut AppConfig,
    var: &str,
    value: &str,
    raw: &str,
) -> Result<bool, StoreError> {
    let Some((kind, field)) = ProviderKind::all().iter().find_map(|kind| {
        var.strip_prefix(kind.env_prefix())
            .and_then(|rest| rest.strip_prefix('_'))
            .map(|field| (*kind, field))
    }) else {
        return Ok(false);
    };

    let settings: &mut ProviderSettings = config.provider_mut(kind);
    match field {
        "USERNAME" => settings.username = Some(value.to_string()),
        "PASSWORD" => settings.password = Some(raw.to_string()),
        "PRIORITY" => settings.priority = Some(parse_number(var, value)?),
        "BASE_URL" => settings.base_url = Some(value.to_string()),
        "USER_AGENT" => settings.user_agent = Some(value.to_string()),
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_number<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, StoreError> {
    value.parse().map_err(|_| StoreError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
        reason: "expected a non-negative integer",
    })
}

fn parse_flag(var: &str, value: &str) -> Result<bool, StoreError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StoreError::InvalidEnv {
            var: var.to_string(),
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Rejects HTTP settings no request could succeed with.
pub fn validate_http(config: &AppConfig) -> Result<(), StoreError> {
    if config.http.timeout_secs == 0 {
        return Err(StoreError::Config(
            "http.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Checks the resume settings and builds the artifact to upload.
pub fn resume_artifact(config: &AppConfig) -> Result<ResumeArtifact, StoreError> {
    let path = non_blank(config.resume.path.as_deref()).ok_or(StoreError::Missing {
        setting: "resume.path",
        env: ENV_RESUME_PATH,
    })?;
    let filename = non_blank(config.resume.filename.as_deref()).ok_or(StoreError::Missing {
        setting: "resume.filename",
        env: ENV_RESUME_FILENAME,
    })?;
    Ok(ResumeArtifact::new(expand_home(path), filename))
}

/// Fails unless the resume is a readable regular file.
pub async fn ensure_resume_readable(artifact: &ResumeArtifact) -> Result<(), StoreError> {
    let metadata = tokio::fs::metadata(artifact.path()).await.map_err(|e| {
        StoreError::Config(format!(
            "cannot read resume file {}: {e}",
            artifact.path().display()
        ))
    })?;
    if !metadata.is_file() {
        return Err(StoreError::Config(format!(
            "resume path {} is not a file",
            artifact.path().display()
        )));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map_or_else(|| PathBuf::from(path), |home| home.join(rest)),
        None => PathBuf::from(path),
    }
}

// ============================================================================
// Template
// ============================================================================

/// A starter configuration with every field spelled out.
pub fn template() -> AppConfig {
    let mut config = AppConfig::default();
    config.resume.path = Some("~/Documents/resume.pdf".to_string());
    config.resume.filename = Some("Firstname_Lastname_Resume.pdf".to_string());
    for kind in ProviderKind::all() {
        let settings = config.provider_mut(*kind);
        settings.username = Some(String::new());
        settings.password = Some(String::new());
    }
    config
}

/// Writes [`template`] to `path`; an existing file is kept unless `force`.
pub async fn init(path: &Path, force: bool) -> Result<(), StoreError> {
    if !force && tokio::fs::try_exists(path).await? {
        return Err(StoreError::AlreadyExists(path.to_path_buf()));
    }
    save(path, &template()).await?;
    info!(path = %path.display(), "Wrote configuration template");
    Ok(())
}

/// Saves `config` to `path`.
pub async fn save(path: &Path, config: &AppConfig) -> Result<(), StoreError> {
    save_json(path, config).await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let loaded = load_with_env(Some(&path), Vec::new()).await.unwrap();

        assert!(!loaded.file_found);
        assert_eq!(loaded.config, AppConfig::default());
        assert_eq!(loaded.path, path);
    }

    #[tokio::test]
    async fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(
            &path,
            r#"{
                "resume": { "path": "/from/file.pdf", "filename": "File.pdf" },
                "providers": { "naukri": { "username": "file-user", "password": "file-pass" } }
            }"#,
        )
        .await
        .unwrap();

        let loaded = load_with_env(
            Some(&path),
            env(&[
                ("APP_RESUME_PATH", "/from/env.pdf"),
                ("APP_NAUKRI_PASSWORD", "env-pass"),
                ("HOME", "/home/jane"),
            ]),
        )
        .await
        .unwrap();

        assert!(loaded.file_found);
        assert_eq!(loaded.config.resume.path.as_deref(), Some("/from/env.pdf"));
        assert_eq!(loaded.config.resume.filename.as_deref(), Some("File.pdf"));
        let naukri = loaded.config.provider(ProviderKind::Naukri);
        assert_eq!(naukri.username.as_deref(), Some("file-user"));
        assert_eq!(naukri.password.as_deref(), Some("env-pass"));
        assert_eq!(loaded.env_overrides, vec!["APP_RESUME_PATH", "APP_NAUKRI_PASSWORD"]);
    }

    #[test]
    fn test_blank_env_is_absent() {
        let mut config = AppConfig::default();
        config.provider_mut(ProviderKind::Monster).username = Some("kept".into());

        let applied =
            apply_env_from(&mut config, env(&[("APP_MONSTER_USERNAME", "   ")])).unwrap();

        assert!(applied.is_empty());
        assert_eq!(
            config.provider(ProviderKind::Monster).username.as_deref(),
            Some("kept")
        );
    }

    #[test]
    fn test_provider_fields() {
        let mut config = AppConfig::default();
        apply_env_from(
            &mut config,
            env(&[
                ("APP_INSTAHYRE_USERNAME", "me@example.com"),
                ("APP_INSTAHYRE_PASSWORD", "pw"),
                ("APP_INSTAHYRE_PRIORITY", "7"),
                ("APP_INSTAHYRE_BASE_URL", "http://127.0.0.1:9000"),
                ("APP_INSTAHYRE_USER_AGENT", "test-agent"),
                ("APP_INSTAHYRE_COLOR", "blue"),
            ]),
        )
        .unwrap();

        let settings = config.provider(ProviderKind::Instahyre);
        assert!(config.is_provider_enabled(ProviderKind::Instahyre));
        assert_eq!(settings.priority, Some(7));
        assert_eq!(settings.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(settings.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(config.priority(ProviderKind::Instahyre), 7);
    }

    #[test]
    fn test_http_fields() {
        let mut config = AppConfig::default();
        apply_env_from(
            &mut config,
            env(&[
                ("APP_HTTP_TIMEOUT_SECS", "5"),
                ("APP_HTTP_MAX_RETRIES", "2"),
                ("APP_HTTP_WIRE_LOG", "yes"),
            ]),
        )
        .unwrap();

        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.max_retries, 2);
        assert!(config.http.wire_log);
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = apply_env_from(
            &mut AppConfig::default(),
            env(&[("APP_NAUKRI_PRIORITY", "first")]),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidEnv { .. }));
        assert!(err.to_string().contains("APP_NAUKRI_PRIORITY"));
    }

    #[tokio::test]
    async fn test_env_password_matches_file_password() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(
            &path,
            r#"{"providers": {"monster": {"username": "jane", "password": "  pass word "}}}"#,
        )
        .await
        .unwrap();

        let from_file = load_with_env(Some(&path), Vec::new()).await.unwrap();
        let from_env = load_with_env(
            Some(&temp_dir.path().join("absent.json")),
            env(&[
                ("APP_NAUKRI_USERNAME", "  jane  "),
                ("APP_NAUKRI_PASSWORD", "  pass word "),
            ]),
        )
        .await
        .unwrap();

        let file_creds = from_file.config.credentials(ProviderKind::Monster).unwrap();
        let env_creds = from_env.config.credentials(ProviderKind::Naukri).unwrap();
        assert_eq!(env_creds.password, "  pass word ");
        assert_eq!(env_creds.password, file_creds.password);
        assert_eq!(env_creds.username, "jane");
    }

    #[test]
    fn test_zero_timeout_env_rejected() {
        let mut config = AppConfig::default();
        let err = apply_env_from(&mut config, env(&[("APP_HTTP_TIMEOUT_SECS", "0")])).unwrap_err();

        assert!(matches!(err, StoreError::InvalidEnv { .. }));
        assert!(err.to_string().contains("APP_HTTP_TIMEOUT_SECS"));
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_zero_timeout_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"http": {"timeout_secs": 0}}"#)
            .await
            .unwrap();

        let err = load_with_env(Some(&path), Vec::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(err.to_string().contains("timeout_secs"));

        let mut config = AppConfig::default();
        config.http.timeout_secs = 1;
        validate_http(&config).unwrap();
    }

    #[test]
    fn test_resume_artifact_requires_path_and_filename() {
        let mut config = AppConfig::default();
        let err = resume_artifact(&config).unwrap_err();
        assert!(err.to_string().contains("resume.path"));

        config.resume.path = Some("/cv.pdf".into());
        config.resume.filename = Some("  ".into());
        let err = resume_artifact(&config).unwrap_err();
        assert!(err.to_string().contains(ENV_RESUME_FILENAME));

        config.resume.filename = Some("Jane.pdf".into());
        let artifact = resume_artifact(&config).unwrap();
        assert_eq!(artifact.path(), Path::new("/cv.pdf"));
        assert_eq!(artifact.display_filename, "Jane.pdf");
    }

    #[tokio::test]
    async fn test_ensure_resume_readable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cv.pdf");

        let artifact = ResumeArtifact::new(&path, "cv.pdf");
        assert!(ensure_resume_readable(&artifact).await.is_err());

        tokio::fs::write(&path, b"%PDF").await.unwrap();
        ensure_resume_readable(&artifact).await.unwrap();

        let dir = ResumeArtifact::new(temp_dir.path(), "cv.pdf");
        assert!(ensure_resume_readable(&dir).await.is_err());
    }

    #[tokio::test]
    async fn test_init_writes_template_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("resumerefresh").join("config.json");

        init(&path, false).await.unwrap();
        let loaded = load_with_env(Some(&path), Vec::new()).await.unwrap();
        assert_eq!(loaded.config, template());
        assert!(!loaded.config.is_provider_enabled(ProviderKind::Naukri));

        let err = init(&path, false).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        init(&path, true).await.unwrap();
    }
}
