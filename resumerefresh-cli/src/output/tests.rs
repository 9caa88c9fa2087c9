//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use resumerefresh_core::{AppConfig, PipelineOutcome, ProviderKind, RefreshError, RunReport};
use resumerefresh_store::LoadedConfig;

fn mixed_report() -> RunReport {
    RunReport::new(
        Utc::now(),
        Duration::from_millis(3_400),
        vec![
            PipelineOutcome::success("instahyre", Duration::from_millis(850)),
            PipelineOutcome::failure(
                "naukri",
                RefreshError::http_status(401, "invalid credentials").in_step("naukri", "login"),
                Duration::from_millis(1_200),
            ),
            PipelineOutcome::success("monster", Duration::from_millis(1_350)),
        ],
    )
}

fn loaded_config() -> LoadedConfig {
    let mut config = AppConfig::default();
    config.resume.path = Some("/home/jane/cv.pdf".into());
    config.resume.filename = Some("Jane_Doe.pdf".into());
    let naukri = config.provider_mut(ProviderKind::Naukri);
    naukri.username = Some("jane@example.com".into());
    naukri.password = Some("hunter2".into());

    LoadedConfig {
        config,
        path: PathBuf::from("/home/jane/.config/resumerefresh/config.json"),
        file_found: false,
        env_overrides: vec!["APP_NAUKRI_PASSWORD".into()],
    }
}

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{TextFormatter, format_duration};
    use super::*;
    use resumerefresh_providers::ProviderRegistry;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(1_200)), "1.2s");
        assert_eq!(format_duration(Duration::ZERO), "0ms");
    }

    #[test]
    fn test_report_lists_every_provider() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_report(&mixed_report());

        assert!(output.contains("✓ Instahyre"));
        assert!(output.contains("✗ Naukri"));
        assert!(output.contains("✓ Monster"));
        assert!(output.contains("2 succeeded, 1 failed"));
    }

    #[test]
    fn test_failed_outcome_names_kind_and_step() {
        let formatter = TextFormatter::new(false);
        let report = mixed_report();
        let line = formatter.format_outcome(&report.outcomes[1]);

        assert!(line.contains("Transport at login"), "{line}");
        assert!(line.contains("HTTP 401"), "{line}");
        assert!(line.contains("invalid credentials"), "{line}");
    }

    #[test]
    fn test_no_colors_when_disabled() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_report(&mixed_report());
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_colors_when_enabled() {
        let formatter = TextFormatter::new(true);
        let output = formatter.format_report(&mixed_report());
        assert!(output.contains("\x1b[32m✓"), "Successes should be green");
        assert!(output.contains("\x1b[31m✗"), "Failures should be red");
    }

    #[test]
    fn test_unknown_provider_name_kept() {
        let formatter = TextFormatter::new(false);
        let line = formatter.format_outcome(&PipelineOutcome::success("indeed", Duration::ZERO));
        assert!(line.contains("indeed"));
    }

    #[test]
    fn test_provider_line() {
        let formatter = TextFormatter::new(false);
        let config = loaded_config().config;
        let registrations = ProviderRegistry::registrations(&config);

        let naukri = registrations
            .iter()
            .find(|r| r.kind == ProviderKind::Naukri)
            .unwrap();
        let desc = ProviderRegistry::get(ProviderKind::Naukri).unwrap();
        let line = formatter.format_provider_line(desc, naukri);
        assert!(line.contains("naukri"));
        assert!(line.contains("99"));
        assert!(line.contains("enabled"));

        let monster = registrations
            .iter()
            .find(|r| r.kind == ProviderKind::Monster)
            .unwrap();
        let desc = ProviderRegistry::get(ProviderKind::Monster).unwrap();
        assert!(formatter.format_provider_line(desc, monster).contains("no credentials"));
    }

    #[test]
    fn test_config_redacts_password() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_config(&loaded_config());

        assert!(!output.contains("hunter2"));
        assert!(output.contains("********"));
        assert!(output.contains("jane@example.com"));
        assert!(output.contains("/home/jane/cv.pdf as Jane_Doe.pdf"));
        assert!(output.contains("not found, using defaults"));
        assert!(output.contains("APP_NAUKRI_PASSWORD"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use super::*;
    use resumerefresh_providers::ProviderRegistry;
    use serde_json::Value;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let output = formatter.format(&serde_json::json!({"a": 1})).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(output, r#"{"a":1}"#);
    }

    #[test]
    fn test_report_json() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_report(&mixed_report()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["duration_ms"], 3_400);
        assert_eq!(value["providers"].as_array().unwrap().len(), 3);

        let naukri = &value["providers"][1];
        assert_eq!(naukri["provider"], "naukri");
        assert_eq!(naukri["success"], false);
        assert_eq!(naukri["error_kind"], "transport");
        assert_eq!(naukri["step"], "login");

        let instahyre = &value["providers"][0];
        assert_eq!(instahyre["success"], true);
        assert!(instahyre.get("error").is_none());
    }

    #[test]
    fn test_providers_json() {
        let formatter = JsonFormatter::new(false);
        let registrations = ProviderRegistry::registrations(&loaded_config().config);
        let output = formatter.format_providers(&registrations).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        let ids: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["instahyre", "naukri", "monster"]);
        assert_eq!(value[1]["enabled"], true);
        assert_eq!(value[2]["enabled"], false);
        assert_eq!(value[2]["priority"], 999);
    }

    #[test]
    fn test_config_json_is_redacted() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_config(&loaded_config()).unwrap();

        assert!(!output.contains("hunter2"));
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["config"]["providers"]["naukri"]["password"], "********");
        assert_eq!(value["file_found"], false);
    }
}
