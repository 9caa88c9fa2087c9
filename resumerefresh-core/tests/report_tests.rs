//! Integration tests for core report and configuration types.

use std::time::Duration;

use chrono::Utc;
use resumerefresh_core::{
    AppConfig, ErrorKind, PipelineOutcome, ProviderKind, RefreshError, RunReport,
};

#[test]
fn test_report_serializes_records_in_run_order() {
    let report = RunReport::new(
        Utc::now(),
        Duration::from_secs(2),
        vec![
            PipelineOutcome::success("instahyre", Duration::from_millis(10)),
            PipelineOutcome::failure(
                "monster",
                RefreshError::upstream("uploadResumeStatus 500").in_step("monster", "upload_resume"),
                Duration::from_millis(20),
            ),
        ],
    );

    let json = serde_json::to_value(report.records()).unwrap();
    assert_eq!(json[0]["provider"], "instahyre");
    assert_eq!(json[1]["provider"], "monster");
    assert_eq!(json[1]["error_kind"], "upstream_semantic");
    assert_eq!(json[1]["step"], "upload_resume");
}

#[test]
fn test_config_file_shape() {
    let config: AppConfig = serde_json::from_str(
        r#"{
            "resume": { "path": "/home/me/resume.pdf", "filename": "Me_Resume.pdf" },
            "providers": {
                "instahyre": { "username": "me@example.com", "password": "pw", "priority": 7 }
            },
            "http": { "timeout_secs": 10, "wire_log": true }
        }"#,
    )
    .unwrap();

    assert_eq!(config.resume.filename.as_deref(), Some("Me_Resume.pdf"));
    assert_eq!(config.priority(ProviderKind::Instahyre), 7);
    assert_eq!(config.http.timeout_secs, 10);
    assert_eq!(config.http.max_retries, 0);
    assert!(config.http.wire_log);
}

#[test]
fn test_error_kind_survives_tagging() {
    let err = RefreshError::extraction("candidateId", "<html></html>").in_step("instahyre", "candidate_id");
    assert_eq!(err.kind(), ErrorKind::Extraction);
}
