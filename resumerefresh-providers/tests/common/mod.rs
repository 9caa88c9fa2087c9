//! Shared fixtures for the pipeline tests.

#![allow(dead_code)]

use std::sync::Arc;

use resumerefresh_core::{AppConfig, ProviderKind, ResumeArtifact};
use resumerefresh_fetch::testing::{MemoryFiles, ScriptedGateway};
use resumerefresh_fetch::{HttpRequest, RefreshContext, RequestBody};

pub const RESUME_PATH: &str = "/home/jane/cv.pdf";
pub const RESUME_NAME: &str = "Jane_Doe_Resume.pdf";
pub const RESUME_BYTES: &[u8] = b"%PDF-1.4 test";
pub const RESUME_BASE64: &str = "JVBERi0xLjQgdGVzdA==";

/// Configuration with credentials for `kinds`.
pub fn config_with(kinds: &[ProviderKind]) -> AppConfig {
    let mut config = AppConfig::default();
    config.resume.path = Some(RESUME_PATH.into());
    config.resume.filename = Some(RESUME_NAME.into());
    for kind in kinds {
        let settings = config.provider_mut(*kind);
        settings.username = Some("jane@example.com".into());
        settings.password = Some("s3cret".into());
    }
    config
}

/// A context over `gateway` with the test resume on disk.
pub fn context(gateway: &Arc<ScriptedGateway>) -> (RefreshContext, Arc<MemoryFiles>) {
    context_with_files(
        gateway,
        MemoryFiles::new().with_file(RESUME_PATH, RESUME_BYTES.to_vec()),
    )
}

/// A context over `gateway` reading from `files`.
pub fn context_with_files(
    gateway: &Arc<ScriptedGateway>,
    files: MemoryFiles,
) -> (RefreshContext, Arc<MemoryFiles>) {
    let files = Arc::new(files);
    let ctx = RefreshContext::builder(ResumeArtifact::new(RESUME_PATH, RESUME_NAME))
        .http(Arc::clone(gateway) as _)
        .files(Arc::clone(&files) as _)
        .build()
        .unwrap();
    (ctx, files)
}

/// JSON body of a request.
pub fn json_body(request: &HttpRequest) -> &serde_json::Value {
    match &request.body {
        RequestBody::Json(value) => value,
        other => panic!("expected a JSON body, got {}", other.label()),
    }
}
