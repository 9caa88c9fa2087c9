//! Registry to orchestrator to pipelines, end to end.

mod common;

use std::sync::Arc;

use common::{config_with, context};
use resumerefresh_core::{ErrorKind, ProviderKind, RefreshError};
use resumerefresh_fetch::testing::ScriptedGateway;
use resumerefresh_fetch::{HttpResponse, Method, RunError};
use resumerefresh_providers::ProviderRegistry;
use serde_json::json;

const INSTAHYRE_LOGIN: &str = "https://www.instahyre.com/api/v1/user_login";
const NAUKRI_LOGIN: &str = "https://www.naukri.com/central-login-services/v1/login";
const NAUKRI_SCRIPT: &str = "https://static.naukimg.com/s/5/105/j/mnj_v152.min.js";
const MONSTER_SCRIPT: &str = "https://media.monsterindia.com/rio/public/js/login-app-service.js";

/// Scripts just enough for each provider's first steps to fail or pass.
fn gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .on(
            Method::Post,
            INSTAHYRE_LOGIN,
            HttpResponse::new(403).with_body("CSRF verification failed"),
        )
        .on(
            Method::Get,
            NAUKRI_SCRIPT,
            HttpResponse::new(200).with_body(r#"c="attachCV",d="Fkey""#),
        )
        .fail(
            Method::Post,
            NAUKRI_LOGIN,
            RefreshError::transport("connection reset by peer"),
        )
        .on(
            Method::Get,
            MONSTER_SCRIPT,
            HttpResponse::new(200).with_body("no client here"),
        )
}

#[tokio::test]
async fn test_no_credentials_runs_nothing() {
    let gateway = Arc::new(gateway());
    let (ctx, _files) = context(&gateway);

    let orchestrator = ProviderRegistry::orchestrator(&config_with(&[]), None).unwrap();
    let err = orchestrator.run(&ctx).await.unwrap_err();

    assert!(err.is_configuration());
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn test_every_provider_runs_despite_failures() {
    let gateway = Arc::new(gateway());
    let (ctx, _files) = context(&gateway);

    let orchestrator = ProviderRegistry::orchestrator(&config_with(ProviderKind::all()), None).unwrap();
    let err = orchestrator.run(&ctx).await.unwrap_err();

    let RunError::Failed(report) = err else {
        panic!("expected a failed run");
    };
    assert_eq!(report.failures().len(), 3);

    let kinds: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| (o.provider.as_str(), o.error().map(RefreshError::kind)))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("instahyre", Some(ErrorKind::Transport)),
            ("naukri", Some(ErrorKind::Transport)),
            ("monster", Some(ErrorKind::Extraction)),
        ]
    );

    let summary = report.summary();
    assert!(summary.contains("instahyre"));
    assert!(summary.contains("naukri"));
    assert!(summary.contains("monster"));
}

#[tokio::test]
async fn test_filter_runs_only_selected() {
    let gateway = Arc::new(gateway());
    let (ctx, _files) = context(&gateway);

    let filter = vec!["monster".to_string()];
    let orchestrator =
        ProviderRegistry::orchestrator(&config_with(ProviderKind::all()), Some(&filter)).unwrap();
    let err = orchestrator.run(&ctx).await.unwrap_err();

    assert_eq!(err.report().unwrap().outcomes.len(), 1);
    assert!(
        gateway
            .urls()
            .iter()
            .all(|url| url.starts_with("https://media.monsterindia.com"))
    );
}

#[tokio::test]
async fn test_priority_override_changes_run_order() {
    let gateway = Arc::new(gateway());
    let (ctx, _files) = context(&gateway);

    let mut config = config_with(&[ProviderKind::Instahyre, ProviderKind::Monster]);
    config.provider_mut(ProviderKind::Monster).priority = Some(0);

    let orchestrator = ProviderRegistry::orchestrator(&config, None).unwrap();
    let _ = orchestrator.run(&ctx).await;

    let urls = gateway.urls();
    assert_eq!(urls.first().map(String::as_str), Some(MONSTER_SCRIPT));
    assert_eq!(urls.last().map(String::as_str), Some(INSTAHYRE_LOGIN));
}

#[tokio::test]
async fn test_successful_provider_reported() {
    let gateway = Arc::new(
        gateway()
            .on(
                Method::Post,
                INSTAHYRE_LOGIN,
                HttpResponse::new(200)
                    .with_header("set-cookie", "sessionid=s; Path=/")
                    .with_header("set-cookie", "csrftoken=c; Path=/"),
            )
            .on(
                Method::Get,
                "https://www.instahyre.com/candidate/profile/",
                HttpResponse::new(200).with_body("candidateId = '3'"),
            )
            .on(
                Method::Get,
                "https://www.instahyre.com/api/v1/candidate/3",
                HttpResponse::new(200).with_json(&json!({"resume": {"id": 9}})),
            )
            .on(
                Method::Put,
                "https://www.instahyre.com/api/v1/resume/9",
                HttpResponse::new(200),
            ),
    );
    let (ctx, _files) = context(&gateway);

    let config = config_with(&[ProviderKind::Instahyre, ProviderKind::Naukri]);
    let err = ProviderRegistry::orchestrator(&config, None)
        .unwrap()
        .run(&ctx)
        .await
        .unwrap_err();

    let report = err.report().unwrap();
    assert_eq!(report.successes().len(), 1);
    assert_eq!(report.failures().len(), 1);
    assert!(report.outcome("instahyre").unwrap().is_success());
    assert_eq!(
        report.outcome("naukri").unwrap().error().and_then(RefreshError::origin),
        Some(("naukri", "login"))
    );
}
