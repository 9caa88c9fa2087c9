//! Monster pipeline against a scripted gateway.

mod common;

use std::sync::Arc;

use common::{RESUME_BYTES, RESUME_NAME, config_with, context, json_body};
use resumerefresh_core::{ErrorKind, ProviderKind};
use resumerefresh_fetch::testing::ScriptedGateway;
use resumerefresh_fetch::{HttpResponse, Method, MultipartPart, RequestBody, ResumeRefresher};
use resumerefresh_providers::MonsterRefresher;
use serde_json::json;

const SCRIPT: &str = "https://media.monsterindia.com/rio/public/js/login-app-service.js";
const LOGIN: &str = "https://www.monsterindia.com/rio/login";
const AUTHORIZE: &str = "https://www.monsterindia.com/rio/oauth/authorize?client_id=cid-9";
const CALLBACK: &str = "https://www.monsterindia.com/rio/callback?code=abc";
const PROFILE: &str = "https://www.monsterindia.com/middleware/profileSettings?fields=personal_details";
const UPLOAD: &str = "https://www.monsterindia.com/middleware/upload-resume";
const PUBLISH: &str = "https://www.monsterindia.com/middleware/publish/events/field-level-update";

fn happy_gateway() -> ScriptedGateway {
    ScriptedGateway::new()
        .on(
            Method::Get,
            SCRIPT,
            HttpResponse::new(200).with_body(r#"e.exports={client_id="cid-9",scope:"seeker"}"#),
        )
        .on(
            Method::Post,
            LOGIN,
            HttpResponse::new(200)
                .with_header("set-cookie", "MRE=mre-1; Path=/; Secure")
                .with_json(&json!({"redirectUrl": "/rio/oauth/authorize?client_id=cid-9"})),
        )
        .on(
            Method::Get,
            AUTHORIZE,
            HttpResponse::new(302).with_header("location", "/rio/callback?code=abc"),
        )
        .on(
            Method::Get,
            CALLBACK,
            HttpResponse::new(200)
                .with_header("set-cookie", "JSESSIONID=j; Path=/")
                .with_header("set-cookie", "MSSOAT=session-1; Path=/; HttpOnly"),
        )
        .on(
            Method::Get,
            PROFILE,
            HttpResponse::new(200).with_json(&json!({
                "userProfile": {"personalDetailSection": {"personalDetails": {"profileId": 123456}}}
            })),
        )
        .on(
            Method::Post,
            UPLOAD,
            HttpResponse::new(200).with_json(&json!({
                "uploadResumeStatus": 200,
                "uploadResumeStatusText": "OK"
            })),
        )
        .on(Method::Post, PUBLISH, HttpResponse::new(200))
}

fn refresher() -> MonsterRefresher {
    MonsterRefresher::from_config(&config_with(&[ProviderKind::Monster])).unwrap()
}

#[tokio::test]
async fn test_happy_path() {
    let gateway = Arc::new(happy_gateway());
    let (ctx, files) = context(&gateway);

    refresher().refresh(&ctx).await.unwrap();

    assert_eq!(
        gateway.urls(),
        vec![SCRIPT, LOGIN, AUTHORIZE, CALLBACK, PROFILE, UPLOAD, PUBLISH]
    );
    assert_eq!(files.reads(), 1);

    let login = &gateway.requests_to(Method::Post, LOGIN)[0];
    assert_eq!(
        login.body,
        RequestBody::Form(vec![
            ("username".into(), "jane@example.com".into()),
            ("password".into(), "s3cret".into()),
            ("client_id".into(), "cid-9".into()),
        ])
    );
    assert_eq!(login.header_value("referer"), Some("https://www.monsterindia.com/"));
}

#[tokio::test]
async fn test_authorize_redirect_is_read_not_followed() {
    let gateway = Arc::new(happy_gateway());
    let (ctx, _files) = context(&gateway);

    refresher().refresh(&ctx).await.unwrap();

    let authorize = &gateway.requests_to(Method::Get, AUTHORIZE)[0];
    assert_eq!(authorize.cookie_header().as_deref(), Some("MRE=mre-1"));

    let callbacks = gateway.requests_to(Method::Get, CALLBACK);
    assert_eq!(callbacks.len(), 1);
    assert_eq!(callbacks[0].cookie_header().as_deref(), Some("MRE=mre-1"));
}

#[tokio::test]
async fn test_session_cookie_used_downstream() {
    let gateway = Arc::new(happy_gateway());
    let (ctx, _files) = context(&gateway);

    refresher().refresh(&ctx).await.unwrap();

    for (method, url) in [(Method::Get, PROFILE), (Method::Post, UPLOAD), (Method::Post, PUBLISH)] {
        let request = &gateway.requests_to(method, url)[0];
        assert_eq!(request.cookie_header().as_deref(), Some("MSSOAT=session-1"), "{url}");
    }

    let upload = &gateway.requests_to(Method::Post, UPLOAD)[0];
    assert_eq!(
        upload.body,
        RequestBody::Multipart(vec![MultipartPart::file(
            "file",
            RESUME_NAME,
            "application/pdf",
            RESUME_BYTES.to_vec()
        )])
    );

    let publish = &gateway.requests_to(Method::Post, PUBLISH)[0];
    assert_eq!(
        *json_body(publish),
        json!({"fieldNames": ["RESUME_UPLOAD"], "profileId": 123456, "tenant": "web"})
    );
}

#[tokio::test]
async fn test_missing_location_is_extraction_error() {
    let gateway = Arc::new(happy_gateway().on(Method::Get, AUTHORIZE, HttpResponse::new(200)));
    let (ctx, _files) = context(&gateway);

    let err = refresher().refresh(&ctx).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Extraction);
    assert_eq!(err.origin(), Some(("monster", "authorize")));
    assert_eq!(gateway.call_count(Method::Get, CALLBACK), 0);
}

#[tokio::test]
async fn test_embedded_upload_failure() {
    let gateway = Arc::new(happy_gateway().on(
        Method::Post,
        UPLOAD,
        HttpResponse::new(200).with_json(&json!({
            "uploadResumeStatus": 500,
            "uploadResumeStatusText": "Internal Server Error",
            "uploadResumeResponse": {
                "errorCode": "SERVER_ERROR",
                "errorMessage": "Something went wrong.",
                "detailErrorMessage": "failed to update seeker profile resume"
            }
        })),
    ));
    let (ctx, _files) = context(&gateway);

    let err = refresher().refresh(&ctx).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamSemantic);
    assert_eq!(err.origin(), Some(("monster", "upload_resume")));
    assert!(err.to_string().contains("failed to update seeker profile resume"));
    assert_eq!(gateway.call_count(Method::Post, PUBLISH), 0);
}

#[tokio::test]
async fn test_generic_status_body_failure() {
    let gateway = Arc::new(happy_gateway().on(
        Method::Post,
        UPLOAD,
        HttpResponse::new(200).with_json(&json!({"status": 500, "statusText": "Internal Server Error"})),
    ));
    let (ctx, _files) = context(&gateway);

    let err = refresher().refresh(&ctx).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamSemantic);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_client_id_failure_sends_no_credentials() {
    let gateway = Arc::new(happy_gateway().on(
        Method::Get,
        SCRIPT,
        HttpResponse::new(200).with_body("console.log('maintenance')"),
    ));
    let (ctx, _files) = context(&gateway);

    let err = refresher().refresh(&ctx).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Extraction);
    assert_eq!(err.origin(), Some(("monster", "client_id")));
    assert!(err.to_string().contains("client_id"));
    assert_eq!(gateway.call_count(Method::Post, LOGIN), 0);
}
