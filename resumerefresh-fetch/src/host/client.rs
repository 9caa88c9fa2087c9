//! reqwest-backed [`HttpGateway`].
//!
//! Adds to the plain client:
//! - No automatic redirects
//! - One `Cookie` header per request
//! - Retries for connection failures, and for timeouts of `GET` requests
//! - Optional wire logging at trace level

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header, multipart, redirect};
use resumerefresh_core::{HttpSettings, RefreshError};
use tracing::{debug, instrument, trace, warn};

use super::http::{HttpGateway, HttpRequest, HttpResponse, Method, MultipartPart, RequestBody};
use crate::error::transport_error;
use crate::retry::{RetryStrategy, SendFailure};

/// User agent sent when a pipeline does not set its own.
const USER_AGENT: &str = concat!("ResumeRefresh/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Reqwest Gateway
// ============================================================================

/// Production gateway over a shared reqwest connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    inner: Client,
    retry: RetryStrategy,
    wire_log: bool,
}

impl ReqwestGateway {
    /// Creates a gateway with default HTTP settings.
    pub fn new() -> Result<Self, RefreshError> {
        Self::from_settings(&HttpSettings::default())
    }

    /// Creates a gateway from HTTP settings.
    pub fn from_settings(settings: &HttpSettings) -> Result<Self, RefreshError> {
        let inner = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RefreshError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            retry: RetryStrategy::from_max_retries(settings.max_retries),
            wire_log: settings.wire_log,
        })
    }

    /// Replaces the retry strategy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    fn build(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, RefreshError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.inner.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookies) = request.cookie_header() {
            builder = builder.header(header::COOKIE, cookies);
        }

        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
        };
        Ok(builder)
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RefreshError> {
        if self.wire_log {
            trace!(
                method = %request.method,
                url = %request.url,
                headers = request.headers.len(),
                cookies = request.cookies.len(),
                body = request.body.label(),
                "HTTP request"
            );
        }

        let mut attempt = 1;
        loop {
            let builder = self.build(&request)?;
            match execute(builder).await {
                Ok(response) => {
                    debug!(status = response.status, attempt, "Response received");
                    if self.wire_log {
                        trace!(
                            status = response.status,
                            url = %response.url,
                            headers = response.headers.len(),
                            bytes = response.body.len(),
                            "HTTP response"
                        );
                    }
                    return Ok(response);
                }
                Err(err)
                    if self.retry.should_retry(request.method, SendFailure::of(&err))
                        && self.retry.allows_another(attempt) =>
                {
                    let delay = self.retry.delay_after(attempt);
                    warn!(error = %err, attempt, delay = ?delay, "Request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(transport_error(&err)),
            }
        }
    }
}

async fn execute(builder: reqwest::RequestBuilder) -> Result<HttpResponse, reqwest::Error> {
    let response = builder.send().await?;

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status,
        url,
        headers,
        body,
    })
}

fn multipart_form(parts: &[MultipartPart]) -> Result<multipart::Form, RefreshError> {
    let mut form = multipart::Form::new();
    for part in parts {
        form = match part {
            MultipartPart::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let file = multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(|e| {
                        RefreshError::config(format!("invalid content type `{content_type}`: {e}"))
                    })?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

// ============================================================================
// Tests
// ============================================================================
