//! Transport-agnostic HTTP exchange types and the gateway trait.
//!
//! Pipelines describe requests with [`HttpRequest`] and read answers from
//! [`HttpResponse`]; the [`HttpGateway`] implementation decides how the bytes
//! travel. Redirects are never followed by a gateway: a `3xx` comes back as
//! an ordinary response and [`HttpResponse::location`] resolves its target.

use std::fmt;

use async_trait::async_trait;
use resumerefresh_core::RefreshError;
use serde::de::DeserializeOwned;
use url::Url;

/// Characters of a failing body kept in a status error.
const BODY_SNIPPET_LIMIT: usize = 120;

// ============================================================================
// Gateway Trait
// ============================================================================

/// Sends one HTTP request and returns the raw response.
///
/// A response with any status is `Ok`; only failures to obtain a response
/// (connection, TLS, timeout) are `Err`, as [`RefreshError::Transport`].
#[async_trait]
pub trait HttpGateway: Send + Sync {
    /// Executes the request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RefreshError>;
}

// ============================================================================
// Request
// ============================================================================

/// HTTP methods used by the portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File field.
    File {
        /// Field name.
        name: String,
        /// File name sent in the part's disposition.
        file_name: String,
        /// MIME type of the file.
        content_type: String,
        /// File contents.
        bytes: Vec<u8>,
    },
}

impl MultipartPart {
    /// Creates a text part.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Creates a file part.
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// `application/json`.
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// `multipart/form-data`.
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Json(_) => "json",
            Self::Form(_) => "form",
            Self::Multipart(_) => "multipart",
        }
    }
}

/// An outgoing HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Extra headers, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Cookies, sent together in a single `Cookie` header.
    pub cookies: Vec<(String, String)>,
    /// Body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Creates a request with no headers, cookies, or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds `Authorization: Bearer <token>`.
    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Adds a cookie.
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Sets a URL-encoded form body.
    #[must_use]
    pub fn form<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Sets a multipart body.
    #[must_use]
    pub fn multipart(mut self, parts: Vec<MultipartPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Value of the `Cookie` header, if any cookies are set.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Returns the first header with this name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Response
// ============================================================================

/// A received HTTP response with the body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// URL the response came from.
    pub url: String,
    /// Headers with lowercase names, repeated names kept in order.
    pub headers: Vec<(String, String)>,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            url: String::new(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Adds a header (name is lowercased).
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and content type.
    #[must_use]
    pub fn with_json(self, body: &serde_json::Value) -> Self {
        self.with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    /// Returns true for a `2xx` status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the first value of a header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of a header, in order.
    pub fn headers_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Raw `Set-Cookie` header values.
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers_all("set-cookie")
    }

    /// Value of the first `Set-Cookie` with this name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.set_cookies().into_iter().find_map(|raw| {
            let pair = raw.split(';').next()?;
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim())
        })
    }

    /// Like [`cookie`](Self::cookie), but a missing or empty cookie is an
    /// extraction failure.
    pub fn require_cookie(&self, name: &str) -> Result<String, RefreshError> {
        match self.cookie(name) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(RefreshError::extraction(
                format!("Set-Cookie: {name}"),
                &self.set_cookies().join("\n"),
            )),
        }
    }

    /// Body as text (lossy UTF-8).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RefreshError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Returns `self` for a `2xx` status, otherwise a transport error
    /// carrying the status and the start of the body.
    pub fn error_for_status(self) -> Result<Self, RefreshError> {
        if self.is_success() {
            return Ok(self);
        }

        let reason = reqwest::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unexpected status");
        let snippet = resumerefresh_core::truncate_sample(self.text().trim(), BODY_SNIPPET_LIMIT);
        let message = if snippet.is_empty() {
            format!("{reason} from {}", self.url)
        } else {
            format!("{reason} from {}: {snippet}", self.url)
        };
        Err(RefreshError::http_status(self.status, message))
    }

    /// Target of a redirect, resolved against the response URL.
    pub fn location(&self) -> Result<String, RefreshError> {
        let raw = self
            .header("location")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                RefreshError::extraction(
                    "Location header",
                    &format!("HTTP {} with no Location", self.status),
                )
            })?;

        match Url::parse(&self.url) {
            Ok(base) => base
                .join(raw)
                .map(String::from)
                .map_err(|e| RefreshError::upstream(format!("invalid redirect target `{raw}`: {e}"))),
            Err(_) => Url::parse(raw)
                .map(String::from)
                .map_err(|e| RefreshError::upstream(format!("invalid redirect target `{raw}`: {e}"))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
