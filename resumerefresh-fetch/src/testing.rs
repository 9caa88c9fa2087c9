//! Test doubles for the host APIs.
//!
//! Available to this crate's tests and, with the `testing` feature, to
//! downstream crates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use resumerefresh_core::RefreshError;

use crate::host::{FileSource, HttpGateway, HttpRequest, HttpResponse, Method};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Scripted Gateway
// ============================================================================

/// Gateway answering from a fixed script and recording every request.
///
/// Routes match on method and exact URL. The same route answers every
/// matching request. An unscripted request fails with a transport error.
#[derive(Default)]
pub struct ScriptedGateway {
    routes: Mutex<HashMap<(Method, String), Result<HttpResponse, RefreshError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedGateway {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `method url` with `response`.
    #[must_use]
    pub fn on(self, method: Method, url: impl Into<String>, response: HttpResponse) -> Self {
        lock(&self.routes).insert((method, url.into()), Ok(response));
        self
    }

    /// Fails `method url` with `error`.
    #[must_use]
    pub fn fail(self, method: Method, url: impl Into<String>, error: RefreshError) -> Self {
        lock(&self.routes).insert((method, url.into()), Err(error));
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Requests sent to `url` with `method`.
    pub fn requests_to(&self, method: Method, url: &str) -> Vec<HttpRequest> {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }

    /// Number of requests sent to `url` with `method`.
    pub fn call_count(&self, method: Method, url: &str) -> usize {
        self.requests_to(method, url).len()
    }

    /// URLs requested, in order.
    pub fn urls(&self) -> Vec<String> {
        lock(&self.requests).iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait]
impl HttpGateway for ScriptedGateway {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RefreshError> {
        let key = (request.method, request.url.clone());
        lock(&self.requests).push(request);

        let answer = lock(&self.routes).get(&key).cloned();
        match answer {
            Some(Ok(response)) if response.url.is_empty() => Ok(response.with_url(key.1)),
            Some(answer) => answer,
            None => Err(RefreshError::transport(format!(
                "no scripted response for {} {}",
                key.0, key.1
            ))),
        }
    }
}

// ============================================================================
// Memory Files
// ============================================================================

/// File source backed by a map, counting reads.
#[derive(Debug, Default)]
pub struct MemoryFiles {
    files: HashMap<PathBuf, Vec<u8>>,
    reads: AtomicUsize,
}

impl MemoryFiles {
    /// Creates an empty file source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), bytes.into());
        self
    }

    /// Number of successful reads so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSource for MemoryFiles {
    async fn read_all(&self, path: &Path) -> Result<Vec<u8>, RefreshError> {
        let bytes = self.files.get(path).cloned().ok_or_else(|| {
            RefreshError::config(format!("cannot read resume file {}", path.display()))
        })?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_gateway_records_and_answers() {
        let gateway = ScriptedGateway::new().on(
            Method::Get,
            "https://example.com/a",
            HttpResponse::new(200).with_body("hello"),
        );

        let response = gateway
            .send(HttpRequest::get("https://example.com/a"))
            .await
            .unwrap();
        assert_eq!(response.text(), "hello");
        assert_eq!(response.url, "https://example.com/a");

        let err = gateway
            .send(HttpRequest::post("https://example.com/a"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no scripted response"));

        assert_eq!(gateway.requests().len(), 2);
        assert_eq!(gateway.call_count(Method::Get, "https://example.com/a"), 1);
    }

    #[tokio::test]
    async fn test_memory_files() {
        let files = MemoryFiles::new().with_file("/cv.pdf", b"%PDF".to_vec());
        assert_eq!(files.read_all(Path::new("/cv.pdf")).await.unwrap(), b"%PDF");
        assert!(files.read_all(Path::new("/other.pdf")).await.is_err());
        assert_eq!(files.reads(), 1);
    }
}
