//! Shared collaborators for a refresh run.
//!
//! The context is handed to every refresher and gives access to the HTTP
//! gateway, the file source and the resume being uploaded.

use std::future::Future;
use std::sync::Arc;

use resumerefresh_core::{HttpSettings, RefreshError, ResumeArtifact};

use crate::host::{FileSource, HttpGateway, LocalFiles, ReqwestGateway};

// ============================================================================
// Refresh Context
// ============================================================================

/// Context provided to refreshers.
pub struct RefreshContext {
    /// HTTP gateway (connection pool shared by all providers).
    pub http: Arc<dyn HttpGateway>,
    /// Source of the resume bytes.
    pub files: Arc<dyn FileSource>,
    /// The resume to upload.
    pub resume: ResumeArtifact,
}

impl RefreshContext {
    /// Creates a builder.
    pub fn builder(resume: ResumeArtifact) -> RefreshContextBuilder {
        RefreshContextBuilder::new(resume)
    }

    /// Returns a future that reads the resume bytes.
    ///
    /// The future owns its handles, so a pipeline step can hold it without
    /// borrowing the context. Nothing is read until it is polled.
    pub fn read_resume(
        &self,
    ) -> impl Future<Output = Result<Vec<u8>, RefreshError>> + Send + 'static {
        let files = Arc::clone(&self.files);
        let path = self.resume.path().to_path_buf();
        async move { files.read_all(&path).await }
    }
}

impl std::fmt::Debug for RefreshContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshContext")
            .field("resume", &self.resume)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Refresh Context Builder
// ============================================================================

/// Builder for constructing a [`RefreshContext`].
pub struct RefreshContextBuilder {
    resume: ResumeArtifact,
    http: Option<Arc<dyn HttpGateway>>,
    files: Option<Arc<dyn FileSource>>,
    http_settings: HttpSettings,
}

impl RefreshContextBuilder {
    /// Creates a new builder.
    pub fn new(resume: ResumeArtifact) -> Self {
        Self {
            resume,
            http: None,
            files: None,
            http_settings: HttpSettings::default(),
        }
    }

    /// Sets the HTTP gateway.
    #[must_use]
    pub fn http(mut self, http: Arc<dyn HttpGateway>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the file source.
    #[must_use]
    pub fn files(mut self, files: Arc<dyn FileSource>) -> Self {
        self.files = Some(files);
        self
    }

    /// Settings for the default gateway.
    #[must_use]
    pub fn http_settings(mut self, settings: HttpSettings) -> Self {
        self.http_settings = settings;
        self
    }

    /// Builds the context, creating a [`ReqwestGateway`] if none was set.
    pub fn build(self) -> Result<RefreshContext, RefreshError> {
        let http: Arc<dyn HttpGateway> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestGateway::from_settings(&self.http_settings)?),
        };

        Ok(RefreshContext {
            http,
            files: self.files.unwrap_or_else(|| Arc::new(LocalFiles::new())),
            resume: self.resume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryFiles, ScriptedGateway};

    #[test]
    fn test_builder_defaults() {
        let ctx = RefreshContext::builder(ResumeArtifact::new("/tmp/cv.pdf", "Cv.pdf"))
            .build()
            .unwrap();
        assert_eq!(ctx.resume.display_filename, "Cv.pdf");
        assert!(format!("{ctx:?}").contains("Cv.pdf"));
    }

    #[tokio::test]
    async fn test_read_resume_is_lazy() {
        let files = Arc::new(MemoryFiles::new().with_file("/tmp/cv.pdf", b"%PDF".to_vec()));
        let ctx = RefreshContext::builder(ResumeArtifact::new("/tmp/cv.pdf", "Cv.pdf"))
            .http(Arc::new(ScriptedGateway::new()))
            .files(Arc::clone(&files) as Arc<dyn FileSource>)
            .build()
            .unwrap();

        let read = ctx.read_resume();
        drop(ctx);
        assert_eq!(files.reads(), 0);
        assert_eq!(read.await.unwrap(), b"%PDF");
        assert_eq!(files.reads(), 1);
    }
}
