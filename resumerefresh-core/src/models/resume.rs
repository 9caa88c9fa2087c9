//! The resume file being refreshed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The resume file uploaded to every provider during a run.
///
/// Constructed once from configuration and never mutated; each pipeline
/// that uploads reads the bytes itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeArtifact {
    /// Location of the file on disk.
    pub path: PathBuf,
    /// File name shown by the portals (e.g. `Jane_Doe_Resume.pdf`).
    pub display_filename: String,
}

impl ResumeArtifact {
    /// Creates a new artifact.
    pub fn new(path: impl Into<PathBuf>, display_filename: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display_filename: display_filename.into(),
        }
    }

    /// Returns the path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// MIME type sent alongside the file, derived from the display name.
    pub fn content_type(&self) -> &'static str {
        let extension = Path::new(&self.display_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("rtf") => "application/rtf",
            _ => "application/pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            ResumeArtifact::new("/tmp/a", "Resume.PDF").content_type(),
            "application/pdf"
        );
        assert_eq!(
            ResumeArtifact::new("/tmp/a", "resume.docx").content_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(
            ResumeArtifact::new("/tmp/a", "resume").content_type(),
            "application/pdf"
        );
    }
}
