//! Token extraction from fetched documents.
//!
//! Every pattern is fixed and known in advance; there is no general scraping.
//! A pattern that fails to match, or matches an empty value, is an
//! [`Extraction`](resumerefresh_core::ErrorKind::Extraction) failure carrying
//! the pattern and a sample of the searched text.

use regex::Regex;
use resumerefresh_core::RefreshError;

use crate::host::HttpResponse;

/// A compiled pattern that remembers its source for error reports.
///
/// Returns the first named group when the pattern has one, otherwise
/// capture group 1.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    regex: Regex,
    group: Option<String>,
}

impl TokenPattern {
    /// Compiles a pattern. It must contain at least one capture group.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() < 2 {
            return Err(regex::Error::Syntax(format!(
                "pattern `{pattern}` has no capture group"
            )));
        }
        let group = regex.capture_names().flatten().next().map(str::to_string);
        Ok(Self { regex, group })
    }

    /// Source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Extracts the captured value from `text`.
    pub fn extract(&self, text: &str) -> Result<String, RefreshError> {
        self.find(text)
            .ok_or_else(|| RefreshError::extraction(self.as_str(), text))
    }

    /// Extracts from the first raw `Set-Cookie` header that yields a value.
    pub fn extract_set_cookie(&self, response: &HttpResponse) -> Result<String, RefreshError> {
        let headers = response.set_cookies();
        headers
            .iter()
            .find_map(|raw| self.find(raw))
            .ok_or_else(|| RefreshError::extraction(self.as_str(), &headers.join("\n")))
    }

    fn find(&self, text: &str) -> Option<String> {
        let captures = self.regex.captures(text)?;
        let value = match &self.group {
            Some(name) => captures.name(name),
            None => captures.get(1),
        }?;
        (!value.as_str().is_empty()).then(|| value.as_str().to_string())
    }
}

/// Applies `pattern` to `text`.
pub fn extract(pattern: &TokenPattern, text: &str) -> Result<String, RefreshError> {
    pattern.extract(text)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use resumerefresh_core::ErrorKind;

    #[test]
    fn test_named_group() {
        let pattern = TokenPattern::new(r#"client_id="(?<id>[^"]+)""#).unwrap();
        let text = r#"var cfg={a:1,client_id="abc123",b:2};"#;
        assert_eq!(extract(&pattern, text).unwrap(), "abc123");
    }

    #[test]
    fn test_no_match_references_pattern() {
        let pattern = TokenPattern::new(r#"client_id="(?<id>[^"]+)""#).unwrap();
        let err = extract(&pattern, "function login(){}").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Extraction);
        match err {
            RefreshError::Extraction { pattern: p, sample } => {
                assert_eq!(p, r#"client_id="(?<id>[^"]+)""#);
                assert_eq!(sample, "function login(){}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_first_group_without_names() {
        let pattern = TokenPattern::new(r"candidateId\s*=\s*'(\d+)'").unwrap();
        assert_eq!(
            pattern.extract("<script>var candidateId = '98765';</script>").unwrap(),
            "98765"
        );
    }

    #[test]
    fn test_named_group_preferred_over_first() {
        let pattern = TokenPattern::new(r#"(attachCV)",d="(?<formKey>F[^"]+?)""#).unwrap();
        assert_eq!(pattern.extract(r#"x="attachCV",d="F51f8e7e54e205""#).unwrap(), "F51f8e7e54e205");
    }

    #[test]
    fn test_empty_capture_fails() {
        let pattern = TokenPattern::new(r"MSSOAT=([^;]*);").unwrap();
        assert!(pattern.extract("MSSOAT=; Path=/").is_err());
    }

    #[test]
    fn test_pattern_without_group_rejected() {
        assert!(TokenPattern::new(r"\d+").is_err());
    }

    #[test]
    fn test_set_cookie_first_usable_header_wins() {
        let pattern = TokenPattern::new(r"MSSOAT=([^;]+);").unwrap();
        let response = HttpResponse::new(200)
            .with_header("set-cookie", "MSSOAT=; Max-Age=0;")
            .with_header("set-cookie", "MSSOAT=first-token; Path=/;")
            .with_header("set-cookie", "MSSOAT=second-token; Path=/;");

        assert_eq!(pattern.extract_set_cookie(&response).unwrap(), "first-token");

        let empty = HttpResponse::new(200);
        assert_eq!(
            pattern.extract_set_cookie(&empty).unwrap_err().kind(),
            ErrorKind::Extraction
        );
    }
}
