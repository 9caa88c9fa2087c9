//! Instahyre web API client.

use std::sync::{Arc, LazyLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use resumerefresh_core::{ProviderCredentials, RefreshError};
use resumerefresh_fetch::{HttpGateway, Method, TokenPattern};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::descriptor::Site;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint.
pub const LOGIN_ENDPOINT: &str = "/api/v1/user_login";

/// Profile page embedding the candidate id.
pub const PROFILE_PAGE: &str = "/candidate/profile/";

/// Candidate record endpoint prefix.
pub const CANDIDATE_ENDPOINT: &str = "/api/v1/candidate/";

/// Resume endpoint prefix.
pub const RESUME_ENDPOINT: &str = "/api/v1/resume/";

const LIMITED_CANDIDATE_URI: &str = "/api/v1/limited_candidate/";

const SESSION_COOKIE: &str = "sessionid";
const CSRF_COOKIE: &str = "csrftoken";

static CANDIDATE_ID: LazyLock<TokenPattern> = LazyLock::new(|| {
    TokenPattern::new(r"candidateId\s*=\s*'(?<candidateId>\d+)'").expect("Invalid regex")
});

// ============================================================================
// Exchange Types
// ============================================================================

/// Cookies returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct InstahyreSession {
    /// `sessionid` cookie.
    pub session_id: String,
    /// `csrftoken` cookie, echoed as `x-csrftoken` on writes.
    pub csrf_token: String,
}

impl std::fmt::Debug for InstahyreSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstahyreSession").finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct CandidateRecord {
    resume: CandidateResume,
}

#[derive(Debug, Deserialize)]
struct CandidateResume {
    id: u64,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Instahyre endpoints.
pub struct InstahyreClient {
    http: Arc<dyn HttpGateway>,
    site: Site,
}

impl InstahyreClient {
    /// Creates a client for `site`.
    pub fn new(http: Arc<dyn HttpGateway>, site: Site) -> Self {
        Self { http, site }
    }

    /// Logs in and returns the session cookies.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<InstahyreSession, RefreshError> {
        let request = self
            .site
            .request(Method::Post, self.site.url(LOGIN_ENDPOINT))
            .json(json!({
                "email": credentials.username,
                "password": credentials.password,
            }));

        let response = self.http.send(request).await?.error_for_status()?;
        let session = InstahyreSession {
            session_id: response.require_cookie(SESSION_COOKIE)?,
            csrf_token: response.require_cookie(CSRF_COOKIE)?,
        };
        debug!("Login accepted");
        Ok(session)
    }

    /// Reads the numeric candidate id embedded in the profile page.
    #[instrument(skip_all)]
    pub async fn candidate_id(&self, session: &InstahyreSession) -> Result<String, RefreshError> {
        let request = self
            .site
            .request(Method::Get, self.site.url(PROFILE_PAGE))
            .cookie(SESSION_COOKIE, session.session_id.as_str());

        let page = self.http.send(request).await?.error_for_status()?;
        let candidate_id = CANDIDATE_ID.extract(&page.text())?;
        debug!(candidate_id = %candidate_id, "Found candidate id");
        Ok(candidate_id)
    }

    /// Reads the id of the candidate's current resume.
    #[instrument(skip_all, fields(candidate_id = %candidate_id))]
    pub async fn resume_id(
        &self,
        session: &InstahyreSession,
        candidate_id: &str,
    ) -> Result<u64, RefreshError> {
        let request = self
            .site
            .request(Method::Get, self.site.url(&format!("{CANDIDATE_ENDPOINT}{candidate_id}")))
            .cookie(SESSION_COOKIE, session.session_id.as_str());

        let record: CandidateRecord = self.http.send(request).await?.error_for_status()?.json()?;
        debug!(resume_id = record.resume.id, "Found resume id");
        Ok(record.resume.id)
    }

    /// Replaces the resume in place.
    #[instrument(skip_all, fields(candidate_id = %candidate_id, resume_id = resume_id, filename = %filename))]
    pub async fn upload_resume(
        &self,
        session: &InstahyreSession,
        candidate_id: &str,
        resume_id: u64,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), RefreshError> {
        let resource_uri = format!("{RESUME_ENDPOINT}{resume_id}");
        let request = self
            .site
            .request(Method::Put, self.site.url(&resource_uri))
            .cookie(SESSION_COOKIE, session.session_id.as_str())
            .cookie(CSRF_COOKIE, session.csrf_token.as_str())
            .header("x-csrftoken", session.csrf_token.as_str())
            .json(json!({
                "candidate": format!("{LIMITED_CANDIDATE_URI}{candidate_id}"),
                "resource_uri": resource_uri,
                "title": filename,
                "file_b64": STANDARD.encode(bytes),
                "calculate_opps": true,
            }));

        self.http.send(request).await?.error_for_status()?;
        debug!(bytes = bytes.len(), "Resume replaced");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
