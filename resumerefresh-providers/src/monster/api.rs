//! Monster (foundit) web API client.
//!
//! Login is a small OAuth dance: a public script carries the client id, the
//! login form returns an `MRE` cookie plus an authorize URL, the authorize
//! URL redirects to a callback, and the callback sets the `MSSOAT` session
//! cookie used by every later call. Redirects are read, never followed.

use std::sync::{Arc, LazyLock};

use resumerefresh_core::{ProviderCredentials, RefreshError};
use resumerefresh_fetch::{HttpGateway, HttpResponse, Method, MultipartPart, TokenPattern};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use crate::descriptor::Site;

// ============================================================================
// Constants
// ============================================================================

/// Public login script embedding the OAuth client id.
pub const LOGIN_SCRIPT_URL: &str = "https://media.monsterindia.com/rio/public/js/login-app-service.js";

/// Login form endpoint.
pub const LOGIN_ENDPOINT: &str = "/rio/login";

/// Profile settings endpoint.
pub const PROFILE_ENDPOINT: &str = "/middleware/profileSettings?fields=personal_details";

/// Resume upload endpoint.
pub const UPLOAD_ENDPOINT: &str = "/middleware/upload-resume";

/// Profile change event endpoint.
pub const PUBLISH_ENDPOINT: &str = "/middleware/publish/events/field-level-update";

const LOGIN_COOKIE: &str = "MRE";
const SESSION_COOKIE: &str = "MSSOAT";
const UPLOAD_OK: i64 = 200;

static CLIENT_ID: LazyLock<TokenPattern> = LazyLock::new(|| {
    TokenPattern::new(r#"client_id="(?<clientId>[^"]+?)""#).expect("Invalid regex")
});

static SESSION_TOKEN: LazyLock<TokenPattern> = LazyLock::new(|| {
    TokenPattern::new(r"MSSOAT=(?<mainCookie>[^;]+);").expect("Invalid regex")
});

// ============================================================================
// Exchange Types
// ============================================================================

/// Result of the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginGrant {
    /// `MRE` cookie.
    pub login_cookie: String,
    /// Absolute authorize URL.
    pub redirect_url: String,
}

impl std::fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginGrant")
            .field("redirect_url", &self.redirect_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileSettings {
    user_profile: UserProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserProfile {
    personal_detail_section: PersonalDetailSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonalDetailSection {
    personal_details: PersonalDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonalDetails {
    profile_id: Value,
}

/// Body of the upload endpoint. The endpoint answers `200 OK` even when the
/// upload was rejected; the status inside the body is what counts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    #[serde(alias = "status")]
    upload_resume_status: Option<i64>,
    #[serde(default, alias = "statusText")]
    upload_resume_status_text: Option<String>,
    #[serde(default)]
    upload_resume_response: Option<UploadDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadDetail {
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    detail_error_message: Option<String>,
}

impl UploadResponse {
    fn into_result(self) -> Result<(), RefreshError> {
        if self.upload_resume_status == Some(UPLOAD_OK) {
            return Ok(());
        }

        let status = self
            .upload_resume_status
            .map_or_else(|| "missing".to_string(), |s| s.to_string());
        let mut message = format!("resume upload rejected with status {status}");
        if let Some(text) = self.upload_resume_status_text.filter(|t| !t.is_empty()) {
            message.push_str(&format!(" ({text})"));
        }
        let detail = self.upload_resume_response.unwrap_or_default();
        for part in [detail.error_message, detail.detail_error_message]
            .into_iter()
            .flatten()
            .filter(|m| !m.is_empty())
        {
            message.push_str(": ");
            message.push_str(&part);
        }
        Err(RefreshError::upstream(message))
    }
}

/// Profile ids come back as strings or numbers; the publish event wants a
/// bare number whenever the id is numeric.
fn publishable_profile_id(profile_id: &str) -> Value {
    profile_id
        .parse::<u64>()
        .map_or_else(|_| Value::String(profile_id.to_string()), Value::from)
}

/// Passes `2xx` and `3xx` responses through.
fn allow_redirect(response: HttpResponse) -> Result<HttpResponse, RefreshError> {
    if (300..400).contains(&response.status) {
        Ok(response)
    } else {
        response.error_for_status()
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Monster endpoints.
pub struct MonsterClient {
    http: Arc<dyn HttpGateway>,
    site: Site,
}

impl MonsterClient {
    /// Creates a client for `site`.
    pub fn new(http: Arc<dyn HttpGateway>, site: Site) -> Self {
        Self { http, site }
    }

    /// Reads the OAuth client id from the public login script.
    #[instrument(skip_all)]
    pub async fn client_id(&self) -> Result<String, RefreshError> {
        let request = self.site.request(Method::Get, LOGIN_SCRIPT_URL);
        let script = self.http.send(request).await?.error_for_status()?;
        let client_id = CLIENT_ID.extract(&script.text())?;
        debug!(client_id = %client_id, "Found client id");
        Ok(client_id)
    }

    /// Submits the login form.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        credentials: &ProviderCredentials,
        client_id: &str,
    ) -> Result<LoginGrant, RefreshError> {
        let url = self.site.url(LOGIN_ENDPOINT);
        let request = self.site.request(Method::Post, url.as_str()).form([
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("client_id", client_id),
        ]);

        let response = self.http.send(request).await?.error_for_status()?;
        let login_cookie = response.require_cookie(LOGIN_COOKIE)?;
        let body: LoginResponse = response.json()?;
        let redirect = body
            .redirect_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RefreshError::upstream("login response has no redirectUrl"))?;

        let redirect_url = Url::parse(&url)
            .and_then(|base| base.join(redirect.trim()))
            .map(String::from)
            .map_err(|e| RefreshError::upstream(format!("invalid redirectUrl `{redirect}`: {e}")))?;

        debug!(redirect_url = %redirect_url, "Login accepted");
        Ok(LoginGrant {
            login_cookie,
            redirect_url,
        })
    }

    /// Calls the authorize URL and returns the callback it redirects to.
    #[instrument(skip_all)]
    pub async fn authorize(&self, grant: &LoginGrant) -> Result<String, RefreshError> {
        let request = self
            .site
            .request(Method::Get, grant.redirect_url.as_str())
            .cookie(LOGIN_COOKIE, grant.login_cookie.as_str());

        let response = allow_redirect(self.http.send(request).await?)?;
        let callback = response.location()?;
        debug!(callback = %callback, "Authorized");
        Ok(callback)
    }

    /// Calls the callback and captures the `MSSOAT` session cookie.
    #[instrument(skip_all)]
    pub async fn session(&self, grant: &LoginGrant, callback: &str) -> Result<String, RefreshError> {
        let request = self
            .site
            .request(Method::Get, callback)
            .cookie(LOGIN_COOKIE, grant.login_cookie.as_str());

        let response = allow_redirect(self.http.send(request).await?)?;
        let token = SESSION_TOKEN.extract_set_cookie(&response)?;
        debug!("Session established");
        Ok(token)
    }

    /// Reads the profile id.
    #[instrument(skip_all)]
    pub async fn profile_id(&self, session: &str) -> Result<String, RefreshError> {
        let request = self
            .site
            .request(Method::Get, self.site.url(PROFILE_ENDPOINT))
            .cookie(SESSION_COOKIE, session);

        let settings: ProfileSettings = self.http.send(request).await?.error_for_status()?.json()?;
        let details = settings.user_profile.personal_detail_section.personal_details;
        let profile_id = match details.profile_id {
            Value::String(id) if !id.is_empty() => id,
            Value::Number(id) => id.to_string(),
            other => return Err(RefreshError::upstream(format!("unexpected profileId {other}"))),
        };
        debug!(profile_id = %profile_id, "Found profile id");
        Ok(profile_id)
    }

    /// Uploads the resume file.
    #[instrument(skip_all, fields(filename = %filename))]
    pub async fn upload_resume(
        &self,
        session: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), RefreshError> {
        let size = bytes.len();
        let request = self
            .site
            .request(Method::Post, self.site.url(UPLOAD_ENDPOINT))
            .cookie(SESSION_COOKIE, session)
            .multipart(vec![MultipartPart::file("file", filename, content_type, bytes)]);

        let response = self.http.send(request).await?;
        let parsed: Result<UploadResponse, _> = response.json();
        match parsed {
            Ok(body) if body.upload_resume_status.is_some() => body.into_result()?,
            _ => {
                response.error_for_status()?;
                return Err(RefreshError::upstream(
                    "upload response has no uploadResumeStatus",
                ));
            }
        }
        debug!(bytes = size, "Resume uploaded");
        Ok(())
    }

    /// Announces the resume change on the profile.
    #[instrument(skip_all, fields(profile_id = %profile_id))]
    pub async fn publish_update(&self, session: &str, profile_id: &str) -> Result<(), RefreshError> {
        let request = self
            .site
            .request(Method::Post, self.site.url(PUBLISH_ENDPOINT))
            .cookie(SESSION_COOKIE, session)
            .json(json!({
                "fieldNames": ["RESUME_UPLOAD"],
                "profileId": publishable_profile_id(profile_id),
                "tenant": "web",
            }));

        self.http.send(request).await?.error_for_status()?;
        debug!("Profile update published");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
