//! Naukri API client.
//!
//! Naukri splits the work across three hosts: the main site for login and
//! profile operations, a static asset host whose bundle carries the upload
//! form key, and a file validation service that receives the file itself.

use std::sync::{Arc, LazyLock};

use rand::Rng;
use resumerefresh_core::{ProviderCredentials, RefreshError};
use resumerefresh_fetch::{HttpGateway, HttpRequest, Method, MultipartPart, TokenPattern};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::descriptor::Site;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint.
pub const LOGIN_ENDPOINT: &str = "/central-login-services/v1/login";

/// Dashboard endpoint carrying the profile id.
pub const DASHBOARD_ENDPOINT: &str =
    "/servicegateway-mynaukri/resman-aggregator-services/v0/users/self/dashboard";

/// Prefix of the per-profile endpoints.
pub const PROFILES_ENDPOINT: &str =
    "/servicegateway-mynaukri/resman-aggregator-services/v0/users/self/profiles/";

/// Script bundle embedding the upload form key.
pub const FORM_KEY_SCRIPT_URL: &str = "https://static.naukimg.com/s/5/105/j/mnj_v152.min.js";

/// File validation service.
pub const FILE_UPLOAD_URL: &str = "https://filevalidation.naukri.com/file";

const AUTH_COOKIE: &str = "nauk_at";
const FILE_KEY_PREFIX: char = 'U';
const FILE_KEY_LENGTH: usize = 13;
const FILE_KEY_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

static FORM_KEY: LazyLock<TokenPattern> = LazyLock::new(|| {
    TokenPattern::new(r#"="attachCV",d="(?<formKey>F[^"]+?)""#).expect("Invalid regex")
});

// ============================================================================
// Exchange Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    cookies: Vec<LoginCookie>,
}

#[derive(Debug, Deserialize)]
struct LoginCookie {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    dashboard: Dashboard,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    profile_id: String,
}

/// Generates a client-side file key: `U` followed by 13 alphanumerics.
pub fn generate_file_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut key = String::with_capacity(FILE_KEY_LENGTH + 1);
    key.push(FILE_KEY_PREFIX);
    key.extend(
        (0..FILE_KEY_LENGTH)
            .map(|_| char::from(FILE_KEY_ALPHABET[rng.gen_range(0..FILE_KEY_ALPHABET.len())])),
    );
    key
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Naukri endpoints.
pub struct NaukriClient {
    http: Arc<dyn HttpGateway>,
    site: Site,
}

impl NaukriClient {
    /// Creates a client for `site`.
    pub fn new(http: Arc<dyn HttpGateway>, site: Site) -> Self {
        Self { http, site }
    }

    fn profile_url(&self, profile_id: &str, action: &str) -> String {
        self.site
            .url(&format!("{PROFILES_ENDPOINT}{profile_id}/{action}"))
    }

    fn profile_request(&self, url: String, token: &str, method_override: &str) -> HttpRequest {
        self.site
            .request(Method::Post, url)
            .header("appid", "105")
            .header("systemid", "105")
            .bearer(token)
            .header("x-http-method-override", method_override)
    }

    /// Logs in and returns the bearer token.
    ///
    /// The login response must list exactly one `nauk_at` cookie.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &ProviderCredentials) -> Result<String, RefreshError> {
        let request = self
            .site
            .request(Method::Post, self.site.url(LOGIN_ENDPOINT))
            .header("appid", "103")
            .header("systemid", "jobseeker")
            .json(json!({
                "username": credentials.username,
                "password": credentials.password,
            }));

        let response: LoginResponse = self.http.send(request).await?.error_for_status()?.json()?;
        let mut tokens = response
            .cookies
            .into_iter()
            .filter(|c| c.name == AUTH_COOKIE)
            .map(|c| c.value);

        match (tokens.next(), tokens.next()) {
            (Some(token), None) if !token.is_empty() => {
                debug!("Login accepted");
                Ok(token)
            }
            (Some(_), Some(_)) => Err(RefreshError::upstream(format!(
                "login returned more than one {AUTH_COOKIE} cookie"
            ))),
            _ => Err(RefreshError::upstream(format!(
                "login response has no {AUTH_COOKIE} cookie"
            ))),
        }
    }

    /// Reads the profile id from the dashboard.
    #[instrument(skip_all)]
    pub async fn profile_id(&self, token: &str) -> Result<String, RefreshError> {
        let request = self
            .site
            .request(Method::Get, self.site.url(DASHBOARD_ENDPOINT))
            .header("appid", "105")
            .header("systemid", "Naukri")
            .header("accept", "application/json")
            .bearer(token);

        let response: DashboardResponse =
            self.http.send(request).await?.error_for_status()?.json()?;
        let profile_id = response.dashboard.profile_id;
        if profile_id.is_empty() {
            return Err(RefreshError::upstream("dashboard has an empty profileId"));
        }
        debug!(profile_id = %profile_id, "Found profile id");
        Ok(profile_id)
    }

    /// Reads the upload form key from the site's script bundle.
    #[instrument(skip_all)]
    pub async fn form_key(&self) -> Result<String, RefreshError> {
        let request = self.site.request(Method::Get, FORM_KEY_SCRIPT_URL);
        let script = self.http.send(request).await?.error_for_status()?;
        let form_key = FORM_KEY.extract(&script.text())?;
        debug!(form_key = %form_key, "Found form key");
        Ok(form_key)
    }

    /// Deletes the resume currently attached to the profile.
    #[instrument(skip_all, fields(profile_id = %profile_id))]
    pub async fn delete_resume(&self, token: &str, profile_id: &str) -> Result<(), RefreshError> {
        let request =
            self.profile_request(self.profile_url(profile_id, "deleteResume"), token, "DELETE");
        self.http.send(request).await?.error_for_status()?;
        debug!("Previous resume deleted");
        Ok(())
    }

    /// Sends the file to the validation service under `file_key`.
    #[instrument(skip_all, fields(file_key = %file_key, filename = %filename))]
    pub async fn upload_file(
        &self,
        form_key: &str,
        file_key: &str,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), RefreshError> {
        let size = bytes.len();
        let request = self
            .site
            .request(Method::Post, FILE_UPLOAD_URL)
            .header("appid", "105")
            .header("systemid", "fileupload")
            .multipart(vec![
                MultipartPart::text("formKey", form_key),
                MultipartPart::text("fileKey", file_key),
                MultipartPart::text("fileName", filename),
                MultipartPart::text("uploadCallback", "true"),
                MultipartPart::file("file", filename, content_type, bytes),
            ]);

        self.http.send(request).await?.error_for_status()?;
        debug!(bytes = size, "File uploaded");
        Ok(())
    }

    /// Attaches the uploaded file to the profile.
    #[instrument(skip_all, fields(profile_id = %profile_id, file_key = %file_key))]
    pub async fn advertise_resume(
        &self,
        token: &str,
        profile_id: &str,
        form_key: &str,
        file_key: &str,
    ) -> Result<(), RefreshError> {
        let request = self
            .profile_request(self.profile_url(profile_id, "advResume"), token, "PUT")
            .json(json!({
                "textCV": {
                    "formKey": form_key,
                    "fileKey": file_key,
                    "textCvContent": null,
                }
            }));

        self.http.send(request).await?.error_for_status()?;
        debug!("Resume attached to profile");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
