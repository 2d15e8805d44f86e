//
//  redmine-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the Redmine REST API
//!
//! This module provides [`RedmineClient`], the transport every resource
//! operation goes through. It builds request URLs, attaches credentials and
//! the optional impersonation header, and enforces the success status of
//! each verb.
//!
//! ## Features
//!
//! - URL building relative to the instance base URL
//! - HTTP Basic authentication (login/password or API key)
//! - `X-Redmine-Switch-User` impersonation per client instance
//! - Custom root CA per client instance
//! - Status enforcement with 422 validation message extraction
//!
//! ## Status Handling
//!
//! | Verb | Expected status |
//! |------|-----------------|
//! | `GET` | `200 OK` |
//! | `POST` (JSON and uploads) | `201 Created` |
//! | `PUT` / `DELETE` | `200 OK` or `204 No Content` |
//! | `POST` on action endpoints (`post_no_content`) | `200 OK` or `204 No Content` |
//! | `PUT` create-or-update (`put_accepting`) | caller-supplied, e.g. `201` for new wiki pages |
//!
//! Any other status is an error. A `422` whose body carries a non-empty
//! `errors` array becomes [`ApiError::Validation`]; everything else becomes
//! [`ApiError::UnexpectedStatus`] with the status line and raw body.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::common::{ApiError, ApiResult, Params};
use crate::auth::Credentials;
use crate::config::Config;

/// Content type of every JSON request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of raw file uploads.
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

/// Header used to act on behalf of another user (admin keys only).
pub const SWITCH_USER_HEADER: &str = "X-Redmine-Switch-User";

/// Raw outcome of one HTTP exchange.
///
/// Produced by [`RedmineClient::send`], which never interprets the status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Response body decoded as text.
    pub body: String,
}

impl RawResponse {
    /// Renders the status as `"<code> <reason>"`, e.g. `"201 Created"`.
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }
}

#[derive(Deserialize)]
struct ValidationErrors {
    #[serde(default)]
    errors: Vec<String>,
}

/// Maps a response to its body, or to an error when the status is not one
/// of `expected`.
///
/// # Parameters
///
/// * `response` - The raw response to check
/// * `expected` - Statuses that count as success for the verb
///
/// # Returns
///
/// The body text on success. On failure, [`ApiError::Validation`] for a 422
/// carrying messages, otherwise [`ApiError::UnexpectedStatus`].
pub fn check_response(response: RawResponse, expected: &[StatusCode]) -> ApiResult<String> {
    if expected.contains(&response.status) {
        return Ok(response.body);
    }

    tracing::warn!(status = %response.status, "Unexpected response status");

    if response.status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Ok(parsed) = serde_json::from_str::<ValidationErrors>(&response.body) {
            if !parsed.errors.is_empty() {
                return Err(ApiError::Validation(parsed.errors));
            }
        }
    }

    Err(ApiError::UnexpectedStatus {
        status: response.status_line(),
        body: response.body,
    })
}

/// The main HTTP client for interacting with a Redmine instance.
///
/// A client holds only immutable configuration and a pooled
/// [`reqwest::Client`], so it is `Send + Sync` and may be shared between
/// tasks. Impersonation and the root CA are set per instance; two clients
/// never affect each other.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use redmine_cli::api::RedmineClient;
///
/// let client = RedmineClient::with_api_key("https://redmine.example.com", "abc123")?
///     .switch_user("jsmith");
/// # Ok::<(), redmine_cli::api::common::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RedmineClient {
    /// The underlying HTTP client
    http: Client,
    /// Base URL of the instance, always ending with `/`
    base_url: Url,
    /// Credentials attached to every request
    credentials: Credentials,
    /// Login to impersonate, if any
    switch_user: Option<String>,
}

impl RedmineClient {
    /// Creates a client for `base_url` with the given credentials.
    ///
    /// # Parameters
    ///
    /// * `base_url` - Root of the Redmine instance, e.g. `https://redmine.example.com/`
    /// * `credentials` - Login/password or API key
    ///
    /// # Returns
    ///
    /// Returns `Err(ApiError::InvalidUrl)` when the base URL cannot be parsed.
    pub fn new(base_url: &str, credentials: Credentials) -> ApiResult<Self> {
        Ok(Self {
            http: Self::http_builder().build()?,
            base_url: normalize_base(base_url)?,
            credentials,
            switch_user: None,
        })
    }

    /// Creates a client authenticating with an API access key.
    ///
    /// The key is sent as the Basic auth username with an empty password.
    pub fn with_api_key(base_url: &str, key: impl Into<String>) -> ApiResult<Self> {
        Self::new(base_url, Credentials::api_key(key))
    }

    /// Creates a client authenticating with a login and password.
    pub fn with_basic_auth(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ApiResult<Self> {
        Self::new(base_url, Credentials::basic(username, password))
    }

    /// Creates a client from a loaded [`Config`].
    ///
    /// Applies the configured credentials, impersonation login and root CA
    /// bundle. Fails when the configuration has no URL or no credentials,
    /// or when the CA file cannot be read.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use redmine_cli::api::RedmineClient;
    /// use redmine_cli::config::Config;
    ///
    /// let config = Config::load()?;
    /// let client = RedmineClient::from_config(&config)?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let base_url = config.require_url()?;
        let mut client = Self::new(base_url, config.credentials()?)?;

        if let Some(login) = config.switch_user.as_deref().filter(|s| !s.is_empty()) {
            client = client.switch_user(login);
        }

        if let Some(path) = &config.root_ca {
            let pem = std::fs::read(path).map_err(|e| {
                ApiError::Certificate(format!("failed to read {}: {}", path.display(), e))
            })?;
            client = client.with_root_certificate(&pem)?;
        }

        Ok(client)
    }

    /// Impersonates `login` on every request through `X-Redmine-Switch-User`.
    ///
    /// Only effective with administrator credentials. An empty login
    /// disables the header.
    pub fn switch_user(mut self, login: impl Into<String>) -> Self {
        let login = login.into();
        self.switch_user = (!login.is_empty()).then_some(login);
        self
    }

    /// Trusts additional PEM-encoded root certificates for this client.
    ///
    /// `pem` may hold a bundle of several certificates; all of them are
    /// added. The underlying HTTP client is rebuilt; other clients are
    /// unaffected.
    ///
    /// # Returns
    ///
    /// Returns `Err(ApiError::Certificate)` when the PEM data is unusable
    /// or contains no certificate.
    pub fn with_root_certificate(mut self, pem: &[u8]) -> ApiResult<Self> {
        let certificates =
            Certificate::from_pem_bundle(pem).map_err(|e| ApiError::Certificate(e.to_string()))?;
        if certificates.is_empty() {
            return Err(ApiError::Certificate("no PEM certificate found".to_string()));
        }

        let builder = certificates
            .into_iter()
            .fold(Self::http_builder(), |builder, certificate| {
                builder.add_root_certificate(certificate)
            });
        self.http = builder
            .build()
            .map_err(|e| ApiError::Certificate(e.to_string()))?;
        Ok(self)
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the impersonated login, if any.
    pub fn impersonating(&self) -> Option<&str> {
        self.switch_user.as_deref()
    }

    fn http_builder() -> reqwest::ClientBuilder {
        Client::builder().user_agent(format!("rdm/{}", crate::VERSION))
    }

    /// Builds an absolute request URL.
    ///
    /// The query string is appended only when `params` is non-empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use redmine_cli::api::RedmineClient;
    /// use redmine_cli::api::common::Params;
    ///
    /// let client = RedmineClient::with_api_key("https://redmine.example.com/tracker", "k")?;
    /// let url = client.build_url("issues.json", &Params::new().limit(5))?;
    /// assert_eq!(url.as_str(), "https://redmine.example.com/tracker/issues.json?limit=5");
    /// # Ok::<(), redmine_cli::api::common::ApiError>(())
    /// ```
    pub fn build_url(&self, path: &str, params: &Params) -> ApiResult<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(url)
    }

    /// Sends one request and returns the raw status and body.
    ///
    /// This never interprets the status code; it only fails on connection
    /// or read errors.
    ///
    /// # Parameters
    ///
    /// * `method` - HTTP verb
    /// * `url` - Absolute URL, usually from [`build_url`](Self::build_url)
    /// * `content_type` - Value of the `Content-Type` header
    /// * `body` - Optional request body
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        content_type: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<RawResponse> {
        tracing::debug!(
            %method,
            %url,
            content_type,
            credentials = self.credentials.kind(),
            "Sending request"
        );

        let mut request = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, content_type);
        request = self.credentials.apply_to_request(request);
        if let Some(login) = &self.switch_user {
            request = request.header(SWITCH_USER_HEADER, login);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(%status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        content_type: &str,
        body: Option<Vec<u8>>,
        expected: &[StatusCode],
    ) -> ApiResult<String> {
        let url = self.build_url(path, params)?;
        let response = self.send(method, url, content_type, body).await?;
        check_response(response, expected)
    }

    /// Performs a GET and returns the body of a `200` response.
    pub(crate) async fn get(&self, path: &str, params: &Params) -> ApiResult<String> {
        self.exchange(
            Method::GET,
            path,
            params,
            JSON_CONTENT_TYPE,
            None,
            &[StatusCode::OK],
        )
        .await
    }

    /// Performs a JSON POST and returns the body of a `201` response.
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<String> {
        let body = serde_json::to_vec(body)?;
        self.exchange(
            Method::POST,
            path,
            &Params::new(),
            JSON_CONTENT_TYPE,
            Some(body),
            &[StatusCode::CREATED],
        )
        .await
    }

    /// Performs a JSON POST on an action endpoint that answers without an
    /// entity, such as adding a user to a group.
    pub(crate) async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        let body = serde_json::to_vec(body)?;
        self.exchange(
            Method::POST,
            path,
            &Params::new(),
            JSON_CONTENT_TYPE,
            Some(body),
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        )
        .await?;
        Ok(())
    }

    /// Performs a JSON PUT. Updates carry no entity in the response.
    pub(crate) async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.put_accepting(path, body, &[StatusCode::OK, StatusCode::NO_CONTENT])
            .await?;
        Ok(())
    }

    /// Performs a JSON PUT accepting any of `expected` and returns the body.
    ///
    /// Used by create-or-update endpoints, which answer `201` on creation.
    pub(crate) async fn put_accepting<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        expected: &[StatusCode],
    ) -> ApiResult<String> {
        let body = serde_json::to_vec(body)?;
        self.exchange(
            Method::PUT,
            path,
            &Params::new(),
            JSON_CONTENT_TYPE,
            Some(body),
            expected,
        )
        .await
    }

    /// Performs a DELETE with optional query parameters.
    pub(crate) async fn delete(&self, path: &str, params: &Params) -> ApiResult<()> {
        self.exchange(
            Method::DELETE,
            path,
            params,
            JSON_CONTENT_TYPE,
            None,
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        )
        .await?;
        Ok(())
    }

    /// Posts raw bytes as `application/octet-stream` and returns the body of
    /// a `201` response.
    pub(crate) async fn post_octets(&self, path: &str, bytes: Vec<u8>) -> ApiResult<String> {
        self.exchange(
            Method::POST,
            path,
            &Params::new(),
            OCTET_STREAM_CONTENT_TYPE,
            Some(bytes),
            &[StatusCode::CREATED],
        )
        .await
    }
}

fn normalize_base(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use mockito::Matcher;

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_build_url_without_params() {
        let client = RedmineClient::with_api_key("https://redmine.example.com", "k").unwrap();
        let url = client.build_url("issues.json", &Params::new()).unwrap();
        assert_eq!(url.as_str(), "https://redmine.example.com/issues.json");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_build_url_tolerates_trailing_slash() {
        let client = RedmineClient::with_api_key("https://redmine.example.com/rm/", "k").unwrap();
        let url = client
            .build_url("projects/3/versions.json", &Params::new().offset(10))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://redmine.example.com/rm/projects/3/versions.json?offset=10"
        );
    }

    #[test]
    fn test_build_url_encodes_params() {
        let client = RedmineClient::with_api_key("https://redmine.example.com", "k").unwrap();
        let params = Params::new().filter("subject", "~crash report").sort("id:desc");
        let url = client.build_url("issues.json", &params).unwrap();
        assert_eq!(
            url.query(),
            Some("subject=%7Ecrash+report&sort=id%3Adesc")
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = RedmineClient::with_api_key("not a url", "k");
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_status_line() {
        assert_eq!(raw(201, "").status_line(), "201 Created");
        assert_eq!(raw(500, "").status_line(), "500 Internal Server Error");
    }

    #[test]
    fn test_check_response_expected() {
        let body = check_response(raw(201, "{}"), &[StatusCode::CREATED]).unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn test_check_response_validation() {
        let err = check_response(
            raw(422, r#"{"errors":["Name can't be blank"]}"#),
            &[StatusCode::CREATED],
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("Name can't be blank"));
    }

    #[test]
    fn test_check_response_unparsable_422() {
        let err = check_response(raw(422, "<html>"), &[StatusCode::CREATED]).unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { .. }));
        assert!(err.to_string().contains("<html>"));
    }

    #[test]
    fn test_check_response_empty_errors_422() {
        let err = check_response(raw(422, r#"{"errors":[]}"#), &[StatusCode::OK]).unwrap_err();
        assert!(err.to_string().starts_with("422"));
    }

    #[test]
    fn test_check_response_server_error() {
        let err = check_response(raw(500, "kaboom"), &[StatusCode::OK]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("kaboom"));
    }

    #[test]
    fn test_check_response_wrong_success_code() {
        let err = check_response(raw(200, "{}"), &[StatusCode::CREATED]).unwrap_err();
        assert!(err.to_string().starts_with("200 OK"));
    }

    #[tokio::test]
    async fn test_send_attaches_api_key_auth() {
        let mut server = mockito::Server::new_async().await;
        let expected = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("my-key:")
        );
        let mock = server
            .mock("GET", "/users/current.json")
            .match_header("authorization", expected.as_str())
            .match_header("content-type", JSON_CONTENT_TYPE)
            .match_header(SWITCH_USER_HEADER, Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = RedmineClient::with_api_key(&server.url(), "my-key").unwrap();
        let body = client.get("users/current.json", &Params::new()).await.unwrap();
        assert_eq!(body, "{}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_attaches_switch_user() {
        let mut server = mockito::Server::new_async().await;
        let expected = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("admin:secret")
        );
        let mock = server
            .mock("GET", "/issues.json")
            .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
            .match_header("authorization", expected.as_str())
            .match_header(SWITCH_USER_HEADER, "jsmith")
            .with_status(200)
            .with_body(r#"{"issues":[]}"#)
            .create_async()
            .await;

        let client = RedmineClient::with_basic_auth(&server.url(), "admin", "secret")
            .unwrap()
            .switch_user("jsmith");
        assert_eq!(client.impersonating(), Some("jsmith"));
        client
            .get("issues.json", &Params::new().limit(1))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_returns_raw_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/issues/9.json")
            .with_status(404)
            .with_body("gone")
            .create_async()
            .await;

        let client = RedmineClient::with_api_key(&server.url(), "k").unwrap();
        let url = client.build_url("issues/9.json", &Params::new()).unwrap();
        let response = client
            .send(Method::DELETE, url, JSON_CONTENT_TYPE, None)
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, "gone");
    }

    #[tokio::test]
    async fn test_put_accepts_no_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/issues/2.json")
            .match_body(Matcher::Json(serde_json::json!({"issue": {"subject": "x"}})))
            .with_status(204)
            .create_async()
            .await;

        let client = RedmineClient::with_api_key(&server.url(), "k").unwrap();
        let body = serde_json::json!({"issue": {"subject": "x"}});
        client.put("issues/2.json", &body).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_network_error() {
        let client = RedmineClient::with_api_key("http://127.0.0.1:9", "k").unwrap();
        let result = client.get("issues.json", &Params::new()).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RedmineClient>();
    }

    #[test]
    fn test_empty_switch_user_disables_header() {
        let client = RedmineClient::with_api_key("https://redmine.example.com", "k")
            .unwrap()
            .switch_user("");
        assert!(client.impersonating().is_none());
    }

    const ISRG_ROOT_X1: &[u8] = include_bytes!("testdata/isrg_root_x1.pem");
    const ISRG_ROOT_X2: &[u8] = include_bytes!("testdata/isrg_root_x2.pem");

    fn plain_client() -> RedmineClient {
        RedmineClient::with_api_key("https://redmine.example.com", "k").unwrap()
    }

    #[test]
    fn test_root_certificate_accepts_pem() {
        assert!(plain_client().with_root_certificate(ISRG_ROOT_X1).is_ok());
    }

    #[test]
    fn test_root_certificate_accepts_bundle() {
        let bundle = [ISRG_ROOT_X1, ISRG_ROOT_X2].concat();
        assert!(plain_client().with_root_certificate(&bundle).is_ok());
    }

    #[test]
    fn test_root_certificate_rejects_garbage() {
        let result = plain_client().with_root_certificate(b"definitely not a certificate");
        assert!(matches!(result, Err(ApiError::Certificate(_))));
    }

    #[test]
    fn test_root_certificate_rejects_empty() {
        let result = plain_client().with_root_certificate(b"");
        assert!(matches!(result, Err(ApiError::Certificate(_))));
    }

    fn config_with_root_ca(path: std::path::PathBuf) -> Config {
        Config {
            url: Some("https://redmine.example.com".to_string()),
            api_key: Some("k".to_string()),
            root_ca: Some(path),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_config_loads_root_ca() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, ISRG_ROOT_X1).unwrap();

        let client = RedmineClient::from_config(&config_with_root_ca(path)).unwrap();
        assert_eq!(client.base_url().as_str(), "https://redmine.example.com/");
    }

    #[test]
    fn test_from_config_rejects_invalid_root_ca() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ca.pem");
        std::fs::write(&path, "garbage").unwrap();

        let err = RedmineClient::from_config(&config_with_root_ca(path)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Certificate(_))
        ));
    }

    #[test]
    fn test_from_config_missing_root_ca() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.pem");

        let err = RedmineClient::from_config(&config_with_root_ca(path)).unwrap_err();
        assert!(err.to_string().contains("missing.pem"));
    }
}
