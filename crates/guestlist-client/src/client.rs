//! The request client: every admin API call goes through here.
//!
//! The access token lives in an HTTP-only cookie held by the transport's
//! cookie jar, so this layer never sees a credential. What it does see is a
//! 401, which triggers the refresh protocol:
//!
//! 1. join or start the single-flight refresh (see [`crate::refresh`]);
//! 2. on success, re-issue the original request exactly once;
//! 3. on failure, tear the session down and return [`Error::SessionExpired`].
//!
//! The retried response never re-enters step 1.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{AccompaniesApi, AuthApi, GuestsApi, InvitationsApi};
use crate::error::{Error, ErrorResponse, GENERIC_FAILURE, RefreshError, Result};
use crate::refresh::RefreshCoordinator;
use crate::session::SessionTeardown;

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on a single refresh call.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "api/admin/refresh-token";

// ─────────────────────────────────────────────────────────────────────────────
// Request descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Body of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Pre-serialized JSON.
    Json(Vec<u8>),
    /// Multipart form; the transport supplies its own boundary header.
    Multipart(Vec<MultipartField>),
}

/// One field of a multipart body.
#[derive(Debug, Clone)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl RequestBody {
    fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

fn build_form(fields: &[MultipartField]) -> reqwest::multipart::Form {
    fields
        .iter()
        .fold(reqwest::multipart::Form::new(), |form, field| match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File {
                name,
                file_name,
                bytes,
            } => form.part(
                name.clone(),
                reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone()),
            ),
        })
}

/// Everything needed to issue (and re-issue) one request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub body: RequestBody,
    pub headers: HeaderMap,
    /// Whether a 401 should trigger the refresh protocol.
    pub refresh_on_unauthorized: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            refresh_on_unauthorized: true,
        }
    }

    /// Attach a JSON body.
    pub fn json<B: serde::Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Attach a multipart body.
    pub fn multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    /// Add an extra header.
    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Never attempt a refresh for this request; a 401 is just an error.
    pub fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    /// Caller headers plus the JSON accept/content-type defaults.
    pub fn normalized_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if self.body.is_multipart() {
            headers.remove(CONTENT_TYPE);
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Session-aware client for the admin API.
///
/// Cheap to clone; clones share the cookie jar, the refresh slot and the
/// session teardown.
///
/// # Example
///
/// ```no_run
/// use guestlist_client::{RequestClient, SessionStore};
///
/// # async fn example() -> guestlist_client::Result<()> {
/// let store = SessionStore::connect(
///     RequestClient::builder().base_url("http://localhost:5000"),
/// )?;
///
/// let session = store.hydrate().await;
/// if session.is_authenticated {
///     let guests = store.client().guests().list().await?;
///     println!("{} guests", guests.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestClient {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    refresh_url: Url,
    timeout: Duration,
    refresh_timeout: Duration,
    refresh: RefreshCoordinator,
    session: Option<Arc<dyn SessionTeardown>>,
}

impl fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .field("refresh_timeout", &self.inner.refresh_timeout)
            .field("refresh", &self.inner.refresh)
            .finish()
    }
}

impl RequestClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether a refresh is outstanding right now.
    pub fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_in_flight()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the guests API.
    pub fn guests(&self) -> GuestsApi {
        GuestsApi::new(self.clone())
    }

    /// Access the accompanies API.
    pub fn accompanies(&self) -> AccompaniesApi {
        AccompaniesApi::new(self.clone())
    }

    /// Access the public invitation API.
    pub fn invitations(&self) -> InvitationsApi {
        InvitationsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request pipeline
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Start a descriptor for `path`.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestDescriptor> {
        Ok(RequestDescriptor::new(method, self.url(path)?))
    }

    /// Send a request, recovering from one expired access token.
    ///
    /// Returns the raw successful response. Non-2xx responses become
    /// [`Error::Request`]; an unrecoverable 401 becomes
    /// [`Error::SessionExpired`] after the session has been torn down.
    pub async fn send(&self, request: RequestDescriptor) -> Result<reqwest::Response> {
        let response = self.execute(&request).await?;

        if response.status() != StatusCode::UNAUTHORIZED
            || !request.refresh_on_unauthorized
            || self.is_refresh_endpoint(&request.url)
        {
            return Self::check(response).await;
        }

        tracing::debug!(method = %request.method, url = %request.url, "access token rejected");

        if let Err(e) = self.refresh_session().await {
            tracing::warn!(error = %e, "session refresh failed");
            self.expire_session();
            return Err(Error::SessionExpired);
        }

        // The retry is final: it is never fed back into the refresh path.
        let retried = self.execute(&request).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %request.url, "request rejected after refresh");
            self.expire_session();
            return Err(Error::SessionExpired);
        }
        Self::check(retried).await
    }

    fn is_refresh_endpoint(&self, url: &Url) -> bool {
        url.path() == self.inner.refresh_url.path()
    }

    fn expire_session(&self) {
        if let Some(session) = &self.inner.session {
            session.session_expired();
        }
    }

    /// Issue the request once with normalized headers.
    async fn execute(&self, request: &RequestDescriptor) -> Result<reqwest::Response> {
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.normalized_headers())
            .timeout(self.inner.timeout);

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes.clone()),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)),
        };

        let response = builder.send().await?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status().as_u16(),
            "request completed"
        );
        Ok(response)
    }

    /// Join or start the single-flight refresh.
    async fn refresh_session(&self) -> std::result::Result<(), RefreshError> {
        let http = self.inner.http.clone();
        let url = self.inner.refresh_url.clone();
        let bound = self.inner.refresh_timeout;

        self.inner
            .refresh
            .refresh(move || async move {
                let call = http
                    .post(url)
                    .header(ACCEPT, HeaderValue::from_static("application/json"))
                    .send();
                match tokio::time::timeout(bound, call).await {
                    Err(_) => Err(RefreshError::TimedOut),
                    Ok(Err(e)) => Err(RefreshError::Transport(e.to_string())),
                    Ok(Ok(response)) if response.status().is_success() => {
                        tracing::debug!("session refreshed");
                        Ok(())
                    }
                    Ok(Ok(response)) => Err(RefreshError::Rejected(response.status().as_u16())),
                }
            })
            .await
    }

    /// Pass through a successful response, map anything else to an error.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Error::Request { status, message }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode a JSON body; 204 and empty bodies decode as `{}`.
    pub async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::json!({}))?);
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::from_value(serde_json::json!({}))?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        Self::decode(response).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path)?.json(body)?;
        Self::decode(self.send(request).await?).await
    }

    /// Make a PUT request.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path)?.json(body)?;
        Self::decode(self.send(request).await?).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating a [`RequestClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    refresh_timeout: Duration,
    user_agent: Option<String>,
    session: Option<Arc<dyn SessionTeardown>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
            user_agent: None,
            session: None,
        }
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the bound on a single refresh call.
    pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Session to tear down when a refresh fails.
    pub fn session(mut self, session: Arc<dyn SessionTeardown>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RequestClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        let refresh_url = base_url.join(REFRESH_PATH)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("guestlist-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .build()?;

        Ok(RequestClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                refresh_url,
                timeout: self.timeout,
                refresh_timeout: self.refresh_timeout,
                refresh: RefreshCoordinator::new(),
                session: self.session,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RequestClient {
        ClientBuilder::new()
            .base_url("http://localhost:5000")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        assert_eq!(client().base_url().as_str(), "http://localhost:5000/");

        let nested = ClientBuilder::new()
            .base_url("https://rsvp.example.com/backend")
            .build()
            .unwrap();
        assert_eq!(
            nested.url("/api/admin/me").unwrap().as_str(),
            "https://rsvp.example.com/backend/api/admin/me"
        );
    }

    #[test]
    fn test_url_building() {
        let client = client();
        assert_eq!(
            client.url("api/admin/guests").unwrap().as_str(),
            "http://localhost:5000/api/admin/guests"
        );
        assert_eq!(
            client.url("/api/admin/guests/g1").unwrap().as_str(),
            "http://localhost:5000/api/admin/guests/g1"
        );
    }

    #[test]
    fn test_refresh_endpoint_detection() {
        let client = client();
        assert!(client.is_refresh_endpoint(&client.url(REFRESH_PATH).unwrap()));
        assert!(!client.is_refresh_endpoint(&client.url("api/admin/guests").unwrap()));
    }

    #[test]
    fn test_json_headers_are_normalized() {
        let request = client()
            .request(Method::POST, "api/admin/guests")
            .unwrap()
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .json(&serde_json::json!({"name": "A"}))
            .unwrap();
        let headers = request.normalized_headers();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_multipart_leaves_content_type_to_transport() {
        let request = client()
            .request(Method::POST, "api/admin/guests")
            .unwrap()
            .multipart(vec![MultipartField::Text {
                name: "name".to_string(),
                value: "A".to_string(),
            }]);
        let headers = request.normalized_headers();
        assert_eq!(headers[ACCEPT], "application/json");
        assert!(!headers.contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_without_refresh_flag() {
        let request = client()
            .request(Method::POST, "api/admin/login")
            .unwrap()
            .without_refresh();
        assert!(!request.refresh_on_unauthorized);
    }
}
