//! Main LopDNS API client implementation.

use crate::api::{AuthApi, RecordsApi, ZonesApi};
use crate::config::{api_root, default_user_agent, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use lopdns_core::{AuthToken, LopDnsError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error as _;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

const JSON: &str = "application/json";

/// Header carrying the session token on authenticated calls
pub(crate) const TOKEN_HEADER: &str = "x-token";

/// Main LopDNS API client.
///
/// Holds the session token obtained by [`AuthApi::authenticate`]; clones share
/// it. Nothing is persisted beyond the life of the value.
#[derive(Clone)]
pub struct LopDnsClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    api_root: String,
    timeout: Duration,
    token: RwLock<Option<AuthToken>>,
}

impl LopDnsClient {
    /// Create a client for the public API using default settings
    pub fn new() -> Result<Self> {
        LopDnsClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> LopDnsClientBuilder {
        LopDnsClientBuilder::new()
    }

    /// Access token endpoints
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Access zone endpoints
    #[must_use]
    pub fn zones(&self) -> ZonesApi<'_> {
        ZonesApi::new(self)
    }

    /// Access record endpoints
    #[must_use]
    pub fn records(&self) -> RecordsApi<'_> {
        RecordsApi::new(self)
    }

    /// Versioned API root every path is appended to
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.inner.api_root
    }

    /// Returns true if there is no token or it expires within `skew_secs`
    #[must_use]
    pub fn is_token_expired(&self, skew_secs: i64) -> bool {
        self.token().map_or(true, |t| t.is_expired(skew_secs))
    }

    /// The current token, if any
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_token(&self, token: Option<AuthToken>) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Perform an authenticated GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::GET, path, true, &[], &[], None).await?;
        decode(&body)
    }

    /// Perform an authenticated GET request and return the raw body
    pub(crate) async fn get_text(&self, path: &str) -> Result<String> {
        self.send(Method::GET, path, true, &[], &[], None).await
    }

    /// Perform a GET request without the token header
    pub(crate) async fn get_unauthenticated<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
    ) -> Result<T> {
        let body = self
            .send(Method::GET, path, false, headers, params, None)
            .await?;
        decode(&body)
    }

    /// Perform an authenticated GET request expecting a top-level JSON array
    pub(crate) async fn get_array<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
    ) -> Result<Vec<T>> {
        let value: serde_json::Value = self.get(path).await?;
        if !value.is_array() {
            error!(path, "expected a top-level array of {what}");
            return Err(LopDnsError::UnexpectedResponse(format!(
                "expected a top-level array of {what} from {path}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Perform an authenticated POST request with JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self
            .send(Method::POST, path, true, &[], &[], Some(&body))
            .await?;
        decode(&response)
    }

    /// Perform an authenticated PUT request with JSON body
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self
            .send(Method::PUT, path, true, &[], &[], Some(&body))
            .await?;
        decode(&response)
    }

    /// Perform an authenticated DELETE request with JSON body
    pub(crate) async fn delete<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        self.send(Method::DELETE, path, true, &[], &[], Some(&body))
            .await
            .map(drop)
    }

    /// Send one request and return the body of a 2xx response
    async fn send(
        &self,
        method: Method,
        path: &str,
        apply_auth: bool,
        headers: &[(&str, &str)],
        params: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<String> {
        let url = self.build_url(path, params)?;

        let token = if apply_auth {
            match self.token() {
                Some(token) if !token.is_expired(0) => Some(token),
                _ => return Err(LopDnsError::NotAuthenticated),
            }
        } else {
            None
        };

        let auth = token
            .as_ref()
            .map_or_else(|| "none".to_string(), AuthToken::masked);
        let body_text = body.map(ToString::to_string).unwrap_or_default();
        debug!(
            method = %method,
            url = %url,
            auth = %auth,
            query = ?params,
            headers = ?headers,
            body = %body_text,
            "sending request"
        );

        let mut request = self.inner.http.request(method.clone(), url.clone());
        if let Some(token) = &token {
            request = request.header(TOKEN_HEADER, &token.token);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        debug!(status = status.as_u16(), body = %text, "received response");

        if status.is_success() {
            Ok(text)
        } else {
            Err(handle_error(&method, &url, status.as_u16(), text))
        }
    }

    /// Build a URL below the API root with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.inner.api_root, path))
            .map_err(|e| LopDnsError::InvalidUrl(format!("{}{path}: {e}", self.inner.api_root)))?;

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }

    /// Classify a reqwest failure, logging the whole source chain so TLS
    /// verification errors show up
    fn transport_error(&self, err: &reqwest::Error) -> LopDnsError {
        let chain = error_chain(err);
        error!(error = %chain, "HTTP request failed");

        if err.is_timeout() {
            LopDnsError::Timeout(self.inner.timeout.as_secs())
        } else if err.is_connect() {
            LopDnsError::Connection(chain)
        } else {
            LopDnsError::Http(chain)
        }
    }
}

/// Decode a successful response body
fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        error!(error = %e, body, "could not decode response");
        LopDnsError::Json(e)
    })
}

/// Convert an error response to a LopDnsError
fn handle_error(method: &Method, url: &Url, status: u16, body: String) -> LopDnsError {
    error!(method = %method, url = %url, status, body = %body, "API call failed");

    // Prefer a JSON error message when the API sends one
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|e| e.as_str())
                .map(String::from)
        })
        .unwrap_or(body);

    match status {
        401 | 403 => LopDnsError::Unauthorized(message),
        404 => LopDnsError::NotFound { resource: message },
        _ => LopDnsError::Api {
            code: status,
            message,
        },
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Builder for configuring a [`LopDnsClient`]
pub struct LopDnsClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for LopDnsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LopDnsClientBuilder {
    /// Create a builder for the public API
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Set the base URL, with or without the version segment
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the connect and request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<LopDnsClient> {
        let api_root = api_root(&self.base_url);
        Url::parse(&api_root).map_err(|e| LopDnsError::InvalidUrl(format!("{api_root}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));

        // Certificate verification is left at reqwest's default (enabled)
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .redirect(Policy::limited(10))
            .gzip(true)
            .build()
            .map_err(|e| LopDnsError::Config(format!("could not build HTTP client: {e}")))?;

        Ok(LopDnsClient {
            inner: Arc::new(ClientInner {
                http,
                api_root,
                timeout: self.timeout,
                token: RwLock::new(None),
            }),
        })
    }
}
