//! Core client and shared request path.
//!
//! [`Client`] owns the credentials, the base endpoint, and the HTTP
//! connection pool. Resource facades borrow it; the real-time channel is
//! spawned from it with a derived WebSocket endpoint.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::realtime::{RealtimeChannel, WebSocketTransport};
use crate::resources::{Identities, NotificationHandlers, Notifications, Status};

use super::builder::ClientBuilder;

// ============================================================================
// Constants
// ============================================================================

/// Default service endpoint.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.notifyhub.io/v1";

/// Default per-request timeout.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Header carrying the API key on every request.
const API_KEY_HEADER: &str = "X-API-Key";

// ============================================================================
// ClientConfig
// ============================================================================

/// Validated client configuration.
pub(crate) struct ClientConfig {
    /// API key used for authentication.
    pub api_key: String,
    /// Base endpoint, normalized without a trailing slash.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the NotifyHub notification service.
///
/// Cheap to clone; clones share the configuration and the HTTP
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use notifyhub::Client;
///
/// # async fn example() -> notifyhub::Result<()> {
/// let client = Client::new("nh_live_abc123")?;
/// let status = client.status().get().await?;
/// println!("service: {}", status.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(api_key).build()
    }

    /// Returns a builder for custom configuration.
    #[inline]
    #[must_use]
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Builds the client from a validated configuration.
    pub(crate) fn from_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&config.api_key)
                .map_err(|_| Error::MissingCredential)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        debug!(base_url = %config.base_url, "client created");

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Configured base endpoint.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }

    /// Status resource.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status<'_> {
        Status::new(self)
    }

    /// Notifications resource.
    #[inline]
    #[must_use]
    pub fn notifications(&self) -> Notifications<'_> {
        Notifications::new(self)
    }

    /// Notification handlers resource.
    #[inline]
    #[must_use]
    pub fn handlers(&self) -> NotificationHandlers<'_> {
        NotificationHandlers::new(self)
    }

    /// Identities resource.
    #[inline]
    #[must_use]
    pub fn identities(&self) -> Identities<'_> {
        Identities::new(self)
    }

    // ========================================================================
    // Real-time Channel
    // ========================================================================

    /// Creates a real-time channel for this client.
    ///
    /// The channel endpoint is derived from the base endpoint and carries
    /// the same API key; see [`Client::realtime_url`]. Each call returns
    /// an independent channel with its own listeners and connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if no WebSocket endpoint can be
    /// derived from the base endpoint.
    pub fn realtime(&self) -> Result<RealtimeChannel> {
        let endpoint = self.realtime_url()?;
        Ok(RealtimeChannel::new(
            endpoint,
            Arc::new(WebSocketTransport::new()),
        ))
    }

    /// Derives the real-time endpoint from the base endpoint.
    ///
    /// `http` becomes `ws` and `https` becomes `wss`; a trailing version
    /// path segment is stripped; `/ws` is appended; the API key rides
    /// along as the `apiKey` query parameter.
    pub fn realtime_url(&self) -> Result<Url> {
        let base = &self.config.base_url;

        let scheme = match base.scheme() {
            "https" => "wss",
            "http" => "ws",
            _ => return Err(Error::invalid_endpoint(base.as_str())),
        };

        let mut ws = base.clone();
        ws.set_scheme(scheme)
            .map_err(|()| Error::invalid_endpoint(base.as_str()))?;

        let path = ws.path().trim_end_matches('/');
        let path = match path.rsplit_once('/') {
            Some((head, segment)) if is_version_segment(segment) => head.to_string(),
            _ => path.to_string(),
        };
        ws.set_path(&format!("{path}/ws"));

        ws.query_pairs_mut()
            .clear()
            .append_pair("apiKey", &self.config.api_key);

        Ok(ws)
    }

    // ========================================================================
    // Request Path
    // ========================================================================

    /// Issues a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.http.get(self.endpoint(path))).await
    }

    /// Issues a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> Result<T> {
        self.send(self.http.get(self.endpoint(path)).query(query))
            .await
    }

    /// Issues a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        self.send(self.http.post(self.endpoint(path)).json(body))
            .await
    }

    /// Issues a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        self.send(self.http.put(self.endpoint(path)).json(body))
            .await
    }

    /// Issues a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.http.delete(self.endpoint(path))).await
    }

    /// Resolves `path` against the base endpoint.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Sends a prepared request and decodes the response.
    ///
    /// Non-2xx responses become [`Error::Api`] carrying the status code
    /// and the body text as returned by the service.
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        trace!(status = status.as_u16(), "response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns `true` for path segments like `v1` or `v2`.
fn is_version_segment(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Tests
// ============================================================================
