//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`Client`] instances.
//!
//! # Example
//!
//! ```no_run
//! use notifyhub::Client;
//! use std::time::Duration;
//!
//! # fn example() -> notifyhub::Result<()> {
//! let client = Client::builder("nh_live_abc123")
//!     .base_url("https://api.notifyhub.io/v1")
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

use super::core::{Client, ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`] instance.
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// API key used for authentication.
    api_key: String,
    /// Base endpoint of the service.
    base_url: String,
    /// Per-request timeout.
    timeout: Duration,
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a builder with the given API key and default settings.
    #[inline]
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the base endpoint.
    ///
    /// The real-time endpoint is derived from this value, so it must be
    /// an `http` or `https` URL.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-request timeout (default 5 s).
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredential`] if the API key is empty
    /// - [`Error::InvalidEndpoint`] if the base URL does not parse or has
    ///   a non-HTTP scheme
    /// - [`Error::Http`] if the HTTP connection pool cannot be created
    pub fn build(self) -> Result<Client> {
        let api_key = self.validate_api_key()?;
        let base_url = self.validate_base_url()?;

        Client::from_config(ClientConfig {
            api_key,
            base_url,
            timeout: self.timeout,
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientBuilder {
    /// Validates the API key.
    fn validate_api_key(&self) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(Error::MissingCredential);
        }
        Ok(self.api_key.clone())
    }

    /// Validates the base endpoint.
    fn validate_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim_end_matches('/'))
            .map_err(|_| Error::invalid_endpoint(&self.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_endpoint(&self.base_url));
        }

        Ok(url)
    }
}

// ============================================================================
// Tests
// ============================================================================
