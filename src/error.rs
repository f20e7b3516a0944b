//! Error types for the NotifyHub client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use notifyhub::{Result, Error};
//!
//! async fn example(client: &Client) -> Result<()> {
//!     let notification = client.notifications().get("notif-123").await?;
//!     println!("{}", notification.content);
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::MissingCredential`], [`Error::InvalidEndpoint`] |
//! | Validation | [`Error::ParameterRequired`], [`Error::UnknownEventCategory`] |
//! | Real-time | [`Error::ConnectionNotOpen`], [`Error::Transport`] |
//! | Remote | [`Error::Api`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Http`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// No API key supplied at construction.
    ///
    /// Returned when the client is built with an empty API key.
    #[error("API key is required")]
    MissingCredential,

    /// Base endpoint cannot be parsed or has no WebSocket equivalent.
    ///
    /// Returned at build time or during real-time URL derivation.
    #[error("Invalid endpoint: {url}")]
    InvalidEndpoint {
        /// The offending endpoint value.
        url: String,
    },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// A required identifying parameter is absent or empty.
    ///
    /// Raised locally before any request is issued.
    #[error("{name} is required")]
    ParameterRequired {
        /// Name of the missing parameter.
        name: String,
    },

    /// Listener registration against an unrecognized event category.
    #[error("Unknown event category: {category}")]
    UnknownEventCategory {
        /// The unrecognized category string.
        category: String,
    },

    // ========================================================================
    // Real-time Errors
    // ========================================================================
    /// Control operation attempted without a ready transport.
    ///
    /// Returned by `subscribe`/`unsubscribe`/`acknowledge` when the
    /// channel is not in the open state.
    #[error("Connection is not open")]
    ConnectionNotOpen,

    /// Underlying socket failure.
    ///
    /// Before the first open this is returned from `connect`; after open
    /// it is only surfaced as an `error` event.
    #[error("Transport failure: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// Non-2xx HTTP response from the service.
    #[error("Request failed: {status} {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the service.
        body: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid endpoint error.
    #[inline]
    pub fn invalid_endpoint(url: impl Into<String>) -> Self {
        Self::InvalidEndpoint { url: url.into() }
    }

    /// Creates a parameter-required error.
    #[inline]
    pub fn parameter_required(name: impl Into<String>) -> Self {
        Self::ParameterRequired { name: name.into() }
    }

    /// Creates an unknown event category error.
    #[inline]
    pub fn unknown_event_category(category: impl Into<String>) -> Self {
        Self::UnknownEventCategory {
            category: category.into(),
        }
    }

    /// Creates a transport failure error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an API error from a status code and response body.
    #[inline]
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a local validation error.
    ///
    /// Validation errors are raised before any request or frame is sent.
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::ParameterRequired { .. }
                | Self::UnknownEventCategory { .. }
                | Self::ConnectionNotOpen
        )
    }

    /// Returns `true` if this is a connection-level error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionNotOpen | Self::Transport { .. } | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error carries a remote HTTP status.
    #[inline]
    #[must_use]
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns the HTTP status code for API errors.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
