//! Service status resource.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

use crate::client::Client;
use crate::error::Result;

// ============================================================================
// ServiceStatus
// ============================================================================

/// Response to `GET /status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    /// Health indicator, `"ok"` when the service is up.
    pub status: String,
    /// Service version.
    #[serde(default)]
    pub version: Option<String>,
}

impl ServiceStatus {
    /// Returns `true` when the service reports healthy.
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// ============================================================================
// Status
// ============================================================================

/// Handle to the status resource.
#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    client: &'a Client,
}

impl<'a> Status<'a> {
    /// Creates a status handle.
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Checks API status.
    ///
    /// `GET /status`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::Error::Api) on a non-2xx response.
    pub async fn get(&self) -> Result<ServiceStatus> {
        self.client.get("/status").await
    }
}

// ============================================================================
// Tests
// ============================================================================
