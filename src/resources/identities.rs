//! Identities resource.
//!
//! An identity maps a sender id from a source service to a unified
//! display identity, so notifications from the same person across
//! services resolve to one name.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Client;
use crate::error::Result;

use super::{Deleted, require};

// ============================================================================
// Identity
// ============================================================================

/// An identity mapping as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    /// Unified identity id.
    pub id: String,
    /// Service this identity comes from.
    pub source_service: String,
    /// Original id within the source service.
    pub source_id: String,
    /// Display name.
    pub name: String,
    /// Free-form metadata about the identity.
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

// ============================================================================
// NewIdentity
// ============================================================================

/// Payload for creating or updating an identity mapping.
#[derive(Debug, Clone, Serialize)]
pub struct NewIdentity {
    /// Service this identity comes from.
    pub source_service: String,
    /// Original id within the source service.
    pub source_id: String,
    /// Display name.
    pub name: String,
    /// Optional free-form metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewIdentity {
    /// Creates a payload with no metadata.
    #[must_use]
    pub fn new(
        source_service: impl Into<String>,
        source_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source_service: source_service.into(),
            source_id: source_id.into(),
            name: name.into(),
            metadata: None,
        }
    }

    /// Attaches metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

// ============================================================================
// IdentityFilter
// ============================================================================

/// Query filter for listing identities.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IdentityFilter {
    /// Filter by display name (partial match).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Filter by source service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_service: Option<String>,
    /// Maximum number of identities to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of identities to skip for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl IdentityFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filters by source service.
    #[must_use]
    pub fn source_service(mut self, source_service: impl Into<String>) -> Self {
        self.source_service = Some(source_service.into());
        self
    }

    /// Limits the page size.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips `offset` identities.
    #[must_use]
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

// ============================================================================
// IdentityList
// ============================================================================

/// Response to an identity list request.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityList {
    /// Matching identities.
    pub identities: Vec<Identity>,
    /// Total matches across all pages.
    #[serde(default)]
    pub total: Option<u64>,
    /// Page size used by the server.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Offset used by the server.
    #[serde(default)]
    pub offset: Option<u32>,
}

// ============================================================================
// Identities
// ============================================================================

/// Handle to the identities resource.
#[derive(Debug, Clone, Copy)]
pub struct Identities<'a> {
    client: &'a Client,
}

impl<'a> Identities<'a> {
    /// Creates an identities handle.
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Creates or updates an identity mapping.
    ///
    /// `POST /identities/`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   `source_service`, `source_id`, or `name` is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn create_or_update(&self, identity: &NewIdentity) -> Result<Identity> {
        require("source_service", &identity.source_service)?;
        require("source_id", &identity.source_id)?;
        require("name", &identity.name)?;
        self.client.post("/identities/", identity).await
    }

    /// Gets an identity by source service and source id.
    ///
    /// `GET /identities/source/{source_service}/{source_id}`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   either path parameter is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn get_by_source(&self, source_service: &str, source_id: &str) -> Result<Identity> {
        require("source_service", source_service)?;
        require("source_id", source_id)?;
        self.client
            .get(&format!("/identities/source/{source_service}/{source_id}"))
            .await
    }

    /// Gets an identity by its unified id.
    ///
    /// `GET /identities/{id}`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   `identity_id` is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn get(&self, identity_id: &str) -> Result<Identity> {
        require("identity_id", identity_id)?;
        self.client.get(&format!("/identities/{identity_id}")).await
    }

    /// Lists identities matching `filter`.
    ///
    /// `GET /identities/`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::Error::Api) on a non-2xx response.
    pub async fn list(&self, filter: &IdentityFilter) -> Result<IdentityList> {
        self.client.get_with_query("/identities/", filter).await
    }

    /// Deletes an identity.
    ///
    /// `DELETE /identities/{id}`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   `identity_id` is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn delete(&self, identity_id: &str) -> Result<Deleted> {
        require("identity_id", identity_id)?;
        self.client
            .delete(&format!("/identities/{identity_id}"))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
