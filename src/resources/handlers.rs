//! Notification handlers resource.
//!
//! A handler tells the service how to process matching notifications:
//! which source service it covers, an optional metadata filter, and the
//! prompt applied to matching notifications.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Client;
use crate::error::Result;

use super::{Deleted, require};

// ============================================================================
// NotificationHandler
// ============================================================================

/// A notification handler as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationHandler {
    /// Server-assigned handler id.
    pub id: String,
    /// Service whose notifications this handler covers.
    pub source_service: String,
    /// Prompt applied to matching notifications.
    #[serde(default)]
    pub prompt: String,
    /// Filter matched against notification metadata.
    #[serde(default)]
    pub metadata_filter: Option<Value>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

// ============================================================================
// NewHandler
// ============================================================================

/// Payload for creating or updating a handler.
#[derive(Debug, Clone, Serialize)]
pub struct NewHandler {
    /// Service whose notifications this handler covers.
    pub source_service: String,
    /// Prompt applied to matching notifications.
    pub prompt: String,
    /// Optional filter matched against notification metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_filter: Option<Value>,
}

impl NewHandler {
    /// Creates a payload with no metadata filter.
    #[must_use]
    pub fn new(source_service: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            source_service: source_service.into(),
            prompt: prompt.into(),
            metadata_filter: None,
        }
    }

    /// Attaches a metadata filter.
    #[must_use]
    pub fn with_metadata_filter(mut self, filter: Value) -> Self {
        self.metadata_filter = Some(filter);
        self
    }
}

// ============================================================================
// HandlerFilter
// ============================================================================

/// Query filter for listing handlers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HandlerFilter {
    /// Filter by source service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_service: Option<String>,
    /// Maximum number of handlers to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of handlers to skip for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl HandlerFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Skips `offset` handlers.
    #[must_use]
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

// ============================================================================
// HandlerList
// ============================================================================

/// Response to a handler list request.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerList {
    /// Matching handlers.
    pub handlers: Vec<NotificationHandler>,
}

// ============================================================================
// NotificationHandlers
// ============================================================================

/// Handle to the notification handlers resource.
#[derive(Debug, Clone, Copy)]
pub struct NotificationHandlers<'a> {
    client: &'a Client,
}

impl<'a> NotificationHandlers<'a> {
    /// Creates a handlers handle.
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Creates a new notification handler.
    ///
    /// `POST /notification-handlers/`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::Error::Api) on a non-2xx response.
    pub async fn create(&self, handler: &NewHandler) -> Result<NotificationHandler> {
        self.client.post("/notification-handlers/", handler).await
    }

    /// Lists handlers matching `filter`.
    ///
    /// `GET /notification-handlers/`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::Error::Api) on a non-2xx response.
    pub async fn list(&self, filter: &HandlerFilter) -> Result<HandlerList> {
        self.client
            .get_with_query("/notification-handlers/", filter)
            .await
    }

    /// Gets a handler by id.
    ///
    /// `GET /notification-handlers/{id}`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   `handler_id` is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn get(&self, handler_id: &str) -> Result<NotificationHandler> {
        require("handler_id", handler_id)?;
        self.client
            .get(&format!("/notification-handlers/{handler_id}"))
            .await
    }

    /// Updates a handler.
    ///
    /// `PUT /notification-handlers/{id}`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   `handler_id` is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn update(
        &self,
        handler_id: &str,
        handler: &NewHandler,
    ) -> Result<NotificationHandler> {
        require("handler_id", handler_id)?;
        self.client
            .put(&format!("/notification-handlers/{handler_id}"), handler)
            .await
    }

    /// Deletes a handler.
    ///
    /// `DELETE /notification-handlers/{id}`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   `handler_id` is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn delete(&self, handler_id: &str) -> Result<Deleted> {
        require("handler_id", handler_id)?;
        self.client
            .delete(&format!("/notification-handlers/{handler_id}"))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::Error;

    fn test_client() -> Client {
        Client::new("test-key").expect("client")
    }

    #[tokio::test]
    async fn test_get_requires_handler_id() {
        let client = test_client();
        let err = client.handlers().get("").await.unwrap_err();
        assert!(matches!(err, Error::ParameterRequired { .. }));
    }

    #[tokio::test]
    async fn test_update_requires_handler_id() {
        let client = test_client();
        let payload = NewHandler::new("email_service", "Summarize the email");
        let err = client.handlers().update("", &payload).await.unwrap_err();
        assert!(matches!(err, Error::ParameterRequired { .. }));
    }

    #[tokio::test]
    async fn test_delete_requires_handler_id() {
        let client = test_client();
        let err = client.handlers().delete("").await.unwrap_err();
        assert!(matches!(err, Error::ParameterRequired { .. }));
    }

    #[test]
    fn test_handler_deserialization() {
        let handler: NotificationHandler = serde_json::from_str(
            r#"{
                "id": "handler-1",
                "source_service": "email_service",
                "prompt": "Process email notifications",
                "metadata_filter": {"priority": {"operator": "in", "value": ["high", "medium"]}},
                "created_at": "2023-06-15T14:00:00.123456",
                "updated_at": "2023-06-15T14:00:00.123456"
            }"#,
        )
        .expect("parse");

        assert_eq!(handler.id, "handler-1");
        let filter = handler.metadata_filter.expect("filter");
        assert_eq!(filter["priority"]["operator"], "in");
    }

    #[test]
    fn test_new_handler_serialization() {
        let payload = NewHandler::new("email_service", "Summarize the email")
            .with_metadata_filter(serde_json::json!({"priority": "high"}));
        let value = serde_json::to_value(&payload).expect("serialize");

        assert_eq!(value["source_service"], "email_service");
        assert_eq!(value["prompt"], "Summarize the email");
        assert_eq!(value["metadata_filter"]["priority"], "high");
    }
}
