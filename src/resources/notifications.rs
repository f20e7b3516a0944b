//! Notifications resource.
//!
//! Notifications are created over REST and pushed to subscribers over
//! the real-time channel. The id returned by [`Notifications::create`]
//! is the same id acknowledged via
//! [`RealtimeChannel::acknowledge`](crate::RealtimeChannel::acknowledge).

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::Client;
use crate::error::Result;

use super::identities::Identity;
use super::require;

// ============================================================================
// Notification
// ============================================================================

/// A notification as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Server-assigned notification id.
    pub id: String,
    /// Service the notification originated from.
    #[serde(default)]
    pub source_service: String,
    /// Sender within the source service.
    #[serde(default)]
    pub sender_id: String,
    /// Notification body.
    #[serde(default)]
    pub content: String,
    /// Free-form metadata attached at creation.
    #[serde(default)]
    pub metadata: Option<Value>,
    /// Server receipt timestamp.
    #[serde(default)]
    pub received_at: Option<String>,
    /// Resolved sender identity, when one is mapped.
    #[serde(default)]
    pub identity: Option<Identity>,
}

// ============================================================================
// NewNotification
// ============================================================================

/// Payload for creating a notification.
#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    /// Service the notification originates from.
    pub source_service: String,
    /// Sender within the source service.
    pub sender_id: String,
    /// Notification body.
    pub content: String,
    /// Optional free-form metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl NewNotification {
    /// Creates a payload with no metadata.
    #[must_use]
    pub fn new(
        source_service: impl Into<String>,
        sender_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source_service: source_service.into(),
            sender_id: sender_id.into(),
            content: content.into(),
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
// NotificationFilter
// ============================================================================

/// Query filter for listing notifications.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationFilter {
    /// Filter by source service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_service: Option<String>,
    /// Filter by sender.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    /// Maximum number of notifications to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of notifications to skip for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl NotificationFilter {
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

    /// Filters by sender.
    #[must_use]
    pub fn sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    /// Limits the page size.
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips `offset` notifications.
    #[must_use]
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

// ============================================================================
// NotificationList
// ============================================================================

/// Response to a notification list request.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationList {
    /// Matching notifications.
    pub notifications: Vec<Notification>,
}

// ============================================================================
// Notifications
// ============================================================================

/// Handle to the notifications resource.
#[derive(Debug, Clone, Copy)]
pub struct Notifications<'a> {
    client: &'a Client,
}

impl<'a> Notifications<'a> {
    /// Creates a notifications handle.
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Creates a new notification.
    ///
    /// `POST /notifications/`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::Error::Api) on a non-2xx response.
    pub async fn create(&self, notification: &NewNotification) -> Result<Notification> {
        self.client.post("/notifications/", notification).await
    }

    /// Lists notifications matching `filter`.
    ///
    /// `GET /notifications/`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::Error::Api) on a non-2xx response.
    pub async fn list(&self, filter: &NotificationFilter) -> Result<NotificationList> {
        self.client.get_with_query("/notifications/", filter).await
    }

    /// Gets a notification by id.
    ///
    /// `GET /notifications/{id}`
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`](crate::Error::ParameterRequired) if
    ///   `notification_id` is empty
    /// - [`Error::Api`](crate::Error::Api) on a non-2xx response
    pub async fn get(&self, notification_id: &str) -> Result<Notification> {
        require("notification_id", notification_id)?;
        self.client
            .get(&format!("/notifications/{notification_id}"))
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
    async fn test_get_requires_notification_id() {
        let client = test_client();
        let err = client.notifications().get("").await.unwrap_err();
        assert!(matches!(err, Error::ParameterRequired { .. }));
    }

    #[test]
    fn test_notification_deserialization() {
        let notification: Notification = serde_json::from_str(
            r#"{
                "id": "notification-1",
                "source_service": "test_service",
                "sender_id": "test_user",
                "content": "Test notification content",
                "metadata": {"priority": "medium"},
                "received_at": "2023-06-15T14:30:45.123456",
                "identity": null
            }"#,
        )
        .expect("parse");

        assert_eq!(notification.id, "notification-1");
        assert_eq!(notification.source_service, "test_service");
        assert_eq!(notification.metadata.unwrap()["priority"], "medium");
        assert!(notification.identity.is_none());
    }

    #[test]
    fn test_notification_list_deserialization() {
        let list: NotificationList = serde_json::from_str(
            r#"{"notifications":[
                {"id":"notification-1","source_service":"s","sender_id":"u","content":"a","received_at":"t"},
                {"id":"notification-2","source_service":"s","sender_id":"u","content":"b","received_at":"t"}
            ]}"#,
        )
        .expect("parse");

        assert_eq!(list.notifications.len(), 2);
        assert_eq!(list.notifications[1].id, "notification-2");
    }

    #[test]
    fn test_new_notification_serialization() {
        let payload = NewNotification::new("email_service", "user-1", "hello")
            .with_metadata(serde_json::json!({"priority": "high"}));
        let value = serde_json::to_value(&payload).expect("serialize");

        assert_eq!(value["source_service"], "email_service");
        assert_eq!(value["metadata"]["priority"], "high");
    }

    #[test]
    fn test_absent_metadata_is_omitted() {
        let payload = NewNotification::new("email_service", "user-1", "hello");
        let value = serde_json::to_value(&payload).expect("serialize");

        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_filter_skips_unset_fields() {
        let filter = NotificationFilter::new().source_service("email_service").limit(10);
        let value = serde_json::to_value(&filter).expect("serialize");

        assert_eq!(value["source_service"], "email_service");
        assert_eq!(value["limit"], 10);
        assert!(value.get("sender_id").is_none());
        assert!(value.get("offset").is_none());
    }
}
