//! Outgoing control frame types.
//!
//! Defines the control messages the client sends over the real-time
//! channel and their wire encoding.

// ============================================================================
// Imports
// ============================================================================

use serde_json::json;

use crate::error::Result;

// ============================================================================
// ClientFrame
// ============================================================================

/// A control message from client to server.
///
/// # Wire Format
///
/// Each variant encodes to a single-line JSON object:
///
/// ```json
/// {"action":"subscribe","source_service":"email_service"}
/// {"action":"unsubscribe","source_service":"email_service"}
/// {"type":"ack","notification_id":"notif-789"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// Subscribe to notifications from a source service.
    Subscribe {
        /// The service to subscribe to.
        source_service: String,
    },

    /// Unsubscribe from notifications from a source service.
    Unsubscribe {
        /// The service to unsubscribe from.
        source_service: String,
    },

    /// Acknowledge receipt of a notification by id.
    Ack {
        /// The notification being acknowledged.
        notification_id: String,
    },
}

impl ClientFrame {
    /// Creates a subscribe frame.
    #[inline]
    #[must_use]
    pub fn subscribe(source_service: impl Into<String>) -> Self {
        Self::Subscribe {
            source_service: source_service.into(),
        }
    }

    /// Creates an unsubscribe frame.
    #[inline]
    #[must_use]
    pub fn unsubscribe(source_service: impl Into<String>) -> Self {
        Self::Unsubscribe {
            source_service: source_service.into(),
        }
    }

    /// Creates an acknowledgement frame.
    #[inline]
    #[must_use]
    pub fn ack(notification_id: impl Into<String>) -> Self {
        Self::Ack {
            notification_id: notification_id.into(),
        }
    }

    /// Encodes the frame to its single-line JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn encode(&self) -> Result<String> {
        let value = match self {
            Self::Subscribe { source_service } => json!({
                "action": "subscribe",
                "source_service": source_service,
            }),
            Self::Unsubscribe { source_service } => json!({
                "action": "unsubscribe",
                "source_service": source_service,
            }),
            Self::Ack { notification_id } => json!({
                "type": "ack",
                "notification_id": notification_id,
            }),
        };

        Ok(serde_json::to_string(&value)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
