//! Incoming frame types.
//!
//! Frames pushed by the server are loosely structured JSON. They are kept
//! as untyped values with typed accessors so that unknown frame shapes
//! pass through to listeners instead of being rejected.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// FrameType
// ============================================================================

/// Classification of an incoming frame.
///
/// Derived from the frame's `type` field, falling back to `action`.
/// Unrecognized discriminators classify as [`FrameType::Other`]; no
/// category is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// System message (welcome frame, subscription confirmations).
    System,
    /// A pushed notification.
    Notification,
    /// Result of server-side notification processing.
    ProcessingResult,
    /// Server-side processing failure.
    ProcessingError,
    /// Error reported by the server.
    Error,
    /// Anything else, passed through as a generic message.
    Other,
}

impl FrameType {
    /// Classifies a discriminator string.
    #[must_use]
    fn from_discriminator(discriminator: &str) -> Self {
        match discriminator {
            "system" => Self::System,
            "notification" => Self::Notification,
            "processing_result" => Self::ProcessingResult,
            "processing_error" => Self::ProcessingError,
            "error" => Self::Error,
            _ => Self::Other,
        }
    }
}

// ============================================================================
// ServerFrame
// ============================================================================

/// A frame received over the real-time channel.
///
/// # Format
///
/// The server sends one JSON object per frame, discriminated by `type`:
///
/// ```json
/// {"type":"system","message":"Connected","client_id":"client-17"}
/// {"type":"notification","notification_id":"notif-789",
///  "source_service":"email_service","content":"You have mail"}
/// ```
///
/// Additional fields are free-form and reachable via [`ServerFrame::get_str`]
/// or the raw [`ServerFrame::value`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServerFrame {
    raw: Value,
}

impl ServerFrame {
    /// Decodes a frame from its wire text.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the text is not valid JSON. The
    /// real-time channel converts that into an `error` event rather than
    /// surfacing it to callers.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            raw: serde_json::from_str(text)?,
        })
    }

    /// Wraps an already-parsed value.
    #[inline]
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Returns the frame classification.
    #[must_use]
    pub fn frame_type(&self) -> FrameType {
        self.get_str("type")
            .or_else(|| self.get_str("action"))
            .map(FrameType::from_discriminator)
            .unwrap_or(FrameType::Other)
    }

    /// Returns the raw JSON value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.raw
    }

    /// Consumes the frame, returning the raw JSON value.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        self.raw
    }

    /// Gets a string field by key.
    ///
    /// Returns `None` if the key is absent or not a string.
    #[inline]
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.raw.get(key).and_then(Value::as_str)
    }

    /// Returns the client id from a `system` welcome frame.
    #[inline]
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.get_str("client_id")
    }

    /// Returns the notification id carried by the frame.
    #[inline]
    #[must_use]
    pub fn notification_id(&self) -> Option<&str> {
        self.get_str("notification_id")
    }

    /// Returns the source service carried by the frame.
    #[inline]
    #[must_use]
    pub fn source_service(&self) -> Option<&str> {
        self.get_str("source_service")
    }

    /// Returns the notification content carried by the frame.
    #[inline]
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.get_str("content")
    }

    /// Returns the human-readable message carried by the frame.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.get_str("message")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_system_welcome_frame() {
        let frame = ServerFrame::decode(
            r#"{"type":"system","message":"Connected to notification system","client_id":"client-42"}"#,
        )
        .expect("decode");

        assert_eq!(frame.frame_type(), FrameType::System);
        assert_eq!(frame.client_id(), Some("client-42"));
        assert_eq!(frame.message(), Some("Connected to notification system"));
    }

    #[test]
    fn test_notification_frame() {
        let frame = ServerFrame::decode(
            r#"{
                "type": "notification",
                "notification_id": "notif-789",
                "source_service": "email_service",
                "content": "You have mail",
                "sender_id": "user-1"
            }"#,
        )
        .expect("decode");

        assert_eq!(frame.frame_type(), FrameType::Notification);
        assert_eq!(frame.notification_id(), Some("notif-789"));
        assert_eq!(frame.source_service(), Some("email_service"));
        assert_eq!(frame.content(), Some("You have mail"));
        assert_eq!(frame.get_str("sender_id"), Some("user-1"));
    }

    #[test]
    fn test_processing_frames() {
        let result = ServerFrame::decode(r#"{"type":"processing_result"}"#).expect("decode");
        let error = ServerFrame::decode(r#"{"type":"processing_error"}"#).expect("decode");

        assert_eq!(result.frame_type(), FrameType::ProcessingResult);
        assert_eq!(error.frame_type(), FrameType::ProcessingError);
    }

    #[test]
    fn test_error_frame() {
        let frame =
            ServerFrame::decode(r#"{"type":"error","message":"Invalid message format"}"#)
                .expect("decode");

        assert_eq!(frame.frame_type(), FrameType::Error);
        assert_eq!(frame.message(), Some("Invalid message format"));
    }

    #[test]
    fn test_unknown_discriminator_passes_through() {
        let frame = ServerFrame::decode(r#"{"type":"heartbeat","seq":7}"#).expect("decode");
        assert_eq!(frame.frame_type(), FrameType::Other);
        assert_eq!(frame.value()["seq"], 7);
    }

    #[test]
    fn test_action_fallback_discriminator() {
        // Control echoes carry `action` instead of `type`.
        let frame = ServerFrame::decode(r#"{"action":"system"}"#).expect("decode");
        assert_eq!(frame.frame_type(), FrameType::System);
    }

    #[test]
    fn test_missing_discriminator() {
        let frame = ServerFrame::decode(r#"{"payload":[1,2,3]}"#).expect("decode");
        assert_eq!(frame.frame_type(), FrameType::Other);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(ServerFrame::decode("not-valid-json").is_err());
    }

    proptest! {
        #[test]
        fn decode_never_panics(text in "\\PC*") {
            // Arbitrary input either decodes or returns a parse error.
            let _ = ServerFrame::decode(&text);
        }

        #[test]
        fn classification_never_panics(discriminator in "\\PC*") {
            let value = serde_json::json!({ "type": discriminator });
            let _ = ServerFrame::from_value(value).frame_type();
        }
    }
}
