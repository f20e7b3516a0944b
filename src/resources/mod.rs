//! REST resource facades.
//!
//! Each facade is a cheap handle borrowing the [`Client`](crate::Client)
//! and exposing one resource's operations as typed async calls. Required
//! identifying parameters are validated locally before any request is
//! issued.
//!
//! # Modules
//!
//! | Module | Resource |
//! |--------|----------|
//! | `status` | `GET /status` |
//! | `notifications` | `/notifications/` |
//! | `handlers` | `/notification-handlers/` |
//! | `identities` | `/identities/` |

// ============================================================================
// Submodules
// ============================================================================

/// Notification handler CRUD.
pub mod handlers;

/// Identity mapping CRUD.
pub mod identities;

/// Notification creation, listing, retrieval.
pub mod notifications;

/// Service status.
pub mod status;

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;

use crate::error::{Error, Result};

// ============================================================================
// Re-exports
// ============================================================================

pub use handlers::{
    HandlerFilter, HandlerList, NewHandler, NotificationHandler, NotificationHandlers,
};
pub use identities::{Identities, Identity, IdentityFilter, IdentityList, NewIdentity};
pub use notifications::{
    NewNotification, Notification, NotificationFilter, NotificationList, Notifications,
};
pub use status::{ServiceStatus, Status};

// ============================================================================
// Shared Types
// ============================================================================

/// Response to a delete operation.
#[derive(Debug, Clone, Deserialize)]
pub struct Deleted {
    /// Whether the resource was deleted.
    pub success: bool,
    /// Human-readable confirmation.
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Validation
// ============================================================================

/// Fails fast when a required identifying parameter is empty.
pub(crate) fn require(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::parameter_required(name));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
