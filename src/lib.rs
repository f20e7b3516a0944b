//! NotifyHub - Rust client SDK for the NotifyHub notification service.
//!
//! This library exposes the service's REST endpoints as typed method
//! calls and its real-time channel as a reconnecting WebSocket client.
//!
//! # Architecture
//!
//! The client follows a facade model:
//!
//! - **REST facade**: [`Client`] plus per-resource handles (status,
//!   notifications, handlers, identities) over authenticated HTTP
//! - **Real-time channel**: [`RealtimeChannel`], a small state machine
//!   that keeps a persistent duplex connection alive, re-establishes it
//!   transparently after drops, and fans out typed events to listeners
//!
//! Key design principles:
//!
//! - Each [`RealtimeChannel`] owns its own listener registry and
//!   connection state, so independent clients coexist in one process
//! - The channel depends on a [`Transport`] trait, never on a concrete
//!   socket type
//! - Malformed incoming frames become `error` events; they never crash
//!   the connection
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use notifyhub::{ChannelEvent, Client, EventKind, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new("nh_live_abc123")?;
//!
//!     // REST: create a notification
//!     let notification = client
//!         .notifications()
//!         .create(&notifyhub::NewNotification::new(
//!             "email_service",
//!             "user-1",
//!             "You have mail",
//!         ))
//!         .await?;
//!     println!("created {}", notification.id);
//!
//!     // Real-time: subscribe and acknowledge
//!     let channel = client.realtime()?;
//!     let ack = channel.clone();
//!     channel.on(
//!         EventKind::Message,
//!         Arc::new(move |event| {
//!             if let ChannelEvent::Message(frame) = event
//!                 && let Some(id) = frame.notification_id()
//!             {
//!                 let _ = ack.acknowledge(id);
//!             }
//!         }),
//!     );
//!     channel.connect().await?;
//!     channel.subscribe("email_service")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client factory and configuration |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Real-time wire format (internal) |
//! | [`realtime`] | Reconnecting channel, dispatcher, transport |
//! | [`resources`] | REST resource facades |

// ============================================================================
// Modules
// ============================================================================

/// Client factory and configuration.
///
/// Use [`Client::builder()`] to create a configured client instance.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Real-time channel message types.
///
/// Internal module defining control frame and server frame structures.
pub mod protocol;

/// Real-time notification channel.
///
/// Connection state machine, event dispatcher, and transport adapter.
pub mod realtime;

/// REST resource facades.
///
/// Typed CRUD operations for notifications, handlers, and identities.
pub mod resources;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientBuilder};

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{ClientFrame, FrameType, ServerFrame};

// Real-time types
pub use realtime::{
    ChannelEvent, ChannelState, ConnectOptions, EventKind, EventListener, RealtimeChannel,
    Transport, TransportEvent, TransportLink, WebSocketTransport,
};

// Resource types
pub use resources::{
    Deleted, HandlerFilter, HandlerList, Identities, Identity, IdentityFilter, IdentityList,
    NewHandler, NewIdentity, NewNotification, Notification, NotificationFilter,
    NotificationHandler, NotificationHandlers, NotificationList, Notifications, ServiceStatus,
    Status,
};
