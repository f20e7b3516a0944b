//! Real-time notification channel.
//!
//! This module implements the persistent duplex connection to the
//! notification service: subscribe/unsubscribe control, pushed
//! notifications, acknowledgements, and transparent reconnection.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   events    ┌──────────────────┐
//! │ RealtimeChannel  │◄────────────│ Transport        │     WebSocket
//! │ (state machine)  │────────────►│ (adapter + pump) │◄═══════════════► server
//! └────────┬─────────┘  frames     └──────────────────┘
//!          │ fan-out
//! ┌────────▼─────────┐
//! │ EventDispatcher  │──► listeners (message / open / close / error)
//! └──────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `channel` | Connection state machine and control operations |
//! | `dispatcher` | Listener registry and event fan-out |
//! | `transport` | Duplex socket adapter |

// ============================================================================
// Submodules
// ============================================================================

/// Connection state machine.
pub mod channel;

/// Listener registry and event fan-out.
pub mod dispatcher;

/// Duplex socket adapter.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{ChannelState, ConnectOptions, RealtimeChannel};
pub use dispatcher::{ChannelEvent, EventDispatcher, EventKind, EventListener};
pub use transport::{Transport, TransportEvent, TransportLink, WebSocketTransport};
