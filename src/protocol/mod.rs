//! Real-time channel message types.
//!
//! This module defines the wire format of the real-time channel: outgoing
//! control frames and incoming server frames.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`ClientFrame`] | Client → Server | Subscribe, unsubscribe, acknowledge |
//! | [`ServerFrame`] | Server → Client | System messages, notifications, errors |
//!
//! Each frame is one JSON object per WebSocket text message. Incoming
//! frames are kept loosely typed: unknown shapes are classified as
//! [`FrameType::Other`] and passed through to listeners unchanged.

// ============================================================================
// Submodules
// ============================================================================

/// Incoming server frame types.
pub mod event;

/// Outgoing control frame types.
pub mod frame;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{FrameType, ServerFrame};
pub use frame::ClientFrame;
