//! Client factory and configuration.
//!
//! Use [`Client::new`] for defaults or [`Client::builder`] for custom
//! endpoint and timeout settings.

// ============================================================================
// Submodules
// ============================================================================

/// Builder for client configuration.
pub mod builder;

/// Core client and shared request path.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use core::Client;
