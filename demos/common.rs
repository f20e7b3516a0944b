//! Shared utilities for demos.
//!
//! Provides common functionality used across all demos:
//! - Command-line argument parsing
//! - Logging initialization
//! - Client construction from the environment

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use notifyhub::Client;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable carrying the API key.
pub const API_KEY_ENV: &str = "NOTIFYHUB_API_KEY";

/// Environment variable overriding the base endpoint.
pub const BASE_URL_ENV: &str = "NOTIFYHUB_BASE_URL";

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub debug: bool,
    pub no_wait: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self {
            debug: args.iter().any(|a| a == "--debug"),
            no_wait: args.iter().any(|a| a == "--no-wait"),
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        "notifyhub=debug"
    } else {
        "notifyhub=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

/// Build a client from `NOTIFYHUB_API_KEY` / `NOTIFYHUB_BASE_URL`.
pub fn client_from_env() -> notifyhub::Result<Client> {
    let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
    let mut builder = Client::builder(api_key);

    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        builder = builder.base_url(base_url);
    }

    builder.build()
}

/// Wait for Ctrl+C or skip if `--no-wait` flag is set.
pub async fn wait_for_exit(no_wait: bool) {
    if no_wait {
        println!("[--no-wait] Skipping wait");
        return;
    }

    println!("Press Ctrl+C to exit...");
    tokio::signal::ctrl_c().await.ok();
}
