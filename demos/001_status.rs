//! Basic client construction and status check.
//!
//! Demonstrates:
//! - Building a client from the environment
//! - Checking service status
//!
//! Usage:
//!   NOTIFYHUB_API_KEY=... cargo run --example 001_status
//!   NOTIFYHUB_API_KEY=... cargo run --example 001_status -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use notifyhub::Result;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run().await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    println!("=== 001: Status ===\n");

    // ========================================================================
    // Create Client
    // ========================================================================

    println!("[1] Creating client...");
    let client = common::client_from_env()?;
    println!("    Base URL: {}", client.base_url());
    println!("    ✓ Client ready\n");

    // ========================================================================
    // Check Status
    // ========================================================================

    println!("[2] Checking service status...");
    let status = client.status().get().await?;

    println!("    Status:  {}", status.status);
    if let Some(version) = &status.version {
        println!("    Version: {version}");
    }

    if status.is_ok() {
        println!("    ✓ Service is up\n");
    } else {
        println!("    ✗ Service reports degraded state\n");
    }

    println!("=== Done ===");
    Ok(())
}
