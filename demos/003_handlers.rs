//! Notification handler CRUD.
//!
//! Demonstrates:
//! - Creating a handler with a metadata filter
//! - Listing and fetching handlers
//! - Updating and deleting a handler
//!
//! Usage:
//!   NOTIFYHUB_API_KEY=... cargo run --example 003_handlers

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use notifyhub::{HandlerFilter, NewHandler, Result};
use serde_json::json;

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
    println!("=== 003: Notification Handlers ===\n");

    let client = common::client_from_env()?;

    // ========================================================================
    // Create Handler
    // ========================================================================

    println!("[1] Creating handler...");

    let payload = NewHandler::new("email_service", "Summarize the email and flag action items")
        .with_metadata_filter(json!({ "priority": "high" }));
    let created = client.handlers().create(&payload).await?;

    println!("    ✓ Created: {}", created.id);

    // ========================================================================
    // List Handlers
    // ========================================================================

    println!("\n[2] Listing handlers for email_service...");

    let filter = HandlerFilter::new().source_service("email_service");
    let list = client.handlers().list(&filter).await?;

    println!("    ✓ {} handler(s)", list.handlers.len());
    for handler in &list.handlers {
        println!("      - {} [{}]", handler.id, handler.source_service);
    }

    // ========================================================================
    // Update Handler
    // ========================================================================

    println!("\n[3] Updating handler {}...", created.id);

    let update = NewHandler::new("email_service", "Summarize the email in one sentence");
    let updated = client.handlers().update(&created.id, &update).await?;
    println!("    Prompt: {}", updated.prompt);
    println!("    ✓ Updated");

    // ========================================================================
    // Delete Handler
    // ========================================================================

    println!("\n[4] Deleting handler {}...", created.id);

    let deleted = client.handlers().delete(&created.id).await?;
    if deleted.success {
        println!("    ✓ Deleted\n");
    } else {
        println!("    ✗ Delete was not confirmed\n");
    }

    println!("=== Done ===");
    Ok(())
}
