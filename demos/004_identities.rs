//! Identity mapping CRUD.
//!
//! Demonstrates:
//! - Creating an identity mapping for a sender
//! - Looking an identity up by source and by unified id
//! - Listing and deleting identities
//!
//! Usage:
//!   NOTIFYHUB_API_KEY=... cargo run --example 004_identities

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use notifyhub::{IdentityFilter, NewIdentity, Result};
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
    println!("=== 004: Identities ===\n");

    let client = common::client_from_env()?;

    // ========================================================================
    // Create Identity
    // ========================================================================

    println!("[1] Creating identity mapping...");

    let payload = NewIdentity::new("email_service", "john.doe@example.com", "John Doe")
        .with_metadata(json!({ "department": "Engineering" }));
    let created = client.identities().create_or_update(&payload).await?;

    println!("    ✓ Created: {} ({})", created.id, created.name);

    // ========================================================================
    // Lookup By Source
    // ========================================================================

    println!("\n[2] Looking up by source...");

    let by_source = client
        .identities()
        .get_by_source("email_service", "john.doe@example.com")
        .await?;
    println!("    ✓ {} -> {}", by_source.source_id, by_source.name);

    // ========================================================================
    // Lookup By Unified Id
    // ========================================================================

    println!("\n[3] Looking up by unified id {}...", created.id);

    let by_id = client.identities().get(&created.id).await?;
    println!("    ✓ {}", by_id.name);

    // ========================================================================
    // List Identities
    // ========================================================================

    println!("\n[4] Listing identities...");

    let filter = IdentityFilter::new().source_service("email_service").limit(10);
    let list = client.identities().list(&filter).await?;

    println!("    ✓ {} identit(ies)", list.identities.len());
    for identity in &list.identities {
        println!("      - {} [{}] {}", identity.id, identity.source_service, identity.name);
    }

    // ========================================================================
    // Delete Identity
    // ========================================================================

    println!("\n[5] Deleting identity {}...", created.id);

    let deleted = client.identities().delete(&created.id).await?;
    if deleted.success {
        println!("    ✓ Deleted\n");
    } else {
        println!("    ✗ Delete was not confirmed\n");
    }

    println!("=== Done ===");
    Ok(())
}
