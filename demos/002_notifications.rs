//! Notification creation, listing, and retrieval.
//!
//! Demonstrates:
//! - Creating a notification with metadata
//! - Listing notifications with a filter
//! - Fetching a single notification by id
//!
//! Usage:
//!   NOTIFYHUB_API_KEY=... cargo run --example 002_notifications

mod common;

// ============================================================================
// Imports
// ============================================================================

use common::Args;
use notifyhub::{NewNotification, NotificationFilter, Result};
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
    println!("=== 002: Notifications ===\n");

    let client = common::client_from_env()?;

    // ========================================================================
    // Create Notification
    // ========================================================================

    println!("[1] Creating notification...");

    let payload = NewNotification::new("email_service", "demo-user", "You have mail")
        .with_metadata(json!({ "priority": "high", "category": "demo" }));
    let created = client.notifications().create(&payload).await?;

    println!("    ✓ Created: {}", created.id);

    // ========================================================================
    // List Notifications
    // ========================================================================

    println!("\n[2] Listing notifications from email_service...");

    let filter = NotificationFilter::new()
        .source_service("email_service")
        .limit(10);
    let list = client.notifications().list(&filter).await?;

    println!("    ✓ {} notification(s)", list.notifications.len());
    for notification in &list.notifications {
        println!(
            "      - {} [{}] {}",
            notification.id, notification.source_service, notification.content
        );
    }

    // ========================================================================
    // Fetch By Id
    // ========================================================================

    println!("\n[3] Fetching notification {}...", created.id);

    let fetched = client.notifications().get(&created.id).await?;
    println!("    Content: {}", fetched.content);
    if let Some(received_at) = &fetched.received_at {
        println!("    Received: {received_at}");
    }
    println!("    ✓ Done\n");

    println!("=== Done ===");
    Ok(())
}
