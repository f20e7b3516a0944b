//! Real-time channel: subscribe, receive, acknowledge.
//!
//! Demonstrates:
//! - Connecting the real-time channel with reconnect options
//! - Registering listeners for open/message/close/error events
//! - Subscribing to a source service
//! - Acknowledging received notifications
//!
//! Usage:
//!   NOTIFYHUB_API_KEY=... cargo run --example 005_realtime
//!   NOTIFYHUB_API_KEY=... cargo run --example 005_realtime -- --debug --no-wait

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use common::Args;
use notifyhub::{ChannelEvent, ConnectOptions, EventKind, FrameType, Result};

// ============================================================================
// Constants
// ============================================================================

const SOURCE_SERVICE: &str = "email_service";

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== 005: Real-time Channel ===\n");

    let client = common::client_from_env()?;
    let channel = client.realtime()?;

    // ========================================================================
    // Register Listeners
    // ========================================================================

    println!("[1] Registering listeners...");

    channel.on(
        EventKind::Open,
        Arc::new(|_event| println!("    [open]  channel connected")),
    );

    channel.on(
        EventKind::Close,
        Arc::new(|event| {
            if let ChannelEvent::Closed { code, .. } = event {
                println!("    [close] channel closed (code: {code:?})");
            }
        }),
    );

    channel.on(
        EventKind::Error,
        Arc::new(|event| {
            if let ChannelEvent::Error { message } = event {
                println!("    [error] {message}");
            }
        }),
    );

    // Acknowledge every pushed notification through the same channel.
    let ack = channel.clone();
    channel.on(
        EventKind::Message,
        Arc::new(move |event| {
            let ChannelEvent::Message(frame) = event else {
                return;
            };

            match frame.frame_type() {
                FrameType::System => {
                    if let Some(client_id) = frame.client_id() {
                        println!("    [system] connected as {client_id}");
                    } else if let Some(message) = frame.message() {
                        println!("    [system] {message}");
                    }
                }

                FrameType::Notification => {
                    let id = frame.notification_id().unwrap_or("<missing id>");
                    println!(
                        "    [notification] {} from {}: {}",
                        id,
                        frame.source_service().unwrap_or("?"),
                        frame.content().unwrap_or(""),
                    );

                    if let Err(e) = ack.acknowledge(id) {
                        println!("    [ack] failed: {e}");
                    } else {
                        println!("    [ack] sent for {id}");
                    }
                }

                other => println!("    [{other:?}] {}", frame.value()),
            }
        }),
    );

    println!("    ✓ Listeners ready\n");

    // ========================================================================
    // Connect
    // ========================================================================

    println!("[2] Connecting...");

    let options = ConnectOptions::new()
        .with_reconnect_interval(Duration::from_secs(2))
        .with_max_reconnect_attempts(5);
    channel.connect_with(options).await?;

    println!("    ✓ Connected\n");

    // ========================================================================
    // Subscribe
    // ========================================================================

    println!("[3] Subscribing to {SOURCE_SERVICE}...");
    channel.subscribe(SOURCE_SERVICE)?;
    println!("    ✓ Subscribed\n");

    // ========================================================================
    // Receive
    // ========================================================================

    println!("[4] Waiting for notifications...");
    common::wait_for_exit(args.no_wait).await;

    // ========================================================================
    // Cleanup
    // ========================================================================

    println!("\n[Cleanup] Disconnecting...");
    channel.unsubscribe(SOURCE_SERVICE).ok();
    channel.disconnect();
    println!("          ✓ Done");

    Ok(())
}
