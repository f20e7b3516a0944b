//! Transport adapter for the real-time channel.
//!
//! The channel state machine never touches a socket directly. It talks to
//! a [`Transport`], which opens a duplex link and normalizes socket I/O
//! into a uniform shape: an outgoing text-frame sender and an incoming
//! [`TransportEvent`] stream. The production implementation runs over
//! `tokio-tungstenite`; tests use a scripted in-memory transport.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// TransportEvent
// ============================================================================

/// An event surfaced by an open transport link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame arrived from the remote end.
    Message(String),

    /// The socket failed after open. The link closes after this event.
    Failed(String),

    /// The remote end closed the connection.
    Closed {
        /// Close code, when the socket provided one.
        code: Option<u16>,
        /// Close reason, when the socket provided one.
        reason: Option<String>,
    },
}

// ============================================================================
// TransportLink
// ============================================================================

/// An open duplex link produced by a [`Transport`].
///
/// Dropping the `outgoing` sender closes the link; the pump task then
/// shuts the underlying socket down.
pub struct TransportLink {
    /// Sender for outgoing text frames.
    pub outgoing: mpsc::UnboundedSender<String>,
    /// Receiver for incoming transport events.
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

// ============================================================================
// Transport
// ============================================================================

/// A factory for duplex links to the notification service.
///
/// Exactly one implementation is selected per target platform; the
/// channel state machine depends only on this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a link to `url`.
    ///
    /// Resolves once the connection is established and rejects on the
    /// first pre-open failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the connection cannot be
    /// established.
    async fn open(&self, url: &Url) -> Result<TransportLink>;
}

// ============================================================================
// WebSocketTransport
// ============================================================================

/// WebSocket transport over `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Creates a new WebSocket transport.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn open(&self, url: &Url) -> Result<TransportLink> {
        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        debug!(host = url.host_str().unwrap_or_default(), "WebSocket connected");

        let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel::<String>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<TransportEvent>();

        // Pump task: translate socket I/O into transport events.
        tokio::spawn(async move {
            let (mut ws_write, mut ws_read) = ws_stream.split();

            loop {
                tokio::select! {
                    frame = outgoing_rx.recv() => {
                        match frame {
                            Some(text) => {
                                if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                                    let _ = event_tx.send(TransportEvent::Failed(e.to_string()));
                                    break;
                                }
                                trace!("frame sent");
                            }

                            // Sender dropped: the channel released the link.
                            None => {
                                let _ = ws_write.close().await;
                                break;
                            }
                        }
                    }

                    message = ws_read.next() => {
                        match message {
                            Some(Ok(Message::Text(text))) => {
                                let _ = event_tx.send(TransportEvent::Message(text.to_string()));
                            }

                            Some(Ok(Message::Close(frame))) => {
                                debug!("WebSocket closed by remote");
                                let (code, reason) = match frame {
                                    Some(f) => {
                                        (Some(u16::from(f.code)), Some(f.reason.to_string()))
                                    }
                                    None => (None, None),
                                };
                                let _ = event_tx.send(TransportEvent::Closed { code, reason });
                                break;
                            }

                            Some(Err(e)) => {
                                warn!(error = %e, "WebSocket error");
                                let _ = event_tx.send(TransportEvent::Failed(e.to_string()));
                                let _ = event_tx.send(TransportEvent::Closed {
                                    code: None,
                                    reason: None,
                                });
                                break;
                            }

                            None => {
                                debug!("WebSocket stream ended");
                                let _ = event_tx.send(TransportEvent::Closed {
                                    code: None,
                                    reason: None,
                                });
                                break;
                            }

                            // Ignore Binary, Ping, Pong
                            _ => {}
                        }
                    }
                }
            }
        });

        Ok(TransportLink {
            outgoing: outgoing_tx,
            events: event_rx,
        })
    }
}

// ============================================================================
// Mock Transport (test support)
// ============================================================================
