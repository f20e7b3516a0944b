//! Real-time channel state machine.
//!
//! [`RealtimeChannel`] owns at most one transport link at a time and
//! drives the connect / open / close / reconnect lifecycle:
//!
//! ```text
//! Idle ──► Connecting ──► Open ──► Closed ─┬─► Connecting (reconnect)
//!                                          └─► Disconnected (explicit)
//! ```
//!
//! Incoming frames are decoded and fanned out through the channel's
//! [`EventDispatcher`]; unplanned closes schedule counter-guarded
//! reconnect attempts; `disconnect()` cancels any pending attempt.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::{ClientFrame, ServerFrame};

use super::dispatcher::{ChannelEvent, EventDispatcher, EventKind, EventListener};
use super::transport::{Transport, TransportEvent};

// ============================================================================
// Constants
// ============================================================================

/// Default delay between reconnect attempts.
const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Default cap on consecutive reconnect attempts.
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;

// ============================================================================
// ConnectOptions
// ============================================================================

/// Connection options for the real-time channel.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Reconnect automatically after an unplanned close.
    pub auto_reconnect: bool,
    /// Delay before each reconnect attempt.
    pub reconnect_interval: Duration,
    /// Maximum consecutive reconnect attempts.
    pub max_reconnect_attempts: u32,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
        }
    }
}

impl ConnectOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets automatic reconnection.
    #[must_use]
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Sets the reconnect interval.
    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    /// Sets the reconnect attempt cap.
    #[must_use]
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }
}

// ============================================================================
// ChannelState
// ============================================================================

/// Lifecycle state of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Never connected.
    Idle,
    /// A connect attempt is in flight.
    Connecting,
    /// Connected and ready for control frames.
    Open,
    /// The transport dropped; a reconnect may be pending.
    Closed,
    /// Explicitly disconnected; no automatic action follows.
    Disconnected,
}

// ============================================================================
// Internal State
// ============================================================================

/// Mutable core guarded by the channel mutex.
struct ChannelCore {
    /// Writer half of the current transport link.
    writer: Option<mpsc::UnboundedSender<String>>,
    /// Options supplied to the most recent `connect` call.
    options: ConnectOptions,
    /// Consecutive unplanned-close reconnect attempts.
    reconnect_attempts: u32,
    /// Pending reconnect timer, if one is scheduled.
    reconnect_timer: Option<JoinHandle<()>>,
    /// Monotonic id of the current transport link. Stale reader tasks
    /// compare against this and go inert instead of double-driving the
    /// state machine.
    generation: u64,
}

struct ChannelInner {
    /// Derived WebSocket endpoint, credential included.
    endpoint: Url,
    transport: Arc<dyn Transport>,
    dispatcher: EventDispatcher,
    state_tx: watch::Sender<ChannelState>,
    core: Mutex<ChannelCore>,
}

// ============================================================================
// RealtimeChannel
// ============================================================================

/// Client for the real-time notification channel.
///
/// Created via [`Client::realtime`](crate::Client::realtime). The channel
/// persists across reconnects: the same instance transparently swaps in a
/// new transport link after an unplanned close. Listener registrations
/// live on the channel, not the link, so nothing needs replaying.
///
/// # Thread Safety
///
/// `RealtimeChannel` is `Send + Sync`; clones share the same connection
/// and listener registry.
pub struct RealtimeChannel {
    inner: Arc<ChannelInner>,
}

impl Clone for RealtimeChannel {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for RealtimeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeChannel")
            .field("state", &self.state())
            .field("reconnect_attempts", &self.reconnect_attempts())
            .finish_non_exhaustive()
    }
}

impl RealtimeChannel {
    /// Creates a channel for `endpoint` over the given transport.
    pub(crate) fn new(endpoint: Url, transport: Arc<dyn Transport>) -> Self {
        let (state_tx, _) = watch::channel(ChannelState::Idle);

        Self {
            inner: Arc::new(ChannelInner {
                endpoint,
                transport,
                dispatcher: EventDispatcher::new(),
                state_tx,
                core: Mutex::new(ChannelCore {
                    writer: None,
                    options: ConnectOptions::default(),
                    reconnect_attempts: 0,
                    reconnect_timer: None,
                    generation: 0,
                }),
            }),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ChannelState {
        *self.inner.state_tx.borrow()
    }

    /// Returns `true` when control frames can be sent.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    /// Consecutive reconnect attempts since the last successful open.
    #[inline]
    #[must_use]
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.core.lock().reconnect_attempts
    }

    // ========================================================================
    // Listener Registration
    // ========================================================================

    /// Registers `listener` for `kind` events. Chainable.
    ///
    /// Registration order defines dispatch order; registering the same
    /// listener twice yields two invocations per event.
    pub fn on(&self, kind: EventKind, listener: EventListener) -> &Self {
        self.inner.dispatcher.on(kind, listener);
        self
    }

    /// Removes every occurrence of `listener` under `kind`. Chainable.
    ///
    /// A no-op when the listener is not registered.
    pub fn off(&self, kind: EventKind, listener: &EventListener) -> &Self {
        self.inner.dispatcher.off(kind, listener);
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Connects with default options.
    ///
    /// See [`RealtimeChannel::connect_with`].
    pub async fn connect(&self) -> Result<()> {
        self.connect_with(ConnectOptions::default()).await
    }

    /// Connects with the given options.
    ///
    /// Resolves once the connection is open. Idempotent while open:
    /// returns `Ok` without opening a second transport. A call made while
    /// another connect is in flight joins that attempt instead of racing
    /// it, so at most one transport link ever exists.
    ///
    /// On open the channel resets its reconnect counter and emits `open`.
    /// After an unplanned close it emits `close` and, when
    /// `auto_reconnect` is set and the attempt cap is not exhausted,
    /// schedules a fire-and-forget retry after `reconnect_interval`;
    /// retry failures surface only as `error` events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the connection fails before
    /// open; an `error` event is emitted as well.
    pub async fn connect_with(&self, options: ConnectOptions) -> Result<()> {
        let mut state_rx = self.inner.state_tx.subscribe();

        loop {
            let claimed = {
                let mut core = self.inner.core.lock();
                // State reads stay under the core lock so two callers
                // cannot both claim the Connecting slot.
                let state = *self.inner.state_tx.borrow();
                match state {
                    ChannelState::Open => return Ok(()),
                    ChannelState::Connecting => false,
                    _ => {
                        core.options = options.clone();
                        self.inner.state_tx.send_replace(ChannelState::Connecting);
                        true
                    }
                }
            };

            if claimed {
                break;
            }

            // Join the in-flight attempt: wait for it to settle, then
            // re-evaluate (Open => done; failed => claim a fresh attempt).
            if state_rx.changed().await.is_err() {
                return Err(Error::transport("channel state tracking lost"));
            }
        }

        self.open_transport().await
    }

    /// Disconnects and disables automatic reconnection.
    ///
    /// Cancels any pending reconnect timer, releases the transport (which
    /// closes the socket; the resulting `close` event still fires), and
    /// leaves the channel in [`ChannelState::Disconnected`]. Idempotent.
    /// A later `connect` starts a fresh lifecycle.
    pub fn disconnect(&self) {
        let timer = {
            let mut core = self.inner.core.lock();
            core.options.auto_reconnect = false;
            core.writer = None;
            core.reconnect_timer.take()
        };

        if let Some(timer) = timer {
            timer.abort();
        }

        self.inner.state_tx.send_replace(ChannelState::Disconnected);
        debug!("real-time channel disconnected");
    }

    // ========================================================================
    // Control Operations
    // ========================================================================

    /// Subscribes to notifications from `source_service`.
    ///
    /// Fire-and-forget: exactly one control frame is sent and no
    /// acknowledgement is awaited.
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`] if `source_service` is empty
    /// - [`Error::ConnectionNotOpen`] if the channel is not open
    pub fn subscribe(&self, source_service: &str) -> Result<()> {
        if source_service.is_empty() {
            return Err(Error::parameter_required("source_service"));
        }
        self.send_frame(&ClientFrame::subscribe(source_service))
    }

    /// Unsubscribes from notifications from `source_service`.
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`] if `source_service` is empty
    /// - [`Error::ConnectionNotOpen`] if the channel is not open
    pub fn unsubscribe(&self, source_service: &str) -> Result<()> {
        if source_service.is_empty() {
            return Err(Error::parameter_required("source_service"));
        }
        self.send_frame(&ClientFrame::unsubscribe(source_service))
    }

    /// Acknowledges receipt of the notification with `notification_id`.
    ///
    /// Call after a `notification` frame arrives to confirm client-side
    /// receipt; the id comes from the frame (or from the REST facade at
    /// creation time).
    ///
    /// # Errors
    ///
    /// - [`Error::ParameterRequired`] if `notification_id` is empty
    /// - [`Error::ConnectionNotOpen`] if the channel is not open
    pub fn acknowledge(&self, notification_id: &str) -> Result<()> {
        if notification_id.is_empty() {
            return Err(Error::parameter_required("notification_id"));
        }
        self.send_frame(&ClientFrame::ack(notification_id))
    }

    /// Encodes and sends one control frame over the current link.
    fn send_frame(&self, frame: &ClientFrame) -> Result<()> {
        let core = self.inner.core.lock();

        if *self.inner.state_tx.borrow() != ChannelState::Open {
            return Err(Error::ConnectionNotOpen);
        }

        let writer = core.writer.as_ref().ok_or(Error::ConnectionNotOpen)?;
        let encoded = frame.encode()?;
        writer.send(encoded).map_err(|_| Error::ConnectionNotOpen)?;

        trace!("control frame sent");
        Ok(())
    }

    // ========================================================================
    // Connection Internals
    // ========================================================================

    /// Opens a transport link for an already-claimed Connecting state.
    async fn open_transport(&self) -> Result<()> {
        match self.inner.transport.open(&self.inner.endpoint).await {
            Ok(link) => {
                let generation = {
                    let mut core = self.inner.core.lock();
                    core.generation += 1;
                    core.writer = Some(link.outgoing);
                    core.reconnect_attempts = 0;
                    core.generation
                };

                self.inner.state_tx.send_replace(ChannelState::Open);
                debug!(generation, "real-time channel open");

                // Open fires before the reader starts so no queued frame
                // can be dispatched ahead of it.
                self.inner.dispatcher.dispatch(&ChannelEvent::Open);

                let inner = Arc::clone(&self.inner);
                tokio::spawn(Self::run_reader(inner, link.events, generation));

                Ok(())
            }

            Err(e) => {
                self.inner.state_tx.send_replace(ChannelState::Closed);
                warn!(error = %e, "connect failed");
                self.inner.dispatcher.dispatch(&ChannelEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Reader loop for one transport link.
    ///
    /// Decodes frames into `message` events, converts malformed payloads
    /// into `error` events, and hands the close to `handle_close`.
    async fn run_reader(
        inner: Arc<ChannelInner>,
        mut events: mpsc::UnboundedReceiver<TransportEvent>,
        generation: u64,
    ) {
        let mut close: (Option<u16>, Option<String>) = (None, None);

        loop {
            match events.recv().await {
                Some(TransportEvent::Message(text)) => match ServerFrame::decode(&text) {
                    Ok(frame) => {
                        inner.dispatcher.dispatch(&ChannelEvent::Message(frame));
                    }
                    Err(e) => {
                        warn!(error = %e, "malformed frame");
                        inner.dispatcher.dispatch(&ChannelEvent::Error {
                            message: format!("Failed to parse message: {e}"),
                        });
                    }
                },

                Some(TransportEvent::Failed(message)) => {
                    warn!(message = %message, "transport failure");
                    inner.dispatcher.dispatch(&ChannelEvent::Error { message });
                }

                Some(TransportEvent::Closed { code, reason }) => {
                    close = (code, reason);
                    break;
                }

                None => break,
            }
        }

        Self::handle_close(&inner, generation, close);
    }

    /// Handles the end of a transport link.
    fn handle_close(
        inner: &Arc<ChannelInner>,
        generation: u64,
        (code, reason): (Option<u16>, Option<String>),
    ) {
        {
            let mut core = inner.core.lock();

            // A newer link superseded this one; its close is not ours to
            // report.
            if core.generation != generation {
                return;
            }

            core.writer = None;

            if *inner.state_tx.borrow() != ChannelState::Disconnected {
                inner.state_tx.send_replace(ChannelState::Closed);
            }
        }

        debug!(?code, "real-time channel closed");
        inner.dispatcher.dispatch(&ChannelEvent::Closed { code, reason });

        Self::schedule_reconnect(inner);
    }

    /// Schedules the next reconnect attempt when policy allows.
    fn schedule_reconnect(inner: &Arc<ChannelInner>) {
        let delay = {
            let mut core = inner.core.lock();

            if !core.options.auto_reconnect
                || core.reconnect_attempts >= core.options.max_reconnect_attempts
            {
                return;
            }

            core.reconnect_attempts += 1;
            debug!(
                attempt = core.reconnect_attempts,
                max = core.options.max_reconnect_attempts,
                "scheduling reconnect"
            );
            core.options.reconnect_interval
        };

        let task_inner = Arc::clone(inner);
        let timer = tokio::spawn(async move {
            sleep(delay).await;

            // Policy is re-checked at fire time: a disconnect() issued
            // while the timer was pending must win.
            let wanted = {
                let core = task_inner.core.lock();
                let state = *task_inner.state_tx.borrow();
                core.options.auto_reconnect
                    && state != ChannelState::Disconnected
                    && state != ChannelState::Open
            };

            if !wanted {
                trace!("reconnect timer fired but reconnection is no longer wanted");
                return;
            }

            let options = task_inner.core.lock().options.clone();
            let channel = RealtimeChannel { inner: task_inner };

            // Fire-and-forget: a failed attempt has already emitted its
            // error event; all that remains is lining up the next try.
            if channel.connect_with(options).await.is_err() {
                Self::schedule_reconnect(&channel.inner);
            }
        });

        inner.core.lock().reconnect_timer = Some(timer);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::protocol::FrameType;
    use crate::realtime::transport::mock::MockTransport;

    fn test_channel(transport: MockTransport) -> RealtimeChannel {
        let endpoint = Url::parse("ws://localhost:8765/ws?apiKey=test-key").expect("url");
        RealtimeChannel::new(endpoint, Arc::new(transport))
    }

    fn fast_options() -> ConnectOptions {
        ConnectOptions::new()
            .with_reconnect_interval(Duration::from_millis(50))
            .with_max_reconnect_attempts(1)
    }

    fn counter_listener(counter: Arc<AtomicUsize>) -> EventListener {
        Arc::new(move |_event| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Lets spawned reader/collector tasks drain their queues.
    async fn settle() {
        sleep(Duration::from_millis(25)).await;
    }

    #[test]
    fn test_default_options() {
        let options = ConnectOptions::default();
        assert!(options.auto_reconnect);
        assert_eq!(options.reconnect_interval, Duration::from_secs(5));
        assert_eq!(options.max_reconnect_attempts, 10);
    }

    #[tokio::test]
    async fn test_connect_opens_and_emits_open() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let opens = Arc::new(AtomicUsize::new(0));
        channel.on(EventKind::Open, counter_listener(Arc::clone(&opens)));

        channel.connect().await.expect("connect");

        assert!(channel.is_open());
        assert_eq!(channel.state(), ChannelState::Open);
        assert_eq!(transport.connects(), 1);
        assert_eq!(opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_connect_is_idempotent_while_open() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());

        channel.connect().await.expect("first connect");
        channel.connect().await.expect("second connect");

        // No duplicate transport was opened.
        assert_eq!(transport.connects(), 1);
        assert_eq!(transport.session_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_while_connecting_joins_inflight_attempt() {
        let transport = MockTransport::new().with_connect_delay(Duration::from_millis(50));
        let channel = test_channel(transport.clone());
        let second = channel.clone();

        let (a, b) = tokio::join!(channel.connect(), second.connect());

        a.expect("first connect");
        b.expect("joined connect");
        assert_eq!(transport.connects(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_rejects_and_emits_error() {
        let transport = MockTransport::new();
        transport.fail_next_connects(1);
        let channel = test_channel(transport.clone());
        let errors = Arc::new(AtomicUsize::new(0));
        channel.on(EventKind::Error, counter_listener(Arc::clone(&errors)));

        let result = channel.connect().await;

        assert!(matches!(result, Err(Error::Transport { .. })));
        assert_eq!(channel.state(), ChannelState::Closed);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sends_exactly_one_frame() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        channel.connect().await.expect("connect");

        channel.subscribe("email_service").expect("subscribe");
        settle().await;

        let sent = transport.session(0).sent();
        assert_eq!(sent.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&sent[0]).expect("json");
        assert_eq!(value["action"], "subscribe");
        assert_eq!(value["source_service"], "email_service");
    }

    #[tokio::test]
    async fn test_unsubscribe_sends_exactly_one_frame() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        channel.connect().await.expect("connect");

        channel.unsubscribe("email_service").expect("unsubscribe");
        settle().await;

        let sent = transport.session(0).sent();
        assert_eq!(sent.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&sent[0]).expect("json");
        assert_eq!(value["action"], "unsubscribe");
    }

    #[tokio::test]
    async fn test_acknowledge_sends_ack_frame() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        channel.connect().await.expect("connect");

        channel.acknowledge("notif-789").expect("ack");
        settle().await;

        let sent = transport.session(0).sent();
        assert_eq!(sent.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&sent[0]).expect("json");
        assert_eq!(value["type"], "ack");
        assert_eq!(value["notification_id"], "notif-789");
    }

    #[tokio::test]
    async fn test_control_operations_require_open_channel() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());

        assert!(matches!(
            channel.subscribe("email_service"),
            Err(Error::ConnectionNotOpen)
        ));
        assert!(matches!(
            channel.unsubscribe("email_service"),
            Err(Error::ConnectionNotOpen)
        ));
        assert!(matches!(
            channel.acknowledge("notif-789"),
            Err(Error::ConnectionNotOpen)
        ));

        // Nothing was sent: no link was ever opened.
        assert_eq!(transport.session_count(), 0);
    }

    #[tokio::test]
    async fn test_control_operations_validate_parameters() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        channel.connect().await.expect("connect");

        assert!(matches!(
            channel.subscribe(""),
            Err(Error::ParameterRequired { .. })
        ));
        assert!(matches!(
            channel.acknowledge(""),
            Err(Error::ParameterRequired { .. })
        ));

        settle().await;
        assert!(transport.session(0).sent().is_empty());
    }

    #[tokio::test]
    async fn test_incoming_frame_dispatches_message_event() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let frames = Arc::new(Mutex::new(Vec::new()));
        {
            let frames = Arc::clone(&frames);
            channel.on(
                EventKind::Message,
                Arc::new(move |event| {
                    if let ChannelEvent::Message(frame) = event {
                        frames.lock().push(frame.clone());
                    }
                }),
            );
        }
        channel.connect().await.expect("connect");

        transport.session(0).push_text(
            r#"{"type":"notification","notification_id":"notif-1","source_service":"email_service","content":"hi"}"#,
        );
        settle().await;

        let frames = frames.lock();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].frame_type(), FrameType::Notification);
        assert_eq!(frames[0].notification_id(), Some("notif-1"));
    }

    #[tokio::test]
    async fn test_duplicate_listener_invoked_twice_per_frame() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let count = Arc::new(AtomicUsize::new(0));
        let listener = counter_listener(Arc::clone(&count));

        channel
            .on(EventKind::Message, Arc::clone(&listener))
            .on(EventKind::Message, Arc::clone(&listener));
        channel.connect().await.expect("connect");

        transport.session(0).push_text(r#"{"type":"system"}"#);
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // One removal drops every registered instance.
        channel.off(EventKind::Message, &listener);
        transport.session(0).push_text(r#"{"type":"system"}"#);
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_frame_becomes_error_event() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let messages = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));
        channel.on(EventKind::Message, counter_listener(Arc::clone(&messages)));
        {
            let errors = Arc::clone(&errors);
            channel.on(
                EventKind::Error,
                Arc::new(move |event| {
                    if let ChannelEvent::Error { message } = event {
                        errors.lock().push(message.clone());
                    }
                }),
            );
        }
        channel.connect().await.expect("connect");

        transport.session(0).push_text("not-valid-json");
        settle().await;

        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Failed to parse message"));
        assert_eq!(messages.load(Ordering::SeqCst), 0);
        // The connection survives the bad frame.
        assert!(channel.is_open());
    }

    #[tokio::test]
    async fn test_reconnects_after_remote_close() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let opens = Arc::new(AtomicUsize::new(0));
        channel.on(EventKind::Open, counter_listener(Arc::clone(&opens)));

        channel.connect_with(fast_options()).await.expect("connect");
        transport.session(0).force_close();

        sleep(Duration::from_millis(100)).await;

        assert_eq!(opens.load(Ordering::SeqCst), 2);
        assert_eq!(transport.connects(), 2);
        assert!(channel.is_open());
        // Counter resets on the successful reopen.
        assert_eq!(channel.reconnect_attempts(), 0);
    }

    #[tokio::test]
    async fn test_close_event_fires_before_reconnect() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let closes = Arc::new(AtomicUsize::new(0));
        channel.on(EventKind::Close, counter_listener(Arc::clone(&closes)));

        channel.connect_with(fast_options()).await.expect("connect");
        transport.session(0).force_close();
        sleep(Duration::from_millis(100)).await;

        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disconnect_cancels_pending_reconnect() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let opens = Arc::new(AtomicUsize::new(0));
        channel.on(EventKind::Open, counter_listener(Arc::clone(&opens)));

        channel.connect_with(fast_options()).await.expect("connect");
        transport.session(0).force_close();

        // Disconnect lands between the close and the timer firing.
        channel.disconnect();
        sleep(Duration::from_millis(150)).await;

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(transport.connects(), 1);
        assert_eq!(channel.state(), ChannelState::Disconnected);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());

        channel.connect().await.expect("connect");
        channel.disconnect();
        channel.disconnect();

        assert_eq!(channel.state(), ChannelState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_after_disconnect_starts_fresh() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());

        channel.connect().await.expect("connect");
        channel.disconnect();
        channel.connect().await.expect("reconnect");

        assert!(channel.is_open());
        assert_eq!(transport.connects(), 2);
    }

    #[tokio::test]
    async fn test_reconnect_attempts_are_capped() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let opens = Arc::new(AtomicUsize::new(0));
        channel.on(EventKind::Open, counter_listener(Arc::clone(&opens)));

        let options = ConnectOptions::new()
            .with_reconnect_interval(Duration::from_millis(20))
            .with_max_reconnect_attempts(2);
        channel.connect_with(options).await.expect("connect");

        // Every further connect fails; the close triggers the retry chain.
        transport.fail_next_connects(10);
        transport.session(0).force_close();

        sleep(Duration::from_millis(200)).await;

        // One real open, then exactly two failed attempts.
        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(transport.connects(), 3);
        assert_eq!(channel.reconnect_attempts(), 2);
        assert_eq!(channel.state(), ChannelState::Closed);
    }

    #[tokio::test]
    async fn test_post_open_failure_emits_error_without_closing() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());
        let errors = Arc::new(AtomicUsize::new(0));
        channel.on(EventKind::Error, counter_listener(Arc::clone(&errors)));

        channel.connect().await.expect("connect");
        transport.session(0).fail("connection reset by peer");
        settle().await;

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert!(channel.is_open());
    }

    #[tokio::test]
    async fn test_subscribe_after_reconnect_uses_new_link() {
        let transport = MockTransport::new();
        let channel = test_channel(transport.clone());

        channel.connect_with(fast_options()).await.expect("connect");
        transport.session(0).force_close();
        sleep(Duration::from_millis(100)).await;
        assert!(channel.is_open());

        channel.subscribe("email_service").expect("subscribe");
        settle().await;

        assert!(transport.session(0).sent().is_empty());
        assert_eq!(transport.session(1).sent().len(), 1);
    }
}
