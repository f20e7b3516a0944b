//! Event dispatch for the real-time channel.
//!
//! The channel fans out lifecycle and message events to registered
//! listeners. Listeners are stored per event kind in registration order;
//! dispatch iterates a snapshot of the list so a listener may register or
//! remove listeners (including itself) mid-dispatch, and a panicking
//! listener never aborts delivery to the rest.

// ============================================================================
// Imports
// ============================================================================

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{error, trace};

use crate::error::Error;
use crate::protocol::ServerFrame;

// ============================================================================
// EventKind
// ============================================================================

/// The four recognized event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A decoded frame arrived.
    Message,
    /// The connection opened (including after a reconnect).
    Open,
    /// The connection closed.
    Close,
    /// A transport or decode failure occurred.
    Error,
}

impl EventKind {
    /// Returns the category name.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Open => "open",
            Self::Close => "close",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    /// Parses a category name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEventCategory`] for anything other than
    /// `message`, `open`, `close`, or `error`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Self::Message),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "error" => Ok(Self::Error),
            other => Err(Error::unknown_event_category(other)),
        }
    }
}

// ============================================================================
// ChannelEvent
// ============================================================================

/// An event delivered to channel listeners.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// The connection opened.
    Open,

    /// A frame arrived and decoded successfully.
    Message(ServerFrame),

    /// The connection closed.
    Closed {
        /// Close code, when the transport provided one.
        code: Option<u16>,
        /// Close reason, when the transport provided one.
        reason: Option<String>,
    },

    /// A transport failure or malformed incoming frame.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl ChannelEvent {
    /// Returns the category this event dispatches under.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Open => EventKind::Open,
            Self::Message(_) => EventKind::Message,
            Self::Closed { .. } => EventKind::Close,
            Self::Error { .. } => EventKind::Error,
        }
    }
}

// ============================================================================
// EventListener
// ============================================================================

/// A listener callback registered with the channel.
///
/// Listeners are compared by `Arc` identity: registering the same `Arc`
/// twice yields two independent invocations per event, and one removal
/// drops every occurrence of that `Arc`.
pub type EventListener = Arc<dyn Fn(&ChannelEvent) + Send + Sync + 'static>;

// ============================================================================
// EventDispatcher
// ============================================================================

/// Ordered listener registry with panic-isolated fan-out.
///
/// Owned by the channel; each channel instance has its own registry, so
/// independent clients in one process never share listeners.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Mutex<FxHashMap<EventKind, Vec<EventListener>>>,
}

impl EventDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener` under `kind`.
    ///
    /// Registration order defines dispatch order. Duplicate registration
    /// is not de-duplicated.
    pub fn on(&self, kind: EventKind, listener: EventListener) {
        self.listeners.lock().entry(kind).or_default().push(listener);
    }

    /// Removes every occurrence of `listener` under `kind`.
    ///
    /// Matching is by `Arc` identity. A no-op when the listener was never
    /// registered under that kind.
    pub fn off(&self, kind: EventKind, listener: &EventListener) {
        if let Some(list) = self.listeners.lock().get_mut(&kind) {
            list.retain(|l| !Arc::ptr_eq(l, listener));
        }
    }

    /// Invokes every listener registered for the event's kind.
    ///
    /// Iterates a snapshot taken at dispatch start, in registration
    /// order. A panicking listener is caught and logged; delivery to the
    /// remaining listeners continues and nothing propagates to the
    /// caller.
    pub fn dispatch(&self, event: &ChannelEvent) {
        let kind = event.kind();
        let snapshot: Vec<EventListener> = self
            .listeners
            .lock()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        trace!(kind = %kind, listeners = snapshot.len(), "dispatching event");

        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!(kind = %kind, "listener panicked during dispatch");
            }
        }
    }

    /// Number of listeners currently registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.lock().get(&kind).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.lock();
        f.debug_struct("EventDispatcher")
            .field("message", &listeners.get(&EventKind::Message).map_or(0, Vec::len))
            .field("open", &listeners.get(&EventKind::Open).map_or(0, Vec::len))
            .field("close", &listeners.get(&EventKind::Close).map_or(0, Vec::len))
            .field("error", &listeners.get(&EventKind::Error).map_or(0, Vec::len))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(counter: Arc<AtomicUsize>) -> EventListener {
        Arc::new(move |_event| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_event_kind_from_str() {
        assert_eq!("message".parse::<EventKind>().unwrap(), EventKind::Message);
        assert_eq!("open".parse::<EventKind>().unwrap(), EventKind::Open);
        assert_eq!("close".parse::<EventKind>().unwrap(), EventKind::Close);
        assert_eq!("error".parse::<EventKind>().unwrap(), EventKind::Error);
    }

    #[test]
    fn test_unknown_event_category() {
        let err = "reconnect".parse::<EventKind>().unwrap_err();
        assert!(matches!(err, Error::UnknownEventCategory { .. }));
        assert_eq!(err.to_string(), "Unknown event category: reconnect");
    }

    #[test]
    fn test_dispatch_reaches_registered_listener() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));

        dispatcher.on(EventKind::Open, counting_listener(Arc::clone(&count)));
        dispatcher.dispatch(&ChannelEvent::Open);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_ignores_other_kinds() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));

        dispatcher.on(EventKind::Message, counting_listener(Arc::clone(&count)));
        dispatcher.dispatch(&ChannelEvent::Open);

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_duplicate_registration_invokes_twice() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let listener = counting_listener(Arc::clone(&count));

        dispatcher.on(EventKind::Message, Arc::clone(&listener));
        dispatcher.on(EventKind::Message, Arc::clone(&listener));
        dispatcher.dispatch(&ChannelEvent::Message(
            crate::protocol::ServerFrame::from_value(serde_json::json!({"type":"system"})),
        ));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_single_off_removes_all_occurrences() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let listener = counting_listener(Arc::clone(&count));

        dispatcher.on(EventKind::Message, Arc::clone(&listener));
        dispatcher.on(EventKind::Message, Arc::clone(&listener));
        dispatcher.off(EventKind::Message, &listener);

        dispatcher.dispatch(&ChannelEvent::Message(
            crate::protocol::ServerFrame::from_value(serde_json::json!({"type":"system"})),
        ));

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.listener_count(EventKind::Message), 0);
    }

    #[test]
    fn test_off_unregistered_is_noop() {
        let dispatcher = EventDispatcher::new();
        let listener = counting_listener(Arc::new(AtomicUsize::new(0)));

        dispatcher.off(EventKind::Close, &listener);
        assert_eq!(dispatcher.listener_count(EventKind::Close), 0);
    }

    #[test]
    fn test_dispatch_order_is_registration_order() {
        let dispatcher = EventDispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            dispatcher.on(
                EventKind::Open,
                Arc::new(move |_event| order.lock().push(tag)),
            );
        }

        dispatcher.dispatch(&ChannelEvent::Open);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_panicking_listener_does_not_abort_dispatch() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));

        dispatcher.on(EventKind::Open, Arc::new(|_event| panic!("listener bug")));
        dispatcher.on(EventKind::Open, counting_listener(Arc::clone(&count)));

        // Must not propagate the panic.
        dispatcher.dispatch(&ChannelEvent::Open);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_remove_itself_mid_dispatch() {
        let dispatcher = Arc::new(EventDispatcher::new());
        let count = Arc::new(AtomicUsize::new(0));

        let slot: Arc<Mutex<Option<EventListener>>> = Arc::new(Mutex::new(None));
        let listener: EventListener = {
            let dispatcher = Arc::clone(&dispatcher);
            let slot = Arc::clone(&slot);
            let count = Arc::clone(&count);
            Arc::new(move |_event| {
                count.fetch_add(1, Ordering::SeqCst);
                if let Some(me) = slot.lock().as_ref() {
                    dispatcher.off(EventKind::Open, me);
                }
            })
        };
        *slot.lock() = Some(Arc::clone(&listener));

        dispatcher.on(EventKind::Open, Arc::clone(&listener));
        dispatcher.dispatch(&ChannelEvent::Open);
        dispatcher.dispatch(&ChannelEvent::Open);

        // Invoked once, then gone.
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.listener_count(EventKind::Open), 0);
    }

    #[test]
    fn test_channel_event_kind_mapping() {
        assert_eq!(ChannelEvent::Open.kind(), EventKind::Open);
        assert_eq!(
            ChannelEvent::Closed {
                code: None,
                reason: None
            }
            .kind(),
            EventKind::Close
        );
        assert_eq!(
            ChannelEvent::Error {
                message: String::new()
            }
            .kind(),
            EventKind::Error
        );
    }
}
