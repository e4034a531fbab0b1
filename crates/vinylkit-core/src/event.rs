//! Session event publishing
//!
//! The device session pushes progress and state changes to subscribers
//! through an [`EventDispatcher`] it owns. There is no global broadcaster;
//! whoever constructs the session decides who gets to listen.
//!
//! Two subscription styles are offered, matching how callers consume
//! events:
//! - [`EventDispatcher::subscribe`] returns a broadcast receiver for async
//!   consumers (UI tasks, log forwarders)
//! - [`EventDispatcher::on`] registers a synchronous handler invoked on the
//!   publishing thread, keyed by a [`SubscriptionId`] for removal

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::data::{Position, SessionState};

/// Events published by the device session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A link to the device was established.
    Connected {
        /// Serial port path that was connected.
        port: String,
    },
    /// The link was torn down.
    Disconnected,
    /// A transport or device error surfaced.
    Error {
        /// Human-readable error message.
        message: String,
    },
    /// Session status snapshot changed.
    Status {
        /// Current session state.
        state: SessionState,
        /// Last known machine position.
        position: Position,
        /// Whether the machine has been homed this session.
        homed: bool,
    },
    /// The device reported its position.
    Position {
        /// Reported X coordinate in mm.
        x: f64,
        /// Reported Y coordinate in mm.
        y: f64,
    },
    /// A homing cycle completed.
    Homed {
        /// Position after homing (the origin).
        position: Position,
    },
    /// One instruction of a streaming job was delivered.
    Progress {
        /// Instructions delivered so far.
        completed: usize,
        /// Total instructions in the program.
        total: usize,
        /// `completed / total`.
        fraction: f64,
    },
    /// A streaming job delivered every instruction.
    Complete,
    /// An emergency stop was issued.
    EmergencyStop,
}

impl SessionEvent {
    /// Short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            SessionEvent::Connected { port } => format!("connected to {}", port),
            SessionEvent::Disconnected => "disconnected".to_string(),
            SessionEvent::Error { message } => format!("error: {}", message),
            SessionEvent::Status { state, .. } => format!("status: {}", state),
            SessionEvent::Position { x, y } => format!("position X{:.3} Y{:.3}", x, y),
            SessionEvent::Homed { .. } => "homed".to_string(),
            SessionEvent::Progress {
                completed, total, ..
            } => format!("progress {}/{}", completed, total),
            SessionEvent::Complete => "complete".to_string(),
            SessionEvent::EmergencyStop => "emergency stop".to_string(),
        }
    }
}

/// Subscription handle for unsubscribing a synchronous handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(SessionEvent) + Send + Sync>;

/// Publish/subscribe dispatcher owned by the device session
#[derive(Clone)]
pub struct EventDispatcher {
    /// Broadcast channel sender for async receivers
    sender: broadcast::Sender<SessionEvent>,
    /// Registered synchronous handlers
    handlers: Arc<RwLock<HashMap<SubscriptionId, EventHandler>>>,
}

impl EventDispatcher {
    /// Create a dispatcher with the given broadcast capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Handlers run on the publishing thread, then the event is broadcast
    /// to async receivers. Returns the number of async receivers; a missing
    /// audience is not an error.
    pub fn publish(&self, event: SessionEvent) -> usize {
        tracing::trace!(event = %event.description(), "session event");

        let handlers = self.handlers.read();
        for handler in handlers.values() {
            handler(event.clone());
        }

        self.sender.send(event).unwrap_or(0)
    }

    /// Get a receiver for async event consumption
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Register a synchronous handler
    ///
    /// The handler is called on the publishing thread, so it should return
    /// quickly to avoid blocking event dispatch.
    pub fn on<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(SessionEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, Box::new(handler));
        tracing::debug!("handler {} registered", id);
        id
    }

    /// Remove a previously registered handler
    ///
    /// Returns true if the subscription was found and removed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("handler {} removed", id);
        }
        removed
    }

    /// Number of registered synchronous handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(256)
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_register_and_remove_handler() {
        let dispatcher = EventDispatcher::default();

        let id = dispatcher.on(|_| {});
        assert_eq!(dispatcher.handler_count(), 1);

        assert!(dispatcher.off(id));
        assert_eq!(dispatcher.handler_count(), 0);

        // Double removal should return false
        assert!(!dispatcher.off(id));
    }

    #[test]
    fn test_handler_delivery() {
        let dispatcher = EventDispatcher::default();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let _id = dispatcher.on(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.publish(SessionEvent::Disconnected);
        dispatcher.publish(SessionEvent::Complete);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let dispatcher = EventDispatcher::default();
        assert_eq!(dispatcher.publish(SessionEvent::Complete), 0);
    }

    #[tokio::test]
    async fn test_async_receiver() {
        let dispatcher = EventDispatcher::default();
        let mut receiver = dispatcher.subscribe();

        dispatcher.publish(SessionEvent::Connected {
            port: "/dev/ttyUSB0".to_string(),
        });

        match receiver.try_recv() {
            Ok(SessionEvent::Connected { port }) => assert_eq!(port, "/dev/ttyUSB0"),
            other => panic!("wrong event received: {:?}", other),
        }
    }
}
