//! In-process event bus for queue updates.
//!
//! Lightweight broadcast channel so presentation layers can refresh after
//! mutations. One bus serves every session, so payloads carry the session id.

use tokio::sync::broadcast;

use playback_types::SessionId;

/// Event payloads published by the engine after session mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Pending queue contents or order changed.
    QueueChanged { session_id: SessionId },
    /// The "now playing" slot changed (advance/previous/reset).
    TrackChanged { session_id: SessionId },
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Create a new event bus with a bounded broadcast channel.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Notify subscribers that a session's queue changed.
    pub fn queue_changed(&self, session_id: SessionId) {
        let _ = self.sender.send(EngineEvent::QueueChanged { session_id });
    }

    /// Notify subscribers that a session's current track changed.
    pub fn track_changed(&self, session_id: SessionId) {
        let _ = self.sender.send(EngineEvent::TrackChanged { session_id });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
