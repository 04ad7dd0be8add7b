//! Queue engine facade.
//!
//! Single entry point for the command layer: each method takes a session id,
//! resolves (or lazily creates) the session through the store, runs the
//! operation inside that session's critical section, and publishes events
//! after mutations. No queue logic lives here.

use std::sync::Arc;

use tracing::debug;

use playback_types::{LoopMode, SessionId, Track};

use crate::config::EngineConfigResolved;
use crate::error::EngineError;
use crate::events::EventBus;
use crate::session::PlaybackSession;
use crate::store::SessionStore;

/// Cheaply clonable handle to the engine.
///
/// Operations on different session ids are independent; operations on the
/// same id serialize on that session's lock, so bursty commands (skip,
/// previous, enqueue) from one chat apply in some total order with no lost
/// updates.
#[derive(Clone)]
pub struct QueueEngine {
    store: Arc<SessionStore>,
    events: EventBus,
}

impl QueueEngine {
    /// Create an engine from resolved configuration.
    pub fn new(config: EngineConfigResolved) -> Self {
        Self {
            store: Arc::new(SessionStore::new(config.shard_count, config.history_limit)),
            events: EventBus::new(),
        }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfigResolved::default())
    }

    /// The event bus mutations are published on.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn with_session<T>(
        &self,
        session_id: SessionId,
        op: impl FnOnce(&mut PlaybackSession) -> T,
    ) -> T {
        let session = self.store.get_or_create(session_id);
        let mut guard = session.lock().unwrap_or_else(|err| err.into_inner());
        op(&mut guard)
    }

    /// Append a track to the tail of a session's queue.
    pub fn enqueue(&self, session_id: SessionId, track: Track) {
        self.with_session(session_id, |session| session.enqueue(track));
        self.events.queue_changed(session_id);
    }

    /// Append tracks in input order; returns the number appended.
    pub fn enqueue_many(&self, session_id: SessionId, tracks: Vec<Track>) -> usize {
        let added = self.with_session(session_id, |session| session.enqueue_many(tracks));
        if added > 0 {
            self.events.queue_changed(session_id);
        }
        added
    }

    /// Empty a session's pending queue.
    pub fn clear(&self, session_id: SessionId) {
        self.with_session(session_id, |session| session.clear());
        self.events.queue_changed(session_id);
    }

    /// Remove and return the pending track at `index`, if in bounds.
    pub fn remove(&self, session_id: SessionId, index: usize) -> Option<Track> {
        let removed = self.with_session(session_id, |session| session.remove(index));
        if removed.is_some() {
            self.events.queue_changed(session_id);
        }
        removed
    }

    /// Move a pending track between positions; `false` when out of bounds.
    pub fn move_track(&self, session_id: SessionId, from: usize, to: usize) -> bool {
        let moved = self.with_session(session_id, |session| session.move_track(from, to));
        if moved {
            self.events.queue_changed(session_id);
        }
        moved
    }

    /// Snapshot of a session's pending queue in playback order.
    pub fn queue(&self, session_id: SessionId) -> Vec<Track> {
        self.with_session(session_id, |session| session.queue_snapshot())
    }

    /// Advance to the next track; `None` means the queue is drained.
    pub fn advance(&self, session_id: SessionId) -> Option<Track> {
        let next = self.with_session(session_id, |session| session.advance());
        debug!(
            %session_id,
            next = next.as_ref().map(|t| t.id.as_str()),
            "advance"
        );
        self.events.track_changed(session_id);
        self.events.queue_changed(session_id);
        next
    }

    /// Go back to the most recent history entry; `None` when there is none.
    pub fn previous(&self, session_id: SessionId) -> Option<Track> {
        let prev = self.with_session(session_id, |session| session.previous());
        debug!(
            %session_id,
            previous = prev.as_ref().map(|t| t.id.as_str()),
            "previous"
        );
        if prev.is_some() {
            self.events.track_changed(session_id);
            self.events.queue_changed(session_id);
        }
        prev
    }

    /// The track currently in a session's "now playing" slot.
    pub fn current_track(&self, session_id: SessionId) -> Option<Track> {
        self.with_session(session_id, |session| session.current_track())
    }

    /// Up to `limit` history entries, most recent first.
    pub fn history(&self, session_id: SessionId, limit: usize) -> Vec<Track> {
        self.with_session(session_id, |session| session.history_snapshot(limit))
    }

    /// Set a session's loop mode from its wire name.
    ///
    /// Anything but `none|single|all` is rejected with
    /// [`EngineError::InvalidArgument`] and leaves the session untouched.
    pub fn set_loop_mode(&self, session_id: SessionId, mode: &str) -> Result<LoopMode, EngineError> {
        let mode: LoopMode = mode.parse()?;
        self.with_session(session_id, |session| session.set_loop_mode(mode));
        debug!(%session_id, %mode, "loop mode set");
        Ok(mode)
    }

    /// Cycle a session's loop mode; returns the new mode.
    pub fn toggle_loop_mode(&self, session_id: SessionId) -> LoopMode {
        let mode = self.with_session(session_id, |session| session.toggle_loop_mode());
        debug!(%session_id, %mode, "loop mode toggled");
        mode
    }

    /// A session's current loop mode.
    pub fn loop_mode(&self, session_id: SessionId) -> LoopMode {
        self.with_session(session_id, |session| session.loop_mode())
    }

    /// Set shuffle; enabling randomizes the pending queue once.
    pub fn set_shuffle(&self, session_id: SessionId, enabled: bool) -> bool {
        let enabled = self.with_session(session_id, |session| session.set_shuffle(enabled));
        debug!(%session_id, enabled, "shuffle set");
        self.events.queue_changed(session_id);
        enabled
    }

    /// Flip shuffle; returns the new state.
    pub fn toggle_shuffle(&self, session_id: SessionId) -> bool {
        let enabled = self.with_session(session_id, |session| session.toggle_shuffle());
        debug!(%session_id, enabled, "shuffle toggled");
        self.events.queue_changed(session_id);
        enabled
    }

    /// Whether shuffle is enabled for a session.
    pub fn shuffle_enabled(&self, session_id: SessionId) -> bool {
        self.with_session(session_id, |session| session.shuffle_enabled())
    }

    /// Restore a session to its initial empty state, keeping the entry alive.
    pub fn reset(&self, session_id: SessionId) {
        self.with_session(session_id, |session| session.reset());
        debug!(%session_id, "session reset");
        self.events.track_changed(session_id);
        self.events.queue_changed(session_id);
    }

    /// Number of sessions created so far.
    pub fn session_count(&self) -> usize {
        self.store.len()
    }
}
