//! Session store: lazily creates and owns one playback session per id.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use playback_types::SessionId;

use crate::session::PlaybackSession;

/// Default number of shards guarding the id -> session map.
pub const DEFAULT_SHARD_COUNT: usize = 16;

type Shard = Mutex<HashMap<SessionId, Arc<Mutex<PlaybackSession>>>>;

/// Sharded map of session id to session.
///
/// Each shard guards its own `HashMap`, so first-accesses for ids landing in
/// different shards never contend, while two concurrent first-accesses for
/// the same unseen id serialize on one shard lock and always observe a
/// single session instance. Entries are never removed implicitly; the store
/// grows with the number of distinct ids for the process lifetime.
pub struct SessionStore {
    shards: Vec<Shard>,
    history_limit: usize,
}

impl SessionStore {
    /// Create a store with the given shard count and per-session history cap.
    pub fn new(shard_count: usize, history_limit: usize) -> Self {
        let shard_count = shard_count.max(1);
        let shards = (0..shard_count)
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            shards,
            history_limit,
        }
    }

    fn shard(&self, session_id: SessionId) -> &Shard {
        let mut hasher = DefaultHasher::new();
        session_id.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }

    /// Return the session for `session_id`, constructing it on first access.
    pub fn get_or_create(&self, session_id: SessionId) -> Arc<Mutex<PlaybackSession>> {
        let mut shard = self
            .shard(session_id)
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        shard
            .entry(session_id)
            .or_insert_with(|| {
                tracing::debug!(%session_id, "creating playback session");
                Arc::new(Mutex::new(PlaybackSession::new(self.history_limit)))
            })
            .clone()
    }

    /// Return the session for `session_id` without creating one.
    pub fn get(&self, session_id: SessionId) -> Option<Arc<Mutex<PlaybackSession>>> {
        let shard = self
            .shard(session_id)
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        shard.get(&session_id).cloned()
    }

    /// Number of sessions created so far.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .lock()
                    .unwrap_or_else(|err| err.into_inner())
                    .len()
            })
            .sum()
    }

    /// `true` when no session has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all known sessions, in no particular order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.shards
            .iter()
            .flat_map(|shard| {
                shard
                    .lock()
                    .unwrap_or_else(|err| err.into_inner())
                    .keys()
                    .copied()
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
