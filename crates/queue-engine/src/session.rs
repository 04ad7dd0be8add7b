//! Per-session playback state machine.
//!
//! Owns the pending queue, current track, play history, and loop/shuffle
//! modes for one chat/room. Methods assume the caller holds the session's
//! lock (see [`crate::store::SessionStore`]); nothing here blocks or
//! performs I/O, so every operation is a single short critical section.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use playback_types::{LoopMode, Track};

/// Default cap on retained history entries per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// State for one listening session.
///
/// The session is Idle when `current` is empty and Playing otherwise. Only
/// [`advance`](Self::advance) moves a track into `current`; no operation can
/// ever produce two simultaneous current tracks.
#[derive(Debug)]
pub struct PlaybackSession {
    /// Upcoming tracks in playback order.
    pending: VecDeque<Track>,
    /// The "now playing" slot.
    current: Option<Track>,
    /// Previously current tracks, most recent first, trimmed to the limit.
    history: VecDeque<Track>,
    loop_mode: LoopMode,
    shuffle_enabled: bool,
    history_limit: usize,
}

impl PlaybackSession {
    /// Create an empty session with the given history cap.
    pub fn new(history_limit: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            history: VecDeque::new(),
            loop_mode: LoopMode::None,
            shuffle_enabled: false,
            history_limit,
        }
    }

    /// Append a track to the tail of the pending queue.
    pub fn enqueue(&mut self, track: Track) {
        self.pending.push_back(track);
    }

    /// Append tracks in input order; returns the number appended.
    pub fn enqueue_many(&mut self, tracks: Vec<Track>) -> usize {
        let count = tracks.len();
        self.pending.extend(tracks);
        count
    }

    /// Empty the pending queue. Current track and history are untouched.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove and return the pending track at `index`, if in bounds.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        self.pending.remove(index)
    }

    /// Move a pending track from one position to another.
    ///
    /// Returns `false` without mutation when either index is out of bounds.
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        if from >= self.pending.len() || to >= self.pending.len() {
            return false;
        }
        let Some(track) = self.pending.remove(from) else {
            return false;
        };
        self.pending.insert(to, track);
        true
    }

    /// Retire the current track to history and promote the next pending one.
    ///
    /// Under `loop=single` the current track is returned again with no queue
    /// or history mutation. An empty queue clears `current` (Playing -> Idle)
    /// and returns `None`. Under `loop=all` the promoted track is re-appended
    /// to the queue tail so it eventually cycles back.
    pub fn advance(&mut self) -> Option<Track> {
        if self.loop_mode == LoopMode::Single {
            if let Some(current) = &self.current {
                return Some(current.clone());
            }
        }

        let Some(next) = self.pending.pop_front() else {
            self.current = None;
            return None;
        };

        if let Some(previous) = self.current.take() {
            self.push_history(previous);
        }
        if self.loop_mode == LoopMode::All {
            self.pending.push_back(next.clone());
        }
        self.current = Some(next.clone());
        Some(next)
    }

    /// Go back to the most recent history entry.
    ///
    /// The superseded current track is reinserted at the queue head so a
    /// subsequent [`advance`](Self::advance) replays it, except when it is
    /// the same track (by id) as the one being returned. Returns `None`
    /// without mutation when history is empty.
    pub fn previous(&mut self) -> Option<Track> {
        let prev = self.history.front()?.clone();

        if let Some(current) = self.current.take() {
            if !current.same_track(&prev) {
                self.pending.push_front(current);
            }
        }
        if let Some(pos) = self.history.iter().position(|t| t.same_track(&prev)) {
            self.history.remove(pos);
        }
        self.current = Some(prev.clone());
        Some(prev)
    }

    /// Set the loop mode.
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    /// Cycle `none -> single -> all -> none`; returns the new mode.
    pub fn toggle_loop_mode(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.cycled();
        self.loop_mode
    }

    /// Set shuffle, randomizing the pending queue once on enabling.
    ///
    /// The reshuffle is one-shot: later enqueues append to the tail of the
    /// shuffled order and are not re-shuffled.
    pub fn set_shuffle(&mut self, enabled: bool) -> bool {
        self.set_shuffle_with(enabled, &mut rand::thread_rng())
    }

    /// [`set_shuffle`](Self::set_shuffle) with a caller-supplied RNG.
    pub fn set_shuffle_with<R: Rng>(&mut self, enabled: bool, rng: &mut R) -> bool {
        let enabling = enabled && !self.shuffle_enabled;
        self.shuffle_enabled = enabled;
        if enabling {
            self.pending.make_contiguous().shuffle(rng);
        }
        enabled
    }

    /// Flip shuffle; returns the new state.
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = !self.shuffle_enabled;
        self.set_shuffle(enabled)
    }

    /// The track in the "now playing" slot, if any.
    pub fn current_track(&self) -> Option<Track> {
        self.current.clone()
    }

    /// Defensive copy of the pending queue in playback order.
    pub fn queue_snapshot(&self) -> Vec<Track> {
        self.pending.iter().cloned().collect()
    }

    /// Defensive copy of up to `limit` history entries, most recent first.
    pub fn history_snapshot(&self, limit: usize) -> Vec<Track> {
        self.history.iter().take(limit).cloned().collect()
    }

    /// Current loop mode.
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Whether shuffle is enabled.
    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    /// Number of pending tracks.
    pub fn queue_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of retained history entries.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// `true` when nothing is in the "now playing" slot.
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Restore the initial empty state. The session entry itself stays alive.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.current = None;
        self.history.clear();
        self.loop_mode = LoopMode::None;
        self.shuffle_enabled = false;
    }

    fn push_history(&mut self, track: Track) {
        self.history.push_front(track);
        self.history.truncate(self.history_limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playback_types::TrackSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("title {id}"),
            artist: "artist".to_string(),
            source_url: format!("https://example.com/{id}"),
            thumbnail_url: None,
            duration_secs: Some(180),
            source: TrackSource::Youtube,
        }
    }

    fn session_with(ids: &[&str]) -> PlaybackSession {
        let mut session = PlaybackSession::new(DEFAULT_HISTORY_LIMIT);
        for id in ids {
            session.enqueue(track(id));
        }
        session
    }

    fn ids(tracks: &[Track]) -> Vec<String> {
        tracks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn enqueue_preserves_insertion_order() {
        let session = session_with(&["a", "b", "c"]);
        assert_eq!(ids(&session.queue_snapshot()), ["a", "b", "c"]);
    }

    #[test]
    fn advance_drains_fifo_in_exactly_n_calls() {
        let mut session = session_with(&["a", "b", "c"]);
        assert_eq!(session.advance().map(|t| t.id).as_deref(), Some("a"));
        assert_eq!(session.advance().map(|t| t.id).as_deref(), Some("b"));
        assert_eq!(session.advance().map(|t| t.id).as_deref(), Some("c"));
        assert!(!session.is_idle());
        // Fourth call on the drained queue moves Playing -> Idle.
        assert_eq!(session.advance(), None);
        assert!(session.is_idle());
        assert_eq!(session.queue_len(), 0);
    }

    #[test]
    fn advance_on_empty_queue_is_idle_noop() {
        let mut session = PlaybackSession::new(DEFAULT_HISTORY_LIMIT);
        assert_eq!(session.advance(), None);
        assert!(session.is_idle());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn loop_all_cycles_queue_back_to_original_order() {
        let mut session = session_with(&["a", "b", "c"]);
        session.set_loop_mode(LoopMode::All);

        let first = session.advance().expect("first");
        let _ = session.advance().expect("second");
        let _ = session.advance().expect("third");

        // After N advances the queue holds the original content and order.
        assert_eq!(ids(&session.queue_snapshot()), ["a", "b", "c"]);
        let again = session.advance().expect("wrap");
        assert!(again.same_track(&first));
    }

    #[test]
    fn loop_single_pins_current_without_mutation() {
        let mut session = session_with(&["a", "b"]);
        let current = session.advance().expect("current");
        session.set_loop_mode(LoopMode::Single);

        for _ in 0..5 {
            let replay = session.advance().expect("replay");
            assert!(replay.same_track(&current));
        }
        assert_eq!(ids(&session.queue_snapshot()), ["b"]);
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn loop_single_with_no_current_falls_through_to_queue() {
        let mut session = session_with(&["a"]);
        session.set_loop_mode(LoopMode::Single);
        assert_eq!(session.advance().map(|t| t.id).as_deref(), Some("a"));
    }

    #[test]
    fn history_is_bounded_and_most_recent_first() {
        let mut session = PlaybackSession::new(DEFAULT_HISTORY_LIMIT);
        for n in 0..60 {
            session.enqueue(track(&format!("t{n}")));
        }
        for _ in 0..60 {
            session.advance();
        }
        // 59 tracks were retired to history, trimmed to the cap.
        let history = session.history_snapshot(1000);
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history[0].id, "t58");
        assert_eq!(history[1].id, "t57");
    }

    #[test]
    fn previous_then_advance_round_trips() {
        let mut session = session_with(&["a", "b"]);
        assert_eq!(session.advance().map(|t| t.id).as_deref(), Some("a"));
        assert_eq!(session.advance().map(|t| t.id).as_deref(), Some("b"));

        assert_eq!(session.previous().map(|t| t.id).as_deref(), Some("a"));
        // The superseded track replays right after the one we went back to.
        assert_eq!(session.advance().map(|t| t.id).as_deref(), Some("b"));
    }

    #[test]
    fn previous_with_empty_history_is_noop() {
        let mut session = session_with(&["a"]);
        session.advance();
        assert_eq!(session.previous(), None);
        assert_eq!(session.current_track().map(|t| t.id).as_deref(), Some("a"));
    }

    #[test]
    fn previous_when_history_only_holds_current_does_not_duplicate() {
        // Degenerate state: history bookkeeping and current out of sync.
        let mut session = PlaybackSession::new(DEFAULT_HISTORY_LIMIT);
        session.current = Some(track("x"));
        session.history.push_front(track("x"));

        let prev = session.previous().expect("previous");
        assert_eq!(prev.id, "x");
        assert_eq!(session.current_track().map(|t| t.id).as_deref(), Some("x"));
        assert_eq!(session.queue_len(), 0);
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn previous_removes_first_occurrence_by_id() {
        let mut session = PlaybackSession::new(DEFAULT_HISTORY_LIMIT);
        session.current = Some(track("c"));
        session.history.push_front(track("a"));
        session.history.push_front(track("a"));

        assert_eq!(session.previous().map(|t| t.id).as_deref(), Some("a"));
        // Only one of the duplicate entries is consumed.
        assert_eq!(session.history_len(), 1);
        assert_eq!(ids(&session.queue_snapshot()), ["c"]);
    }

    #[test]
    fn shuffle_permutes_once_and_keeps_contents() {
        let ids_in: Vec<String> = (0..10).map(|n| format!("t{n}")).collect();
        let mut session = PlaybackSession::new(DEFAULT_HISTORY_LIMIT);
        for id in &ids_in {
            session.enqueue(track(id));
        }

        let mut rng = StdRng::seed_from_u64(7);
        session.set_shuffle_with(true, &mut rng);

        let shuffled = ids(&session.queue_snapshot());
        assert_ne!(shuffled, ids_in, "seed 7 must permute a 10-track queue");
        let mut sorted = shuffled.clone();
        sorted.sort();
        let mut expected = ids_in.clone();
        expected.sort();
        assert_eq!(sorted, expected);

        // New enqueues land at the tail without re-shuffling.
        session.enqueue(track("tail"));
        let after = ids(&session.queue_snapshot());
        assert_eq!(&after[..shuffled.len()], &shuffled[..]);
        assert_eq!(after.last().map(String::as_str), Some("tail"));
    }

    #[test]
    fn set_shuffle_when_already_enabled_does_not_reshuffle() {
        let mut session = session_with(&["a", "b", "c", "d", "e"]);
        let mut rng = StdRng::seed_from_u64(7);
        session.set_shuffle_with(true, &mut rng);
        let order = ids(&session.queue_snapshot());

        session.set_shuffle_with(true, &mut rng);
        assert_eq!(ids(&session.queue_snapshot()), order);
    }

    #[test]
    fn toggle_shuffle_flips_state() {
        let mut session = session_with(&["a"]);
        assert!(session.toggle_shuffle());
        assert!(session.shuffle_enabled());
        assert!(!session.toggle_shuffle());
        assert!(!session.shuffle_enabled());
    }

    #[test]
    fn toggle_loop_mode_cycles_three_states() {
        let mut session = PlaybackSession::new(DEFAULT_HISTORY_LIMIT);
        assert_eq!(session.toggle_loop_mode(), LoopMode::Single);
        assert_eq!(session.toggle_loop_mode(), LoopMode::All);
        assert_eq!(session.toggle_loop_mode(), LoopMode::None);
    }

    #[test]
    fn remove_and_move_are_bounds_checked() {
        let mut session = session_with(&["a", "b", "c"]);
        assert_eq!(session.remove(5), None);
        assert_eq!(session.remove(1).map(|t| t.id).as_deref(), Some("b"));
        assert_eq!(ids(&session.queue_snapshot()), ["a", "c"]);

        assert!(!session.move_track(0, 2));
        assert!(session.move_track(1, 0));
        assert_eq!(ids(&session.queue_snapshot()), ["c", "a"]);
    }

    #[test]
    fn clear_leaves_current_and_history_untouched() {
        let mut session = session_with(&["a", "b", "c"]);
        session.advance();
        session.advance();
        session.clear();
        assert_eq!(session.queue_len(), 0);
        assert_eq!(session.current_track().map(|t| t.id).as_deref(), Some("b"));
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut session = session_with(&["a", "b"]);
        session.advance();
        session.set_loop_mode(LoopMode::All);
        session.set_shuffle(true);

        session.reset();
        assert!(session.is_idle());
        assert_eq!(session.queue_len(), 0);
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.loop_mode(), LoopMode::None);
        assert!(!session.shuffle_enabled());
    }
}
