//! Playback session & queue engine.
//!
//! Tracks one playback session per chat/room: an ordered pending queue, the
//! currently playing track, bounded play history, and loop/shuffle modes.
//! [`QueueEngine`] is the public entry point used by the command layer;
//! sessions are created lazily on first reference and live for the process
//! lifetime. The engine holds descriptors only and never touches media bytes.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod session;
pub mod store;

pub use config::{EngineConfig, EngineConfigResolved};
pub use engine::QueueEngine;
pub use error::EngineError;
pub use events::{EngineEvent, EventBus};
pub use playback_types::{LoopMode, SessionId, Track, TrackSource, UnknownLoopMode};
pub use session::PlaybackSession;
pub use store::SessionStore;
