//! Shared value types for the playback queue engine.
//!
//! Data only: track descriptors and mode enums exchanged between the engine,
//! the command layer, and the media resolver. No queue logic lives here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier for one independent listening session (one per chat/room).
///
/// Assigned by the chat layer; the engine treats it as opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SessionId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Catalog a track descriptor was resolved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackSource {
    Youtube,
    Spotify,
    Soundcloud,
    Local,
}

/// Immutable descriptor for a playable item.
///
/// Produced by an external resolver and returned verbatim by the engine; the
/// engine never fetches or transforms the media itself. `id` is unique within
/// `source` and is the identity used by queue/history bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque id, unique within `source`.
    pub id: String,
    /// Track title.
    pub title: String,
    /// Primary artist.
    pub artist: String,
    /// Canonical URL the media resolver plays from.
    pub source_url: String,
    /// Optional artwork URL.
    pub thumbnail_url: Option<String>,
    /// Duration in seconds, when the resolver knows it.
    pub duration_secs: Option<u64>,
    /// Originating catalog.
    pub source: TrackSource,
}

impl Track {
    /// Identity comparison by `id` (not structural equality).
    pub fn same_track(&self, other: &Track) -> bool {
        self.id == other.id
    }

    /// One-line display form: `title - artist [m:ss]`.
    pub fn display_line(&self) -> String {
        match self.duration_secs {
            Some(secs) => format!(
                "{} - {} [{}:{:02}]",
                self.title,
                self.artist,
                secs / 60,
                secs % 60
            ),
            None => format!("{} - {}", self.title, self.artist),
        }
    }
}

/// Loop behavior for a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Play through the queue once.
    #[default]
    None,
    /// Repeat the current track indefinitely.
    Single,
    /// Cycle the whole queue indefinitely.
    All,
}

impl LoopMode {
    /// Next mode in the `none -> single -> all -> none` cycle.
    pub fn cycled(self) -> Self {
        match self {
            LoopMode::None => LoopMode::Single,
            LoopMode::Single => LoopMode::All,
            LoopMode::All => LoopMode::None,
        }
    }

    /// Wire/display name.
    pub fn as_str(self) -> &'static str {
        match self {
            LoopMode::None => "none",
            LoopMode::Single => "single",
            LoopMode::All => "all",
        }
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loop-mode string outside `none|single|all`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown loop mode {0:?} (expected none, single or all)")]
pub struct UnknownLoopMode(pub String);

impl FromStr for LoopMode {
    type Err = UnknownLoopMode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(LoopMode::None),
            "single" => Ok(LoopMode::Single),
            "all" => Ok(LoopMode::All),
            _ => Err(UnknownLoopMode(raw.to_string())),
        }
    }
}
