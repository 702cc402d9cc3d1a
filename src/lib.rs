//! Time-synchronized lyrics engine.
//!
//! Parses LRC-style lyric text into an immutable [`Timeline`], resolves the
//! active line for a playback position and reports active-line transitions
//! to whoever renders them. Audio playback and text generation are reached
//! through the [`PlaybackBackend`] and [`TextGenerator`] seams.

pub mod config;
pub mod insight;
pub mod lyrics;
pub mod mpd_client;
pub mod player;
pub mod source;
pub mod sync;

pub use config::{Config, Playlist, Song};
pub use insight::{SongInsight, TextGenerator};
pub use lyrics::{active_index, TimedLine, Timeline};
pub use player::{PlaybackBackend, PlaybackEvent, Player, PlayerState};
pub use source::{LyricLibrary, LyricsState, NOT_AVAILABLE};
pub use sync::{ActiveLineChange, LineTracker};

/// Result type for lyricsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lyricsync operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Playlist has no songs")]
    EmptyPlaylist,

    #[error("Duplicate song id: {0}")]
    DuplicateSong(String),

    #[error("Song {index} out of range (playlist has {len} songs)")]
    SongOutOfRange { index: usize, len: usize },

    #[error("Lyric line {index} out of range (timeline has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },

    #[error("MPD error: {0}")]
    Mpd(#[from] mpd::error::Error),

    #[error("Song not in MPD queue: {0}")]
    NotQueued(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Text generation failed: {0}")]
    Generation(String),
}
