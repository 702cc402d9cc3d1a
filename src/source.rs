//! Picks the lyric source for a song and turns it into a timeline.

use std::path::PathBuf;

use log::{debug, warn};

use crate::config::{Config, Song};
use crate::lyrics::Timeline;

/// Shown when a song has no lyric source at all.
pub const NOT_AVAILABLE: &str = "Lyrics not available for this track.";

/// Lyrics as the renderer sees them.
#[derive(Debug, Clone, Default)]
pub struct LyricsState {
    pub timeline: Timeline,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LyricsState {
    pub fn loaded(timeline: Timeline) -> Self {
        Self {
            timeline,
            is_loading: false,
            error: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LyricLibrary {
    lyrics_dir: Option<PathBuf>,
}

impl LyricLibrary {
    pub fn new(lyrics_dir: Option<PathBuf>) -> Self {
        Self { lyrics_dir }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.lyrics_dir())
    }

    /// Inline lyrics win over a configured file, which wins over
    /// `<lyrics_dir>/Artist - Title.lrc`. Anything unreadable falls through
    /// to the next source and finally to a one-line placeholder.
    pub fn resolve(&self, song: &Song) -> Timeline {
        self.load(song).timeline
    }

    /// Like [`LyricLibrary::resolve`], but also reports the last lyric file
    /// that could not be read in `error`.
    pub fn load(&self, song: &Song) -> LyricsState {
        if let Some(ref lrc) = song.lyrics {
            debug!("Using inline lyrics for {}", song.id);
            return LyricsState::loaded(Timeline::parse(lrc));
        }

        let mut error = None;
        let candidates = song
            .lyrics_file
            .clone()
            .into_iter()
            .chain(self.lrc_path(song).filter(|path| path.exists()));
        for path in candidates {
            match Timeline::from_file(&path) {
                Ok(timeline) => {
                    return LyricsState {
                        error,
                        ..LyricsState::loaded(timeline)
                    }
                }
                Err(e) => {
                    warn!("Failed to read lyrics file {}: {}", path.display(), e);
                    error = Some(format!("Could not read {}: {}", path.display(), e));
                }
            }
        }

        debug!("No lyrics for {} - {}", song.artist, song.title);
        LyricsState {
            error,
            ..LyricsState::loaded(Timeline::placeholder(NOT_AVAILABLE))
        }
    }

    /// Try "Artist - Title.lrc"
    fn lrc_path(&self, song: &Song) -> Option<PathBuf> {
        self.lyrics_dir
            .as_ref()
            .map(|dir| dir.join(format!("{} - {}.lrc", song.artist, song.title)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn song() -> Song {
        Song {
            id: "s1".to_string(),
            title: "Night Drive".to_string(),
            artist: "The Band".to_string(),
            cover_url: String::new(),
            audio_url: "night.mp3".to_string(),
            duration: None,
            lyrics: None,
            lyrics_file: None,
        }
    }

    #[test]
    fn test_no_source_gives_placeholder() {
        let timeline = LyricLibrary::new(None).resolve(&song());
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.lines()[0].text, NOT_AVAILABLE);
        assert_eq!(timeline.lines()[0].time, 0.0);
        for t in [0.0, 1.5, 60.0, 3600.0] {
            assert_eq!(timeline.active_index(t), Some(0));
        }
    }

    #[test]
    fn test_inline_lyrics_preferred() {
        let mut song = song();
        song.lyrics = Some("[00:02.00]second\n[00:01.00]first".to_string());
        song.lyrics_file = Some(PathBuf::from("/nonexistent/file.lrc"));
        let timeline = LyricLibrary::new(None).resolve(&song);
        assert_eq!(timeline.lines()[0].text, "first");
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_inline_lyrics_without_lines_stay_empty() {
        let mut song = song();
        song.lyrics = Some("no tags at all".to_string());
        assert!(LyricLibrary::new(None).resolve(&song).is_empty());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let mut song = song();
        song.lyrics_file = Some(PathBuf::from("/nonexistent/lyricsync/file.lrc"));
        let timeline = LyricLibrary::new(None).resolve(&song);
        assert_eq!(timeline.lines()[0].text, NOT_AVAILABLE);
    }

    #[test]
    fn test_lyrics_dir_lookup() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("The Band - Night Drive.lrc"), "[00:04.00]on the road\n").expect("write");

        let timeline = LyricLibrary::new(Some(dir.path().to_path_buf())).resolve(&song());
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.lines()[0].text, "on the road");
    }

    #[test]
    fn test_configured_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("custom.lrc");
        fs::write(&path, "[00:01.50]from file\n").expect("write");

        let mut song = song();
        song.lyrics_file = Some(path);
        let state = LyricLibrary::new(None).load(&song);
        assert_eq!(state.timeline.lines()[0].text, "from file");
        assert!(state.error.is_none());
    }

    #[test]
    fn test_latin1_byte_keeps_the_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("latin1.lrc");
        fs::write(&path, b"[00:01.00]first\n[00:02.00]caf\xe9\n[00:03.00]third").expect("write");

        let mut song = song();
        song.lyrics_file = Some(path);
        let timeline = LyricLibrary::new(None).resolve(&song);
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.lines()[2].text, "third");
    }

    #[test]
    fn test_unreadable_file_sets_error() {
        let mut song = song();
        song.lyrics_file = Some(PathBuf::from("/nonexistent/lyricsync/file.lrc"));
        let state = LyricLibrary::new(None).load(&song);
        assert_eq!(state.timeline.lines()[0].text, NOT_AVAILABLE);
        let error = state.error.expect("error recorded");
        assert!(error.contains("/nonexistent/lyricsync/file.lrc"));
    }

    #[test]
    fn test_unreadable_file_then_dir_lookup() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join("The Band - Night Drive.lrc"), "[00:04.00]on the road\n").expect("write");

        let mut song = song();
        song.lyrics_file = Some(PathBuf::from("/nonexistent/lyricsync/file.lrc"));
        let state = LyricLibrary::new(Some(dir.path().to_path_buf())).load(&song);
        assert_eq!(state.timeline.lines()[0].text, "on the road");
        assert!(state.error.is_some());
    }

    #[test]
    fn test_lyrics_state_constructors() {
        assert!(LyricsState::loading().is_loading);
        let state = LyricsState::loaded(Timeline::placeholder("x"));
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.timeline.len(), 1);
    }
}
