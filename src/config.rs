//! Playlist and lyric data supplied from a JSON config file.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub cover_url: String,
    /// Location handed to the playback backend (an MPD file URI for MPD).
    pub audio_url: String,
    /// Duration in seconds, when known ahead of playback.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Inline LRC text.
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub lyrics_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub songs: Vec<Song>,
    /// Directory searched for `Artist - Title.lrc`.
    #[serde(default)]
    pub lyrics_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// `~/.config/lyricsync/config.json` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lyricsync").join("config.json"))
    }

    /// Configured lyrics directory, or `~/Music/Lyrics`.
    pub fn lyrics_dir(&self) -> Option<PathBuf> {
        self.lyrics_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join("Music").join("Lyrics")))
    }

    fn validate(&self) -> Result<()> {
        if self.songs.is_empty() {
            return Err(Error::EmptyPlaylist);
        }
        let mut ids = HashSet::new();
        for song in &self.songs {
            if !ids.insert(song.id.as_str()) {
                return Err(Error::DuplicateSong(song.id.clone()));
            }
        }
        Ok(())
    }

    pub fn playlist(&self) -> Result<Playlist> {
        Playlist::new(self.songs.clone())
    }
}

/// Ordered, non-empty song list with wrap-around navigation.
#[derive(Debug, Clone)]
pub struct Playlist {
    songs: Vec<Song>,
}

impl Playlist {
    pub fn new(songs: Vec<Song>) -> Result<Self> {
        if songs.is_empty() {
            return Err(Error::EmptyPlaylist);
        }
        Ok(Self { songs })
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.songs.iter().position(|song| song.id == id)
    }

    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.songs.len()
    }

    pub fn prev_index(&self, index: usize) -> usize {
        (index + self.songs.len() - 1) % self.songs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "songs": [
            {
                "id": "custom-1",
                "title": "Demo",
                "artist": "Someone",
                "audio_url": "demo/demo.mp3",
                "lyrics": "[00:01.00]hello"
            },
            {
                "id": "b",
                "title": "Second",
                "artist": "Other",
                "cover_url": "https://example.com/b.jpg",
                "audio_url": "b.flac",
                "duration": 212.5
            }
        ],
        "lyrics_dir": "/srv/lyrics"
    }"#;

    fn song(id: &str) -> Song {
        Song {
            id: id.to_string(),
            title: format!("Title {}", id),
            artist: "Artist".to_string(),
            cover_url: String::new(),
            audio_url: format!("{}.mp3", id),
            duration: None,
            lyrics: None,
            lyrics_file: None,
        }
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json(JSON).unwrap();
        assert_eq!(config.songs.len(), 2);
        assert_eq!(config.songs[0].lyrics.as_deref(), Some("[00:01.00]hello"));
        assert_eq!(config.songs[0].cover_url, "");
        assert_eq!(config.songs[1].duration, Some(212.5));
        assert_eq!(config.lyrics_dir(), Some(PathBuf::from("/srv/lyrics")));
    }

    #[test]
    fn test_rejects_empty_playlist() {
        let result = Config::from_json(r#"{ "songs": [] }"#);
        assert!(matches!(result, Err(Error::EmptyPlaylist)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let config = Config {
            songs: vec![song("a"), song("a")],
            lyrics_dir: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(Config::from_json(&json), Err(Error::DuplicateSong(id)) if id == "a"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Config::from_json("{ songs"), Err(Error::Config(_))));
    }

    #[test]
    fn test_playlist_wraps() {
        let playlist = Playlist::new(vec![song("a"), song("b"), song("c")]).unwrap();
        assert_eq!(playlist.next_index(0), 1);
        assert_eq!(playlist.next_index(2), 0);
        assert_eq!(playlist.prev_index(0), 2);
        assert_eq!(playlist.prev_index(1), 0);
        assert_eq!(playlist.position("c"), Some(2));
        assert_eq!(playlist.position("zz"), None);
    }

    #[test]
    fn test_single_song_playlist_wraps_to_itself() {
        let playlist = Playlist::new(vec![song("only")]).unwrap();
        assert_eq!(playlist.next_index(0), 0);
        assert_eq!(playlist.prev_index(0), 0);
    }
}
