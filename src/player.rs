//! Playback controller: keeps the current song, its lyrics and the active
//! line in step with whatever actually plays the audio.

use log::{debug, info, warn};

use crate::config::{Playlist, Song};
use crate::source::{LyricLibrary, LyricsState};
use crate::sync::{ActiveLineChange, LineTracker};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Paused,
    Playing,
    Loading,
}

/// Notifications from the audio side, delivered in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// Current position in seconds.
    TimeUpdate(f64),
    LoadedMetadata { duration: f64 },
    Ended,
}

/// Transport commands the player issues to the audio side.
pub trait PlaybackBackend {
    fn load(&mut self, song: &Song) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn seek(&mut self, seconds: f64) -> Result<()>;
}

#[derive(Debug)]
pub struct Player<B> {
    playlist: Playlist,
    library: LyricLibrary,
    backend: B,
    index: usize,
    state: PlayerState,
    current_time: f64,
    duration: Option<f64>,
    lyrics: LyricsState,
    tracker: LineTracker,
}

impl<B: PlaybackBackend> Player<B> {
    /// Starts on the first song of the playlist.
    pub fn new(playlist: Playlist, library: LyricLibrary, backend: B) -> Self {
        let mut player = Self {
            playlist,
            library,
            backend,
            index: 0,
            state: PlayerState::Loading,
            current_time: 0.0,
            duration: None,
            lyrics: LyricsState::loading(),
            tracker: LineTracker::default(),
        };
        player.load_song(0);
        player
    }

    pub fn play_song(&mut self, index: usize) -> Result<()> {
        if index >= self.playlist.len() {
            return Err(Error::SongOutOfRange {
                index,
                len: self.playlist.len(),
            });
        }
        self.load_song(index);
        Ok(())
    }

    /// Resets position and lyrics, then tries to start playback. A backend
    /// that refuses to start leaves the player paused.
    fn load_song(&mut self, index: usize) {
        self.index = index;
        self.state = PlayerState::Loading;
        self.current_time = 0.0;
        self.duration = None;

        let song = &self.playlist.songs()[index];
        info!("Loading {} - {}", song.artist, song.title);

        let started = self
            .backend
            .load(song)
            .and_then(|_| self.backend.play());
        self.state = match started {
            Ok(()) => PlayerState::Playing,
            Err(e) => {
                warn!("Playback did not start for {}: {}", song.id, e);
                PlayerState::Paused
            }
        };

        let lyrics = self.library.load(song);
        debug!("{} lyric lines for {}", lyrics.timeline.len(), song.id);
        self.tracker.reset(lyrics.timeline.clone());
        self.lyrics = lyrics;
        self.tracker.update(self.current_time);
    }

    pub fn handle_event(&mut self, event: PlaybackEvent) -> Option<ActiveLineChange> {
        match event {
            PlaybackEvent::TimeUpdate(time) => {
                self.current_time = time;
                self.tracker.update(time)
            }
            PlaybackEvent::LoadedMetadata { duration } => {
                if duration.is_finite() && duration >= 0.0 {
                    self.duration = Some(duration);
                } else {
                    warn!("Ignoring invalid duration {}", duration);
                }
                None
            }
            PlaybackEvent::Ended => {
                self.next();
                None
            }
        }
    }

    pub fn play_pause(&mut self) {
        if self.state == PlayerState::Playing {
            if let Err(e) = self.backend.pause() {
                warn!("Pause failed: {}", e);
            }
            self.state = PlayerState::Paused;
        } else {
            self.state = match self.backend.play() {
                Ok(()) => PlayerState::Playing,
                Err(e) => {
                    warn!("Play failed: {}", e);
                    PlayerState::Paused
                }
            };
        }
    }

    pub fn next(&mut self) {
        self.load_song(self.playlist.next_index(self.index));
    }

    pub fn previous(&mut self) {
        self.load_song(self.playlist.prev_index(self.index));
    }

    /// Jump to `time`, clamped to the track. Before the duration is known
    /// only the lower bound applies. NaN is ignored.
    pub fn seek(&mut self, time: f64) -> Result<Option<ActiveLineChange>> {
        if time.is_nan() {
            warn!("Ignoring seek to NaN");
            return Ok(None);
        }
        let target = time.clamp(0.0, self.duration.unwrap_or(f64::INFINITY));
        self.backend.seek(target)?;
        self.current_time = target;
        Ok(self.tracker.update(target))
    }

    /// Seek to the start of a displayed lyric line.
    pub fn seek_to_line(&mut self, index: usize) -> Result<Option<ActiveLineChange>> {
        let timeline = &self.lyrics.timeline;
        let time = timeline
            .get(index)
            .map(|line| line.time)
            .ok_or(Error::LineOutOfRange {
                index,
                len: timeline.len(),
            })?;
        self.seek(time)
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_song(&self) -> &Song {
        &self.playlist.songs()[self.index]
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn lyrics(&self) -> &LyricsState {
        &self.lyrics
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tracker.current()
    }

    /// Listeners for active-line changes are registered here.
    pub fn tracker_mut(&mut self) -> &mut LineTracker {
        &mut self.tracker
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
