use mpd::{Client, State};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::Song;
use crate::player::{PlaybackBackend, PlaybackEvent};
use crate::{Error, Result};

/// Plays songs from the MPD queue. A song's `audio_url` is its MPD file URI.
pub struct MPDClient {
    client: Client<TcpStream>,
    /// Queue position of the song the player loaded.
    loaded: Option<u32>,
    duration_reported: bool,
    was_playing: bool,
}

impl MPDClient {
    pub fn new(addr: &str) -> Result<Self> {
        let client = Client::connect(addr)?;
        Ok(Self {
            client,
            loaded: None,
            duration_reported: false,
            was_playing: false,
        })
    }

    fn queue_position(&mut self, file: &str) -> Result<u32> {
        self.client
            .queue()?
            .iter()
            .find(|song| song.file == file)
            .and_then(|song| song.place)
            .map(|place| place.pos)
            .ok_or_else(|| Error::NotQueued(file.to_string()))
    }

    /// Read MPD status once and translate it into playback events.
    /// Leaving the loaded queue entry, or stopping after playing, is the
    /// end of the track.
    pub fn poll(&mut self) -> Result<Vec<PlaybackEvent>> {
        let status = self.client.status()?;
        let mut events = Vec::new();

        if let Some(loaded) = self.loaded {
            let position = status.song.map(|place| place.pos);
            let stopped = matches!(status.state, State::Stop) && self.was_playing;
            if position != Some(loaded) || stopped {
                self.loaded = None;
                self.was_playing = false;
                events.push(PlaybackEvent::Ended);
                return Ok(events);
            }
        }

        if !self.duration_reported {
            if let Some(duration) = status.duration {
                self.duration_reported = true;
                events.push(PlaybackEvent::LoadedMetadata {
                    duration: duration.as_secs_f64(),
                });
            }
        }

        if let Some(elapsed) = status.elapsed {
            events.push(PlaybackEvent::TimeUpdate(elapsed.as_secs_f64()));
        }

        self.was_playing = matches!(status.state, State::Play);
        Ok(events)
    }
}

impl PlaybackBackend for MPDClient {
    /// MPD starts playing as soon as it switches entries.
    fn load(&mut self, song: &Song) -> Result<()> {
        let pos = self.queue_position(&song.audio_url)?;
        self.client.switch(pos)?;
        self.loaded = Some(pos);
        self.duration_reported = false;
        self.was_playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(self.client.play()?)
    }

    fn pause(&mut self) -> Result<()> {
        Ok(self.client.pause(true)?)
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        let time = Duration::try_from_secs_f64(seconds)
            .map_err(|e| Error::Playback(format!("bad seek target {}: {}", seconds, e)))?;
        let status = self.client.status()?;
        if let Some(pos) = seek_position(self.loaded, status.song.map(|place| place.pos)) {
            Ok(self.client.seek(pos, time)?)
        } else {
            Ok(())
        }
    }
}

/// The loaded song even if MPD has moved on; otherwise whatever MPD is on.
fn seek_position(loaded: Option<u32>, current: Option<u32>) -> Option<u32> {
    loaded.or(current)
}

pub fn format_time(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{}:{:02}", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_stays_on_loaded_song() {
        assert_eq!(seek_position(Some(3), Some(4)), Some(3));
        assert_eq!(seek_position(Some(3), None), Some(3));
        assert_eq!(seek_position(None, Some(4)), Some(4));
        assert_eq!(seek_position(None, None), None);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(8.52), "0:08");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(3599.9), "59:59");
    }
}
