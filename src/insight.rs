//! Untimed lyrics and song insight from a text-generation service.
//!
//! Nothing here fails: every error is logged and replaced with a fixed
//! fallback so the caller always has something to display.

use log::error;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::Result;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const LYRICS_SYSTEM_INSTRUCTION: &str =
    "You are a professional songwriter and music database assistant.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongInsight {
    pub mood: String,
    pub meaning: String,
}

impl SongInsight {
    fn unknown(meaning: &str) -> Self {
        Self {
            mood: "Unknown".to_string(),
            meaning: meaning.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: Option<String>,
    /// When set, the response is expected to be JSON matching this schema.
    pub json_schema: Option<serde_json::Value>,
}

/// A text-generation service. Transport is up to the implementor.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Lyrics as display lines. These carry no timestamps and are never fed to
/// the timed parser.
pub fn fetch_lyrics<G: TextGenerator + ?Sized>(generator: &G, title: &str, artist: &str) -> Vec<String> {
    let request = GenerationRequest {
        model: DEFAULT_MODEL.to_string(),
        prompt: format!(
            "Write complete lyrics for the song \"{}\" by \"{}\".\n\
             If the song is instrumental or famous, generate appropriate lyrics or a poetic description that matches the vibe.\n\
             Format the output as plain text with line breaks. Separate stanzas with a double newline.\n\
             Do not include labels like [Chorus] or [Verse] or (Intro). Just the lyrics.",
            title, artist
        ),
        system_instruction: Some(LYRICS_SYSTEM_INSTRUCTION.to_string()),
        json_schema: None,
    };

    match generator.generate(&request) {
        Ok(text) => {
            let text = if text.is_empty() {
                "Lyrics unavailable."
            } else {
                text.as_str()
            };
            text.split('\n').map(str::to_string).collect()
        }
        Err(e) => {
            error!("Text generation failed (lyrics): {}", e);
            vec![
                "Could not load lyrics.".to_string(),
                "Please check your connection.".to_string(),
            ]
        }
    }
}

pub fn fetch_song_insight<G: TextGenerator + ?Sized>(generator: &G, title: &str, artist: &str) -> SongInsight {
    let request = GenerationRequest {
        model: DEFAULT_MODEL.to_string(),
        prompt: format!(
            "Analyze the song \"{}\" by \"{}\". Provide a very brief \"mood\" (1-2 words) and a short \"meaning\" (max 20 words).",
            title, artist
        ),
        system_instruction: None,
        json_schema: Some(json!({
            "type": "object",
            "properties": {
                "mood": { "type": "string" },
                "meaning": { "type": "string" }
            },
            "required": ["mood", "meaning"]
        })),
    };

    let text = match generator.generate(&request) {
        Ok(text) => text,
        Err(e) => {
            error!("Text generation failed (insight): {}", e);
            return SongInsight::unknown("Could not analyze song.");
        }
    };
    if text.is_empty() {
        return SongInsight::unknown("No insight available.");
    }

    match serde_json::from_str(&text) {
        Ok(insight) => insight,
        Err(e) => {
            error!("Malformed insight response: {}", e);
            SongInsight::unknown("Could not analyze song.")
        }
    }
}
