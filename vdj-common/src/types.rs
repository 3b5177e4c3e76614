//! Core data model for the mix session
//!
//! Tracks, sound effects, transition results, and generated playlists.
//! All of these are immutable value types once constructed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A playable track with metadata and audio source.
///
/// Immutable once created. `duration_secs` is authoritative for the
/// progress-based transition fallback; when a real audio sink reports a
/// position, that position wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable unique identity
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    /// Cover/artwork image URL
    pub artwork_url: String,
    /// Track length in seconds (> 0)
    pub duration_secs: u32,
    /// Audio source URL handed to the audio sink
    pub audio_url: String,
    /// Optional link out to the track's canonical page
    pub external_url: Option<String>,
}

impl Track {
    /// Build a track with a fresh id and a deterministic artwork seed.
    pub fn new(title: impl Into<String>, artist: impl Into<String>, duration_secs: u32) -> Self {
        let title = title.into();
        let artwork_url = format!(
            "https://picsum.photos/seed/{}/300",
            urlencode(&title)
        );
        Self {
            id: Uuid::new_v4(),
            title,
            artist: artist.into(),
            artwork_url,
            duration_secs,
            audio_url: String::new(),
            external_url: None,
        }
    }

    /// "Title - Artist" display line used in event log content.
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// Minimal percent-encoding for artwork seed URLs.
///
/// Only needs to handle the characters that actually appear in track
/// titles; everything non-alphanumeric is escaped.
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// A short audio cue, synthesized procedurally unless a raw sample
/// payload is attached (the payload takes precedence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEffect {
    /// Table key for the synthesis engine (e.g. "se3")
    pub id: String,
    /// Human-facing name; transition results match against this,
    /// case-insensitively
    pub display_name: String,
    pub emoji: String,
    /// Raw sample payload; decoded and played as-is when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<u8>>,
}

impl SoundEffect {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            emoji: emoji.into(),
            sample: None,
        }
    }

    /// Banner text shown while the effect fires, e.g. "🎉 Crowd Cheer! 🎉".
    pub fn banner(&self) -> String {
        format!("{} {}! {}", self.emoji, self.display_name, self.emoji)
    }
}

/// Structured transition data produced by the provider for a track handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// DJ commentary surfaced to listeners
    pub commentary: String,
    /// Free-form transition technique label, e.g. "Crossfade", "Beatmatch"
    pub transition_style: String,
    /// Optional sound effect display name; unmatched names are ignored
    #[serde(default)]
    pub sound_effect: Option<String>,
}

impl TransitionResult {
    /// Deterministic substitute when the provider fails. Never surfaces
    /// the underlying error to listener-facing state.
    pub fn fallback() -> Self {
        Self {
            commentary: "Let's keep the party going!".to_string(),
            transition_style: "Crossfade".to_string(),
            sound_effect: None,
        }
    }
}

/// A named, ordered set of tracks produced by vibe-driven generation
/// (or the built-in starter library).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlaylist {
    pub id: Uuid,
    pub name: String,
    pub tracks: Vec<Track>,
}

impl GeneratedPlaylist {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tracks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_display_line() {
        let track = Track::new("Blinding Lights", "The Weeknd", 200);
        assert_eq!(track.display_line(), "Blinding Lights - The Weeknd");
    }

    #[test]
    fn test_artwork_seed_is_encoded() {
        let track = Track::new("Don't Start Now", "Dua Lipa", 183);
        assert!(track.artwork_url.contains("Don%27t%20Start%20Now"));
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = Track::new("A", "B", 1);
        let b = Track::new("A", "B", 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_fallback_transition() {
        let t = TransitionResult::fallback();
        assert_eq!(t.commentary, "Let's keep the party going!");
        assert_eq!(t.transition_style, "Crossfade");
        assert!(t.sound_effect.is_none());
    }

    #[test]
    fn test_effect_banner() {
        let fx = SoundEffect::new("se3", "Crowd Cheer", "🎉");
        assert_eq!(fx.banner(), "🎉 Crowd Cheer! 🎉");
    }
}
