//! Transition/suggestion provider interface
//!
//! The provider is an external collaborator: given the ending and
//! upcoming tracks (or a free-text request, or a seed track) it returns
//! structured transition data or candidate tracks. Every method may fail;
//! the session substitutes deterministic fallbacks and never surfaces raw
//! provider errors to listener-facing state.

pub mod gemini;

use async_trait::async_trait;
use vdj_common::{GeneratedPlaylist, Track, TransitionResult};

use crate::error::Result;

/// Async source of transitions, suggestions, requested tracks, lyrics,
/// and vibe-driven playlists.
#[async_trait]
pub trait DjProvider: Send + Sync {
    /// Transition data for the handoff from `current` to `next`.
    async fn get_transition(&self, current: &Track, next: &Track) -> Result<TransitionResult>;

    /// A track similar to `seed`, avoiding anything in `exclude`.
    /// Ok(None) means the provider had nothing to offer.
    async fn get_suggestion(&self, seed: &Track, exclude: &[Track]) -> Result<Option<Track>>;

    /// Resolve a free-text listener request into a track, avoiding
    /// anything in `exclude`.
    async fn get_requested_track(&self, request: &str, exclude: &[Track])
        -> Result<Option<Track>>;

    /// Lyrics text for a track.
    async fn get_lyrics(&self, track: &Track) -> Result<String>;

    /// Playlist suggestions for a described party vibe.
    async fn generate_playlists(&self, vibe: &str) -> Result<Vec<GeneratedPlaylist>>;
}

/// Canned provider for headless use and tests: fixed responses, optional
/// blanket failure.
#[derive(Debug, Default)]
pub struct StaticProvider {
    pub transition: Option<TransitionResult>,
    pub suggestion: Option<Track>,
    pub requested: Option<Track>,
    pub lyrics: Option<String>,
    pub playlists: Vec<GeneratedPlaylist>,
    /// When true, every call returns a provider error
    pub fail: bool,
}

impl StaticProvider {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            Err(crate::error::Error::Provider(
                "static provider configured to fail".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DjProvider for StaticProvider {
    async fn get_transition(&self, _current: &Track, _next: &Track) -> Result<TransitionResult> {
        self.check()?;
        Ok(self
            .transition
            .clone()
            .unwrap_or_else(TransitionResult::fallback))
    }

    async fn get_suggestion(&self, _seed: &Track, _exclude: &[Track]) -> Result<Option<Track>> {
        self.check()?;
        Ok(self.suggestion.clone())
    }

    async fn get_requested_track(
        &self,
        _request: &str,
        _exclude: &[Track],
    ) -> Result<Option<Track>> {
        self.check()?;
        Ok(self.requested.clone())
    }

    async fn get_lyrics(&self, _track: &Track) -> Result<String> {
        self.check()?;
        Ok(self.lyrics.clone().unwrap_or_default())
    }

    async fn generate_playlists(&self, _vibe: &str) -> Result<Vec<GeneratedPlaylist>> {
        self.check()?;
        Ok(self.playlists.clone())
    }
}
