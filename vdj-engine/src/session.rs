//! Mix session orchestration
//!
//! Coordinates the track queue, the transition provider, the sound effect
//! synthesis engine, and the session recorder. Single logical thread of
//! control with cooperative async operations; the only suspension points
//! are provider calls, the delayed effect fire, and the undo deadline.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;
use vdj_common::events::MixEventKind;
use vdj_common::{library, EngineConfig, GeneratedPlaylist, SoundEffect, Track, TransitionResult};

use crate::audio::AudioSink;
use crate::error::Result;
use crate::provider::DjProvider;
use crate::queue::TrackQueue;
use crate::recorder::SessionRecorder;
use crate::synth;

const WELCOME_COMMENTARY: &str = "Welcome to the party! Let's get this started!";
const DEFAULT_STYLE: &str = "Crossfade";
const LYRICS_FALLBACK: &str = "Couldn't fetch lyrics at the moment. Please try again.";

/// How long the fired-effect banner stays visible.
const BANNER_SECS: u64 = 2;

/// Playback state machine.
///
/// Idle -> Ready on playlist load; Ready/Paused <-> Playing via the play
/// toggle; Transitioning while a provider call for an advance is in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No queue loaded
    Idle,
    /// Queue loaded, never started or stopped at queue end
    Ready,
    Playing,
    Paused,
    /// Advance in flight; a second advance is refused until it settles
    Transitioning,
}

/// The mix session engine.
///
/// Owns playback/transition state and the queue; feeds the recorder via
/// explicit calls. The queue and recorder sit behind async mutexes so
/// background completions (delayed effects, auto-suggestions) can land
/// after further user actions, re-validating indices against the live
/// queue at insertion time.
pub struct MixSession {
    config: EngineConfig,
    queue: Arc<Mutex<TrackQueue>>,
    recorder: Arc<Mutex<SessionRecorder>>,
    provider: Arc<dyn DjProvider>,
    sink: Arc<dyn AudioSink>,

    state: PlaybackState,
    progress_secs: f64,
    commentary: String,
    transition_style: String,
    /// Banner text while an effect fires, e.g. "🎉 Crowd Cheer! 🎉"
    active_effect: Arc<Mutex<Option<String>>>,

    /// Known effects: the built-in nine plus any custom sample-backed ones
    effects: Vec<SoundEffect>,

    auto_suggest: bool,
    sound_effects: bool,
    effect_volume: f32,

    /// Successful user skips; every second one triggers a suggestion
    /// fetch. Reset only by `reset`, not by playlist reload.
    skip_count: u64,
}

impl MixSession {
    pub fn new(
        config: EngineConfig,
        provider: Arc<dyn DjProvider>,
        sink: Arc<dyn AudioSink>,
    ) -> Self {
        let undo_window = Duration::from_secs(config.undo_window_secs);
        Self {
            auto_suggest: config.auto_suggest,
            sound_effects: config.sound_effects,
            effect_volume: config.effect_volume,
            queue: Arc::new(Mutex::new(TrackQueue::new(undo_window))),
            recorder: Arc::new(Mutex::new(SessionRecorder::new())),
            provider,
            sink,
            state: PlaybackState::Idle,
            progress_secs: 0.0,
            commentary: WELCOME_COMMENTARY.to_string(),
            transition_style: DEFAULT_STYLE.to_string(),
            active_effect: Arc::new(Mutex::new(None)),
            effects: library::builtin_sound_effects(),
            skip_count: 0,
            config,
        }
    }

    // --- presentation accessors ---

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn progress_secs(&self) -> f64 {
        self.progress_secs
    }

    pub fn commentary(&self) -> &str {
        &self.commentary
    }

    pub fn transition_style(&self) -> &str {
        &self.transition_style
    }

    pub async fn active_effect(&self) -> Option<String> {
        self.active_effect.lock().await.clone()
    }

    pub fn effects(&self) -> &[SoundEffect] {
        &self.effects
    }

    /// Shared handle to the queue for presentation reads and view state.
    pub fn queue(&self) -> Arc<Mutex<TrackQueue>> {
        Arc::clone(&self.queue)
    }

    pub fn auto_suggest(&self) -> bool {
        self.auto_suggest
    }

    pub fn set_auto_suggest(&mut self, on: bool) {
        self.auto_suggest = on;
    }

    pub fn sound_effects_enabled(&self) -> bool {
        self.sound_effects
    }

    pub fn set_sound_effects_enabled(&mut self, on: bool) {
        self.sound_effects = on;
    }

    pub fn effect_volume(&self) -> f32 {
        self.effect_volume
    }

    pub fn set_effect_volume(&mut self, volume: f32) {
        self.effect_volume = volume.clamp(0.0, 1.0);
    }

    /// Register a custom effect (typically sample-backed). Replaces any
    /// existing effect with the same id.
    pub fn add_effect(&mut self, effect: SoundEffect) {
        self.effects.retain(|e| e.id != effect.id);
        self.effects.push(effect);
    }

    // --- playlist lifecycle ---

    /// Replace the queue with a playlist. Resets position, progress, and
    /// history; drops any pending removal. The skip counter is left
    /// alone on purpose.
    pub async fn load_playlist(&mut self, name: &str, tracks: Vec<Track>) -> Result<()> {
        let mut queue = self.queue.lock().await;
        queue.load(tracks);

        self.progress_secs = 0.0;
        if let Some(current) = queue.current() {
            if let Err(e) = self.sink.load_track(&current.audio_url) {
                warn!("Sink refused track load: {}", e);
            }
            self.state = PlaybackState::Ready;
        } else {
            self.state = PlaybackState::Idle;
        }

        self.commentary = format!("Kicking things off with a banger from the \"{}\" playlist!", name);
        self.transition_style = DEFAULT_STYLE.to_string();
        info!("Loaded playlist '{}' ({} tracks)", name, queue.len());
        Ok(())
    }

    /// Vibe-driven playlist generation with the starter library as the
    /// deterministic fallback.
    pub async fn generate_playlists(&self, vibe: &str) -> Vec<GeneratedPlaylist> {
        match self.provider.generate_playlists(vibe).await {
            Ok(playlists) if !playlists.is_empty() => playlists,
            Ok(_) => {
                warn!("Provider returned no playlists; using starter library");
                library::starter_playlists()
            }
            Err(e) => {
                warn!("Playlist generation failed ({}); using starter library", e);
                library::starter_playlists()
            }
        }
    }

    /// Reset every session field to its initial value.
    pub async fn reset(&mut self) {
        let undo_window = Duration::from_secs(self.config.undo_window_secs);
        {
            let mut queue = self.queue.lock().await;
            *queue = TrackQueue::new(undo_window);
        }
        {
            let mut recorder = self.recorder.lock().await;
            *recorder = SessionRecorder::new();
        }
        *self.active_effect.lock().await = None;

        let _ = self.sink.pause();
        self.state = PlaybackState::Idle;
        self.progress_secs = 0.0;
        self.commentary = WELCOME_COMMENTARY.to_string();
        self.transition_style = DEFAULT_STYLE.to_string();
        self.effects = library::builtin_sound_effects();
        self.auto_suggest = self.config.auto_suggest;
        self.sound_effects = self.config.sound_effects;
        self.effect_volume = self.config.effect_volume;
        self.skip_count = 0;
        info!("Session reset");
    }

    // --- playback control ---

    /// Start playback. No-op on an empty queue. The first activation of
    /// a track (progress zero) logs a track-started event.
    pub async fn play(&mut self) -> Result<()> {
        let current = {
            let queue = self.queue.lock().await;
            queue.current().cloned()
        };
        let Some(current) = current else {
            return Ok(());
        };

        if self.state == PlaybackState::Playing || self.state == PlaybackState::Transitioning {
            return Ok(());
        }

        if self.progress_secs == 0.0 {
            self.recorder
                .lock()
                .await
                .append(MixEventKind::TrackStarted, current.display_line());
        }

        if let Err(e) = self.sink.play() {
            warn!("Sink refused play: {}", e);
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Pause playback. No-op unless currently playing.
    pub async fn pause(&mut self) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }
        if let Err(e) = self.sink.pause() {
            warn!("Sink refused pause: {}", e);
        }
        self.state = PlaybackState::Paused;
        Ok(())
    }

    /// Play/pause toggle as a single user intent.
    pub async fn toggle_play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => self.pause().await,
            _ => self.play().await,
        }
    }

    /// Cooperative progress advancement for hosts without a native media
    /// position feed. When the sink reports a position, that wins.
    /// Progress never exceeds the track duration; reaching the end
    /// funnels into the advance path.
    pub async fn tick(&mut self, elapsed_secs: f64) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }

        let (duration, has_next) = {
            let queue = self.queue.lock().await;
            let Some(current) = queue.current() else {
                return Ok(());
            };
            (current.duration_secs as f64, queue.peek_next().is_some())
        };

        let raw = self
            .sink
            .position_secs()
            .unwrap_or(self.progress_secs + elapsed_secs);
        self.progress_secs = raw.min(duration);

        if self.progress_secs >= duration {
            if has_next {
                self.advance_to_next().await?;
            } else {
                // Nothing to advance into: hold at the end and stop
                let _ = self.sink.pause();
                self.state = PlaybackState::Paused;
            }
        }
        Ok(())
    }

    /// Jump to a position within the playing track, clamped to its
    /// duration. No-op on an empty queue.
    pub async fn seek(&mut self, position_secs: f64) -> Result<()> {
        let duration = {
            let queue = self.queue.lock().await;
            match queue.current() {
                Some(current) => current.duration_secs as f64,
                None => return Ok(()),
            }
        };

        let position = position_secs.clamp(0.0, duration);
        if let Err(e) = self.sink.seek(position) {
            warn!("Sink refused seek: {}", e);
        }
        self.progress_secs = position;
        Ok(())
    }

    /// Track-completion callback from a real audio sink.
    pub async fn on_track_ended(&mut self) -> Result<bool> {
        self.advance_to_next().await
    }

    /// Explicit user skip. Clears any pending removal first; every second
    /// successful skip fires a background suggestion fetch.
    pub async fn skip_next(&mut self) -> Result<bool> {
        let seed = {
            let mut queue = self.queue.lock().await;
            queue.clear_pending_removal();
            queue.current().cloned()
        };

        let advanced = self.advance_to_next().await?;
        if !advanced {
            return Ok(false);
        }

        self.skip_count += 1;
        if self.auto_suggest && self.skip_count % 2 == 0 {
            if let Some(seed) = seed {
                self.spawn_suggestion_fetch(seed);
            }
        }
        Ok(true)
    }

    /// Advance to the next track: append the finished track to history,
    /// fetch transition data (serialized; a second advance while one is
    /// in flight is refused), apply it or the fallback, schedule any
    /// suggested effect, then move the queue and log the new track.
    ///
    /// Returns false when there was nothing to advance into.
    pub async fn advance_to_next(&mut self) -> Result<bool> {
        if self.state == PlaybackState::Transitioning {
            warn!("Advance refused: transition already in flight");
            return Ok(false);
        }

        let (current, next) = {
            let queue = self.queue.lock().await;
            (queue.current().cloned(), queue.peek_next().cloned())
        };
        let (Some(current), Some(next)) = (current, next) else {
            debug!("Advance skipped: need both a current and a next track");
            return Ok(false);
        };

        let resume_state = self.state;
        self.state = PlaybackState::Transitioning;

        self.queue.lock().await.push_history(current.clone());

        let transition = match self.provider.get_transition(&current, &next).await {
            Ok(t) => t,
            Err(e) => {
                warn!("Transition provider failed ({}); using fallback", e);
                TransitionResult::fallback()
            }
        };

        self.apply_transition(&transition);

        {
            let mut queue = self.queue.lock().await;
            queue.advance();
        }
        self.progress_secs = 0.0;

        if let Err(e) = self.sink.load_track(&next.audio_url) {
            warn!("Sink refused track load: {}", e);
        }
        if resume_state == PlaybackState::Playing {
            if let Err(e) = self.sink.play() {
                warn!("Sink refused play: {}", e);
            }
        }

        {
            let mut recorder = self.recorder.lock().await;
            recorder.append(MixEventKind::TrackStarted, next.display_line());
            recorder.append(MixEventKind::Commentary, transition.commentary.clone());
        }

        self.state = resume_state;
        Ok(true)
    }

    /// Surface commentary/style and schedule a matched sound effect.
    fn apply_transition(&mut self, transition: &TransitionResult) {
        self.commentary = transition.commentary.clone();
        self.transition_style = transition.transition_style.clone();

        let Some(name) = &transition.sound_effect else {
            return;
        };
        if !self.sound_effects {
            return;
        }

        // Unmatched effect names are ignored, not an error
        match self.find_effect(name) {
            Some(effect) => {
                let delay = Duration::from_millis(self.config.effect_delay_ms);
                self.spawn_effect_fire(effect, delay);
            }
            None => debug!("Ignoring unknown effect name '{}'", name),
        }
    }

    fn find_effect(&self, display_name: &str) -> Option<SoundEffect> {
        self.effects
            .iter()
            .find(|e| e.display_name.eq_ignore_ascii_case(display_name))
            .cloned()
    }

    // --- queue mutation intents ---

    /// Resolve a free-text listener request and insert the result
    /// immediately after the playing track. Provider failure is a silent
    /// no-op; nothing is mutated.
    pub async fn request_track(&mut self, request: &str) -> Result<Option<Track>> {
        self.queue.lock().await.clear_pending_removal();

        let exclude = {
            let queue = self.queue.lock().await;
            queue.tracks().to_vec()
        };

        let track = match self.provider.get_requested_track(request, &exclude).await {
            Ok(Some(track)) => track,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Request '{}' failed: {}", request, e);
                return Ok(None);
            }
        };

        {
            // Target index computed against the queue as it is right now
            let mut queue = self.queue.lock().await;
            let index = queue.request_insert_index();
            queue.insert_at(track.clone(), index);
        }

        self.recorder.lock().await.append(
            MixEventKind::RequestAdded,
            format!("Guest requested: {} by {}", track.title, track.artist),
        );
        Ok(Some(track))
    }

    /// Remove a track by id, opening the undo window. Returns the removed
    /// track, or None for an unknown id.
    pub async fn remove_track(&mut self, id: Uuid) -> Option<Track> {
        let (removed, new_current, now_empty) = {
            let mut queue = self.queue.lock().await;
            let was_current = queue.current().map(|t| t.id) == Some(id);
            let removed = queue.remove_by_id(id)?;
            let new_current = was_current.then(|| queue.current().cloned()).flatten();
            (removed, new_current, queue.is_empty())
        };

        self.recorder.lock().await.append(
            MixEventKind::TrackRemoved,
            format!("Removed: {}", removed.title),
        );

        if now_empty {
            // Removing the last track stops playback entirely
            let _ = self.sink.pause();
            self.state = PlaybackState::Idle;
            self.progress_secs = 0.0;
        } else if let Some(next_up) = new_current {
            self.progress_secs = 0.0;
            if let Err(e) = self.sink.load_track(&next_up.audio_url) {
                warn!("Sink refused track load: {}", e);
            }
            if self.state == PlaybackState::Playing {
                let _ = self.sink.play();
            }
        }

        Some(removed)
    }

    /// Restore the most recently removed track if its undo window is
    /// still open.
    pub async fn undo_removal(&mut self) -> Option<Track> {
        let restored = self.queue.lock().await.undo_last_removal()?;
        self.recorder.lock().await.append(
            MixEventKind::Commentary,
            format!("Brought back \"{}\" by popular demand!", restored.title),
        );
        Some(restored)
    }

    /// Apply a caller-supplied permutation of the queue. The playing
    /// track keeps playing; pending removals are cancelled.
    pub async fn reorder(&mut self, new_order: Vec<Track>) -> Result<()> {
        self.queue.lock().await.reorder(new_order)
    }

    // --- effects ---

    /// Fire an effect right now (user pressed the pad). No-op while
    /// effects are disabled.
    pub async fn trigger_effect(&mut self, effect_id: &str) -> Result<()> {
        if !self.sound_effects {
            return Ok(());
        }
        let Some(effect) = self.effects.iter().find(|e| e.id == effect_id).cloned() else {
            return Err(crate::error::Error::NotFound(format!(
                "No such effect: {}",
                effect_id
            )));
        };

        fire_effect(
            effect,
            self.effect_volume,
            Arc::clone(&self.sink),
            Arc::clone(&self.recorder),
            Arc::clone(&self.active_effect),
        )
        .await;
        Ok(())
    }

    /// Fire an effect after the configured delay so it lands just past
    /// the transition moment.
    fn spawn_effect_fire(&self, effect: SoundEffect, delay: Duration) {
        let sink = Arc::clone(&self.sink);
        let recorder = Arc::clone(&self.recorder);
        let banner = Arc::clone(&self.active_effect);
        let volume = self.effect_volume;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire_effect(effect, volume, sink, recorder, banner).await;
        });
    }

    /// Best-effort background suggestion fetch. The insertion index is
    /// recomputed against the live queue when the result arrives, so the
    /// queue may have changed shape in the meantime.
    fn spawn_suggestion_fetch(&self, seed: Track) {
        let provider = Arc::clone(&self.provider);
        let queue = Arc::clone(&self.queue);
        let recorder = Arc::clone(&self.recorder);

        tokio::spawn(async move {
            let exclude = {
                let queue = queue.lock().await;
                queue.tracks().to_vec()
            };

            match provider.get_suggestion(&seed, &exclude).await {
                Ok(Some(track)) => {
                    {
                        let mut queue = queue.lock().await;
                        let index = queue.suggestion_insert_index();
                        queue.insert_at(track.clone(), index);
                    }
                    recorder.lock().await.append(
                        MixEventKind::SuggestionAdded,
                        format!("Added similar song: {} by {}", track.title, track.artist),
                    );
                }
                Ok(None) => debug!("Provider had no suggestion for '{}'", seed.title),
                Err(e) => warn!("Suggestion fetch failed: {}", e),
            }
        });
    }

    // --- recording ---

    pub async fn start_recording(&mut self) {
        self.recorder.lock().await.start();
    }

    pub async fn stop_recording(&mut self) -> Vec<vdj_common::MixEvent> {
        self.recorder.lock().await.stop()
    }

    pub async fn is_recording(&self) -> bool {
        self.recorder.lock().await.is_recording()
    }

    pub async fn export_log(&self) -> String {
        self.recorder.lock().await.export()
    }

    // --- lyrics ---

    /// Lyrics for the playing track, with an apologetic fallback line on
    /// provider failure.
    pub async fn fetch_lyrics(&self) -> String {
        let current = {
            let queue = self.queue.lock().await;
            queue.current().cloned()
        };
        let Some(current) = current else {
            return LYRICS_FALLBACK.to_string();
        };

        match self.provider.get_lyrics(&current).await {
            Ok(lyrics) if !lyrics.is_empty() => lyrics,
            Ok(_) => LYRICS_FALLBACK.to_string(),
            Err(e) => {
                warn!("Lyrics fetch failed: {}", e);
                LYRICS_FALLBACK.to_string()
            }
        }
    }
}

/// Log, banner, and render one effect invocation. Render failures
/// (sample decode, device refusal) are logged and swallowed; the effect
/// is skipped for this invocation only.
async fn fire_effect(
    effect: SoundEffect,
    volume: f32,
    sink: Arc<dyn AudioSink>,
    recorder: Arc<Mutex<SessionRecorder>>,
    banner: Arc<Mutex<Option<String>>>,
) {
    recorder
        .lock()
        .await
        .append(MixEventKind::EffectFired, effect.display_name.clone());
    *banner.lock().await = Some(effect.banner());

    let plan = synth::render(&effect, volume);
    if let Err(e) = sink.render(&plan) {
        warn!("Effect '{}' skipped: {}", effect.display_name, e);
    }

    let banner_clear = Arc::clone(&banner);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(BANNER_SECS)).await;
        *banner_clear.lock().await = None;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudioSink;
    use crate::provider::StaticProvider;

    fn make_tracks(titles: &[&str]) -> Vec<Track> {
        titles.iter().map(|t| Track::new(*t, "Artist", 180)).collect()
    }

    async fn make_session(provider: StaticProvider, titles: &[&str]) -> MixSession {
        let mut session = MixSession::new(
            EngineConfig::default(),
            Arc::new(provider),
            Arc::new(NullAudioSink),
        );
        if !titles.is_empty() {
            session
                .load_playlist("Test", make_tracks(titles))
                .await
                .unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_play_noop_on_empty_queue() {
        let mut session = make_session(StaticProvider::default(), &[]).await;
        session.play().await.unwrap();
        assert_eq!(session.state(), PlaybackState::Idle);
    }

    #[tokio::test]
    async fn test_play_pause_toggle() {
        let mut session = make_session(StaticProvider::default(), &["T1", "T2"]).await;
        assert_eq!(session.state(), PlaybackState::Ready);

        session.toggle_play().await.unwrap();
        assert_eq!(session.state(), PlaybackState::Playing);

        session.toggle_play().await.unwrap();
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[tokio::test]
    async fn test_tick_clamps_progress_to_duration() {
        let mut session = make_session(StaticProvider::default(), &["T1"]).await;
        session.play().await.unwrap();

        session.tick(500.0).await.unwrap();
        assert_eq!(session.progress_secs(), 180.0);
        // Single-track queue has nothing to advance into; playback stops
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[tokio::test]
    async fn test_seek_clamps_to_duration() {
        let mut session = make_session(StaticProvider::default(), &["T1"]).await;
        session.seek(999.0).await.unwrap();
        assert_eq!(session.progress_secs(), 180.0);
        session.seek(-3.0).await.unwrap();
        assert_eq!(session.progress_secs(), 0.0);
    }

    #[tokio::test]
    async fn test_advance_requires_next_track() {
        let mut session = make_session(StaticProvider::default(), &["T1"]).await;
        session.play().await.unwrap();
        assert!(!session.advance_to_next().await.unwrap());
    }

    #[tokio::test]
    async fn test_advance_applies_provider_commentary() {
        let provider = StaticProvider {
            transition: Some(TransitionResult {
                commentary: "Here comes the heat!".to_string(),
                transition_style: "Beatmatch".to_string(),
                sound_effect: None,
            }),
            ..StaticProvider::default()
        };
        let mut session = make_session(provider, &["T1", "T2"]).await;
        session.play().await.unwrap();

        assert!(session.advance_to_next().await.unwrap());
        assert_eq!(session.commentary(), "Here comes the heat!");
        assert_eq!(session.transition_style(), "Beatmatch");
        assert_eq!(session.state(), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_advance_refused_while_transitioning() {
        let mut session = make_session(StaticProvider::default(), &["T1", "T2"]).await;
        session.play().await.unwrap();

        session.state = PlaybackState::Transitioning;
        assert!(!session.advance_to_next().await.unwrap());

        // Queue untouched by the refused advance
        let queue = session.queue();
        let queue = queue.lock().await;
        assert_eq!(queue.current().unwrap().title, "T1");
        assert!(queue.history().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_uses_fallback() {
        let mut session = make_session(StaticProvider::failing(), &["T1", "T2", "T3"]).await;
        session.play().await.unwrap();

        assert!(session.advance_to_next().await.unwrap());
        assert_eq!(session.commentary(), "Let's keep the party going!");
        assert_eq!(session.transition_style(), "Crossfade");

        // Queue advanced despite the failure
        let queue = session.queue();
        let queue = queue.lock().await;
        assert_eq!(queue.current().unwrap().title, "T2");
        assert_eq!(queue.history()[0].title, "T1");
    }

    #[tokio::test]
    async fn test_request_track_inserts_after_current() {
        let requested = Track::new("Juice", "Lizzo", 195);
        let provider = StaticProvider {
            requested: Some(requested.clone()),
            ..StaticProvider::default()
        };
        let mut session = make_session(provider, &["T1", "T2", "T3"]).await;

        let inserted = session.request_track("something funky").await.unwrap();
        assert_eq!(inserted.unwrap().id, requested.id);

        let queue = session.queue();
        let queue = queue.lock().await;
        assert_eq!(queue.tracks()[1].title, "Juice");
    }

    #[tokio::test]
    async fn test_request_failure_is_silent_noop() {
        let mut session = make_session(StaticProvider::failing(), &["T1", "T2"]).await;
        let inserted = session.request_track("anything").await.unwrap();
        assert!(inserted.is_none());
        assert_eq!(session.queue().lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_last_track_stops_playback() {
        let mut session = make_session(StaticProvider::default(), &["T1"]).await;
        session.play().await.unwrap();

        let id = session.queue().lock().await.tracks()[0].id;
        session.remove_track(id).await.unwrap();

        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(session.queue().lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_effect_name_is_ignored() {
        let provider = StaticProvider {
            transition: Some(TransitionResult {
                commentary: "Boom".to_string(),
                transition_style: "Hard Cut".to_string(),
                sound_effect: Some("Kazoo Solo".to_string()),
            }),
            ..StaticProvider::default()
        };
        let mut session = make_session(provider, &["T1", "T2"]).await;
        session.play().await.unwrap();
        // Must not error even though the effect name matches nothing
        assert!(session.advance_to_next().await.unwrap());
    }

    #[tokio::test]
    async fn test_trigger_unknown_effect_errors() {
        let mut session = make_session(StaticProvider::default(), &["T1"]).await;
        assert!(session.trigger_effect("se999").await.is_err());
    }

    #[tokio::test]
    async fn test_trigger_effect_disabled_is_noop() {
        let mut session = make_session(StaticProvider::default(), &["T1"]).await;
        session.set_sound_effects_enabled(false);
        session.trigger_effect("se1").await.unwrap();
        assert!(session.active_effect().await.is_none());
    }

    #[tokio::test]
    async fn test_add_effect_replaces_by_id() {
        let mut session = make_session(StaticProvider::default(), &[]).await;
        let mut custom = SoundEffect::new("se1", "Custom Horn", "🎺");
        custom.sample = Some(vec![0u8; 16]);
        session.add_effect(custom);

        assert_eq!(session.effects().len(), 9);
        let horn = session.effects().iter().find(|e| e.id == "se1").unwrap();
        assert_eq!(horn.display_name, "Custom Horn");
        assert!(horn.sample.is_some());
    }

    #[tokio::test]
    async fn test_reset_restores_initial_state() {
        let mut session = make_session(StaticProvider::default(), &["T1", "T2"]).await;
        session.play().await.unwrap();
        session.skip_next().await.unwrap();
        session.start_recording().await;

        session.reset().await;
        assert_eq!(session.state(), PlaybackState::Idle);
        assert_eq!(session.commentary(), WELCOME_COMMENTARY);
        assert!(!session.is_recording().await);
        assert!(session.queue().lock().await.is_empty());
        assert_eq!(session.skip_count, 0);
    }
}
