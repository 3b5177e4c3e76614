//! Mix session engine
//!
//! Playback/transition state machine, queue manager with undo, procedural
//! sound effect synthesis, and the session recorder, tied together by
//! [`session::MixSession`]. Hosts supply an [`audio::AudioSink`] for actual
//! output and a [`provider::DjProvider`] for transitions, suggestions,
//! requests, lyrics, and playlist generation.

pub mod audio;
pub mod error;
pub mod provider;
pub mod queue;
pub mod recorder;
pub mod session;
pub mod synth;

pub use audio::{AudioSink, NullAudioSink};
pub use error::{Error, Result};
pub use provider::{DjProvider, StaticProvider};
pub use queue::{QueueView, TrackQueue};
pub use recorder::SessionRecorder;
pub use session::{MixSession, PlaybackState};
pub use synth::{RenderPlan, ScheduledVoice};
