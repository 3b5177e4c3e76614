//! Audio sink interface
//!
//! The engine assumes an abstract audio graph that can play a track by
//! URL and realize synthesis plans. The concrete device lives in the host
//! application; the engine only talks to this trait.

use crate::error::Result;
use crate::synth::RenderPlan;
use tracing::debug;

/// Abstract audio output device.
///
/// Implementations must be cheap to call from async context; anything
/// blocking belongs behind the implementation's own worker.
pub trait AudioSink: Send + Sync {
    /// Prepare the sink to play the given track URL from the start.
    fn load_track(&self, url: &str) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn seek(&self, position_secs: f64) -> Result<()>;

    /// Playback position of the loaded track, if the sink can report one.
    /// When None, the session falls back to cooperative tick progress.
    fn position_secs(&self) -> Option<f64>;

    /// Realize a synthesis plan (or decode and play an attached sample).
    /// Sample decode failures are reported as errors; the session logs
    /// and swallows them.
    fn render(&self, plan: &RenderPlan) -> Result<()>;
}

/// No-op sink for headless operation and tests.
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn load_track(&self, url: &str) -> Result<()> {
        debug!("NullAudioSink: load {}", url);
        Ok(())
    }

    fn play(&self) -> Result<()> {
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        Ok(())
    }

    fn seek(&self, _position_secs: f64) -> Result<()> {
        Ok(())
    }

    fn position_secs(&self) -> Option<f64> {
        None
    }

    fn render(&self, _plan: &RenderPlan) -> Result<()> {
        Ok(())
    }
}
