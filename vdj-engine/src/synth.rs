//! Procedural sound effect synthesis
//!
//! Turns an effect id plus a playback volume into a scheduled rendering
//! plan with no external asset dependency. Each effect is described by a
//! declarative table entry (one or more voice specs); a single generic
//! renderer consumes the table. If the effect carries a raw sample
//! payload, the sample takes precedence over synthesis.
//!
//! Every call is a fresh, independent render. There is no shared mutable
//! synthesis state, so concurrent renders cannot interfere.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vdj_common::SoundEffect;

/// Signal source for one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceSource {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    /// White noise buffer; frequency fields are ignored
    Noise,
}

/// How the voice frequency moves from start to end over its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepCurve {
    /// Hold the start frequency
    Flat,
    Linear,
    Exponential,
}

/// Amplitude envelope applied over the voice duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecayShape {
    /// Hold peak gain until the hard stop
    Flat,
    /// Exponential decay from peak toward `floor` (near-zero) at the stop
    ExponentialDecay { floor: f32 },
}

/// One voice of an effect: source, frequency sweep, envelope, duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSpec {
    pub source: VoiceSource,
    pub start_freq_hz: f32,
    pub end_freq_hz: f32,
    pub sweep: SweepCurve,
    /// Peak gain relative to the requested volume, usually 1.0
    pub peak_gain: f32,
    pub decay: DecayShape,
    /// Fixed voice duration in seconds (0.15–1.5 across the table)
    pub duration_secs: f32,
}

/// A voice with its gain resolved against the requested volume. All
/// voices of a plan start at the same instant; each stops independently
/// at its own duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledVoice {
    pub source: VoiceSource,
    pub start_freq_hz: f32,
    pub end_freq_hz: f32,
    pub sweep: SweepCurve,
    /// Absolute starting gain (peak_gain x volume, in [0, 1])
    pub gain: f32,
    pub decay: DecayShape,
    pub duration_secs: f32,
}

/// The audio sink's work order for one effect invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPlan {
    /// Play an attached raw sample once at the given volume
    Sample { bytes: Vec<u8>, volume: f32 },
    /// Synthesize the scheduled voices
    Voices(Vec<ScheduledVoice>),
}

const AIR_HORN: &[VoiceSpec] = &[VoiceSpec {
    source: VoiceSource::Sawtooth,
    start_freq_hz: 350.0,
    end_freq_hz: 450.0,
    sweep: SweepCurve::Linear,
    peak_gain: 1.0,
    decay: DecayShape::Flat,
    duration_secs: 0.4,
}];

const RECORD_SCRATCH: &[VoiceSpec] = &[VoiceSpec {
    source: VoiceSource::Sine,
    start_freq_hz: 1200.0,
    end_freq_hz: 100.0,
    sweep: SweepCurve::Exponential,
    peak_gain: 1.0,
    decay: DecayShape::ExponentialDecay { floor: 0.01 },
    duration_secs: 0.4,
}];

const CROWD_CHEER: &[VoiceSpec] = &[VoiceSpec {
    source: VoiceSource::Noise,
    start_freq_hz: 0.0,
    end_freq_hz: 0.0,
    sweep: SweepCurve::Flat,
    peak_gain: 1.0,
    decay: DecayShape::Flat,
    duration_secs: 0.8,
}];

const LASER: &[VoiceSpec] = &[VoiceSpec {
    source: VoiceSource::Triangle,
    start_freq_hz: 800.0,
    end_freq_hz: 200.0,
    sweep: SweepCurve::Linear,
    peak_gain: 1.0,
    decay: DecayShape::Flat,
    duration_secs: 0.2,
}];

// Sub drop plus a punch layer on top
const DROP: &[VoiceSpec] = &[
    VoiceSpec {
        source: VoiceSource::Square,
        start_freq_hz: 150.0,
        end_freq_hz: 40.0,
        sweep: SweepCurve::Exponential,
        peak_gain: 1.0,
        decay: DecayShape::ExponentialDecay { floor: 0.01 },
        duration_secs: 0.6,
    },
    VoiceSpec {
        source: VoiceSource::Noise,
        start_freq_hz: 0.0,
        end_freq_hz: 0.0,
        sweep: SweepCurve::Flat,
        peak_gain: 0.4,
        decay: DecayShape::ExponentialDecay { floor: 0.01 },
        duration_secs: 0.15,
    },
];

const HAND_CLAP: &[VoiceSpec] = &[VoiceSpec {
    source: VoiceSource::Noise,
    start_freq_hz: 0.0,
    end_freq_hz: 0.0,
    sweep: SweepCurve::Flat,
    peak_gain: 1.0,
    decay: DecayShape::ExponentialDecay { floor: 0.01 },
    duration_secs: 0.15,
}];

// Two-tone horn dyad, both voices fire together
const CAR_HORN: &[VoiceSpec] = &[
    VoiceSpec {
        source: VoiceSource::Sawtooth,
        start_freq_hz: 400.0,
        end_freq_hz: 400.0,
        sweep: SweepCurve::Flat,
        peak_gain: 0.7,
        decay: DecayShape::Flat,
        duration_secs: 0.5,
    },
    VoiceSpec {
        source: VoiceSource::Sawtooth,
        start_freq_hz: 505.0,
        end_freq_hz: 505.0,
        sweep: SweepCurve::Flat,
        peak_gain: 0.7,
        decay: DecayShape::Flat,
        duration_secs: 0.5,
    },
];

const JET_TAKE_OFF: &[VoiceSpec] = &[
    VoiceSpec {
        source: VoiceSource::Noise,
        start_freq_hz: 0.0,
        end_freq_hz: 0.0,
        sweep: SweepCurve::Flat,
        peak_gain: 1.0,
        decay: DecayShape::ExponentialDecay { floor: 0.05 },
        duration_secs: 1.5,
    },
    VoiceSpec {
        source: VoiceSource::Sine,
        start_freq_hz: 120.0,
        end_freq_hz: 900.0,
        sweep: SweepCurve::Exponential,
        peak_gain: 0.3,
        decay: DecayShape::Flat,
        duration_secs: 1.2,
    },
];

const WHISTLE: &[VoiceSpec] = &[VoiceSpec {
    source: VoiceSource::Sine,
    start_freq_hz: 2000.0,
    end_freq_hz: 3000.0,
    sweep: SweepCurve::Linear,
    peak_gain: 1.0,
    decay: DecayShape::Flat,
    duration_secs: 0.5,
}];

/// Effect id to voice table. Anything not listed here gets the generic
/// square blip from `default_blip`.
static EFFECT_TABLE: &[(&str, &[VoiceSpec])] = &[
    ("se1", AIR_HORN),
    ("se2", RECORD_SCRATCH),
    ("se3", CROWD_CHEER),
    ("se4", LASER),
    ("se5", DROP),
    ("se6", HAND_CLAP),
    ("se7", CAR_HORN),
    ("se8", JET_TAKE_OFF),
    ("se9", WHISTLE),
];

/// Generic square-wave blip for unrecognized ids. The pitch is nudged by
/// any trailing digits in the id so distinct unknown effects still sound
/// distinct.
fn default_blip(id: &str) -> VoiceSpec {
    let n: f32 = id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0.0);

    VoiceSpec {
        source: VoiceSource::Square,
        start_freq_hz: 600.0 + n * 50.0,
        end_freq_hz: 600.0 + n * 50.0,
        sweep: SweepCurve::Flat,
        peak_gain: 1.0,
        decay: DecayShape::Flat,
        duration_secs: 0.4,
    }
}

/// Look up the voice table entry for an effect id.
pub fn voices_for(id: &str) -> Vec<VoiceSpec> {
    EFFECT_TABLE
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, voices)| voices.to_vec())
        .unwrap_or_else(|| vec![default_blip(id)])
}

/// Produce the rendering plan for one effect invocation.
///
/// Volume is clamped into [0, 1]; volume 0 yields a well-formed plan with
/// a zero-amplitude envelope rather than an error.
pub fn render(effect: &SoundEffect, volume: f32) -> RenderPlan {
    let volume = volume.clamp(0.0, 1.0);

    if let Some(bytes) = &effect.sample {
        debug!("Rendering '{}' from attached sample", effect.display_name);
        return RenderPlan::Sample {
            bytes: bytes.clone(),
            volume,
        };
    }

    let voices = voices_for(&effect.id)
        .into_iter()
        .map(|spec| ScheduledVoice {
            source: spec.source,
            start_freq_hz: spec.start_freq_hz,
            end_freq_hz: spec.end_freq_hz,
            sweep: spec.sweep,
            gain: spec.peak_gain * volume,
            decay: spec.decay,
            duration_secs: spec.duration_secs,
        })
        .collect();

    RenderPlan::Voices(voices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crowd_cheer_is_noise() {
        let fx = SoundEffect::new("se3", "Crowd Cheer", "🎉");
        match render(&fx, 1.0) {
            RenderPlan::Voices(voices) => {
                assert_eq!(voices.len(), 1);
                assert_eq!(voices[0].source, VoiceSource::Noise);
                assert_eq!(voices[0].duration_secs, 0.8);
                assert_eq!(voices[0].gain, 1.0);
            }
            RenderPlan::Sample { .. } => panic!("expected synthesis"),
        }
    }

    #[test]
    fn test_zero_volume_renders_silent_plan() {
        let fx = SoundEffect::new("se3", "Crowd Cheer", "🎉");
        let RenderPlan::Voices(voices) = render(&fx, 0.0) else {
            panic!("expected synthesis");
        };
        assert!(voices.iter().all(|v| v.gain == 0.0));
        assert!(!voices.is_empty());
    }

    #[test]
    fn test_volume_is_clamped() {
        let fx = SoundEffect::new("se1", "Air Horn", "📢");
        let RenderPlan::Voices(voices) = render(&fx, 7.5) else {
            panic!("expected synthesis");
        };
        assert_eq!(voices[0].gain, 1.0);
    }

    #[test]
    fn test_unknown_id_gets_square_blip() {
        let fx = SoundEffect::new("se42", "Mystery", "❓");
        let RenderPlan::Voices(voices) = render(&fx, 1.0) else {
            panic!("expected synthesis");
        };
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].source, VoiceSource::Square);
        assert_eq!(voices[0].start_freq_hz, 600.0 + 42.0 * 50.0);
    }

    #[test]
    fn test_sample_payload_takes_precedence() {
        let mut fx = SoundEffect::new("se1", "Air Horn", "📢");
        fx.sample = Some(vec![1, 2, 3]);
        match render(&fx, 0.5) {
            RenderPlan::Sample { bytes, volume } => {
                assert_eq!(bytes, vec![1, 2, 3]);
                assert_eq!(volume, 0.5);
            }
            RenderPlan::Voices(_) => panic!("expected sample passthrough"),
        }
    }

    #[test]
    fn test_multi_voice_effects_share_start() {
        let fx = SoundEffect::new("se7", "Car Horn", "📣");
        let RenderPlan::Voices(voices) = render(&fx, 1.0) else {
            panic!("expected synthesis");
        };
        // Both horn tones fire together but keep independent durations
        assert_eq!(voices.len(), 2);
        assert_ne!(voices[0].start_freq_hz, voices[1].start_freq_hz);
    }

    #[test]
    fn test_table_durations_in_bounds() {
        for (_, voices) in EFFECT_TABLE {
            for voice in *voices {
                assert!(voice.duration_secs >= 0.15 && voice.duration_secs <= 1.5);
            }
        }
    }

    #[test]
    fn test_renders_are_independent() {
        let fx = SoundEffect::new("se2", "Record Scratch", "⏪");
        let a = render(&fx, 1.0);
        let b = render(&fx, 0.25);
        assert_ne!(a, b);
        // Re-rendering at the original volume reproduces the first plan
        assert_eq!(a, render(&fx, 1.0));
    }
}
