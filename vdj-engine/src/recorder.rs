//! Session recorder
//!
//! Append-only mix log gated by a recording flag. Events are immutable
//! once appended; there are no retroactive edits.

use tracing::{debug, info};
use vdj_common::events::{format_mix_log, MixEvent, MixEventKind};

/// Records timestamped mix events while recording is active.
#[derive(Debug, Default)]
pub struct SessionRecorder {
    recording: bool,
    log: Vec<MixEvent>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Clear the log and start recording. The first entry is always a
    /// synthetic "Recording started!" commentary event.
    pub fn start(&mut self) {
        info!("Mix recording started");
        self.log.clear();
        self.recording = true;
        self.append(MixEventKind::Commentary, "Recording started!");
    }

    /// Stop recording and return the finalized log.
    pub fn stop(&mut self) -> Vec<MixEvent> {
        info!("Mix recording stopped with {} events", self.log.len());
        self.recording = false;
        self.log.clone()
    }

    /// Append an event. No-op when not recording.
    pub fn append(&mut self, kind: MixEventKind, content: impl Into<String>) {
        if !self.recording {
            return;
        }
        let event = MixEvent::new(kind, content);
        debug!("Recorded [{}] {}", event.kind.label(), event.content);
        self.log.push(event);
    }

    /// The log so far (also valid after `stop`).
    pub fn log(&self) -> &[MixEvent] {
        &self.log
    }

    /// Render the log in the export wire format, one line per event.
    pub fn export(&self) -> String {
        format_mix_log(&self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_is_noop_when_not_recording() {
        let mut recorder = SessionRecorder::new();
        recorder.append(MixEventKind::TrackStarted, "T1 - A");
        assert!(recorder.log().is_empty());
    }

    #[test]
    fn test_start_clears_and_logs_marker() {
        let mut recorder = SessionRecorder::new();
        recorder.start();
        recorder.append(MixEventKind::TrackStarted, "T1 - A");
        recorder.stop();

        // Restarting wipes the previous session
        recorder.start();
        assert_eq!(recorder.log().len(), 1);
        assert_eq!(recorder.log()[0].kind, MixEventKind::Commentary);
        assert_eq!(recorder.log()[0].content, "Recording started!");
    }

    #[test]
    fn test_stop_returns_finalized_log() {
        let mut recorder = SessionRecorder::new();
        recorder.start();
        recorder.append(MixEventKind::EffectFired, "Air Horn");

        let log = recorder.stop();
        assert_eq!(log.len(), 2);
        assert!(!recorder.is_recording());

        // Appends after stop are dropped
        recorder.append(MixEventKind::Commentary, "too late");
        assert_eq!(recorder.log().len(), 2);
    }

    #[test]
    fn test_export_round_trips_through_parser() {
        let mut recorder = SessionRecorder::new();
        recorder.start();
        recorder.append(MixEventKind::RequestAdded, "Guest requested: Juice by Lizzo");
        recorder.stop();

        let parsed = vdj_common::events::parse_mix_log(&recorder.export());
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].kind, MixEventKind::RequestAdded);
    }
}
