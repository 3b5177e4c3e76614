//! Mix session event types and the session-log wire format
//!
//! Events are appended by the session recorder while recording is active
//! and exported one per line as `[<timestamp>] [<KIND>] <content>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of events recorded during a mix session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixEventKind {
    /// A track became the playing track
    TrackStarted,
    /// DJ commentary line (transition hype, recording markers, undo notes)
    Commentary,
    /// A sound effect fired
    EffectFired,
    /// A listener request was inserted into the queue
    RequestAdded,
    /// An auto-suggested track was inserted into the queue
    SuggestionAdded,
    /// A track was removed from the queue
    TrackRemoved,
}

impl MixEventKind {
    /// Stable wire label used in the exported log
    pub fn label(&self) -> &'static str {
        match self {
            MixEventKind::TrackStarted => "TRACK_STARTED",
            MixEventKind::Commentary => "COMMENTARY",
            MixEventKind::EffectFired => "EFFECT_FIRED",
            MixEventKind::RequestAdded => "REQUEST_ADDED",
            MixEventKind::SuggestionAdded => "SUGGESTION_ADDED",
            MixEventKind::TrackRemoved => "TRACK_REMOVED",
        }
    }

    /// Parse a wire label back into a kind
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "TRACK_STARTED" => Some(MixEventKind::TrackStarted),
            "COMMENTARY" => Some(MixEventKind::Commentary),
            "EFFECT_FIRED" => Some(MixEventKind::EffectFired),
            "REQUEST_ADDED" => Some(MixEventKind::RequestAdded),
            "SUGGESTION_ADDED" => Some(MixEventKind::SuggestionAdded),
            "TRACK_REMOVED" => Some(MixEventKind::TrackRemoved),
            _ => None,
        }
    }
}

/// One recorded session event. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEvent {
    pub kind: MixEventKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl MixEvent {
    pub fn new(kind: MixEventKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Render as one log line: `[<timestamp>] [<KIND>] <content>`
    pub fn to_log_line(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.to_rfc3339(),
            self.kind.label(),
            self.content
        )
    }
}

/// Render a whole event log in export format, one line per event.
pub fn format_mix_log(events: &[MixEvent]) -> String {
    events
        .iter()
        .map(MixEvent::to_log_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a previously exported session log.
///
/// Only lines of the exact bracketed shape `[...] [KIND] content` with a
/// known KIND are recovered; everything else is silently skipped. An
/// unparseable timestamp falls back to the time of parsing, matching the
/// leniency of the upload path this format was recovered from.
pub fn parse_mix_log(text: &str) -> Vec<MixEvent> {
    let mut events = Vec::new();

    for line in text.lines() {
        let Some((ts_raw, rest)) = split_bracketed(line) else {
            continue;
        };
        let Some((kind_raw, content)) = split_bracketed(rest.trim_start()) else {
            continue;
        };
        let Some(kind) = MixEventKind::from_label(kind_raw) else {
            continue;
        };

        let timestamp = DateTime::parse_from_rfc3339(ts_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        events.push(MixEvent {
            kind,
            content: content.trim().to_string(),
            timestamp,
        });
    }

    events
}

/// Split `[inner] tail` into `(inner, tail)`; None if the line does not
/// start with a bracketed segment.
fn split_bracketed(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix('[')?;
    let close = rest.find(']')?;
    Some((&rest[..close], &rest[close + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for kind in [
            MixEventKind::TrackStarted,
            MixEventKind::Commentary,
            MixEventKind::EffectFired,
            MixEventKind::RequestAdded,
            MixEventKind::SuggestionAdded,
            MixEventKind::TrackRemoved,
        ] {
            assert_eq!(MixEventKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(MixEventKind::from_label("NOT_A_KIND"), None);
    }

    #[test]
    fn test_format_and_parse_round_trip() {
        let events = vec![
            MixEvent::new(MixEventKind::Commentary, "Recording started!"),
            MixEvent::new(MixEventKind::TrackStarted, "Levitating - Dua Lipa"),
            MixEvent::new(MixEventKind::EffectFired, "Air Horn"),
        ];

        let text = format_mix_log(&events);
        let parsed = parse_mix_log(&text);

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].kind, MixEventKind::Commentary);
        assert_eq!(parsed[0].content, "Recording started!");
        assert_eq!(parsed[1].content, "Levitating - Dua Lipa");
        assert_eq!(parsed[2].kind, MixEventKind::EffectFired);
    }

    #[test]
    fn test_parse_skips_garbage_lines() {
        let text = "\
not an event line
[2024-01-01T00:00:00Z] [TRACK_STARTED] Juice - Lizzo
[2024-01-01T00:00:01Z] [BOGUS_KIND] ignored
[broken [COMMENTARY] also ignored
[2024-01-01T00:00:02Z] [COMMENTARY]   trimmed content  ";

        let parsed = parse_mix_log(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].kind, MixEventKind::TrackStarted);
        assert_eq!(parsed[1].content, "trimmed content");
    }

    #[test]
    fn test_event_json_round_trip() {
        let event = MixEvent::new(MixEventKind::SuggestionAdded, "Added similar song: X by Y");
        let json = serde_json::to_string(&event).unwrap();
        let back: MixEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_parse_preserves_timestamps() {
        let text = "[2024-06-30T12:34:56Z] [TRACK_REMOVED] Removed: Havana";
        let parsed = parse_mix_log(text);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].timestamp.to_rfc3339(), "2024-06-30T12:34:56+00:00");
    }
}
