//! Track queue management
//!
//! Owns the ordered track list, the currently-playing position, the play
//! history, and the single pending-removal slot that backs the bounded
//! undo window. All index arithmetic is recomputed against the current
//! length after every mutation; nothing here holds a stale snapshot.

use std::collections::HashSet;
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;
use vdj_common::Track;

use crate::error::{Error, Result};

/// A removed track that can still be restored to its original position.
#[derive(Debug, Clone)]
pub struct PendingRemoval {
    pub track: Track,
    pub original_index: usize,
    /// Undo is refused once this deadline passes
    deadline: Instant,
}

impl PendingRemoval {
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.deadline
    }
}

/// Which list the presentation is looking at. Reordering is only allowed
/// on the unfiltered queue view, where displayed positions correspond
/// one-to-one with storage positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueView {
    #[default]
    Queue,
    History,
}

/// The ordered, mutable track queue.
///
/// Invariant: whenever the queue is non-empty, `current_index` addresses a
/// valid track. Mutations that could break that (removal of the tail, for
/// example) re-clamp the index before returning.
pub struct TrackQueue {
    tracks: Vec<Track>,
    current_index: usize,
    /// Most-recent-first, append-only during a session
    history: Vec<Track>,
    /// At most one outstanding removal; superseded by any new removal
    pending_removal: Option<PendingRemoval>,
    undo_window: Duration,
    /// Active multi-keyword filter over the rotated view
    filter: Option<String>,
    view: QueueView,
}

impl TrackQueue {
    pub fn new(undo_window: Duration) -> Self {
        Self {
            tracks: Vec::new(),
            current_index: 0,
            history: Vec::new(),
            pending_removal: None,
            undo_window,
            filter: None,
            view: QueueView::Queue,
        }
    }

    /// Replace the queue contents (playlist load). Resets position and
    /// history and drops any pending removal.
    pub fn load(&mut self, tracks: Vec<Track>) {
        self.clear_pending_removal();
        self.tracks = tracks;
        self.current_index = 0;
        self.history.clear();
        debug!("Loaded queue with {} tracks", self.tracks.len());
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The currently playing track, if any.
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// The upcoming track. None unless there are at least two tracks,
    /// matching the advance guard.
    pub fn peek_next(&self) -> Option<&Track> {
        if self.tracks.len() < 2 {
            return None;
        }
        self.tracks.get((self.current_index + 1) % self.tracks.len())
    }

    /// Play history, most recent first.
    pub fn history(&self) -> &[Track] {
        &self.history
    }

    /// Record a finished track at the front of the history.
    pub fn push_history(&mut self, track: Track) {
        self.history.insert(0, track);
    }

    /// Move `current_index` to the next track, wrapping. No-op when the
    /// queue has one track or fewer.
    pub fn advance(&mut self) {
        if self.tracks.len() > 1 {
            self.current_index = (self.current_index + 1) % self.tracks.len();
        }
    }

    /// Insert a track at `index`, clamped into `[0, len]`. Relative order
    /// of the other tracks is undisturbed. The current index is left
    /// alone on purpose: an insertion before the playing position shifts
    /// which track occupies it, and that observable ordering is kept.
    pub fn insert_at(&mut self, track: Track, index: usize) {
        let index = index.min(self.tracks.len());
        debug!("Inserting '{}' at index {}", track.title, index);
        self.tracks.insert(index, track);
    }

    /// Insertion point for listener requests: immediately after the
    /// playing track.
    pub fn request_insert_index(&self) -> usize {
        self.current_index + 1
    }

    /// Insertion point for auto-suggestions: two ahead of the playing
    /// track, modulo length + 1 so the index is valid pre-insertion. For
    /// short queues this can land adjacent to (or at) the current track;
    /// that placement is deliberate.
    pub fn suggestion_insert_index(&self) -> usize {
        (self.current_index + 2) % (self.tracks.len() + 1)
    }

    /// Remove a track by id, capturing it into the pending-removal slot
    /// and arming a fresh undo deadline. Any prior pending removal is
    /// superseded. Returns None (and changes nothing) for an unknown id.
    pub fn remove_by_id(&mut self, id: Uuid) -> Option<Track> {
        let index = self.tracks.iter().position(|t| t.id == id)?;
        let track = self.tracks.remove(index);

        self.pending_removal = Some(PendingRemoval {
            track: track.clone(),
            original_index: index,
            deadline: Instant::now() + self.undo_window,
        });

        // Keep current_index valid against the new length. Removing the
        // last remaining track empties the queue and playback stops at
        // the session level.
        if self.tracks.is_empty() {
            self.current_index = 0;
        } else {
            self.current_index %= self.tracks.len();
        }

        debug!("Removed '{}' from index {}", track.title, index);
        Some(track)
    }

    /// The outstanding removal, if its undo window is still open.
    pub fn pending_removal(&self) -> Option<&PendingRemoval> {
        self.pending_removal.as_ref().filter(|p| !p.is_expired())
    }

    /// Restore the last removed track to its captured index (clamped to
    /// the current length, so later mutations are tolerated). No-op once
    /// the window has expired or the slot was cleared.
    pub fn undo_last_removal(&mut self) -> Option<Track> {
        let pending = self.pending_removal.take()?;
        if pending.is_expired() {
            debug!("Undo window expired for '{}'", pending.track.title);
            return None;
        }

        let index = pending.original_index.min(self.tracks.len());
        self.tracks.insert(index, pending.track.clone());
        debug!("Restored '{}' to index {}", pending.track.title, index);
        Some(pending.track)
    }

    /// Cancel the undo window. Called by any removal-adjacent mutation
    /// (skip, reorder, playlist reload) so a stale undo can never
    /// resurrect a track into an inconsistent position.
    pub fn clear_pending_removal(&mut self) {
        self.pending_removal = None;
    }

    /// Replace the queue with a caller-supplied permutation of the same
    /// id set. The previously-current track keeps playing: its id is
    /// re-located in the new order and `current_index` follows it.
    pub fn reorder(&mut self, new_order: Vec<Track>) -> Result<()> {
        if self.filter.is_some() || self.view == QueueView::History {
            return Err(Error::InvalidState(
                "Reordering is read-only while a filter or history view is active".to_string(),
            ));
        }

        let old_ids: HashSet<Uuid> = self.tracks.iter().map(|t| t.id).collect();
        let new_ids: HashSet<Uuid> = new_order.iter().map(|t| t.id).collect();
        if old_ids != new_ids || new_order.len() != self.tracks.len() {
            warn!("Rejected reorder: id set does not match current queue");
            return Err(Error::Queue(
                "Reorder must be a permutation of the current queue".to_string(),
            ));
        }

        let current_id = self.current().map(|t| t.id);
        self.clear_pending_removal();
        self.tracks = new_order;

        if let Some(id) = current_id {
            // Same id set, so the position lookup cannot fail
            if let Some(index) = self.tracks.iter().position(|t| t.id == id) {
                self.current_index = index;
            }
        }

        Ok(())
    }

    /// Set or clear the view filter used by `visible_tracks`.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter.filter(|f| !f.trim().is_empty());
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn set_view(&mut self, view: QueueView) {
        self.view = view;
    }

    pub fn view(&self) -> QueueView {
        self.view
    }

    /// The rotated presentation view: current track first, wrapping
    /// around. With a filter active, every keyword must match the
    /// lowercased "title artist" text, except that the first (playing)
    /// entry is always kept to anchor the view.
    pub fn visible_tracks(&self) -> Vec<&Track> {
        if self.view == QueueView::History {
            return self.history.iter().collect();
        }

        let rotated: Vec<&Track> = self
            .tracks
            .iter()
            .skip(self.current_index)
            .chain(self.tracks.iter().take(self.current_index))
            .collect();

        let Some(filter) = self.filter.as_deref() else {
            return rotated;
        };

        let term = filter.trim().to_lowercase();
        let keywords: Vec<&str> = term.split_whitespace().collect();
        if keywords.is_empty() {
            return rotated;
        }

        rotated
            .into_iter()
            .enumerate()
            .filter(|(i, track)| {
                if *i == 0 {
                    return true;
                }
                let text = format!("{} {}", track.title, track.artist).to_lowercase();
                keywords.iter().all(|k| text.contains(k))
            })
            .map(|(_, track)| track)
            .collect()
    }
}
