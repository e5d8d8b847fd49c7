//! Board view state — the render-free state machine behind the TUI.
//!
//! Holds the three pieces of view state (today slots, past list, pending
//! delete) and the tentative-mutation transitions for delete: apply the
//! projected removal, issue the request, and on failure replay the prior
//! snapshot. The event loop is the only writer; components read snapshots.

use crate::model::EnrichedSong;

/// The today view always renders exactly this many slots.
pub const TODAY_SLOTS: usize = 2;

#[derive(Debug, Clone)]
pub struct BoardState {
    today: Vec<Option<EnrichedSong>>,
    past: Vec<EnrichedSong>,
    pending_delete: Option<i64>,
}

/// Pre-removal past list, held until the backend delete settles.
#[derive(Debug, Clone)]
pub struct DeleteSnapshot {
    past: Vec<EnrichedSong>,
}

impl BoardState {
    pub fn new() -> Self {
        Self {
            today: vec![None; TODAY_SLOTS],
            past: Vec::new(),
            pending_delete: None,
        }
    }

    /// Today slots; always exactly [`TODAY_SLOTS`] entries, empty slots
    /// explicit.
    pub fn today(&self) -> &[Option<EnrichedSong>] {
        &self.today
    }

    /// Past requests, most-recent-id first.
    pub fn past(&self) -> &[EnrichedSong] {
        &self.past
    }

    /// Id of the delete currently in flight, if any.
    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// Publish a completed today load: pad with explicit empty slots (or
    /// truncate) to exactly [`TODAY_SLOTS`] entries.
    pub fn publish_today(&mut self, songs: Vec<EnrichedSong>) {
        let mut slots: Vec<Option<EnrichedSong>> =
            songs.into_iter().map(Some).take(TODAY_SLOTS).collect();
        slots.resize(TODAY_SLOTS, None);
        self.today = slots;
    }

    /// Publish a completed past load, exactly as returned by the query.
    pub fn publish_past(&mut self, songs: Vec<EnrichedSong>) {
        self.past = songs;
    }

    /// Start a delete: mark `id` pending and optimistically remove its row,
    /// returning the pre-removal snapshot for a possible rollback.
    ///
    /// No-op (`None`) when a delete is already pending or no row matches.
    pub fn begin_delete(&mut self, id: i64) -> Option<DeleteSnapshot> {
        if self.pending_delete.is_some() {
            return None;
        }
        let idx = self.past.iter().position(|song| song.request.id == id)?;
        let snapshot = DeleteSnapshot {
            past: self.past.clone(),
        };
        self.past.remove(idx);
        self.pending_delete = Some(id);
        Some(snapshot)
    }

    /// Settle a delete. The pending marker clears unconditionally; on
    /// failure the snapshot is replayed so backend and view agree again.
    /// On success the optimistic removal stands — no re-fetch.
    pub fn settle_delete(&mut self, snapshot: DeleteSnapshot, deleted: bool) {
        self.pending_delete = None;
        if !deleted {
            self.past = snapshot.past;
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SongRequest;
    use chrono::{TimeZone, Utc};

    fn song(id: i64) -> EnrichedSong {
        EnrichedSong {
            request: SongRequest {
                id,
                name: "guest".to_string(),
                url: Some(format!("https://youtu.be/vid{id}")),
                date: Utc.with_ymd_and_hms(2026, 3, 2, 7, 30, 0).unwrap(),
            },
            title: format!("song {id}"),
            thumbnail: None,
        }
    }

    fn past_ids(board: &BoardState) -> Vec<i64> {
        board.past().iter().map(|s| s.request.id).collect()
    }

    #[test]
    fn today_always_has_two_slots() {
        let mut board = BoardState::new();
        assert_eq!(board.today().len(), TODAY_SLOTS);
        assert!(board.today().iter().all(Option::is_none));

        board.publish_today(vec![song(1)]);
        assert_eq!(board.today().len(), TODAY_SLOTS);
        assert!(board.today()[0].is_some());
        assert!(board.today()[1].is_none());

        board.publish_today(vec![song(1), song(2)]);
        assert_eq!(board.today().len(), TODAY_SLOTS);

        board.publish_today(vec![song(1), song(2), song(3)]);
        assert_eq!(board.today().len(), TODAY_SLOTS);

        board.publish_today(Vec::new());
        assert!(board.today().iter().all(Option::is_none));
    }

    #[test]
    fn past_publish_preserves_order_and_ids() {
        let mut board = BoardState::new();
        board.publish_past(vec![song(9), song(4), song(1)]);
        assert_eq!(past_ids(&board), vec![9, 4, 1]);
    }

    #[test]
    fn delete_happy_path_keeps_optimistic_removal() {
        let mut board = BoardState::new();
        board.publish_past(vec![song(3), song(2), song(1)]);

        let snapshot = board.begin_delete(2).expect("row exists");
        // Removed before the backend call resolves.
        assert_eq!(past_ids(&board), vec![3, 1]);
        assert_eq!(board.pending_delete(), Some(2));

        board.settle_delete(snapshot, true);
        assert_eq!(past_ids(&board), vec![3, 1]);
        assert_eq!(board.pending_delete(), None);
    }

    #[test]
    fn delete_failure_rolls_back_to_snapshot() {
        let mut board = BoardState::new();
        board.publish_past(vec![song(3), song(2), song(1)]);

        let snapshot = board.begin_delete(2).expect("row exists");
        assert_eq!(past_ids(&board), vec![3, 1]);

        board.settle_delete(snapshot, false);
        assert_eq!(past_ids(&board), vec![3, 2, 1]);
        assert_eq!(board.pending_delete(), None);
    }

    #[test]
    fn begin_delete_guards() {
        let mut board = BoardState::new();
        board.publish_past(vec![song(2), song(1)]);

        // Unknown id is a no-op.
        assert!(board.begin_delete(99).is_none());
        assert_eq!(past_ids(&board), vec![2, 1]);

        // A second delete while one is pending is a no-op.
        let snapshot = board.begin_delete(2).unwrap();
        assert!(board.begin_delete(1).is_none());
        assert_eq!(past_ids(&board), vec![1]);

        // Settling re-arms the guard.
        board.settle_delete(snapshot, true);
        assert!(board.begin_delete(1).is_some());
    }
}
