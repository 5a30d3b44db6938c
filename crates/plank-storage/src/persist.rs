//! The persistence adapter: board snapshots in and out of a [`KvStore`].
//!
//! Reads fail open: a missing, unparsable or invariant-violating snapshot
//! yields the default seeded board. Writes are fire-and-forget: a failed
//! write is logged and swallowed, never surfaced to the caller.

use plank_core::{Board, BoardStore, SubscriberId};
use tracing::debug;

use crate::defaults::default_board;
use crate::error::{Result, StorageError};
use crate::fail_open::fail_open;
use crate::kv::KvStore;

/// Key under which the board snapshot lives.
pub const BOARD_KEY: &str = "board";

/// Serializes the board aggregate to one key and restores it on load.
pub struct BoardPersistence<S: KvStore> {
    store: S,
    pretty: bool,
}

impl<S: KvStore> BoardPersistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            pretty: true,
        }
    }

    /// Toggle pretty-printed snapshots (on by default).
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Load the stored board, or the default seeded board when no usable
    /// snapshot exists. Never fails.
    pub fn load_board(&self) -> Board {
        match fail_open("board snapshot read", || self.try_load()) {
            Some(Some(board)) => board,
            Some(None) => {
                debug!("No board snapshot, seeding default board");
                default_board()
            }
            // Read or parse failure already logged; treat same as absent.
            None => default_board(),
        }
    }

    fn try_load(&self) -> Result<Option<Board>> {
        let Some(bytes) = self.store.read(BOARD_KEY)? else {
            return Ok(None);
        };
        let board: Board = serde_json::from_slice(&bytes)?;
        board
            .validate()
            .map_err(|e| StorageError::Snapshot(e.to_string()))?;
        Ok(Some(board))
    }

    /// Write the full board under [`BOARD_KEY`]. Fire-and-forget: errors
    /// are logged and swallowed.
    pub fn save_board(&mut self, board: &Board) {
        let pretty = self.pretty;
        let store = &mut self.store;
        fail_open("board snapshot write", || {
            let bytes = if pretty {
                serde_json::to_vec_pretty(board)?
            } else {
                serde_json::to_vec(board)?
            };
            store.write(BOARD_KEY, &bytes)
        });
    }

    /// Subscribe this adapter to a board store so every accepted mutation
    /// snapshots the resulting board. Consumes the adapter; it lives as
    /// long as the subscription.
    pub fn attach(self, store: &mut BoardStore) -> SubscriberId
    where
        S: Send + 'static,
    {
        let mut persistence = self;
        store.subscribe(move |board| persistence.save_board(board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use plank_core::{Column, Task};

    #[test]
    fn test_load_without_snapshot_seeds_default() {
        let persistence = BoardPersistence::new(MemoryKvStore::new());
        let board = persistence.load_board();
        assert_eq!(board.columns.len(), 3);
        assert_eq!(board.tasks.len(), 3);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut board = Board::default();
        board.add_column(Column::new("c1", "Only"));
        board.add_task("c1", Task::new("t1", "solo"));

        let mut persistence = BoardPersistence::new(MemoryKvStore::new());
        persistence.save_board(&board);
        assert_eq!(persistence.load_board(), board);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_default() {
        let mut store = MemoryKvStore::new();
        store.write(BOARD_KEY, b"{ not json").unwrap();

        let persistence = BoardPersistence::new(store);
        let board = persistence.load_board();
        assert_eq!(board.columns.len(), 3);
        assert!(board.tasks.contains_key("task-1"));
    }

    #[test]
    fn test_snapshot_with_dangling_ref_falls_back_to_default() {
        // Parses fine but violates referential integrity.
        let raw = br#"{"columns":[{"id":"c1","title":"Bad","taskIds":["ghost"]}],"tasks":{}}"#;
        let mut store = MemoryKvStore::new();
        store.write(BOARD_KEY, raw).unwrap();

        let persistence = BoardPersistence::new(store);
        let board = persistence.load_board();
        assert_eq!(board.columns.len(), 3);
        board.validate().unwrap();
    }

    #[test]
    fn test_attach_snapshots_exactly_the_accepted_mutations() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        // Probe store that only counts writes.
        #[derive(Clone, Default)]
        struct CountingStore {
            writes: Arc<AtomicUsize>,
        }
        impl KvStore for CountingStore {
            fn read(&self, _key: &str) -> crate::error::Result<Option<Vec<u8>>> {
                Ok(None)
            }
            fn write(&mut self, _key: &str, _value: &[u8]) -> crate::error::Result<()> {
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            fn delete(&mut self, _key: &str) -> crate::error::Result<()> {
                Ok(())
            }
        }

        let probe = CountingStore::default();
        let writes = Arc::clone(&probe.writes);

        let mut store = BoardStore::new(default_board());
        BoardPersistence::new(probe).attach(&mut store);

        store.add_column("Review").unwrap();
        store.add_task("col-3", "wrap up").unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 2);

        // Rejected mutation: nothing to snapshot.
        assert!(!store.delete_column("col-9"));
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }
}
