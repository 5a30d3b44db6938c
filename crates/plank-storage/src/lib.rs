//! # plank-storage
//!
//! Persistence for the Plank kanban core: board snapshots, the mock login
//! session, and per-directory configuration, all living in a `.plank/`
//! data directory.
//!
//! ## Core Paradigm
//!
//! - Everything goes through the [`KvStore`] seam: one key, one JSON
//!   document, with file-backed and in-memory implementations
//! - Board reads fail open: missing, unparsable or invariant-violating
//!   snapshots yield the fixed default board, never an error
//! - Board writes are fire-and-forget; only explicit commands like init
//!   and login surface storage errors

mod config;
mod defaults;
mod dir;
mod error;
mod fail_open;
mod kv;
mod persist;
mod session;

pub use config::PlankConfig;
pub use defaults::default_board;
pub use dir::{find_plank_dir, init_plank_dir, PLANK_DIR};
pub use error::{Result, StorageError};
pub use fail_open::fail_open;
pub use kv::{DirKvStore, KvStore, MemoryKvStore};
pub use persist::{BoardPersistence, BOARD_KEY};
pub use session::{clear_session, current_session, save_session, Session, SESSION_KEY};
