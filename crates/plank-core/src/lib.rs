//! # plank-core
//!
//! Core board model for Plank: a normalized kanban aggregate (ordered
//! columns, a task map, and per-column orderings) plus the mutation set
//! that keeps it consistent.
//!
//! ## Core Paradigm
//!
//! - The board is one consistency unit: every mutation is an atomic
//!   transition of the whole aggregate
//! - Mutations referencing unknown ids degrade to silent no-ops, so the
//!   store tolerates late or duplicate events from the interaction layer
//! - Order is data: column sequence is horizontal order, `task_ids` is
//!   vertical order, and moves are remove-then-insert splices
//!
//! The [`BoardStore`] wraps a [`Board`] behind a single `apply` seam and
//! notifies subscribers after every accepted mutation; nothing mutates the
//! aggregate from outside that seam.

mod board;
mod error;
mod store;

pub use board::{Board, Column, FieldPatch, Priority, Task, TaskPatch};
pub use error::{BoardError, Result};
pub use store::{BoardStore, Mutation, SubscriberId};
