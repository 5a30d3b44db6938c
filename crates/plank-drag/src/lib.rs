//! # plank-drag
//!
//! Gesture-to-mutation translation for the Plank kanban core: a pure drag
//! state machine plus a thin stateful controller that feeds move commands
//! into a [`plank_core::BoardStore`].
//!
//! ## Core Paradigm
//!
//! - The machine is a pure function over (state, event, board snapshot);
//!   all target resolution is deterministic and testable without I/O
//! - Hover moves are optimistic: they mutate the board live, and a cancel
//!   leaves them in place rather than rolling back
//! - One resolution rule serves hover and drop, so the final commit can
//!   never land somewhere a hover did not

mod controller;
mod machine;

pub use controller::DragController;
pub use machine::{transition, DragCommand, DragState, GestureEvent};
