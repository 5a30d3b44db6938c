//! Drag controller: owns the gesture state and drives the board store.

use tracing::debug;

use plank_core::BoardStore;

use crate::machine::{transition, DragState, GestureEvent};

/// Stateful wrapper around the pure transition function.
///
/// Holds the current [`DragState`] and applies emitted move commands to
/// the store. Commands the store rejects (stale references) are dropped
/// without retry; the next read of the board reflects authoritative state.
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Current gesture state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// True while a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Feed one gesture event through the machine and apply the resulting
    /// moves to the store. Returns how many moves the store accepted.
    pub fn handle(&mut self, store: &mut BoardStore, event: GestureEvent) -> usize {
        let was_dragging = self.state.is_dragging();
        let (next, commands) = transition(self.state.clone(), event, store.board());
        self.state = next;

        match (was_dragging, self.state.is_dragging()) {
            (false, true) => debug!(item = self.state.active_id(), "drag started"),
            (true, false) => debug!("drag finished"),
            _ => {}
        }

        let mut applied = 0;
        for command in commands {
            if store.apply(&command.into()) {
                applied += 1;
            } else {
                debug!("drag move dropped, board no longer knows the ids");
            }
        }
        applied
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}
