//! Pure state machine for drag interaction control flow
//!
//! This module implements a pure functional state machine with NO I/O.
//! All transitions are deterministic given the current board snapshot.
//!
//! Key design principles:
//! - Pure function: transition(state, event, board) -> (state, commands)
//! - No mutation: the board is read only to resolve drop targets
//! - Stray or stale events never panic; they produce no commands
//! - Intermediate hover moves are live and are NOT rolled back on cancel

use plank_core::{Board, Mutation};

/// Drag interaction state.
///
/// The dragged item's kind is fixed at gesture start and encoded in the
/// variant, so task resolution and column resolution cannot be mixed up
/// mid-gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    Idle,
    /// A task card is being dragged.
    DraggingTask { task_id: String },
    /// A whole column is being dragged.
    DraggingColumn { column_id: String },
}

impl DragState {
    /// Id of the item currently being dragged, if any.
    pub fn active_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::DraggingTask { task_id } => Some(task_id),
            Self::DraggingColumn { column_id } => Some(column_id),
        }
    }

    /// True while a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Gesture events delivered by the input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEvent {
    /// Pointer or keyboard grab of an item.
    Start { item_id: String },
    /// Hover update over a drop target while dragging.
    Over { active_id: String, over_id: String },
    /// Terminal event: drop on a target, or cancel when `over_id` is
    /// `None` (released outside any droppable region).
    End {
        active_id: String,
        over_id: Option<String>,
    },
}

/// Move commands emitted by transitions, to be applied to the board store.
///
/// Drags only ever produce moves; creation, edits and deletes arrive at the
/// store through other paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragCommand {
    MoveTask {
        active_id: String,
        over_id: Option<String>,
        active_column_id: String,
        over_column_id: String,
        new_index: Option<usize>,
    },
    MoveColumn {
        active_id: String,
        over_id: String,
    },
}

impl From<DragCommand> for Mutation {
    fn from(command: DragCommand) -> Self {
        match command {
            DragCommand::MoveTask {
                active_id,
                over_id,
                active_column_id,
                over_column_id,
                new_index,
            } => Mutation::MoveTask {
                active_id,
                over_id,
                active_column_id,
                over_column_id,
                new_index,
            },
            DragCommand::MoveColumn { active_id, over_id } => {
                Mutation::MoveColumn { active_id, over_id }
            }
        }
    }
}

/// Pure transition function.
///
/// Takes the current drag state, one gesture event and a read-only board
/// snapshot; returns the next state and the move commands to apply. The
/// same resolution rule serves hover updates and the terminal drop, so the
/// intermediate and final moves can never disagree about the target.
///
/// Events that reference ids the board no longer knows (a delete racing a
/// stale gesture) resolve to no commands. This function never panics.
pub fn transition(
    state: DragState,
    event: GestureEvent,
    board: &Board,
) -> (DragState, Vec<DragCommand>) {
    match (state, event) {
        // Start always begins a fresh gesture. A start while dragging
        // replaces the drag, so a lost end event cannot wedge the machine.
        (_, GestureEvent::Start { item_id }) => {
            if board.tasks.contains_key(&item_id) {
                (DragState::DraggingTask { task_id: item_id }, vec![])
            } else if board.find_column(&item_id).is_some() {
                (DragState::DraggingColumn { column_id: item_id }, vec![])
            } else {
                // Unknown item: nothing to drag.
                (DragState::Idle, vec![])
            }
        }

        // Hover updates: live, optimistic reordering.
        (DragState::DraggingTask { task_id }, GestureEvent::Over { active_id, over_id }) => {
            let commands = if active_id == task_id {
                resolve_task_move(board, &task_id, &over_id)
                    .into_iter()
                    .collect()
            } else {
                // Hover from some other gesture; not ours.
                vec![]
            };
            (DragState::DraggingTask { task_id }, commands)
        }

        (
            DragState::DraggingColumn { column_id },
            GestureEvent::Over { active_id, over_id },
        ) => {
            let commands = if active_id == column_id {
                resolve_column_move(board, &column_id, &over_id)
                    .into_iter()
                    .collect()
            } else {
                vec![]
            };
            (DragState::DraggingColumn { column_id }, commands)
        }

        // Drop: one final move through the same resolution rule, then Idle.
        (
            DragState::DraggingTask { task_id },
            GestureEvent::End {
                active_id,
                over_id: Some(over_id),
            },
        ) => {
            if active_id == task_id {
                let commands = resolve_task_move(board, &task_id, &over_id)
                    .into_iter()
                    .collect();
                (DragState::Idle, commands)
            } else {
                (DragState::DraggingTask { task_id }, vec![])
            }
        }

        (
            DragState::DraggingColumn { column_id },
            GestureEvent::End {
                active_id,
                over_id: Some(over_id),
            },
        ) => {
            if active_id == column_id {
                let commands = resolve_column_move(board, &column_id, &over_id)
                    .into_iter()
                    .collect();
                (DragState::Idle, commands)
            } else {
                (DragState::DraggingColumn { column_id }, vec![])
            }
        }

        // Cancel: back to Idle with no final move. Moves already applied
        // during hover stay in effect.
        (
            DragState::DraggingTask { task_id },
            GestureEvent::End {
                active_id,
                over_id: None,
            },
        ) => {
            if active_id == task_id {
                (DragState::Idle, vec![])
            } else {
                (DragState::DraggingTask { task_id }, vec![])
            }
        }

        (
            DragState::DraggingColumn { column_id },
            GestureEvent::End {
                active_id,
                over_id: None,
            },
        ) => {
            if active_id == column_id {
                (DragState::Idle, vec![])
            } else {
                (DragState::DraggingColumn { column_id }, vec![])
            }
        }

        // Stray hover or end without a gesture in progress.
        (DragState::Idle, GestureEvent::Over { .. }) => (DragState::Idle, vec![]),
        (DragState::Idle, GestureEvent::End { .. }) => (DragState::Idle, vec![]),
    }
}

/// Resolve a task drag over `over_id` into a move command.
///
/// The target's owning column is the hovered task's column, or the hovered
/// column itself when `over_id` names a column body. The destination index
/// is the hovered task's position in that column, or end-of-list when the
/// target carries no resolvable index.
fn resolve_task_move(board: &Board, task_id: &str, over_id: &str) -> Option<DragCommand> {
    let source = board.column_of_task(task_id)?;
    let (target, new_index) = match board.column_of_task(over_id) {
        Some(column) => {
            let index = column.task_ids.iter().position(|id| id == over_id);
            (column, index)
        }
        None => (board.find_column(over_id)?, None),
    };
    // Hovering the card over itself in place resolves to nothing.
    if task_id == over_id && source.id == target.id {
        return None;
    }
    Some(DragCommand::MoveTask {
        active_id: task_id.to_string(),
        over_id: Some(over_id.to_string()),
        active_column_id: source.id.clone(),
        over_column_id: target.id.clone(),
        new_index,
    })
}

/// Resolve a column drag over `over_id` into a move command. A task target
/// stands for its owning column.
fn resolve_column_move(board: &Board, column_id: &str, over_id: &str) -> Option<DragCommand> {
    board.find_column(column_id)?;
    let target_id = match board.column_of_task(over_id) {
        Some(column) => column.id.clone(),
        None => board.find_column(over_id)?.id.clone(),
    };
    if target_id == column_id {
        return None;
    }
    Some(DragCommand::MoveColumn {
        active_id: column_id.to_string(),
        over_id: target_id,
    })
}
