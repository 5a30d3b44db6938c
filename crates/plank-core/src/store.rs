//! The board store: a single mutation seam over the [`Board`] aggregate
//! plus subscriber notification.
//!
//! Every write goes through [`BoardStore::apply`]. Accepted mutations
//! notify subscribers with the post-mutation board; rejected mutations
//! (stale references) change nothing and notify nobody.

use tracing::debug;
use uuid::Uuid;

use crate::board::{Board, Column, Task, TaskPatch};

/// One atomic transition of the board aggregate.
///
/// Mutations carry ids, not references, so they can be constructed by the
/// interaction layer and replayed against whatever board state exists at
/// delivery time. Any unknown id degrades the whole mutation to a no-op.
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Create a task with the given id and content, appended to a column.
    AddTask {
        task_id: String,
        column_id: String,
        content: String,
    },
    /// Replace a task's content field.
    UpdateTask { task_id: String, content: String },
    /// Merge a partial update into a task's detail fields.
    UpdateTaskDetails { task_id: String, patch: TaskPatch },
    /// Remove a task from its column list and from the task map.
    DeleteTask { task_id: String, column_id: String },
    /// Create an empty column with the given id and title, appended last.
    AddColumn { column_id: String, title: String },
    /// Replace a column's title.
    UpdateColumnTitle { column_id: String, title: String },
    /// Remove a column and every task it holds.
    DeleteColumn { column_id: String },
    /// Splice a column to the position held by another column.
    MoveColumn { active_id: String, over_id: String },
    /// Splice a task out of one column and into another at an index, or
    /// append when no index is given.
    MoveTask {
        active_id: String,
        over_id: Option<String>,
        active_column_id: String,
        over_column_id: String,
        new_index: Option<usize>,
    },
}

impl Mutation {
    fn name(&self) -> &'static str {
        match self {
            Self::AddTask { .. } => "add_task",
            Self::UpdateTask { .. } => "update_task",
            Self::UpdateTaskDetails { .. } => "update_task_details",
            Self::DeleteTask { .. } => "delete_task",
            Self::AddColumn { .. } => "add_column",
            Self::UpdateColumnTitle { .. } => "update_column_title",
            Self::DeleteColumn { .. } => "delete_column",
            Self::MoveColumn { .. } => "move_column",
            Self::MoveTask { .. } => "move_task",
        }
    }
}

/// Handle returned by [`BoardStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&Board) + Send>;

/// Owns the board and fans out change notifications.
///
/// Single-threaded by design: callers hold the store (or an `&mut` to it)
/// and drive it synchronously. There is no interior mutability and no
/// ambient global instance.
pub struct BoardStore {
    board: Board,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: u64,
}

impl BoardStore {
    /// Create a store over an initial board.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// Read access to the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Register a callback invoked with the post-mutation board after every
    /// accepted mutation.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriberId
    where
        F: FnMut(&Board) + Send + 'static,
    {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    /// Apply one mutation. Returns `true` when the mutation was accepted
    /// (and subscribers were notified), `false` when it degraded to a
    /// no-op because a referenced id was unknown.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        let applied = match mutation {
            Mutation::AddTask {
                task_id,
                column_id,
                content,
            } => self
                .board
                .add_task(column_id, Task::new(task_id.clone(), content.clone())),
            Mutation::UpdateTask { task_id, content } => {
                self.board.update_task_content(task_id, content)
            }
            Mutation::UpdateTaskDetails { task_id, patch } => {
                self.board.update_task_details(task_id, patch)
            }
            Mutation::DeleteTask { task_id, column_id } => {
                self.board.delete_task(task_id, column_id)
            }
            Mutation::AddColumn { column_id, title } => self
                .board
                .add_column(Column::new(column_id.clone(), title.clone())),
            Mutation::UpdateColumnTitle { column_id, title } => {
                self.board.update_column_title(column_id, title)
            }
            Mutation::DeleteColumn { column_id } => self.board.delete_column(column_id),
            Mutation::MoveColumn { active_id, over_id } => {
                self.board.move_column(active_id, over_id)
            }
            Mutation::MoveTask {
                active_id,
                over_id: _,
                active_column_id,
                over_column_id,
                new_index,
            } => self
                .board
                .move_task(active_id, active_column_id, over_column_id, *new_index),
        };

        if applied {
            debug!(mutation = mutation.name(), "mutation applied");
            self.notify();
        } else {
            debug!(mutation = mutation.name(), "mutation dropped, stale reference");
        }
        applied
    }

    fn notify(&mut self) {
        let board = &self.board;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(board);
        }
    }

    /// Create a task with a fresh id in the named column. Returns the new
    /// id, or `None` when the column is unknown.
    pub fn add_task(&mut self, column_id: &str, content: &str) -> Option<String> {
        let task_id = Uuid::new_v4().to_string();
        self.apply(&Mutation::AddTask {
            task_id: task_id.clone(),
            column_id: column_id.to_string(),
            content: content.to_string(),
        })
        .then_some(task_id)
    }

    /// Create an empty column with a fresh id. Returns the new id.
    pub fn add_column(&mut self, title: &str) -> Option<String> {
        let column_id = Uuid::new_v4().to_string();
        self.apply(&Mutation::AddColumn {
            column_id: column_id.clone(),
            title: title.to_string(),
        })
        .then_some(column_id)
    }

    /// Replace a task's content field.
    pub fn update_task(&mut self, task_id: &str, content: &str) -> bool {
        self.apply(&Mutation::UpdateTask {
            task_id: task_id.to_string(),
            content: content.to_string(),
        })
    }

    /// Merge a partial update into a task.
    pub fn update_task_details(&mut self, task_id: &str, patch: TaskPatch) -> bool {
        self.apply(&Mutation::UpdateTaskDetails {
            task_id: task_id.to_string(),
            patch,
        })
    }

    /// Delete a task by id, naming the column it is expected to sit in.
    pub fn delete_task(&mut self, task_id: &str, column_id: &str) -> bool {
        self.apply(&Mutation::DeleteTask {
            task_id: task_id.to_string(),
            column_id: column_id.to_string(),
        })
    }

    /// Replace a column's title.
    pub fn update_column_title(&mut self, column_id: &str, title: &str) -> bool {
        self.apply(&Mutation::UpdateColumnTitle {
            column_id: column_id.to_string(),
            title: title.to_string(),
        })
    }

    /// Delete a column and its tasks.
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        self.apply(&Mutation::DeleteColumn {
            column_id: column_id.to_string(),
        })
    }

    /// Splice a column to another column's position.
    pub fn move_column(&mut self, active_id: &str, over_id: &str) -> bool {
        self.apply(&Mutation::MoveColumn {
            active_id: active_id.to_string(),
            over_id: over_id.to_string(),
        })
    }
}
