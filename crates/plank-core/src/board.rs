//! Board aggregate: tasks, ordered columns, and the splice operations
//! that keep them consistent.
//!
//! The aggregate is normalized: `tasks` is the single source of truth for
//! task records, and each column holds only an ordered list of task ids.
//! Every operation here is a silent no-op when a referenced id is unknown;
//! callers that need to distinguish use the returned `bool`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{BoardError, Result};

/// Task priority levels.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

/// A card on the board.
///
/// Identity is the `id`; everything else is mutable. The serialized field
/// names match the persisted snapshot layout (`dueDate` rather than
/// `due_at`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task with the default (medium) priority and empty details.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            description: None,
            priority: Some(Priority::Medium),
            due_at: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date.
    pub fn with_due(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

/// A column: a workflow stage holding an ordered list of task ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub title: String,
    pub task_ids: Vec<String>,
}

impl Column {
    /// Create an empty column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    /// Set the ordered task ids.
    pub fn with_task_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Field-level patch value: leave the field alone, set it, or clear it.
///
/// This replaces truthiness-based partial updates with explicit
/// present-vs-absent semantics per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldPatch<T> {
    /// Field not mentioned by the patch; prior value is retained.
    #[default]
    Keep,
    /// Replace the field with the given value.
    Set(T),
    /// Explicitly unset the field.
    Clear,
}

impl<T: Clone> FieldPatch<T> {
    /// Apply this patch to an optional slot.
    pub fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *slot = Some(value.clone()),
            Self::Clear => *slot = None,
        }
    }
}

/// Partial update for a task's mutable detail fields.
///
/// `content` is required on a task, so it can be replaced but not cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub content: Option<String>,
    pub description: FieldPatch<String>,
    pub priority: FieldPatch<Priority>,
    pub due_at: FieldPatch<DateTime<Utc>>,
}

impl TaskPatch {
    /// True when the patch would not touch any field.
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && matches!(self.description, FieldPatch::Keep)
            && matches!(self.priority, FieldPatch::Keep)
            && matches!(self.due_at, FieldPatch::Keep)
    }
}

/// The board aggregate: ordered columns plus the task map.
///
/// Treated as one consistency unit; no observer ever sees a move half
/// applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<Column>,
    pub tasks: HashMap<String, Task>,
}

impl Board {
    /// Find a column by its own id.
    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Find a column by its own id (mutable).
    pub fn find_column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// Find the column whose task list contains the given task id.
    pub fn column_of_task(&self, task_id: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.task_ids.iter().any(|id| id == task_id))
    }

    fn position_of_column(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Remove every placement of `task_id` across all columns.
    fn strip_task_everywhere(&mut self, task_id: &str) -> bool {
        let mut changed = false;
        for column in &mut self.columns {
            let before = column.task_ids.len();
            column.task_ids.retain(|id| id != task_id);
            changed |= column.task_ids.len() != before;
        }
        changed
    }

    /// Append a task to the named column.
    ///
    /// No-op when the column is unknown or the id is already taken; on the
    /// no-op path the task record is not inserted anywhere.
    pub fn add_task(&mut self, column_id: &str, task: Task) -> bool {
        if self.tasks.contains_key(&task.id) {
            return false;
        }
        let Some(column) = self.find_column_mut(column_id) else {
            return false;
        };
        column.task_ids.push(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
        true
    }

    /// Replace a task's content field only.
    pub fn update_task_content(&mut self, task_id: &str, content: &str) -> bool {
        let Some(task) = self.tasks.get_mut(task_id) else {
            return false;
        };
        task.content = content.to_string();
        true
    }

    /// Merge a [`TaskPatch`] into the task; unmentioned fields keep their
    /// prior value, cleared fields become unset.
    pub fn update_task_details(&mut self, task_id: &str, patch: &TaskPatch) -> bool {
        let Some(task) = self.tasks.get_mut(task_id) else {
            return false;
        };
        if let Some(content) = &patch.content {
            task.content = content.clone();
        }
        patch.description.apply_to(&mut task.description);
        patch.priority.apply_to(&mut task.priority);
        patch.due_at.apply_to(&mut task.due_at);
        true
    }

    /// Delete a task: filter it out of the named column's list (tolerant
    /// when it is not there) and remove the record unconditionally.
    ///
    /// When the record existed, the id is stripped from every column so a
    /// stale column reference can never leave a dangling placement behind.
    pub fn delete_task(&mut self, task_id: &str, column_id: &str) -> bool {
        let mut changed = false;
        if let Some(column) = self.find_column_mut(column_id) {
            let before = column.task_ids.len();
            column.task_ids.retain(|id| id != task_id);
            changed |= column.task_ids.len() != before;
        }
        if self.tasks.remove(task_id).is_some() {
            self.strip_task_everywhere(task_id);
            changed = true;
        }
        changed
    }

    /// Append a new column. No-op when the id is already taken.
    pub fn add_column(&mut self, column: Column) -> bool {
        if self.find_column(&column.id).is_some() {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// Replace a column's title.
    pub fn update_column_title(&mut self, column_id: &str, title: &str) -> bool {
        let Some(column) = self.find_column_mut(column_id) else {
            return false;
        };
        column.title = title.to_string();
        true
    }

    /// Delete a column and every task it holds.
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        let Some(index) = self.position_of_column(column_id) else {
            return false;
        };
        let column = self.columns.remove(index);
        for task_id in &column.task_ids {
            self.tasks.remove(task_id);
        }
        true
    }

    /// Move a column to the position currently held by `over_id`.
    ///
    /// Splice semantics: remove, then reinsert at the position resolved
    /// before removal. Not a swap.
    pub fn move_column(&mut self, active_id: &str, over_id: &str) -> bool {
        let Some(active_index) = self.position_of_column(active_id) else {
            return false;
        };
        let Some(over_index) = self.position_of_column(over_id) else {
            return false;
        };
        let column = self.columns.remove(active_index);
        // over_index <= columns.len() after the removal, so insert cannot panic.
        self.columns.insert(over_index, column);
        true
    }

    /// Move a task out of `active_column_id` and into `over_column_id` at
    /// `new_index` (clamped), or append when no index is given.
    ///
    /// Covers same-column reorders, cross-column moves to an index, and
    /// cross-column moves to an empty column with one set of semantics.
    /// Every existing placement of the id is removed before the insert, so
    /// repeating the same call is idempotent and the id is never duplicated.
    pub fn move_task(
        &mut self,
        active_id: &str,
        active_column_id: &str,
        over_column_id: &str,
        new_index: Option<usize>,
    ) -> bool {
        if !self.tasks.contains_key(active_id) {
            return false;
        }
        if self.find_column(active_column_id).is_none() {
            return false;
        }
        // Destination resolved before the strip; an unknown target must not
        // orphan the task.
        let Some(dest_index) = self.position_of_column(over_column_id) else {
            return false;
        };
        self.strip_task_everywhere(active_id);
        let dest = &mut self.columns[dest_index];
        match new_index {
            Some(index) => {
                let index = index.min(dest.task_ids.len());
                dest.task_ids.insert(index, active_id.to_string());
            }
            None => dest.task_ids.push(active_id.to_string()),
        }
        true
    }

    /// Check the aggregate invariants: referential integrity, exclusive
    /// placement, no orphan records, unique column ids.
    pub fn validate(&self) -> Result<()> {
        let mut column_ids = HashSet::new();
        for column in &self.columns {
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardError::DuplicateColumnId {
                    column_id: column.id.clone(),
                });
            }
        }

        let mut placed = HashSet::new();
        for column in &self.columns {
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    return Err(BoardError::DanglingTaskRef {
                        column_id: column.id.clone(),
                        task_id: task_id.clone(),
                    });
                }
                if !placed.insert(task_id.as_str()) {
                    return Err(BoardError::DuplicatePlacement {
                        task_id: task_id.clone(),
                    });
                }
            }
        }

        for (key, task) in &self.tasks {
            if task.id != *key {
                return Err(BoardError::TaskKeyMismatch {
                    key: key.clone(),
                    task_id: task.id.clone(),
                });
            }
            if !placed.contains(key.as_str()) {
                return Err(BoardError::OrphanTask {
                    task_id: key.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three columns in the shape the persistence seed uses:
    /// `col-1: [t1, t2]`, `col-2: [t3]`, `col-3: []`.
    fn sample_board() -> Board {
        let mut board = Board::default();
        board.add_column(Column::new("col-1", "To Do"));
        board.add_column(Column::new("col-2", "In Progress"));
        board.add_column(Column::new("col-3", "Done"));
        board.add_task("col-1", Task::new("t1", "first"));
        board.add_task("col-1", Task::new("t2", "second"));
        board.add_task("col-2", Task::new("t3", "third"));
        board
    }

    fn task_ids(board: &Board, column_id: &str) -> Vec<String> {
        board
            .find_column(column_id)
            .map(|c| c.task_ids.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_add_task_appends_and_defaults_to_medium() {
        let mut board = sample_board();
        assert!(board.add_task("col-3", Task::new("t4", "new work")));
        assert_eq!(task_ids(&board, "col-3"), vec!["t4"]);
        assert_eq!(board.tasks["t4"].priority, Some(Priority::Medium));
        board.validate().unwrap();
    }

    #[test]
    fn test_add_task_unknown_column_is_noop() {
        let mut board = sample_board();
        assert!(!board.add_task("col-9", Task::new("t4", "lost")));
        // The record must not linger as an orphan on the no-op path.
        assert!(!board.tasks.contains_key("t4"));
        board.validate().unwrap();
    }

    #[test]
    fn test_add_task_duplicate_id_is_noop() {
        let mut board = sample_board();
        assert!(!board.add_task("col-3", Task::new("t1", "imposter")));
        assert_eq!(board.tasks["t1"].content, "first");
        assert!(task_ids(&board, "col-3").is_empty());
    }

    #[test]
    fn test_move_task_to_index_in_other_column() {
        let mut board = sample_board();
        assert!(board.move_task("t2", "col-1", "col-2", Some(0)));
        assert_eq!(task_ids(&board, "col-1"), vec!["t1"]);
        assert_eq!(task_ids(&board, "col-2"), vec!["t2", "t3"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_task_without_index_appends() {
        let mut board = sample_board();
        assert!(board.move_task("t1", "col-1", "col-2", None));
        assert_eq!(task_ids(&board, "col-2"), vec!["t3", "t1"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_task_never_duplicates() {
        let mut board = sample_board();
        assert!(board.move_task("t2", "col-1", "col-2", Some(0)));
        assert!(board.move_task("t2", "col-1", "col-2", Some(0)));
        let placements: usize = board
            .columns
            .iter()
            .map(|c| c.task_ids.iter().filter(|id| *id == "t2").count())
            .sum();
        assert_eq!(placements, 1);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_task_same_column_reorder() {
        let mut board = sample_board();
        // t1 hovered over t2: index of t2 is 1 before removal.
        assert!(board.move_task("t1", "col-1", "col-1", Some(1)));
        assert_eq!(task_ids(&board, "col-1"), vec!["t2", "t1"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_task_to_empty_column() {
        let mut board = sample_board();
        assert!(board.move_task("t3", "col-2", "col-3", None));
        assert!(task_ids(&board, "col-2").is_empty());
        assert_eq!(task_ids(&board, "col-3"), vec!["t3"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_task_index_clamped_to_length() {
        let mut board = sample_board();
        assert!(board.move_task("t3", "col-2", "col-1", Some(99)));
        assert_eq!(task_ids(&board, "col-1"), vec!["t1", "t2", "t3"]);
        board.validate().unwrap();
    }

    #[test]
    fn test_move_task_unknown_ids_are_noops() {
        let mut board = sample_board();
        let before = board.clone();
        assert!(!board.move_task("ghost", "col-1", "col-2", None));
        assert!(!board.move_task("t1", "col-9", "col-2", None));
        assert!(!board.move_task("t1", "col-1", "col-9", None));
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_column_splices_not_swaps() {
        let mut board = sample_board();
        assert!(board.move_column("col-1", "col-3"));
        let order: Vec<&str> = board.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["col-2", "col-3", "col-1"]);
    }

    #[test]
    fn test_move_column_backwards_takes_over_position() {
        let mut board = sample_board();
        assert!(board.move_column("col-3", "col-1"));
        let order: Vec<&str> = board.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["col-3", "col-1", "col-2"]);
    }

    #[test]
    fn test_move_column_identity_keeps_order() {
        let mut board = sample_board();
        assert!(board.move_column("col-2", "col-2"));
        let order: Vec<&str> = board.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["col-1", "col-2", "col-3"]);
    }

    #[test]
    fn test_delete_column_cascades_to_tasks() {
        let mut board = sample_board();
        assert!(board.delete_column("col-1"));
        assert_eq!(board.columns.len(), 2);
        assert!(!board.tasks.contains_key("t1"));
        assert!(!board.tasks.contains_key("t2"));
        assert!(board.tasks.contains_key("t3"));
        board.validate().unwrap();
    }

    #[test]
    fn test_delete_task_with_stale_column_still_deletes_record() {
        let mut board = sample_board();
        // t1 lives in col-1; the caller names col-2.
        assert!(board.delete_task("t1", "col-2"));
        assert_eq!(task_ids(&board, "col-2"), vec!["t3"]);
        assert!(!board.tasks.contains_key("t1"));
        // No placement may survive the record.
        assert!(board.column_of_task("t1").is_none());
        board.validate().unwrap();
    }

    #[test]
    fn test_delete_task_unknown_everywhere_is_noop() {
        let mut board = sample_board();
        let before = board.clone();
        assert!(!board.delete_task("ghost", "col-1"));
        assert_eq!(board, before);
    }

    #[test]
    fn test_update_task_details_patch_semantics() {
        let mut board = sample_board();
        let due = Utc::now();
        let patch = TaskPatch {
            content: Some("renamed".into()),
            description: FieldPatch::Set("details".into()),
            priority: FieldPatch::Keep,
            due_at: FieldPatch::Set(due),
        };
        assert!(board.update_task_details("t1", &patch));
        let task = &board.tasks["t1"];
        assert_eq!(task.content, "renamed");
        assert_eq!(task.description.as_deref(), Some("details"));
        assert_eq!(task.priority, Some(Priority::Medium));
        assert_eq!(task.due_at, Some(due));

        let clear = TaskPatch {
            description: FieldPatch::Clear,
            due_at: FieldPatch::Clear,
            ..TaskPatch::default()
        };
        assert!(board.update_task_details("t1", &clear));
        let task = &board.tasks["t1"];
        assert_eq!(task.content, "renamed");
        assert_eq!(task.description, None);
        assert_eq!(task.due_at, None);
    }

    #[test]
    fn test_task_patch_is_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch {
            priority: FieldPatch::Clear,
            ..TaskPatch::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_priority_parse_and_display() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("Medium".parse::<Priority>(), Ok(Priority::Medium));
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::Low.to_string(), "low");
    }

    #[test]
    fn test_validate_rejects_broken_boards() {
        let mut dangling = sample_board();
        dangling
            .find_column_mut("col-3")
            .unwrap()
            .task_ids
            .push("ghost".into());
        assert!(matches!(
            dangling.validate(),
            Err(BoardError::DanglingTaskRef { .. })
        ));

        let mut duplicated = sample_board();
        duplicated
            .find_column_mut("col-3")
            .unwrap()
            .task_ids
            .push("t1".into());
        assert!(matches!(
            duplicated.validate(),
            Err(BoardError::DuplicatePlacement { .. })
        ));

        let mut orphaned = sample_board();
        orphaned.tasks.insert("loose".into(), Task::new("loose", "x"));
        assert!(matches!(
            orphaned.validate(),
            Err(BoardError::OrphanTask { .. })
        ));
    }

    #[test]
    fn test_wire_field_names() {
        let board = sample_board();
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"taskIds\""));
        assert!(!json.contains("\"task_ids\""));

        let mut board = board;
        let due = Utc::now();
        board.update_task_details(
            "t1",
            &TaskPatch {
                due_at: FieldPatch::Set(due),
                ..TaskPatch::default()
            },
        );
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"dueDate\""));
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut board = sample_board();
        board.update_task_details(
            "t2",
            &TaskPatch {
                description: FieldPatch::Set("with details".into()),
                priority: FieldPatch::Set(Priority::High),
                due_at: FieldPatch::Set(Utc::now()),
                ..TaskPatch::default()
            },
        );
        let json = serde_json::to_string_pretty(&board).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }
}
