//! The seeded default board used whenever no usable snapshot exists.

use chrono::Utc;
use plank_core::{Board, Column, Priority, Task};

/// Build the fixed three-column starter board.
///
/// Served both on first run and when a stored snapshot turns out to be
/// unreadable. The example tasks give each priority level one showing.
pub fn default_board() -> Board {
    let mut board = Board::default();
    board.add_column(Column::new("col-1", "To Do"));
    board.add_column(Column::new("col-2", "In Progress"));
    board.add_column(Column::new("col-3", "Done"));
    board.add_task(
        "col-1",
        Task::new("task-1", "Research competitors")
            .with_priority(Priority::High)
            .with_description("Analyze top 3 competitors features."),
    );
    board.add_task(
        "col-1",
        Task::new("task-2", "Design system draft").with_due(Utc::now()),
    );
    board.add_task(
        "col-2",
        Task::new("task-3", "Setup project repo").with_priority(Priority::Low),
    );
    board
}
