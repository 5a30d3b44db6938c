//! Plank CLI - kanban boards in a local data directory.
//!
//! Commands map one-to-one onto board store mutations; drags arrive either
//! as explicit move commands or as gesture scripts replayed through the
//! drag controller.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use plank_core::{Board, BoardStore, FieldPatch, Mutation, Priority, TaskPatch};
use plank_drag::{DragController, GestureEvent};
use plank_storage::{
    clear_session, current_session, find_plank_dir, init_plank_dir, save_session,
    BoardPersistence, DirKvStore, PlankConfig, Session,
};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "plank")]
#[command(about = "Plank - Local kanban boards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a plank board
    Init {
        /// Path to initialize (defaults to current directory)
        path: Option<String>,
    },

    /// Show the board
    Board,

    /// Show one task in full
    Show {
        /// Task id
        task_id: String,
    },

    /// Create a task at the bottom of a column
    Add {
        /// Column id
        column_id: String,

        /// Task content
        content: String,
    },

    /// Edit a task's details
    Edit {
        /// Task id
        task_id: String,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,

        /// New priority (low, medium, high)
        #[arg(long)]
        priority: Option<String>,

        /// Reset the priority
        #[arg(long)]
        clear_priority: bool,

        /// New due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a task
    Delete {
        /// Task id
        task_id: String,

        /// Column the task is expected to sit in (resolved when omitted)
        column_id: Option<String>,
    },

    /// Add an empty column at the right edge of the board
    AddColumn {
        /// Column title
        title: String,
    },

    /// Rename a column
    RenameColumn {
        /// Column id
        column_id: String,

        /// New title
        title: String,
    },

    /// Delete a column and every task on it
    DeleteColumn {
        /// Column id
        column_id: String,
    },

    /// Move a task to a column, appending or at a given position
    MoveTask {
        /// Task id
        task_id: String,

        /// Destination column id
        column_id: String,

        /// Zero-based position in the destination (appends when omitted)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Move a column to the position of another column
    MoveColumn {
        /// Column being moved
        active_id: String,

        /// Column whose position it takes
        over_id: String,
    },

    /// Replay a drag gesture script against the board
    Gesture {
        /// Script file: one event per line
        /// (start ID | over ACTIVE TARGET | end ACTIVE [TARGET] | cancel ACTIVE)
        script: String,
    },

    /// Log in with any email (local mock session)
    Login {
        /// Email address
        email: String,
    },

    /// Log out
    Logout,

    /// Show the current session
    Whoami,
}

/// Find the .plank directory by walking up from the current directory.
fn require_plank_dir() -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    find_plank_dir(&cwd).ok_or_else(|| {
        anyhow::anyhow!("No .plank directory found. Run 'plank init' to create a board.")
    })
}

/// Open the board with persistence attached: every accepted mutation is
/// snapshotted back to the data directory.
fn open_board_store(plank_dir: &Path) -> Result<BoardStore> {
    let config = PlankConfig::load_or_default(plank_dir)?;
    let persistence =
        BoardPersistence::new(DirKvStore::new(plank_dir)).with_pretty(config.pretty_json);
    let board = persistence.load_board();
    let mut store = BoardStore::new(board);
    persistence.attach(&mut store);
    Ok(store)
}

/// Read the board without attaching persistence.
fn read_board(plank_dir: &Path) -> Board {
    BoardPersistence::new(DirKvStore::new(plank_dir)).load_board()
}

fn priority_colored(priority: Option<Priority>) -> colored::ColoredString {
    match priority {
        Some(Priority::High) => "high".red(),
        Some(Priority::Medium) => "medium".yellow(),
        Some(Priority::Low) => "low".green(),
        None => "none".bright_black(),
    }
}

fn print_board(board: &Board) {
    println!("{}", "━".repeat(60));
    println!(
        "{} {} columns, {} tasks",
        "Board:".bold(),
        board.columns.len(),
        board.tasks.len()
    );
    println!("{}", "━".repeat(60));

    for column in &board.columns {
        println!();
        println!(
            "{} {}",
            column.title.bold(),
            format!("({})", column.id).bright_black()
        );
        if column.task_ids.is_empty() {
            println!("  {}", "no tasks".bright_black());
            continue;
        }
        for (position, task_id) in column.task_ids.iter().enumerate() {
            // The store never produces dangling ids; render defensively anyway.
            let Some(task) = board.tasks.get(task_id) else {
                continue;
            };
            let mut line = format!(
                "  {}. [{}] {} {}",
                position + 1,
                priority_colored(task.priority),
                task.content,
                format!("({})", task.id).bright_black()
            );
            if let Some(due) = task.due_at {
                line.push_str(&format!(" {}", format!("due {}", due.format("%Y-%m-%d")).cyan()));
            }
            println!("{}", line);
        }
    }
}

/// Parse a due date given as RFC 3339 or as a bare date at midnight UTC.
fn parse_due(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        anyhow::anyhow!("Invalid due date '{}': expected RFC 3339 or YYYY-MM-DD", raw)
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a gesture script: one event per line, blank lines and
/// '#' comments skipped.
fn parse_gesture_script(raw: &str) -> Result<Vec<GestureEvent>> {
    let mut events = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let event = match parts.as_slice() {
            ["start", item] => GestureEvent::Start {
                item_id: item.to_string(),
            },
            ["over", active, target] => GestureEvent::Over {
                active_id: active.to_string(),
                over_id: target.to_string(),
            },
            ["end", active, target] => GestureEvent::End {
                active_id: active.to_string(),
                over_id: Some(target.to_string()),
            },
            ["end", active] | ["cancel", active] => GestureEvent::End {
                active_id: active.to_string(),
                over_id: None,
            },
            _ => {
                return Err(anyhow::anyhow!(
                    "Unrecognized gesture on line {}: {}",
                    line_no + 1,
                    line
                ))
            }
        };
        events.push(event);
    }
    Ok(events)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; the config's filter applies when RUST_LOG is unset.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let fallback = env::current_dir()
                .ok()
                .and_then(|cwd| find_plank_dir(&cwd))
                .and_then(|dir| PlankConfig::load_or_default(&dir).ok())
                .map(|config| config.log_filter)
                .unwrap_or_else(|| "plank=info".to_string());
            EnvFilter::new(fallback)
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("Plank CLI starting");

    match cli.command {
        Commands::Init { path } => {
            let target = path.unwrap_or_else(|| ".".to_string());
            let plank_dir = init_plank_dir(Path::new(&target))?;

            // Seed the snapshot so the default board is on disk from day one.
            let config = PlankConfig::load_or_default(&plank_dir)?;
            let mut persistence =
                BoardPersistence::new(DirKvStore::new(&plank_dir)).with_pretty(config.pretty_json);
            let board = persistence.load_board();
            persistence.save_board(&board);

            println!("{}", "✓ Initialized plank board".green().bold());
            println!("  Board:  {}", plank_dir.join("board.json").display());
            println!("  Config: {}", plank_dir.join("config.toml").display());
            Ok(())
        }

        Commands::Board => {
            let plank_dir = require_plank_dir()?;
            if current_session(&DirKvStore::new(&plank_dir)).is_none() {
                println!(
                    "{}",
                    "Not logged in. Run 'plank login <email>' to see the board.".yellow()
                );
                return Ok(());
            }
            print_board(&read_board(&plank_dir));
            Ok(())
        }

        Commands::Show { task_id } => {
            let plank_dir = require_plank_dir()?;
            if current_session(&DirKvStore::new(&plank_dir)).is_none() {
                println!(
                    "{}",
                    "Not logged in. Run 'plank login <email>' to see the board.".yellow()
                );
                return Ok(());
            }
            let board = read_board(&plank_dir);
            let task = board
                .tasks
                .get(&task_id)
                .ok_or_else(|| anyhow::anyhow!("Task not found: {}", task_id))?;

            println!("{}", "━".repeat(60));
            println!("{} {}", "Task:".bold(), task.id.bright_cyan());
            println!("{}", "━".repeat(60));
            println!("{:<12} {}", "Content:".bold(), task.content);
            if let Some(column) = board.column_of_task(&task_id) {
                println!(
                    "{:<12} {} {}",
                    "Column:".bold(),
                    column.title,
                    format!("({})", column.id).bright_black()
                );
            }
            println!(
                "{:<12} {}",
                "Priority:".bold(),
                priority_colored(task.priority)
            );
            match task.due_at {
                Some(due) => println!("{:<12} {}", "Due:".bold(), due.format("%Y-%m-%d %H:%M UTC")),
                None => println!("{:<12} {}", "Due:".bold(), "-".bright_black()),
            }
            if let Some(description) = &task.description {
                println!();
                println!("{}", "Description:".bold());
                println!("{}", description);
            }
            Ok(())
        }

        Commands::Add { column_id, content } => {
            let content = content.trim();
            if content.is_empty() {
                return Err(anyhow::anyhow!("Task content cannot be empty"));
            }
            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            let task_id = store
                .add_task(&column_id, content)
                .ok_or_else(|| anyhow::anyhow!("Column not found: {}", column_id))?;

            println!("{} {}", "✓ Created task".green().bold(), task_id.bright_cyan());
            println!("  Column: {}", column_id);
            Ok(())
        }

        Commands::Edit {
            task_id,
            content,
            description,
            clear_description,
            priority,
            clear_priority,
            due,
            clear_due,
        } => {
            if description.is_some() && clear_description {
                return Err(anyhow::anyhow!(
                    "--description conflicts with --clear-description"
                ));
            }
            if priority.is_some() && clear_priority {
                return Err(anyhow::anyhow!("--priority conflicts with --clear-priority"));
            }
            if due.is_some() && clear_due {
                return Err(anyhow::anyhow!("--due conflicts with --clear-due"));
            }

            let content = match content {
                Some(raw) => {
                    let trimmed = raw.trim().to_string();
                    if trimmed.is_empty() {
                        return Err(anyhow::anyhow!("Task content cannot be empty"));
                    }
                    Some(trimmed)
                }
                None => None,
            };
            let description_patch = if clear_description {
                FieldPatch::Clear
            } else {
                description.map(FieldPatch::Set).unwrap_or_default()
            };
            let priority_patch = if clear_priority {
                FieldPatch::Clear
            } else if let Some(raw) = priority {
                FieldPatch::Set(raw.parse::<Priority>().map_err(|e| anyhow::anyhow!(e))?)
            } else {
                FieldPatch::Keep
            };
            let due_patch = if clear_due {
                FieldPatch::Clear
            } else if let Some(raw) = due {
                FieldPatch::Set(parse_due(&raw)?)
            } else {
                FieldPatch::Keep
            };

            let patch = TaskPatch {
                content,
                description: description_patch,
                priority: priority_patch,
                due_at: due_patch,
            };
            if patch.is_empty() {
                return Err(anyhow::anyhow!(
                    "No updates specified. Use --help to see the editable fields."
                ));
            }

            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            if !store.update_task_details(&task_id, patch) {
                return Err(anyhow::anyhow!("Task not found: {}", task_id));
            }

            println!("{} {}", "✓ Updated task".green().bold(), task_id.bright_cyan());
            Ok(())
        }

        Commands::Delete { task_id, column_id } => {
            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;

            let column_id = match column_id {
                Some(id) => id,
                None => store
                    .board()
                    .column_of_task(&task_id)
                    .map(|c| c.id.clone())
                    .ok_or_else(|| anyhow::anyhow!("Task not found: {}", task_id))?,
            };

            if !store.delete_task(&task_id, &column_id) {
                return Err(anyhow::anyhow!("Task not found: {}", task_id));
            }
            println!("{} {}", "✓ Deleted task".green().bold(), task_id);
            Ok(())
        }

        Commands::AddColumn { title } => {
            let title = title.trim();
            if title.is_empty() {
                return Err(anyhow::anyhow!("Column title cannot be empty"));
            }
            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            let column_id = store
                .add_column(title)
                .ok_or_else(|| anyhow::anyhow!("Failed to add column"))?;

            println!(
                "{} {}",
                "✓ Created column".green().bold(),
                column_id.bright_cyan()
            );
            println!("  Title: {}", title);
            Ok(())
        }

        Commands::RenameColumn { column_id, title } => {
            let title = title.trim();
            if title.is_empty() {
                return Err(anyhow::anyhow!("Column title cannot be empty"));
            }
            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            if !store.update_column_title(&column_id, title) {
                return Err(anyhow::anyhow!("Column not found: {}", column_id));
            }
            println!("{} {}", "✓ Renamed column".green().bold(), column_id);
            Ok(())
        }

        Commands::DeleteColumn { column_id } => {
            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            let task_count = store
                .board()
                .find_column(&column_id)
                .map(|c| c.task_ids.len())
                .ok_or_else(|| anyhow::anyhow!("Column not found: {}", column_id))?;

            store.delete_column(&column_id);
            println!("{} {}", "✓ Deleted column".green().bold(), column_id);
            if task_count > 0 {
                println!("  Removed {} task(s) with it", task_count);
            }
            Ok(())
        }

        Commands::MoveTask {
            task_id,
            column_id,
            index,
        } => {
            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            let source = store
                .board()
                .column_of_task(&task_id)
                .map(|c| c.id.clone())
                .ok_or_else(|| anyhow::anyhow!("Task not found: {}", task_id))?;

            let applied = store.apply(&Mutation::MoveTask {
                active_id: task_id.clone(),
                over_id: None,
                active_column_id: source,
                over_column_id: column_id.clone(),
                new_index: index,
            });
            if !applied {
                return Err(anyhow::anyhow!("Column not found: {}", column_id));
            }

            println!(
                "{} {} {} {}",
                "✓ Moved".green().bold(),
                task_id.bright_cyan(),
                "to".green().bold(),
                column_id
            );
            Ok(())
        }

        Commands::MoveColumn { active_id, over_id } => {
            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            if !store.move_column(&active_id, &over_id) {
                return Err(anyhow::anyhow!(
                    "Column not found: {} or {}",
                    active_id,
                    over_id
                ));
            }
            println!("{} {}", "✓ Moved column".green().bold(), active_id);
            Ok(())
        }

        Commands::Gesture { script } => {
            let raw = std::fs::read_to_string(&script)
                .map_err(|e| anyhow::anyhow!("Failed to read gesture script {}: {}", script, e))?;
            let events = parse_gesture_script(&raw)?;
            if events.is_empty() {
                println!("{}", "Gesture script holds no events".yellow());
                return Ok(());
            }

            let plank_dir = require_plank_dir()?;
            let mut store = open_board_store(&plank_dir)?;
            let mut controller = DragController::new();
            let mut applied = 0;
            for event in events {
                applied += controller.handle(&mut store, event);
            }

            println!(
                "{} {} move(s) applied",
                "✓ Gesture replayed:".green().bold(),
                applied
            );
            if controller.is_dragging() {
                println!("{}", "Warning: script ended while still dragging".yellow());
            }
            Ok(())
        }

        Commands::Login { email } => {
            let plank_dir = require_plank_dir()?;
            let mut kv = DirKvStore::new(&plank_dir);
            let session = Session::log_in(&email);
            save_session(&mut kv, &session)?;

            println!(
                "{} {}",
                "✓ Logged in as".green().bold(),
                session.name.bright_cyan()
            );
            Ok(())
        }

        Commands::Logout => {
            let plank_dir = require_plank_dir()?;
            let mut kv = DirKvStore::new(&plank_dir);
            clear_session(&mut kv)?;
            println!("{}", "✓ Logged out".green().bold());
            Ok(())
        }

        Commands::Whoami => {
            let plank_dir = require_plank_dir()?;
            match current_session(&DirKvStore::new(&plank_dir)) {
                Some(session) => {
                    println!("{} {}", "Logged in as:".bold(), session.name.bright_cyan());
                    println!("{:<10} {}", "Email:".bold(), session.email);
                    println!("{:<10} {}", "Avatar:".bold(), session.avatar_url);
                    println!(
                        "{:<10} {}",
                        "Since:".bold(),
                        session.logged_in_at.format("%Y-%m-%d %H:%M UTC")
                    );
                }
                None => println!("{}", "Not logged in".yellow()),
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gesture_script_accepts_all_event_forms() {
        let script = "\
# move t1 onto col-2
start t1
over t1 t3
end t1 t3

start col-1
cancel col-1
end col-1
";
        let events = parse_gesture_script(script).unwrap();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], GestureEvent::Start { .. }));
        assert!(matches!(
            events[2],
            GestureEvent::End {
                over_id: Some(_),
                ..
            }
        ));
        assert!(matches!(events[4], GestureEvent::End { over_id: None, .. }));
        assert!(matches!(events[5], GestureEvent::End { over_id: None, .. }));
    }

    #[test]
    fn test_parse_gesture_script_rejects_garbage() {
        let err = parse_gesture_script("start t1\nwiggle t1 t2\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_due_accepts_both_formats() {
        let bare = parse_due("2026-09-01").unwrap();
        assert_eq!(bare.format("%Y-%m-%d %H:%M").to_string(), "2026-09-01 00:00");

        let full = parse_due("2026-09-01T12:30:00Z").unwrap();
        assert_eq!(full.format("%H:%M").to_string(), "12:30");

        assert!(parse_due("next tuesday").is_err());
    }
}
