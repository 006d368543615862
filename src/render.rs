//! Plain-text rendering of a board.

use crate::models::{Board, Column, Priority};

const HIGH: char = '▲';
const MEDIUM: char = '■';
const LOW: char = '▽';

/// Get the marker for a priority.
fn priority_symbol(priority: Priority) -> char {
    match priority {
        Priority::High => HIGH,
        Priority::Medium => MEDIUM,
        Priority::Low => LOW,
    }
}

/// Render a board column by column.
///
/// Example output:
/// ```text
/// To Do (2)
/// ├── ▲ #1 Requirement Analysis (John)
/// └── ■ #2 System Design (Mike)
/// Done (0)
/// ```
pub fn render_board(board: &Board) -> String {
    let mut output = String::new();
    for column in &board.columns {
        render_column(&mut output, column);
    }
    output
}

fn render_column(output: &mut String, column: &Column) {
    output.push_str(&format!("{} ({})\n", column.title, column.tasks.len()));

    for (i, task) in column.tasks.iter().enumerate() {
        let branch = if i == column.tasks.len() - 1 {
            "└── "
        } else {
            "├── "
        };
        output.push_str(branch);
        output.push(priority_symbol(task.priority));
        output.push_str(&format!(" #{} {} ({})\n", task.id, task.title, task.assignee));
    }
}

/// One line per column: key, title and task count.
pub fn render_column_summary(board: &Board) -> String {
    let width = board
        .columns
        .iter()
        .map(|c| c.key.len())
        .max()
        .unwrap_or(0);

    board
        .columns
        .iter()
        .map(|c| format!("{:<width$}  {} ({})\n", c.key, c.title, c.tasks.len()))
        .collect()
}
