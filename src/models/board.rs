use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::task::{Priority, Task, TaskId};
use crate::error::BoardError;

/// An ordered lane of tasks. Insertion order is display order, top to bottom.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    /// Stable identifier, distinct across the board.
    pub key: String,
    pub title: String,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Position of a task within this column.
    pub fn position_of(&self, task_id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        self.position_of(task_id).is_some()
    }

    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(|t| t.id).collect()
    }
}

/// The ordered set of columns making up a board.
///
/// Column order is fixed once the board is built. Every task id appears in
/// exactly one column; [`Board::validate`] checks this along with key uniqueness.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build a board of empty columns from `(key, title)` pairs.
    pub fn from_layout<K, T>(layout: impl IntoIterator<Item = (K, T)>) -> Self
    where
        K: Into<String>,
        T: Into<String>,
    {
        Self {
            columns: layout
                .into_iter()
                .map(|(key, title)| Column::new(key, title))
                .collect(),
        }
    }

    /// The board the dashboard ships with: three columns and four tasks.
    pub fn sample() -> Self {
        let task = |id, title: &str, description: &str, assignee: &str, priority| Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            assignee: assignee.to_string(),
            priority,
        };

        Self::new(vec![
            Column::new("todo", "To Do").with_tasks(vec![
                task(
                    1,
                    "Requirement Analysis",
                    "Complete requirement documentation",
                    "John",
                    Priority::High,
                ),
                task(
                    2,
                    "System Design",
                    "Complete system architecture design",
                    "Mike",
                    Priority::Medium,
                ),
            ]),
            Column::new("inProgress", "In Progress").with_tasks(vec![task(
                3,
                "Frontend Development",
                "Implement user interface",
                "Tom",
                Priority::High,
            )]),
            Column::new("done", "Done").with_tasks(vec![task(
                4,
                "Project Kickoff",
                "Project kickoff meeting",
                "John",
                Priority::Medium,
            )]),
        ])
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub(crate) fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Find the column holding a task, and the task itself.
    pub fn locate_task(&self, task_id: TaskId) -> Option<(&Column, &Task)> {
        self.columns.iter().find_map(|column| {
            column
                .tasks
                .iter()
                .find(|t| t.id == task_id)
                .map(|task| (column, task))
        })
    }

    /// Highest task id on the board, or 0 when the board holds no tasks.
    pub fn max_task_id(&self) -> TaskId {
        self.columns
            .iter()
            .flat_map(|c| c.tasks.iter().map(|t| t.id))
            .max()
            .unwrap_or(0)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Check structural invariants: at least one column, distinct non-empty
    /// column keys, and no task id present more than once anywhere.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.columns.is_empty() {
            return Err(BoardError::invalid_board("board has no columns"));
        }

        let mut keys = HashSet::new();
        let mut ids = HashSet::new();
        for column in &self.columns {
            if column.key.is_empty() {
                return Err(BoardError::invalid_board("column key must not be empty"));
            }
            if !keys.insert(column.key.as_str()) {
                return Err(BoardError::invalid_board(format!(
                    "duplicate column key '{}'",
                    column.key
                )));
            }
            for task in &column.tasks {
                if !ids.insert(task.id) {
                    return Err(BoardError::invalid_board(format!(
                        "task {} appears more than once",
                        task.id
                    )));
                }
            }
        }

        Ok(())
    }
}
