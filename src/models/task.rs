use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Identifier of a task. Assigned at creation, strictly increasing, never reused.
pub type TaskId = u64;

/// A card on the board.
///
/// A task lives in exactly one column at a time. Its column membership is
/// owned by the [`Board`](super::Board), not by the task itself, so moving a
/// task never touches these fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free-form details. May be empty.
    pub description: String,
    /// Team member the task is assigned to.
    pub assignee: String,
    pub priority: Priority,
}

/// How urgent a task is.
///
/// - `High`: shown in red
/// - `Medium`: shown in orange
/// - `Low`: shown in green
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Parse user input, case-insensitively, into a priority.
    pub fn parse(s: &str) -> Result<Self, BoardError> {
        Self::from_str(&s.trim().to_ascii_lowercase()).ok_or(BoardError::Validation {
            field: "priority",
        })
    }

    /// Tag colour used when the task card is displayed.
    pub fn color(&self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "orange",
            Self::Low => "green",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Must name a team member. Checked by the caller, not the store.
    pub assignee: String,
    pub priority: Priority,
}

impl CreateTaskInput {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        assignee: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            assignee: assignee.into(),
            priority,
        }
    }

    /// Reject blank required fields. Values are never trimmed or rewritten.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.title.trim().is_empty() {
            return Err(BoardError::Validation { field: "title" });
        }
        if self.assignee.trim().is_empty() {
            return Err(BoardError::Validation { field: "assignee" });
        }
        Ok(())
    }
}

/// Result of a successful move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The task left its source column and was appended to the target.
    Moved,
    /// Source and target were the same column; nothing changed.
    Unchanged,
}
