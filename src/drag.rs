//! Two-phase pick-up/drop protocol.
//!
//! A [`DragTransferSession`] remembers which task was lifted from which
//! column between a pick-up event and the drop event that follows it. It
//! holds at most one payload and never touches the board itself; the drop
//! handler hands the consumed payload to a [`TaskMover`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{MoveOutcome, TaskId};

/// What is being dragged, and where from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub task_id: TaskId,
    pub source_column: String,
}

/// State of a transfer session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Empty,
    Armed(DragPayload),
}

/// The move contract a drop is resolved against.
pub trait TaskMover {
    fn move_task(&mut self, task_id: TaskId, source: &str, target: &str) -> Result<MoveOutcome>;
}

/// Single-slot transfer token for one user's drag gesture.
#[derive(Debug, Clone, Default)]
pub struct DragTransferSession {
    state: DragState,
}

impl DragTransferSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Armed(payload) => Some(payload),
            DragState::Empty => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, DragState::Armed(_))
    }

    /// Pick up a task. A payload left over from a gesture that never dropped
    /// is replaced and returned.
    pub fn arm(&mut self, task_id: TaskId, source_column: impl Into<String>) -> Option<DragPayload> {
        let payload = DragPayload {
            task_id,
            source_column: source_column.into(),
        };
        tracing::debug!(task_id, source = %payload.source_column, "Drag armed");

        let previous = std::mem::replace(&mut self.state, DragState::Armed(payload));
        match previous {
            DragState::Armed(stale) => {
                tracing::debug!(task_id = stale.task_id, "Superseded stale drag");
                Some(stale)
            }
            DragState::Empty => None,
        }
    }

    /// Take the payload for a drop on `target_column`. Returns `None` when
    /// nothing was picked up.
    pub fn consume(&mut self, target_column: &str) -> Option<DragPayload> {
        match std::mem::take(&mut self.state) {
            DragState::Armed(payload) => {
                tracing::debug!(
                    task_id = payload.task_id,
                    source = %payload.source_column,
                    target = target_column,
                    "Drag consumed"
                );
                Some(payload)
            }
            DragState::Empty => {
                tracing::debug!(target = target_column, "Drop without a pick-up ignored");
                None
            }
        }
    }

    /// Abandon the gesture. The board is not touched.
    pub fn cancel(&mut self) -> Option<DragPayload> {
        let previous = std::mem::take(&mut self.state);
        match previous {
            DragState::Armed(payload) => {
                tracing::debug!(task_id = payload.task_id, "Drag cancelled");
                Some(payload)
            }
            DragState::Empty => None,
        }
    }

    /// Consume the session and apply the move. The session is empty
    /// afterwards whether or not the move succeeds.
    pub fn drop_onto<M: TaskMover + ?Sized>(
        &mut self,
        target_column: &str,
        mover: &mut M,
    ) -> Result<Option<MoveOutcome>> {
        let Some(payload) = self.consume(target_column) else {
            return Ok(None);
        };
        mover
            .move_task(payload.task_id, &payload.source_column, target_column)
            .map(Some)
    }
}
