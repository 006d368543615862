use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::drag::{DragPayload, DragState};
use crate::error::BoardError;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Map an engine error to a response. Validation and not-found errors are
/// safe to show the client as-is; anything else is logged and sanitized.
fn board_error(e: BoardError) -> (StatusCode, String) {
    let msg = e.to_string();
    match e {
        BoardError::Validation { .. } => {
            tracing::warn!("Validation error: {}", msg);
            (StatusCode::BAD_REQUEST, msg)
        }
        BoardError::ColumnNotFound { .. } | BoardError::TaskNotFound { .. } => {
            tracing::warn!("Not found: {}", msg);
            (StatusCode::NOT_FOUND, msg)
        }
        BoardError::InvalidBoard { .. } => {
            tracing::error!("Internal error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Request / Response Types
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    pub outcome: MoveOutcome,
    pub board: Board,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmRequest {
    pub task_id: TaskId,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmResponse {
    /// Payload of an earlier pick-up that never dropped.
    pub superseded: Option<DragPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropRequest {
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropResponse {
    /// `None` when nothing was picked up.
    pub payload: Option<DragPayload>,
    pub outcome: Option<MoveOutcome>,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Board
// ============================================================

pub async fn get_board(State(state): State<AppState>) -> Json<Board> {
    let store = state.store.lock().expect("board lock poisoned");
    Json(store.snapshot())
}

pub async fn get_column(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Column>, (StatusCode, String)> {
    let store = state.store.lock().expect("board lock poisoned");
    store
        .find_column(&key)
        .map(|column| Json(column.clone()))
        .map_err(board_error)
}

pub async fn list_team(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.team.to_vec())
}

// ============================================================
// Tasks
// ============================================================

pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTaskInput>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    input.validate().map_err(board_error)?;
    if !state.team.iter().any(|member| *member == input.assignee) {
        tracing::warn!("Rejected unknown assignee '{}'", input.assignee);
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown assignee: {}", input.assignee),
        ));
    }

    let mut store = state.store.lock().expect("board lock poisoned");
    store
        .create_task(input)
        .map(|task| (StatusCode::CREATED, Json(task)))
        .map_err(board_error)
}

pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(input): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, (StatusCode, String)> {
    let mut store = state.store.lock().expect("board lock poisoned");
    let outcome = store
        .move_task(id, &input.source, &input.target)
        .map_err(board_error)?;

    Ok(Json(MoveResponse {
        outcome,
        board: store.snapshot(),
    }))
}

// ============================================================
// Drag and drop
// ============================================================

pub async fn get_drag(State(state): State<AppState>) -> Json<DragState> {
    let drag = state.drag.lock().expect("drag lock poisoned");
    Json(drag.state().clone())
}

pub async fn arm_drag(
    State(state): State<AppState>,
    Json(input): Json<ArmRequest>,
) -> Json<ArmResponse> {
    let mut drag = state.drag.lock().expect("drag lock poisoned");
    let superseded = drag.arm(input.task_id, input.source);
    Json(ArmResponse { superseded })
}

pub async fn drop_drag(
    State(state): State<AppState>,
    Json(input): Json<DropRequest>,
) -> Result<Json<DropResponse>, (StatusCode, String)> {
    let mut drag = state.drag.lock().expect("drag lock poisoned");
    let Some(payload) = drag.consume(&input.target) else {
        return Ok(Json(DropResponse {
            payload: None,
            outcome: None,
        }));
    };

    let mut store = state.store.lock().expect("board lock poisoned");
    let outcome = store
        .move_task(payload.task_id, &payload.source_column, &input.target)
        .map_err(board_error)?;

    Ok(Json(DropResponse {
        payload: Some(payload),
        outcome: Some(outcome),
    }))
}

pub async fn cancel_drag(State(state): State<AppState>) -> impl IntoResponse {
    let mut drag = state.drag.lock().expect("drag lock poisoned");
    let cancelled = drag.cancel();
    Json(serde_json::json!({ "cancelled": cancelled }))
}
