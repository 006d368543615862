mod handlers;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::board::BoardStore;
use crate::drag::DragTransferSession;

pub use handlers::{ArmRequest, ArmResponse, DropRequest, DropResponse, MoveRequest, MoveResponse};

/// Shared state for one user's board session.
///
/// Both locks are only ever taken inside a single synchronous handler body,
/// drag before store, so requests are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<BoardStore>>,
    drag: Arc<Mutex<DragTransferSession>>,
    team: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(store: BoardStore, team: Vec<String>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            drag: Arc::new(Mutex::new(DragTransferSession::new())),
            team: Arc::new(team),
        }
    }
}

pub fn create_router(store: BoardStore, team: Vec<String>) -> Router {
    let api = Router::new()
        // Board
        .route("/board", get(handlers::get_board))
        .route("/columns/{key}", get(handlers::get_column))
        .route("/team", get(handlers::list_team))
        // Tasks
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/{id}/move", post(handlers::move_task))
        // Drag and drop
        .route("/drag", get(handlers::get_drag))
        .route("/drag/arm", post(handlers::arm_drag))
        .route("/drag/drop", post(handlers::drop_drag))
        .route("/drag/cancel", post(handlers::cancel_drag))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(store, team))
}
