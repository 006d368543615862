//! Kanban task board engine.
//!
//! [`board::BoardStore`] owns the columns and tasks; [`drag::DragTransferSession`]
//! carries a picked-up task to the column it is dropped on. Storage
//! ([`db`]), the HTTP surface ([`api`]) and text output ([`render`]) sit
//! around the engine and talk to it only through its public operations.

pub mod api;
pub mod board;
pub mod config;
pub mod db;
pub mod drag;
pub mod error;
pub mod models;
pub mod render;

pub use board::{BoardRepository, BoardStore, MemoryRepository};
pub use drag::{DragPayload, DragState, DragTransferSession, TaskMover};
pub use error::BoardError;
