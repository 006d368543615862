//! Domain models for the task board.
//!
//! - [`Board`]: ordered columns; the owner of every task's column membership.
//! - [`Column`]: an ordered lane of tasks, identified by a stable key.
//! - [`Task`]: a card with a title, description, assignee and [`Priority`].

mod board;
mod task;

pub use board::*;
pub use task::*;
