//! The canonical board state and its persistence contract.
//!
//! [`BoardStore`] owns the board and enforces the one-task-one-column
//! invariant on every mutation. It reaches storage only through
//! [`BoardRepository`].

mod repository;
mod store;

pub use repository::{BoardRepository, MemoryRepository};
pub use store::BoardStore;
