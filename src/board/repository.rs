use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::models::Board;

/// Save/load contract between the board engine and whatever stores it.
///
/// The store calls [`save_board`](BoardRepository::save_board) after every
/// successful mutation and does not act on the outcome; failure handling
/// belongs to the implementation.
pub trait BoardRepository: Send {
    /// Load the stored board, or `None` if nothing has been stored yet.
    fn load_board(&self) -> Result<Option<Board>>;

    /// Replace the stored board with `board`.
    fn save_board(&self, board: &Board) -> Result<()>;
}

/// In-process repository. Clones share the same slot, so a test can keep a
/// handle and inspect what the store saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    board: Option<Board>,
    saves: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository that already holds `board`.
    pub fn with_board(board: Board) -> Self {
        let repo = Self::default();
        repo.inner.lock().expect("repository lock poisoned").board = Some(board);
        repo
    }

    /// The most recently saved board.
    pub fn stored(&self) -> Option<Board> {
        self.inner
            .lock()
            .expect("repository lock poisoned")
            .board
            .clone()
    }

    /// Number of times `save_board` has been called.
    pub fn save_count(&self) -> usize {
        self.inner.lock().expect("repository lock poisoned").saves
    }
}

impl BoardRepository for MemoryRepository {
    fn load_board(&self) -> Result<Option<Board>> {
        Ok(self.stored())
    }

    fn save_board(&self, board: &Board) -> Result<()> {
        let mut slot = self.inner.lock().expect("repository lock poisoned");
        slot.board = Some(board.clone());
        slot.saves += 1;
        Ok(())
    }
}
