use anyhow::Context;

use super::repository::BoardRepository;
use crate::config::BoardConfig;
use crate::drag::TaskMover;
use crate::error::{BoardError, Result};
use crate::models::{Board, Column, CreateTaskInput, MoveOutcome, Task, TaskId};

/// Single source of truth for column and task state.
///
/// All mutation goes through `&mut self`, so there is exactly one writer at a
/// time. Every operation validates before it mutates: a call that returns an
/// error leaves the board untouched.
pub struct BoardStore {
    board: Board,
    default_column: String,
    /// Highest id this store has issued or seen. New ids are always above it.
    last_issued_id: TaskId,
    repository: Option<Box<dyn BoardRepository>>,
}

impl BoardStore {
    /// Build a store over `board`, creating tasks in `default_column`.
    pub fn new(board: Board, default_column: impl Into<String>) -> Result<Self> {
        let default_column = default_column.into();
        board.validate()?;
        if board.column(&default_column).is_none() {
            return Err(BoardError::invalid_board(format!(
                "default column '{}' is not on the board",
                default_column
            )));
        }

        let last_issued_id = board.max_task_id();
        Ok(Self {
            board,
            default_column,
            last_issued_id,
            repository: None,
        })
    }

    /// Attach a repository. Subsequent mutations are saved to it.
    pub fn with_repository(mut self, repository: Box<dyn BoardRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Load the board from `repository`, falling back to `fallback` (which is
    /// saved immediately) when nothing is stored yet.
    pub fn hydrate(
        repository: Box<dyn BoardRepository>,
        fallback: Board,
        default_column: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let loaded = repository
            .load_board()
            .context("Failed to load board")?;

        let store = match loaded {
            Some(board) => {
                tracing::debug!(
                    columns = board.columns.len(),
                    tasks = board.task_count(),
                    "Loaded stored board"
                );
                Self::new(board, default_column)?.with_repository(repository)
            }
            None => {
                tracing::info!("No stored board, initializing from layout");
                let store = Self::new(fallback, default_column)?.with_repository(repository);
                if let Some(repository) = &store.repository {
                    repository
                        .save_board(&store.board)
                        .context("Failed to save initial board")?;
                }
                store
            }
        };

        Ok(store)
    }

    /// Hydrate using the column layout and default column from `config`.
    pub fn from_config(
        config: &BoardConfig,
        repository: Box<dyn BoardRepository>,
    ) -> anyhow::Result<Self> {
        Self::hydrate(
            repository,
            config.initial_board(),
            config.default_column.clone(),
        )
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Columns in display order.
    pub fn columns(&self) -> &[Column] {
        &self.board.columns
    }

    /// Owned copy of the current board.
    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn find_column(&self, key: &str) -> Result<&Column> {
        self.board
            .column(key)
            .ok_or_else(|| BoardError::column_not_found(key))
    }

    pub fn find_task(&self, task_id: TaskId) -> Option<(&Column, &Task)> {
        self.board.locate_task(task_id)
    }

    /// Key of the column new tasks are created in.
    pub fn default_column(&self) -> &str {
        &self.default_column
    }

    // ============================================================
    // Mutations
    // ============================================================

    /// Create a task at the bottom of the default column.
    pub fn create_task(&mut self, input: CreateTaskInput) -> Result<Task> {
        input.validate()?;

        let column_index = self
            .board
            .column_index(&self.default_column)
            .ok_or_else(|| BoardError::column_not_found(&self.default_column))?;

        let id = self.last_issued_id.max(self.board.max_task_id()) + 1;
        let task = Task {
            id,
            title: input.title,
            description: input.description,
            assignee: input.assignee,
            priority: input.priority,
        };

        self.board.columns[column_index].tasks.push(task.clone());
        self.last_issued_id = id;

        tracing::info!(
            task_id = id,
            column = %self.default_column,
            "Created task '{}'",
            task.title
        );
        self.persist();

        Ok(task)
    }

    /// Move a task from `source` to the end of `target`.
    ///
    /// Moving within the same column is a no-op; tasks are never reordered
    /// inside a column.
    pub fn move_task(&mut self, task_id: TaskId, source: &str, target: &str) -> Result<MoveOutcome> {
        let source_index = self
            .board
            .column_index(source)
            .ok_or_else(|| BoardError::column_not_found(source))?;
        let target_index = self
            .board
            .column_index(target)
            .ok_or_else(|| BoardError::column_not_found(target))?;
        let position = self.board.columns[source_index]
            .position_of(task_id)
            .ok_or_else(|| BoardError::TaskNotFound {
                task_id,
                column: source.to_string(),
            })?;

        if source_index == target_index {
            tracing::debug!(task_id, column = source, "Task dropped on its own column");
            return Ok(MoveOutcome::Unchanged);
        }

        // Both indices and the position are known good; nothing below can fail.
        let task = self.board.columns[source_index].tasks.remove(position);
        self.board.columns[target_index].tasks.push(task);

        tracing::info!(task_id, from = source, to = target, "Moved task");
        self.persist();

        Ok(MoveOutcome::Moved)
    }

    fn persist(&self) {
        let Some(repository) = &self.repository else {
            return;
        };
        if let Err(e) = repository.save_board(&self.board) {
            tracing::warn!("Failed to save board: {:#}", e);
        }
    }
}

impl TaskMover for BoardStore {
    fn move_task(&mut self, task_id: TaskId, source: &str, target: &str) -> Result<MoveOutcome> {
        BoardStore::move_task(self, task_id, source, target)
    }
}

impl std::fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardStore")
            .field("board", &self.board)
            .field("default_column", &self.default_column)
            .field("last_issued_id", &self.last_issued_id)
            .field("persistent", &self.repository.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MemoryRepository;
    use crate::models::Priority;

    fn sample_store() -> BoardStore {
        BoardStore::new(Board::sample(), "todo").unwrap()
    }

    fn input(title: &str) -> CreateTaskInput {
        CreateTaskInput::new(title, "", "Ann", Priority::High)
    }

    #[test]
    fn test_new_rejects_unknown_default_column() {
        let result = BoardStore::new(Board::sample(), "backlog");
        assert!(matches!(result, Err(BoardError::InvalidBoard { .. })));
    }

    #[test]
    fn test_create_task_continues_from_max_id() {
        let mut store = sample_store();
        let task = store.create_task(input("Write spec")).unwrap();
        assert_eq!(task.id, 5);
        assert_eq!(store.find_column("todo").unwrap().task_ids(), vec![1, 2, 5]);
    }

    #[test]
    fn test_create_task_on_empty_board_starts_at_one() {
        let mut store =
            BoardStore::new(Board::from_layout([("todo", "To Do")]), "todo").unwrap();
        assert_eq!(store.create_task(input("First")).unwrap().id, 1);
        assert_eq!(store.create_task(input("Second")).unwrap().id, 2);
    }

    #[test]
    fn test_create_task_validation_leaves_board_unchanged() {
        let mut store = sample_store();
        let before = store.snapshot();
        let err = store.create_task(input("")).unwrap_err();
        assert_eq!(err, BoardError::Validation { field: "title" });
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_move_task_appends_to_target() {
        let mut store = sample_store();
        let outcome = store.move_task(1, "todo", "done").unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(store.find_column("todo").unwrap().task_ids(), vec![2]);
        assert_eq!(store.find_column("done").unwrap().task_ids(), vec![4, 1]);
    }

    #[test]
    fn test_move_task_same_column_is_noop() {
        let mut store = sample_store();
        let before = store.snapshot();
        assert_eq!(
            store.move_task(1, "todo", "todo").unwrap(),
            MoveOutcome::Unchanged
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_move_task_unknown_column() {
        let mut store = sample_store();
        let err = store.move_task(1, "todo", "archive").unwrap_err();
        assert_eq!(
            err,
            BoardError::ColumnNotFound {
                key: "archive".into()
            }
        );
    }

    #[test]
    fn test_move_task_from_wrong_column_is_not_found() {
        let mut store = sample_store();
        let before = store.snapshot();
        let err = store.move_task(3, "todo", "done").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_mutations_are_saved() {
        let repo = MemoryRepository::new();
        let mut store = sample_store().with_repository(Box::new(repo.clone()));

        store.create_task(input("Saved")).unwrap();
        store.move_task(5, "todo", "inProgress").unwrap();
        store.move_task(5, "inProgress", "inProgress").unwrap();
        let _ = store.move_task(42, "todo", "done");

        assert_eq!(repo.save_count(), 2);
        assert_eq!(repo.stored().unwrap(), store.snapshot());
    }

    #[test]
    fn test_hydrate_saves_fallback_once() {
        let repo = MemoryRepository::new();
        let store =
            BoardStore::hydrate(Box::new(repo.clone()), Board::sample(), "todo").unwrap();
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.stored().unwrap(), store.snapshot());
    }

    #[test]
    fn test_hydrate_prefers_stored_board() {
        let stored = Board::from_layout([("todo", "To Do"), ("done", "Done")]);
        let repo = MemoryRepository::with_board(stored.clone());
        let store = BoardStore::hydrate(Box::new(repo.clone()), Board::sample(), "todo").unwrap();
        assert_eq!(store.snapshot(), stored);
        assert_eq!(repo.save_count(), 0);
    }
}
