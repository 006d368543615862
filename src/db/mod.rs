mod schema;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::board::BoardRepository;
use crate::models::*;

/// SQLite-backed board storage.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "taskboard")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("taskboard.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Board operations
    // ============================================================

    /// Read the stored board, columns and tasks in position order.
    pub fn get_board(&self) -> Result<Option<Board>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let mut stmt = conn.prepare("SELECT key, title FROM board_columns ORDER BY position")?;
        let mut columns = stmt
            .query_map([], |row| {
                Ok(Column::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if columns.is_empty() {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT id, column_key, title, description, assignee, priority
             FROM board_tasks ORDER BY column_key, position",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let column_key: String = row.get(1)?;
                Ok((
                    column_key,
                    Task {
                        id: parse_task_id(row.get::<_, i64>(0)?)?,
                        title: row.get(2)?,
                        description: row.get(3)?,
                        assignee: row.get(4)?,
                        priority: parse_priority(row.get::<_, String>(5)?)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut tasks_by_column: HashMap<String, Vec<Task>> = HashMap::new();
        for (column_key, task) in rows {
            tasks_by_column.entry(column_key).or_default().push(task);
        }
        for column in &mut columns {
            column.tasks = tasks_by_column.remove(&column.key).unwrap_or_default();
        }
        if !tasks_by_column.is_empty() {
            tracing::warn!(
                orphaned_columns = tasks_by_column.len(),
                "Ignoring stored tasks that reference unknown columns"
            );
        }

        Ok(Some(Board::new(columns)))
    }

    /// Replace the stored board in a single transaction.
    pub fn put_board(&self, board: &Board) -> Result<()> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM board_tasks", [])?;
        tx.execute("DELETE FROM board_columns", [])?;

        for (column_position, column) in board.columns.iter().enumerate() {
            tx.execute(
                "INSERT INTO board_columns (key, title, position) VALUES (?, ?, ?)",
                (&column.key, &column.title, column_position as i64),
            )?;

            for (task_position, task) in column.tasks.iter().enumerate() {
                tx.execute(
                    "INSERT INTO board_tasks (id, column_key, position, title, description, assignee, priority)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    (
                        task.id as i64,
                        &column.key,
                        task_position as i64,
                        &task.title,
                        &task.description,
                        &task.assignee,
                        task.priority.as_str(),
                    ),
                )?;
            }
        }

        tx.execute(
            "INSERT INTO board_meta (id, saved_at) VALUES (1, ?)
             ON CONFLICT(id) DO UPDATE SET saved_at = excluded.saved_at",
            [Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// When the board was last saved, if ever.
    pub fn last_saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT saved_at FROM board_meta WHERE id = 1")?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            Ok(Some(parse_datetime(row.get::<_, String>(0)?)))
        } else {
            Ok(None)
        }
    }
}

impl BoardRepository for Database {
    fn load_board(&self) -> Result<Option<Board>> {
        self.get_board()
    }

    fn save_board(&self, board: &Board) -> Result<()> {
        self.put_board(board)
    }
}

fn parse_task_id(id: i64) -> rusqlite::Result<TaskId> {
    TaskId::try_from(id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(e)))
}

fn parse_priority(s: String) -> rusqlite::Result<Priority> {
    Priority::from_str(&s).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("unknown priority '{}'", s).into(),
        )
    })
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
