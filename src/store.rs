//! SQLite-backed store for the task list and expense ledger.
//!
//! Connections are scoped to a single operation: each tool call opens the
//! database, runs its statement(s), and drops the connection. The serve loop
//! handles one call at a time, so there is no concurrent access from this
//! process; `busy_timeout` covers the stray external reader.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};

// AUTOINCREMENT keeps ids monotonic: a deleted task's id is never handed out
// again.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'incomplete',
    created_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);

CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    item TEXT NOT NULL,
    amount REAL NOT NULL,
    recorded_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_expenses_recorded_at ON expenses(recorded_at);
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskStatus {
    Incomplete,
    Complete,
}

impl TaskStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }

    pub(crate) fn from_db_str(s: &str) -> Self {
        match s {
            "complete" => Self::Complete,
            _ => Self::Incomplete,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Task {
    pub(crate) id: i64,
    pub(crate) description: String,
    pub(crate) status: TaskStatus,
}

/// List filter. Anything that is not a known status reads as `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusFilter {
    All,
    Incomplete,
    Complete,
}

impl StatusFilter {
    pub(crate) fn parse(raw: &str) -> StatusFilter {
        match raw.trim() {
            "incomplete" => StatusFilter::Incomplete,
            "complete" => StatusFilter::Complete,
            _ => StatusFilter::All,
        }
    }
}

pub(crate) struct Store {
    path: PathBuf,
}

impl Store {
    pub(crate) fn new(path: &Path) -> Store {
        Store {
            path: path.to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection, String> {
        let conn = Connection::open(&self.path)
            .map_err(|e| format!("open {}: {e}", self.path.display()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| format!("pragmas: {e}"))?;
        Ok(conn)
    }

    /// Create the collections if absent. Safe to run on every start; never
    /// drops or alters existing data.
    pub(crate) fn ensure_schema(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("create {}: {e}", parent.display()))?;
            }
        }
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| format!("schema: {e}"))
    }

    // ── Tasks ───────────────────────────────────────────────────────

    pub(crate) fn add_task(&self, description: &str) -> Result<i64, String> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO tasks (description, status) VALUES (?1, 'incomplete')",
            params![description],
        )
        .map_err(|e| format!("insert task: {e}"))?;
        Ok(conn.last_insert_rowid())
    }

    pub(crate) fn list_tasks(&self, filter: StatusFilter) -> Result<Vec<Task>, String> {
        let conn = self.connect()?;
        let mut tasks = Vec::new();
        match filter {
            StatusFilter::All => {
                let mut stmt = conn
                    .prepare("SELECT id, description, status FROM tasks ORDER BY id ASC")
                    .map_err(|e| format!("list tasks: {e}"))?;
                let rows = stmt
                    .query_map([], row_to_task)
                    .map_err(|e| format!("list tasks: {e}"))?;
                for row in rows {
                    tasks.push(row.map_err(|e| format!("list tasks: {e}"))?);
                }
            }
            StatusFilter::Incomplete | StatusFilter::Complete => {
                let status = match filter {
                    StatusFilter::Complete => TaskStatus::Complete,
                    _ => TaskStatus::Incomplete,
                };
                let mut stmt = conn
                    .prepare(
                        "SELECT id, description, status FROM tasks
                         WHERE status = ?1 ORDER BY id ASC",
                    )
                    .map_err(|e| format!("list tasks: {e}"))?;
                let rows = stmt
                    .query_map(params![status.as_str()], row_to_task)
                    .map_err(|e| format!("list tasks: {e}"))?;
                for row in rows {
                    tasks.push(row.map_err(|e| format!("list tasks: {e}"))?);
                }
            }
        }
        Ok(tasks)
    }

    /// Returns false when no row matched; a missing id is a normal outcome,
    /// not an error.
    pub(crate) fn complete_task(&self, id: i64) -> Result<bool, String> {
        let conn = self.connect()?;
        let changed = conn
            .execute(
                "UPDATE tasks SET status = 'complete' WHERE id = ?1",
                params![id],
            )
            .map_err(|e| format!("complete task: {e}"))?;
        Ok(changed > 0)
    }

    pub(crate) fn delete_task(&self, id: i64) -> Result<bool, String> {
        let conn = self.connect()?;
        let changed = conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(|e| format!("delete task: {e}"))?;
        Ok(changed > 0)
    }

    // ── Expenses (append-only) ──────────────────────────────────────

    pub(crate) fn log_expense(
        &self,
        item: &str,
        amount: f64,
        recorded_at: i64,
    ) -> Result<i64, String> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO expenses (item, amount, recorded_at) VALUES (?1, ?2, ?3)",
            params![item, amount, recorded_at],
        )
        .map_err(|e| format!("insert expense: {e}"))?;
        Ok(conn.last_insert_rowid())
    }

    /// SUM(amount) over rows with recorded_at >= since. None when no rows
    /// matched (SQL NULL sum), which callers render as "nothing today".
    pub(crate) fn sum_expenses_since(&self, since: i64) -> Result<Option<f64>, String> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT SUM(amount) FROM expenses WHERE recorded_at >= ?1",
            params![since],
            |row| row.get::<_, Option<f64>>(0),
        )
        .map_err(|e| format!("sum expenses: {e}"))
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        description: row.get(1)?,
        status: TaskStatus::from_db_str(&row.get::<_, String>(2)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> Store {
        let dir = std::env::temp_dir().join("biseo_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("test_{}_{name}.sqlite", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let store = Store::new(&path);
        store.ensure_schema().unwrap();
        store
    }

    fn cleanup(store: &Store) {
        std::fs::remove_file(&store.path).ok();
    }

    #[test]
    fn test_schema_idempotent() {
        let store = temp_store("schema");
        store.add_task("existing row").unwrap();
        // Re-running schema creation must not touch existing data.
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
        let tasks = store.list_tasks(StatusFilter::All).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description, "existing row");
        cleanup(&store);
    }

    #[test]
    fn test_add_and_list() {
        let store = temp_store("add_list");
        store.add_task("first").unwrap();
        store.add_task("second").unwrap();
        let tasks = store.list_tasks(StatusFilter::All).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].id < tasks[1].id);
        assert_eq!(tasks[0].description, "first");
        assert_eq!(tasks[0].status, TaskStatus::Incomplete);
        cleanup(&store);
    }

    #[test]
    fn test_status_filters() {
        let store = temp_store("filters");
        let id = store.add_task("done soon").unwrap();
        store.add_task("still open").unwrap();
        assert!(store.complete_task(id).unwrap());

        let complete = store.list_tasks(StatusFilter::Complete).unwrap();
        assert_eq!(complete.len(), 1);
        assert_eq!(complete[0].id, id);
        assert_eq!(complete[0].status, TaskStatus::Complete);

        let incomplete = store.list_tasks(StatusFilter::Incomplete).unwrap();
        assert_eq!(incomplete.len(), 1);
        assert_eq!(incomplete[0].description, "still open");
        cleanup(&store);
    }

    #[test]
    fn test_complete_is_repeatable() {
        let store = temp_store("complete_twice");
        let id = store.add_task("task").unwrap();
        assert!(store.complete_task(id).unwrap());
        // The row still exists, so a second completion matches it again.
        assert!(store.complete_task(id).unwrap());
        let tasks = store.list_tasks(StatusFilter::Complete).unwrap();
        assert_eq!(tasks.len(), 1);
        cleanup(&store);
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let store = temp_store("missing");
        assert!(!store.complete_task(999).unwrap());
        assert!(!store.delete_task(999).unwrap());
        cleanup(&store);
    }

    #[test]
    fn test_ids_never_reused() {
        let store = temp_store("id_reuse");
        let first = store.add_task("a").unwrap();
        let second = store.add_task("b").unwrap();
        assert!(store.delete_task(second).unwrap());
        let third = store.add_task("c").unwrap();
        assert!(third > second);
        assert!(second > first);
        cleanup(&store);
    }

    #[test]
    fn test_expense_window_sum() {
        let store = temp_store("expenses");
        assert_eq!(store.sum_expenses_since(0).unwrap(), None);

        let midnight = 1_700_000_000;
        store.log_expense("coffee", 1000.0, midnight + 60).unwrap();
        store.log_expense("lunch", 2000.0, midnight + 120).unwrap();
        store.log_expense("yesterday", 5000.0, midnight - 60).unwrap();

        let total = store.sum_expenses_since(midnight).unwrap();
        assert_eq!(total, Some(3000.0));
        cleanup(&store);
    }
}
