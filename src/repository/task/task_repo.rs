//! Task Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Task CRUD operations.

use async_trait::async_trait;
use rusqlite::params;

use crate::domain::{DomainResult, ListId, Task, TaskId};
use super::super::db::{from_millis, not_initialized, to_millis, SharedConnection};
use super::super::scoped_table::ScopedTable;
use super::super::traits::Repository;

const TASK_COLUMNS: &str =
    "id, list_id, description, position, is_completed, completed_at, created_at, updated_at";

pub(super) const TASKS: ScopedTable = ScopedTable {
    table: "tasks",
    scope_column: "list_id",
    label: "Task",
};

/// SQLite implementation of Task repository
pub struct TaskRepository {
    pub(super) conn: SharedConnection,
}

impl TaskRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Task> for TaskRepository {
    async fn create(&self, entity: &Task) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO tasks (list_id, description, position, is_completed, completed_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.list_id,
                entity.description,
                entity.position,
                entity.is_completed,
                entity.completed_at.as_ref().map(to_millis),
                to_millis(&entity.created_at),
                to_millis(&entity.updated_at),
            ],
        )?;

        let mut task = entity.clone();
        task.id = conn.last_insert_rowid() as TaskId;
        Ok(task)
    }

    async fn find_by_id(&self, list_id: ListId, id: TaskId) -> DomainResult<Option<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE list_id = ? AND id = ?",
            TASK_COLUMNS
        ))?;
        let mut rows = stmt.query(params![list_id, id])?;

        match rows.next()? {
            Some(row) => Ok(Some(row_to_task(row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, list_id: ListId) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        select_tasks(conn, list_id)
    }

    async fn update(&self, entity: &Task) -> DomainResult<Task> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut task = entity.clone();
        task.updated_at = chrono::Utc::now();

        let changed = conn.execute(
            "UPDATE tasks SET description = ?, is_completed = ?, completed_at = ?, updated_at = ?
             WHERE list_id = ? AND id = ?",
            params![
                task.description,
                task.is_completed,
                task.completed_at.as_ref().map(to_millis),
                to_millis(&task.updated_at),
                task.list_id,
                task.id,
            ],
        )?;

        if changed == 0 {
            return Err(TASKS.not_found(task.id));
        }
        Ok(task)
    }

    async fn delete(&self, list_id: ListId, id: TaskId) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let deleted = conn.execute(
            "DELETE FROM tasks WHERE list_id = ? AND id = ?",
            params![list_id, id],
        )?;

        if deleted == 0 {
            return Err(TASKS.not_found(id));
        }
        Ok(())
    }
}

pub(super) fn select_tasks(conn: &rusqlite::Connection, list_id: ListId) -> DomainResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM tasks WHERE list_id = ? {}",
        TASK_COLUMNS,
        TASKS.order_clause()
    ))?;
    let mut rows = stmt.query(params![list_id])?;

    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(row_to_task(row)?);
    }
    Ok(tasks)
}

/// Convert a database row to Task
fn row_to_task(row: &rusqlite::Row) -> DomainResult<Task> {
    Ok(Task {
        id: row.get(0)?,
        list_id: row.get(1)?,
        description: row.get(2)?,
        position: row.get(3)?,
        is_completed: row.get(4)?,
        completed_at: row.get::<_, Option<i64>>(5)?.map(from_millis),
        created_at: from_millis(row.get(6)?),
        updated_at: from_millis(row.get(7)?),
    })
}
