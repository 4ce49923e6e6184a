//! List Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for List CRUD operations.
//! Position management is in list_positioning.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainResult, List, ListId, UserId};
use super::super::db::{from_millis, not_initialized, to_millis, SharedConnection};
use super::super::scoped_table::ScopedTable;
use super::super::traits::Repository;

const LIST_COLUMNS: &str =
    "id, user_id, title, color, position, is_reminded, reminder_at, created_at, updated_at";

pub(super) const LISTS: ScopedTable = ScopedTable {
    table: "lists",
    scope_column: "user_id",
    label: "List",
};

/// SQLite implementation of List repository
pub struct ListRepository {
    pub(super) conn: SharedConnection,
}

impl ListRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Whether `list_id` exists and belongs to `user_id`
    pub async fn is_owned_by(&self, user_id: UserId, list_id: ListId) -> DomainResult<bool> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let found: Option<u32> = conn
            .query_row(
                "SELECT id FROM lists WHERE user_id = ? AND id = ?",
                params![user_id, list_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl Repository<List> for ListRepository {
    async fn create(&self, entity: &List) -> DomainResult<List> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute(
            "INSERT INTO lists (user_id, title, color, position, is_reminded, reminder_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entity.user_id,
                entity.title,
                entity.color,
                entity.position,
                entity.is_reminded,
                entity.reminder_at.as_ref().map(to_millis),
                to_millis(&entity.created_at),
                to_millis(&entity.updated_at),
            ],
        )?;

        let mut list = entity.clone();
        list.id = conn.last_insert_rowid() as ListId;
        Ok(list)
    }

    async fn find_by_id(&self, user_id: UserId, id: ListId) -> DomainResult<Option<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM lists WHERE user_id = ? AND id = ?",
            LIST_COLUMNS
        ))?;
        let mut rows = stmt.query(params![user_id, id])?;

        match rows.next()? {
            Some(row) => Ok(Some(row_to_list(row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, user_id: UserId) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        select_lists(conn, user_id)
    }

    async fn update(&self, entity: &List) -> DomainResult<List> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut list = entity.clone();
        list.updated_at = chrono::Utc::now();

        let changed = conn.execute(
            "UPDATE lists SET title = ?, color = ?, is_reminded = ?, reminder_at = ?, updated_at = ?
             WHERE user_id = ? AND id = ?",
            params![
                list.title,
                list.color,
                list.is_reminded,
                list.reminder_at.as_ref().map(to_millis),
                to_millis(&list.updated_at),
                list.user_id,
                list.id,
            ],
        )?;

        if changed == 0 {
            return Err(LISTS.not_found(list.id));
        }
        Ok(list)
    }

    async fn delete(&self, user_id: UserId, id: ListId) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        let tx = conn.transaction()?;

        // Manual cascade; remaining lists keep their positions
        tx.execute(
            "DELETE FROM tasks WHERE list_id IN (SELECT id FROM lists WHERE user_id = ? AND id = ?)",
            params![user_id, id],
        )?;
        let deleted = tx.execute(
            "DELETE FROM lists WHERE user_id = ? AND id = ?",
            params![user_id, id],
        )?;

        if deleted == 0 {
            return Err(LISTS.not_found(id));
        }
        tx.commit()?;
        Ok(())
    }
}

pub(super) fn select_lists(conn: &rusqlite::Connection, user_id: UserId) -> DomainResult<Vec<List>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM lists WHERE user_id = ? {}",
        LIST_COLUMNS,
        LISTS.order_clause()
    ))?;
    let mut rows = stmt.query(params![user_id])?;

    let mut lists = Vec::new();
    while let Some(row) = rows.next()? {
        lists.push(row_to_list(row)?);
    }
    Ok(lists)
}

/// Convert a database row to List
fn row_to_list(row: &rusqlite::Row) -> DomainResult<List> {
    Ok(List {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        color: row.get(3)?,
        position: row.get(4)?,
        is_reminded: row.get(5)?,
        reminder_at: row.get::<_, Option<i64>>(6)?.map(from_millis),
        created_at: from_millis(row.get(7)?),
        updated_at: from_millis(row.get(8)?),
    })
}
