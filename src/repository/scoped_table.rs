//! Scoped Position Columns
//!
//! SQL shared by every table holding `(scope, id, position)` rows.
//! Lists are scoped by `user_id`, tasks by `list_id`.

use rusqlite::{params, Connection};

use crate::domain::{DomainError, DomainResult, Position, PositionUpdate};

/// A table whose `position` column is ordered per `scope_column`
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScopedTable {
    pub table: &'static str,
    pub scope_column: &'static str,
    /// Entity name used in error messages
    pub label: &'static str,
}

impl ScopedTable {
    /// `ORDER BY` clause giving display order with insertion order as tiebreak
    pub fn order_clause(&self) -> &'static str {
        "ORDER BY position ASC, id ASC"
    }

    pub fn max_position(&self, conn: &Connection, scope: u32) -> DomainResult<Position> {
        let sql = format!(
            "SELECT COALESCE(MAX(position), 0) FROM {} WHERE {} = ?",
            self.table, self.scope_column
        );
        Ok(conn.query_row(&sql, params![scope], |row| row.get(0))?)
    }

    pub fn update_position(&self, conn: &Connection, scope: u32, id: u32, position: Position) -> DomainResult<()> {
        let sql = format!(
            "UPDATE {} SET position = ?, updated_at = ? WHERE {} = ? AND id = ?",
            self.table, self.scope_column
        );
        let changed = conn.execute(
            &sql,
            params![position, chrono::Utc::now().timestamp_millis(), scope, id],
        )?;

        if changed == 0 {
            return Err(self.not_found(id));
        }
        Ok(())
    }

    /// Write every update in one transaction; any failure rolls all back
    pub fn apply_positions(&self, conn: &mut Connection, scope: u32, updates: &[PositionUpdate<u32>]) -> DomainResult<()> {
        let tx = conn.transaction()?;
        for update in updates {
            self.update_position(&tx, scope, update.id, update.position)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn not_found(&self, id: u32) -> DomainError {
        DomainError::NotFound(format!("{} {} not found", self.label, id))
    }
}
