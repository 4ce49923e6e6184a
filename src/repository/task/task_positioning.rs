//! Task Positioning Operations
//!
//! Tasks are ordered per list.

use async_trait::async_trait;

use crate::domain::{DomainResult, ListId, Position, PositionUpdate, Task, TaskId};
use super::super::db::not_initialized;
use super::super::traits::{PositionStore, Repository};
use super::task_repo::{select_tasks, TaskRepository, TASKS};

#[async_trait]
impl PositionStore<Task> for TaskRepository {
    async fn find_all_ordered(&self, list_id: ListId) -> DomainResult<Vec<Task>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        select_tasks(conn, list_id)
    }

    async fn find_item(&self, list_id: ListId, id: TaskId) -> DomainResult<Task> {
        self.find_by_id(list_id, id)
            .await?
            .ok_or_else(|| TASKS.not_found(id))
    }

    async fn update_position(&self, list_id: ListId, id: TaskId, position: Position) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        TASKS.update_position(conn, list_id, id, position)
    }

    async fn max_position(&self, list_id: ListId) -> DomainResult<Position> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        TASKS.max_position(conn, list_id)
    }

    async fn apply_positions(&self, list_id: ListId, updates: &[PositionUpdate<TaskId>]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        TASKS.apply_positions(conn, list_id, updates)
    }
}
