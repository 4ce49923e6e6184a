//! List Positioning Operations
//!
//! Lists are ordered per user.

use async_trait::async_trait;

use crate::domain::{DomainResult, List, ListId, Position, PositionUpdate, UserId};
use super::super::db::not_initialized;
use super::super::traits::{PositionStore, Repository};
use super::list_repo::{select_lists, ListRepository, LISTS};

#[async_trait]
impl PositionStore<List> for ListRepository {
    async fn find_all_ordered(&self, user_id: UserId) -> DomainResult<Vec<List>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        select_lists(conn, user_id)
    }

    async fn find_item(&self, user_id: UserId, id: ListId) -> DomainResult<List> {
        self.find_by_id(user_id, id)
            .await?
            .ok_or_else(|| LISTS.not_found(id))
    }

    async fn update_position(&self, user_id: UserId, id: ListId, position: Position) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        LISTS.update_position(conn, user_id, id, position)
    }

    async fn max_position(&self, user_id: UserId) -> DomainResult<Position> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        LISTS.max_position(conn, user_id)
    }

    async fn apply_positions(&self, user_id: UserId, updates: &[PositionUpdate<ListId>]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;
        LISTS.apply_positions(conn, user_id, updates)
    }
}
