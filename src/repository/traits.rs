//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Every entity lives in a scope, so all lookups take the scope key.

use async_trait::async_trait;
use crate::domain::{DomainResult, Position, PositionUpdate, PositionedItem};

/// Core repository trait for CRUD operations
///
/// Generic over any positioned entity type.
/// All operations are async to support various backends.
#[async_trait]
pub trait Repository<T: PositionedItem>: Send + Sync {
    /// Create a new entity; the entity's position is stored as given
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID within its scope
    async fn find_by_id(&self, scope: T::Scope, id: T::Id) -> DomainResult<Option<T>>;

    /// List all entities of a scope in display order
    async fn list(&self, scope: T::Scope) -> DomainResult<Vec<T>>;

    /// Update an existing entity's content fields (not its position)
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID; siblings keep their positions
    async fn delete(&self, scope: T::Scope, id: T::Id) -> DomainResult<()>;
}

/// Persistence contract consumed by the position manager
#[async_trait]
pub trait PositionStore<T: PositionedItem>: Send + Sync {
    /// All items of the scope, ascending by position then insertion order
    async fn find_all_ordered(&self, scope: T::Scope) -> DomainResult<Vec<T>>;

    /// Item by id; `NotFound` if absent or owned by another scope
    async fn find_item(&self, scope: T::Scope, id: T::Id) -> DomainResult<T>;

    async fn update_position(&self, scope: T::Scope, id: T::Id, position: Position) -> DomainResult<()>;

    /// Highest position in the scope, 0 when empty
    async fn max_position(&self, scope: T::Scope) -> DomainResult<Position>;

    /// Write a batch of positions.
    ///
    /// Stops at the first failure and leaves earlier writes in place.
    /// Stores that can do better should write the batch atomically.
    async fn apply_positions(&self, scope: T::Scope, updates: &[PositionUpdate<T::Id>]) -> DomainResult<()> {
        for update in updates {
            self.update_position(scope, update.id, update.position).await?;
        }
        Ok(())
    }
}
