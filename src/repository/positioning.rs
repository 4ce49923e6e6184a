//! Position Manager
//!
//! Applies the reindexer to a store: load the scope, compute the moves,
//! write the changed positions back. One manager per scoped collection.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{reposition, DomainResult, Position, PositionedItem};
use super::traits::PositionStore;

/// Per-scope locks serialising repositions of the same scope
pub struct ScopeLocks<S> {
    locks: Mutex<HashMap<S, Arc<Mutex<()>>>>,
}

impl<S: Copy + Eq + Hash> ScopeLocks<S> {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to `scope`
    pub async fn acquire(&self, scope: S) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Drop locks nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(scope).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

impl<S: Copy + Eq + Hash> Default for ScopeLocks<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Repositions items of one kind through a `PositionStore`
pub struct PositionManager<T: PositionedItem> {
    store: Arc<dyn PositionStore<T>>,
    locks: ScopeLocks<T::Scope>,
}

impl<T: PositionedItem> PositionManager<T> {
    pub fn new(store: Arc<dyn PositionStore<T>>) -> Self {
        Self {
            store,
            locks: ScopeLocks::new(),
        }
    }

    /// Move `moving` next to `anchor`: after it when moving forward,
    /// before it when moving backward. The scope ends up numbered `1..=N`.
    pub async fn reposition(&self, scope: T::Scope, moving: T::Id, anchor: T::Id) -> DomainResult<()> {
        let _guard = self.locks.acquire(scope).await;

        // Both must exist before anything is read in bulk
        self.store.find_item(scope, moving).await?;
        self.store.find_item(scope, anchor).await?;

        if moving == anchor {
            return Ok(());
        }

        let items = self.store.find_all_ordered(scope).await?;
        let updates = reposition(&items, moving, anchor)?;

        if updates.is_empty() {
            return Ok(());
        }

        log::debug!(
            "Repositioning {:?} next to {:?} in scope {:?}: {} writes",
            moving,
            anchor,
            scope,
            updates.len()
        );

        self.store.apply_positions(scope, &updates).await.map_err(|e| {
            log::error!("Position writes failed for scope {:?}: {}", scope, e);
            e
        })
    }

    /// Position for an item appended to `scope`.
    ///
    /// Falls back to 1 when the lookup fails and stays at `Position::MAX` when
    /// the scope is already there, so that appending never errors.
    pub async fn next_position(&self, scope: T::Scope) -> Position {
        match self.store.max_position(scope).await {
            Ok(max) => max.checked_add(1).unwrap_or_else(|| {
                log::warn!("Scope {:?} is at the maximum position, appending at {}", scope, max);
                max
            }),
            Err(e) => {
                log::warn!("Max position lookup failed for scope {:?}: {}", scope, e);
                1
            }
        }
    }

    /// Append an item to `scope`.
    ///
    /// `insert` receives the next position and runs under the scope lock, so
    /// concurrent appends and moves in the same scope never share a position.
    pub async fn append<R, F, Fut>(&self, scope: T::Scope, insert: F) -> DomainResult<R>
    where
        F: FnOnce(Position) -> Fut,
        Fut: Future<Output = DomainResult<R>>,
    {
        let _guard = self.locks.acquire(scope).await;
        let position = self.next_position(scope).await;
        insert(position).await
    }
}
