//! Explicit memo keyed on (Address, ContextId).
//!
//! One entry per distinct (address, context) pair. Concurrent callers for the
//! same key share a single in-flight resolution. Failed resolutions leave the
//! entry empty, so the next caller runs the resolution again.

use std::future::Future;
use std::sync::Arc;

use corelib::{Address, ContextId};
use dashmap::DashMap;
use tokio::sync::OnceCell;

/// Memo key: the upstream handle's address and its context generation.
pub type MemoKey = (Address, ContextId);

#[derive(Debug)]
pub struct Memo<V> {
    entries: DashMap<MemoKey, Arc<OnceCell<V>>>,
}

impl<V: Clone> Memo<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn slot(&self, key: MemoKey) -> Arc<OnceCell<V>> {
        // Clone the Arc out so no shard lock is held across an await.
        Arc::clone(&*self.entries.entry(key).or_default())
    }

    /// Return the memoized value for `key`, running `resolve` if there is none.
    pub async fn get_or_try_resolve<F, Fut, E>(&self, key: MemoKey, resolve: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        slot.get_or_try_init(resolve).await.cloned()
    }

    /// Infallible variant of [`Memo::get_or_try_resolve`].
    pub async fn get_or_resolve<F, Fut>(&self, key: MemoKey, resolve: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let slot = self.slot(key);
        slot.get_or_init(resolve).await.clone()
    }

    /// Memoized value for `key`, if resolved.
    pub fn peek(&self, key: &MemoKey) -> Option<V> {
        self.entries
            .get(key)
            .and_then(|slot| slot.get().cloned())
    }

    /// Drop every entry belonging to a context older than `context`.
    pub fn prune_older_than(&self, context: ContextId) {
        self.entries.retain(|(_, ctx), _| *ctx >= context);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for Memo<V> {
    fn default() -> Self {
        Self::new()
    }
}
