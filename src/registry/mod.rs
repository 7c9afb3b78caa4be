//! Storage registry for celldb
//!
//! The registry owns every store: it holds the medium, the bundled-default
//! source, and one cache slot per literal key, shared by all handles opened
//! for that key. On top of the per-key locks it adds a registry-wide
//! transaction lock for read-modify-write sequences spanning several stores.
//!
//! Lock order is strict and one-way: the transaction lock is only ever taken
//! first, slot locks are only ever taken inside individual store operations,
//! and no store operation takes the transaction lock. That rules out the
//! transaction-inside-store / store-inside-transaction deadlock by
//! construction.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, JsonCodec};
use crate::medium::{DefaultSource, Medium, NoDefaults};
use crate::store::{new_slot, SharedSlot};
use crate::store::{AppendStore, EntityStore, FallbackStore, StoreError, StoreResult};

/// Aggregate owner of all stores.
pub struct Registry {
    medium: Arc<dyn Medium>,
    defaults: Arc<dyn DefaultSource>,
    slots: Mutex<HashMap<String, SharedSlot>>,
    transaction_lock: Mutex<()>,
}

impl Registry {
    /// A registry with no bundled defaults.
    pub fn new(medium: Arc<dyn Medium>) -> Self {
        Self::with_defaults(medium, Arc::new(NoDefaults))
    }

    /// A registry whose bundled-default-enabled stores consult `defaults`
    /// on first miss.
    pub fn with_defaults(medium: Arc<dyn Medium>, defaults: Arc<dyn DefaultSource>) -> Self {
        Self {
            medium,
            defaults,
            slots: Mutex::new(HashMap::new()),
            transaction_lock: Mutex::new(()),
        }
    }

    /// The slot for `key`, created on first use. Keyed by the literal key,
    /// so distinct keys can never collide on one lock.
    fn slot(&self, key: &str) -> SharedSlot {
        let mut slots = self.slots.lock();
        slots.entry(key.to_string()).or_insert_with(new_slot).clone()
    }

    /// Open a plain entity store for `key`.
    pub fn entity<T, C: Codec<T>>(&self, key: &str, codec: C) -> EntityStore<T, C> {
        EntityStore::new(
            key.to_string(),
            codec,
            self.medium.clone(),
            None,
            self.slot(key),
        )
    }

    /// Open an entity store that loads the bundled default on first miss.
    pub fn entity_with_bundled<T, C: Codec<T>>(&self, key: &str, codec: C) -> EntityStore<T, C> {
        EntityStore::new(
            key.to_string(),
            codec,
            self.medium.clone(),
            Some(self.defaults.clone()),
            self.slot(key),
        )
    }

    /// Open an entity store decorated with a caller-supplied fallback.
    pub fn fallback<T, C, F>(&self, key: &str, codec: C, fallback: F) -> FallbackStore<T, C>
    where
        C: Codec<T>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        FallbackStore::new(self.entity(key, codec), Box::new(fallback))
    }

    /// Open a fallback-decorated store that also loads the bundled default
    /// on first miss. The common shape for settings keys: bundled payload
    /// first, stored value once one exists, caller fallback when neither
    /// decodes.
    pub fn fallback_with_bundled<T, C, F>(&self, key: &str, codec: C, fallback: F) -> FallbackStore<T, C>
    where
        C: Codec<T>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        FallbackStore::new(self.entity_with_bundled(key, codec), Box::new(fallback))
    }

    /// Open a JSON-backed append store for `key`.
    pub fn append<T>(&self, key: &str) -> AppendStore<T>
    where
        T: Serialize + DeserializeOwned,
    {
        AppendStore::new(self.entity(key, JsonCodec::new()))
    }

    /// Run `body` holding the registry-wide transaction lock.
    ///
    /// The body receives a [`Transaction`] handle whose operations never
    /// re-acquire the transaction lock, so nesting a rename (or any store
    /// opening) inside a transaction cannot self-deadlock. Store operations
    /// inside `body` still take their own slot locks for the I/O step, but
    /// no other transaction can interleave with the sequence.
    pub fn transaction<R>(&self, body: impl FnOnce(&Transaction<'_>) -> R) -> R {
        let _guard = self.transaction_lock.lock();
        body(&Transaction { registry: self })
    }

    /// Relocate the blob under `key` to `new_key`.
    ///
    /// Runs under the transaction lock and invalidates both affected slots
    /// so neither key replays pre-rename bytes. Inside a transaction body,
    /// use [`Transaction::rename`] instead.
    pub fn rename(&self, key: &str, new_key: &str) -> StoreResult<()> {
        let _guard = self.transaction_lock.lock();
        self.rename_locked(key, new_key)
    }

    /// The rename itself, with the transaction lock already held.
    fn rename_locked(&self, key: &str, new_key: &str) -> StoreResult<()> {
        if key == new_key {
            return Ok(());
        }

        let source = self.slot(key);
        let target = self.slot(new_key);
        let mut source = source.lock();
        let mut target = target.lock();

        self.medium
            .rename(key, new_key)
            .map_err(|e| StoreError::medium(key, e))?;
        source.invalidate();
        target.invalidate();
        Ok(())
    }
}

/// Handle given to a transaction body.
///
/// Forwards the registry's operations without touching the transaction lock
/// the body already holds.
pub struct Transaction<'a> {
    registry: &'a Registry,
}

impl Transaction<'_> {
    pub fn entity<T, C: Codec<T>>(&self, key: &str, codec: C) -> EntityStore<T, C> {
        self.registry.entity(key, codec)
    }

    pub fn entity_with_bundled<T, C: Codec<T>>(&self, key: &str, codec: C) -> EntityStore<T, C> {
        self.registry.entity_with_bundled(key, codec)
    }

    pub fn fallback<T, C, F>(&self, key: &str, codec: C, fallback: F) -> FallbackStore<T, C>
    where
        C: Codec<T>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry.fallback(key, codec, fallback)
    }

    pub fn fallback_with_bundled<T, C, F>(&self, key: &str, codec: C, fallback: F) -> FallbackStore<T, C>
    where
        C: Codec<T>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.registry.fallback_with_bundled(key, codec, fallback)
    }

    pub fn append<T>(&self, key: &str) -> AppendStore<T>
    where
        T: Serialize + DeserializeOwned,
    {
        self.registry.append(key)
    }

    /// As [`Registry::rename`], reusing the transaction lock held by the
    /// enclosing transaction.
    pub fn rename(&self, key: &str, new_key: &str) -> StoreResult<()> {
        self.registry.rename_locked(key, new_key)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.slots.lock().len())
            .finish()
    }
}
