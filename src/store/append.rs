//! # Append Store
//!
//! An entity store specialized to list values, adding plain append and two
//! uniqueness-key merge variants. Every append is a full read-modify-write
//! under the key's slot lock, so concurrent appends never lose elements.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::codec::{Codec, JsonCodec};

use super::cache::CacheSlot;
use super::entity::EntityStore;
use super::errors::StoreResult;

/// Entity store over `Vec<T>` with merge-on-append operations.
pub struct AppendStore<T> {
    inner: EntityStore<Vec<T>, JsonCodec<Vec<T>>>,
    list_codec: JsonCodec<Vec<T>>,
    item_codec: JsonCodec<T>,
}

impl<T> AppendStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(inner: EntityStore<Vec<T>, JsonCodec<Vec<T>>>) -> Self {
        Self {
            inner,
            list_codec: JsonCodec::new(),
            item_codec: JsonCodec::new(),
        }
    }

    pub fn key(&self) -> &str {
        self.inner.key()
    }

    /// The stored list, or `None` when nothing usable is stored.
    ///
    /// A payload holding a single item rather than a list is served as a
    /// one-element list; the blob itself stays untouched until the next
    /// write. Some keys predate the list layout.
    pub fn get(&self) -> Option<Vec<T>> {
        self.inner.with_slot(|slot| self.list_locked(slot))
    }

    /// As [`get`](Self::get), mapping absence to an empty list.
    pub fn get_or_empty(&self) -> Vec<T> {
        self.get().unwrap_or_default()
    }

    /// Replace the full list contents.
    pub fn set(&self, items: Vec<T>) -> StoreResult<()> {
        self.inner.set(&items)
    }

    pub fn remove(&self) -> StoreResult<()> {
        self.inner.remove()
    }

    /// Append one item and return the resulting list.
    pub fn append(&self, item: T) -> StoreResult<Vec<T>> {
        self.inner.with_slot(|slot| {
            let mut items = self.list_locked(slot).unwrap_or_default();
            items.push(item);
            self.inner.set_locked(slot, &items)?;
            Ok(items)
        })
    }

    /// Bulk plain append, no deduplication.
    pub fn append_all(&self, new_items: Vec<T>) -> StoreResult<Vec<T>> {
        self.inner.with_slot(|slot| {
            let mut items = self.list_locked(slot).unwrap_or_default();
            items.extend(new_items);
            self.inner.set_locked(slot, &items)?;
            Ok(items)
        })
    }

    /// Append `item` unless an element already shares its derived key.
    ///
    /// On a match the existing element wins and storage is left untouched.
    pub fn append_unique<K, F>(&self, item: T, key_of: F) -> StoreResult<Vec<T>>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        self.inner.with_slot(|slot| {
            let mut items = self.list_locked(slot).unwrap_or_default();
            let key = key_of(&item);
            if items.iter().any(|existing| key_of(existing) == key) {
                return Ok(items);
            }
            items.push(item);
            self.inner.set_locked(slot, &items)?;
            Ok(items)
        })
    }

    /// Per-item upsert: a matching element is replaced by the incoming one,
    /// the rest are appended.
    ///
    /// Deliberately asymmetric with [`append_unique`](Self::append_unique),
    /// which keeps the existing element. Both behaviors have callers.
    pub fn merge_unique<K, F>(&self, new_items: Vec<T>, key_of: F) -> StoreResult<Vec<T>>
    where
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        self.inner.with_slot(|slot| {
            let mut items = self.list_locked(slot).unwrap_or_default();
            for item in new_items {
                let key = key_of(&item);
                match items.iter().position(|existing| key_of(existing) == key) {
                    Some(index) => items[index] = item,
                    None => items.push(item),
                }
            }
            self.inner.set_locked(slot, &items)?;
            Ok(items)
        })
    }

    fn list_locked(&self, slot: &mut CacheSlot) -> Option<Vec<T>> {
        let raw = self.inner.raw_locked(slot)?;
        if let Ok(list) = self.list_codec.decode(&raw) {
            return Some(list);
        }
        match self.item_codec.decode(&raw) {
            Ok(item) => Some(vec![item]),
            Err(err) => {
                warn!(
                    key = %self.inner.key(),
                    error = %err,
                    "stored payload is neither a list nor a single entry"
                );
                None
            }
        }
    }
}
