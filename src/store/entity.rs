//! # Entity Store
//!
//! A single-key, single-type cell over the medium: cached, serialized through
//! the key's slot lock, and optionally backed by a bundled default payload.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::warn;

use crate::codec::Codec;
use crate::medium::{DefaultSource, Medium};

use super::cache::{CacheSlot, SharedSlot};
use super::errors::{StoreError, StoreResult};

/// Typed, cached, persistent key/value cell.
///
/// Handles are cheap to open through the registry; every handle for the same
/// key shares one cache slot, so caching and mutual exclusion are per key,
/// not per handle.
pub struct EntityStore<T, C> {
    key: String,
    codec: C,
    medium: Arc<dyn Medium>,
    defaults: Option<Arc<dyn DefaultSource>>,
    slot: SharedSlot,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C: Codec<T>> EntityStore<T, C> {
    pub(crate) fn new(
        key: String,
        codec: C,
        medium: Arc<dyn Medium>,
        defaults: Option<Arc<dyn DefaultSource>>,
        slot: SharedSlot,
    ) -> Self {
        Self {
            key,
            codec,
            medium,
            defaults,
            slot,
            _marker: PhantomData,
        }
    }

    /// The storage key this store is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The cached decoded value, or a fresh read from the medium.
    ///
    /// Absence, a malformed payload, and a failed read all come back as
    /// `None`; the failures are logged. A failed read does not poison the
    /// cache: the next call retries the medium.
    pub fn get(&self) -> Option<T> {
        let mut slot = self.slot.lock();
        let raw = self.raw_locked(&mut slot)?;
        self.decode_logged(&raw)
    }

    /// As [`get`](Self::get), but failures keep their shape: absence is
    /// [`StoreError::MissingValue`], a payload the codec rejects is
    /// [`StoreError::Decode`].
    pub fn get_or_fail(&self) -> StoreResult<T> {
        let mut slot = self.slot.lock();
        match self.raw_locked(&mut slot) {
            None => Err(StoreError::missing(&self.key)),
            Some(raw) => self
                .codec
                .decode(&raw)
                .map_err(|e| StoreError::decode(&self.key, e)),
        }
    }

    /// Encode and persist `value`, then update the cache to the new bytes.
    ///
    /// On a medium failure the cache is left untouched, so a later `get`
    /// cannot claim the unwritten value was persisted.
    pub fn set(&self, value: &T) -> StoreResult<()> {
        let bytes = self
            .codec
            .encode(value)
            .map_err(|e| StoreError::encode(&self.key, e))?;
        let mut slot = self.slot.lock();
        self.write_locked(&mut slot, bytes)
    }

    /// Delete the persisted blob and invalidate the cache.
    pub fn remove(&self) -> StoreResult<()> {
        let mut slot = self.slot.lock();
        self.medium
            .remove(&self.key)
            .map_err(|e| StoreError::medium(&self.key, e))?;
        slot.invalidate();
        Ok(())
    }

    /// Run `body` with this key's slot lock held.
    pub(crate) fn with_slot<R>(&self, body: impl FnOnce(&mut CacheSlot) -> R) -> R {
        let mut slot = self.slot.lock();
        body(&mut slot)
    }

    /// Current raw payload, reading the medium (then the bundled defaults)
    /// only when the slot is not synchronized.
    pub(crate) fn raw_locked(&self, slot: &mut CacheSlot) -> Option<Vec<u8>> {
        if slot.synchronized {
            return slot.raw.clone();
        }

        let from_medium = match self.medium.retrieve(&self.key) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key = %self.key, error = %err, "read failed, treating value as absent");
                return None;
            }
        };

        // A bundled default is remembered as if it were persisted, but is
        // never written back.
        let raw = from_medium.or_else(|| {
            self.defaults
                .as_ref()
                .and_then(|source| source.default_for(&self.key))
        });
        slot.fill(raw.clone());
        raw
    }

    /// Encode and persist with the slot lock already held.
    pub(crate) fn set_locked(&self, slot: &mut CacheSlot, value: &T) -> StoreResult<()> {
        let bytes = self
            .codec
            .encode(value)
            .map_err(|e| StoreError::encode(&self.key, e))?;
        self.write_locked(slot, bytes)
    }

    fn write_locked(&self, slot: &mut CacheSlot, bytes: Vec<u8>) -> StoreResult<()> {
        self.medium
            .save(&self.key, &bytes)
            .map_err(|e| StoreError::medium(&self.key, e))?;
        slot.fill(Some(bytes));
        Ok(())
    }

    /// Decode, logging (not surfacing) codec rejections.
    pub(crate) fn decode_logged(&self, raw: &[u8]) -> Option<T> {
        match self.codec.decode(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored payload failed to decode");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::medium::{LocalMedium, StaticDefaults};
    use crate::registry::Registry;
    use tempfile::TempDir;

    fn registry(temp: &TempDir) -> Registry {
        Registry::new(Arc::new(LocalMedium::new(temp.path().to_path_buf())))
    }

    #[test]
    fn test_get_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let store = registry(&temp).entity::<u32, _>("monitor/battery.json", JsonCodec::new());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_set_then_get() {
        let temp = TempDir::new().unwrap();
        let store = registry(&temp).entity("monitor/battery.json", JsonCodec::new());

        store.set(&87u32).unwrap();
        assert_eq!(store.get(), Some(87));
    }

    #[test]
    fn test_get_or_fail_missing() {
        let temp = TempDir::new().unwrap();
        let store = registry(&temp).entity::<u32, _>("monitor/battery.json", JsonCodec::new());

        let err = store.get_or_fail().unwrap_err();
        assert!(matches!(err, StoreError::MissingValue(key) if key == "monitor/battery.json"));
    }

    #[test]
    fn test_get_or_fail_malformed_payload_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);
        std::fs::create_dir_all(temp.path().join("monitor")).unwrap();
        std::fs::write(temp.path().join("monitor/battery.json"), b"not json").unwrap();

        let store = registry.entity::<u32, _>("monitor/battery.json", JsonCodec::new());
        let err = store.get_or_fail().unwrap_err();
        assert!(matches!(err, StoreError::Decode { key, .. } if key == "monitor/battery.json"));
    }

    #[test]
    fn test_malformed_payload_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);
        std::fs::create_dir_all(temp.path().join("monitor")).unwrap();
        std::fs::write(temp.path().join("monitor/battery.json"), b"not json").unwrap();

        let store = registry.entity::<u32, _>("monitor/battery.json", JsonCodec::new());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_remove_then_get_is_none() {
        let temp = TempDir::new().unwrap();
        let store = registry(&temp).entity("monitor/battery.json", JsonCodec::new());

        store.set(&87u32).unwrap();
        store.remove().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_bundled_default_served_on_miss() {
        let temp = TempDir::new().unwrap();
        let medium = Arc::new(LocalMedium::new(temp.path().to_path_buf()));
        let defaults = StaticDefaults::new().with("settings/model.json", "\"722\"");
        let registry = Registry::with_defaults(medium, Arc::new(defaults));

        let store =
            registry.entity_with_bundled::<String, _>("settings/model.json", JsonCodec::new());
        assert_eq!(store.get(), Some("722".to_string()));

        // The default is cached, never persisted.
        assert!(!temp.path().join("settings/model.json").exists());
    }

    #[test]
    fn test_handles_share_one_cache() {
        let temp = TempDir::new().unwrap();
        let registry = registry(&temp);

        let a = registry.entity("monitor/battery.json", JsonCodec::new());
        let b = registry.entity::<u32, _>("monitor/battery.json", JsonCodec::new());

        a.set(&55u32).unwrap();
        std::fs::remove_file(temp.path().join("monitor/battery.json")).unwrap();

        // b reads a's cached bytes, not the (now deleted) file.
        assert_eq!(b.get(), Some(55));
    }
}
