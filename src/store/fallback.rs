//! # Fallback Store

use crate::codec::Codec;

use super::entity::EntityStore;
use super::errors::StoreResult;

/// Decorator that supplies a caller-provided default when the cell is empty.
///
/// Distinct from bundled defaults: a bundled payload is treated as persisted
/// bytes and cached, while this fallback is produced fresh on every miss and
/// never enters the cache.
pub struct FallbackStore<T, C> {
    inner: EntityStore<T, C>,
    fallback: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T, C: Codec<T>> FallbackStore<T, C> {
    pub(crate) fn new(
        inner: EntityStore<T, C>,
        fallback: Box<dyn Fn() -> T + Send + Sync>,
    ) -> Self {
        Self { inner, fallback }
    }

    pub fn key(&self) -> &str {
        self.inner.key()
    }

    /// The stored value, or the fallback when nothing usable is stored.
    pub fn get_or_default(&self) -> T {
        self.inner.get().unwrap_or_else(|| (self.fallback)())
    }

    pub fn get(&self) -> Option<T> {
        self.inner.get()
    }

    pub fn set(&self, value: &T) -> StoreResult<()> {
        self.inner.set(value)
    }

    pub fn remove(&self) -> StoreResult<()> {
        self.inner.remove()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::codec::JsonCodec;
    use crate::medium::{LocalMedium, StaticDefaults};
    use crate::registry::Registry;
    use tempfile::TempDir;

    #[test]
    fn test_fallback_on_miss_and_stored_value_wins() {
        let temp = TempDir::new().unwrap();
        let registry = Registry::new(Arc::new(LocalMedium::new(temp.path().to_path_buf())));
        let store = registry.fallback("settings/basal.json", JsonCodec::new(), Vec::<u32>::new);

        assert_eq!(store.get(), None);
        assert_eq!(store.get_or_default(), Vec::<u32>::new());

        store.set(&vec![40, 35]).unwrap();
        assert_eq!(store.get_or_default(), vec![40, 35]);
    }

    #[test]
    fn test_fallback_with_bundled_prefers_bundled_payload() {
        let temp = TempDir::new().unwrap();
        let medium = Arc::new(LocalMedium::new(temp.path().to_path_buf()));
        let defaults = StaticDefaults::new().with("settings/model.json", "\"722\"");
        let registry = Registry::with_defaults(medium, Arc::new(defaults));

        let bundled = registry.fallback_with_bundled("settings/model.json", JsonCodec::new(), || {
            "unset".to_string()
        });
        assert_eq!(bundled.get_or_default(), "722");

        // A key the bundle does not carry still falls through to the closure.
        let bare = registry.fallback_with_bundled("settings/other.json", JsonCodec::new(), || {
            "unset".to_string()
        });
        assert_eq!(bare.get_or_default(), "unset");
    }
}
