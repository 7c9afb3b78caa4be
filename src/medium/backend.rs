//! # Persistent Medium Trait

use super::errors::MediumResult;

/// An opaque key -> blob store.
///
/// Each operation is individually atomic: a reader never observes a partial
/// blob. Within one process, `save` followed by `retrieve` on the same key
/// observes the just-written bytes.
pub trait Medium: Send + Sync + std::fmt::Debug {
    /// Read the blob stored under `key`. An absent key is `Ok(None)`.
    fn retrieve(&self, key: &str) -> MediumResult<Option<Vec<u8>>>;

    /// Write `bytes` under `key`, replacing any previous blob.
    fn save(&self, key: &str, bytes: &[u8]) -> MediumResult<()>;

    /// Delete the blob under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> MediumResult<()>;

    /// Relocate the blob under `key` to `new_key`, replacing any blob there.
    fn rename(&self, key: &str, new_key: &str) -> MediumResult<()>;
}
