//! # Per-Key Cache Slot
//!
//! One slot exists per storage key, shared by every store handle opened for
//! that key, and its mutex is the key's serialization point: whoever holds it
//! owns the key for the full extent of a read-modify-write.

use std::sync::Arc;

use parking_lot::Mutex;

/// Memo of the last raw payload seen for a key.
///
/// `synchronized` is false until the first successful read or write. After
/// that, reads are served from `raw` until the next write or remove.
#[derive(Debug, Default)]
pub struct CacheSlot {
    pub synchronized: bool,
    pub raw: Option<Vec<u8>>,
}

impl CacheSlot {
    /// Remember `raw` as the current persisted payload.
    pub fn fill(&mut self, raw: Option<Vec<u8>>) {
        self.raw = raw;
        self.synchronized = true;
    }

    /// Forget everything; the next read goes back to the medium.
    pub fn invalidate(&mut self) {
        self.raw = None;
        self.synchronized = false;
    }
}

/// Shared handle to a key's slot.
pub type SharedSlot = Arc<Mutex<CacheSlot>>;

/// A fresh, unsynchronized slot.
pub fn new_slot() -> SharedSlot {
    Arc::new(Mutex::new(CacheSlot::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_unsynchronized() {
        let slot = CacheSlot::default();
        assert!(!slot.synchronized);
        assert!(slot.raw.is_none());
    }

    #[test]
    fn test_fill_and_invalidate() {
        let mut slot = CacheSlot::default();

        slot.fill(Some(b"{}".to_vec()));
        assert!(slot.synchronized);
        assert_eq!(slot.raw.as_deref(), Some(&b"{}"[..]));

        slot.invalidate();
        assert!(!slot.synchronized);
        assert!(slot.raw.is_none());
    }

    #[test]
    fn test_fill_absent_is_still_synchronized() {
        // Knowing a key is empty is cacheable knowledge.
        let mut slot = CacheSlot::default();
        slot.fill(None);
        assert!(slot.synchronized);
        assert!(slot.raw.is_none());
    }
}
