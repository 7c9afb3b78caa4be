//! Store subsystem for celldb
//!
//! One store per key, three shapes composed by decoration rather than
//! inheritance:
//!
//! - [`EntityStore`]: the core cached, serialized, single-key cell
//! - [`FallbackStore`]: supplies a caller default on miss
//! - [`AppendStore`]: list values with merge-on-append variants
//!
//! # Invariants
//!
//! - Operations on the same key never overlap (per-key slot lock)
//! - The cache replays raw bytes between writes; `set` refreshes it,
//!   `remove` invalidates it
//! - A uniqueness-key merge never produces two elements with the same key

mod append;
mod cache;
mod entity;
mod errors;
mod fallback;

pub use append::AppendStore;
pub use entity::EntityStore;
pub use errors::{StoreError, StoreResult};
pub use fallback::FallbackStore;

pub(crate) use cache::{new_slot, SharedSlot};
