//! celldb - a cached, concurrency-safe, file-backed typed entity store
//!
//! Values live one-per-key as opaque blobs on a persistent medium, pass
//! through a codec on the way in and out, and are memoized per key. Every
//! operation on a given key is serialized through that key's lock; the
//! registry owns all stores and adds cross-store transactions on top.

pub mod announcements;
pub mod clock;
pub mod codec;
pub mod medium;
pub mod registry;
pub mod store;

pub use announcements::{Announcement, AnnouncementLedger, Origin};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{Codec, CodecError, DateCodec, JsonCodec, TextCodec};
pub use medium::{DefaultSource, LocalMedium, Medium, MediumError, NoDefaults, StaticDefaults};
pub use registry::{Registry, Transaction};
pub use store::{AppendStore, EntityStore, FallbackStore, StoreError, StoreResult};
