//! Announcement storage for celldb
//!
//! The first concrete consumer of the store layer: two append stores
//! (pending and enacted) plus the reconciliation logic that keeps them
//! windowed, deduplicated, and summarized into a sync watermark.

mod ledger;
mod model;

pub use ledger::AnnouncementLedger;
pub use model::{Announcement, Origin};

/// Storage key of the pending collection.
pub const PENDING_KEY: &str = "freeaps/announcements.json";

/// Storage key of the enacted collection.
pub const ENACTED_KEY: &str = "freeaps/announcements_enacted.json";
