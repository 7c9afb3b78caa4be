//! # Announcement Ledger
//!
//! Reconciles the pending and enacted announcement collections: deduplicated
//! merge on `created_at`, a 24-hour retention window applied on every write,
//! and the watermark a poller uses to request only newer remote entries.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::clock::{Clock, SystemClock};
use crate::registry::Registry;
use crate::store::{AppendStore, StoreResult};

use super::model::{Announcement, Origin};
use super::{ENACTED_KEY, PENDING_KEY};

/// Window within which an announcement counts as recent.
fn recent_window() -> Duration {
    Duration::minutes(10)
}

/// Maximum age kept in a collection on write.
fn retention_window() -> Duration {
    Duration::hours(24)
}

/// Ledger over the pending and enacted announcement collections.
pub struct AnnouncementLedger {
    registry: Arc<Registry>,
    pending: AppendStore<Announcement>,
    enacted: AppendStore<Announcement>,
    clock: Arc<dyn Clock>,
}

impl AnnouncementLedger {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_clock(registry, Arc::new(SystemClock))
    }

    pub fn with_clock(registry: Arc<Registry>, clock: Arc<dyn Clock>) -> Self {
        let pending = registry.append(PENDING_KEY);
        let enacted = registry.append(ENACTED_KEY);
        Self {
            registry,
            pending,
            enacted,
            clock,
        }
    }

    /// Merge `items` into the pending or enacted collection.
    ///
    /// One transaction: upsert by `created_at`, drop entries older than the
    /// retention window, sort newest first, and overwrite the collection
    /// with exactly that list.
    pub fn store_announcements(&self, items: Vec<Announcement>, enacted: bool) -> StoreResult<()> {
        let target = if enacted { &self.enacted } else { &self.pending };
        let now = self.clock.now();

        self.registry.transaction(|_| {
            let merged = target.merge_unique(items, |a| a.created_at)?;
            let mut kept: Vec<Announcement> = merged
                .into_iter()
                .filter(|a| a.created_at + retention_window() > now)
                .collect();
            kept.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            target.set(kept)
        })
    }

    /// Low-water mark for the next remote poll: the newest enacted remote
    /// entry plus the recent window, or `now` minus the window when none
    /// exists.
    pub fn sync_date(&self) -> DateTime<Utc> {
        let newest_remote = self
            .enacted
            .get_or_empty()
            .into_iter()
            .find(|a| a.entered_by == Origin::Remote);
        match newest_remote {
            Some(a) => a.created_at + recent_window(),
            None => self.clock.now() - recent_window(),
        }
    }

    /// The newest pending remote announcement still within the recent
    /// window, unless an enacted entry already carries the same
    /// `created_at` (it has been enacted and is no longer pending).
    pub fn recent(&self) -> Option<Announcement> {
        let now = self.clock.now();
        let pending = self.pending.get()?;
        let candidate = pending
            .into_iter()
            .find(|a| a.entered_by == Origin::Remote && a.created_at + recent_window() > now)?;

        let already_enacted = self
            .enacted
            .get_or_empty()
            .iter()
            .any(|e| e.created_at == candidate.created_at);
        if already_enacted {
            return None;
        }
        Some(candidate)
    }

    /// The head of the enacted collection, if it is at most the recent
    /// window old.
    pub fn recent_enacted(&self) -> Option<Announcement> {
        let now = self.clock.now();
        let head = self.enacted.get()?.into_iter().next()?;
        if now.signed_duration_since(head.created_at) <= recent_window() {
            Some(head)
        } else {
            None
        }
    }

    /// All enacted remote announcements, oldest first (the reverse of the
    /// newest-first storage order).
    pub fn validate(&self) -> Vec<Announcement> {
        let mut remote: Vec<Announcement> = self
            .enacted
            .get_or_empty()
            .into_iter()
            .filter(|a| a.entered_by == Origin::Remote)
            .collect();
        remote.reverse();
        remote
    }
}
