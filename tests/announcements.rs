//! Announcement Ledger Tests
//!
//! Retention windowing, the remote-sync watermark, and the pending/enacted
//! recency reconciliation, all against a real filesystem medium and a
//! manual clock.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use celldb::announcements::{Announcement, AnnouncementLedger, PENDING_KEY};
use celldb::clock::{Clock, ManualClock};
use celldb::medium::LocalMedium;
use celldb::registry::Registry;

fn ledger(temp: &TempDir) -> (Arc<ManualClock>, AnnouncementLedger) {
    let start = Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let registry = Arc::new(Registry::new(Arc::new(LocalMedium::new(
        temp.path().to_path_buf(),
    ))));
    let ledger = AnnouncementLedger::with_clock(registry, clock.clone());
    (clock, ledger)
}

// =============================================================================
// Retention
// =============================================================================

/// Only entries within the last 24 hours survive a write, newest first.
#[test]
fn test_retention_drops_stale_entries_on_write() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);
    let now = clock.now();

    ledger
        .store_announcements(
            vec![
                Announcement::remote(now - Duration::hours(25), "stale"),
                Announcement::remote(now - Duration::hours(2), "kept"),
                Announcement::remote(now - Duration::minutes(1), "fresh"),
            ],
            false,
        )
        .unwrap();

    let payloads: Vec<_> = ledger
        .recent()
        .into_iter()
        .map(|a| a.payload)
        .collect();
    assert_eq!(payloads, vec!["fresh"]);

    let stored: Vec<Announcement> = {
        let raw = std::fs::read(temp.path().join(PENDING_KEY)).unwrap();
        serde_json::from_slice(&raw).unwrap()
    };
    let payloads: Vec<_> = stored.into_iter().map(|a| a.payload).collect();
    assert_eq!(payloads, vec!["fresh", "kept"]);
}

/// Storing the same `created_at` twice keeps one entry, with the later
/// fields winning (bulk merge is an upsert).
#[test]
fn test_store_deduplicates_by_created_at() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);
    let at = clock.now() - Duration::minutes(3);

    ledger
        .store_announcements(vec![Announcement::remote(at, "first")], false)
        .unwrap();
    ledger
        .store_announcements(vec![Announcement::remote(at, "second")], false)
        .unwrap();

    let recent = ledger.recent().unwrap();
    assert_eq!(recent.payload, "second");
}

// =============================================================================
// Watermark
// =============================================================================

/// With one enacted remote entry at T0, the watermark is T0 + 10 minutes.
#[test]
fn test_sync_date_from_enacted_remote_entry() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);
    let t0 = clock.now() - Duration::hours(1);

    ledger
        .store_announcements(vec![Announcement::remote(t0, "enacted")], true)
        .unwrap();

    assert_eq!(ledger.sync_date(), t0 + Duration::minutes(10));
}

/// With no enacted entries, the watermark is now - 10 minutes.
#[test]
fn test_sync_date_without_enacted_entries() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);

    assert_eq!(ledger.sync_date(), clock.now() - Duration::minutes(10));
}

// =============================================================================
// Recency and Pending/Enacted Reconciliation
// =============================================================================

/// A pending remote entry inside the 10-minute window is recent until an
/// enacted entry with the same `created_at` appears.
#[test]
fn test_recent_suppressed_once_enacted() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);
    let a = Announcement::remote(clock.now() - Duration::minutes(3), "bolus 0.5");

    ledger.store_announcements(vec![a.clone()], false).unwrap();
    assert_eq!(ledger.recent(), Some(a.clone()));

    ledger.store_announcements(vec![a], true).unwrap();
    assert_eq!(ledger.recent(), None);
}

/// Local pending entries are never reported as recent.
#[test]
fn test_recent_ignores_local_entries() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);

    ledger
        .store_announcements(
            vec![Announcement::local(
                clock.now() - Duration::minutes(2),
                "local note",
            )],
            false,
        )
        .unwrap();

    assert_eq!(ledger.recent(), None);
}

/// The enacted head is recent only while it is at most 10 minutes old.
#[test]
fn test_recent_enacted_window() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);
    let a = Announcement::remote(clock.now() - Duration::minutes(4), "temp basal");

    ledger.store_announcements(vec![a.clone()], true).unwrap();
    assert_eq!(ledger.recent_enacted(), Some(a));

    clock.advance(Duration::minutes(7));
    assert_eq!(ledger.recent_enacted(), None);
}

#[test]
fn test_recent_enacted_empty() {
    let temp = TempDir::new().unwrap();
    let (_clock, ledger) = ledger(&temp);
    assert_eq!(ledger.recent_enacted(), None);
}

// =============================================================================
// End-to-End Scenario
// =============================================================================

/// Pending [A(now-3m), B(now-20h)]: A is recent, B fails the 10-minute
/// window; hours later a further write drops B past the retention window.
#[test]
fn test_pending_lifecycle() {
    let temp = TempDir::new().unwrap();
    let (clock, ledger) = ledger(&temp);
    let now = clock.now();

    let a = Announcement::remote(now - Duration::minutes(3), "A");
    let b = Announcement::remote(now - Duration::hours(20), "B");
    ledger
        .store_announcements(vec![a.clone(), b.clone()], false)
        .unwrap();

    assert_eq!(ledger.recent(), Some(a.clone()));

    // 5 hours on, B is past the 24-hour retention window; any write trims it.
    clock.advance(Duration::hours(5));
    ledger.store_announcements(vec![], false).unwrap();

    let stored: Vec<Announcement> = {
        let raw = std::fs::read(temp.path().join(PENDING_KEY)).unwrap();
        serde_json::from_slice(&raw).unwrap()
    };
    assert_eq!(stored, vec![a]);
}
