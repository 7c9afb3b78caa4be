//! # Announcement Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an announcement was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Local,
    Remote,
}

/// A command announcement moving through the pending -> enacted lifecycle.
///
/// `created_at` is the identity key: the pending and enacted collections are
/// stored independently and reconciled only by matching timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub created_at: DateTime<Utc>,
    pub entered_by: Origin,
    pub payload: String,
}

impl Announcement {
    pub fn remote(created_at: DateTime<Utc>, payload: impl Into<String>) -> Self {
        Self {
            created_at,
            entered_by: Origin::Remote,
            payload: payload.into(),
        }
    }

    pub fn local(created_at: DateTime<Utc>, payload: impl Into<String>) -> Self {
        Self {
            created_at,
            entered_by: Origin::Local,
            payload: payload.into(),
        }
    }
}
