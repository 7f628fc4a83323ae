//! Cache entry types

use chrono::{DateTime, Utc};
use diary_core::UserRecord;
use serde::{Deserialize, Serialize};

/// A resolved user and when it was fetched
///
/// Serialized flat: `{ login, nickname, avatarUri?, fetchedAt }` with
/// `fetchedAt` in Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositiveEntry {
    #[serde(flatten)]
    pub user: UserRecord,

    #[serde(rename = "fetchedAt", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl PositiveEntry {
    pub fn new(user: UserRecord, fetched_at: DateTime<Utc>) -> Self {
        Self { user, fetched_at }
    }
}

/// A login that did not resolve as of `marked_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeEntry {
    pub login: String,
    pub marked_at: DateTime<Utc>,
}

/// What the cache currently holds for one login, fresh or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Positive(PositiveEntry),
    Negative(NegativeEntry),
}
