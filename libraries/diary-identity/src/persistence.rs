//! Durable representation of the two cache tiers
//!
//! Each tier is stored as one JSON array of `[login, entry]` pairs, sorted by
//! login:
//!
//! - positive: `[["alice", {"login":"alice","nickname":"Alice","avatarUri":"a.png","fetchedAt":1700000000000}]]`
//! - negative: `[["bob", 1700000000000]]`
//!
//! Timestamps are Unix milliseconds.

use crate::entry::PositiveEntry;
use crate::policy::is_fresh;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

/// Login to positive entry
pub type PositiveMap = HashMap<String, PositiveEntry>;

/// Login to the instant it was marked absent
pub type NegativeMap = HashMap<String, DateTime<Utc>>;

#[derive(Serialize, Deserialize)]
struct NegativeRecord(
    String,
    #[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>,
);

/// Serialize the positive tier.
pub fn encode_positive(map: &PositiveMap) -> serde_json::Result<String> {
    let mut records: Vec<(&String, &PositiveEntry)> = map.iter().collect();
    records.sort_by(|a, b| a.0.cmp(b.0));
    serde_json::to_string(&records)
}

/// Parse the positive tier. A login listed twice keeps its newest entry;
/// pairs whose key disagrees with the record's own login are dropped.
pub fn decode_positive(raw: &str) -> serde_json::Result<PositiveMap> {
    let records: Vec<(String, PositiveEntry)> = serde_json::from_str(raw)?;

    let mut map = PositiveMap::with_capacity(records.len());
    for (login, entry) in records {
        if login != entry.user.login {
            warn!(key = %login, login = %entry.user.login, "Dropping cached user stored under another login");
            continue;
        }
        match map.get(&login) {
            Some(existing) if existing.fetched_at >= entry.fetched_at => {}
            _ => {
                map.insert(login, entry);
            }
        }
    }
    Ok(map)
}

/// Serialize the negative tier.
pub fn encode_negative(map: &NegativeMap) -> serde_json::Result<String> {
    let mut records: Vec<NegativeRecord> = map
        .iter()
        .map(|(login, marked_at)| NegativeRecord(login.clone(), *marked_at))
        .collect();
    records.sort_by(|a, b| a.0.cmp(&b.0));
    serde_json::to_string(&records)
}

/// Parse the negative tier. A login listed twice keeps its newest mark.
pub fn decode_negative(raw: &str) -> serde_json::Result<NegativeMap> {
    let records: Vec<NegativeRecord> = serde_json::from_str(raw)?;

    let mut map = NegativeMap::with_capacity(records.len());
    for NegativeRecord(login, marked_at) in records {
        let slot = map.entry(login).or_insert(marked_at);
        if marked_at > *slot {
            *slot = marked_at;
        }
    }
    Ok(map)
}

/// Drop positive entries whose age at `now` reached `ttl`. Returns how many were dropped.
pub fn retain_fresh_positive(map: &mut PositiveMap, now: DateTime<Utc>, ttl: Duration) -> usize {
    let before = map.len();
    map.retain(|_, entry| is_fresh(entry.fetched_at, now, ttl));
    before - map.len()
}

/// Drop negative entries whose age at `now` reached `ttl`. Returns how many were dropped.
pub fn retain_fresh_negative(map: &mut NegativeMap, now: DateTime<Utc>, ttl: Duration) -> usize {
    let before = map.len();
    map.retain(|_, marked_at| is_fresh(*marked_at, now, ttl));
    before - map.len()
}
