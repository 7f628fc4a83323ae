//! Expiry policy

use chrono::{DateTime, Utc};
use std::time::Duration;

/// How long a resolved user is served without asking the backend again.
pub const POSITIVE_TTL: Duration = Duration::from_secs(5 * 60);

/// How long a login known not to exist is answered locally.
pub const NEGATIVE_TTL: Duration = Duration::from_secs(60 * 60);

/// Storage key of the positive cache.
pub const POSITIVE_CACHE_KEY: &str = "userMapCache";

/// Storage key of the negative cache.
pub const NEGATIVE_CACHE_KEY: &str = "negativeUserCache";

/// Whether something stamped at `at` is still within `ttl` at `now`.
///
/// An age equal to `ttl` is already stale. Timestamps in the future (clock
/// moved backwards) count as fresh.
pub fn is_fresh(at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match (now - at).to_std() {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}

/// TTLs and storage keys used by an identity cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Freshness window of positive entries
    pub positive_ttl: Duration,
    /// Freshness window of negative entries
    pub negative_ttl: Duration,
    /// Storage key for the positive cache
    pub positive_key: String,
    /// Storage key for the negative cache
    pub negative_key: String,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            positive_ttl: POSITIVE_TTL,
            negative_ttl: NEGATIVE_TTL,
            positive_key: POSITIVE_CACHE_KEY.to_string(),
            negative_key: NEGATIVE_CACHE_KEY.to_string(),
        }
    }
}

impl CachePolicy {
    /// Default keys with custom TTLs
    pub fn with_ttls(positive_ttl: Duration, negative_ttl: Duration) -> Self {
        Self {
            positive_ttl,
            negative_ttl,
            ..Self::default()
        }
    }

    pub fn positive_is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_fresh(fetched_at, now, self.positive_ttl)
    }

    pub fn negative_is_fresh(&self, marked_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_fresh(marked_at, now, self.negative_ttl)
    }
}
