//! Identity cache

use crate::clock::{Clock, SystemClock};
use crate::entry::{CacheEntry, NegativeEntry, PositiveEntry};
use crate::persistence::{self, NegativeMap, PositiveMap};
use crate::policy::CachePolicy;
use chrono::{DateTime, Utc};
use diary_core::{LocalStorage, UserLookup, UserRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CacheState {
    positive: PositiveMap,
    negative: NegativeMap,
}

impl CacheState {
    /// Record a successful resolution; returns whether a negative entry was dropped.
    fn store_positive(&mut self, user: UserRecord, now: DateTime<Utc>) -> bool {
        let removed_negative = self.negative.remove(&user.login).is_some();
        self.positive
            .insert(user.login.clone(), PositiveEntry::new(user, now));
        removed_negative
    }

    /// A positive entry for `login` written by another resolution while a
    /// lookup issued at `requested_at` was in flight
    fn refreshed_since(
        &self,
        login: &str,
        requested_at: DateTime<Utc>,
        now: DateTime<Utc>,
        policy: &CachePolicy,
    ) -> Option<&PositiveEntry> {
        self.positive.get(login).filter(|entry| {
            entry.fetched_at >= requested_at || policy.positive_is_fresh(entry.fetched_at, now)
        })
    }
}

/// Counts of what the cache currently holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub positive: usize,
    pub negative: usize,
    pub fresh_positive: usize,
    pub fresh_negative: usize,
}

/// Resolves logins to users through a positive/negative TTL cache
///
/// One instance is meant to be built at startup and shared by reference (or
/// `Arc`) with everything that needs to display users. Every mutation is
/// followed by writing the affected tier to local storage while the state
/// lock is still held, so two writes never interleave. The lock is never
/// held across a remote lookup, so resolutions of one login may overlap; an
/// empty answer never marks a login absent when an overlapping resolution
/// stored it after the request went out.
pub struct IdentityCache {
    lookup: Arc<dyn UserLookup>,
    storage: Arc<dyn LocalStorage>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    state: Mutex<CacheState>,
}

/// Builder for [`IdentityCache`]
pub struct IdentityCacheBuilder {
    lookup: Arc<dyn UserLookup>,
    storage: Arc<dyn LocalStorage>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl IdentityCacheBuilder {
    /// Override TTLs and storage keys
    #[must_use]
    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the time source
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build an empty cache without reading local storage
    pub fn build(self) -> IdentityCache {
        self.into_cache(CacheState::default())
    }

    /// Build a cache initialized from local storage
    ///
    /// Entries already past their tier's TTL are dropped. Unreadable or
    /// malformed data yields an empty tier; loading never fails.
    pub async fn load(self) -> IdentityCache {
        let now = self.clock.now();
        let positive = load_positive(self.storage.as_ref(), &self.policy, now).await;
        let negative = load_negative(self.storage.as_ref(), &self.policy, now).await;
        self.into_cache(CacheState { positive, negative })
    }

    fn into_cache(self, state: CacheState) -> IdentityCache {
        IdentityCache {
            lookup: self.lookup,
            storage: self.storage,
            clock: self.clock,
            policy: self.policy,
            state: Mutex::new(state),
        }
    }
}

async fn load_positive(
    storage: &dyn LocalStorage,
    policy: &CachePolicy,
    now: DateTime<Utc>,
) -> PositiveMap {
    let raw = match storage.get_item(&policy.positive_key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No cached user map found, starting empty");
            return PositiveMap::new();
        }
        Err(err) => {
            warn!(key = %policy.positive_key, error = %err, "Failed to read user map from storage");
            return PositiveMap::new();
        }
    };

    let mut map = match persistence::decode_positive(&raw) {
        Ok(map) => map,
        Err(err) => {
            warn!(key = %policy.positive_key, error = %err, "Discarding malformed user map");
            return PositiveMap::new();
        }
    };

    let total = map.len();
    let expired = persistence::retain_fresh_positive(&mut map, now, policy.positive_ttl);
    debug!(loaded = map.len(), expired, total, "Loaded cached users");
    map
}

async fn load_negative(
    storage: &dyn LocalStorage,
    policy: &CachePolicy,
    now: DateTime<Utc>,
) -> NegativeMap {
    let raw = match storage.get_item(&policy.negative_key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No negative cache found, starting empty");
            return NegativeMap::new();
        }
        Err(err) => {
            warn!(key = %policy.negative_key, error = %err, "Failed to read negative cache from storage");
            return NegativeMap::new();
        }
    };

    let mut map = match persistence::decode_negative(&raw) {
        Ok(map) => map,
        Err(err) => {
            warn!(key = %policy.negative_key, error = %err, "Discarding malformed negative cache");
            return NegativeMap::new();
        }
    };

    let total = map.len();
    let expired = persistence::retain_fresh_negative(&mut map, now, policy.negative_ttl);
    debug!(loaded = map.len(), expired, total, "Loaded negative cache entries");
    map
}

impl IdentityCache {
    /// Start building a cache over `lookup` and `storage`
    pub fn builder(
        lookup: Arc<dyn UserLookup>,
        storage: Arc<dyn LocalStorage>,
    ) -> IdentityCacheBuilder {
        IdentityCacheBuilder {
            lookup,
            storage,
            clock: Arc::new(SystemClock),
            policy: CachePolicy::default(),
        }
    }

    /// Empty cache with the default policy and wall clock
    pub fn new(lookup: Arc<dyn UserLookup>, storage: Arc<dyn LocalStorage>) -> Self {
        Self::builder(lookup, storage).build()
    }

    /// Cache initialized from local storage with the default policy and wall clock
    pub async fn load(lookup: Arc<dyn UserLookup>, storage: Arc<dyn LocalStorage>) -> Self {
        Self::builder(lookup, storage).load().await
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Resolve a single login
    ///
    /// Answers from a fresh positive or negative entry without a remote call.
    /// Otherwise asks the backend; if that fails, an existing positive entry
    /// is returned even when stale, with its `fetched_at` untouched.
    pub async fn resolve_one(&self, login: &str) -> Option<UserRecord> {
        {
            let mut state = self.state.lock().await;
            let now = self.clock.now();

            if let Some(entry) = state.positive.get(login) {
                if self.policy.positive_is_fresh(entry.fetched_at, now) {
                    debug!(login = %login, fetched_at = %entry.fetched_at, "User found in cache");
                    return Some(entry.user.clone());
                }
                debug!(login = %login, fetched_at = %entry.fetched_at, "Cached user expired, fetching fresh data");
            }

            if let Some(&marked_at) = state.negative.get(login) {
                if self.policy.negative_is_fresh(marked_at, now) {
                    debug!(login = %login, marked_at = %marked_at, "User found in negative cache, skipping lookup");
                    return None;
                }
                debug!(login = %login, "Negative cache entry expired, removing");
                state.negative.remove(login);
                self.persist_negative(&state).await;
            }
        }

        debug!(login = %login, "Fetching user from backend");
        let requested_at = self.clock.now();
        let requested = [login.to_string()];
        let result = self.lookup.lookup_users(&requested).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(users) => {
                let now = self.clock.now();
                match users.into_iter().find(|user| user.login == login) {
                    Some(user) => {
                        let removed_negative = state.store_positive(user.clone(), now);
                        self.persist_positive(&state).await;
                        if removed_negative {
                            self.persist_negative(&state).await;
                        }
                        debug!(login = %login, cache_size = state.positive.len(), "User added to cache");
                        Some(user)
                    }
                    None => {
                        if let Some(entry) =
                            state.refreshed_since(login, requested_at, now, &self.policy)
                        {
                            debug!(login = %login, "User refreshed while lookup was in flight, keeping it");
                            return Some(entry.user.clone());
                        }
                        state.negative.insert(login.to_string(), now);
                        self.persist_negative(&state).await;
                        debug!(login = %login, negative_size = state.negative.len(), "No user found, added to negative cache");
                        None
                    }
                }
            }
            Err(err) => {
                warn!(login = %login, error = %err, "Failed to fetch user");
                let stale = state.positive.get(login).map(|entry| entry.user.clone());
                if stale.is_some() {
                    debug!(login = %login, "Returning stale data as fallback after lookup error");
                }
                stale
            }
        }
    }

    /// Resolve a batch of logins with at most one remote call
    ///
    /// Duplicates are ignored. Logins with a fresh entry in either tier are
    /// answered locally; the rest go to the backend in one request. The
    /// result holds one record per resolvable login, in order of first
    /// appearance, and never a login resolved as absent. When the request
    /// fails, logins that already had a (possibly stale) positive entry are
    /// still returned and nothing is cached for the others.
    pub async fn resolve_many<I, S>(&self, logins: I) -> Vec<UserRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let order: Vec<String> = logins
            .into_iter()
            .map(Into::into)
            .filter(|login| seen.insert(login.clone()))
            .collect();

        let mut resolved: HashMap<String, UserRecord> = HashMap::new();
        let mut residual: Vec<String> = Vec::new();

        {
            let mut state = self.state.lock().await;
            let now = self.clock.now();
            let mut purged = 0usize;

            for login in &order {
                if let Some(entry) = state.positive.get(login) {
                    if self.policy.positive_is_fresh(entry.fetched_at, now) {
                        resolved.insert(login.clone(), entry.user.clone());
                        continue;
                    }
                }

                if let Some(&marked_at) = state.negative.get(login) {
                    if self.policy.negative_is_fresh(marked_at, now) {
                        continue;
                    }
                    state.negative.remove(login);
                    purged += 1;
                }

                residual.push(login.clone());
            }

            if purged > 0 {
                debug!(purged, "Removed expired negative cache entries");
                self.persist_negative(&state).await;
            }
        }

        debug!(
            requested = order.len(),
            cached = resolved.len(),
            residual = residual.len(),
            "Partitioned batch lookup"
        );

        if !residual.is_empty() {
            let requested_at = self.clock.now();
            let result = self.lookup.lookup_users(&residual).await;

            let mut state = self.state.lock().await;
            match result {
                Ok(users) => {
                    let now = self.clock.now();
                    let wanted: HashSet<&str> = residual.iter().map(String::as_str).collect();
                    let mut found: HashMap<String, UserRecord> = users
                        .into_iter()
                        .filter(|user| wanted.contains(user.login.as_str()))
                        .map(|user| (user.login.clone(), user))
                        .collect();

                    let mut missing = 0usize;
                    for login in &residual {
                        match found.remove(login) {
                            Some(user) => {
                                state.store_positive(user.clone(), now);
                                resolved.insert(login.clone(), user);
                            }
                            None => {
                                if let Some(entry) =
                                    state.refreshed_since(login, requested_at, now, &self.policy)
                                {
                                    resolved.insert(login.clone(), entry.user.clone());
                                    continue;
                                }
                                state.negative.insert(login.clone(), now);
                                missing += 1;
                            }
                        }
                    }

                    self.persist_positive(&state).await;
                    self.persist_negative(&state).await;
                    debug!(
                        fetched = residual.len() - missing,
                        missing, "Merged batch lookup into cache"
                    );
                }
                Err(err) => {
                    warn!(residual = residual.len(), error = %err, "Batch user lookup failed");
                    for login in &residual {
                        if let Some(entry) = state.positive.get(login) {
                            resolved.insert(login.clone(), entry.user.clone());
                        }
                    }
                }
            }
        }

        order
            .into_iter()
            .filter_map(|login| resolved.remove(&login))
            .collect()
    }

    /// Forget everything, in memory and in local storage
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        info!(
            positive = state.positive.len(),
            negative = state.negative.len(),
            "Clearing identity cache"
        );

        state.positive.clear();
        state.negative.clear();

        for key in [&self.policy.positive_key, &self.policy.negative_key] {
            if let Err(err) = self.storage.remove_item(key).await {
                warn!(key = %key, error = %err, "Failed to remove cache from storage");
            }
        }
    }

    /// What the cache holds for `login`, ignoring freshness and without a remote call
    pub async fn entry(&self, login: &str) -> Option<CacheEntry> {
        let state = self.state.lock().await;
        if let Some(entry) = state.positive.get(login) {
            return Some(CacheEntry::Positive(entry.clone()));
        }
        state.negative.get(login).map(|&marked_at| {
            CacheEntry::Negative(NegativeEntry {
                login: login.to_string(),
                marked_at,
            })
        })
    }

    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let now = self.clock.now();

        CacheStats {
            positive: state.positive.len(),
            negative: state.negative.len(),
            fresh_positive: state
                .positive
                .values()
                .filter(|entry| self.policy.positive_is_fresh(entry.fetched_at, now))
                .count(),
            fresh_negative: state
                .negative
                .values()
                .filter(|&&marked_at| self.policy.negative_is_fresh(marked_at, now))
                .count(),
        }
    }

    /// Write both tiers to local storage as they are now
    pub async fn flush(&self) {
        let state = self.state.lock().await;
        self.persist_positive(&state).await;
        self.persist_negative(&state).await;
    }

    /// Flush and release the cache
    pub async fn close(self) {
        self.flush().await;
        debug!("Identity cache closed");
    }

    async fn persist_positive(&self, state: &CacheState) {
        let key = &self.policy.positive_key;
        let encoded = match persistence::encode_positive(&state.positive) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to serialize user map");
                return;
            }
        };

        match self.storage.set_item(key, &encoded).await {
            Ok(()) => debug!(users = state.positive.len(), "Saved users to cache"),
            Err(err) => warn!(key = %key, error = %err, "Failed to save user map to storage"),
        }
    }

    async fn persist_negative(&self, state: &CacheState) {
        let key = &self.policy.negative_key;
        let encoded = match persistence::encode_negative(&state.negative) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to serialize negative cache");
                return;
            }
        };

        match self.storage.set_item(key, &encoded).await {
            Ok(()) => debug!(entries = state.negative.len(), "Saved negative cache entries"),
            Err(err) => warn!(key = %key, error = %err, "Failed to save negative cache to storage"),
        }
    }
}
