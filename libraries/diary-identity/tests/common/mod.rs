//! Shared fixtures for identity cache tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use diary_core::{DiaryError, LocalStorage, Result, UserLookup, UserRecord};
use diary_identity::{IdentityCache, ManualClock};
use diary_storage::MemoryLocalStorage;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub const MINUTE: Duration = Duration::from_secs(60);

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn alice() -> UserRecord {
    UserRecord::new("alice", "Alice").with_avatar("a.png")
}

pub fn carol() -> UserRecord {
    UserRecord::new("carol", "Carol")
}

/// Backend stand-in: answers from a directory of known users and records
/// every request it receives.
#[derive(Default)]
pub struct FakeDirectory {
    users: Mutex<HashMap<String, UserRecord>>,
    unsolicited: Mutex<Vec<UserRecord>>,
    failing: AtomicBool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeDirectory {
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let directory = Self::default();
        for user in users {
            directory.add_user(user);
        }
        directory
    }

    pub fn add_user(&self, user: UserRecord) {
        self.users.lock().unwrap().insert(user.login.clone(), user);
    }

    pub fn remove_user(&self, login: &str) {
        self.users.lock().unwrap().remove(login);
    }

    /// Records returned with every response whether requested or not
    pub fn add_unsolicited(&self, user: UserRecord) {
        self.unsolicited.lock().unwrap().push(user);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UserLookup for FakeDirectory {
    async fn lookup_users(&self, logins: &[String]) -> Result<Vec<UserRecord>> {
        self.calls.lock().unwrap().push(logins.to_vec());

        if self.failing.load(Ordering::SeqCst) {
            return Err(DiaryError::network("connection refused"));
        }

        let users = self.users.lock().unwrap();
        let mut found: Vec<UserRecord> = logins
            .iter()
            .filter_map(|login| users.get(login).cloned())
            .collect();
        found.extend(self.unsolicited.lock().unwrap().iter().cloned());
        Ok(found)
    }
}

/// Storage whose every operation fails
#[derive(Default)]
pub struct BrokenStorage;

#[async_trait]
impl LocalStorage for BrokenStorage {
    async fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(DiaryError::storage("disk unavailable"))
    }

    async fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(DiaryError::storage("disk full"))
    }

    async fn remove_item(&self, _key: &str) -> Result<()> {
        Err(DiaryError::storage("disk unavailable"))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Err(DiaryError::storage("disk unavailable"))
    }
}

pub struct Harness {
    pub cache: IdentityCache,
    pub directory: Arc<FakeDirectory>,
    pub storage: Arc<MemoryLocalStorage>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new(directory: FakeDirectory) -> Self {
        init_tracing();
        let directory = Arc::new(directory);
        let storage = Arc::new(MemoryLocalStorage::new());
        let clock = Arc::new(ManualClock::new(start_time()));

        let cache = IdentityCache::builder(directory.clone(), storage.clone())
            .clock(clock.clone())
            .build();

        Self {
            cache,
            directory,
            storage,
            clock,
        }
    }

    /// Build a second cache over the same storage, as after a restart
    pub async fn restart(&self) -> IdentityCache {
        IdentityCache::builder(self.directory.clone(), self.storage.clone())
            .clock(self.clock.clone())
            .load()
            .await
    }
}
