//! Diary Identity
//!
//! Client-side cache resolving login identifiers to displayable users
//! (nickname, avatar) while keeping calls to the backend to a minimum.
//!
//! # Features
//!
//! - **Positive cache**: resolved users, fresh for 5 minutes
//! - **Negative cache**: logins known not to exist, fresh for 1 hour
//! - **Batched lookups**: one deduplicated remote call per `resolve_many`
//! - **Stale-while-error**: an expired record is served when a refresh fails
//! - **Durable**: both caches are written to local storage after every change
//!
//! # Example
//!
//! ```ignore
//! use diary_identity::IdentityCache;
//! use diary_server_client::{DiaryServerClient, ServerConfig};
//! use diary_storage::SqliteLocalStorage;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let lookup = DiaryServerClient::new(ServerConfig::with_token("http://127.0.0.1:80", "jwt"))?;
//! let storage = SqliteLocalStorage::open("sqlite://identity.db").await?;
//!
//! let cache = IdentityCache::builder(Arc::new(lookup), Arc::new(storage))
//!     .load()
//!     .await;
//!
//! if let Some(alice) = cache.resolve_one("alice").await {
//!     println!("{} ({})", alice.nickname, alice.login);
//! }
//! let users = cache.resolve_many(["alice", "bob", "carol"]).await;
//! println!("resolved {}", users.len());
//!
//! cache.close().await;
//! # Ok(())
//! # }
//! ```

mod cache;
mod clock;
mod entry;
pub mod persistence;
mod policy;

pub use cache::{CacheStats, IdentityCache, IdentityCacheBuilder};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, NegativeEntry, PositiveEntry};
pub use policy::{
    is_fresh, CachePolicy, NEGATIVE_CACHE_KEY, NEGATIVE_TTL, POSITIVE_CACHE_KEY, POSITIVE_TTL,
};
