//! Diary Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! the Diary client libraries.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `UserRecord`
//! - **Collaborator Traits**: `UserLookup` (remote batch lookup) and
//!   `LocalStorage` (durable key/value storage)
//! - **Error Handling**: Unified `DiaryError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use diary_core::UserRecord;
//!
//! let alice = UserRecord::new("alice", "Alice").with_avatar("a.png");
//! assert_eq!(alice.avatar_uri.as_deref(), Some("a.png"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::{DiaryError, Result};
pub use storage::LocalStorage;
pub use traits::UserLookup;
pub use types::UserRecord;
