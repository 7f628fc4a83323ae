//! Diary Server Client
//!
//! HTTP client library for the Diary backend's user API.
//!
//! # Features
//!
//! - **Batch user lookup**: resolve many logins per round trip, chunked to
//!   the backend's request limit
//! - **`UserLookup` implementation**: plugs straight into the identity cache
//!
//! # Example
//!
//! ```ignore
//! use diary_server_client::{DiaryServerClient, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::with_token("http://127.0.0.1:80", "jwt");
//!     let client = DiaryServerClient::new(config)?;
//!
//!     let users = client.users().await?;
//!     let found = users.client().lookup_users(&["alice".to_string()]).await?;
//!     println!("Found {} users", found.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;
mod users;

pub use client::{DiaryServerClient, UsersClientHandle};
pub use error::{Result, ServerClientError};
pub use types::ServerConfig;
pub use users::{UsersClient, MAX_LOGINS_PER_REQUEST};
