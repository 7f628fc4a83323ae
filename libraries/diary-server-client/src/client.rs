//! Main Diary backend client.

use crate::error::{Result, ServerClientError};
use crate::types::ServerConfig;
use crate::users::UsersClient;
use async_trait::async_trait;
use diary_core::{UserLookup, UserRecord};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Main client for the Diary backend.
///
/// Holds the shared HTTP connection pool and the bearer token, and hands out
/// short-lived sub-clients for individual API areas.
///
/// # Example
///
/// ```ignore
/// use diary_server_client::{DiaryServerClient, ServerConfig};
///
/// let client = DiaryServerClient::new(ServerConfig::new("http://127.0.0.1:80"))?;
/// client.set_token("jwt".to_string()).await;
///
/// let users = client.users().await?;
/// let found = users.client().lookup_users(&["alice".to_string()]).await?;
/// ```
pub struct DiaryServerClient {
    http: Client,
    config: Arc<RwLock<ServerConfig>>,
}

impl DiaryServerClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;

        let normalized_config = ServerConfig {
            url,
            access_token: config.access_token,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("DiaryClient/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ServerClientError::Request)?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Set the bearer token (e.g., from stored credentials).
    pub async fn set_token(&self, access_token: String) {
        self.config.write().await.access_token = Some(access_token);
    }

    /// Forget the bearer token.
    pub async fn clear_token(&self) {
        self.config.write().await.access_token = None;
        info!("Cleared access token");
    }

    /// Get a users client for lookup operations.
    ///
    /// Returns an error if not authenticated.
    pub async fn users(&self) -> Result<UsersClientHandle> {
        let config = self.config.read().await;
        let access_token = config
            .access_token
            .clone()
            .ok_or(ServerClientError::AuthRequired)?;
        let url = config.url.clone();
        drop(config);

        Ok(UsersClientHandle {
            http: self.http.clone(),
            url,
            access_token,
        })
    }
}

#[async_trait]
impl UserLookup for DiaryServerClient {
    async fn lookup_users(&self, logins: &[String]) -> diary_core::Result<Vec<UserRecord>> {
        if logins.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.users().await?;
        Ok(users.client().lookup_users(logins).await?)
    }
}

/// Handle for user operations.
///
/// This is returned by `DiaryServerClient::users()`.
pub struct UsersClientHandle {
    http: Client,
    url: String,
    access_token: String,
}

impl UsersClientHandle {
    /// Get the users client.
    pub fn client(&self) -> UsersClient<'_> {
        UsersClient::new(&self.http, &self.url, &self.access_token)
    }
}
