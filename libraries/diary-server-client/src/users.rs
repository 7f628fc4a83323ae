//! User lookup operations for the Diary backend.

use crate::error::{Result, ServerClientError};
use diary_core::UserRecord;
use reqwest::Client;
use tracing::debug;

/// Most logins the backend accepts in one lookup request.
pub const MAX_LOGINS_PER_REQUEST: usize = 100;

/// Users client for the Diary backend.
pub struct UsersClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> UsersClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Look up users by login.
    ///
    /// Larger inputs are split into several requests of at most
    /// [`MAX_LOGINS_PER_REQUEST`] logins; the results are concatenated. Logins
    /// the backend does not know are simply missing from the result.
    pub async fn lookup_users(&self, logins: &[String]) -> Result<Vec<UserRecord>> {
        let mut out = Vec::new();
        for chunk in logins.chunks(MAX_LOGINS_PER_REQUEST) {
            let users = self.lookup_chunk(chunk).await?;
            out.extend(users);
        }
        Ok(out)
    }

    async fn lookup_chunk(&self, logins: &[String]) -> Result<Vec<UserRecord>> {
        let url = format!("{}/user/users", self.base_url);
        debug!(url = %url, requested = logins.len(), "Looking up users");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token)
            .json(logins)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ServerClientError::ServerUnreachable(e.to_string())
                } else {
                    ServerClientError::Request(e)
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let users: Vec<UserRecord> = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse users response: {}", e))
            })?;

            debug!(
                requested = logins.len(),
                found = users.len(),
                "Fetched users"
            );

            Ok(users)
        } else if status.as_u16() == 401 {
            Err(ServerClientError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
