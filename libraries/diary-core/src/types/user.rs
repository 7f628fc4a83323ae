/// User identity domain type
use serde::{Deserialize, Serialize};

/// Snapshot of a remote user identity at fetch time.
///
/// `login` is the unique key; `nickname` and `avatar_uri` are what callers
/// display next to posts, comments and dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique login identifier
    pub login: String,

    /// Display name
    pub nickname: String,

    /// Avatar location, if the user has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_uri: Option<String>,
}

impl UserRecord {
    /// Create a record without an avatar
    pub fn new(login: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            nickname: nickname.into(),
            avatar_uri: None,
        }
    }

    /// Set the avatar location
    #[must_use]
    pub fn with_avatar(mut self, avatar_uri: impl Into<String>) -> Self {
        self.avatar_uri = Some(avatar_uri.into());
        self
    }
}
