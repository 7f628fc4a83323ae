/// Collaborator traits for the Diary client
use crate::error::Result;
use crate::types::UserRecord;
use async_trait::async_trait;

/// Remote batch user lookup
///
/// Implementers resolve a set of logins in one round trip. Logins that do not
/// resolve are simply absent from the returned list; they are never reported
/// as explicit "not found" markers.
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Fetch the users matching `logins`
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success response, or a
    /// malformed payload
    async fn lookup_users(&self, logins: &[String]) -> Result<Vec<UserRecord>>;
}

#[async_trait]
impl<T: UserLookup + ?Sized> UserLookup for std::sync::Arc<T> {
    async fn lookup_users(&self, logins: &[String]) -> Result<Vec<UserRecord>> {
        (**self).lookup_users(logins).await
    }
}
