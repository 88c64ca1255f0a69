use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait SessionRepository {
    /// User id behind an unexpired session token.
    async fn find_active_user_id(&self, session_token: String) -> Result<Option<String>>;
}
