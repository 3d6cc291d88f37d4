use async_trait::async_trait;

use crate::db::entity::user;
use crate::error::Result;

/// Profile fields captured on first contact.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub telegram_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<user::Model>;

    async fn find_by_id(&self, telegram_id: i64) -> Result<Option<user::Model>>;

    /// Fails with `UserNotFound` when the user was never registered.
    async fn update_wallet(&self, telegram_id: i64, wallet_address: &str) -> Result<user::Model>;
}

/// Returns the stored wallet of a known user, registering unknown users on the way.
pub async fn load_or_register(store: &dyn UserStore, profile: NewUser) -> Result<Option<String>> {
    if let Some(existing) = store.find_by_id(profile.telegram_id).await? {
        return Ok(existing.wallet_address);
    }

    tracing::info!("Registering new user {}", profile.telegram_id);
    let created = store.create(profile).await?;
    Ok(created.wallet_address)
}
