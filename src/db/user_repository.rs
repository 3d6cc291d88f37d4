use async_trait::async_trait;
use sea_orm::{ ActiveModelTrait, DatabaseConnection, EntityTrait, Set };

use crate::db::entity::user;
use crate::error::{ AppError, Result };
use crate::services::user_service::{ NewUser, UserStore };

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: NewUser) -> Result<user::Model> {
        let now = chrono::Utc::now();
        let user = user::ActiveModel {
            telegram_id: Set(new_user.telegram_id),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            username: Set(new_user.username),
            wallet_address: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = user.insert(&self.db).await?;
        Ok(user)
    }

    async fn find_by_id(&self, telegram_id: i64) -> Result<Option<user::Model>> {
        let user = user::Entity::find_by_id(telegram_id).one(&self.db).await?;
        Ok(user)
    }

    async fn update_wallet(&self, telegram_id: i64, wallet_address: &str) -> Result<user::Model> {
        let existing = user::Entity
            ::find_by_id(telegram_id)
            .one(&self.db).await?
            .ok_or(AppError::UserNotFound)?;

        let mut active: user::ActiveModel = existing.into();
        active.wallet_address = Set(Some(wallet_address.to_string()));
        active.updated_at = Set(chrono::Utc::now());

        let user = active.update(&self.db).await?;
        Ok(user)
    }
}
