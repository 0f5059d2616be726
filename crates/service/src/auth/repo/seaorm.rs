use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::user;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

async fn load(db: &DatabaseConnection, user_id: Uuid) -> Result<user::Model, AuthError> {
    user::find_by_id(db, user_id).await?.ok_or(AuthError::NotFound)
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AuthError> {
        Ok(user::find_by_email(&self.db, email).await?)
    }

    async fn create_user(
        &self,
        name: &str,
        email: &str,
        alias: &str,
        hashed_password: &str,
    ) -> Result<user::Model, AuthError> {
        Ok(user::create(&self.db, name, email, alias, hashed_password).await?)
    }

    async fn record_failed_attempt(
        &self,
        user_id: Uuid,
        attempts: i32,
        lock: bool,
    ) -> Result<(), AuthError> {
        let mut am: user::ActiveModel = load(&self.db, user_id).await?.into();
        am.failed_login_attempts = Set(attempts);
        if lock {
            am.account_status = Set(user::STATUS_LOCKED.into());
        }
        am.update(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }

    async fn record_successful_login(&self, user_id: Uuid) -> Result<(), AuthError> {
        let mut am: user::ActiveModel = load(&self.db, user_id).await?.into();
        am.failed_login_attempts = Set(0);
        am.last_activity = Set(Some(Utc::now().into()));
        am.update(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        alias: Option<&str>,
        hashed_password: Option<&str>,
    ) -> Result<user::Model, AuthError> {
        let mut am: user::ActiveModel = load(&self.db, user_id).await?.into();
        if let Some(n) = name {
            user::validate_name(n)?;
            am.name = Set(n.trim().to_string());
        }
        if let Some(a) = alias {
            user::validate_alias(a)?;
            am.alias = Set(a.trim().to_string());
        }
        if let Some(h) = hashed_password {
            am.hashed_password = Set(h.to_string());
        }
        am.update(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }
}
