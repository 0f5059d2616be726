use async_trait::async_trait;
use uuid::Uuid;

use super::errors::AuthError;
use models::user;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AuthError>;
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        alias: &str,
        hashed_password: &str,
    ) -> Result<user::Model, AuthError>;

    /// Store the new failed-attempt count; `lock` also flips the account to
    /// the locked status.
    async fn record_failed_attempt(
        &self,
        user_id: Uuid,
        attempts: i32,
        lock: bool,
    ) -> Result<(), AuthError>;

    /// Reset the counter and stamp last activity.
    async fn record_successful_login(&self, user_id: Uuid) -> Result<(), AuthError>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        alias: Option<&str>,
        hashed_password: Option<&str>,
    ) -> Result<user::Model, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, user::Model>>, // key: email
    }

    impl MockAuthRepository {
        fn by_id(users: &HashMap<String, user::Model>, user_id: Uuid) -> Option<String> {
            users.values().find(|u| u.id == user_id).map(|u| u.email.clone())
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&email.to_lowercase()).cloned())
        }

        async fn create_user(
            &self,
            name: &str,
            email: &str,
            alias: &str,
            hashed_password: &str,
        ) -> Result<user::Model, AuthError> {
            let mut users = self.users.lock().unwrap();
            let email = email.to_lowercase();
            if users.contains_key(&email) {
                return Err(AuthError::Conflict);
            }
            let u = user::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.clone(),
                alias: alias.to_string(),
                hashed_password: hashed_password.to_string(),
                role: user::ROLE_MANAGER.into(),
                account_status: user::STATUS_ACTIVE.into(),
                failed_login_attempts: 0,
                last_activity: None,
                created_at: Utc::now().into(),
            };
            users.insert(email, u.clone());
            Ok(u)
        }

        async fn record_failed_attempt(
            &self,
            user_id: Uuid,
            attempts: i32,
            lock: bool,
        ) -> Result<(), AuthError> {
            let mut users = self.users.lock().unwrap();
            let key = Self::by_id(&users, user_id).ok_or(AuthError::NotFound)?;
            let u = users.get_mut(&key).unwrap();
            u.failed_login_attempts = attempts;
            if lock {
                u.account_status = user::STATUS_LOCKED.into();
            }
            Ok(())
        }

        async fn record_successful_login(&self, user_id: Uuid) -> Result<(), AuthError> {
            let mut users = self.users.lock().unwrap();
            let key = Self::by_id(&users, user_id).ok_or(AuthError::NotFound)?;
            let u = users.get_mut(&key).unwrap();
            u.failed_login_attempts = 0;
            u.last_activity = Some(Utc::now().into());
            Ok(())
        }

        async fn update_profile(
            &self,
            user_id: Uuid,
            name: Option<&str>,
            alias: Option<&str>,
            hashed_password: Option<&str>,
        ) -> Result<user::Model, AuthError> {
            let mut users = self.users.lock().unwrap();
            let key = Self::by_id(&users, user_id).ok_or(AuthError::NotFound)?;
            let u = users.get_mut(&key).unwrap();
            if let Some(n) = name {
                u.name = n.to_string();
            }
            if let Some(a) = alias {
                u.alias = a.to_string();
            }
            if let Some(h) = hashed_password {
                u.hashed_password = h.to_string();
            }
            Ok(u.clone())
        }
    }
}
