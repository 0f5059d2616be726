use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, ProfileUpdate, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use models::user;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expire_hours: i64,
    pub max_failed_logins: u32,
}

impl AuthConfig {
    pub fn from_app(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            token_expire_hours: cfg.token_expire_hours,
            max_failed_logins: cfg.max_failed_logins,
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Single capability check applied at every privileged boundary.
pub fn require_role(user: &AuthUser, allowed: &[&str]) -> Result<(), AuthError> {
    if allowed.contains(&user.role.as_str()) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new user with a hashed password.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        user::validate_password(&input.password)?;
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::Conflict);
        }
        let hash = hash_password(&input.password)?;
        let created = self
            .repo
            .create_user(&input.name, &input.email, &input.alias, &hash)
            .await?;
        info!(user_id = %created.id, email = %created.email, "user_registered");
        Ok(created.into())
    }

    /// Authenticate a user and issue an access token.
    ///
    /// Failed attempts increment the per-user counter; reaching the
    /// threshold locks the account. A locked account short-circuits with a
    /// distinct error even when the password is correct.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if user.account_status != user::STATUS_ACTIVE {
            return Err(AuthError::Locked);
        }

        if !verify_password(&input.password, &user.hashed_password) {
            let attempts = user.failed_login_attempts + 1;
            let lock = attempts >= self.cfg.max_failed_logins as i32;
            self.repo.record_failed_attempt(user.id, attempts, lock).await?;
            if lock {
                info!(user_id = %user.id, attempts, "account_locked");
                return Err(AuthError::Locked);
            }
            return Err(AuthError::Unauthorized);
        }

        self.repo.record_successful_login(user.id).await?;
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user: user.into(), token })
    }

    fn issue_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_expire_hours))
            .timestamp() as usize;
        let claims = Claims { sub: user.email.clone(), user_id: user.id, exp };
        encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::Unauthorized)
    }

    /// Resolve the bearer token to an active user.
    pub async fn current_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.decode_token(token)?;
        let user = self
            .repo
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if user.account_status != user::STATUS_ACTIVE {
            return Err(AuthError::Locked);
        }
        Ok(user.into())
    }

    /// Update name/alias/password on the caller's own profile.
    pub async fn update_profile(
        &self,
        user_id: uuid::Uuid,
        update: ProfileUpdate,
    ) -> Result<AuthUser, AuthError> {
        let hashed = match update.password.as_deref() {
            Some(p) => {
                user::validate_password(p)?;
                Some(hash_password(p)?)
            }
            None => None,
        };
        let updated = self
            .repo
            .update_profile(user_id, update.name.as_deref(), update.alias.as_deref(), hashed.as_deref())
            .await?;
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig {
                jwt_secret: "test-secret".into(),
                token_expire_hours: 1,
                max_failed_logins: 5,
            },
        )
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "Test User".into(),
            email: email.into(),
            alias: "tester".into(),
            password: "Passw0rd".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let svc = svc();
        let user = svc.register(register_input("u@example.com")).await.unwrap();
        assert_eq!(user.email, "u@example.com");
        assert_eq!(user.role, user::ROLE_MANAGER);

        let session = svc
            .login(LoginInput { email: "u@example.com".into(), password: "Passw0rd".into() })
            .await
            .unwrap();
        assert_eq!(session.user.email, "u@example.com");

        let me = svc.current_user(&session.token).await.unwrap();
        assert_eq!(me.id, session.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let svc = svc();
        svc.register(register_input("dup@example.com")).await.unwrap();
        let err = svc.register(register_input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn weak_passwords_are_rejected() {
        let svc = svc();
        let mut input = register_input("weak@example.com");
        input.password = "alllowercase1".into();
        assert!(matches!(svc.register(input).await.unwrap_err(), AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_generic_unauthorized() {
        let svc = svc();
        svc.register(register_input("who@example.com")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "who@example.com".into(), password: "Wrong0000".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        // Unknown email fails identically
        let err = svc
            .login(LoginInput { email: "ghost@example.com".into(), password: "Wrong0000".into() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), AuthError::Unauthorized.to_string());
    }

    #[tokio::test]
    async fn fifth_failed_attempt_locks_the_account() {
        let svc = svc();
        svc.register(register_input("lock@example.com")).await.unwrap();

        for attempt in 1..=5 {
            let err = svc
                .login(LoginInput { email: "lock@example.com".into(), password: "Wrong0000".into() })
                .await
                .unwrap_err();
            if attempt < 5 {
                assert!(matches!(err, AuthError::Unauthorized), "attempt {attempt}");
            } else {
                assert!(matches!(err, AuthError::Locked), "attempt {attempt}");
            }
        }

        // Correct password now short-circuits with the locked error
        let err = svc
            .login(LoginInput { email: "lock@example.com".into(), password: "Passw0rd".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Locked));
    }

    #[tokio::test]
    async fn successful_login_resets_the_counter() {
        let svc = svc();
        svc.register(register_input("reset@example.com")).await.unwrap();

        for _ in 0..3 {
            let _ = svc
                .login(LoginInput { email: "reset@example.com".into(), password: "Wrong0000".into() })
                .await;
        }
        svc.login(LoginInput { email: "reset@example.com".into(), password: "Passw0rd".into() })
            .await
            .unwrap();

        // Four more misses only reach attempt 4; still not locked
        for _ in 0..4 {
            let err = svc
                .login(LoginInput { email: "reset@example.com".into(), password: "Wrong0000".into() })
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::Unauthorized));
        }
    }

    #[tokio::test]
    async fn profile_update_changes_password() {
        let svc = svc();
        let user = svc.register(register_input("prof@example.com")).await.unwrap();
        svc.update_profile(
            user.id,
            ProfileUpdate { name: Some("Renamed".into()), alias: None, password: Some("NewPass1x".into()) },
        )
        .await
        .unwrap();

        let err = svc
            .login(LoginInput { email: "prof@example.com".into(), password: "Passw0rd".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        let session = svc
            .login(LoginInput { email: "prof@example.com".into(), password: "NewPass1x".into() })
            .await
            .unwrap();
        assert_eq!(session.user.name, "Renamed");
    }

    #[test]
    fn role_check_is_exact() {
        let user = AuthUser {
            id: uuid::Uuid::new_v4(),
            name: "N".into(),
            email: "e@example.com".into(),
            alias: "a".into(),
            role: user::ROLE_MANAGER.into(),
            account_status: user::STATUS_ACTIVE.into(),
        };
        assert!(require_role(&user, &[user::ROLE_MANAGER, user::ROLE_ADMIN]).is_ok());
        assert!(matches!(require_role(&user, &[user::ROLE_ADMIN]), Err(AuthError::Forbidden)));
    }
}
