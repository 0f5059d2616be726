use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OWNER: &str = "owner";

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_LOCKED: &str = "locked";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub alias: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub role: String,
    pub account_status: String,
    pub failed_login_attempts: i32,
    pub last_activity: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !email.contains('@') || email.trim().len() < 3 {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let n = name.trim();
    if n.is_empty() || n.len() > 50 {
        return Err(ModelError::Validation("name must be 1-50 characters".into()));
    }
    Ok(())
}

pub fn validate_alias(alias: &str) -> Result<(), ModelError> {
    let a = alias.trim();
    if a.is_empty() || a.len() > 50 {
        return Err(ModelError::Validation("alias must be 1-50 characters".into()));
    }
    Ok(())
}

/// Account password policy: 8-12 characters, at most 72 bytes, at least one
/// lowercase letter, one uppercase letter and one digit.
pub fn validate_password(password: &str) -> Result<(), ModelError> {
    if password.len() > 72 {
        return Err(ModelError::Validation("password is too long (max 72 bytes)".into()));
    }
    let chars = password.chars().count();
    if !(8..=12).contains(&chars) {
        return Err(ModelError::Validation(
            "password must be between 8 and 12 characters".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ModelError::Validation(
            "password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ModelError::Validation(
            "password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ModelError::Validation(
            "password must contain at least one digit".into(),
        ));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    email: &str,
    alias: &str,
    hashed_password: &str,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_alias(alias)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        email: Set(email.trim().to_lowercase()),
        alias: Set(alias.trim().to_string()),
        hashed_password: Set(hashed_password.to_string()),
        role: Set(ROLE_MANAGER.into()),
        account_status: Set(STATUS_ACTIVE.into()),
        failed_login_attempts: Set(0),
        last_activity: Set(None),
        created_at: Set(now),
    };
    Ok(am.insert(conn).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(conn)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy_accepts_conforming() {
        assert!(validate_password("Abcdef12").is_ok());
        assert!(validate_password("Passw0rdzz12").is_ok());
    }

    #[test]
    fn password_policy_rejects_violations() {
        assert!(validate_password("short1A").is_err()); // 7 chars
        assert!(validate_password("toolongpass1A").is_err()); // 13 chars
        assert!(validate_password("abcdefg1").is_err()); // no uppercase
        assert!(validate_password("ABCDEFG1").is_err()); // no lowercase
        assert!(validate_password("Abcdefgh").is_err()); // no digit
    }

    #[test]
    fn email_requires_at_sign() {
        assert!(validate_email("nope").is_err());
        assert!(validate_email("a@b.c").is_ok());
    }
}
