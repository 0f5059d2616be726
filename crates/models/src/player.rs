use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{team, user};

/// Valid roster positions.
pub const POSITIONS: [&str; 7] = ["QB", "RB", "WR", "TE", "K", "DST", "FLEX"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "player")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub team_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Team,
    CreatedBy,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Team => Entity::belongs_to(team::Entity)
                .from(Column::TeamId)
                .to(team::Column::Id)
                .into(),
            Relation::CreatedBy => Entity::belongs_to(user::Entity)
                .from(Column::CreatedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let n = name.trim();
    if n.len() < 2 || n.len() > 128 {
        return Err(ModelError::Validation("player name must be 2-128 characters".into()));
    }
    Ok(())
}

pub fn validate_position(position: &str) -> Result<(), ModelError> {
    if !POSITIONS.contains(&position) {
        return Err(ModelError::Validation(format!(
            "position must be one of {}",
            POSITIONS.join(", ")
        )));
    }
    Ok(())
}

pub async fn find_by_name_in_team_ci<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    name: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::TeamId.eq(team_id))
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.trim().to_lowercase()))
        .one(conn)
        .await?)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    position: &str,
    image_url: Option<&str>,
    thumbnail_url: Option<&str>,
    created_by: Uuid,
    team_id: Uuid,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_position(position)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        position: Set(position.to_string()),
        image_url: Set(image_url.map(str::to_string)),
        thumbnail_url: Set(thumbnail_url.map(str::to_string)),
        is_active: Set(true),
        created_by: Set(created_by),
        team_id: Set(team_id),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(conn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_fixed() {
        assert!(validate_position("QB").is_ok());
        assert!(validate_position("DST").is_ok());
        assert!(validate_position("GK").is_err());
        assert!(validate_position("qb").is_err());
    }
}
