use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{league, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fantasy_team")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub user_id: Uuid,
    pub league_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    League,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::League => Entity::belongs_to(league::Entity)
                .from(Column::LeagueId)
                .to(league::Column::Id)
                .into(),
        }
    }
}

impl Related<league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let n = name.trim();
    if n.len() < 2 || n.len() > 128 {
        return Err(ModelError::Validation("team name must be 2-128 characters".into()));
    }
    Ok(())
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_by_name_in_league_ci<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
    name: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::LeagueId.eq(league_id))
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.trim().to_lowercase()))
        .one(conn)
        .await?)
}

/// Look up an owner's team by name regardless of league assignment.
pub async fn find_by_owner_and_name_ci<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    name: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.trim().to_lowercase()))
        .one(conn)
        .await?)
}

pub async fn list_by_league<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::LeagueId.eq(league_id))
        .order_by_desc(Column::CreatedAt)
        .all(conn)
        .await?)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    image_url: Option<&str>,
    thumbnail_url: Option<&str>,
    user_id: Uuid,
    league_id: Option<Uuid>,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        image_url: Set(image_url.map(str::to_string)),
        thumbnail_url: Set(thumbnail_url.map(str::to_string)),
        is_active: Set(true),
        user_id: Set(user_id),
        league_id: Set(league_id),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(conn).await?)
}

/// Attach an unassigned team to a league.
pub async fn assign_to_league<C: ConnectionTrait>(
    conn: &C,
    team: Model,
    league_id: Uuid,
) -> Result<Model, ModelError> {
    let mut am: ActiveModel = team.into();
    am.league_id = Set(Some(league_id));
    Ok(am.update(conn).await?)
}
