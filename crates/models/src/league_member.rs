use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{fantasy_team, league, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "league_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub league_id: Uuid,
    pub user_id: Uuid,
    pub fantasy_team_id: Uuid,
    pub user_alias: String,
    pub joined_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    League,
    User,
    FantasyTeam,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::League => Entity::belongs_to(league::Entity)
                .from(Column::LeagueId)
                .to(league::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::FantasyTeam => Entity::belongs_to(fantasy_team::Entity)
                .from(Column::FantasyTeamId)
                .to(fantasy_team::Column::Id)
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

pub async fn find_by_league_and_user<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::LeagueId.eq(league_id))
        .filter(Column::UserId.eq(user_id))
        .one(conn)
        .await?)
}

pub async fn count_by_league<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
) -> Result<u64, ModelError> {
    Ok(Entity::find()
        .filter(Column::LeagueId.eq(league_id))
        .count(conn)
        .await?)
}

pub async fn alias_exists_ci<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
    alias: &str,
) -> Result<bool, ModelError> {
    let found = Entity::find()
        .filter(Column::LeagueId.eq(league_id))
        .filter(
            Expr::expr(Func::lower(Expr::col(Column::UserAlias))).eq(alias.trim().to_lowercase()),
        )
        .one(conn)
        .await?;
    Ok(found.is_some())
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    league_id: Uuid,
    user_id: Uuid,
    fantasy_team_id: Uuid,
    user_alias: &str,
) -> Result<Model, ModelError> {
    let alias = user_alias.trim();
    if alias.is_empty() || alias.len() > 50 {
        return Err(ModelError::Validation("alias must be 1-50 characters".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        league_id: Set(league_id),
        user_id: Set(user_id),
        fantasy_team_id: Set(fantasy_team_id),
        user_alias: Set(alias.to_string()),
        joined_at: Set(Utc::now().into()),
    };
    Ok(am.insert(conn).await?)
}
