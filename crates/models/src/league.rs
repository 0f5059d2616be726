use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{fantasy_team, league_member, season, user};

pub const STATUS_PRE_DRAFT: &str = "pre_draft";
pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_IN_SEASON: &str = "in_season";
pub const STATUS_COMPLETED: &str = "completed";

pub const OPEN_STATUSES: [&str; 3] = [STATUS_PRE_DRAFT, STATUS_DRAFT, STATUS_IN_SEASON];

const ALLOWED_TEAM_COUNTS: [i32; 9] = [4, 6, 8, 10, 12, 14, 16, 18, 20];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "league")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub max_teams: i32,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: String,
    pub allow_decimal_scoring: bool,
    pub playoff_format: i32,
    pub created_by: Uuid,
    pub season_id: Uuid,
    pub roster_schema: Json,
    pub scoring_schema: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Season,
    CreatedBy,
    Members,
    FantasyTeams,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Season => Entity::belongs_to(season::Entity)
                .from(Column::SeasonId)
                .to(season::Column::Id)
                .into(),
            Relation::CreatedBy => Entity::belongs_to(user::Entity)
                .from(Column::CreatedBy)
                .to(user::Column::Id)
                .into(),
            Relation::Members => Entity::has_many(league_member::Entity).into(),
            Relation::FantasyTeams => Entity::has_many(fantasy_team::Entity).into(),
        }
    }
}

impl Related<season::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Season.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let n = name.trim();
    if n.is_empty() || n.len() > 100 {
        return Err(ModelError::Validation("league name must be 1-100 characters".into()));
    }
    Ok(())
}

pub fn validate_max_teams(max_teams: i32) -> Result<(), ModelError> {
    if !ALLOWED_TEAM_COUNTS.contains(&max_teams) {
        return Err(ModelError::Validation(
            "max_teams must be an even number between 4 and 20".into(),
        ));
    }
    Ok(())
}

pub fn validate_playoff_format(playoff_format: i32) -> Result<(), ModelError> {
    if playoff_format != 4 && playoff_format != 6 {
        return Err(ModelError::Validation("playoff_format must be 4 or 6".into()));
    }
    Ok(())
}

/// League join password policy: 8-12 alphanumeric characters with at least
/// one lowercase and one uppercase letter.
pub fn validate_password(password: &str) -> Result<(), ModelError> {
    let chars = password.chars().count();
    if !(8..=12).contains(&chars) {
        return Err(ModelError::Validation(
            "password must be between 8 and 12 characters".into(),
        ));
    }
    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ModelError::Validation("password must be alphanumeric".into()));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase())
        || !password.chars().any(|c| c.is_ascii_uppercase())
    {
        return Err(ModelError::Validation(
            "password must contain at least one lowercase and one uppercase letter".into(),
        ));
    }
    Ok(())
}

/// Default roster layout applied when a league does not supply one.
pub fn default_roster_schema() -> Json {
    json!({
        "QB": 1, "RB": 2, "K": 1, "DEF": 1, "WR": 2,
        "FLEX_RB_WR": 1, "TE": 1, "BENCH": 6, "IR": 3
    })
}

/// Default scoring rules applied when a league does not supply one.
pub fn default_scoring_schema() -> Json {
    json!({
        "passing_yards_per_point": 25,
        "passing_td": 4,
        "interception": -2,
        "rushing_yards_per_point": 10,
        "reception": 1,
        "receiving_yards_per_point": 10,
        "rush_recv_td": 6,
        "sack": 1,
        "def_interception": 2,
        "fumble_recovered": 2,
        "safety": 2,
        "any_td": 6,
        "team_def_2pt_return": 2,
        "pat_made": 1,
        "fg_made_0_50": 3,
        "fg_made_50_plus": 5,
        "points_allowed_le_10": 5,
        "points_allowed_le_20": 2,
        "points_allowed_le_30": 0,
        "points_allowed_gt_30": -2
    })
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(conn).await?)
}

pub async fn name_exists_ci<C: ConnectionTrait>(conn: &C, name: &str) -> Result<bool, ModelError> {
    let found = Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.trim().to_lowercase()))
        .one(conn)
        .await?;
    Ok(found.is_some())
}

#[allow(clippy::too_many_arguments)]
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    description: Option<&str>,
    max_teams: i32,
    password_hash: &str,
    allow_decimal_scoring: bool,
    playoff_format: i32,
    created_by: Uuid,
    season_id: Uuid,
    roster_schema: Option<Json>,
    scoring_schema: Option<Json>,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_max_teams(max_teams)?;
    validate_playoff_format(playoff_format)?;
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        description: Set(description),
        max_teams: Set(max_teams),
        password_hash: Set(password_hash.to_string()),
        status: Set(STATUS_PRE_DRAFT.into()),
        allow_decimal_scoring: Set(allow_decimal_scoring),
        playoff_format: Set(playoff_format),
        created_by: Set(created_by),
        season_id: Set(season_id),
        roster_schema: Set(roster_schema.unwrap_or_else(default_roster_schema)),
        scoring_schema: Set(scoring_schema.unwrap_or_else(default_scoring_schema)),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(conn).await?)
}
