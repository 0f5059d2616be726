use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Embedded fantasy-team descriptor supplied on create/join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FantasyTeamDescriptor {
    pub name: String,
    pub image_url: Option<String>,
}

/// League creation payload. The commissioner's team is either embedded or a
/// reference to one of the creator's existing unattached teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeagueInput {
    pub name: String,
    pub description: Option<String>,
    pub max_teams: i32,
    pub password: String,
    pub playoff_format: i32,
    #[serde(default = "default_true")]
    pub allow_decimal_scoring: bool,
    pub fantasy_team: Option<FantasyTeamDescriptor>,
    pub existing_team_id: Option<Uuid>,
    pub existing_team_name: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Join payload: league password, the member's alias and the team source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinLeagueInput {
    pub password: String,
    pub user_alias: String,
    pub fantasy_team: Option<FantasyTeamDescriptor>,
    pub existing_team_id: Option<Uuid>,
    pub existing_team_name: Option<String>,
}

/// Search filters; at least one must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueSearchFilters {
    pub name: Option<String>,
    pub season_id: Option<Uuid>,
    pub status: Option<String>,
}

/// One search result row with the computed free-slot count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSearchRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub max_teams: i32,
    pub season_id: Uuid,
    pub season_name: String,
    pub slots_available: i64,
    pub created_at: DateTimeWithTimeZone,
}
