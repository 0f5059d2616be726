use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::{CurrentUser, RequestMeta};
use crate::state::AppState;
use models::{league_member, user};
use service::audit::AuditEvent;
use service::auth::service::require_role;
use service::league::domain::{
    CreateLeagueInput, JoinLeagueInput, LeagueSearchFilters, LeagueSearchRow,
};
use service::league::{create_league_with_commissioner_team, join_league, search_leagues};

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeagueCreated {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub max_teams: i32,
    pub playoff_format: i32,
    pub allow_decimal_scoring: bool,
    pub season_id: Uuid,
    pub slots_remaining: i32,
    pub commissioner_team_id: Uuid,
}

#[utoipa::path(
    post, path = "/leagues", tag = "leagues",
    responses(
        (status = 201, description = "League created", body = LeagueCreated),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Referenced team belongs to another user"),
        (status = 404, description = "Referenced team not found"),
        (status = 409, description = "Duplicate name or no current season")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    meta: RequestMeta,
    CurrentUser(current): CurrentUser,
    Json(input): Json<CreateLeagueInput>,
) -> Result<(StatusCode, Json<LeagueCreated>), ApiError> {
    require_role(&current, &[user::ROLE_MANAGER, user::ROLE_ADMIN, user::ROLE_OWNER])?;

    state
        .audit
        .log_event(
            AuditEvent::new("create_league_attempt", "PENDING")
                .user(current.id)
                .details(format!("league={}", input.name))
                .request_meta(meta.source_ip.clone(), meta.user_agent.clone()),
        )
        .await;

    let result =
        create_league_with_commissioner_team(&state.db, &state.media, current.id, input).await;

    match result {
        Ok((league, team)) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("create_league", "SUCCESS")
                        .user(current.id)
                        .entity("league", league.id)
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            let body = LeagueCreated {
                id: league.id,
                name: league.name,
                status: league.status,
                max_teams: league.max_teams,
                playoff_format: league.playoff_format,
                allow_decimal_scoring: league.allow_decimal_scoring,
                season_id: league.season_id,
                slots_remaining: league.max_teams - 1,
                commissioner_team_id: team.id,
            };
            Ok((StatusCode::CREATED, Json(body)))
        }
        Err(e) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("create_league", "FAILED")
                        .user(current.id)
                        .details(format!("league creation failed: {e}"))
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub season_id: Option<Uuid>,
    pub status: Option<String>,
}

#[utoipa::path(
    get, path = "/leagues/search", tag = "leagues",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching leagues"),
        (status = 400, description = "Missing or too-short filter")
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<LeagueSearchRow>>, ApiError> {
    let rows = search_leagues(
        &state.db,
        LeagueSearchFilters { name: q.name, season_id: q.season_id, status: q.status },
    )
    .await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post, path = "/leagues/{id}/join", tag = "leagues",
    params(("id" = Uuid, Path, description = "League ID")),
    responses(
        (status = 201, description = "Joined"),
        (status = 400, description = "League finalized or full"),
        (status = 403, description = "Invalid credentials"),
        (status = 404, description = "League not found"),
        (status = 409, description = "Already a member or name/alias conflict")
    )
)]
pub async fn join(
    State(state): State<AppState>,
    meta: RequestMeta,
    CurrentUser(current): CurrentUser,
    Path(league_id): Path<Uuid>,
    Json(input): Json<JoinLeagueInput>,
) -> Result<(StatusCode, Json<league_member::Model>), ApiError> {
    state
        .audit
        .log_event(
            AuditEvent::new("join_league_attempt", "PENDING")
                .user(current.id)
                .entity("league", league_id)
                .request_meta(meta.source_ip.clone(), meta.user_agent.clone()),
        )
        .await;

    match join_league(&state.db, &state.media, league_id, current.id, input).await {
        Ok(member) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("join_league", "SUCCESS")
                        .user(current.id)
                        .entity("league", league_id)
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Ok((StatusCode::CREATED, Json(member)))
        }
        Err(e) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("join_league", "FAILED")
                        .user(current.id)
                        .entity("league", league_id)
                        .details(format!("join failed: {e}"))
                        .request_meta(meta.source_ip, meta.user_agent)
                        .masked(),
                )
                .await;
            Err(e.into())
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub image_url: String,
    pub thumbnail_url: Option<String>,
}

/// Accept a fantasy-team image ahead of create/join; the returned URLs go
/// into the later payload as an already-local `/media/` reference.
#[utoipa::path(
    post, path = "/leagues/fantasy-team/upload", tag = "leagues",
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing image field"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn upload_fantasy_team_image(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?
    {
        if field.name() == Some("image") {
            let filename = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
            let (image_url, thumbnail_url) = state
                .media
                .save_upload("fantasy_teams", filename.as_deref(), bytes.to_vec())
                .await?;
            return Ok((StatusCode::CREATED, Json(UploadResponse { image_url, thumbnail_url })));
        }
    }
    Err(ApiError::new(StatusCode::BAD_REQUEST, "an 'image' field is required"))
}
