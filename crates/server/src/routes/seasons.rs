use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::{CurrentUser, RequestMeta};
use crate::state::AppState;
use models::user;
use service::audit::AuditEvent;
use service::auth::service::require_role;
use service::pagination::Pagination;
use service::season::service::{CreateSeasonInput, SeasonWithWeeks, UpdateSeasonInput};
use service::season::{
    create_season, delete_season, get_current_season, get_season, list_seasons, update_season,
};

#[utoipa::path(
    post, path = "/seasons/", tag = "seasons",
    responses(
        (status = 201, description = "Season created"),
        (status = 400, description = "Validation error (dates, weeks, overlap)"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Duplicate season name")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    meta: RequestMeta,
    CurrentUser(current): CurrentUser,
    Json(input): Json<CreateSeasonInput>,
) -> Result<(StatusCode, Json<SeasonWithWeeks>), ApiError> {
    require_role(&current, &[user::ROLE_ADMIN])?;
    let name = input.name.clone();
    match create_season(&state.db, input, current.id).await {
        Ok(created) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("create_season", "SUCCESS")
                        .user(current.id)
                        .entity("season", created.season.id)
                        .details(format!(
                            "season \"{}\" created with {} weeks",
                            created.season.name,
                            created.weeks.len()
                        ))
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(e) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("create_season", "FAILED")
                        .user(current.id)
                        .details(format!("failed to create season \"{name}\": {e}"))
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[utoipa::path(
    get, path = "/seasons/", tag = "seasons",
    params(ListQuery),
    responses((status = 200, description = "Seasons, newest first"))
)]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<SeasonWithWeeks>>, ApiError> {
    let default = Pagination::default();
    let pagination = Pagination {
        page: q.page.unwrap_or(default.page),
        per_page: q.per_page.unwrap_or(default.per_page),
    };
    Ok(Json(list_seasons(&state.db, pagination).await?))
}

#[utoipa::path(
    get, path = "/seasons/current", tag = "seasons",
    responses(
        (status = 200, description = "The current season"),
        (status = 404, description = "No current season")
    )
)]
pub async fn current(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
) -> Result<Json<SeasonWithWeeks>, ApiError> {
    Ok(Json(get_current_season(&state.db).await?))
}

#[utoipa::path(
    get, path = "/seasons/{id}", tag = "seasons",
    params(("id" = Uuid, Path, description = "Season ID")),
    responses(
        (status = 200, description = "Season with weeks"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    CurrentUser(_current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SeasonWithWeeks>, ApiError> {
    Ok(Json(get_season(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/seasons/{id}", tag = "seasons",
    params(("id" = Uuid, Path, description = "Season ID")),
    responses(
        (status = 200, description = "Season updated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Duplicate season name")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    meta: RequestMeta,
    CurrentUser(current): CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSeasonInput>,
) -> Result<Json<models::season::Model>, ApiError> {
    require_role(&current, &[user::ROLE_ADMIN])?;
    match update_season(&state.db, id, input).await {
        Ok(updated) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("update_season", "SUCCESS")
                        .user(current.id)
                        .entity("season", id)
                        .details(format!("season \"{}\" updated", updated.name))
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Ok(Json(updated))
        }
        Err(e) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("update_season", "FAILED")
                        .user(current.id)
                        .entity("season", id)
                        .details(format!("failed to update season: {e}"))
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Err(e.into())
        }
    }
}

#[utoipa::path(
    delete, path = "/seasons/{id}", tag = "seasons",
    params(("id" = Uuid, Path, description = "Season ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Season referenced by leagues")
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    meta: RequestMeta,
    CurrentUser(current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_role(&current, &[user::ROLE_ADMIN])?;
    match delete_season(&state.db, id).await {
        Ok(()) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("delete_season", "SUCCESS")
                        .user(current.id)
                        .entity("season", id)
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            state
                .audit
                .log_event(
                    AuditEvent::new("delete_season", "FAILED")
                        .user(current.id)
                        .entity("season", id)
                        .details(format!("failed to delete season: {e}"))
                        .request_meta(meta.source_ip, meta.user_agent),
                )
                .await;
            Err(e.into())
        }
    }
}
