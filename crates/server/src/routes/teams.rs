use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use models::user;
use service::auth::service::require_role;
use service::team_service::{
    create_team, get_team, list_teams, update_team, CreateTeamInput, UpdateTeamInput, Upload,
};

const MANAGER_ROLES: [&str; 3] = [user::ROLE_MANAGER, user::ROLE_ADMIN, user::ROLE_OWNER];

#[utoipa::path(
    post, path = "/teams", tag = "teams",
    responses(
        (status = 201, description = "Team created"),
        (status = 403, description = "Insufficient role"),
        (status = 409, description = "Duplicate team name"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(input): Json<CreateTeamInput>,
) -> Result<(StatusCode, Json<models::team::Model>), ApiError> {
    require_role(&current, &MANAGER_ROLES)?;
    let created = create_team(&state.db, &state.media, input, current.id, None).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post, path = "/teams/upload", tag = "teams",
    responses(
        (status = 201, description = "Team created from multipart form"),
        (status = 400, description = "Invalid image file"),
        (status = 403, description = "Insufficient role"),
        (status = 409, description = "Duplicate team name")
    )
)]
pub async fn create_upload(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<models::team::Model>), ApiError> {
    require_role(&current, &MANAGER_ROLES)?;

    let mut name = None;
    let mut city = None;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?
    {
        match field.name() {
            Some("name") => name = Some(read_text(field).await?),
            Some("city") => city = Some(read_text(field).await?),
            Some("image") => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;
                upload = Some(Upload { filename, bytes: bytes.to_vec() });
            }
            _ => {}
        }
    }

    let (name, city) = match (name, city) {
        (Some(n), Some(c)) => (n, c),
        _ => {
            return Err(ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "'name' and 'city' fields are required",
            ))
        }
    };
    if upload.is_none() {
        return Err(ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "an 'image' field is required"));
    }

    let created = create_team(
        &state.db,
        &state.media,
        CreateTeamInput { name, city, image_url: None },
        current.id,
        upload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub q: Option<String>,
    pub active: Option<bool>,
    pub created_by: Option<Uuid>,
}

#[utoipa::path(
    get, path = "/teams", tag = "teams",
    params(ListQuery),
    responses((status = 200, description = "Teams, newest first"))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<models::team::Model>>, ApiError> {
    let teams =
        list_teams(&state.db, query.q.as_deref(), query.active, query.created_by).await?;
    Ok(Json(teams))
}

#[utoipa::path(
    get, path = "/teams/{id}", tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<models::team::Model>, ApiError> {
    Ok(Json(get_team(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/teams/{id}", tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team updated"),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Duplicate team name")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTeamInput>,
) -> Result<Json<models::team::Model>, ApiError> {
    require_role(&current, &MANAGER_ROLES)?;
    Ok(Json(update_team(&state.db, id, input).await?))
}
