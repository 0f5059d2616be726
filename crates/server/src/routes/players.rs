use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use models::user;
use service::auth::service::require_role;
use service::player_service::{
    batch_create_players, create_player, BatchItemResult, CreatePlayerInput,
};
use service::team_service::Upload;

#[utoipa::path(
    post, path = "/players", tag = "players",
    responses(
        (status = 201, description = "Player created"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Team not found"),
        (status = 409, description = "Duplicate player name in team"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(input): Json<CreatePlayerInput>,
) -> Result<(StatusCode, Json<models::player::Model>), ApiError> {
    require_role(&current, &[user::ROLE_ADMIN])?;
    if input.image_url.is_none() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "image_url is required for JSON payloads",
        ));
    }
    let created = create_player(&state.db, &state.media, input, current.id, None).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post, path = "/players/upload", tag = "players",
    responses(
        (status = 201, description = "Player created from multipart form"),
        (status = 400, description = "Invalid image file"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Duplicate player name in team")
    )
)]
pub async fn create_upload(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<models::player::Model>), ApiError> {
    require_role(&current, &[user::ROLE_ADMIN])?;

    let mut name = None;
    let mut position = None;
    let mut team_id = None;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?
    {
        match field.name() {
            Some("name") => name = Some(read_text(field).await?),
            Some("position") => position = Some(read_text(field).await?),
            Some("team_id") => {
                let raw = read_text(field).await?;
                team_id = Some(Uuid::parse_str(raw.trim()).map_err(|_| {
                    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "team_id must be a UUID")
                })?);
            }
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

    let (name, position, team_id) = match (name, position, team_id) {
        (Some(n), Some(p), Some(t)) => (n, p, t),
        _ => {
            return Err(ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "'name', 'position' and 'team_id' fields are required",
            ))
        }
    };
    if upload.is_none() {
        return Err(ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "an 'image' field is required"));
    }

    let created = create_player(
        &state.db,
        &state.media,
        CreatePlayerInput { name, position, team_id, image_url: None },
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

#[utoipa::path(
    post, path = "/players/batch-upload", tag = "players",
    responses(
        (status = 200, description = "Per-item results; the batch never aborts midway"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn batch_upload(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(inputs): Json<Vec<CreatePlayerInput>>,
) -> Result<Json<Vec<BatchItemResult>>, ApiError> {
    require_role(&current, &[user::ROLE_ADMIN])?;
    let results = batch_create_players(&state.db, &state.media, inputs, current.id).await?;
    Ok(Json(results))
}
