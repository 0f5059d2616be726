//! Team management: clubs with a global case-insensitive name, an optional
//! image (URL or upload) and a best-effort thumbnail.

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::media::MediaStore;
use models::team;

const MEDIA_SUBDIR: &str = "teams";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamInput {
    pub name: String,
    pub city: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeamInput {
    pub name: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Raw bytes of an uploaded image plus its original file name.
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

#[instrument(skip(db, media, input, upload), fields(team = %input.name))]
pub async fn create_team(
    db: &DatabaseConnection,
    media: &MediaStore,
    input: CreateTeamInput,
    created_by: Uuid,
    upload: Option<Upload>,
) -> Result<team::Model, ServiceError> {
    team::validate_name(&input.name)?;
    team::validate_city(&input.city)?;

    if team::find_by_name_ci(db, &input.name).await?.is_some() {
        return Err(ServiceError::Conflict("a team with that name already exists".into()));
    }

    let (image_url, thumb_url) = match (upload, input.image_url.as_deref()) {
        (Some(upload), _) => {
            let (image, thumb) = media
                .save_upload(MEDIA_SUBDIR, upload.filename.as_deref(), upload.bytes)
                .await?;
            (Some(image), thumb)
        }
        (None, Some(url)) => (
            Some(url.to_string()),
            media.try_download_and_thumb(url, MEDIA_SUBDIR).await,
        ),
        (None, None) => (None, None),
    };

    let created = team::create(
        db,
        &input.name,
        &input.city,
        image_url.as_deref(),
        thumb_url.as_deref(),
        created_by,
    )
    .await?;
    info!(team_id = %created.id, "team_created");
    Ok(created)
}

/// Partial update; a name change re-runs the uniqueness check excluding
/// self.
pub async fn update_team(
    db: &DatabaseConnection,
    team_id: Uuid,
    input: UpdateTeamInput,
) -> Result<team::Model, ServiceError> {
    let existing = team::find_by_id(db, team_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("team"))?;

    if let Some(name) = input.name.as_deref() {
        if let Some(other) = team::find_by_name_ci(db, name).await? {
            if other.id != existing.id {
                return Err(ServiceError::Conflict("a team with that name already exists".into()));
            }
        }
    }

    Ok(team::update(
        db,
        existing,
        input.name.as_deref(),
        input.city.as_deref(),
        input.image_url.as_deref(),
        input.is_active,
    )
    .await?)
}

pub async fn list_teams(
    db: &DatabaseConnection,
    name_contains: Option<&str>,
    active_only: Option<bool>,
    created_by: Option<Uuid>,
) -> Result<Vec<team::Model>, ServiceError> {
    Ok(team::list(db, name_contains, active_only, created_by).await?)
}

pub async fn get_team(db: &DatabaseConnection, team_id: Uuid) -> Result<team::Model, ServiceError> {
    team::find_by_id(db, team_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("team"))
}
