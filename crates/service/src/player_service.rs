//! Player management: roster entries unique per team, with a mandatory
//! image and a fixed position enumeration.

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::media::MediaStore;
use crate::team_service::Upload;
use models::{player, team};

const MEDIA_SUBDIR: &str = "players";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlayerInput {
    pub name: String,
    pub position: String,
    pub team_id: Uuid,
    pub image_url: Option<String>,
}

/// Per-item outcome of a batch upload; the batch never aborts midway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub name: String,
    pub player_id: Option<Uuid>,
    pub error: Option<String>,
}

#[instrument(skip(db, media, input, upload), fields(player = %input.name))]
pub async fn create_player(
    db: &DatabaseConnection,
    media: &MediaStore,
    input: CreatePlayerInput,
    created_by: Uuid,
    upload: Option<Upload>,
) -> Result<player::Model, ServiceError> {
    player::validate_name(&input.name)?;
    player::validate_position(&input.position)?;

    if team::find_by_id(db, input.team_id).await?.is_none() {
        return Err(ServiceError::not_found("team"));
    }

    if player::find_by_name_in_team_ci(db, input.team_id, &input.name)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(
            "a player with that name already exists in this team".into(),
        ));
    }

    // An image is required, either uploaded or by URL
    let (image_url, thumb_url) = match (upload, input.image_url.as_deref()) {
        (Some(upload), _) => {
            let (image, thumb) = media
                .save_upload(MEDIA_SUBDIR, upload.filename.as_deref(), upload.bytes)
                .await?;
            (image, thumb)
        }
        (None, Some(url)) => (
            url.to_string(),
            media.try_download_and_thumb(url, MEDIA_SUBDIR).await,
        ),
        (None, None) => return Err(ServiceError::Validation("an image is required".into())),
    };

    let created = player::create(
        db,
        &input.name,
        &input.position,
        Some(&image_url),
        thumb_url.as_deref(),
        created_by,
        input.team_id,
    )
    .await?;
    info!(player_id = %created.id, team_id = %input.team_id, "player_created");
    Ok(created)
}

/// Create a batch of players, collecting per-item results instead of
/// stopping at the first failure.
pub async fn batch_create_players(
    db: &DatabaseConnection,
    media: &MediaStore,
    inputs: Vec<CreatePlayerInput>,
    created_by: Uuid,
) -> Result<Vec<BatchItemResult>, ServiceError> {
    let mut results = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name.clone();
        match create_player(db, media, input, created_by, None).await {
            Ok(p) => results.push(BatchItemResult { name, player_id: Some(p.id), error: None }),
            Err(e) => {
                results.push(BatchItemResult { name, player_id: None, error: Some(e.to_string()) })
            }
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, test_media_store};
    use models::user;

    async fn seed(db: &DatabaseConnection) -> (user::Model, team::Model) {
        let email = format!("player_{}@example.com", Uuid::new_v4());
        let admin = user::create(db, "Player Admin", &email, "padmin", "hash").await.unwrap();
        let name = format!("Roster {}", Uuid::new_v4());
        let t = team::create(db, &name, "Metropolis", None, None, admin.id).await.unwrap();
        (admin, t)
    }

    fn input(team_id: Uuid, name: &str, position: &str) -> CreatePlayerInput {
        CreatePlayerInput {
            name: name.into(),
            position: position.into(),
            team_id,
            image_url: Some("/media/players/seed.png".into()),
        }
    }

    #[tokio::test]
    async fn create_requires_team_image_and_unique_name() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let media = test_media_store();
        let (admin, team) = seed(&db).await;

        let created =
            create_player(&db, &media, input(team.id, "Joe Cool", "QB"), admin.id, None).await?;
        assert_eq!(created.position, "QB");

        // Same name, different case, same team
        let err = create_player(&db, &media, input(team.id, "JOE COOL", "RB"), admin.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Unknown team
        let err = create_player(&db, &media, input(Uuid::new_v4(), "Lost", "QB"), admin.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // Bad position
        let err = create_player(&db, &media, input(team.id, "Keeper", "GK"), admin.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));

        // Missing image
        let mut no_image = input(team.id, "Shadow", "TE");
        no_image.image_url = None;
        let err = create_player(&db, &media, no_image, admin.id, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        Ok(())
    }

    #[tokio::test]
    async fn batch_collects_individual_outcomes() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let media = test_media_store();
        let (admin, team) = seed(&db).await;

        let results = batch_create_players(
            &db,
            &media,
            vec![
                input(team.id, "Batch One", "QB"),
                input(team.id, "Batch One", "RB"), // duplicate name
                input(team.id, "Batch Two", "WR"),
            ],
            admin.id,
        )
        .await?;

        assert_eq!(results.len(), 3);
        assert!(results[0].player_id.is_some());
        assert!(results[1].player_id.is_none());
        assert!(results[1].error.as_deref().unwrap_or_default().contains("already exists"));
        assert!(results[2].player_id.is_some());
        Ok(())
    }
}
