#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::media::MediaStore;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

// Tests that touch the global current-season flag must not interleave
static CURRENT_SEASON_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

pub async fn current_season_guard() -> tokio::sync::MutexGuard<'static, ()> {
    CURRENT_SEASON_LOCK.lock().await
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_init(|| async {
            let db = models::db::connect().await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    models::db::connect().await
}

/// Media store rooted in a throwaway temp directory with a short download
/// timeout so network failures surface quickly as "no thumbnail".
pub fn test_media_store() -> MediaStore {
    let root = std::env::temp_dir().join(format!("media_test_{}", uuid::Uuid::new_v4()));
    MediaStore::new(&configs::MediaConfig {
        root: root.to_string_lossy().to_string(),
        thumb_size: 64,
        download_timeout_secs: 1,
    })
}
