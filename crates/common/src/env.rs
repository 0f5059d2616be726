//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use anyhow::anyhow;

/// Ensure the media and data directories exist before the server starts
/// accepting uploads or appending audit rows.
pub async fn ensure_env(media_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(media_dir)
        .await
        .map_err(|e| anyhow!("cannot create {media_dir}: {e}"))?;
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}
