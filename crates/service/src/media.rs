//! Media storage: image download, upload persistence and thumbnail
//! generation under `media/<subdir>/<uuid>.<ext>`, served at `/media/`.
//!
//! Thumbnailing is best-effort everywhere: callers get `None` instead of an
//! error and must treat a missing thumbnail as acceptable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::imageops;
use image::Rgb;
use image::RgbImage;
use tracing::warn;
use uuid::Uuid;

use crate::errors::ServiceError;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
    thumb_size: u32,
    client: reqwest::Client,
}

/// Derive the conventional thumbnail URL for an already-local media
/// reference: `/media/x/abc.png` -> `/media/x/abc_thumb.png`.
pub fn thumb_url_for_media_ref(image_url: &str) -> Option<String> {
    if !image_url.starts_with("/media/") {
        return None;
    }
    let (base, _ext) = image_url.rsplit_once('.')?;
    Some(format!("{base}_thumb.png"))
}

fn normalize_ext(ext: Option<&str>) -> String {
    match ext.map(str::to_lowercase) {
        Some(e) if ALLOWED_EXTENSIONS.contains(&e.as_str()) => e,
        _ => "png".to_string(),
    }
}

impl MediaStore {
    pub fn new(cfg: &configs::MediaConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.download_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { root: PathBuf::from(&cfg.root), thumb_size: cfg.thumb_size, client }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL path like `/media/<relative>` for a file stored under the root.
    pub fn public_url(&self, fs_path: &Path) -> Option<String> {
        let rel = fs_path.strip_prefix(&self.root).ok()?;
        Some(format!("/media/{}", rel.to_string_lossy().replace('\\', "/")))
    }

    fn ensure_subdir(&self, subdir: &str) -> Result<PathBuf, ServiceError> {
        let dir = self.root.join(subdir);
        std::fs::create_dir_all(&dir).map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(dir)
    }

    /// Persist uploaded bytes and generate a thumbnail next to them.
    /// Returns `(image_url, thumbnail_url)`; the thumbnail may be `None`.
    pub async fn save_upload(
        &self,
        subdir: &str,
        filename: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<(String, Option<String>), ServiceError> {
        let dir = self.ensure_subdir(subdir)?;
        let ext = normalize_ext(filename.and_then(|f| f.rsplit_once('.').map(|(_, e)| e)));
        let image_path = dir.join(format!("{}.{}", Uuid::new_v4().simple(), ext));

        tokio::fs::write(&image_path, &bytes)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;

        let thumb_url = self
            .make_thumb(&image_path)
            .await
            .and_then(|p| self.public_url(&p));
        let image_url = self
            .public_url(&image_path)
            .ok_or_else(|| ServiceError::Db("media path outside root".into()))?;
        Ok((image_url, thumb_url))
    }

    /// Generate a centered square PNG thumbnail next to `image_path`.
    /// Returns `None` if the file is not a decodable image.
    pub async fn make_thumb(&self, image_path: &Path) -> Option<PathBuf> {
        let size = self.thumb_size;
        let path = image_path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || make_thumb_blocking(&path, size)).await;
        match result {
            Ok(Ok(thumb)) => Some(thumb),
            Ok(Err(e)) => {
                warn!(path = %image_path.display(), error = %e, "thumbnail generation failed");
                None
            }
            Err(e) => {
                warn!(error = %e, "thumbnail task panicked");
                None
            }
        }
    }

    /// Download an image, store it under `subdir` and return the public URL
    /// of its thumbnail. Any failure (network, timeout, decode) yields `None`.
    pub async fn try_download_and_thumb(&self, image_url: &str, subdir: &str) -> Option<String> {
        let dir = self.ensure_subdir(subdir).ok()?;
        let ext = normalize_ext(image_url.rsplit_once('.').map(|(_, e)| e));
        let image_path = dir.join(format!("{}.{}", Uuid::new_v4().simple(), ext));

        let response = match self.client.get(image_url).send().await.and_then(|r| r.error_for_status()) {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %image_url, error = %e, "image download failed");
                return None;
            }
        };
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                warn!(url = %image_url, error = %e, "image download read failed");
                return None;
            }
        };
        if tokio::fs::write(&image_path, &bytes).await.is_err() {
            return None;
        }

        let thumb = self.make_thumb(&image_path).await?;
        self.public_url(&thumb)
    }

    /// Resolve the thumbnail for an image reference: local `/media/` paths
    /// reuse the `<base>_thumb.png` convention, anything else is downloaded.
    pub async fn resolve_thumbnail(&self, image_url: &str, subdir: &str) -> Option<String> {
        if let Some(thumb) = thumb_url_for_media_ref(image_url) {
            return Some(thumb);
        }
        self.try_download_and_thumb(image_url, subdir).await
    }
}

fn make_thumb_blocking(image_path: &Path, size: u32) -> Result<PathBuf, image::ImageError> {
    let thumb_path = thumb_path_for(image_path);
    let img = image::open(image_path)?;
    // Scale to fit the square, then center on a white canvas
    let scaled = img.thumbnail(size, size).to_rgb8();
    let mut canvas = RgbImage::from_pixel(size, size, Rgb([255, 255, 255]));
    let x = (size.saturating_sub(scaled.width())) / 2;
    let y = (size.saturating_sub(scaled.height())) / 2;
    imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);
    canvas.save(&thumb_path)?;
    Ok(thumb_path)
}

fn thumb_path_for(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    image_path.with_file_name(format!("{stem}_thumb.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_refs_reuse_thumb_convention() {
        assert_eq!(
            thumb_url_for_media_ref("/media/fantasy_teams/ab12.png"),
            Some("/media/fantasy_teams/ab12_thumb.png".to_string())
        );
        assert_eq!(
            thumb_url_for_media_ref("/media/teams/logo.jpeg"),
            Some("/media/teams/logo_thumb.png".to_string())
        );
        assert_eq!(thumb_url_for_media_ref("https://example.com/a.png"), None);
    }

    #[test]
    fn unknown_extensions_coerce_to_png() {
        assert_eq!(normalize_ext(Some("PNG")), "png");
        assert_eq!(normalize_ext(Some("webp")), "webp");
        assert_eq!(normalize_ext(Some("gif")), "png");
        assert_eq!(normalize_ext(None), "png");
    }

    #[tokio::test]
    async fn save_upload_persists_image_and_thumb() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = configs::MediaConfig {
            root: tmp.path().to_string_lossy().to_string(),
            thumb_size: 64,
            download_timeout_secs: 1,
        };
        let store = MediaStore::new(&cfg);

        // 2x2 red PNG, encoded in-process so the fixture stays tiny
        let mut img = RgbImage::new(2, 2);
        for p in img.pixels_mut() {
            *p = Rgb([255, 0, 0]);
        }
        let mut bytes: Vec<u8> = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let (image_url, thumb_url) = store.save_upload("teams", Some("logo.png"), bytes).await.unwrap();
        assert!(image_url.starts_with("/media/teams/"));
        let thumb_url = thumb_url.expect("thumbnail for valid png");
        assert!(thumb_url.ends_with("_thumb.png"));

        let thumb_fs = tmp.path().join(thumb_url.trim_start_matches("/media/"));
        let thumb = image::open(thumb_fs).unwrap();
        assert_eq!(thumb.width(), 64);
        assert_eq!(thumb.height(), 64);
    }

    #[tokio::test]
    async fn save_upload_with_garbage_bytes_has_no_thumb() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = configs::MediaConfig {
            root: tmp.path().to_string_lossy().to_string(),
            thumb_size: 64,
            download_timeout_secs: 1,
        };
        let store = MediaStore::new(&cfg);
        let (image_url, thumb_url) =
            store.save_upload("players", Some("x.png"), b"not an image".to_vec()).await.unwrap();
        assert!(image_url.starts_with("/media/players/"));
        assert!(thumb_url.is_none());
    }
}
