//! Upload storage for banners and candidate videos.
//!
//! Files are written under `media.root_dir` as `<uuid>.<ext>` after type and
//! size checks, and served back read-only under `/media`. Resizing and
//! transcoding happen outside this service.

use axum::body::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::error::ApiError;

/// Public URL prefix the media directory is mounted at.
pub const MEDIA_URL_PREFIX: &str = "/media";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("File is empty")]
    Empty,

    #[error("Invalid media file name")]
    InvalidName,

    #[error("Media file not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Converts to a validation error attributed to `field`.
    pub fn for_field(self, field: &str) -> ApiError {
        match self {
            MediaError::Io(e) => ApiError::Internal(format!("Media storage error: {}", e)),
            other => ApiError::field(field, other.to_string()),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        err.for_field("file")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// File extension for an accepted MIME type.
    pub fn extension_for(&self, mime: &str) -> Option<&'static str> {
        let mime = mime.split(';').next().unwrap_or(mime).trim().to_lowercase();
        match (self, mime.as_str()) {
            (MediaKind::Image, "image/jpeg") => Some("jpg"),
            (MediaKind::Image, "image/png") => Some("png"),
            (MediaKind::Image, "image/webp") => Some("webp"),
            (MediaKind::Video, "video/mp4") => Some("mp4"),
            (MediaKind::Video, "video/webm") => Some("webm"),
            (MediaKind::Video, "video/quicktime") => Some("mov"),
            _ => None,
        }
    }

    /// Extensions [`MediaStore::store`] produces for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["jpg", "png", "webp"],
            MediaKind::Video => &["mp4", "webm", "mov"],
        }
    }

    fn matches_file(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext.to_ascii_lowercase().as_str()))
    }
}

/// Metadata of a stored upload.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub filename: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_image_bytes: usize,
    max_video_bytes: usize,
}

impl MediaStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root_dir),
            max_image_bytes: config.max_image_bytes,
            max_video_bytes: config.max_video_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn limit(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Image => self.max_image_bytes,
            MediaKind::Video => self.max_video_bytes,
        }
    }

    /// Resolves the MIME type from the part's declared content type, falling
    /// back to the client file name when the type is missing or generic.
    pub fn resolve_type(
        kind: MediaKind,
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<(String, &'static str), MediaError> {
        let declared = content_type
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
            .map(str::to_string);
        let mime = declared
            .or_else(|| {
                file_name
                    .and_then(|name| mime_guess::from_path(name).first())
                    .map(|m| m.essence_str().to_string())
            })
            .ok_or_else(|| MediaError::UnsupportedType("unknown".to_string()))?;

        match kind.extension_for(&mime) {
            Some(ext) => Ok((mime, ext)),
            None => Err(MediaError::UnsupportedType(mime)),
        }
    }

    pub async fn store(
        &self,
        kind: MediaKind,
        content_type: Option<&str>,
        file_name: Option<&str>,
        data: Bytes,
    ) -> Result<StoredMedia, MediaError> {
        if data.is_empty() {
            return Err(MediaError::Empty);
        }
        let limit = self.limit(kind);
        if data.len() > limit {
            return Err(MediaError::TooLarge { limit });
        }

        let (mime, ext) = Self::resolve_type(kind, content_type, file_name)?;
        let filename = format!("{}.{}", Uuid::new_v4(), ext);

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&filename), &data).await?;

        info!(filename = %filename, size = data.len(), content_type = %mime, "Media stored");
        Ok(StoredMedia {
            url: format!("{}/{}", MEDIA_URL_PREFIX, filename),
            filename,
            content_type: mime,
            size: data.len(),
        })
    }

    /// Checks that `filename` names a stored file of the given kind.
    pub async fn ensure_exists(&self, kind: MediaKind, filename: &str) -> Result<(), MediaError> {
        let path = self.path_for(filename)?;
        if !kind.matches_file(filename) {
            return Err(MediaError::UnsupportedType(filename.to_string()));
        }
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            _ => Err(MediaError::NotFound(filename.to_string())),
        }
    }

    /// Deletes a stored file. A missing file is not an error.
    pub async fn remove(&self, filename: &str) -> Result<(), MediaError> {
        let path = self.path_for(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Io(e)),
        }
    }

    /// Accepts only bare `<name>.<ext>` file names so lookups stay in the root.
    fn path_for(&self, filename: &str) -> Result<PathBuf, MediaError> {
        let valid = !filename.is_empty()
            && filename.len() <= 100
            && !filename.starts_with('.')
            && filename
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !valid {
            return Err(MediaError::InvalidName);
        }
        Ok(self.root.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &str) -> MediaStore {
        MediaStore::new(&MediaConfig {
            root_dir: format!("./target/test-media/{}", dir),
            max_image_bytes: 16,
            max_video_bytes: 32,
        })
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(MediaKind::Image.extension_for("image/png"), Some("png"));
        assert_eq!(MediaKind::Image.extension_for("IMAGE/JPEG"), Some("jpg"));
        assert_eq!(MediaKind::Video.extension_for("video/quicktime"), Some("mov"));
        assert_eq!(MediaKind::Image.extension_for("video/mp4"), None);
        assert_eq!(MediaKind::Image.extension_for("image/gif"), None);
    }

    #[test]
    fn test_resolve_type_falls_back_to_file_name() {
        let (mime, ext) =
            MediaStore::resolve_type(MediaKind::Image, Some("application/octet-stream"), Some("a.png"))
                .unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(ext, "png");

        assert!(matches!(
            MediaStore::resolve_type(MediaKind::Image, None, None),
            Err(MediaError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_store_and_lookup() {
        let store = store("unit-store");
        let stored = store
            .store(
                MediaKind::Image,
                Some("image/png"),
                Some("banner.png"),
                Bytes::from_static(b"\x89PNG\r\n"),
            )
            .await
            .unwrap();
        assert!(stored.filename.ends_with(".png"));
        assert_eq!(stored.url, format!("/media/{}", stored.filename));
        assert!(store.ensure_exists(MediaKind::Image, &stored.filename).await.is_ok());

        store.remove(&stored.filename).await.unwrap();
        assert!(matches!(
            store.ensure_exists(MediaKind::Image, &stored.filename).await,
            Err(MediaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_exists_checks_kind() {
        let store = store("unit-kind");
        let video = store
            .store(
                MediaKind::Video,
                Some("video/mp4"),
                Some("pitch.mp4"),
                Bytes::from_static(b"\0\0\0\x18ftyp"),
            )
            .await
            .unwrap();

        assert!(store.ensure_exists(MediaKind::Video, &video.filename).await.is_ok());
        assert!(matches!(
            store.ensure_exists(MediaKind::Image, &video.filename).await,
            Err(MediaError::UnsupportedType(_))
        ));
        store.remove(&video.filename).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_and_empty() {
        let store = store("unit-limits");
        let big = Bytes::from(vec![0u8; 17]);
        assert!(matches!(
            store.store(MediaKind::Image, Some("image/png"), None, big).await,
            Err(MediaError::TooLarge { limit: 16 })
        ));
        assert!(matches!(
            store
                .store(MediaKind::Image, Some("image/png"), None, Bytes::new())
                .await,
            Err(MediaError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let store = store("unit-names");
        for name in ["../secret.png", "a/b.png", ".hidden", ""] {
            assert!(matches!(
                store.ensure_exists(MediaKind::Image, name).await,
                Err(MediaError::InvalidName)
            ));
        }
    }
}
