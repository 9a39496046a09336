//! Path-addressable store for course thumbnails and videos.
//!
//! Files land under `{root}/{kind}/{uuid}-{sanitized name}` and are
//! referenced by relative path from the course row. Removal is
//! best-effort: a missing or locked file is logged and never fails the
//! operation that triggered the cleanup.

use axum::body::Bytes;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Clone)]
pub struct ContentStore {
    root: PathBuf,
}

pub const KIND_THUMBNAIL: &str = "thumbnails";
pub const KIND_VIDEO: &str = "videos";

/// Keep only filename-safe characters; everything else becomes '_'.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist an uploaded file, returning its relative path
    /// (e.g. `/uploads/videos/3f2c...-intro.mp4`).
    pub async fn save(
        &self,
        kind: &str,
        original_name: &str,
        data: Bytes,
    ) -> Result<String, ApiError> {
        let dir = self.root.join(kind);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("upload dir create failed: {e}")))?;

        let filename = format!("{}-{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = dir.join(&filename);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("upload write failed: {e}")))?;

        tracing::info!(kind, bytes = data.len(), file = %filename, "stored upload");
        Ok(format!("/uploads/{kind}/{filename}"))
    }

    /// Best-effort removal of a previously stored file.
    pub async fn remove(&self, rel_path: &str) {
        let Some(local) = self.resolve(rel_path) else {
            tracing::warn!(rel_path, "refusing to remove path outside the store");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&local).await {
            tracing::warn!(rel_path, error = %e, "failed to remove stored file");
        }
    }

    /// Map a stored relative path back to a location under the root.
    /// Rejects anything that does not look like one of ours.
    fn resolve(&self, rel_path: &str) -> Option<PathBuf> {
        let trimmed = rel_path.strip_prefix("/uploads/")?;
        let p = Path::new(trimmed);
        if p.components().any(|c| {
            matches!(
                c,
                std::path::Component::ParentDir | std::path::Component::RootDir
            )
        }) {
            return None;
        }
        Some(self.root.join(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("intro video.mp4"), "intro_video.mp4");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = ContentStore::new("/tmp/uploads");
        assert!(store.resolve("/uploads/videos/a.mp4").is_some());
        assert!(store.resolve("/uploads/../secrets").is_none());
        assert!(store.resolve("/elsewhere/a.mp4").is_none());
    }

    #[tokio::test]
    async fn test_save_and_remove_roundtrip() {
        let dir = std::env::temp_dir().join(format!("coursedeck-test-{}", Uuid::new_v4()));
        let store = ContentStore::new(&dir);

        let rel = store
            .save(KIND_THUMBNAIL, "cover.png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        assert!(rel.starts_with("/uploads/thumbnails/"));

        let on_disk = store.resolve(&rel).unwrap();
        assert!(on_disk.exists());

        store.remove(&rel).await;
        assert!(!on_disk.exists());

        // Removing again must not error (best-effort contract).
        store.remove(&rel).await;
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
