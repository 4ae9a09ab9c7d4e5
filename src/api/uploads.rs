//! Asset upload endpoints for movie video, cover and background files.
//!
//! Bodies stream to the target file chunk by chunk; the upload is never
//! held in memory whole. Files are named deterministically as
//! `{movie_id}_{role}.{ext}`, so
//! re-uploading the same role for the same movie overwrites in place
//! (last writer wins; acceptable for a single admin operator). The file
//! write and the record link-back are two steps with no transaction: a
//! failure in between leaves the file stored but unlinked.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    Json,
};
use serde::Serialize;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::auth::AdminUser;
use crate::AppState;

use super::error::ApiError;
use super::movies::fetch_movie;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Video,
    Cover,
    Background,
}

impl AssetKind {
    /// Role segment embedded in the stored filename
    fn role(self) -> &'static str {
        match self {
            AssetKind::Video => "video",
            AssetKind::Cover => "cover",
            AssetKind::Background => "background",
        }
    }

    /// Movie column updated after a successful store
    fn column(self) -> &'static str {
        match self {
            AssetKind::Video => "video_file",
            AssetKind::Cover => "cover_image",
            AssetKind::Background => "background_image",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
}

/// Extract a safe extension from the client-supplied filename.
/// Anything missing or suspicious falls back to `bin`.
fn sanitize_extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| {
            let (stem, ext) = name.rsplit_once('.')?;
            if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
                return None;
            }
            if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
            Some(ext.to_ascii_lowercase())
        })
        .unwrap_or_else(|| "bin".to_string())
}

fn asset_filename(movie_id: &str, kind: AssetKind, original_name: Option<&str>) -> String {
    format!(
        "{}_{}.{}",
        movie_id,
        kind.role(),
        sanitize_extension(original_name)
    )
}

async fn create_asset_file(
    dir: &FsPath,
    filename: &str,
) -> Result<(PathBuf, tokio::fs::File), ApiError> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        tracing::error!("Failed to create upload directory: {}", e);
        ApiError::internal("Failed to store file")
    })?;

    let path = dir.join(filename);
    let file = tokio::fs::File::create(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), "Failed to create upload file: {}", e);
        ApiError::internal("Failed to store file")
    })?;

    Ok((path, file))
}

/// Stream the field to disk chunk by chunk; the full body is never buffered.
async fn stream_asset_field(
    dir: &FsPath,
    filename: &str,
    field: &mut Field<'_>,
) -> Result<PathBuf, ApiError> {
    let (path, mut file) = create_asset_file(dir, filename).await?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?
    {
        file.write_all(&chunk).await.map_err(|e| {
            tracing::error!(path = %path.display(), "Failed to write upload: {}", e);
            ApiError::internal("Failed to store file")
        })?;
    }

    file.flush().await.map_err(|e| {
        tracing::error!(path = %path.display(), "Failed to flush upload: {}", e);
        ApiError::internal("Failed to store file")
    })?;

    Ok(path)
}

pub(crate) async fn link_asset(
    state: &AppState,
    movie_id: &str,
    kind: AssetKind,
    filename: &str,
) -> Result<(), ApiError> {
    // Column name comes from the AssetKind enum, never from input
    let sql = format!("UPDATE movies SET {} = ? WHERE id = ?", kind.column());
    sqlx::query(&sql)
        .bind(filename)
        .bind(movie_id)
        .execute(&state.db)
        .await?;
    Ok(())
}

async fn store_asset(
    state: &AppState,
    movie_id: &str,
    kind: AssetKind,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // Unknown movie rejects before the body is consumed any further
    fetch_movie(state, movie_id).await?;

    let mut stored: Option<String> = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let filename = asset_filename(movie_id, kind, Some(&original_name));
        stream_asset_field(&state.upload_dir, &filename, &mut field).await?;
        stored = Some(filename);
        break;
    }

    let filename =
        stored.ok_or_else(|| ApiError::bad_request("No file field in multipart body"))?;

    link_asset(state, movie_id, kind, &filename).await?;

    tracing::info!(movie_id = %movie_id, role = kind.role(), filename = %filename, "Asset uploaded");
    Ok(Json(UploadResponse {
        message: format!("{} uploaded successfully", kind.role()),
        filename,
    }))
}

/// POST /api/admin/movies/:id/upload-video
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AdminUser(_claims): AdminUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_asset(&state, &id, AssetKind::Video, multipart).await
}

/// POST /api/admin/movies/:id/upload-cover
pub async fn upload_cover(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AdminUser(_claims): AdminUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_asset(&state, &id, AssetKind::Cover, multipart).await
}

/// POST /api/admin/movies/:id/upload-background
pub async fn upload_background(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AdminUser(_claims): AdminUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    store_asset(&state, &id, AssetKind::Background, multipart).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_extension() {
        assert_eq!(sanitize_extension(Some("movie.mp4")), "mp4");
        assert_eq!(sanitize_extension(Some("COVER.JPG")), "jpg");
        assert_eq!(sanitize_extension(Some("archive.tar.gz")), "gz");

        assert_eq!(sanitize_extension(Some("noextension")), "bin");
        assert_eq!(sanitize_extension(Some(".hidden")), "bin");
        assert_eq!(sanitize_extension(Some("trailing.")), "bin");
        assert_eq!(sanitize_extension(Some("weird.e/xt")), "bin");
        assert_eq!(sanitize_extension(Some("long.abcdefghijkl")), "bin");
        assert_eq!(sanitize_extension(None), "bin");
    }

    #[test]
    fn test_asset_filename() {
        assert_eq!(
            asset_filename("m-1", AssetKind::Video, Some("clip.mp4")),
            "m-1_video.mp4"
        );
        assert_eq!(
            asset_filename("m-1", AssetKind::Cover, Some("art.png")),
            "m-1_cover.png"
        );
        assert_eq!(
            asset_filename("m-1", AssetKind::Background, None),
            "m-1_background.bin"
        );
    }

    #[tokio::test]
    async fn test_chunked_writes_concatenate_and_overwrite_in_place() {
        let dir = tempfile::tempdir().unwrap();

        // Chunks land on disk as they arrive, in order
        let (path, mut file) = create_asset_file(dir.path(), "m-1_video.mp4")
            .await
            .unwrap();
        for chunk in [&b"fir"[..], b"st"] {
            file.write_all(chunk).await.unwrap();
        }
        file.flush().await.unwrap();
        drop(file);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"first");

        // Same movie + role: last writer wins, truncating the old content
        let (path, mut file) = create_asset_file(dir.path(), "m-1_video.mp4")
            .await
            .unwrap();
        file.write_all(b"second").await.unwrap();
        file.flush().await.unwrap();
        drop(file);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_link_asset_updates_the_right_column() {
        let config = crate::config::Config::default();
        let pool = crate::db::open_in_memory().await.unwrap();
        let state = AppState::new(config, pool);

        sqlx::query(
            "INSERT INTO movies (id, title, description, genre, release_year, rating, featured, premium, created_at) \
             VALUES ('m-1', 'T', 'D', 'G', 2020, 7.0, 0, 0, '2025-01-01T00:00:00+00:00')",
        )
        .execute(&state.db)
        .await
        .unwrap();

        link_asset(&state, "m-1", AssetKind::Cover, "m-1_cover.jpg")
            .await
            .unwrap();

        let movie = fetch_movie(&state, "m-1").await.unwrap();
        assert_eq!(movie.cover_image.as_deref(), Some("m-1_cover.jpg"));
        assert!(movie.video_file.is_none());
        assert!(movie.background_image.is_none());
    }
}
