//! Multipart image upload handler.
//!
//! Files land in the configured upload directory under a random name and are
//! served back at `/uploads/{name}` by the static file service in `main`.

use axum::{Json, extract::Multipart, extract::State, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Extensions accepted for product imagery and AR models.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "glb"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Accept a single `file` field and store it.
pub async fn upload(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit('.').next())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ApiError::BadRequest("file name is required".to_string()))?;
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ApiError::BadRequest(format!(
                "unsupported file type: {extension}"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("file is empty".to_string()));
        }

        let name = format!("{}.{extension}", Uuid::new_v4());
        let dir = state.config().upload_dir.clone();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::Internal(format!("failed to create upload dir: {e}")))?;
        tokio::fs::write(dir.join(&name), &bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("failed to store upload: {e}")))?;

        tracing::info!(user_id = %user.id, file = %name, size = bytes.len(), "file uploaded");
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("/uploads/{name}"),
            }),
        ));
    }

    Err(ApiError::BadRequest("missing file field".to_string()))
}
