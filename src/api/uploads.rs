use axum::{Json, extract::Multipart, extract::State};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, UploadDto};
use crate::api::auth::session_user_id;
use crate::services::ImageService;

/// POST /api/uploads/images
///
/// Accepts one multipart `file` field, stores it, and returns the reference
/// URL to attach to a listing. Sellers must be signed in to upload.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadDto>>, ApiError> {
    session_user_id(&session).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();

        if !ImageService::is_supported(&filename) {
            return Err(ApiError::validation(format!(
                "Unsupported file type: {filename:?}. Only images are accepted"
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(ApiError::validation("Uploaded file is empty"));
        }

        if data.len() as u64 > state.image_service().max_bytes() {
            return Err(ApiError::validation(format!(
                "Uploaded file exceeds the {} MB limit",
                state.image_service().max_bytes() / 1024 / 1024
            )));
        }

        let url = state.image_service().save_upload(&filename, &data).await?;

        return Ok(Json(ApiResponse::success(UploadDto { url })));
    }

    Err(ApiError::validation("Missing 'file' field in upload"))
}
