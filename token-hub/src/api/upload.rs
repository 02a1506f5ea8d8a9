use super::ApiError;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
}

/// Replace the backing CSV file with the uploaded `file` part, byte for
/// byte. The repository is bypassed; nothing is parsed or merged.
pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        tracing::info!(
            file_name = %file_name,
            size = bytes.len(),
            content_type = %content_type,
            "received token file upload"
        );

        let repo = state.repo.write().await;
        repo.store().replace_contents(&bytes)?;
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                message: "file uploaded successfully".to_string(),
            }),
        ));
    }
    Err(ApiError::validation("multipart body has no `file` part"))
}
