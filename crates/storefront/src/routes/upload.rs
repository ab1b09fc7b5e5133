//! Admin media upload route.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::media::{BufferedFile, UPLOAD_FIELD, UploadResult};
use crate::middleware::RequestId;
use crate::state::AppState;

/// Response body of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// The media service's response, unmodified.
    pub result: UploadResult,
}

/// Buffer the `my_file` field and forward it to the media service.
#[instrument(skip(state, multipart), fields(request_id = %request_id.0))]
pub async fn upload_image(
    State(state): State<AppState>,
    request_id: RequestId,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let file = BufferedFile::from_multipart(multipart, UPLOAD_FIELD).await?;
    add_breadcrumb("media", "Uploading product image", &[(
        "content_type",
        file.content_type.as_str(),
    )]);

    let result = state.media().upload(&file).await?;

    Ok(Json(UploadResponse {
        success: true,
        result,
    }))
}
