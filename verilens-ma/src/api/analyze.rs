//! Media analysis endpoint
//!
//! POST /analyze accepts a multipart upload, classifies it by extension,
//! runs the matching pipeline, and returns the assembled report. Each
//! request gets its own folder under the scratch directory; the uploaded
//! file is deleted once analysis finishes, the rendered artifacts stay
//! behind to be served from `/artifacts/{request_id}/`.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::{
    artifacts::ArtifactWriter,
    classifier::{classify, MediaKind},
    error::{ApiError, ApiResult},
    report::AnalysisReport,
    AppState,
};
use tracing::{info, warn};

/// POST /analyze
///
/// Analyze an uploaded media file for manipulation.
pub async fn analyze_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisReport>> {
    let mut upload: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("File field carries no filename".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| ApiError::BadRequest("Missing multipart field 'file'".into()))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }

    let kind = classify(&file_name);
    if kind == MediaKind::Unsupported {
        return Err(ApiError::UnsupportedType(file_name));
    }

    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        file = %file_name,
        kind = ?kind,
        size = data.len(),
        "Analysis request"
    );

    // One folder per request; uploads and artifacts never collide
    let request_dir = state.settings.scratch_dir.join(request_id.to_string());
    tokio::fs::create_dir_all(&request_dir).await?;

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string());
    let upload_path = request_dir.join(format!("upload.{}", extension));
    tokio::fs::write(&upload_path, &data).await?;

    let writer = ArtifactWriter::new(request_dir.clone(), format!("/artifacts/{}", request_id));
    let result = state.analyzer.analyze(&upload_path, kind, &writer).await;

    // The upload is transient either way
    if let Err(e) = tokio::fs::remove_file(&upload_path).await {
        warn!(request_id = %request_id, error = %e, "Failed to remove uploaded file");
    }

    match result {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            // Nothing in the folder is worth serving after a failure
            if let Err(rm) = tokio::fs::remove_dir_all(&request_dir).await {
                warn!(request_id = %request_id, error = %rm, "Failed to remove request folder");
            }
            Err(e.into())
        }
    }
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze_media))
}
