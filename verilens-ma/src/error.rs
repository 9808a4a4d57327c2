//! Error types for verilens-ma
//!
//! The HTTP error body is the flat `{"error": "<message>"}` shape clients
//! already parse; only unsupported types and primary extraction or
//! inference failures ever reach it. Everything fallbackable is absorbed
//! inside the pipeline.

use crate::types::{ExtractionError, InferenceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// File extension matches neither allow-list (415)
    #[error("Unsupported file type: {0}. Please upload video (.mp4/.mov/.mkv/.avi) or audio (.wav/.mp3/.flac/.m4a).")]
    UnsupportedType(String),

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Primary extraction step failed (422)
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Model inference failed (500)
    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// No modality produced a score and policy rejects neutral output (422)
    #[error("Media contains no analyzable content")]
    NoSignal,

    /// IO error (500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error (500)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Extraction(_) | ApiError::NoSignal => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(_) | ApiError::Io(_) | ApiError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_maps_to_415() {
        let response = ApiError::UnsupportedType("doc.pdf".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn extraction_maps_to_422() {
        let response =
            ApiError::Extraction(ExtractionError::Decode("bad stream".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn inference_maps_to_500() {
        let response =
            ApiError::Inference(InferenceError::Internal("nan score".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
