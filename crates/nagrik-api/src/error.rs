//! API errors and their JSON responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nagrik_pipeline::PipelineError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Database not available")]
    StoreUnavailable,

    /// `/analyze` failure. The response carries a fallback classification.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::AnalysisFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::BadRequest(msg) | Self::NotFound(msg) => json!({ "error": msg }),
            Self::StoreUnavailable => json!({ "error": self.to_string() }),
            Self::AnalysisFailed(details) => json!({
                "error": "Analysis failed",
                "details": details,
                "fallback": {
                    "department": "Municipality",
                    "priority": "Medium",
                    "confidence": 0,
                },
            }),
            Self::Internal(details) => json!({
                "error": "Internal server error",
                "details": details,
            }),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::NotFound(_) => Self::NotFound("Complaint not found"),
            PipelineError::MissingDescription(_) => Self::BadRequest("No description in complaint"),
            other => Self::Internal(other.to_string()),
        }
    }
}
