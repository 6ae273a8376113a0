use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use color_walk::{ConfigError, ExhaustionError, WalkError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Canvas not found: {0}")]
    CanvasNotFound(String),

    #[error("Invalid canvas '{name}': {source}")]
    InvalidCanvas { name: String, source: ConfigError },

    #[error("Canvas '{name}' too large: {cells} cells (max {max})")]
    CanvasTooLarge { name: String, cells: u64, max: u64 },

    #[error("Walk failed: {0}")]
    Walk(#[from] ExhaustionError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Attach the canvas name to a walk failure
    pub fn from_walk(canvas: &str, error: WalkError) -> Self {
        match error {
            WalkError::Config(source) => ApiError::InvalidCanvas {
                name: canvas.to_string(),
                source,
            },
            WalkError::Exhausted(e) => ApiError::Walk(e),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("walk task failed: {e}"))
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Canvas incomplete: {painted} of {cells} cells painted")]
    Incomplete { painted: usize, cells: usize },

    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::CanvasNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCanvas { .. } | ApiError::CanvasTooLarge { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Walk(_) | ApiError::Render(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
