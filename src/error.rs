use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error label shared by every failure response.
pub const ERROR_LABEL: &str = "Vision API error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisionError {
    /// The provider answered but reported an error for the image
    /// (unreadable image, quota, credentials, ...).
    #[error("{0}")]
    Provider(String),

    /// Anything that failed before a provider verdict was available:
    /// reading the upload, building the request, reaching the provider,
    /// or decoding its reply.
    #[error("{0}")]
    Transport(String),
}

impl VisionError {
    pub fn kind(&self) -> &'static str {
        match self {
            VisionError::Provider(_) => "provider",
            VisionError::Transport(_) => "transport",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl IntoResponse for VisionError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: ERROR_LABEL.to_string(),
            details: self.to_string(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_both_kinds_share_envelope() {
        for err in [
            VisionError::Provider("Bad image data.".to_string()),
            VisionError::Transport("Bad image data.".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(
                json,
                serde_json::json!({"error": "Vision API error", "details": "Bad image data."})
            );
        }
    }

    #[test]
    fn test_display_is_bare_message() {
        let err = VisionError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.kind(), "transport");
    }
}
