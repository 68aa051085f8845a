//! JSON error envelope for every failing route

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, info};
use updraft_core::UpdraftError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// `{"success": false, "errors": [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    errors: Vec<ErrorDetail>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            errors: vec![ErrorDetail {
                code: code.to_string(),
                message: message.into(),
                field: None,
            }],
        }
    }

    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<UpdraftError> for ApiError {
    fn from(err: UpdraftError) -> Self {
        let code = err.code();
        let status = match &err {
            UpdraftError::InvalidVersion { .. }
            | UpdraftError::PlatformNotSupported { .. }
            | UpdraftError::Validation { .. }
            | UpdraftError::PolicyPersist { .. }
            | UpdraftError::SerializationError { .. } => StatusCode::BAD_REQUEST,
            UpdraftError::PlatformNotFound { .. } | UpdraftError::AssetNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            UpdraftError::MissingAsset { .. }
            | UpdraftError::InvalidAssetPath { .. }
            | UpdraftError::PolicyLoad { .. }
            | UpdraftError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", err);
        } else {
            info!("Request rejected: {}", err);
        }

        let errors = match err {
            UpdraftError::Validation { errors, .. } => errors
                .into_iter()
                .map(|field_error| ErrorDetail {
                    code: code.to_string(),
                    message: field_error.message,
                    field: Some(field_error.field),
                })
                .collect(),
            UpdraftError::PlatformNotSupported { .. } => vec![ErrorDetail {
                code: code.to_string(),
                message: "platform not supported".to_string(),
                field: None,
            }],
            other => vec![ErrorDetail {
                code: code.to_string(),
                message: other.to_string(),
                field: None,
            }],
        };
        Self { status, errors }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            success: false,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}
