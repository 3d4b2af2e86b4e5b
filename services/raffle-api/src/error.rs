use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rooch_client::ClientError;
use rooch_raffle_common::FormError;
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("database: {0}")]
    Db(#[from] DbErr),

    #[error("node: {0}")]
    Node(#[from] ClientError),

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {reason}")]
    BadRequest { reason: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("attributes for {envelope_id} already exist")]
    AlreadyExists { envelope_id: String },

    #[error("upload exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("unsupported image type")]
    UnsupportedMediaType,
}

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        ApiError::BadRequest {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Db(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Node(_) => StatusCode::BAD_GATEWAY,
            ApiError::Form(_) | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists { .. } => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
