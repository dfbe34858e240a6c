use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::auth::AccessError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error body shared by every endpoint: `{"error": title, "detail": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, title: title.into(), detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.title, "detail": self.detail}))).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                JsonApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", Some(msg))
            }
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) => JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Db(msg) | ServiceError::Model(ModelError::Db(msg)) => {
                error!(error = %msg, "database error");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Database Error", None)
            }
            ServiceError::Storage(e) => {
                error!(error = %e, "storage error");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", None)
            }
        }
    }
}

impl From<AccessError> for JsonApiError {
    fn from(e: AccessError) -> Self {
        warn!(code = e.code(), error = %e, "access denied");
        match e {
            AccessError::Unauthorized(_) => {
                JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("invalid or missing credential".into()))
            }
            AccessError::Forbidden => JsonApiError::new(StatusCode::FORBIDDEN, "Forbidden", Some("operation not permitted".into())),
            AccessError::InvalidTenant(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(msg)),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage backend unavailable: {0}")]
    Storage(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
