use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures that stop a service from starting.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// One segment of the location of an invalid value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LocSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        LocSegment::Index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    /// Path to the offending value; string keys and integer list indices.
    #[schema(value_type = Vec<String>)]
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Body of every 422 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    pub detail: Vec<FieldError>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request validation failed ({} error(s))", .0.len())]
    Validation(Vec<FieldError>),

    #[error("failed to read request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("not found")]
    NotFound,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(detail) => {
                tracing::debug!(errors = detail.len(), "rejecting invalid request body");
                (status, Json(ValidationErrorBody { detail })).into_response()
            }
            ApiError::Body(rejection) => {
                tracing::warn!(%rejection, "request body could not be read");
                (status, Json(serde_json::json!({ "detail": rejection.body_text() }))).into_response()
            }
            ApiError::NotFound => {
                (status, Json(serde_json::json!({ "detail": "Not Found" }))).into_response()
            }
        }
    }
}
