//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use ekms_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] ekms_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e.kind() {
        ErrorKind::InvalidId => {
          tracing::debug!(error = %e, "invalid id");
          StatusCode::NOT_FOUND
        }
        ErrorKind::Internal => {
          tracing::error!(error = %e, "request failed");
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
