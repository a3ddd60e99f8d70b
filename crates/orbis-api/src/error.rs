//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use orbis_core::{RefreshError, SourceUnavailable};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Expected outcome of a lookup; carries the client-facing message.
  #[error("{0}")]
  NotFound(&'static str),

  #[error(transparent)]
  SourceUnavailable(SourceUnavailable),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Internal(Box::new(e))
  }
}

impl From<RefreshError> for ApiError {
  fn from(e: RefreshError) -> Self {
    match e {
      RefreshError::SourceUnavailable(e) => Self::SourceUnavailable(e),
      RefreshError::Reconciliation(e) => Self::Internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(message) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
      }
      ApiError::SourceUnavailable(e) => {
        tracing::warn!("{e}");
        let body = json!({
          "error":   "External data source unavailable",
          "details": format!("Could not fetch data from {} API", e.source_name),
        });
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
      }
      ApiError::Internal(e) => {
        tracing::error!("{e}");
        let body = json!({ "error": "Internal server error" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
      }
    }
  }
}
