//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use meriadock_core::submit::SubmitError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A submission pipeline rejected or failed the request.
  #[error(transparent)]
  Submit(#[from] SubmitError),

  /// A plain store call (outside any pipeline) failed.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Submit(err) => {
        let status = match &err {
          SubmitError::MissingField { .. }
          | SubmitError::InvalidField { .. } => StatusCode::BAD_REQUEST,
          SubmitError::FolioNotRegistered { .. }
          | SubmitError::ProgramNotResolved => StatusCode::NOT_FOUND,
          SubmitError::Remote(_) | SubmitError::PartialWrite { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
          }
        };
        if status.is_server_error() {
          // The operator gets the generic message; the cause, and any
          // orphaned row, go to the log.
          tracing::error!(kind = err.kind(), error = %err, "submission failed");
        }
        let mut body = json!({
          "kind":  err.kind(),
          "error": err.user_message(),
        });
        if let Some(field) = err.field() {
          body["field"] = json!(field);
        }
        (status, Json(body)).into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store call failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "Something went wrong. Please try again." })),
        )
          .into_response()
      }
    }
  }
}
