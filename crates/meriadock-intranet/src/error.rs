//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No usable session accompanied the request.
  #[error("unauthorized")]
  Unauthorized,
  /// The NISUV / password pair did not check out. Deliberately not
  /// distinguished from an unknown account.
  #[error("invalid credentials")]
  InvalidCredentials,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("configuration error: {0}")]
  Config(String),
  #[error("password hash error")]
  Hash,
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "You are signed out.".to_string())
      }
      Error::InvalidCredentials => {
        (StatusCode::UNAUTHORIZED, "Invalid NISUV or password.".to_string())
      }
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
      Error::Config(msg) => {
        tracing::error!(detail = %msg, "configuration error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Something went wrong. Please try again.".to_string(),
        )
      }
      Error::Hash => {
        tracing::error!("password hashing failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Something went wrong. Please try again.".to_string(),
        )
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store call failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Something went wrong. Please try again.".to_string(),
        )
      }
    };

    (status, Json(json!({ "error": message }))).into_response()
  }
}
