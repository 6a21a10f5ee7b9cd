//! Handler for `POST /interactions`.
//!
//! The row is attributed to the signed-in operator: the user id comes from
//! the request's [`SessionContext`] extension, never from the body.

use std::sync::Arc;

use axum::{
  Extension, Json, extract::State, http::StatusCode, response::IntoResponse,
};
use meriadock_core::{
  catalog::ProgramCatalog,
  forms::interaction::LogForm,
  session::SessionContext,
  store::IntranetStore,
  submit,
};

use crate::error::ApiError;

/// `POST /interactions` — body: [`LogForm`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Extension(ctx): Extension<SessionContext>,
  Json(form): Json<LogForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let catalog = ProgramCatalog::load(store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let interaction =
    submit::log_interaction(store.as_ref(), &catalog, ctx.user.user_id, &form)
      .await?;
  Ok((StatusCode::CREATED, Json(interaction)))
}
