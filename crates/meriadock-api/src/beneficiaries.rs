//! Handlers for `/beneficiaries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/beneficiaries` | Body: [`SupportForm`]; returns 201 + row |
//! | `POST` | `/beneficiaries/attendance` | Body: [`AttendanceForm`] |
//! | `GET`  | `/beneficiaries/names` | `?program_id` required; picklist names |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use meriadock_core::{
  beneficiary::Beneficiary,
  catalog::ProgramCatalog,
  forms::beneficiary::{AttendanceForm, SupportForm},
  program::ProgramId,
  store::IntranetStore,
  submit,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Support ──────────────────────────────────────────────────────────────────

/// `POST /beneficiaries` — body: [`SupportForm`].
pub async fn register_support<S>(
  State(store): State<Arc<S>>,
  Json(form): Json<SupportForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let catalog = ProgramCatalog::load(store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let beneficiary =
    submit::register_support(store.as_ref(), &catalog, &form).await?;
  Ok((StatusCode::CREATED, Json(beneficiary)))
}

// ─── Attendance ───────────────────────────────────────────────────────────────

/// `POST /beneficiaries/attendance` — body: [`AttendanceForm`].
pub async fn record_attendance<S>(
  State(store): State<Arc<S>>,
  Json(form): Json<AttendanceForm>,
) -> Result<(StatusCode, Json<Beneficiary>), ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let catalog = ProgramCatalog::load(store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let beneficiary =
    submit::record_attendance(store.as_ref(), &catalog, &form).await?;
  Ok((StatusCode::CREATED, Json(beneficiary)))
}

// ─── Names ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NamesParams {
  pub program_id: ProgramId,
}

/// `GET /beneficiaries/names?program_id=<id>`
pub async fn names<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<NamesParams>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let names = store
    .list_beneficiary_names(params.program_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(names))
}
