//! Handlers for `/programs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/programs` | Full program list, insertion order |
//! | `GET`  | `/programs/options` | Cascading dropdown options for a selection |
//! | `POST` | `/programs` | Body: [`RegistrationForm`]; returns 201 + program |
//! | `PUT`  | `/programs/:folio` | Body: [`UpdateForm`]; last write wins |
//! | `POST` | `/programs/:folio/close` | Body: [`CloseForm`]; returns 201 + closure |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use meriadock_core::{
  cascade::{ProgramDetails, Selection},
  catalog::ProgramCatalog,
  forms::program::{CloseForm, RegistrationForm, UpdateForm},
  program::Program,
  store::IntranetStore,
  submit,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /programs`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Program>>, ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let programs = store
    .list_programs()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(programs))
}

// ─── Options ──────────────────────────────────────────────────────────────────

/// Query parameters for the options endpoint. Empty strings mean "nothing
/// selected at this level yet".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptionsParams {
  pub direction:    String,
  pub coordination: String,
  pub folio:        String,
}

/// One response carries every dropdown a cascading page needs for the given
/// selection, plus the resolved program when the folio is known.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
  pub directions:    Vec<String>,
  pub coordinations: Vec<String>,
  pub folios:        Vec<String>,
  pub program_names: Vec<String>,
  pub program:       Option<ProgramDetails>,
}

/// `GET /programs/options[?direction=...][&coordination=...][&folio=...]`
pub async fn options<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<OptionsParams>,
) -> Json<OptionsResponse>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // A failed load serves empty option sets instead of an error; the page
  // stays usable and the next request retries.
  let catalog = match ProgramCatalog::load(store.as_ref()).await {
    Ok(catalog) => catalog,
    Err(e) => {
      tracing::warn!(error = %e, "program list unavailable, serving empty options");
      ProgramCatalog::default()
    }
  };

  let mut selection = Selection::new();
  selection.select_direction(&params.direction);
  selection.select_coordination(&params.coordination);
  selection.select_folio(&catalog, &params.folio);

  Json(OptionsResponse {
    directions:    catalog.directions(),
    coordinations: selection.coordination_options(&catalog),
    folios:        selection.folio_options(&catalog),
    program_names: selection.program_name_options(&catalog),
    program:       selection.details().cloned(),
  })
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /programs` — body: [`RegistrationForm`].
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(form): Json<RegistrationForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let program = submit::register_program(store.as_ref(), &form).await?;
  Ok((StatusCode::CREATED, Json(program)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /programs/:folio` — body: [`UpdateForm`].
///
/// The path names the target; any folio the body carries is ignored.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(folio): Path<String>,
  Json(mut form): Json<UpdateForm>,
) -> Result<StatusCode, ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  form.folio = folio;
  let catalog = ProgramCatalog::load(store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  submit::modify_program(store.as_ref(), &catalog, &form).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Close ────────────────────────────────────────────────────────────────────

/// `POST /programs/:folio/close` — body: [`CloseForm`].
pub async fn close<S>(
  State(store): State<Arc<S>>,
  Path(folio): Path<String>,
  Json(mut form): Json<CloseForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  form.folio = folio;
  let catalog = ProgramCatalog::load(store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let closure = submit::close_program(store.as_ref(), &catalog, &form).await?;
  Ok((StatusCode::CREATED, Json(closure)))
}
