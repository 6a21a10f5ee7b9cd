//! Submission pipelines: validate, resolve, then write in order.
//!
//! Every pipeline follows the same sequence. Presence and format checks run
//! first and never touch the store. Foreign-key resolution runs against the
//! loaded catalog, not the store. Only then are the writes issued, one
//! after another, each attempted exactly once.
//!
//! The two-step pipelines (registration, closure) are not transactions: the
//! store writes each row independently. When the second write fails the
//! pipeline compensates by deleting the first row; if even the delete
//! fails, the orphan is reported in the error instead of being hidden.

use thiserror::Error;
use uuid::Uuid;

use crate::{
  beneficiary::{Beneficiary, NewBeneficiary},
  catalog::ProgramCatalog,
  closure::ClosureRecord,
  forms::{
    beneficiary::{AttendanceForm, SupportForm},
    interaction::LogForm,
    program::{CloseForm, RegistrationForm, UpdateForm},
  },
  interaction::{Interaction, NewInteraction},
  program::Program,
  store::IntranetStore,
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why a submission did not land.
#[derive(Debug, Error)]
pub enum SubmitError {
  /// A required field is empty. Raised before anything touches the store.
  #[error("required field `{field}` is empty")]
  MissingField { field: &'static str },

  /// A field is present but does not parse into its typed form. Also
  /// raised before anything touches the store.
  #[error("field `{field}` is invalid: {reason}")]
  InvalidField {
    field:  &'static str,
    reason: String,
  },

  /// The selected folio is not in the loaded program list.
  #[error("folio {folio:?} is not registered")]
  FolioNotRegistered { folio: String },

  /// The direction/coordination/name triple does not pick out a program.
  #[error("the selection does not resolve to a program")]
  ProgramNotResolved,

  /// A store call failed. The detail goes to the diagnostic log; operators
  /// see a generic message.
  #[error("store error: {0}")]
  Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The second write of a two-step sequence failed and the compensating
  /// delete failed too, so the first row survives with no counterpart.
  #[error("orphaned {relation} row {id} left behind: {source}")]
  PartialWrite {
    relation: &'static str,
    id:       i64,
    #[source]
    source:   Box<dyn std::error::Error + Send + Sync>,
  },
}

impl SubmitError {
  fn remote<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Remote(Box::new(err))
  }

  /// Short tag for logs and API payloads.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::MissingField { .. } => "missing_field",
      Self::InvalidField { .. } => "invalid_field",
      Self::FolioNotRegistered { .. } => "folio_not_registered",
      Self::ProgramNotResolved => "program_not_resolved",
      Self::Remote(_) => "remote",
      Self::PartialWrite { .. } => "partial_write",
    }
  }

  /// The field a validation error names, if any.
  pub fn field(&self) -> Option<&'static str> {
    match self {
      Self::MissingField { field }
      | Self::InvalidField { field, .. } => Some(field),
      _ => None,
    }
  }

  /// Whether a row may already be visible to other operators.
  pub fn left_orphan(&self) -> bool {
    matches!(self, Self::PartialWrite { .. })
  }

  /// The message shown to the operator. A partial write reads exactly like
  /// any other save failure; the orphan detail stays in the logs.
  pub fn user_message(&self) -> String {
    match self {
      Self::MissingField { field } => {
        format!("Please complete the {field} field.")
      }
      Self::InvalidField { field, .. } => {
        format!("The {field} field is not valid.")
      }
      Self::FolioNotRegistered { .. } => {
        "The program folio is not registered.".to_string()
      }
      Self::ProgramNotResolved => {
        "The selected program could not be determined.".to_string()
      }
      Self::Remote(_) | Self::PartialWrite { .. } => {
        "Could not save the record. Please try again.".to_string()
      }
    }
  }
}

fn resolve_folio<'a>(
  catalog: &'a ProgramCatalog,
  folio: &str,
) -> Result<&'a Program, SubmitError> {
  catalog.resolve_folio(folio).ok_or_else(|| {
    SubmitError::FolioNotRegistered { folio: folio.to_string() }
  })
}

// ─── Program pipelines ───────────────────────────────────────────────────────

/// Register a program: insert the program row, then its planning row.
///
/// When the planning insert fails the fresh program row is deleted again;
/// if that delete also fails, the error names the surviving orphan.
pub async fn register_program<S: IntranetStore>(
  store: &S,
  form: &RegistrationForm,
) -> Result<Program, SubmitError> {
  let payload = form.validate()?;

  let program = store
    .insert_program(payload.program)
    .await
    .map_err(SubmitError::remote)?;

  match store
    .insert_planning(payload.planning.for_program(program.id))
    .await
  {
    Ok(_) => Ok(program),
    Err(second) => match store.delete_program(program.id).await {
      Ok(()) => Err(SubmitError::remote(second)),
      Err(_) => Err(SubmitError::PartialWrite {
        relation: "programas",
        id:       program.id,
        source:   Box::new(second),
      }),
    },
  }
}

/// Apply the modification form to the program its folio names.
/// Last write wins; concurrent edits are not detected.
pub async fn modify_program<S: IntranetStore>(
  store: &S,
  catalog: &ProgramCatalog,
  form: &UpdateForm,
) -> Result<(), SubmitError> {
  let payload = form.validate()?;
  resolve_folio(catalog, &payload.folio)?;

  store
    .update_program(&payload.folio, payload.changes)
    .await
    .map_err(SubmitError::remote)
}

/// Close a program: insert the results row, then the closure row.
///
/// Same compensation rule as registration, with the results row as the
/// potential orphan.
pub async fn close_program<S: IntranetStore>(
  store: &S,
  catalog: &ProgramCatalog,
  form: &CloseForm,
) -> Result<ClosureRecord, SubmitError> {
  let payload = form.validate()?;
  let program = resolve_folio(catalog, &payload.folio)?;

  let results = store
    .insert_results(payload.results.for_program(program.id))
    .await
    .map_err(SubmitError::remote)?;

  match store.insert_closure(payload.closure.for_program(program.id)).await {
    Ok(closure) => Ok(closure),
    Err(second) => match store.delete_results(results.id).await {
      Ok(()) => Err(SubmitError::remote(second)),
      Err(_) => Err(SubmitError::PartialWrite {
        relation: "programa_resultados",
        id:       results.id,
        source:   Box::new(second),
      }),
    },
  }
}

// ─── Beneficiary pipelines ───────────────────────────────────────────────────

/// Register a beneficiary and the support they received.
pub async fn register_support<S: IntranetStore>(
  store: &S,
  catalog: &ProgramCatalog,
  form: &SupportForm,
) -> Result<Beneficiary, SubmitError> {
  let payload = form.validate()?;
  let program = resolve_folio(catalog, &payload.folio)?;

  store
    .insert_beneficiary(NewBeneficiary::support(
      program.id,
      payload.beneficiary_name,
      payload.support_type,
    ))
    .await
    .map_err(SubmitError::remote)
}

/// Record that a beneficiary concluded the program, with their certificate
/// details.
pub async fn record_attendance<S: IntranetStore>(
  store: &S,
  catalog: &ProgramCatalog,
  form: &AttendanceForm,
) -> Result<Beneficiary, SubmitError> {
  let payload = form.validate()?;
  let program = resolve_folio(catalog, &payload.folio)?;

  store
    .insert_beneficiary(NewBeneficiary::attendance(
      program.id,
      payload.beneficiary_name,
      payload.completion,
      payload.certificate_folio,
      payload.certificate_date,
    ))
    .await
    .map_err(SubmitError::remote)
}

// ─── Interaction pipeline ────────────────────────────────────────────────────

/// Log an interaction for the signed-in operator. The program is picked out
/// by its direction/coordination/name triple rather than by folio.
pub async fn log_interaction<S: IntranetStore>(
  store: &S,
  catalog: &ProgramCatalog,
  user_id: Uuid,
  form: &LogForm,
) -> Result<Interaction, SubmitError> {
  let payload = form.validate()?;

  let program = catalog
    .resolve_named(
      &payload.direction,
      &payload.coordination,
      &payload.program_name,
    )
    .ok_or(SubmitError::ProgramNotResolved)?;

  store
    .insert_interaction(NewInteraction {
      user_id,
      program_id: program.id,
      interaction_type: payload.interaction_type,
      beneficiary_name: payload.beneficiary_name,
      session_number: payload.session_number,
      notes: payload.notes,
    })
    .await
    .map_err(SubmitError::remote)
}
