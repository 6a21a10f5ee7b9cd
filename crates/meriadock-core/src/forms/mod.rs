//! Typed form records for the intranet's entry pages.
//!
//! Every form is an explicit struct with named fields; required-field
//! checks are exhaustive over the struct, never driven by a key-value bag.
//! String fields hold the raw operator input. `validate()` checks presence
//! in page order, then parses the typed fields, and reports the first
//! problem found — nothing is written anywhere until it passes.

use chrono::NaiveDate;

use crate::submit::SubmitError;

pub mod beneficiary;
pub mod interaction;
pub mod program;

// ─── Submission flags ────────────────────────────────────────────────────────

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
  #[default]
  Idle,
  Submitting,
  Succeeded,
  /// Holds the human-readable message shown to the operator.
  Failed(String),
}

/// What each form clears once a submission lands. Single-record pages clear
/// everything; the multi-entry pages keep their filter selection so the
/// operator can log the next record against the same program.
pub trait FormReset {
  fn reset_after_submit(&mut self);
}

/// A form bundled with its submission flags.
#[derive(Debug, Clone, Default)]
pub struct FormState<F> {
  pub form:   F,
  pub status: FormStatus,
}

impl<F: FormReset> FormState<F> {
  pub fn new(form: F) -> Self {
    Self { form, status: FormStatus::Idle }
  }

  pub fn begin_submit(&mut self) {
    self.status = FormStatus::Submitting;
  }

  /// A submission landed: apply the form's reset policy and flag success.
  pub fn succeed(&mut self) {
    self.form.reset_after_submit();
    self.status = FormStatus::Succeeded;
  }

  /// A submission failed: keep every field intact for correction.
  pub fn fail(&mut self, message: impl Into<String>) {
    self.status = FormStatus::Failed(message.into());
  }
}

// ─── Field helpers ───────────────────────────────────────────────────────────

/// Presence check: whitespace-only counts as empty.
pub(crate) fn require(
  field: &'static str,
  value: &str,
) -> Result<(), SubmitError> {
  if value.trim().is_empty() {
    Err(SubmitError::MissingField { field })
  } else {
    Ok(())
  }
}

/// An optional free-text field: blank collapses to `None`.
pub(crate) fn optional(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Parse an ISO `YYYY-MM-DD` date, as the date inputs submit it.
pub(crate) fn parse_date(
  field: &'static str,
  value: &str,
) -> Result<NaiveDate, SubmitError> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
    SubmitError::InvalidField { field, reason: e.to_string() }
  })
}

/// Parse one of the fixed dropdown literals into its enum.
pub(crate) fn parse_literal<T>(
  field: &'static str,
  value: &str,
) -> Result<T, SubmitError>
where
  T: std::str::FromStr<Err = crate::Error>,
{
  value.trim().parse().map_err(|e: crate::Error| {
    SubmitError::InvalidField { field, reason: e.to_string() }
  })
}
