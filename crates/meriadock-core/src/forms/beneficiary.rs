//! The two supervisor-side beneficiary forms.
//!
//! Both write to the same relation in different shapes: `SupportForm`
//! records what a beneficiary received, `AttendanceForm` records that they
//! concluded and got (or will get) their certificate.

use serde::{Deserialize, Serialize};

use super::{FormReset, optional, parse_date, parse_literal, require};
use crate::{
  beneficiary::{Completion, SupportType},
  submit::SubmitError,
};

// ─── Support registration ────────────────────────────────────────────────────

/// Registers one beneficiary and the support they received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportForm {
  pub direction:        String,
  pub coordination:     String,
  pub folio:            String,
  /// Derived from the resolved program; shown read-only, never written.
  pub program_name:     String,
  pub beneficiary_name: String,
  pub support_type:     String,
}

/// A validated support registration, still keyed by folio.
#[derive(Debug, Clone)]
pub struct SupportPayload {
  pub folio:            String,
  pub beneficiary_name: String,
  pub support_type:     SupportType,
}

impl SupportForm {
  pub fn validate(&self) -> Result<SupportPayload, SubmitError> {
    require("direction", &self.direction)?;
    require("coordination", &self.coordination)?;
    require("folio", &self.folio)?;
    require("beneficiary_name", &self.beneficiary_name)?;
    require("support_type", &self.support_type)?;

    let support_type = parse_literal("support_type", &self.support_type)?;

    Ok(SupportPayload {
      folio: self.folio.clone(),
      // Names are stored trimmed so the attendance picklist matches them.
      beneficiary_name: self.beneficiary_name.trim().to_string(),
      support_type,
    })
  }
}

impl FormReset for SupportForm {
  fn reset_after_submit(&mut self) {
    *self = Self::default();
  }
}

// ─── Attendance ──────────────────────────────────────────────────────────────

/// Records that a beneficiary already registered under a program concluded
/// it, with the certificate details. The name comes from a picklist of
/// names recorded for the resolved program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceForm {
  pub direction:         String,
  pub coordination:      String,
  pub folio:             String,
  /// Derived from the resolved program; shown read-only, never written.
  pub program_name:      String,
  /// Derived from the resolved program; shown read-only, never written.
  pub certificate_type:  String,
  pub beneficiary_name:  String,
  pub completion:        String,
  pub certificate_folio: String,
  pub certificate_date:  String,
}

/// A validated attendance record, still keyed by folio.
#[derive(Debug, Clone)]
pub struct AttendancePayload {
  pub folio:             String,
  pub beneficiary_name:  String,
  pub completion:        Completion,
  pub certificate_folio: Option<String>,
  pub certificate_date:  chrono::NaiveDate,
}

impl AttendanceForm {
  pub fn validate(&self) -> Result<AttendancePayload, SubmitError> {
    require("folio", &self.folio)?;
    require("beneficiary_name", &self.beneficiary_name)?;
    require("certificate_date", &self.certificate_date)?;
    require("completion", &self.completion)?;

    let completion = parse_literal("completion", &self.completion)?;
    let certificate_date =
      parse_date("certificate_date", &self.certificate_date)?;

    Ok(AttendancePayload {
      folio: self.folio.clone(),
      beneficiary_name: self.beneficiary_name.clone(),
      completion,
      certificate_folio: optional(&self.certificate_folio),
      certificate_date,
    })
  }
}

impl FormReset for AttendanceForm {
  /// Keeps the program selection; the supervisor typically marks several
  /// beneficiaries of the same program in a row.
  fn reset_after_submit(&mut self) {
    self.beneficiary_name.clear();
    self.completion.clear();
    self.certificate_folio.clear();
    self.certificate_date.clear();
  }
}
