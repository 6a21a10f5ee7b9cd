//! Results and closure records — the paired rows written when a program ends.
//!
//! Closing a program writes two rows keyed on the program id: a results row
//! (what the program achieved) and a closure row (the administrative act).
//! The submission pipeline writes them in that order and compensates if the
//! second write fails.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, program::ProgramId};

// ─── Goal compliance ─────────────────────────────────────────────────────────

/// Whether the program met its goals. Stored literals are the original
/// Spanish values, including the unaccented `"Si"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalCompliance {
  #[serde(rename = "Si")]
  Met,
  #[serde(rename = "No")]
  NotMet,
  #[serde(rename = "Parcial")]
  Partial,
}

impl GoalCompliance {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Met => "Si",
      Self::NotMet => "No",
      Self::Partial => "Parcial",
    }
  }
}

impl std::str::FromStr for GoalCompliance {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "Si" => Ok(Self::Met),
      "No" => Ok(Self::NotMet),
      "Parcial" => Ok(Self::Partial),
      other => Err(Error::UnknownGoalCompliance(other.to_string())),
    }
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// The outcomes row written during program closure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsRecord {
  pub id:                    i64,
  pub program_id:            ProgramId,
  pub beneficiaries_reached: u32,
  pub results:               String,
  pub compliance:            GoalCompliance,
  pub recommendations:       String,
}

/// Input to [`crate::store::IntranetStore::insert_results`].
#[derive(Debug, Clone)]
pub struct NewResults {
  pub program_id:            ProgramId,
  pub beneficiaries_reached: u32,
  pub results:               String,
  pub compliance:            GoalCompliance,
  pub recommendations:       String,
}

/// Validated results fields before the target program is resolved.
#[derive(Debug, Clone)]
pub struct ResultsFields {
  pub beneficiaries_reached: u32,
  pub results:               String,
  pub compliance:            GoalCompliance,
  pub recommendations:       String,
}

impl ResultsFields {
  pub fn for_program(self, program_id: ProgramId) -> NewResults {
    NewResults {
      program_id,
      beneficiaries_reached: self.beneficiaries_reached,
      results: self.results,
      compliance: self.compliance,
      recommendations: self.recommendations,
    }
  }
}

// ─── Closure ─────────────────────────────────────────────────────────────────

/// The administrative closure row: when the program closed, under which act,
/// and who signed it off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureRecord {
  pub id:            i64,
  pub program_id:    ProgramId,
  pub closed_on:     NaiveDate,
  pub reference_act: String,
  pub closed_by:     String,
}

/// Input to [`crate::store::IntranetStore::insert_closure`].
#[derive(Debug, Clone)]
pub struct NewClosure {
  pub program_id:    ProgramId,
  pub closed_on:     NaiveDate,
  pub reference_act: String,
  pub closed_by:     String,
}

/// Validated closure fields before the target program is resolved.
#[derive(Debug, Clone)]
pub struct ClosureFields {
  pub closed_on:     NaiveDate,
  pub reference_act: String,
  pub closed_by:     String,
}

impl ClosureFields {
  pub fn for_program(self, program_id: ProgramId) -> NewClosure {
    NewClosure {
      program_id,
      closed_on: self.closed_on,
      reference_act: self.reference_act,
      closed_by: self.closed_by,
    }
  }
}
