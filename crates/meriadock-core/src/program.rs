//! Program records — the entity every intranet form keys on.
//!
//! A program carries two identifiers: a store-assigned integer `id` used for
//! foreign keys, and a human-assigned `folio` code that operators type and
//! select. Forms never expose the integer id; every lookup an operator drives
//! goes through the folio or the direction/coordination/name triple.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned integer identity for a program row.
pub type ProgramId = i64;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether a program is currently operating. The wire and database literals
/// are the original Spanish values; variant names are the English reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramStatus {
  #[serde(rename = "Activo")]
  Active,
  #[serde(rename = "Suspendido")]
  Suspended,
}

impl ProgramStatus {
  /// The literal stored in the `estado` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Active => "Activo",
      Self::Suspended => "Suspendido",
    }
  }
}

impl std::str::FromStr for ProgramStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "Activo" => Ok(Self::Active),
      "Suspendido" => Ok(Self::Suspended),
      other => Err(Error::UnknownProgramStatus(other.to_string())),
    }
  }
}

// ─── Certificate type ────────────────────────────────────────────────────────

/// The certificate a program issues to its beneficiaries. The codes are an
/// organisational taxonomy; they are stored and displayed verbatim, so the
/// variant names are the codes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum CertificateType {
  CF,
  CC,
  CA,
  CP,
  CFP,
  CM,
  CE,
  CO,
}

impl CertificateType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::CF => "CF",
      Self::CC => "CC",
      Self::CA => "CA",
      Self::CP => "CP",
      Self::CFP => "CFP",
      Self::CM => "CM",
      Self::CE => "CE",
      Self::CO => "CO",
    }
  }
}

impl std::str::FromStr for CertificateType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "CF" => Ok(Self::CF),
      "CC" => Ok(Self::CC),
      "CA" => Ok(Self::CA),
      "CP" => Ok(Self::CP),
      "CFP" => Ok(Self::CFP),
      "CM" => Ok(Self::CM),
      "CE" => Ok(Self::CE),
      "CO" => Ok(Self::CO),
      other => Err(Error::UnknownCertificateType(other.to_string())),
    }
  }
}

// ─── Program ─────────────────────────────────────────────────────────────────

/// A registered program. The `folio` is unique across the table; the integer
/// `id` is what dependent rows reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
  pub id:               ProgramId,
  pub folio:            String,
  pub name:             String,
  pub direction:        String,
  pub coordination:     String,
  pub status:           ProgramStatus,
  pub certificate_type: CertificateType,
  pub responsible:      String,
  pub notes:            String,
}

/// Input to [`crate::store::IntranetStore::insert_program`].
/// The `id` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewProgram {
  pub folio:            String,
  pub name:             String,
  pub direction:        String,
  pub coordination:     String,
  pub status:           ProgramStatus,
  pub certificate_type: CertificateType,
  pub responsible:      String,
  pub notes:            String,
}

/// The fields the modification form may change on an existing program.
/// Applied by folio; the folio itself and the program name never change.
#[derive(Debug, Clone)]
pub struct ProgramUpdate {
  pub direction:    String,
  pub coordination: String,
  pub status:       ProgramStatus,
  pub responsible:  String,
  pub notes:        String,
}

// ─── Planning ────────────────────────────────────────────────────────────────

/// The planning row recorded alongside a program at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planning {
  pub id:                     i64,
  pub program_id:             ProgramId,
  pub start_date:             NaiveDate,
  pub end_date:               Option<NaiveDate>,
  pub objective:              String,
  pub activities:             String,
  /// Free text in the source data; kept as entered, never parsed.
  pub expected_beneficiaries: String,
}

/// Input to [`crate::store::IntranetStore::insert_planning`].
#[derive(Debug, Clone)]
pub struct NewPlanning {
  pub program_id:             ProgramId,
  pub start_date:             NaiveDate,
  pub end_date:               Option<NaiveDate>,
  pub objective:              String,
  pub activities:             String,
  pub expected_beneficiaries: String,
}

/// The validated planning half of a registration, before the program row
/// exists. [`PlanningFields::for_program`] binds it to the id the first
/// insert returned.
#[derive(Debug, Clone)]
pub struct PlanningFields {
  pub start_date:             NaiveDate,
  pub end_date:               Option<NaiveDate>,
  pub objective:              String,
  pub activities:             String,
  pub expected_beneficiaries: String,
}

impl PlanningFields {
  pub fn for_program(self, program_id: ProgramId) -> NewPlanning {
    NewPlanning {
      program_id,
      start_date: self.start_date,
      end_date: self.end_date,
      objective: self.objective,
      activities: self.activities,
      expected_beneficiaries: self.expected_beneficiaries,
    }
  }
}
