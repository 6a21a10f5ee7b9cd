//! Beneficiary rows — two shapes, one table.
//!
//! The supervisor pages write beneficiary rows in two distinct shapes:
//! a support registration (name plus support type) and an attendance record
//! (name plus certificate details). Both land in the same relation, so every
//! column beyond the name is optional here and each shape has its own
//! constructor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, program::ProgramId};

// ─── Support type ────────────────────────────────────────────────────────────

/// The kind of support a beneficiary receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportType {
  #[serde(rename = "Formativo")]
  Formative,
  #[serde(rename = "Social")]
  Social,
  #[serde(rename = "Económico")]
  Economic,
  #[serde(rename = "En especie")]
  InKind,
}

impl SupportType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Formative => "Formativo",
      Self::Social => "Social",
      Self::Economic => "Económico",
      Self::InKind => "En especie",
    }
  }
}

impl std::str::FromStr for SupportType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "Formativo" => Ok(Self::Formative),
      "Social" => Ok(Self::Social),
      "Económico" => Ok(Self::Economic),
      "En especie" => Ok(Self::InKind),
      other => Err(Error::UnknownSupportType(other.to_string())),
    }
  }
}

// ─── Completion ──────────────────────────────────────────────────────────────

/// Whether the beneficiary concluded the program. Stored as the unaccented
/// `"Si"` / `"No"` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
  #[serde(rename = "Si")]
  Concluded,
  #[serde(rename = "No")]
  NotConcluded,
}

impl Completion {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Concluded => "Si",
      Self::NotConcluded => "No",
    }
  }
}

impl std::str::FromStr for Completion {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "Si" => Ok(Self::Concluded),
      "No" => Ok(Self::NotConcluded),
      other => Err(Error::UnknownCompletion(other.to_string())),
    }
  }
}

// ─── Beneficiary ─────────────────────────────────────────────────────────────

/// A row in the beneficiary relation. Which optional columns are populated
/// depends on which form wrote the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
  pub id:                i64,
  pub program_id:        ProgramId,
  pub name:              String,
  pub support_type:      Option<SupportType>,
  pub completion:        Option<Completion>,
  pub certificate_folio: Option<String>,
  pub certificate_date:  Option<NaiveDate>,
}

/// Input to [`crate::store::IntranetStore::insert_beneficiary`].
#[derive(Debug, Clone)]
pub struct NewBeneficiary {
  pub program_id:        ProgramId,
  pub name:              String,
  pub support_type:      Option<SupportType>,
  pub completion:        Option<Completion>,
  pub certificate_folio: Option<String>,
  pub certificate_date:  Option<NaiveDate>,
}

impl NewBeneficiary {
  /// The support-registration shape: name and support type only.
  pub fn support(
    program_id: ProgramId,
    name: String,
    support_type: SupportType,
  ) -> Self {
    Self {
      program_id,
      name,
      support_type: Some(support_type),
      completion: None,
      certificate_folio: None,
      certificate_date: None,
    }
  }

  /// The attendance shape: completion status and certificate details.
  pub fn attendance(
    program_id: ProgramId,
    name: String,
    completion: Completion,
    certificate_folio: Option<String>,
    certificate_date: NaiveDate,
  ) -> Self {
    Self {
      program_id,
      name,
      support_type: None,
      completion: Some(completion),
      certificate_folio,
      certificate_date: Some(certificate_date),
    }
  }
}
