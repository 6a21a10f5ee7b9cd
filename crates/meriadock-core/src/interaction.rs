//! Interaction log rows — per-session contact between staff and a
//! beneficiary, attributed to the signed-in operator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, program::ProgramId};

// ─── Interaction type ────────────────────────────────────────────────────────

/// The kind of contact being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionType {
  #[serde(rename = "Orientación")]
  Orientation,
  #[serde(rename = "Sesión formativa")]
  FormativeSession,
  #[serde(rename = "Entrega de apoyo")]
  AidDelivery,
  #[serde(rename = "Taller")]
  Workshop,
}

impl InteractionType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Orientation => "Orientación",
      Self::FormativeSession => "Sesión formativa",
      Self::AidDelivery => "Entrega de apoyo",
      Self::Workshop => "Taller",
    }
  }
}

impl std::str::FromStr for InteractionType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "Orientación" => Ok(Self::Orientation),
      "Sesión formativa" => Ok(Self::FormativeSession),
      "Entrega de apoyo" => Ok(Self::AidDelivery),
      "Taller" => Ok(Self::Workshop),
      other => Err(Error::UnknownInteractionType(other.to_string())),
    }
  }
}

// ─── Interaction ─────────────────────────────────────────────────────────────

/// A logged interaction. `user_id` is the operator who recorded it, taken
/// from the session, never from the form body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
  pub id:               i64,
  pub user_id:          Uuid,
  pub program_id:       ProgramId,
  pub interaction_type: InteractionType,
  pub beneficiary_name: String,
  /// Free text in the source data, e.g. `"3"` or `"3 de 5"`.
  pub session_number:   String,
  pub notes:            Option<String>,
}

/// Input to [`crate::store::IntranetStore::insert_interaction`].
#[derive(Debug, Clone)]
pub struct NewInteraction {
  pub user_id:          Uuid,
  pub program_id:       ProgramId,
  pub interaction_type: InteractionType,
  pub beneficiary_name: String,
  pub session_number:   String,
  pub notes:            Option<String>,
}
