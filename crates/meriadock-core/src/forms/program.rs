//! The three council-side program forms: registration, modification, and
//! closure.

use serde::{Deserialize, Serialize};

use super::{FormReset, optional, parse_date, parse_literal, require};
use crate::{
  closure::{ClosureFields, ResultsFields},
  program::{NewProgram, PlanningFields, ProgramUpdate},
  submit::SubmitError,
};

// ─── Registration ────────────────────────────────────────────────────────────

/// The registration page. One submission creates the program row and its
/// planning row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
  pub direction:              String,
  pub coordination:           String,
  pub name:                   String,
  pub status:                 String,
  pub certificate_type:       String,
  pub folio:                  String,
  pub responsible:            String,
  pub notes:                  String,
  pub expected_beneficiaries: String,
  pub start_date:             String,
  pub end_date:               String,
  pub objective:              String,
  pub activities:             String,
}

impl Default for RegistrationForm {
  fn default() -> Self {
    Self {
      direction: String::new(),
      coordination: String::new(),
      name: String::new(),
      // The status dropdown starts on "Activo", not on a blank row.
      status: "Activo".to_string(),
      certificate_type: String::new(),
      folio: String::new(),
      responsible: String::new(),
      notes: String::new(),
      expected_beneficiaries: String::new(),
      start_date: String::new(),
      end_date: String::new(),
      objective: String::new(),
      activities: String::new(),
    }
  }
}

/// A validated registration: the program row plus the planning fields that
/// will reference it once the program id exists.
#[derive(Debug, Clone)]
pub struct RegistrationPayload {
  pub program:  NewProgram,
  pub planning: PlanningFields,
}

impl RegistrationForm {
  pub fn validate(&self) -> Result<RegistrationPayload, SubmitError> {
    require("direction", &self.direction)?;
    require("coordination", &self.coordination)?;
    require("name", &self.name)?;
    require("status", &self.status)?;
    require("certificate_type", &self.certificate_type)?;
    require("folio", &self.folio)?;
    require("responsible", &self.responsible)?;
    require("start_date", &self.start_date)?;
    require("objective", &self.objective)?;
    require("activities", &self.activities)?;

    let status = parse_literal("status", &self.status)?;
    let certificate_type =
      parse_literal("certificate_type", &self.certificate_type)?;
    let start_date = parse_date("start_date", &self.start_date)?;
    let end_date = match optional(&self.end_date) {
      Some(raw) => Some(parse_date("end_date", &raw)?),
      None => None,
    };

    Ok(RegistrationPayload {
      program:  NewProgram {
        folio: self.folio.clone(),
        name: self.name.clone(),
        direction: self.direction.clone(),
        coordination: self.coordination.clone(),
        status,
        certificate_type,
        responsible: self.responsible.clone(),
        notes: self.notes.clone(),
      },
      planning: PlanningFields {
        start_date,
        end_date,
        objective: self.objective.clone(),
        activities: self.activities.clone(),
        expected_beneficiaries: self.expected_beneficiaries.clone(),
      },
    })
  }
}

impl FormReset for RegistrationForm {
  fn reset_after_submit(&mut self) {
    *self = Self::default();
  }
}

// ─── Modification ────────────────────────────────────────────────────────────

/// The modification page. Selecting a folio pre-fills the editable fields
/// from the current row; submission applies them back by folio, last write
/// wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateForm {
  pub direction:    String,
  pub coordination: String,
  pub folio:        String,
  /// Derived from the resolved program; shown read-only, never written.
  pub name:         String,
  pub status:       String,
  pub responsible:  String,
  pub notes:        String,
}

/// A validated modification: the target folio and the changes to apply.
#[derive(Debug, Clone)]
pub struct UpdatePayload {
  pub folio:   String,
  pub changes: ProgramUpdate,
}

impl UpdateForm {
  pub fn validate(&self) -> Result<UpdatePayload, SubmitError> {
    require("direction", &self.direction)?;
    require("coordination", &self.coordination)?;
    require("folio", &self.folio)?;
    require("status", &self.status)?;
    require("responsible", &self.responsible)?;

    let status = parse_literal("status", &self.status)?;

    Ok(UpdatePayload {
      folio:   self.folio.clone(),
      changes: ProgramUpdate {
        direction: self.direction.clone(),
        coordination: self.coordination.clone(),
        status,
        responsible: self.responsible.clone(),
        notes: self.notes.clone(),
      },
    })
  }
}

impl FormReset for UpdateForm {
  fn reset_after_submit(&mut self) {
    *self = Self::default();
  }
}

// ─── Closure ─────────────────────────────────────────────────────────────────

/// The closure page. One submission writes the results row and the closure
/// row for the resolved program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseForm {
  pub direction:             String,
  pub coordination:          String,
  pub folio:                 String,
  /// Derived from the resolved program; shown read-only, never written.
  pub name:                  String,
  pub beneficiaries_reached: String,
  pub results:               String,
  pub compliance:            String,
  pub recommendations:       String,
  pub closed_on:             String,
  pub closed_by:             String,
  pub reference_act:         String,
}

/// A validated closure: the target folio plus both rows' fields.
#[derive(Debug, Clone)]
pub struct ClosePayload {
  pub folio:   String,
  pub results: ResultsFields,
  pub closure: ClosureFields,
}

impl CloseForm {
  pub fn validate(&self) -> Result<ClosePayload, SubmitError> {
    require("direction", &self.direction)?;
    require("coordination", &self.coordination)?;
    require("folio", &self.folio)?;
    require("beneficiaries_reached", &self.beneficiaries_reached)?;
    require("results", &self.results)?;
    require("compliance", &self.compliance)?;
    require("closed_on", &self.closed_on)?;
    require("closed_by", &self.closed_by)?;
    require("reference_act", &self.reference_act)?;

    // The count arrives as free text; anything that is not a whole number
    // is rejected here instead of being written as garbage.
    let beneficiaries_reached = self
      .beneficiaries_reached
      .trim()
      .parse::<u32>()
      .map_err(|e| SubmitError::InvalidField {
        field:  "beneficiaries_reached",
        reason: e.to_string(),
      })?;
    let compliance = parse_literal("compliance", &self.compliance)?;
    let closed_on = parse_date("closed_on", &self.closed_on)?;

    Ok(ClosePayload {
      folio:   self.folio.clone(),
      results: ResultsFields {
        beneficiaries_reached,
        results: self.results.clone(),
        compliance,
        recommendations: self.recommendations.clone(),
      },
      closure: ClosureFields {
        closed_on,
        reference_act: self.reference_act.clone(),
        closed_by: self.closed_by.clone(),
      },
    })
  }
}

impl FormReset for CloseForm {
  fn reset_after_submit(&mut self) {
    *self = Self::default();
  }
}
