//! The operator-side interaction log form.
//!
//! Unlike the folio-driven pages, this one resolves its program by the
//! direction / coordination / name triple, and attributes the row to the
//! signed-in operator.

use serde::{Deserialize, Serialize};

use super::{FormReset, optional, parse_literal, require};
use crate::{interaction::InteractionType, submit::SubmitError};

/// Logs one contact session with a beneficiary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogForm {
  pub direction:        String,
  pub coordination:     String,
  pub program_name:     String,
  pub interaction_type: String,
  pub beneficiary_name: String,
  pub session_number:   String,
  pub notes:            String,
}

/// A validated log entry, still keyed by the selection triple. The acting
/// user is not part of the form; the pipeline takes it from the session.
#[derive(Debug, Clone)]
pub struct LogPayload {
  pub direction:        String,
  pub coordination:     String,
  pub program_name:     String,
  pub interaction_type: InteractionType,
  pub beneficiary_name: String,
  pub session_number:   String,
  pub notes:            Option<String>,
}

impl LogForm {
  pub fn validate(&self) -> Result<LogPayload, SubmitError> {
    require("program_name", &self.program_name)?;
    require("interaction_type", &self.interaction_type)?;
    require("beneficiary_name", &self.beneficiary_name)?;
    require("session_number", &self.session_number)?;

    let interaction_type =
      parse_literal("interaction_type", &self.interaction_type)?;

    Ok(LogPayload {
      direction: self.direction.clone(),
      coordination: self.coordination.clone(),
      program_name: self.program_name.clone(),
      interaction_type,
      beneficiary_name: self.beneficiary_name.clone(),
      session_number: self.session_number.clone(),
      notes: optional(&self.notes),
    })
  }
}

impl FormReset for LogForm {
  /// Keeps the selection triple; operators log several interactions against
  /// the same program in one sitting.
  fn reset_after_submit(&mut self) {
    self.interaction_type.clear();
    self.beneficiary_name.clear();
    self.session_number.clear();
    self.notes.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::forms::FormState;

  fn filled() -> LogForm {
    LogForm {
      direction: "Dirección Social".into(),
      coordination: "Coordinación Norte".into(),
      program_name: "Alfabetización".into(),
      interaction_type: "Taller".into(),
      beneficiary_name: "Ana López".into(),
      session_number: "3".into(),
      notes: String::new(),
    }
  }

  #[test]
  fn log_validates_the_interaction_type_literal() {
    let payload = filled().validate().unwrap();
    assert_eq!(payload.interaction_type, InteractionType::Workshop);
    assert!(payload.notes.is_none());
  }

  #[test]
  fn log_requires_a_session_number() {
    let mut form = filled();
    form.session_number.clear();

    match form.validate() {
      Err(SubmitError::MissingField { field }) => {
        assert_eq!(field, "session_number");
      }
      other => panic!("expected missing field, got {other:?}"),
    }
  }

  #[test]
  fn blank_notes_collapse_to_none() {
    let mut form = filled();
    form.notes = "   ".into();
    assert!(form.validate().unwrap().notes.is_none());

    form.notes = "se entregó material".into();
    assert_eq!(
      form.validate().unwrap().notes.as_deref(),
      Some("se entregó material")
    );
  }

  #[test]
  fn reset_keeps_the_selection_triple() {
    let mut state = FormState::new(filled());
    state.begin_submit();
    state.succeed();

    assert_eq!(state.form.direction, "Dirección Social");
    assert_eq!(state.form.coordination, "Coordinación Norte");
    assert_eq!(state.form.program_name, "Alfabetización");
    assert!(state.form.interaction_type.is_empty());
    assert!(state.form.beneficiary_name.is_empty());
    assert!(state.form.session_number.is_empty());
    assert!(state.form.notes.is_empty());
  }
}
