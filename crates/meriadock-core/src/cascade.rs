//! Cascading selection for the direction → coordination → folio chain.
//!
//! Every selection-driven page shares one rule: changing an upstream field
//! clears every downstream field and any derived read-only values in the
//! same step. A folio click resolves the program and exposes its details;
//! an unresolvable folio leaves the details blank rather than failing.

use serde::{Deserialize, Serialize};

use crate::{
  catalog::ProgramCatalog,
  program::{CertificateType, Program, ProgramId, ProgramStatus},
};

// ─── Derived details ─────────────────────────────────────────────────────────

/// Read-only fields shown once a folio resolves. A superset of what any one
/// page displays; each page picks the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDetails {
  pub id:               ProgramId,
  pub name:             String,
  pub status:           ProgramStatus,
  pub certificate_type: CertificateType,
  pub responsible:      String,
  pub notes:            String,
}

impl From<&Program> for ProgramDetails {
  fn from(p: &Program) -> Self {
    Self {
      id: p.id,
      name: p.name.clone(),
      status: p.status,
      certificate_type: p.certificate_type,
      responsible: p.responsible.clone(),
      notes: p.notes.clone(),
    }
  }
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// The current position in the selection chain. An empty string from a
/// dropdown means "nothing selected" and is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
  direction:    Option<String>,
  coordination: Option<String>,
  folio:        Option<String>,
  details:      Option<ProgramDetails>,
}

impl Selection {
  pub fn new() -> Self { Self::default() }

  pub fn direction(&self) -> Option<&str> { self.direction.as_deref() }

  pub fn coordination(&self) -> Option<&str> { self.coordination.as_deref() }

  pub fn folio(&self) -> Option<&str> { self.folio.as_deref() }

  pub fn details(&self) -> Option<&ProgramDetails> { self.details.as_ref() }

  /// Pick a direction. Clears the coordination, the folio, and the details.
  pub fn select_direction(&mut self, direction: &str) {
    self.direction = normalize(direction);
    self.coordination = None;
    self.folio = None;
    self.details = None;
  }

  /// Pick a coordination. Clears the folio and the details; the direction
  /// stands.
  pub fn select_coordination(&mut self, coordination: &str) {
    self.coordination = normalize(coordination);
    self.folio = None;
    self.details = None;
  }

  /// Pick a folio and resolve it against the catalog. A folio the catalog
  /// does not know leaves the details unset.
  pub fn select_folio(&mut self, catalog: &ProgramCatalog, folio: &str) {
    self.folio = normalize(folio);
    self.details = self
      .folio
      .as_deref()
      .and_then(|f| catalog.resolve_folio(f))
      .map(ProgramDetails::from);
  }

  /// Coordination options for the current direction.
  pub fn coordination_options(&self, catalog: &ProgramCatalog) -> Vec<String> {
    match self.direction.as_deref() {
      Some(direction) => catalog.coordinations(direction),
      None => Vec::new(),
    }
  }

  /// Folio options for the current direction/coordination pair.
  pub fn folio_options(&self, catalog: &ProgramCatalog) -> Vec<String> {
    match (self.direction.as_deref(), self.coordination.as_deref()) {
      (Some(d), Some(c)) => catalog.folios(d, c),
      _ => Vec::new(),
    }
  }

  /// Program-name options for the current direction/coordination pair.
  pub fn program_name_options(&self, catalog: &ProgramCatalog) -> Vec<String> {
    match (self.direction.as_deref(), self.coordination.as_deref()) {
      (Some(d), Some(c)) => catalog.program_names(d, c),
      _ => Vec::new(),
    }
  }
}

fn normalize(value: &str) -> Option<String> {
  if value.is_empty() { None } else { Some(value.to_string()) }
}
