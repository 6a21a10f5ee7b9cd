//! The in-memory program catalog backing every cascading form.
//!
//! Each entry page loads the full program list once and derives its dropdown
//! options from that snapshot. Option lists are deduplicated preserving
//! first-occurrence order, so the dropdowns are stable across renders of the
//! same snapshot. Resolution (folio → program, or the direction /
//! coordination / name triple → program) also runs against the snapshot,
//! never against the store.

use crate::{
  program::Program,
  store::IntranetStore,
};

/// A point-in-time snapshot of the program list.
#[derive(Debug, Clone, Default)]
pub struct ProgramCatalog {
  programs: Vec<Program>,
}

impl ProgramCatalog {
  pub fn new(programs: Vec<Program>) -> Self { Self { programs } }

  /// Load a fresh snapshot from the store.
  pub async fn load<S: IntranetStore>(store: &S) -> Result<Self, S::Error> {
    Ok(Self::new(store.list_programs().await?))
  }

  pub fn programs(&self) -> &[Program] { &self.programs }

  pub fn is_empty(&self) -> bool { self.programs.is_empty() }

  /// All direction values, first occurrence first.
  pub fn directions(&self) -> Vec<String> {
    dedup_in_order(self.programs.iter().map(|p| p.direction.as_str()))
  }

  /// Coordination values under one direction.
  pub fn coordinations(&self, direction: &str) -> Vec<String> {
    dedup_in_order(
      self
        .programs
        .iter()
        .filter(|p| p.direction == direction)
        .map(|p| p.coordination.as_str()),
    )
  }

  /// Folio codes under a direction/coordination pair.
  pub fn folios(&self, direction: &str, coordination: &str) -> Vec<String> {
    dedup_in_order(
      self
        .programs
        .iter()
        .filter(|p| p.direction == direction && p.coordination == coordination)
        .map(|p| p.folio.as_str()),
    )
  }

  /// Program names under a direction/coordination pair. The interaction log
  /// selects by name instead of folio.
  pub fn program_names(
    &self,
    direction: &str,
    coordination: &str,
  ) -> Vec<String> {
    dedup_in_order(
      self
        .programs
        .iter()
        .filter(|p| p.direction == direction && p.coordination == coordination)
        .map(|p| p.name.as_str()),
    )
  }

  /// Find the program a folio refers to.
  pub fn resolve_folio(&self, folio: &str) -> Option<&Program> {
    self.programs.iter().find(|p| p.folio == folio)
  }

  /// Find a program by its direction/coordination/name triple. First match
  /// wins when names collide within one coordination.
  pub fn resolve_named(
    &self,
    direction: &str,
    coordination: &str,
    name: &str,
  ) -> Option<&Program> {
    self.programs.iter().find(|p| {
      p.direction == direction
        && p.coordination == coordination
        && p.name == name
    })
  }
}

/// Deduplicate, keeping the first occurrence of each value in input order.
fn dedup_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
  let mut out: Vec<String> = Vec::new();
  for value in values {
    if !out.iter().any(|seen| seen == value) {
      out.push(value.to_string());
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::program::{CertificateType, ProgramStatus};

  fn program(
    id: i64,
    direction: &str,
    coordination: &str,
    folio: &str,
  ) -> Program {
    Program {
      id,
      folio: folio.into(),
      name: format!("Programa {folio}"),
      direction: direction.into(),
      coordination: coordination.into(),
      status: ProgramStatus::Active,
      certificate_type: CertificateType::CF,
      responsible: "Responsable".into(),
      notes: String::new(),
    }
  }

  #[test]
  fn option_lists_narrow_by_selection() {
    let catalog = ProgramCatalog::new(vec![
      program(1, "A", "X", "F1"),
      program(2, "A", "Y", "F2"),
    ]);

    assert_eq!(catalog.directions(), vec!["A"]);
    assert_eq!(catalog.coordinations("A"), vec!["X", "Y"]);
    assert_eq!(catalog.folios("A", "X"), vec!["F1"]);
    assert_eq!(catalog.folios("A", "Y"), vec!["F2"]);
    assert!(catalog.folios("A", "Z").is_empty());
  }

  #[test]
  fn duplicates_collapse_in_first_occurrence_order() {
    let catalog = ProgramCatalog::new(vec![
      program(1, "B", "X", "F1"),
      program(2, "A", "X", "F2"),
      program(3, "B", "Y", "F3"),
      program(4, "B", "X", "F4"),
    ]);

    assert_eq!(catalog.directions(), vec!["B", "A"]);
    assert_eq!(catalog.coordinations("B"), vec!["X", "Y"]);
    assert_eq!(catalog.folios("B", "X"), vec!["F1", "F4"]);
  }

  #[test]
  fn folio_resolution_hits_and_misses() {
    let catalog = ProgramCatalog::new(vec![
      program(1, "A", "X", "F1"),
      program(2, "A", "Y", "F2"),
    ]);

    assert_eq!(catalog.resolve_folio("F2").map(|p| p.id), Some(2));
    assert!(catalog.resolve_folio("F9").is_none());
  }

  #[test]
  fn named_resolution_requires_the_full_triple() {
    let catalog = ProgramCatalog::new(vec![
      program(1, "A", "X", "F1"),
      program(2, "A", "Y", "F2"),
    ]);

    let hit = catalog.resolve_named("A", "Y", "Programa F2");
    assert_eq!(hit.map(|p| p.id), Some(2));
    // Same name under the wrong coordination does not resolve.
    assert!(catalog.resolve_named("A", "X", "Programa F2").is_none());
  }
}
