//! The `IntranetStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `meriadock-store-sqlite`). Higher layers (`meriadock-api`,
//! `meriadock-intranet`) depend on this abstraction, not on any concrete
//! backend.
//!
//! Writes are individual statements, not transactions — the submission
//! pipelines in [`crate::submit`] sequence them and compensate when a later
//! write fails. The trait therefore exposes the compensating deletes too.

use std::future::Future;

use uuid::Uuid;

use crate::{
  beneficiary::{Beneficiary, NewBeneficiary},
  closure::{ClosureRecord, NewClosure, NewResults, ResultsRecord},
  interaction::{Interaction, NewInteraction},
  program::{
    NewPlanning, NewProgram, Planning, Program, ProgramId, ProgramUpdate,
  },
  session::{NewUser, Profile, SessionRecord, UserAccount},
};

/// Abstraction over the intranet's storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait IntranetStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Programs ──────────────────────────────────────────────────────────

  /// The full program list, in insertion order. Pages load this once and
  /// derive every dropdown from the snapshot.
  fn list_programs(
    &self,
  ) -> impl Future<Output = Result<Vec<Program>, Self::Error>> + Send + '_;

  /// Insert a program and return it with its store-assigned id.
  /// The folio is unique; a duplicate folio is a store error.
  fn insert_program(
    &self,
    input: NewProgram,
  ) -> impl Future<Output = Result<Program, Self::Error>> + Send + '_;

  /// Apply `changes` to the program with this folio. Last write wins; a
  /// folio that matches no row is not an error here.
  fn update_program<'a>(
    &'a self,
    folio: &'a str,
    changes: ProgramUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove a program row. Only the registration pipeline calls this, to
  /// compensate a failed planning insert.
  fn delete_program(
    &self,
    id: ProgramId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Planning and closure ──────────────────────────────────────────────

  fn insert_planning(
    &self,
    input: NewPlanning,
  ) -> impl Future<Output = Result<Planning, Self::Error>> + Send + '_;

  fn insert_results(
    &self,
    input: NewResults,
  ) -> impl Future<Output = Result<ResultsRecord, Self::Error>> + Send + '_;

  /// Remove a results row. Only the closure pipeline calls this, to
  /// compensate a failed closure insert.
  fn delete_results(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn insert_closure(
    &self,
    input: NewClosure,
  ) -> impl Future<Output = Result<ClosureRecord, Self::Error>> + Send + '_;

  // ── Beneficiaries and interactions ────────────────────────────────────

  fn insert_beneficiary(
    &self,
    input: NewBeneficiary,
  ) -> impl Future<Output = Result<Beneficiary, Self::Error>> + Send + '_;

  /// Distinct beneficiary names recorded under a program, for the
  /// attendance picklist.
  fn list_beneficiary_names(
    &self,
    program_id: ProgramId,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn insert_interaction(
    &self,
    input: NewInteraction,
  ) -> impl Future<Output = Result<Interaction, Self::Error>> + Send + '_;

  // ── Users and sessions ────────────────────────────────────────────────

  /// Create a user account. The `user_id` is assigned by the store; a
  /// duplicate login is a store error.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<UserAccount, Self::Error>> + Send + '_;

  /// Look up the credential row for a login identifier.
  fn get_user_by_login<'a>(
    &'a self,
    login: &'a str,
  ) -> impl Future<Output = Result<Option<UserAccount>, Self::Error>>
  + Send
  + 'a;

  /// Look up the credential row for a user id, as when rehydrating a
  /// session token into its account.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserAccount>, Self::Error>>
  + Send
  + '_;

  /// The directory profile for a user. `None` when the account has no
  /// directory row; callers treat that as a usable, profile-less session.
  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Replace the password hash and clear the must-change flag in one step.
  fn update_password(
    &self,
    user_id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn create_session(
    &self,
    session: SessionRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Look up a live session by token. Expired and revoked sessions read as
  /// absent.
  fn get_session<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<SessionRecord>, Self::Error>>
  + Send
  + 'a;

  fn revoke_session<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
