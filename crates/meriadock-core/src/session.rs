//! Accounts, sessions, and the page-level session gate.
//!
//! Authentication is split in two: the credential identity (who signed in)
//! and the directory profile (who that is in the organisation). A missing
//! profile is tolerated everywhere — the account stays usable and the
//! profile side simply reads as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Identity ────────────────────────────────────────────────────────────────

/// The authenticated identity as the auth layer reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
  pub user_id: Uuid,
  /// The full login identifier, e.g. `"u1234@meriadock.org.mx"`.
  pub login:   String,
}

/// The directory projection of a user: display name and NISUV code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub full_name:            String,
  pub nisuv:                String,
  /// Set on provisioned accounts; cleared once the user picks their own
  /// password.
  pub must_change_password: bool,
}

/// What a signed-in request knows about its caller. Built once per request
/// and passed along explicitly; nothing reads ambient global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
  pub user:    AuthUser,
  /// `None` when the account has no directory row. Not an error.
  pub profile: Option<Profile>,
}

/// Build the login identifier presented to the auth layer: operators type
/// only their NISUV code; the organisation domain is fixed.
pub fn login_identifier(nisuv: &str, domain: &str) -> String {
  format!("{}@{}", nisuv.trim(), domain)
}

// ─── Store records ───────────────────────────────────────────────────────────

/// The credential view of a user row, as the auth layer needs it.
#[derive(Debug, Clone)]
pub struct UserAccount {
  pub user_id:              Uuid,
  pub login:                String,
  /// PHC-formatted hash string. Never the password itself.
  pub password_hash:        String,
  pub must_change_password: bool,
}

/// Input to [`crate::store::IntranetStore::create_user`].
/// The `user_id` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub login:                String,
  pub nisuv:                String,
  pub full_name:            String,
  pub password_hash:        String,
  pub must_change_password: bool,
}

/// A server-side session row. The token doubles as the primary key; it is
/// the only thing the browser holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
  pub token:      String,
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

// ─── Session gate ────────────────────────────────────────────────────────────

/// What a page knows about the session at a given moment.
///
/// `Loading` is a real state, not a transient: pages render a placeholder
/// while in it and must not treat it as signed-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
  Loading,
  Authenticated(SessionContext),
  Unauthenticated,
}

impl SessionState {
  pub fn is_authenticated(&self) -> bool {
    matches!(self, Self::Authenticated(_))
  }
}

/// Identifies one resolution attempt. A token minted before the latest auth
/// change no longer matches and its outcome is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionToken(u64);

/// The session state machine a page drives.
///
/// Starts in [`SessionState::Loading`]. Each resolution attempt is stamped
/// with [`SessionGate::begin_resolution`]; its outcome only applies if no
/// auth change happened in between. Any auth change (sign-in, sign-out,
/// password change, change observed elsewhere) drops the gate back to
/// `Loading` and invalidates every attempt already in flight.
#[derive(Debug, Clone)]
pub struct SessionGate {
  state:      SessionState,
  generation: u64,
}

impl SessionGate {
  pub fn new() -> Self {
    Self { state: SessionState::Loading, generation: 0 }
  }

  pub fn state(&self) -> &SessionState { &self.state }

  /// Stamp a resolution attempt against the current generation.
  pub fn begin_resolution(&self) -> ResolutionToken {
    ResolutionToken(self.generation)
  }

  /// Apply the outcome of a resolution attempt. A present identity
  /// authenticates even when the profile lookup came back empty.
  ///
  /// Returns `false` — and changes nothing — when the token is stale.
  pub fn resolve(
    &mut self,
    token: ResolutionToken,
    user: Option<AuthUser>,
    profile: Option<Profile>,
  ) -> bool {
    if token.0 != self.generation {
      return false;
    }
    self.state = match user {
      Some(user) => {
        SessionState::Authenticated(SessionContext { user, profile })
      }
      None => SessionState::Unauthenticated,
    };
    true
  }

  /// An auth event happened; the previous answer and anything in flight are
  /// stale.
  pub fn auth_changed(&mut self) {
    self.generation += 1;
    self.state = SessionState::Loading;
  }
}

impl Default for SessionGate {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn some_user() -> AuthUser {
    AuthUser {
      user_id: Uuid::new_v4(),
      login:   "u1234@meriadock.org.mx".into(),
    }
  }

  #[test]
  fn gate_starts_loading() {
    let gate = SessionGate::new();
    assert_eq!(*gate.state(), SessionState::Loading);
    assert!(!gate.state().is_authenticated());
  }

  #[test]
  fn resolving_without_identity_is_unauthenticated() {
    let mut gate = SessionGate::new();
    let token = gate.begin_resolution();
    assert!(gate.resolve(token, None, None));
    assert_eq!(*gate.state(), SessionState::Unauthenticated);
  }

  #[test]
  fn missing_profile_still_authenticates() {
    let mut gate = SessionGate::new();
    let token = gate.begin_resolution();
    gate.resolve(token, Some(some_user()), None);
    match gate.state() {
      SessionState::Authenticated(ctx) => assert!(ctx.profile.is_none()),
      other => panic!("expected authenticated, got {other:?}"),
    }
  }

  #[test]
  fn auth_change_returns_to_loading() {
    let mut gate = SessionGate::new();
    let token = gate.begin_resolution();
    gate.resolve(token, Some(some_user()), None);
    assert!(gate.state().is_authenticated());

    gate.auth_changed();
    assert_eq!(*gate.state(), SessionState::Loading);

    let token = gate.begin_resolution();
    gate.resolve(token, None, None);
    assert_eq!(*gate.state(), SessionState::Unauthenticated);
  }

  #[test]
  fn stale_resolution_is_discarded() {
    let mut gate = SessionGate::new();
    let stale = gate.begin_resolution();

    // Auth changes while the first attempt is still in flight.
    gate.auth_changed();

    assert!(!gate.resolve(stale, Some(some_user()), None));
    assert_eq!(*gate.state(), SessionState::Loading);

    let fresh = gate.begin_resolution();
    assert!(gate.resolve(fresh, None, None));
    assert_eq!(*gate.state(), SessionState::Unauthenticated);
  }

  #[test]
  fn login_identifier_appends_fixed_domain() {
    assert_eq!(
      login_identifier("u1234", "meriadock.org.mx"),
      "u1234@meriadock.org.mx"
    );
    // Stray whitespace from the login box is not part of the identifier.
    assert_eq!(
      login_identifier("  u1234 ", "meriadock.org.mx"),
      "u1234@meriadock.org.mx"
    );
  }
}
