//! NISUV + password sign-in and opaque session tokens over the store.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use chrono::{Duration, Utc};
use meriadock_core::{
  session::{
    AuthUser, NewUser, SessionContext, SessionRecord, UserAccount,
    login_identifier,
  },
  store::IntranetStore,
};
use rand_core::{OsRng, RngCore};
use std::sync::Arc;

use crate::{ServerConfig, error::Error};

/// What a successful sign-in hands back to the login handler.
#[derive(Debug)]
pub struct SignIn {
  pub token:                String,
  pub must_change_password: bool,
}

/// Credential and session operations over the store.
///
/// Login identifiers are formed with [`login_identifier`]; passwords are
/// argon2 PHC strings; session tokens are opaque 32-byte hex values held
/// server-side in the `sesiones` relation.
#[derive(Clone)]
pub struct AuthService<S> {
  store:  Arc<S>,
  config: Arc<ServerConfig>,
}

impl<S> AuthService<S>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn new(store: Arc<S>, config: Arc<ServerConfig>) -> Self {
    Self { store, config }
  }

  /// Hash a password into an argon2 PHC string.
  pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(
      Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| Error::Hash)?
        .to_string(),
    )
  }

  fn mint_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
  }

  /// Sign an operator in with their NISUV code and password.
  ///
  /// Sign-in succeeds even when the account still carries the
  /// must-change-password flag; the caller decides where to send them.
  pub async fn sign_in(
    &self,
    nisuv: &str,
    password: &str,
  ) -> Result<SignIn, Error> {
    let login = login_identifier(nisuv, &self.config.login_domain);
    let account = self
      .store
      .get_user_by_login(&login)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or(Error::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&account.password_hash)
      .map_err(|_| Error::InvalidCredentials)?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| Error::InvalidCredentials)?;

    let now = Utc::now();
    let token = Self::mint_token();
    self
      .store
      .create_session(SessionRecord {
        token: token.clone(),
        user_id: account.user_id,
        created_at: now,
        expires_at: now + Duration::hours(self.config.session_ttl_hours),
      })
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    Ok(SignIn {
      token,
      must_change_password: account.must_change_password,
    })
  }

  /// Resolve a token into the caller's context. Expired, revoked, and
  /// unknown tokens all read as signed out, as does a session whose
  /// account has since been deleted. A missing directory profile does
  /// not: the context simply carries no profile.
  pub async fn resolve(
    &self,
    token: &str,
  ) -> Result<Option<SessionContext>, Error> {
    let Some(session) = self
      .store
      .get_session(token)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
    else {
      return Ok(None);
    };

    let Some(account) = self
      .store
      .get_user(session.user_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
    else {
      return Ok(None);
    };

    let profile = self
      .store
      .get_profile(session.user_id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    Ok(Some(SessionContext {
      user: AuthUser {
        user_id: account.user_id,
        login:   account.login,
      },
      profile,
    }))
  }

  /// Replace the caller's password and clear the must-change flag.
  ///
  /// The session already proves who the caller is, so the old password is
  /// not re-checked.
  pub async fn change_password(
    &self,
    token: &str,
    new_password: &str,
  ) -> Result<(), Error> {
    let session = self
      .store
      .get_session(token)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or(Error::Unauthorized)?;

    let hash = Self::hash_password(new_password)?;
    self
      .store
      .update_password(session.user_id, hash)
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }

  /// Revoke a session token. Revoking an unknown token is a no-op.
  pub async fn sign_out(&self, token: &str) -> Result<(), Error> {
    self
      .store
      .revoke_session(token)
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }

  /// Provision an account from its NISUV code. New accounts always carry
  /// the must-change-password flag.
  pub async fn create_account(
    &self,
    nisuv: &str,
    full_name: &str,
    password: &str,
  ) -> Result<UserAccount, Error> {
    let password_hash = Self::hash_password(password)?;
    self
      .store
      .create_user(NewUser {
        login: login_identifier(nisuv, &self.config.login_domain),
        nisuv: nisuv.trim().to_string(),
        full_name: full_name.to_string(),
        password_hash,
        must_change_password: true,
      })
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use meriadock_store_sqlite::SqliteStore;

  fn test_config() -> Arc<ServerConfig> {
    Arc::new(ServerConfig {
      host:              "127.0.0.1".to_string(),
      port:              8080,
      store_path:        PathBuf::from(":memory:"),
      login_domain:      "example.test".to_string(),
      cookie_name:       "access_token".to_string(),
      login_path:        "/login".to_string(),
      session_ttl_hours: 8,
    })
  }

  async fn service() -> AuthService<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AuthService::new(Arc::new(store), test_config())
  }

  #[tokio::test]
  async fn sign_in_mints_a_resolvable_token() {
    let auth = service().await;
    auth
      .create_account("u1234", "María Solís", "secreto1")
      .await
      .unwrap();

    let signin = auth.sign_in("u1234", "secreto1").await.unwrap();
    assert_eq!(signin.token.len(), 64);
    assert!(signin.must_change_password);

    let ctx = auth
      .resolve(&signin.token)
      .await
      .unwrap()
      .expect("session should resolve");
    assert_eq!(ctx.user.login, "u1234@example.test");
    assert_eq!(ctx.profile.unwrap().full_name, "María Solís");
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let auth = service().await;
    auth
      .create_account("u1234", "María Solís", "secreto1")
      .await
      .unwrap();

    let err = auth.sign_in("u1234", "equivocada").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
  }

  #[tokio::test]
  async fn unknown_nisuv_is_rejected() {
    let auth = service().await;
    let err = auth.sign_in("u9999", "loquesea").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));
  }

  #[tokio::test]
  async fn nisuv_is_trimmed_before_lookup() {
    let auth = service().await;
    auth
      .create_account("u1234", "María Solís", "secreto1")
      .await
      .unwrap();

    assert!(auth.sign_in("  u1234  ", "secreto1").await.is_ok());
  }

  #[tokio::test]
  async fn sign_out_revokes_the_token() {
    let auth = service().await;
    auth
      .create_account("u1234", "María Solís", "secreto1")
      .await
      .unwrap();
    let signin = auth.sign_in("u1234", "secreto1").await.unwrap();

    auth.sign_out(&signin.token).await.unwrap();
    assert!(auth.resolve(&signin.token).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn garbage_token_resolves_to_none() {
    let auth = service().await;
    assert!(auth.resolve("not-a-token").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn change_password_rotates_and_clears_the_flag() {
    let auth = service().await;
    auth
      .create_account("u1234", "María Solís", "secreto1")
      .await
      .unwrap();
    let signin = auth.sign_in("u1234", "secreto1").await.unwrap();

    auth
      .change_password(&signin.token, "secreto2")
      .await
      .unwrap();

    let err = auth.sign_in("u1234", "secreto1").await.unwrap_err();
    assert!(matches!(err, Error::InvalidCredentials));

    let signin = auth.sign_in("u1234", "secreto2").await.unwrap();
    assert!(!signin.must_change_password);
  }

  #[tokio::test]
  async fn change_password_requires_a_live_session() {
    let auth = service().await;
    let err = auth
      .change_password("not-a-token", "secreto2")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
  }
}
