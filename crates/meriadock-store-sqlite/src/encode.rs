//! Conversions between domain types and their column representations.
//!
//! UUIDs are stored as hyphenated text, timestamps as RFC 3339, and dates as
//! plain ISO `YYYY-MM-DD`. Enum literals go through the domain types'
//! `as_str` / `FromStr` pairs so the database only ever holds the canonical
//! strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};

// ─── Scalar codecs ───────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Timestamp(format!("{s:?}: {e}")))
}

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `programas` row before decoding.
pub struct RawProgram {
  pub id:               i64,
  pub folio:            String,
  pub name:             String,
  pub direction:        String,
  pub coordination:     String,
  pub status:           String,
  pub certificate_type: String,
  pub responsible:      String,
  pub notes:            String,
}

impl RawProgram {
  pub fn into_program(self) -> Result<meriadock_core::program::Program> {
    Ok(meriadock_core::program::Program {
      id: self.id,
      folio: self.folio,
      name: self.name,
      direction: self.direction,
      coordination: self.coordination,
      status: self.status.parse()?,
      certificate_type: self.certificate_type.parse()?,
      responsible: self.responsible,
      notes: self.notes,
    })
  }
}

/// The credential columns of a `usuarios` row before decoding.
pub struct RawUser {
  pub uuid:                 String,
  pub login:                String,
  pub password_hash:        String,
  pub must_change_password: bool,
}

impl RawUser {
  pub fn into_account(self) -> Result<meriadock_core::session::UserAccount> {
    Ok(meriadock_core::session::UserAccount {
      user_id: decode_uuid(&self.uuid)?,
      login: self.login,
      password_hash: self.password_hash,
      must_change_password: self.must_change_password,
    })
  }
}

/// A `sesiones` row before decoding.
pub struct RawSession {
  pub token:      String,
  pub user_uuid:  String,
  pub created_at: String,
  pub expires_at: String,
}

impl RawSession {
  pub fn into_record(self) -> Result<meriadock_core::session::SessionRecord> {
    Ok(meriadock_core::session::SessionRecord {
      token: self.token,
      user_id: decode_uuid(&self.user_uuid)?,
      created_at: decode_dt(&self.created_at)?,
      expires_at: decode_dt(&self.expires_at)?,
    })
  }
}
