//! `SqliteStore`: the [`IntranetStore`] implementation over `tokio_rusqlite`.

use std::path::Path;

use chrono::Utc;
use meriadock_core::{
  beneficiary::{Beneficiary, NewBeneficiary},
  closure::{ClosureRecord, NewClosure, NewResults, ResultsRecord},
  interaction::{Interaction, NewInteraction},
  program::{
    NewPlanning, NewProgram, Planning, Program, ProgramId, ProgramUpdate,
  },
  session::{NewUser, Profile, SessionRecord, UserAccount},
  store::IntranetStore,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  encode::{
    RawProgram, RawSession, RawUser, encode_date, encode_dt, encode_uuid,
  },
  error::Result,
  schema::SCHEMA,
};

/// SQLite-backed store.
///
/// Cloning is cheap — the inner connection handle is reference-counted, and
/// all database work runs serialized on `tokio_rusqlite`'s worker thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database at `path` and apply the schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a fresh in-memory database, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl IntranetStore for SqliteStore {
  type Error = crate::Error;

  // ── Programs ──────────────────────────────────────────────────────────

  async fn list_programs(&self) -> Result<Vec<Program>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, folio_programa, nombre, direccion, coordinacion,
                  estado, tipo_constancia, responsable, observaciones
           FROM programas
           ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawProgram {
              id:               row.get(0)?,
              folio:            row.get(1)?,
              name:             row.get(2)?,
              direction:        row.get(3)?,
              coordination:     row.get(4)?,
              status:           row.get(5)?,
              certificate_type: row.get(6)?,
              responsible:      row.get(7)?,
              notes:            row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProgram::into_program).collect()
  }

  async fn insert_program(&self, input: NewProgram) -> Result<Program> {
    let folio = input.folio.clone();
    let name = input.name.clone();
    let direction = input.direction.clone();
    let coordination = input.coordination.clone();
    let status = input.status.as_str();
    let certificate_type = input.certificate_type.as_str();
    let responsible = input.responsible.clone();
    let notes = input.notes.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO programas (folio_programa, nombre, direccion,
                                  coordinacion, estado, tipo_constancia,
                                  responsable, observaciones)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            folio,
            name,
            direction,
            coordination,
            status,
            certificate_type,
            responsible,
            notes
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Program {
      id,
      folio: input.folio,
      name: input.name,
      direction: input.direction,
      coordination: input.coordination,
      status: input.status,
      certificate_type: input.certificate_type,
      responsible: input.responsible,
      notes: input.notes,
    })
  }

  async fn update_program(
    &self,
    folio: &str,
    changes: ProgramUpdate,
  ) -> Result<()> {
    let folio = folio.to_owned();
    let status = changes.status.as_str();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE programas
           SET direccion = ?1, coordinacion = ?2, estado = ?3,
               responsable = ?4, observaciones = ?5
           WHERE folio_programa = ?6",
          rusqlite::params![
            changes.direction,
            changes.coordination,
            status,
            changes.responsible,
            changes.notes,
            folio
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_program(&self, id: ProgramId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM programas WHERE id = ?1", [id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Planning and closure ──────────────────────────────────────────────

  async fn insert_planning(&self, input: NewPlanning) -> Result<Planning> {
    let program_id = input.program_id;
    let start_date = encode_date(input.start_date);
    let end_date = input.end_date.map(encode_date);
    let objective = input.objective.clone();
    let activities = input.activities.clone();
    let expected = input.expected_beneficiaries.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO programa_planeacion (programa_id, fecha_inicio,
                                            fecha_fin, objetivo, actividades,
                                            beneficiarios_previstos)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            program_id,
            start_date,
            end_date,
            objective,
            activities,
            expected
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Planning {
      id,
      program_id: input.program_id,
      start_date: input.start_date,
      end_date: input.end_date,
      objective: input.objective,
      activities: input.activities,
      expected_beneficiaries: input.expected_beneficiaries,
    })
  }

  async fn insert_results(&self, input: NewResults) -> Result<ResultsRecord> {
    let program_id = input.program_id;
    let reached = i64::from(input.beneficiaries_reached);
    let results = input.results.clone();
    let compliance = input.compliance.as_str();
    let recommendations = input.recommendations.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO programa_resultados (programa_id,
                                            beneficiarios_alcanzados,
                                            resultados, cumplimiento,
                                            recomendaciones)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            program_id,
            reached,
            results,
            compliance,
            recommendations
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ResultsRecord {
      id,
      program_id: input.program_id,
      beneficiaries_reached: input.beneficiaries_reached,
      results: input.results,
      compliance: input.compliance,
      recommendations: input.recommendations,
    })
  }

  async fn delete_results(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM programa_resultados WHERE id = ?1", [id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_closure(&self, input: NewClosure) -> Result<ClosureRecord> {
    let program_id = input.program_id;
    let closed_on = encode_date(input.closed_on);
    let reference_act = input.reference_act.clone();
    let closed_by = input.closed_by.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO programa_cierre (programa_id, fecha_cierre,
                                        acta_referencia, cerrado_por)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![program_id, closed_on, reference_act, closed_by],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ClosureRecord {
      id,
      program_id: input.program_id,
      closed_on: input.closed_on,
      reference_act: input.reference_act,
      closed_by: input.closed_by,
    })
  }

  // ── Beneficiaries and interactions ────────────────────────────────────

  async fn insert_beneficiary(
    &self,
    input: NewBeneficiary,
  ) -> Result<Beneficiary> {
    let program_id = input.program_id;
    let name = input.name.clone();
    let support_type = input.support_type.map(|t| t.as_str());
    let completion = input.completion.map(|c| c.as_str());
    let certificate_folio = input.certificate_folio.clone();
    let certificate_date = input.certificate_date.map(encode_date);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO beneficiarios (programa_id, nombre_beneficiario,
                                      tipo_apoyo, concluyo, folio_constancia,
                                      fecha_constancia)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            program_id,
            name,
            support_type,
            completion,
            certificate_folio,
            certificate_date
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Beneficiary {
      id,
      program_id: input.program_id,
      name: input.name,
      support_type: input.support_type,
      completion: input.completion,
      certificate_folio: input.certificate_folio,
      certificate_date: input.certificate_date,
    })
  }

  async fn list_beneficiary_names(
    &self,
    program_id: ProgramId,
  ) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT nombre_beneficiario
           FROM beneficiarios
           WHERE programa_id = ?1
           ORDER BY nombre_beneficiario",
        )?;
        let rows = stmt
          .query_map([program_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }

  async fn insert_interaction(
    &self,
    input: NewInteraction,
  ) -> Result<Interaction> {
    let user_uuid = encode_uuid(input.user_id);
    let program_id = input.program_id;
    let interaction_type = input.interaction_type.as_str();
    let beneficiary_name = input.beneficiary_name.clone();
    let session_number = input.session_number.clone();
    let notes = input.notes.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interacciones (user_uuid, programa_id,
                                      tipo_interaccion, nombre_beneficiario,
                                      numero_sesion, observaciones)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            user_uuid,
            program_id,
            interaction_type,
            beneficiary_name,
            session_number,
            notes
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Interaction {
      id,
      user_id: input.user_id,
      program_id: input.program_id,
      interaction_type: input.interaction_type,
      beneficiary_name: input.beneficiary_name,
      session_number: input.session_number,
      notes: input.notes,
    })
  }

  // ── Users and sessions ────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<UserAccount> {
    let user_id = Uuid::new_v4();
    let uuid = encode_uuid(user_id);
    let login = input.login.clone();
    let nisuv = input.nisuv.clone();
    let full_name = input.full_name.clone();
    let password_hash = input.password_hash.clone();
    let must_change_password = input.must_change_password;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO usuarios (uuid, login, nisuv, nombre_completo,
                                 password_hash, must_change_password)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            uuid,
            login,
            nisuv,
            full_name,
            password_hash,
            must_change_password
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(UserAccount {
      user_id,
      login: input.login,
      password_hash: input.password_hash,
      must_change_password: input.must_change_password,
    })
  }

  async fn get_user_by_login(
    &self,
    login: &str,
  ) -> Result<Option<UserAccount>> {
    let login = login.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT uuid, login, password_hash, must_change_password
             FROM usuarios
             WHERE login = ?1",
            [login],
            |row| {
              Ok(RawUser {
                uuid:                 row.get(0)?,
                login:                row.get(1)?,
                password_hash:        row.get(2)?,
                must_change_password: row.get(3)?,
              })
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    raw.map(RawUser::into_account).transpose()
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<UserAccount>> {
    let uuid = encode_uuid(user_id);
    let raw = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT uuid, login, password_hash, must_change_password
             FROM usuarios
             WHERE uuid = ?1",
            [uuid],
            |row| {
              Ok(RawUser {
                uuid:                 row.get(0)?,
                login:                row.get(1)?,
                password_hash:        row.get(2)?,
                must_change_password: row.get(3)?,
              })
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    raw.map(RawUser::into_account).transpose()
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let uuid = encode_uuid(user_id);
    let profile = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT nombre_completo, nisuv, must_change_password
             FROM usuarios
             WHERE uuid = ?1",
            [uuid],
            |row| {
              Ok(Profile {
                full_name:            row.get(0)?,
                nisuv:                row.get(1)?,
                must_change_password: row.get(2)?,
              })
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;
    Ok(profile)
  }

  async fn update_password(
    &self,
    user_id: Uuid,
    password_hash: String,
  ) -> Result<()> {
    let uuid = encode_uuid(user_id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE usuarios
           SET password_hash = ?1, must_change_password = 0
           WHERE uuid = ?2",
          rusqlite::params![password_hash, uuid],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn create_session(&self, session: SessionRecord) -> Result<()> {
    let user_uuid = encode_uuid(session.user_id);
    let created_at = encode_dt(session.created_at);
    let expires_at = encode_dt(session.expires_at);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sesiones (token, user_uuid, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![session.token, user_uuid, created_at, expires_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_session(&self, token: &str) -> Result<Option<SessionRecord>> {
    let token = token.to_owned();
    // RFC 3339 timestamps in UTC compare correctly as strings.
    let now = encode_dt(Utc::now());
    let raw = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT token, user_uuid, created_at, expires_at
             FROM sesiones
             WHERE token = ?1 AND expires_at > ?2",
            rusqlite::params![token, now],
            |row| {
              Ok(RawSession {
                token:      row.get(0)?,
                user_uuid:  row.get(1)?,
                created_at: row.get(2)?,
                expires_at: row.get(3)?,
              })
            },
          )
          .optional()?;
        Ok(row)
      })
      .await?;

    raw.map(RawSession::into_record).transpose()
  }

  async fn revoke_session(&self, token: &str) -> Result<()> {
    let token = token.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM sesiones WHERE token = ?1", [token])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
