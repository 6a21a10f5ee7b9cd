//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use meriadock_core::{
  beneficiary::{Completion, NewBeneficiary, SupportType},
  closure::{GoalCompliance, NewClosure, NewResults},
  interaction::{InteractionType, NewInteraction},
  program::{
    CertificateType, NewPlanning, NewProgram, ProgramStatus, ProgramUpdate,
  },
  session::{NewUser, SessionRecord},
  store::IntranetStore,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn food_program() -> NewProgram {
  NewProgram {
    folio:            "DIF-2024-001".into(),
    name:             "Apoyo Alimentario".into(),
    direction:        "Desarrollo Comunitario".into(),
    coordination:     "Nutrición".into(),
    status:           ProgramStatus::Active,
    certificate_type: CertificateType::CA,
    responsible:      "Laura Méndez".into(),
    notes:            String::new(),
  }
}

fn training_program() -> NewProgram {
  NewProgram {
    folio:            "DIF-2024-002".into(),
    name:             "Taller de Oficios".into(),
    direction:        "Formación".into(),
    coordination:     "Capacitación".into(),
    status:           ProgramStatus::Active,
    certificate_type: CertificateType::CF,
    responsible:      "Jorge Ruiz".into(),
    notes:            "Sede norte".into(),
  }
}

fn planning_for(program_id: i64) -> NewPlanning {
  NewPlanning {
    program_id,
    start_date:             date(2024, 2, 1),
    end_date:               Some(date(2024, 11, 30)),
    objective:              "Mejorar la alimentación familiar".into(),
    activities:             "Entrega mensual de despensas".into(),
    expected_beneficiaries: "120 familias".into(),
  }
}

fn operator(login: &str) -> NewUser {
  NewUser {
    login:                login.into(),
    nisuv:                "u1234".into(),
    full_name:            "María Solís".into(),
    password_hash:        "$argon2id$v=19$stub".into(),
    must_change_password: true,
  }
}

fn session_for(user_id: Uuid, token: &str, ttl_hours: i64) -> SessionRecord {
  let now = Utc::now();
  SessionRecord {
    token: token.into(),
    user_id,
    created_at: now,
    expires_at: now + Duration::hours(ttl_hours),
  }
}

// ─── Programs ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_list_programs() {
  let s = store().await;

  let inserted = s.insert_program(food_program()).await.unwrap();
  assert!(inserted.id > 0);

  let all = s.list_programs().await.unwrap();
  assert_eq!(all.len(), 1);

  let p = &all[0];
  assert_eq!(p.id, inserted.id);
  assert_eq!(p.folio, "DIF-2024-001");
  assert_eq!(p.name, "Apoyo Alimentario");
  assert_eq!(p.status, ProgramStatus::Active);
  assert_eq!(p.certificate_type, CertificateType::CA);
  assert_eq!(p.notes, "");
}

#[tokio::test]
async fn list_programs_in_insertion_order() {
  let s = store().await;
  s.insert_program(training_program()).await.unwrap();
  s.insert_program(food_program()).await.unwrap();

  let all = s.list_programs().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].folio, "DIF-2024-002");
  assert_eq!(all[1].folio, "DIF-2024-001");
}

#[tokio::test]
async fn duplicate_folio_is_rejected() {
  let s = store().await;
  s.insert_program(food_program()).await.unwrap();

  let mut again = food_program();
  again.name = "Otro nombre".into();
  let err = s.insert_program(again).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn update_program_rewrites_by_folio() {
  let s = store().await;
  let inserted = s.insert_program(food_program()).await.unwrap();

  s.update_program("DIF-2024-001", ProgramUpdate {
    direction:    "Desarrollo Comunitario".into(),
    coordination: "Nutrición".into(),
    status:       ProgramStatus::Suspended,
    responsible:  "Carlos Peña".into(),
    notes:        "Responsable sustituido".into(),
  })
  .await
  .unwrap();

  let all = s.list_programs().await.unwrap();
  let p = &all[0];
  assert_eq!(p.id, inserted.id);
  assert_eq!(p.status, ProgramStatus::Suspended);
  assert_eq!(p.responsible, "Carlos Peña");
  assert_eq!(p.notes, "Responsable sustituido");
  // Identity columns never change.
  assert_eq!(p.folio, "DIF-2024-001");
  assert_eq!(p.name, "Apoyo Alimentario");
}

#[tokio::test]
async fn update_unknown_folio_is_a_noop() {
  let s = store().await;
  s.insert_program(food_program()).await.unwrap();

  s.update_program("DIF-9999-999", ProgramUpdate {
    direction:    "X".into(),
    coordination: "Y".into(),
    status:       ProgramStatus::Suspended,
    responsible:  "Z".into(),
    notes:        String::new(),
  })
  .await
  .unwrap();

  let all = s.list_programs().await.unwrap();
  assert_eq!(all[0].status, ProgramStatus::Active);
}

#[tokio::test]
async fn delete_program_removes_the_row() {
  let s = store().await;
  let inserted = s.insert_program(food_program()).await.unwrap();

  s.delete_program(inserted.id).await.unwrap();
  assert!(s.list_programs().await.unwrap().is_empty());
}

// ─── Planning and closure ────────────────────────────────────────────────────

#[tokio::test]
async fn planning_binds_to_its_program() {
  let s = store().await;
  let program = s.insert_program(food_program()).await.unwrap();

  let planning = s.insert_planning(planning_for(program.id)).await.unwrap();
  assert!(planning.id > 0);
  assert_eq!(planning.program_id, program.id);
  assert_eq!(planning.start_date, date(2024, 2, 1));
  assert_eq!(planning.end_date, Some(date(2024, 11, 30)));
}

#[tokio::test]
async fn planning_without_program_violates_foreign_key() {
  let s = store().await;
  let err = s.insert_planning(planning_for(4242)).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn results_then_closure() {
  let s = store().await;
  let program = s.insert_program(food_program()).await.unwrap();

  let results = s
    .insert_results(NewResults {
      program_id:            program.id,
      beneficiaries_reached: 96,
      results:               "Cobertura casi completa".into(),
      compliance:            GoalCompliance::Partial,
      recommendations:       String::new(),
    })
    .await
    .unwrap();
  assert!(results.id > 0);
  assert_eq!(results.compliance, GoalCompliance::Partial);

  let closure = s
    .insert_closure(NewClosure {
      program_id:    program.id,
      closed_on:     date(2024, 12, 15),
      reference_act: "ACTA-2024-07".into(),
      closed_by:     "Laura Méndez".into(),
    })
    .await
    .unwrap();
  assert!(closure.id > 0);
  assert_eq!(closure.program_id, program.id);
}

#[tokio::test]
async fn results_row_can_be_deleted() {
  let s = store().await;
  let program = s.insert_program(food_program()).await.unwrap();

  let results = s
    .insert_results(NewResults {
      program_id:            program.id,
      beneficiaries_reached: 10,
      results:               "Parcial".into(),
      compliance:            GoalCompliance::NotMet,
      recommendations:       "Repetir el levantamiento".into(),
    })
    .await
    .unwrap();

  s.delete_results(results.id).await.unwrap();
  // Deleting an already-absent row is not an error.
  s.delete_results(results.id).await.unwrap();
}

// ─── Beneficiaries and interactions ──────────────────────────────────────────

#[tokio::test]
async fn support_and_attendance_shapes() {
  let s = store().await;
  let program = s.insert_program(food_program()).await.unwrap();

  let support = s
    .insert_beneficiary(NewBeneficiary::support(
      program.id,
      "Ana Torres".into(),
      SupportType::InKind,
    ))
    .await
    .unwrap();
  assert_eq!(support.support_type, Some(SupportType::InKind));
  assert_eq!(support.completion, None);
  assert_eq!(support.certificate_date, None);

  let attendance = s
    .insert_beneficiary(NewBeneficiary::attendance(
      program.id,
      "Ana Torres".into(),
      Completion::Concluded,
      Some("CONST-0001".into()),
      date(2024, 12, 1),
    ))
    .await
    .unwrap();
  assert_eq!(attendance.support_type, None);
  assert_eq!(attendance.completion, Some(Completion::Concluded));
  assert_eq!(attendance.certificate_folio.as_deref(), Some("CONST-0001"));
}

#[tokio::test]
async fn beneficiary_names_are_distinct_and_sorted() {
  let s = store().await;
  let program = s.insert_program(food_program()).await.unwrap();

  for name in ["Luis Vega", "Ana Torres", "Ana Torres"] {
    s.insert_beneficiary(NewBeneficiary::support(
      program.id,
      name.into(),
      SupportType::Social,
    ))
    .await
    .unwrap();
  }

  let names = s.list_beneficiary_names(program.id).await.unwrap();
  assert_eq!(names, ["Ana Torres", "Luis Vega"]);
}

#[tokio::test]
async fn beneficiary_names_are_scoped_to_the_program() {
  let s = store().await;
  let food = s.insert_program(food_program()).await.unwrap();
  let training = s.insert_program(training_program()).await.unwrap();

  s.insert_beneficiary(NewBeneficiary::support(
    food.id,
    "Ana Torres".into(),
    SupportType::InKind,
  ))
  .await
  .unwrap();

  assert!(s.list_beneficiary_names(training.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn interaction_binds_to_user_and_program() {
  let s = store().await;
  let program = s.insert_program(food_program()).await.unwrap();
  let user = s.create_user(operator("u1234@example.test")).await.unwrap();

  let logged = s
    .insert_interaction(NewInteraction {
      user_id:          user.user_id,
      program_id:       program.id,
      interaction_type: InteractionType::Orientation,
      beneficiary_name: "Ana Torres".into(),
      session_number:   "3 de 5".into(),
      notes:            None,
    })
    .await
    .unwrap();

  assert!(logged.id > 0);
  assert_eq!(logged.user_id, user.user_id);
  assert_eq!(logged.interaction_type, InteractionType::Orientation);
  assert_eq!(logged.session_number, "3 de 5");
}

// ─── Users and sessions ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_and_look_up_by_login() {
  let s = store().await;
  let created = s.create_user(operator("u1234@example.test")).await.unwrap();

  let found = s
    .get_user_by_login("u1234@example.test")
    .await
    .unwrap()
    .expect("user should exist");
  assert_eq!(found.user_id, created.user_id);
  assert_eq!(found.password_hash, "$argon2id$v=19$stub");
  assert!(found.must_change_password);

  let missing = s.get_user_by_login("nobody@example.test").await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn look_up_user_by_id() {
  let s = store().await;
  let created = s.create_user(operator("u1234@example.test")).await.unwrap();

  let found = s
    .get_user(created.user_id)
    .await
    .unwrap()
    .expect("user should exist");
  assert_eq!(found.login, "u1234@example.test");

  let missing = s.get_user(Uuid::new_v4()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn duplicate_login_is_rejected() {
  let s = store().await;
  s.create_user(operator("u1234@example.test")).await.unwrap();

  let err = s
    .create_user(operator("u1234@example.test"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn profile_reads_from_the_user_row() {
  let s = store().await;
  let user = s.create_user(operator("u1234@example.test")).await.unwrap();

  let profile = s
    .get_profile(user.user_id)
    .await
    .unwrap()
    .expect("profile should exist");
  assert_eq!(profile.full_name, "María Solís");
  assert_eq!(profile.nisuv, "u1234");
  assert!(profile.must_change_password);

  assert!(s.get_profile(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_password_clears_the_must_change_flag() {
  let s = store().await;
  let user = s.create_user(operator("u1234@example.test")).await.unwrap();

  s.update_password(user.user_id, "$argon2id$v=19$fresh".into())
    .await
    .unwrap();

  let found = s
    .get_user_by_login("u1234@example.test")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.password_hash, "$argon2id$v=19$fresh");
  assert!(!found.must_change_password);
}

#[tokio::test]
async fn session_roundtrip() {
  let s = store().await;
  let user = s.create_user(operator("u1234@example.test")).await.unwrap();

  let session = session_for(user.user_id, "tok-alive", 8);
  s.create_session(session.clone()).await.unwrap();

  let found = s.get_session("tok-alive").await.unwrap();
  assert_eq!(found, Some(session));
}

#[tokio::test]
async fn expired_sessions_read_as_absent() {
  let s = store().await;
  let user = s.create_user(operator("u1234@example.test")).await.unwrap();

  s.create_session(session_for(user.user_id, "tok-stale", -1))
    .await
    .unwrap();

  assert!(s.get_session("tok-stale").await.unwrap().is_none());
}

#[tokio::test]
async fn revoked_sessions_read_as_absent() {
  let s = store().await;
  let user = s.create_user(operator("u1234@example.test")).await.unwrap();

  s.create_session(session_for(user.user_id, "tok-gone", 8))
    .await
    .unwrap();
  s.revoke_session("tok-gone").await.unwrap();

  assert!(s.get_session("tok-gone").await.unwrap().is_none());
}
