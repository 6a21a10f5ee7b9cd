//! Embedded database schema.

/// Applied on startup via `execute_batch`; every statement is idempotent.
///
/// Relation and column names keep the original Spanish data vocabulary so
/// folios, literals, and exports line up with the organisation's records.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS programas (
  id              INTEGER PRIMARY KEY,
  folio_programa  TEXT NOT NULL UNIQUE,
  nombre          TEXT NOT NULL,
  direccion       TEXT NOT NULL,
  coordinacion    TEXT NOT NULL,
  estado          TEXT NOT NULL,           -- 'Activo' | 'Suspendido'
  tipo_constancia TEXT NOT NULL,           -- certificate code, e.g. 'CF'
  responsable     TEXT NOT NULL,
  observaciones   TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS programa_planeacion (
  id                      INTEGER PRIMARY KEY,
  programa_id             INTEGER NOT NULL REFERENCES programas(id),
  fecha_inicio            TEXT NOT NULL,   -- ISO 8601 date
  fecha_fin               TEXT,            -- ISO 8601 date
  objetivo                TEXT NOT NULL,
  actividades             TEXT NOT NULL,
  beneficiarios_previstos TEXT NOT NULL    -- free text, kept as entered
);

CREATE TABLE IF NOT EXISTS programa_resultados (
  id                       INTEGER PRIMARY KEY,
  programa_id              INTEGER NOT NULL REFERENCES programas(id),
  beneficiarios_alcanzados INTEGER NOT NULL,
  resultados               TEXT NOT NULL,
  cumplimiento             TEXT NOT NULL,  -- 'Si' | 'No' | 'Parcial'
  recomendaciones          TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS programa_cierre (
  id              INTEGER PRIMARY KEY,
  programa_id     INTEGER NOT NULL REFERENCES programas(id),
  fecha_cierre    TEXT NOT NULL,           -- ISO 8601 date
  acta_referencia TEXT NOT NULL,
  cerrado_por     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS beneficiarios (
  id                  INTEGER PRIMARY KEY,
  programa_id         INTEGER NOT NULL REFERENCES programas(id),
  nombre_beneficiario TEXT NOT NULL,
  tipo_apoyo          TEXT,                -- support registrations only
  concluyo            TEXT,                -- attendance rows: 'Si' | 'No'
  folio_constancia    TEXT,
  fecha_constancia    TEXT                 -- ISO 8601 date
);

CREATE TABLE IF NOT EXISTS usuarios (
  uuid                 TEXT PRIMARY KEY,
  login                TEXT NOT NULL UNIQUE,
  nisuv                TEXT NOT NULL,
  nombre_completo      TEXT NOT NULL,
  password_hash        TEXT NOT NULL,      -- PHC string
  must_change_password INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS interacciones (
  id                  INTEGER PRIMARY KEY,
  user_uuid           TEXT NOT NULL REFERENCES usuarios(uuid),
  programa_id         INTEGER NOT NULL REFERENCES programas(id),
  tipo_interaccion    TEXT NOT NULL,
  nombre_beneficiario TEXT NOT NULL,
  numero_sesion       TEXT NOT NULL,       -- free text, kept as entered
  observaciones       TEXT
);

CREATE TABLE IF NOT EXISTS sesiones (
  token      TEXT PRIMARY KEY,
  user_uuid  TEXT NOT NULL REFERENCES usuarios(uuid),
  created_at TEXT NOT NULL,                -- RFC 3339
  expires_at TEXT NOT NULL                 -- RFC 3339
);

CREATE INDEX IF NOT EXISTS planeacion_programa_idx
  ON programa_planeacion(programa_id);
CREATE INDEX IF NOT EXISTS resultados_programa_idx
  ON programa_resultados(programa_id);
CREATE INDEX IF NOT EXISTS cierre_programa_idx
  ON programa_cierre(programa_id);
CREATE INDEX IF NOT EXISTS beneficiarios_programa_idx
  ON beneficiarios(programa_id);
CREATE INDEX IF NOT EXISTS interacciones_programa_idx
  ON interacciones(programa_id);
CREATE INDEX IF NOT EXISTS sesiones_user_idx
  ON sesiones(user_uuid);

PRAGMA user_version = 1;
";
