//! HTTP layer for the Meriadock intranet.
//!
//! Exposes an axum [`Router`] combining the session lifecycle (login,
//! logout, password change, session introspection) with the form submission
//! API from `meriadock-api`, backed by any [`IntranetStore`].

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  extract::{Request, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  middleware::{self, Next},
  response::{IntoResponse, Redirect, Response},
  routing::{get, post},
};
use meriadock_core::{
  session::{SessionGate, SessionState},
  store::IntranetStore,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use auth::AuthService;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Domain appended to NISUV codes to form login identifiers.
  pub login_domain:      String,
  /// Name of the session cookie the routing gate looks for.
  pub cookie_name:       String,
  /// Where the routing gate sends requests that carry no session cookie.
  pub login_path:        String,
  pub session_ttl_hours: i64,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: IntranetStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   AuthService<S>,
}

impl<S> AppState<S>
where
  S: IntranetStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  pub fn new(store: Arc<S>, config: Arc<ServerConfig>) -> Self {
    let auth = AuthService::new(store.clone(), config.clone());
    Self { store, config, auth }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the intranet server.
///
/// - `POST /login`, `POST /logout`, `POST /password`, `GET /session` run
///   the session lifecycle;
/// - `GET /api/public/health` answers anonymous probes;
/// - everything else under `/api` comes from [`meriadock_api::api_router`]
///   and only runs with a resolved session;
/// - a routing gate over all remaining paths sends cookie-less requests to
///   the login page.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let api = Router::new()
    .route("/public/health", get(health))
    .merge(meriadock_api::api_router(state.store.clone()).layer(
      middleware::from_fn_with_state(state.clone(), resolve_session::<S>),
    ));

  Router::new()
    .route("/login",    post(login::<S>))
    .route("/logout",   post(logout::<S>))
    .route("/password", post(change_password::<S>))
    .route("/session",  get(session_state::<S>))
    .with_state(state.clone())
    .nest("/api", api)
    .layer(middleware::from_fn_with_state(state, routing_gate::<S>))
    .layer(TraceLayer::new_for_http())
}

// ─── Middleware ───────────────────────────────────────────────────────────────

/// Cookie-presence gate over every path except the login entry point and
/// the public API prefix.
///
/// Presence is the entire contract: the token is only validated where a
/// session is actually consumed. A request carrying any value under the
/// session cookie name passes through.
async fn routing_gate<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Response
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let path = req.uri().path();
  let exempt = path.starts_with(&state.config.login_path)
    || path.starts_with("/api/public");

  if !exempt
    && session_token(req.headers(), &state.config.cookie_name).is_none()
  {
    return Redirect::temporary(&state.config.login_path).into_response();
  }
  next.run(req).await
}

/// Resolve the session cookie into a [`SessionContext`] and hand it to the
/// API handlers as a request extension. Requests whose token does not
/// resolve are answered with 401 rather than a redirect; API callers are
/// programs, not browsers.
///
/// [`SessionContext`]: meriadock_core::session::SessionContext
async fn resolve_session<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Response
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Some(token) = session_token(req.headers(), &state.config.cookie_name)
  else {
    return Error::Unauthorized.into_response();
  };

  let ctx = match state.auth.resolve(&token).await {
    Ok(Some(ctx)) => ctx,
    Ok(None) => return Error::Unauthorized.into_response(),
    Err(e) => return e.into_response(),
  };

  req.extensions_mut().insert(ctx);
  next.run(req).await
}

/// Pull a cookie value out of the `Cookie` header.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
  let raw = headers.get(header::COOKIE)?.to_str().ok()?;
  raw.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    (name == cookie_name).then(|| value.to_string())
  })
}

/// Build the session `Set-Cookie` value; `None` clears the cookie.
fn session_cookie(
  config: &ServerConfig,
  token: Option<&str>,
) -> Result<HeaderValue, Error> {
  let value = match token {
    Some(token) => format!(
      "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
      config.cookie_name,
      token,
      config.session_ttl_hours * 3600
    ),
    None => format!(
      "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
      config.cookie_name
    ),
  };
  HeaderValue::from_str(&value)
    .map_err(|e| Error::Config(format!("cookie value: {e}")))
}

// ─── Session handlers ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginBody {
  pub nisuv:    String,
  pub password: String,
}

#[derive(Deserialize)]
pub struct PasswordBody {
  pub new_password: String,
}

/// `POST /login` — sign in with a NISUV code and password.
///
/// On success the session token is set as an http-only cookie and the body
/// reports whether the operator must still change their password before
/// working.
async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Response, Error>
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.nisuv.trim().is_empty() || body.password.is_empty() {
    return Err(Error::BadRequest("Please complete both fields.".to_string()));
  }

  let signin = state.auth.sign_in(&body.nisuv, &body.password).await?;

  let mut res = Json(json!({
    "must_change_password": signin.must_change_password,
  }))
  .into_response();
  res.headers_mut().insert(
    header::SET_COOKIE,
    session_cookie(&state.config, Some(&signin.token))?,
  );
  Ok(res)
}

/// `POST /logout` — revoke the current session and clear the cookie.
/// Idempotent: a request without a usable cookie still clears it.
async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if let Some(token) = session_token(&headers, &state.config.cookie_name) {
    state.auth.sign_out(&token).await?;
  }

  let mut res = StatusCode::NO_CONTENT.into_response();
  res
    .headers_mut()
    .insert(header::SET_COOKIE, session_cookie(&state.config, None)?);
  Ok(res)
}

/// `POST /password` — replace the caller's password.
///
/// Clears the must-change flag as part of the same write, so the next
/// sign-in goes straight through.
async fn change_password<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<PasswordBody>,
) -> Result<StatusCode, Error>
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.new_password.is_empty() {
    return Err(Error::BadRequest("Enter a new password.".to_string()));
  }

  let token = session_token(&headers, &state.config.cookie_name)
    .ok_or(Error::Unauthorized)?;
  state.auth.change_password(&token, &body.new_password).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /session` — report the caller's session state.
///
/// A token that fails to resolve is not an error here; the caller is
/// simply signed out and the body says so. The response is one resolution
/// pass of the same [`SessionGate`] interactive clients drive.
async fn session_state<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Error>
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let resolved = match session_token(&headers, &state.config.cookie_name) {
    Some(token) => state.auth.resolve(&token).await?,
    None => None,
  };

  let mut gate = SessionGate::new();
  let attempt = gate.begin_resolution();
  let (user, profile) = match resolved {
    Some(ctx) => (Some(ctx.user), ctx.profile),
    None => (None, None),
  };
  gate.resolve(attempt, user, profile);

  Ok(Json(match gate.state() {
    SessionState::Authenticated(ctx) => json!({
      "authenticated": true,
      "user":          ctx.user,
      "profile":       ctx.profile,
    }),
    _ => json!({ "authenticated": false }),
  }))
}

/// `GET /api/public/health` — anonymous liveness probe.
async fn health() -> Json<serde_json::Value> {
  Json(json!({ "status": "ok" }))
}

// ─── Integration tests ────────────────────────────────────────────────────────
