//! JSON REST API for the intranet.
//!
//! Exposes an axum [`Router`] backed by any
//! [`meriadock_core::store::IntranetStore`]. Auth, sessions, and transport
//! concerns are the caller's responsibility; `POST /interactions` expects a
//! [`meriadock_core::session::SessionContext`] request extension.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", meriadock_api::api_router(store.clone()))
//! ```

pub mod beneficiaries;
pub mod error;
pub mod interactions;
pub mod programs;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use meriadock_core::store::IntranetStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: IntranetStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Programs
    .route(
      "/programs",
      get(programs::list::<S>).post(programs::register::<S>),
    )
    .route("/programs/options", get(programs::options::<S>))
    .route("/programs/{folio}", put(programs::update::<S>))
    .route("/programs/{folio}/close", post(programs::close::<S>))
    // Beneficiaries
    .route("/beneficiaries", post(beneficiaries::register_support::<S>))
    .route(
      "/beneficiaries/attendance",
      post(beneficiaries::record_attendance::<S>),
    )
    .route("/beneficiaries/names", get(beneficiaries::names::<S>))
    // Interactions
    .route("/interactions", post(interactions::create::<S>))
    .with_state(store)
}
