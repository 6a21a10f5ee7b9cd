//! Core types and trait definitions for the Meriadock intranet backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it holds the program catalog, the
//! cascading selection rules, the typed forms, the submission pipelines,
//! and the storage abstraction they run against.

pub mod beneficiary;
pub mod cascade;
pub mod catalog;
pub mod closure;
pub mod error;
pub mod forms;
pub mod interaction;
pub mod program;
pub mod session;
pub mod store;
pub mod submit;

pub use error::{Error, Result};
