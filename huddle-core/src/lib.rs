//! Core library for Family Huddle.
//!
//! Holds everything below the HTTP edge: the domain model for accounts,
//! pools, drafts and NFL reference data, the scoring engine, repository
//! ports with PostgreSQL and in-memory adapters, and the application
//! services that compose them.

/// Embedded SQL migrations for the PostgreSQL schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub mod api;
pub mod api_types;
pub mod application;
pub mod database;
pub mod domain;
/// Error types and error handling utilities
pub mod error;

pub use application::unit_of_work::AppUnitOfWork;
pub use domain::users::auth::AuthCrypto;
pub use error::{HuddleError, Result};
