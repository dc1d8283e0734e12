//! HTTP edge for Family Huddle.
//!
//! Wires the `huddle-core` services into an axum router: bearer-token
//! authentication, the `/api/v1` route table, service-key protected admin
//! endpoints and the process-level startup hooks.

pub mod admin;
pub mod db;
pub mod health;
pub mod infra;
pub mod nfl;
pub mod pools;
pub mod routes;
pub mod users;

pub use infra::app_state::AppState;
