pub mod auth;
pub mod profile_handlers;
pub mod user_handlers;
