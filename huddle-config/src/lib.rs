//! Configuration for Family Huddle.
//!
//! Values are composed from three layers: process environment (optionally
//! primed from an env file), a TOML file, and built-in defaults. The loader
//! then runs guard rails that reject unsafe production settings and collect
//! warnings for the rest.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError};
pub use models::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig, ScoringConfig, ServerConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
