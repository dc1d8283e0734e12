use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::{first_var, parse_bool_var, parse_csv_var, parse_var};

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub scoring: FileScoringConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_methods: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_pepper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_ttl_secs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_ttl_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_key: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileScoringConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_points: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_points: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_points: Option<i32>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub database_url: Option<String>,
    pub database_url_file: Option<PathBuf>,
    pub database_password: Option<String>,
    pub database_password_file: Option<PathBuf>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub cors_allowed_methods: Option<Vec<String>>,
    pub cors_allowed_headers: Option<Vec<String>>,
    pub cors_allow_credentials: Option<bool>,
    pub dev_mode: Option<bool>,
    pub auth_password_pepper: Option<String>,
    pub auth_token_key: Option<String>,
    pub auth_access_ttl_secs: Option<i64>,
    pub auth_refresh_ttl_days: Option<i64>,
    pub service_key: Option<String>,
    pub scoring_win_points: Option<i32>,
    pub scoring_tie_points: Option<i32>,
    pub scoring_loss_points: Option<i32>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: std::env::var("HUDDLE_CONFIG_PATH").ok().map(PathBuf::from),
            server_host: std::env::var("SERVER_HOST").ok(),
            server_port: parse_var("SERVER_PORT"),
            database_url: first_var(&["DATABASE_URL", "SUPABASE_DB_URL"]),
            database_url_file: std::env::var("DATABASE_URL_FILE").ok().map(PathBuf::from),
            database_password: std::env::var("DATABASE_PASSWORD").ok(),
            database_password_file: std::env::var("DATABASE_PASSWORD_FILE")
                .ok()
                .map(PathBuf::from),

            cors_allowed_origins: parse_csv_var("CORS_ALLOWED_ORIGINS"),
            cors_allowed_methods: parse_csv_var("CORS_ALLOWED_METHODS"),
            cors_allowed_headers: parse_csv_var("CORS_ALLOWED_HEADERS"),
            cors_allow_credentials: parse_bool_var("CORS_ALLOW_CREDENTIALS"),

            dev_mode: parse_bool_var("DEV_MODE"),

            auth_password_pepper: std::env::var("AUTH_PASSWORD_PEPPER").ok(),
            auth_token_key: std::env::var("AUTH_TOKEN_KEY").ok(),
            auth_access_ttl_secs: parse_var("AUTH_ACCESS_TTL_SECS"),
            auth_refresh_ttl_days: parse_var("AUTH_REFRESH_TTL_DAYS"),
            service_key: first_var(&["HUDDLE_SERVICE_KEY", "SUPABASE_SERVICE_KEY"]),

            scoring_win_points: parse_var("SCORING_WIN_POINTS"),
            scoring_tie_points: parse_var("SCORING_TIE_POINTS"),
            scoring_loss_points: parse_var("SCORING_LOSS_POINTS"),
        }
    }
}
