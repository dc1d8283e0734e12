pub mod db_url;
pub mod error;

use std::{fs, path::PathBuf};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::constants::{
    DEFAULT_ACCESS_TTL_SECS, DEFAULT_HOST, DEFAULT_LOSS_POINTS, DEFAULT_PASSWORD_PEPPER,
    DEFAULT_PORT, DEFAULT_REFRESH_TTL_DAYS, DEFAULT_TIE_POINTS, DEFAULT_TOKEN_KEY,
    DEFAULT_WIN_POINTS,
};
use crate::models::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig, ScoringConfig, ServerConfig,
    sources::{EnvConfig, FileConfig},
};
use crate::validation::{self, ConfigWarnings};
use error::ConfigLoadError;

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("huddle.toml"),
        PathBuf::from("config/huddle.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Prime the process environment from the env file, then compose.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file = self
            .options
            .env_file
            .clone()
            .or_else(|| std::env::var("HUDDLE_ENV_FILE").ok().map(PathBuf::from));
        let env_file_loaded = match &env_file {
            Some(path) => missing_is_ok(dotenvy::from_path(path).map(|_| ()))?,
            None => missing_is_ok(dotenvy::dotenv().map(|_| ()))?,
        };
        self.load_with_env(EnvConfig::gather(), env_file, env_file_loaded)
    }

    /// Compose from an already gathered environment layer.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
        env_file: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let mut warnings = ConfigWarnings::default();
        if config_path.is_none() {
            warnings.push_with_hint(
                "No huddle.toml detected; using environment variables and defaults",
                "Set HUDDLE_CONFIG_PATH or create ./huddle.toml",
            );
        }

        let config = compose(
            file_config.unwrap_or_default(),
            env,
            ConfigMetadata {
                config_path,
                env_file,
                env_file_loaded,
            },
        )?;
        warnings.extend(validation::apply_guard_rails(&config)?);
        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let requested = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match requested {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
            {
                Some(found) => found.clone(),
                None => return Ok((None, None)),
            },
        };

        let contents = fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "configuration file loaded");
        Ok((Some(file_config), Some(path)))
    }
}

fn missing_is_ok(result: Result<(), dotenvy::Error>) -> Result<bool, ConfigLoadError> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Environment first, then file, then defaults.
fn compose(
    file: FileConfig,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<Config, ConfigLoadError> {
    let FileConfig {
        server: file_server,
        database: file_database,
        cors: file_cors,
        auth: file_auth,
        scoring: file_scoring,
        dev_mode: file_dev_mode,
    } = file;

    let server = ServerConfig {
        host: env
            .server_host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: env.server_port.or(file_server.port).unwrap_or(DEFAULT_PORT),
    };

    let database = DatabaseConfig {
        primary_url: db_url::resolve_database_url(&env, &file_database)?,
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or_else(default_cors_origins),
        allowed_methods: env
            .cors_allowed_methods
            .or(file_cors.allowed_methods)
            .unwrap_or_else(default_cors_methods),
        allowed_headers: env
            .cors_allowed_headers
            .or(file_cors.allowed_headers)
            .unwrap_or_else(default_cors_headers),
        allow_credentials: env
            .cors_allow_credentials
            .or(file_cors.allow_credentials)
            .unwrap_or(false),
    };

    let auth = AuthConfig {
        password_pepper: env
            .auth_password_pepper
            .or(file_auth.password_pepper)
            .unwrap_or_else(|| DEFAULT_PASSWORD_PEPPER.to_string()),
        token_key: env
            .auth_token_key
            .or(file_auth.token_key)
            .unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_string()),
        access_ttl_secs: env
            .auth_access_ttl_secs
            .or(file_auth.access_ttl_secs)
            .unwrap_or(DEFAULT_ACCESS_TTL_SECS),
        refresh_ttl_days: env
            .auth_refresh_ttl_days
            .or(file_auth.refresh_ttl_days)
            .unwrap_or(DEFAULT_REFRESH_TTL_DAYS),
        service_key: env
            .service_key
            .or(file_auth.service_key)
            .filter(|key| !key.trim().is_empty()),
    };

    let scoring = ScoringConfig {
        win_points: env
            .scoring_win_points
            .or(file_scoring.win_points)
            .unwrap_or(DEFAULT_WIN_POINTS),
        tie_points: env
            .scoring_tie_points
            .or(file_scoring.tie_points)
            .unwrap_or(DEFAULT_TIE_POINTS),
        loss_points: env
            .scoring_loss_points
            .or(file_scoring.loss_points)
            .unwrap_or(DEFAULT_LOSS_POINTS),
    };

    Ok(Config {
        server,
        database,
        cors,
        dev_mode: env.dev_mode.or(file_dev_mode).unwrap_or(false),
        auth,
        scoring,
        metadata,
    })
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_cors_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_cors_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "X-Service-Key"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::ConfigGuardRailError;

    const STRONG: &str = "0123456789abcdef0123456789abcdef";

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn dev_env() -> EnvConfig {
        EnvConfig {
            dev_mode: Some(true),
            ..EnvConfig::default()
        }
    }

    #[test]
    fn defaults_apply_in_dev_mode() {
        let file = toml_file("");
        let load = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(dev_env(), None, false)
            .unwrap();
        let config = load.config;

        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.auth.access_ttl_secs, 3600);
        assert_eq!(config.auth.refresh_ttl_days, 30);
        assert_eq!(
            config.scoring,
            ScoringConfig {
                win_points: 10,
                tie_points: 5,
                loss_points: 0,
            }
        );
        assert!(config.auth.is_default_pepper());
        assert!(load.warnings.contains("development auth secrets"));
        assert!(load.warnings.contains("HUDDLE_SERVICE_KEY"));
        assert!(load.warnings.contains("No database URL"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = toml_file(
            r#"
            dev_mode = true

            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://huddle@localhost/huddle"

            [scoring]
            win_points = 3
            tie_points = 1
            "#,
        );
        let env = EnvConfig {
            server_port: Some(9000),
            scoring_win_points: Some(7),
            service_key: Some("svc".into()),
            ..EnvConfig::default()
        };
        let config = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env, None, false)
            .unwrap()
            .config;

        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.scoring.win_points, 7);
        assert_eq!(config.scoring.tie_points, 1);
        assert_eq!(
            config.database.primary_url.as_deref(),
            Some("postgres://huddle@localhost/huddle")
        );
        assert_eq!(config.auth.service_key.as_deref(), Some("svc"));
        assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = ConfigLoader::new()
            .with_config_path("/nonexistent/huddle.toml")
            .load_with_env(dev_env(), None, false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn malformed_toml_reports_parse_error() {
        let file = toml_file("[server\nport = 1");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(dev_env(), None, false)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn production_rejects_placeholder_secrets() {
        let file = toml_file("");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(EnvConfig::default(), None, false)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::GuardRail(ConfigGuardRailError::WeakSecret {
                field: "AUTH_PASSWORD_PEPPER",
                ..
            })
        ));
    }

    #[test]
    fn production_rejects_wildcard_cors() {
        let file = toml_file("");
        let env = EnvConfig {
            auth_password_pepper: Some(STRONG.into()),
            auth_token_key: Some(STRONG.into()),
            cors_allowed_origins: Some(vec!["*".into()]),
            ..EnvConfig::default()
        };
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(env, None, false)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::GuardRail(ConfigGuardRailError::DangerousCorsWildcard)
        ));
    }

    #[test]
    fn token_lifetimes_must_be_ordered() {
        let file = toml_file("[auth]\naccess_ttl_secs = 7200\nrefresh_ttl_days = 0\n");
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load_with_env(dev_env(), None, false)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::GuardRail(ConfigGuardRailError::InvalidAuthConfig { .. })
        ));
    }

    #[test]
    fn invalid_cors_method_is_rejected() {
        let file = toml_file("");
        let env = EnvConfig {
            cors_allowed_methods: Some(vec!["GET POST".into()]),
            ..dev_env()
        };
        assert!(matches!(
            ConfigLoader::new()
                .with_config_path(file.path())
                .load_with_env(env, None, false),
            Err(ConfigLoadError::GuardRail(
                ConfigGuardRailError::InvalidCorsConfig { .. }
            ))
        ));
    }
}
