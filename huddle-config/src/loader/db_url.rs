use std::{fs::read_to_string, path::Path};

use url::Url;

use crate::{
    ConfigLoadError,
    models::sources::{EnvConfig, FileDatabaseConfig},
};

const POSTGRES_SCHEMES: [&str; 2] = ["postgres", "postgresql"];

/// Effective PostgreSQL URL: `DATABASE_URL` (or its alias), then
/// `DATABASE_URL_FILE`, then `[database].url` with an optional password
/// spliced in from the environment or a secret file.
pub fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(url) = env
        .database_url
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return validated(url).map(|parsed| Some(parsed.to_string()));
    }

    if let Some(path) = env.database_url_file.as_ref()
        && let Some(url) = read_secret_file(path)?
    {
        return validated(&url).map(|parsed| Some(parsed.to_string()));
    }

    let Some(stored_url) = file_database
        .url
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return Ok(None);
    };

    let mut parsed = validated(stored_url)?;
    if parsed.password().is_none()
        && let Some(password) = resolve_database_password(env, file_database)?
    {
        parsed
            .set_password(Some(&password))
            .map_err(|_| ConfigLoadError::InvalidDatabasePassword)?;
    }
    Ok(Some(parsed.to_string()))
}

pub fn resolve_database_password(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    if let Some(password) = env
        .database_password
        .clone()
        .filter(|value| !value.trim().is_empty())
    {
        return Ok(Some(password));
    }

    for path in [
        env.database_password_file.as_ref(),
        file_database.password_file.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(secret) = read_secret_file(path)? {
            return Ok(Some(secret));
        }
    }

    Ok(None)
}

pub fn read_secret_file(path: &Path) -> Result<Option<String>, ConfigLoadError> {
    let contents = read_to_string(path).map_err(|source| ConfigLoadError::SecretFileIo {
        path: path.to_path_buf(),
        source,
    })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn validated(raw: &str) -> Result<Url, ConfigLoadError> {
    let parsed = Url::parse(raw).map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
    if !POSTGRES_SCHEMES.contains(&parsed.scheme()) {
        return Err(ConfigLoadError::UnsupportedDatabaseScheme {
            scheme: parsed.scheme().to_string(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn env_url_wins_over_file() {
        let env = EnvConfig {
            database_url: Some("postgres://env@localhost/huddle".into()),
            ..EnvConfig::default()
        };
        let file = FileDatabaseConfig {
            url: Some("postgres://file@localhost/huddle".into()),
            password_file: None,
        };
        let url = resolve_database_url(&env, &file).unwrap().unwrap();
        assert!(url.starts_with("postgres://env@"));
    }

    #[test]
    fn password_file_is_spliced_into_file_url() {
        let mut secret = tempfile::NamedTempFile::new().unwrap();
        writeln!(secret, "s3cret").unwrap();
        let file = FileDatabaseConfig {
            url: Some("postgresql://huddle@db:5432/huddle".into()),
            password_file: Some(secret.path().to_path_buf()),
        };
        let url = resolve_database_url(&EnvConfig::default(), &file)
            .unwrap()
            .unwrap();
        assert_eq!(url, "postgresql://huddle:s3cret@db:5432/huddle");
    }

    #[test]
    fn non_postgres_urls_are_rejected() {
        let env = EnvConfig {
            database_url: Some("mysql://root@localhost/huddle".into()),
            ..EnvConfig::default()
        };
        assert!(matches!(
            resolve_database_url(&env, &FileDatabaseConfig::default()),
            Err(ConfigLoadError::UnsupportedDatabaseScheme { .. })
        ));

        let env = EnvConfig {
            database_url: Some("not a url".into()),
            ..EnvConfig::default()
        };
        assert!(matches!(
            resolve_database_url(&env, &FileDatabaseConfig::default()),
            Err(ConfigLoadError::InvalidDatabaseUrl { .. })
        ));
    }

    #[test]
    fn nothing_configured_yields_none() {
        assert!(
            resolve_database_url(&EnvConfig::default(), &FileDatabaseConfig::default())
                .unwrap()
                .is_none()
        );
    }
}
