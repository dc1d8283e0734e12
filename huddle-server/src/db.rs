//! Storage selection for the server and the `db` subcommands.

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate};
use huddle_config::Config;
use huddle_core::AppUnitOfWork;
use huddle_core::database::{DatabaseContext, PostgresDatabase};
use huddle_core::domain::nfl::SeasonCalendar;
use tracing::{info, warn};

/// The repository set the process runs against.
#[derive(Debug, Clone)]
pub struct Backend {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub postgres: Option<Arc<PostgresDatabase>>,
}

impl Backend {
    pub fn in_memory() -> Self {
        Self {
            unit_of_work: Arc::new(AppUnitOfWork::in_memory()),
            postgres: None,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.postgres.is_none()
    }
}

pub fn require_database_url(config: &Config) -> anyhow::Result<&str> {
    config
        .database
        .primary_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .context("DATABASE_URL is not set; configure it or [database].url in huddle.toml")
}

pub async fn connect_postgres(config: &Config) -> anyhow::Result<Arc<PostgresDatabase>> {
    let url = require_database_url(config)?;
    let postgres = PostgresDatabase::new(url)
        .await
        .context("failed to connect to PostgreSQL")?;
    Ok(Arc::new(postgres))
}

/// PostgreSQL when a URL is configured. Dev mode without a URL falls back to
/// an in-memory store that is lost on exit.
pub async fn open_backend(config: &Config) -> anyhow::Result<Backend> {
    if config.database.primary_url.is_none() {
        if !config.dev_mode {
            bail!("DATABASE_URL is required outside dev mode");
        }
        warn!("no database configured; using the in-memory store (data is not persisted)");
        return Ok(Backend::in_memory());
    }

    let context = DatabaseContext::connect_postgres(require_database_url(config)?)
        .await
        .context("failed to connect to PostgreSQL")?;
    context
        .postgres()
        .initialize_schema()
        .await
        .context("failed to apply database migrations")?;
    info!("using PostgreSQL storage");

    Ok(Backend {
        unit_of_work: context.unit_of_work(),
        postgres: Some(context.postgres()),
    })
}

/// The season whose draft is still open on `today`: this year's until its
/// opening week, next year's afterwards.
pub fn upcoming_season_year(today: NaiveDate) -> i32 {
    let year = today.year();
    if today < SeasonCalendar::regular(year).start_date() {
        year
    } else {
        year + 1
    }
}

#[cfg(test)]
mod tests {
    use huddle_config::{ConfigLoader, models::sources::EnvConfig};

    use super::*;

    fn config(dev_mode: bool) -> Config {
        let env = EnvConfig {
            dev_mode: Some(dev_mode),
            ..EnvConfig::default()
        };
        ConfigLoader::new()
            .load_with_env(env, None, false)
            .map(|load| load.config)
            .unwrap_or_else(|err| panic!("config should load: {err}"))
    }

    #[test]
    fn upcoming_season_rolls_over_at_kickoff_week() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(upcoming_season_year(date(2027, 3, 1)), 2027);
        assert_eq!(upcoming_season_year(date(2027, 9, 6)), 2027);
        assert_eq!(upcoming_season_year(date(2027, 9, 7)), 2028);
        assert_eq!(upcoming_season_year(date(2027, 12, 31)), 2028);
    }

    #[tokio::test]
    async fn dev_mode_without_url_runs_in_memory() {
        let backend = open_backend(&config(true)).await.unwrap();
        assert!(backend.is_ephemeral());
    }

    #[test]
    fn database_url_is_required_for_db_commands() {
        let err = require_database_url(&config(true)).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }
}
