//! # Family Huddle Server
//!
//! JSON API for family NFL team-draft pools.
//!
//! Users register, create profiles, and join pools with a profile. Each
//! entry drafts four teams before the season kicks off and scores points
//! from those teams' results all season. Final scores are posted through
//! the service-key protected admin endpoints (or simulated from the CLI),
//! which refreshes standings for every pool of the season.
//!
//! Storage is PostgreSQL; dev mode without a `DATABASE_URL` runs on an
//! in-memory store seeded with the upcoming season.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
};
use chrono::Utc;
use clap::{Args as ClapArgs, Parser, Subcommand};
use dialoguer::Confirm;
use huddle_config::{Config, ConfigLoad, ConfigLoader, CorsConfig};
use huddle_core::application::SeedOptions;
use huddle_core::domain::nfl::season::current_year;
use huddle_server::{
    AppState,
    db::{Backend, connect_postgres, open_backend, require_database_url, upcoming_season_year},
    infra::{
        config::{auth_crypto, scoring_rules, session_policy},
        startup::{ProdStartupHooks, StartupHooks},
    },
    routes::create_app_router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "huddle-server")]
#[command(about = "Family Huddle football pool server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, global = true, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, global = true, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Run database preflight checks and exit
    Preflight,
    /// Apply database migrations and exit (runs preflight first)
    Migrate,
    /// Load NFL teams and a generated season schedule
    Seed(SeedArgs),
    /// Delete every row from every application table
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Post random final scores for unplayed games and rescore pools
    Simulate {
        /// Last week (inclusive) to simulate
        #[arg(long)]
        through_week: i32,
        #[arg(long, default_value_t = 7)]
        rng_seed: u64,
    },
}

#[derive(ClapArgs, Debug, Clone)]
struct SeedArgs {
    /// Season year to generate (defaults to the current year)
    #[arg(long)]
    season: Option<i32>,
    /// Also create the sample family accounts and pool
    #[arg(long)]
    samples: bool,
    /// Reload teams even if reference data already exists
    #[arg(long)]
    force: bool,
    #[arg(long, default_value_t = 7)]
    rng_seed: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        None | Some(Command::Serve) => run_server(config).await,
        Some(Command::Db(command)) => run_db_command(config, command).await,
    }
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::new()
        .load()
        .context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file in effect");
    }
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

fn build_state(config: &Config, backend: &Backend) -> anyhow::Result<AppState> {
    let crypto = Arc::new(auth_crypto(&config.auth)?);
    let mut state = AppState::new(
        backend.unit_of_work.clone(),
        crypto,
        session_policy(&config.auth),
        scoring_rules(&config.scoring),
    )
    .with_service_key(config.auth.service_key.clone());
    if let Some(postgres) = &backend.postgres {
        state = state.with_postgres(postgres.clone());
    }
    Ok(state)
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let backend = open_backend(&config).await?;
    let state = build_state(&config, &backend)?;

    if backend.is_ephemeral() {
        let report = state
            .seeder()
            .seed(
                SeedOptions {
                    season_year: upcoming_season_year(Utc::now().date_naive()),
                    with_samples: true,
                    force: false,
                    rng_seed: 7,
                },
                Utc::now(),
            )
            .await
            .context("failed to seed the in-memory store")?;
        info!(
            teams = report.teams,
            games = report.games,
            "in-memory store seeded with sample data"
        );
    }

    ProdStartupHooks
        .run(&state)
        .await
        .context("startup hooks failed")?;

    let app = create_app(&config, state);
    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind_address()))?;

    info!(%addr, "starting Family Huddle server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

fn create_app(config: &Config, state: AppState) -> Router {
    create_app_router(state.clone())
        .layer(cors_layer(config.dev_mode, &config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive in dev mode, allow-list otherwise.
fn cors_layer(dev_mode: bool, cors: &CorsConfig) -> CorsLayer {
    if dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let any_origin = cors.is_wildcard_included() || origins.is_empty();
    let allow_origin = if any_origin {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|method| Method::from_bytes(method.as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = cors
        .allowed_headers
        .iter()
        .filter_map(|header| HeaderName::from_bytes(header.as_bytes()).ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers));
    // tower-http refuses credentials combined with a wildcard origin
    if cors.allow_credentials && !any_origin {
        layer = layer.allow_credentials(true);
    }
    layer
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

async fn run_db_command(config: Config, command: DbCommand) -> anyhow::Result<()> {
    require_database_url(&config)?;

    match command {
        DbCommand::Preflight => {
            let postgres = connect_postgres(&config).await?;
            postgres
                .preflight_only()
                .await
                .context("database preflight failed")?;
            info!("Database preflight passed");
        }
        DbCommand::Migrate => {
            let postgres = connect_postgres(&config).await?;
            postgres
                .initialize_schema()
                .await
                .context("database migration failed")?;
            info!("Database migrations applied successfully");
        }
        DbCommand::Seed(args) => {
            let state = build_state(&config, &open_backend(&config).await?)?;
            let options = SeedOptions {
                season_year: args.season.unwrap_or_else(|| current_year(Utc::now())),
                with_samples: args.samples,
                force: args.force,
                rng_seed: args.rng_seed,
            };
            let report = state
                .seeder()
                .seed(options, Utc::now())
                .await
                .context("seeding failed")?;
            if report.skipped {
                info!("reference data already present; pass --force to reload teams");
            } else {
                info!(
                    teams = report.teams,
                    weeks = report.weeks,
                    games = report.games,
                    sample_users = report.sample_users,
                    sample_pool = ?report.sample_pool,
                    "seed complete"
                );
            }
        }
        DbCommand::Reset { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete ALL Family Huddle data from this database?")
                    .default(false)
                    .interact()
                    .context("failed to read confirmation")?;
                if !confirmed {
                    info!("reset cancelled");
                    return Ok(());
                }
            }
            let state = build_state(&config, &open_backend(&config).await?)?;
            state.seeder().reset().await.context("reset failed")?;
            warn!("all application tables truncated");
        }
        DbCommand::Simulate {
            through_week,
            rng_seed,
        } => {
            let state = build_state(&config, &open_backend(&config).await?)?;
            let report = state
                .seeder()
                .simulate(&state.scoring, through_week, rng_seed, Utc::now())
                .await
                .context("simulation failed")?;
            info!(
                games = report.games_recorded,
                pools = report.pools_recomputed,
                "simulation complete"
            );
        }
    }

    Ok(())
}
