#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum_test::TestServer;
use chrono::Utc;
use huddle_core::{
    AppUnitOfWork, AuthCrypto,
    api::routes::v1,
    application::SeedOptions,
    domain::{
        nfl::Game,
        scoring::ScoringRules,
        users::auth::SessionPolicy,
    },
};
use huddle_server::{
    AppState,
    db::upcoming_season_year,
    infra::startup::{NoopStartupHooks, StartupHooks},
    routes::create_app_router,
};
use serde_json::{Value, json};
use uuid::Uuid;

pub const SERVICE_KEY: &str = "test-service-key";
pub const PASSWORD: &str = "secret123";

#[derive(Debug)]
pub struct TestApp {
    pub router: Router<AppState>,
    pub state: AppState,
    pub season_year: i32,
}

impl TestApp {
    pub fn into_server(self) -> Result<(TestServer, AppState, i32)> {
        let router: Router<()> = self.router.with_state(self.state.clone());
        let make_service = router.into_make_service_with_connect_info::<SocketAddr>();
        let server = TestServer::builder()
            .http_transport()
            .build(make_service)
            .map_err(|err| anyhow!(err.to_string()))?;
        Ok((server, self.state, self.season_year))
    }
}

/// In-memory app seeded with the upcoming season so drafting is open.
pub async fn build_test_app() -> Result<TestApp> {
    build_test_app_with_key(Some(SERVICE_KEY)).await
}

pub async fn build_test_app_with_key(service_key: Option<&str>) -> Result<TestApp> {
    build_test_app_with_hooks(service_key, &NoopStartupHooks).await
}

pub async fn build_test_app_with_hooks<H: StartupHooks>(
    service_key: Option<&str>,
    hooks: &H,
) -> Result<TestApp> {
    let unit_of_work = Arc::new(AppUnitOfWork::in_memory());
    let crypto = Arc::new(
        AuthCrypto::for_tests("integration-test-pepper", "integration-test-hmac")
            .context("failed to initialise AuthCrypto")?,
    );
    let state = AppState::new(
        unit_of_work,
        crypto,
        SessionPolicy::default(),
        ScoringRules::default(),
    )
    .with_service_key(service_key.map(str::to_string));

    let season_year = upcoming_season_year(Utc::now().date_naive());
    state
        .seeder()
        .seed(
            SeedOptions {
                season_year,
                with_samples: false,
                force: false,
                rng_seed: 3,
            },
            Utc::now(),
        )
        .await
        .context("failed to seed reference data")?;
    hooks.run(&state).await?;

    Ok(TestApp {
        router: create_app_router(state.clone()),
        state,
        season_year,
    })
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// A registered account: its access token and default profile.
#[derive(Debug, Clone)]
pub struct Account {
    pub access_token: String,
    pub refresh_token: String,
    pub profile_id: String,
}

pub async fn register(server: &TestServer, first_name: &str) -> Account {
    let response = server
        .post(v1::auth::REGISTER)
        .json(&json!({
            "email": format!("{}@Example.com", first_name),
            "password": PASSWORD,
            "confirm_password": PASSWORD,
            "first_name": first_name,
            "last_name": "Huddle",
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    Account {
        access_token: text(&body["data"]["tokens"]["access_token"]),
        refresh_token: text(&body["data"]["tokens"]["refresh_token"]),
        profile_id: text(&body["data"]["profiles"][0]["profile_id"]),
    }
}

pub async fn create_pool(server: &TestServer, owner: &Account, season_year: i32) -> String {
    let response = server
        .post(v1::pools::COLLECTION)
        .add_header("Authorization", bearer(&owner.access_token))
        .json(&json!({
            "profile_id": owner.profile_id,
            "pool_name": "Sunday Crew",
            "season_year": season_year,
            "max_participants": 4,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    text(&body["data"]["pool_id"])
}

pub async fn first_week_game(state: &AppState, season_year: i32) -> Result<Game> {
    let nfl = &state.unit_of_work.nfl;
    let season = nfl
        .get_season_by_year(season_year)
        .await?
        .context("seeded season missing")?;
    let week_one = nfl
        .list_weeks(season.season_id)
        .await?
        .into_iter()
        .find(|week| week.week_number == 1)
        .context("week 1 missing")?;
    nfl.list_games(season.season_id)
        .await?
        .into_iter()
        .find(|game| game.week_id == week_one.week_id)
        .context("week 1 has no games")
}

/// `first` followed by three more teams, never including `avoid`.
pub async fn draft_around(
    state: &AppState,
    first: Uuid,
    avoid: Uuid,
) -> Result<Vec<String>> {
    let mut picks = vec![first];
    for team in state.unit_of_work.nfl.list_teams().await? {
        if picks.len() == 4 {
            break;
        }
        if team.team_id != first && team.team_id != avoid {
            picks.push(team.team_id);
        }
    }
    Ok(picks.into_iter().map(|id| id.to_string()).collect())
}

pub fn text(value: &Value) -> String {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected a string, got {value}"))
        .to_string()
}
