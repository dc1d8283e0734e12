use anyhow::Result;
use axum::http::StatusCode;
use huddle_core::api::routes::{HEALTH, PING, fill, v1};
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;
use support::{
    SERVICE_KEY, bearer, build_test_app, build_test_app_with_key, create_pool, draft_around,
    first_week_game, register,
};

#[tokio::test]
async fn posted_results_flow_into_standings() -> Result<()> {
    let (server, state, season) = build_test_app().await?.into_server()?;
    let alice = register(&server, "Alice").await;
    let bob = register(&server, "Bob").await;
    let pool_id = create_pool(&server, &alice, season).await;
    server
        .post(&fill(v1::pools::JOIN, &[("pool_id", &pool_id)]))
        .add_header("Authorization", bearer(&bob.access_token))
        .json(&json!({ "profile_id": bob.profile_id }))
        .await
        .assert_status_ok();

    let game = first_week_game(&state, season).await?;
    let drafts = [
        (&alice, draft_around(&state, game.home_team_id, game.away_team_id).await?),
        (&bob, draft_around(&state, game.away_team_id, game.home_team_id).await?),
    ];
    for (account, team_ids) in &drafts {
        server
            .put(&fill(
                v1::pools::SELECTIONS,
                &[("pool_id", &pool_id), ("profile_id", &account.profile_id)],
            ))
            .add_header("Authorization", bearer(&account.access_token))
            .json(&json!({ "team_ids": team_ids }))
            .await
            .assert_status_ok();
    }

    let result = server
        .post(&fill(
            v1::admin::GAME_RESULT,
            &[("game_id", &game.game_id.to_string())],
        ))
        .add_header("X-Service-Key", SERVICE_KEY)
        .json(&json!({ "home_score": 24, "away_score": 10 }))
        .await;
    result.assert_status_ok();
    let body: Value = result.json();
    assert_eq!(body["data"]["game"]["home_score"], 24);
    assert_eq!(body["data"]["pools_recomputed"], 1);

    let standings = server
        .get(&fill(v1::pools::STANDINGS, &[("pool_id", &pool_id)]))
        .add_header("Authorization", bearer(&bob.access_token))
        .await;
    standings.assert_status_ok();
    let body: Value = standings.json();
    let rows: Vec<(String, i64, i64)> = body["data"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    (
                        row["profile_id"].as_str().unwrap_or_default().to_string(),
                        row["rank"].as_i64().unwrap_or_default(),
                        row["total_points"].as_i64().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(
        rows,
        vec![
            (alice.profile_id.clone(), 1, 10),
            (bob.profile_id.clone(), 2, 0),
        ]
    );

    let weekly = server
        .get(&fill(v1::pools::WEEKLY_STANDINGS, &[("pool_id", &pool_id)]))
        .add_header("Authorization", bearer(&alice.access_token))
        .await;
    weekly.assert_status_ok();
    let body: Value = weekly.json();
    let alice_weeks = body["data"]
        .as_array()
        .and_then(|entries| {
            entries
                .iter()
                .find(|entry| entry["profile_id"] == alice.profile_id.as_str())
        })
        .map(|entry| entry["weeks"].clone())
        .unwrap_or_default();
    assert_eq!(
        alice_weeks,
        json!([{ "week_number": 1, "points_earned": 10, "total_points": 10 }])
    );

    let report = server
        .get(&format!(
            "{}?limit=2",
            fill(v1::pools::TEAM_REPORT, &[("pool_id", &pool_id)])
        ))
        .add_header("Authorization", bearer(&alice.access_token))
        .await;
    report.assert_status_ok();
    let body: Value = report.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn admin_routes_require_the_service_key() -> Result<()> {
    let (server, _state, season) = build_test_app().await?.into_server()?;
    let alice = register(&server, "Alice").await;
    let pool_id = create_pool(&server, &alice, season).await;
    let recompute = fill(v1::admin::RECOMPUTE_POOL, &[("pool_id", &pool_id)]);

    server
        .post(&recompute)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .post(&recompute)
        .add_header("X-Service-Key", "guess")
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .post(&recompute)
        .add_header("Authorization", bearer(&alice.access_token))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .post(&recompute)
        .add_header("Authorization", bearer(SERVICE_KEY))
        .await
        .assert_status_ok();
    Ok(())
}

#[tokio::test]
async fn admin_routes_are_disabled_without_a_configured_key() -> Result<()> {
    let (server, _state, season) = build_test_app_with_key(None).await?.into_server()?;
    let alice = register(&server, "Alice").await;
    let pool_id = create_pool(&server, &alice, season).await;

    server
        .post(&fill(v1::admin::RECOMPUTE_POOL, &[("pool_id", &pool_id)]))
        .add_header("X-Service-Key", SERVICE_KEY)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn liveness_and_reference_endpoints_are_public() -> Result<()> {
    let (server, _state, season) = build_test_app().await?.into_server()?;

    server.get(PING).await.assert_status_ok();

    let health = server.get(HEALTH).await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");

    let season_body: Value = server.get(v1::nfl::CURRENT_SEASON).await.json();
    assert_eq!(season_body["data"]["season_year"], season);
    assert_eq!(season_body["data"]["weeks"].as_array().map(Vec::len), Some(18));

    let board: Value = server.get(v1::nfl::TEAMS).await.json();
    assert_eq!(board["data"].as_array().map(Vec::len), Some(2));
    Ok(())
}
