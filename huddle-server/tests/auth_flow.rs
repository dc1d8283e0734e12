use anyhow::Result;
use axum::http::StatusCode;
use huddle_core::api::routes::v1;
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;
use support::{PASSWORD, bearer, build_test_app, register, text};

#[tokio::test]
async fn registration_opens_a_session_with_a_default_profile() -> Result<()> {
    let (server, _state, _season) = build_test_app().await?.into_server()?;
    let account = register(&server, "Dana").await;

    let me = server
        .get(v1::users::CURRENT)
        .add_header("Authorization", bearer(&account.access_token))
        .await;
    me.assert_status_ok();
    let body: Value = me.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["user"]["email"], "dana@example.com");
    assert_eq!(body["data"]["profiles"][0]["display_name"], "Dana Huddle");
    assert_eq!(body["data"]["profiles"][0]["profile_id"], account.profile_id.as_str());
    Ok(())
}

#[tokio::test]
async fn long_names_register_with_a_shortened_default_profile() -> Result<()> {
    let (server, _state, _season) = build_test_app().await?.into_server()?;
    let first_name = "A".repeat(30);
    let last_name = "B".repeat(30);

    let response = server
        .post(v1::auth::REGISTER)
        .json(&json!({
            "email": "long.names@example.com",
            "password": PASSWORD,
            "confirm_password": PASSWORD,
            "first_name": first_name,
            "last_name": last_name,
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["user"]["last_name"], last_name.as_str());
    let display_name = text(&body["data"]["profiles"][0]["display_name"]);
    assert_eq!(display_name, format!("{} {}", first_name, "B".repeat(19)));
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() -> Result<()> {
    let (server, _state, _season) = build_test_app().await?.into_server()?;

    let anonymous = server.get(v1::users::CURRENT).await;
    anonymous.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = anonymous.json();
    assert_eq!(body["error"]["status"], 401);

    let forged = server
        .get(v1::profiles::COLLECTION)
        .add_header("Authorization", bearer("not-a-real-token"))
        .await;
    forged.assert_status(StatusCode::UNAUTHORIZED);

    let public = server.get(v1::nfl::TEAMS).await;
    public.assert_status_ok();
    Ok(())
}

#[tokio::test]
async fn registration_errors_are_reported() -> Result<()> {
    let (server, _state, _season) = build_test_app().await?.into_server()?;
    register(&server, "Erin").await;

    let duplicate = server
        .post(v1::auth::REGISTER)
        .json(&json!({
            "email": "ERIN@example.com",
            "password": PASSWORD,
            "confirm_password": PASSWORD,
            "first_name": "Erin",
            "last_name": "Again",
        }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    let body: Value = duplicate.json();
    assert_eq!(
        body["error"]["message"],
        "An account with this email already exists"
    );

    let mismatch = server
        .post(v1::auth::REGISTER)
        .json(&json!({
            "email": "frank@example.com",
            "password": PASSWORD,
            "confirm_password": "different",
            "first_name": "Frank",
            "last_name": "Huddle",
        }))
        .await;
    mismatch.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = mismatch.json();
    assert_eq!(body["error"]["message"], "Passwords do not match");

    let bad_login = server
        .post(v1::auth::LOGIN)
        .json(&json!({ "email": "erin@example.com", "password": "wrong-password" }))
        .await;
    bad_login.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = bad_login.json();
    assert_eq!(body["error"]["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn refresh_rotates_tokens_and_logout_revokes_them() -> Result<()> {
    let (server, _state, _season) = build_test_app().await?.into_server()?;
    let account = register(&server, "Gale").await;

    let refreshed = server
        .post(v1::auth::REFRESH)
        .json(&json!({ "refresh_token": account.refresh_token }))
        .await;
    refreshed.assert_status_ok();
    let body: Value = refreshed.json();
    let access_token = text(&body["data"]["access_token"]);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_ne!(access_token, account.access_token);

    server
        .get(v1::users::CURRENT)
        .add_header("Authorization", bearer(&account.access_token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let reused = server
        .post(v1::auth::REFRESH)
        .json(&json!({ "refresh_token": account.refresh_token }))
        .await;
    reused.assert_status(StatusCode::UNAUTHORIZED);

    server
        .post(v1::auth::LOGOUT)
        .add_header("Authorization", bearer(&access_token))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(v1::users::CURRENT)
        .add_header("Authorization", bearer(&access_token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn password_change_revokes_every_session() -> Result<()> {
    let (server, _state, _season) = build_test_app().await?.into_server()?;
    let account = register(&server, "Hana").await;
    let new_password = "brand-new-secret";

    let update = server
        .put(v1::users::CHANGE_PASSWORD)
        .add_header("Authorization", bearer(&account.access_token))
        .json(&json!({
            "current_password": PASSWORD,
            "new_password": new_password,
            "confirm_password": new_password,
        }))
        .await;
    update.assert_status(StatusCode::NO_CONTENT);

    server
        .get(v1::users::CURRENT)
        .add_header("Authorization", bearer(&account.access_token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post(v1::auth::LOGIN)
        .json(&json!({ "email": "hana@example.com", "password": PASSWORD }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let login = server
        .post(v1::auth::LOGIN)
        .json(&json!({ "email": "hana@example.com", "password": new_password }))
        .await;
    login.assert_status_ok();
    let body: Value = login.json();
    assert!(body["data"]["tokens"]["access_token"].is_string());
    Ok(())
}
