use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState, admin,
    nfl::handlers as nfl_handlers,
    pools::{pool_handlers, selection_handlers, standings_handlers},
    users::{auth, profile_handlers, user_handlers},
};

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public authentication endpoints
        .route("/auth/register", post(auth::handlers::register))
        .route("/auth/login", post(auth::handlers::login))
        .route("/auth/refresh", post(auth::handlers::refresh))
        // Public reference data
        .route("/nfl/teams", get(nfl_handlers::teams))
        .route("/nfl/seasons/current", get(nfl_handlers::current_season))
        .merge(create_protected_routes(state.clone()))
        .merge(create_admin_routes(state))
}

/// Routes that require a bearer access token
fn create_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(auth::handlers::logout))
        // Account
        .route("/users/me", get(user_handlers::current_user))
        .route("/users/me/password", put(user_handlers::change_password))
        // Profiles
        .route(
            "/profiles",
            get(profile_handlers::list_profiles).post(profile_handlers::create_profile),
        )
        .route(
            "/profiles/{profile_id}/dashboard",
            get(profile_handlers::dashboard),
        )
        .route("/profiles/{profile_id}/pools", get(profile_handlers::my_pools))
        .route(
            "/profiles/{profile_id}/pools/available",
            get(profile_handlers::available_pools),
        )
        // Pools
        .route("/pools", post(pool_handlers::create_pool))
        .route(
            "/pools/{pool_id}",
            get(pool_handlers::get_pool).delete(pool_handlers::delete_pool),
        )
        .route("/pools/{pool_id}/join", post(pool_handlers::join_pool))
        .route(
            "/pools/{pool_id}/entries/{profile_id}/selections",
            get(selection_handlers::get_selections)
                .put(selection_handlers::save_selections)
                .delete(selection_handlers::clear_selections),
        )
        // Standings
        .route(
            "/pools/{pool_id}/standings",
            get(standings_handlers::standings),
        )
        .route(
            "/pools/{pool_id}/standings/weekly",
            get(standings_handlers::weekly_standings),
        )
        .route("/pools/{pool_id}/teams", get(standings_handlers::team_report))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::auth_middleware,
        ))
}

/// Results entry, authorised by the service key instead of a user session
fn create_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/admin/games/{game_id}/result",
            post(admin::handlers::record_game_result),
        )
        .route(
            "/admin/pools/{pool_id}/recompute",
            post(admin::handlers::recompute_pool),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            admin::service_key_middleware,
        ))
}
