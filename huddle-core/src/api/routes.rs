macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

pub const PING: &str = "/ping";
pub const HEALTH: &str = "/health";

/// Versioned API route definitions
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod auth {
        pub const REGISTER: &str = v1_path!("/auth/register");
        pub const LOGIN: &str = v1_path!("/auth/login");
        pub const REFRESH: &str = v1_path!("/auth/refresh");
        pub const LOGOUT: &str = v1_path!("/auth/logout");
    }

    pub mod users {
        pub const CURRENT: &str = v1_path!("/users/me");
        pub const CHANGE_PASSWORD: &str = v1_path!("/users/me/password");
    }

    pub mod profiles {
        pub const COLLECTION: &str = v1_path!("/profiles");
        pub const DASHBOARD: &str = v1_path!("/profiles/{profile_id}/dashboard");
        pub const POOLS: &str = v1_path!("/profiles/{profile_id}/pools");
        pub const AVAILABLE_POOLS: &str =
            v1_path!("/profiles/{profile_id}/pools/available");
    }

    pub mod pools {
        pub const COLLECTION: &str = v1_path!("/pools");
        pub const ITEM: &str = v1_path!("/pools/{pool_id}");
        pub const JOIN: &str = v1_path!("/pools/{pool_id}/join");
        pub const SELECTIONS: &str =
            v1_path!("/pools/{pool_id}/entries/{profile_id}/selections");
        pub const STANDINGS: &str = v1_path!("/pools/{pool_id}/standings");
        pub const WEEKLY_STANDINGS: &str =
            v1_path!("/pools/{pool_id}/standings/weekly");
        pub const TEAM_REPORT: &str = v1_path!("/pools/{pool_id}/teams");
    }

    pub mod nfl {
        pub const TEAMS: &str = v1_path!("/nfl/teams");
        pub const CURRENT_SEASON: &str = v1_path!("/nfl/seasons/current");
    }

    pub mod admin {
        pub const GAME_RESULT: &str = v1_path!("/admin/games/{game_id}/result");
        pub const RECOMPUTE_POOL: &str = v1_path!("/admin/pools/{pool_id}/recompute");
    }
}

/// Fill `{name}` placeholders of a route template, for clients and tests.
pub fn fill(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |path, (name, value)| {
            path.replace(&format!("{{{name}}}"), value)
        })
}
