//! Translation from loaded configuration into core service settings.

use anyhow::Context;
use chrono::Duration;
use huddle_config::{AuthConfig, ScoringConfig};
use huddle_core::AuthCrypto;
use huddle_core::domain::scoring::ScoringRules;
use huddle_core::domain::users::auth::SessionPolicy;

pub fn session_policy(auth: &AuthConfig) -> SessionPolicy {
    SessionPolicy {
        access_ttl: Duration::seconds(auth.access_ttl_secs),
        refresh_ttl: Duration::days(auth.refresh_ttl_days),
    }
}

pub fn scoring_rules(scoring: &ScoringConfig) -> ScoringRules {
    ScoringRules {
        win_points: scoring.win_points,
        tie_points: scoring.tie_points,
        loss_points: scoring.loss_points,
    }
}

pub fn auth_crypto(auth: &AuthConfig) -> anyhow::Result<AuthCrypto> {
    AuthCrypto::new(auth.password_pepper.as_bytes(), auth.token_key.as_bytes())
        .context("failed to initialise AuthCrypto")
}
