pub mod repositories;

use crate::error::HuddleError;

/// Translate unique-constraint violations into user-facing conflicts and
/// wrap everything else as a database error.
pub(crate) fn map_db_error(
    context: &'static str,
) -> impl Fn(sqlx::Error) -> HuddleError {
    move |err| {
        if let Some(message) = err
            .as_database_error()
            .and_then(|db_err| db_err.constraint())
            .and_then(conflict_message)
        {
            return HuddleError::Conflict(message.to_string());
        }
        tracing::error!(error = %err, context, "database operation failed");
        HuddleError::Database(err)
    }
}

pub(crate) fn conflict_message(constraint: &str) -> Option<&'static str> {
    let message = match constraint {
        "users_email_key" => "An account with this email already exists",
        "profiles_user_name_key" => "You already have a profile with this name",
        "nfl_seasons_year_key" => "A season for this year already exists",
        "nfl_teams_code_key" => "A team with this code already exists",
        "pool_participants_pool_profile_key" => {
            "This profile has already joined the pool"
        }
        "team_selections_pool_profile_team_key" => {
            "Each team can only be selected once"
        }
        "team_selections_pool_profile_order_key" => {
            "That draft slot is already filled"
        }
        "pool_scores_pool_profile_week_key" => {
            "Score already recorded for this week"
        }
        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::conflict_message;

    #[test]
    fn known_constraints_map_to_messages() {
        assert_eq!(
            conflict_message("users_email_key"),
            Some("An account with this email already exists")
        );
        assert!(conflict_message("pools_pkey").is_none());
    }
}
