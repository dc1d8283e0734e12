use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::validation::{ValidationError, required_text};

pub const MAX_PROFILE_TEXT: usize = 50;

/// A named identity owned by a user; pools are joined per profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: Uuid,
    pub user_id: Uuid,
    pub profile_name: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub profile_name: String,
    pub display_name: String,
}

impl NewProfile {
    pub fn validate(&self) -> Result<NewProfile, ValidationError> {
        Ok(NewProfile {
            profile_name: required_text(
                "Profile name",
                &self.profile_name,
                MAX_PROFILE_TEXT,
            )?,
            display_name: required_text(
                "Display name",
                &self.display_name,
                MAX_PROFILE_TEXT,
            )?,
        })
    }

    pub fn into_profile(self, user_id: Uuid, now: DateTime<Utc>) -> Profile {
        Profile {
            profile_id: Uuid::now_v7(),
            user_id,
            profile_name: self.profile_name,
            display_name: self.display_name,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_both_names() {
        let profile = NewProfile {
            profile_name: " Kids ".into(),
            display_name: " The Kids ".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(profile.profile_name, "Kids");
        assert_eq!(profile.display_name, "The Kids");
    }

    #[test]
    fn validate_rejects_blank_display_name() {
        let err = NewProfile {
            profile_name: "Kids".into(),
            display_name: "".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Display name is required");
    }

    #[test]
    fn validate_rejects_long_names() {
        let err = NewProfile {
            profile_name: "x".repeat(51),
            display_name: "ok".into(),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 50, .. }));
    }
}
