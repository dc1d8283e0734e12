use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    nfl::season::current_year,
    validation::{ValidationError, in_range, required_text},
};

pub const DEFAULT_MAX_PARTICIPANTS: i32 = 20;
pub const MIN_PARTICIPANTS: i32 = 2;
pub const MAX_PARTICIPANTS: i32 = 100;
pub const DEFAULT_DEADLINE_DAYS: i64 = 7;
const MAX_POOL_NAME: usize = 100;
const MAX_DESCRIPTION: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub pool_id: Uuid,
    pub pool_name: String,
    pub pool_description: Option<String>,
    pub created_by: Option<Uuid>,
    pub season_year: i32,
    pub entry_fee: Decimal,
    pub max_participants: i32,
    pub registration_deadline: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pool {
    pub fn registration_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now <= self.registration_deadline
    }

    pub fn has_room(&self, participant_count: i64) -> bool {
        participant_count < i64::from(self.max_participants)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolRequest {
    /// Creator's profile, auto-joined to the new pool.
    pub profile_id: Uuid,
    pub pool_name: String,
    #[serde(default)]
    pub pool_description: Option<String>,
    #[serde(default)]
    pub season_year: Option<i32>,
    #[serde(default)]
    pub entry_fee: Option<Decimal>,
    #[serde(default)]
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub registration_deadline_days: Option<i64>,
}

impl CreatePoolRequest {
    /// Validate against the clock and build the pool row.
    pub fn into_pool(
        self,
        created_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Pool, ValidationError> {
        let pool_name = required_text("Pool name", &self.pool_name, MAX_POOL_NAME)?;
        let pool_description = match self.pool_description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                if text.chars().count() > MAX_DESCRIPTION {
                    return Err(ValidationError::TooLong {
                        field: "Description",
                        max: MAX_DESCRIPTION,
                    });
                }
                Some(text.to_string())
            }
            _ => None,
        };

        let this_year = current_year(now);
        let season_year = self.season_year.unwrap_or(this_year);
        in_range(
            "Season year",
            i64::from(season_year),
            i64::from(this_year),
            i64::from(this_year) + 1,
        )?;

        let entry_fee = self.entry_fee.unwrap_or(Decimal::ZERO);
        if entry_fee < Decimal::ZERO {
            return Err(ValidationError::Negative { field: "Entry fee" });
        }

        let max_participants =
            self.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS);
        in_range(
            "Max participants",
            i64::from(max_participants),
            i64::from(MIN_PARTICIPANTS),
            i64::from(MAX_PARTICIPANTS),
        )?;

        let deadline_days = in_range(
            "Registration deadline days",
            self.registration_deadline_days.unwrap_or(DEFAULT_DEADLINE_DAYS),
            1,
            30,
        )?;

        Ok(Pool {
            pool_id: Uuid::now_v7(),
            pool_name,
            pool_description,
            created_by: Some(created_by),
            season_year,
            entry_fee: entry_fee.round_dp(2),
            max_participants,
            registration_deadline: now + Duration::days(deadline_days),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }
}
