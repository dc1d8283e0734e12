use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const REGULAR_SEASON_WEEKS: u32 = 18;
const SEASON_START_MONTH: u32 = 9;
const SEASON_START_DAY: u32 = 7;
pub const REGULAR_WEEK_TYPE: &str = "Regular";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub season_id: Uuid,
    pub season_year: i32,
    pub regular_season_weeks: i32,
    pub is_current: bool,
}

impl Season {
    pub fn calendar(&self) -> SeasonCalendar {
        SeasonCalendar::new(
            self.season_year,
            u32::try_from(self.regular_season_weeks)
                .unwrap_or(REGULAR_SEASON_WEEKS),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub week_id: Uuid,
    pub season_id: Uuid,
    pub week_number: i32,
    pub week_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Date arithmetic for a regular season that opens on September 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonCalendar {
    year: i32,
    weeks: u32,
}

impl SeasonCalendar {
    pub fn new(year: i32, weeks: u32) -> Self {
        Self {
            year,
            weeks: weeks.max(1),
        }
    }

    pub fn regular(year: i32) -> Self {
        Self::new(year, REGULAR_SEASON_WEEKS)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week_count(&self) -> u32 {
        self.weeks
    }

    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, SEASON_START_MONTH, SEASON_START_DAY)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Inclusive date window of week `number` (1-based).
    pub fn week_window(&self, number: u32) -> Option<(NaiveDate, NaiveDate)> {
        if number == 0 || number > self.weeks {
            return None;
        }
        let start = self
            .start_date()
            .checked_add_days(Days::new(u64::from(number - 1) * 7))?;
        let end = start.checked_add_days(Days::new(6))?;
        Some((start, end))
    }

    /// 0 before kickoff, otherwise the 1-based week clamped to the season.
    pub fn current_week(&self, today: NaiveDate) -> u32 {
        let start = self.start_date();
        if today < start {
            return 0;
        }
        let elapsed = (today - start).num_days();
        let week = u32::try_from(elapsed / 7 + 1).unwrap_or(u32::MAX);
        week.clamp(1, self.weeks)
    }

    /// Build week rows for a season that has been assigned `season_id`.
    pub fn build_weeks(&self, season_id: Uuid) -> Vec<Week> {
        (1..=self.weeks)
            .filter_map(|number| {
                let (start_date, end_date) = self.week_window(number)?;
                Some(Week {
                    week_id: Uuid::now_v7(),
                    season_id,
                    week_number: i32::try_from(number).ok()?,
                    week_type: REGULAR_WEEK_TYPE.to_string(),
                    start_date,
                    end_date,
                })
            })
            .collect()
    }
}

/// Calendar year of `now`, used for default season selection.
pub fn current_year(now: DateTime<Utc>) -> i32 {
    now.year()
}
