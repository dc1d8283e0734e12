use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::draft::team_index;
use crate::application::unit_of_work::AppUnitOfWork;
use crate::domain::nfl::{Game, TeamPerformance};
use crate::domain::pools::{Pool, PoolScore, TeamSelection};
use crate::domain::scoring::{EntryPicks, ScoringRules, competition_ranks, compute_pool_scores};
use crate::error::{HuddleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Complete,
    Incomplete,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    pub rank: i32,
    pub profile_id: Uuid,
    pub display_name: String,
    pub team_codes: Vec<String>,
    pub total_points: i32,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekPoints {
    pub week_number: i32,
    pub points_earned: i32,
    pub total_points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryProgress {
    pub profile_id: Uuid,
    pub display_name: String,
    pub weeks: Vec<WeekPoints>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamReportRow {
    pub team_id: Uuid,
    pub team_code: String,
    pub display_name: String,
    pub times_selected: i64,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub record: String,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub game: Game,
    pub pools_recomputed: usize,
}

/// Weekly pool scores, standings and season records.
#[derive(Debug, Clone)]
pub struct ScoringService {
    uow: Arc<AppUnitOfWork>,
    rules: ScoringRules,
}

impl ScoringService {
    pub fn new(uow: Arc<AppUnitOfWork>, rules: ScoringRules) -> Self {
        Self { uow, rules }
    }

    pub fn rules(&self) -> ScoringRules {
        self.rules
    }

    /// Rebuild every `pool_scores` row of a pool from final game results.
    #[instrument(skip(self), err)]
    pub async fn recompute_pool(&self, pool_id: Uuid, now: DateTime<Utc>) -> Result<Vec<PoolScore>> {
        let pool = self.pool(pool_id).await?;
        let scores = match self.uow.nfl.get_season_by_year(pool.season_year).await? {
            Some(season) => {
                let weeks = self.uow.nfl.list_weeks(season.season_id).await?;
                let games = self.uow.nfl.list_games(season.season_id).await?;
                let entries = self.entry_picks(&pool).await?;
                compute_pool_scores(&self.rules, pool.pool_id, &weeks, &games, &entries, now)
            }
            None => Vec::new(),
        };
        self.uow
            .scores
            .replace_pool_scores(pool.pool_id, &scores)
            .await?;
        info!(rows = scores.len(), "pool scores recomputed");
        Ok(scores)
    }

    /// Participants by latest cumulative total, highest first.
    pub async fn standings(&self, pool_id: Uuid) -> Result<Vec<StandingRow>> {
        let pool = self.pool(pool_id).await?;
        let entries = self.uow.pools.list_entries(pool.pool_id).await?;
        let teams = team_index(&self.uow).await?;
        let picks = group_selections(self.uow.selections.list_for_pool(pool.pool_id).await?);

        // Scores arrive in week order, so the last one per entry is the latest.
        let mut latest: HashMap<Uuid, i32> = HashMap::new();
        for score in self.uow.scores.list_for_pool(pool.pool_id).await? {
            latest.insert(score.profile_id, score.total_points);
        }

        let mut rows: Vec<StandingRow> = entries
            .into_iter()
            .map(|entry| {
                let profile_id = entry.participant.profile_id;
                let team_codes = picks
                    .get(&profile_id)
                    .map(|selections| {
                        selections
                            .iter()
                            .filter_map(|s| teams.get(&s.team_id))
                            .map(|team| team.team_code.clone())
                            .collect()
                    })
                    .unwrap_or_default();
                StandingRow {
                    rank: 0,
                    profile_id,
                    display_name: entry.display_name,
                    team_codes,
                    total_points: latest.get(&profile_id).copied().unwrap_or(0),
                    status: if entry.participant.selections_complete {
                        EntryStatus::Complete
                    } else {
                        EntryStatus::Incomplete
                    },
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        let totals: Vec<i64> = rows.iter().map(|r| i64::from(r.total_points)).collect();
        for (row, rank) in rows.iter_mut().zip(competition_ranks(&totals)) {
            row.rank = rank;
        }
        Ok(rows)
    }

    pub async fn weekly_progress(&self, pool_id: Uuid) -> Result<Vec<EntryProgress>> {
        let pool = self.pool(pool_id).await?;
        let week_numbers: HashMap<Uuid, i32> =
            match self.uow.nfl.get_season_by_year(pool.season_year).await? {
                Some(season) => self
                    .uow
                    .nfl
                    .list_weeks(season.season_id)
                    .await?
                    .into_iter()
                    .map(|week| (week.week_id, week.week_number))
                    .collect(),
                None => HashMap::new(),
            };

        let mut series: HashMap<Uuid, Vec<WeekPoints>> = HashMap::new();
        for score in self.uow.scores.list_for_pool(pool.pool_id).await? {
            let Some(week_number) = week_numbers.get(&score.week_id) else {
                continue;
            };
            series.entry(score.profile_id).or_default().push(WeekPoints {
                week_number: *week_number,
                points_earned: score.points_earned,
                total_points: score.total_points,
            });
        }

        Ok(self
            .uow
            .pools
            .list_entries(pool.pool_id)
            .await?
            .into_iter()
            .map(|entry| {
                let mut weeks = series
                    .remove(&entry.participant.profile_id)
                    .unwrap_or_default();
                weeks.sort_by_key(|w| w.week_number);
                EntryProgress {
                    profile_id: entry.participant.profile_id,
                    display_name: entry.display_name,
                    weeks,
                }
            })
            .collect())
    }

    /// Most drafted teams in a pool with their season record.
    pub async fn team_report(&self, pool_id: Uuid, limit: usize) -> Result<Vec<TeamReportRow>> {
        let pool = self.pool(pool_id).await?;
        let teams = team_index(&self.uow).await?;
        let performance: HashMap<Uuid, TeamPerformance> =
            match self.uow.nfl.get_season_by_year(pool.season_year).await? {
                Some(season) => self
                    .uow
                    .nfl
                    .list_team_performance(season.season_id)
                    .await?
                    .into_iter()
                    .map(|record| (record.team_id, record))
                    .collect(),
                None => HashMap::new(),
            };

        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for selection in self.uow.selections.list_for_pool(pool.pool_id).await? {
            *counts.entry(selection.team_id).or_default() += 1;
        }

        let mut rows: Vec<TeamReportRow> = counts
            .into_iter()
            .filter_map(|(team_id, times_selected)| {
                let team = teams.get(&team_id)?;
                let record = performance.get(&team_id);
                Some(TeamReportRow {
                    team_id,
                    team_code: team.team_code.clone(),
                    display_name: team.display_name(),
                    times_selected,
                    wins: record.map_or(0, |r| r.wins),
                    losses: record.map_or(0, |r| r.losses),
                    ties: record.map_or(0, |r| r.ties),
                    record: record.map_or_else(|| "0-0".to_string(), TeamPerformance::record_label),
                    win_percentage: record.map_or(0.0, |r| r.win_percentage),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.times_selected
                .cmp(&a.times_selected)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    /// Re-aggregate every team's season record from final games.
    pub async fn refresh_team_performance(
        &self,
        season_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<TeamPerformance>> {
        let games = self.uow.nfl.list_games(season_id).await?;
        let records: Vec<TeamPerformance> = self
            .uow
            .nfl
            .list_teams()
            .await?
            .iter()
            .map(|team| TeamPerformance::from_games(team.team_id, season_id, &games, now))
            .collect();
        self.uow.nfl.save_team_performance(&records).await?;
        Ok(records)
    }

    /// Finalize a game, then refresh records and every pool of its season.
    pub async fn record_game_result(
        &self,
        game_id: Uuid,
        home_score: i32,
        away_score: i32,
        now: DateTime<Utc>,
    ) -> Result<GameResult> {
        if home_score < 0 || away_score < 0 {
            return Err(HuddleError::Validation(
                "Scores cannot be negative".to_string(),
            ));
        }
        let game = self
            .uow
            .nfl
            .record_result(game_id, home_score, away_score)
            .await?;
        self.refresh_team_performance(game.season_id, now).await?;

        let pools_recomputed = match self.uow.nfl.get_season(game.season_id).await? {
            Some(season) => self.recompute_season_pools(season.season_year, now).await?,
            None => 0,
        };
        info!(%game_id, home_score, away_score, pools_recomputed, "game result recorded");
        Ok(GameResult {
            game,
            pools_recomputed,
        })
    }

    pub async fn recompute_season_pools(&self, season_year: i32, now: DateTime<Utc>) -> Result<usize> {
        let pools = self.uow.pools.list_pools_for_season(season_year).await?;
        for pool in &pools {
            self.recompute_pool(pool.pool_id, now).await?;
        }
        Ok(pools.len())
    }

    async fn entry_picks(&self, pool: &Pool) -> Result<Vec<EntryPicks>> {
        let mut picks = group_selections(self.uow.selections.list_for_pool(pool.pool_id).await?);
        Ok(self
            .uow
            .pools
            .list_entries(pool.pool_id)
            .await?
            .into_iter()
            .map(|entry| {
                let profile_id = entry.participant.profile_id;
                EntryPicks {
                    profile_id,
                    team_ids: picks
                        .remove(&profile_id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|s| s.team_id)
                        .collect(),
                }
            })
            .collect())
    }

    async fn pool(&self, pool_id: Uuid) -> Result<Pool> {
        self.uow
            .pools
            .get_pool(pool_id)
            .await?
            .ok_or_else(|| HuddleError::NotFound("Pool not found".to_string()))
    }
}

fn group_selections(selections: Vec<TeamSelection>) -> HashMap<Uuid, Vec<TeamSelection>> {
    let mut grouped: HashMap<Uuid, Vec<TeamSelection>> = HashMap::new();
    for selection in selections {
        grouped.entry(selection.profile_id).or_default().push(selection);
    }
    for picks in grouped.values_mut() {
        picks.sort_by_key(|s| s.selection_order);
    }
    grouped
}
