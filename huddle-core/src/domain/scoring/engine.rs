use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::rules::ScoringRules;
use crate::domain::{
    nfl::{Game, Week},
    pools::PoolScore,
};

/// The teams one profile drafted in a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPicks {
    pub profile_id: Uuid,
    pub team_ids: Vec<Uuid>,
}

/// Sum of rule points over every final game a drafted team played.
pub fn weekly_points<'a>(
    rules: &ScoringRules,
    team_ids: &[Uuid],
    games: impl IntoIterator<Item = &'a Game>,
) -> i32 {
    games
        .into_iter()
        .flat_map(|game| {
            team_ids
                .iter()
                .filter_map(move |team_id| game.outcome_for(*team_id))
        })
        .map(|outcome| rules.points_for(outcome))
        .sum()
}

/// Competition ranking ("1224") in input order: one plus the number of
/// strictly greater totals.
pub fn competition_ranks(totals: &[i64]) -> Vec<i32> {
    let mut sorted: Vec<i64> = totals.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    totals
        .iter()
        .map(|total| {
            let ahead = sorted.partition_point(|other| other > total);
            i32::try_from(ahead + 1).unwrap_or(i32::MAX)
        })
        .collect()
}

/// Score every entry for each week that has at least one final game.
///
/// Weeks are processed in `week_number` order so `total_points` is the
/// running sum of `points_earned`; `rank_position` ranks those running
/// totals within the week.
pub fn compute_pool_scores(
    rules: &ScoringRules,
    pool_id: Uuid,
    weeks: &[Week],
    games: &[Game],
    entries: &[EntryPicks],
    now: DateTime<Utc>,
) -> Vec<PoolScore> {
    let mut games_by_week: HashMap<Uuid, Vec<&Game>> = HashMap::new();
    for game in games.iter().filter(|g| g.is_final()) {
        games_by_week.entry(game.week_id).or_default().push(game);
    }

    let mut ordered_weeks: Vec<&Week> = weeks.iter().collect();
    ordered_weeks.sort_by_key(|week| week.week_number);

    let mut running: Vec<i64> = vec![0; entries.len()];
    let mut scores = Vec::new();

    for week in ordered_weeks {
        let Some(week_games) = games_by_week.get(&week.week_id) else {
            continue;
        };

        let earned: Vec<i32> = entries
            .iter()
            .map(|entry| {
                weekly_points(rules, &entry.team_ids, week_games.iter().copied())
            })
            .collect();
        for (total, points) in running.iter_mut().zip(&earned) {
            *total += i64::from(*points);
        }
        let ranks = competition_ranks(&running);

        for (index, entry) in entries.iter().enumerate() {
            scores.push(PoolScore {
                score_id: Uuid::now_v7(),
                pool_id,
                profile_id: entry.profile_id,
                week_id: week.week_id,
                points_earned: earned[index],
                total_points: i32::try_from(running[index]).unwrap_or(i32::MAX),
                rank_position: Some(ranks[index]),
                calculated_at: now,
            });
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nfl::{GameStatus, SeasonCalendar};

    fn team(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn game(week: &Week, home: u128, away: u128, score: Option<(i32, i32)>) -> Game {
        Game {
            game_id: Uuid::now_v7(),
            season_id: week.season_id,
            week_id: week.week_id,
            home_team_id: team(home),
            away_team_id: team(away),
            game_date: Utc::now(),
            home_score: score.map(|s| s.0),
            away_score: score.map(|s| s.1),
            game_status: if score.is_some() {
                GameStatus::Completed
            } else {
                GameStatus::Scheduled
            },
        }
    }

    #[test]
    fn ranks_share_positions_on_ties() {
        assert_eq!(competition_ranks(&[30, 50, 30, 10]), vec![2, 1, 2, 4]);
        assert_eq!(competition_ranks(&[]), Vec::<i32>::new());
        assert_eq!(competition_ranks(&[0, 0]), vec![1, 1]);
    }

    #[test]
    fn weekly_points_follow_rules() {
        let weeks = SeasonCalendar::regular(2025).build_weeks(Uuid::now_v7());
        let games = vec![
            game(&weeks[0], 1, 2, Some((20, 10))),
            game(&weeks[0], 3, 4, Some((14, 14))),
            game(&weeks[0], 5, 6, None),
        ];
        let rules = ScoringRules::default();
        assert_eq!(weekly_points(&rules, &[team(1), team(3), team(5)], &games), 15);
        assert_eq!(weekly_points(&rules, &[team(2)], &games), 0);
    }

    #[test]
    fn totals_accumulate_and_skip_unplayed_weeks() {
        let weeks = SeasonCalendar::regular(2025).build_weeks(Uuid::now_v7());
        let games = vec![
            game(&weeks[0], 1, 2, Some((20, 10))),
            game(&weeks[1], 2, 1, Some((27, 3))),
            game(&weeks[2], 1, 2, None),
        ];
        let entries = vec![
            EntryPicks {
                profile_id: Uuid::from_u128(100),
                team_ids: vec![team(1)],
            },
            EntryPicks {
                profile_id: Uuid::from_u128(200),
                team_ids: vec![team(2)],
            },
            EntryPicks {
                profile_id: Uuid::from_u128(300),
                team_ids: vec![],
            },
        ];
        let pool_id = Uuid::now_v7();

        let scores = compute_pool_scores(
            &ScoringRules::default(),
            pool_id,
            &weeks,
            &games,
            &entries,
            Utc::now(),
        );
        assert_eq!(scores.len(), 6);

        let week_two: Vec<_> = scores
            .iter()
            .filter(|s| s.week_id == weeks[1].week_id)
            .map(|s| (s.points_earned, s.total_points, s.rank_position))
            .collect();
        assert_eq!(
            week_two,
            vec![(0, 10, Some(1)), (10, 10, Some(1)), (0, 0, Some(3))]
        );
        assert!(scores.iter().all(|s| s.week_id != weeks[2].week_id));
        assert!(scores.iter().all(|s| s.pool_id == pool_id));
    }
}
