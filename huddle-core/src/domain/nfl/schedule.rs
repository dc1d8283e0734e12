use chrono::{NaiveTime, TimeZone, Utc};
use rand::{Rng, seq::SliceRandom};
use uuid::Uuid;

use super::{
    game::{Game, GameStatus},
    season::Week,
};

const KICKOFF_UTC_HOUR: u32 = 17;

/// Pair every team once per week. Matchups are drawn from `rng`, so a
/// seeded generator reproduces the same schedule.
pub fn generate_schedule<R: Rng + ?Sized>(
    season_id: Uuid,
    team_ids: &[Uuid],
    weeks: &[Week],
    rng: &mut R,
) -> Vec<Game> {
    let kickoff =
        NaiveTime::from_hms_opt(KICKOFF_UTC_HOUR, 0, 0).unwrap_or_default();
    let mut games = Vec::with_capacity(weeks.len() * team_ids.len() / 2);
    let mut order: Vec<Uuid> = team_ids.to_vec();

    for week in weeks {
        order.shuffle(rng);
        let game_date = Utc.from_utc_datetime(&week.start_date.and_time(kickoff));
        for pair in order.chunks_exact(2) {
            let (home, away) = if rng.random_bool(0.5) {
                (pair[0], pair[1])
            } else {
                (pair[1], pair[0])
            };
            games.push(Game {
                game_id: Uuid::now_v7(),
                season_id,
                week_id: week.week_id,
                home_team_id: home,
                away_team_id: away,
                game_date,
                home_score: None,
                away_score: None,
                game_status: GameStatus::Scheduled,
            });
        }
    }

    games
}
