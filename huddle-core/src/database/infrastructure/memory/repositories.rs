use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{InMemoryDatabase, StoredUser, Tables, conflict, not_found};
use crate::database::ports::{
    maintenance::MaintenanceRepository,
    nfl::NflRepository,
    pools::{PoolEntry, PoolsRepository},
    profiles::ProfilesRepository,
    scores::ScoresRepository,
    selections::SelectionsRepository,
    sessions::SessionsRepository,
    users::UsersRepository,
};
use crate::domain::nfl::{Game, GameStatus, Season, Team, TeamPerformance, Week};
use crate::domain::pools::{DRAFT_SIZE, Pool, PoolParticipant, PoolScore, TeamSelection};
use crate::domain::users::auth::AuthSession;
use crate::domain::users::{Profile, User};
use crate::error::{HuddleError, Result};

fn check_profile_name(tables: &Tables, profile: &Profile) -> Result<()> {
    let taken = tables.profiles.values().any(|p| {
        p.user_id == profile.user_id && p.profile_name == profile.profile_name
    });
    if taken {
        return Err(conflict("profiles_user_name_key"));
    }
    Ok(())
}

#[async_trait]
impl UsersRepository for InMemoryDatabase {
    async fn create_user_with_profile(
        &self,
        user: &User,
        password_hash: &str,
        profile: &Profile,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.user.email == user.email) {
            return Err(conflict("users_email_key"));
        }
        check_profile_name(&tables, profile)?;
        tables.users.insert(
            user.user_id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        tables.profiles.insert(profile.profile_id, profile.clone());
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).map(|u| u.user.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user.email == email)
            .map(|u| u.user.clone()))
    }

    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).map(|u| u.password_hash.clone()))
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| not_found("User"))?;
        stored.password_hash = password_hash.to_string();
        stored.user.updated_at = at;
        Ok(())
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.users.get_mut(&user_id) {
            stored.user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&user_id).is_none() {
            return Err(not_found("User"));
        }
        tables.sessions.retain(|_, s| s.user_id != user_id);
        let doomed: Vec<Uuid> = tables
            .profiles
            .values()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.profile_id)
            .collect();
        tables.remove_profiles(&doomed);
        for pool in tables.pools.values_mut() {
            if pool.created_by == Some(user_id) {
                pool.created_by = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SessionsRepository for InMemoryDatabase {
    async fn create_session(&self, session: &AuthSession) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&session.user_id) {
            return Err(not_found("User"));
        }
        tables.sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_access_hash(&self, hash: &str) -> Result<Option<AuthSession>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .values()
            .find(|s| s.access_token_hash == hash)
            .cloned())
    }

    async fn find_by_refresh_hash(&self, hash: &str) -> Result<Option<AuthSession>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sessions
            .values()
            .find(|s| s.refresh_token_hash == hash)
            .cloned())
    }

    async fn rotate_tokens(&self, rotated: &AuthSession) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.sessions.get_mut(&rotated.session_id) {
            Some(session) if session.revoked_at.is_none() => {
                session.access_token_hash = rotated.access_token_hash.clone();
                session.refresh_token_hash = rotated.refresh_token_hash.clone();
                session.access_expires_at = rotated.access_expires_at;
                session.refresh_expires_at = rotated.refresh_expires_at;
                Ok(())
            }
            _ => Err(HuddleError::Unauthorized(
                "Session is no longer valid".to_string(),
            )),
        }
    }

    async fn revoke_session(&self, session_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(session) = tables.sessions.get_mut(&session_id) {
            session.revoked_at.get_or_insert(at);
        }
        Ok(())
    }

    async fn revoke_user_sessions(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let mut revoked = 0;
        for session in tables.sessions.values_mut() {
            if session.user_id == user_id && session.revoked_at.is_none() {
                session.revoked_at = Some(at);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|_, s| s.revoked_at.is_none() && s.refresh_expires_at > now);
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[async_trait]
impl ProfilesRepository for InMemoryDatabase {
    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&profile.user_id) {
            return Err(not_found("User"));
        }
        check_profile_name(&tables, profile)?;
        tables.profiles.insert(profile.profile_id, profile.clone());
        Ok(())
    }

    async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(&profile_id).cloned())
    }

    async fn list_profiles_for_user(&self, user_id: Uuid) -> Result<Vec<Profile>> {
        let tables = self.tables.read().await;
        let mut profiles: Vec<Profile> = tables
            .profiles
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        profiles.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.profile_name.cmp(&b.profile_name))
        });
        Ok(profiles)
    }
}

#[async_trait]
impl PoolsRepository for InMemoryDatabase {
    async fn create_pool(&self, pool: &Pool, creator: &PoolParticipant) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.profiles.contains_key(&creator.profile_id) {
            return Err(not_found("Profile"));
        }
        tables.pools.insert(pool.pool_id, pool.clone());
        tables.participants.push(creator.clone());
        Ok(())
    }

    async fn get_pool(&self, pool_id: Uuid) -> Result<Option<Pool>> {
        let tables = self.tables.read().await;
        Ok(tables.pools.get(&pool_id).cloned())
    }

    async fn list_active_pools(&self) -> Result<Vec<Pool>> {
        let tables = self.tables.read().await;
        let mut pools: Vec<Pool> = tables
            .pools
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        pools.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pools)
    }

    async fn list_pools_for_season(&self, season_year: i32) -> Result<Vec<Pool>> {
        let tables = self.tables.read().await;
        let mut pools: Vec<Pool> = tables
            .pools
            .values()
            .filter(|p| p.season_year == season_year)
            .cloned()
            .collect();
        pools.sort_by_key(|p| p.created_at);
        Ok(pools)
    }

    async fn delete_pool(&self, pool_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.remove_pool(pool_id) {
            return Err(not_found("Pool"));
        }
        Ok(())
    }

    async fn add_participant(&self, participant: &PoolParticipant) -> Result<()> {
        let mut tables = self.tables.write().await;
        let capacity = tables
            .pools
            .get(&participant.pool_id)
            .map(|p| p.max_participants)
            .ok_or_else(|| not_found("Pool"))?;
        if !tables.profiles.contains_key(&participant.profile_id) {
            return Err(not_found("Profile"));
        }
        let members = tables
            .participants
            .iter()
            .filter(|p| p.pool_id == participant.pool_id);
        let mut joined = 0;
        for member in members {
            if member.profile_id == participant.profile_id {
                return Err(conflict("pool_participants_pool_profile_key"));
            }
            joined += 1;
        }
        if joined >= capacity {
            return Err(HuddleError::Conflict("Pool is full".to_string()));
        }
        tables.participants.push(participant.clone());
        Ok(())
    }

    async fn get_participant(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
    ) -> Result<Option<PoolParticipant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .participants
            .iter()
            .find(|p| p.pool_id == pool_id && p.profile_id == profile_id)
            .cloned())
    }

    async fn list_entries(&self, pool_id: Uuid) -> Result<Vec<PoolEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<PoolEntry> = tables
            .participants
            .iter()
            .filter(|p| p.pool_id == pool_id)
            .filter_map(|p| {
                let profile = tables.profiles.get(&p.profile_id)?;
                Some(PoolEntry {
                    participant: p.clone(),
                    display_name: profile.display_name.clone(),
                    user_id: profile.user_id,
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            a.participant
                .joined_at
                .cmp(&b.participant.joined_at)
                .then_with(|| a.participant.participant_id.cmp(&b.participant.participant_id))
        });
        Ok(entries)
    }

    async fn list_memberships(&self, profile_id: Uuid) -> Result<Vec<PoolParticipant>> {
        let tables = self.tables.read().await;
        let mut memberships: Vec<PoolParticipant> = tables
            .participants
            .iter()
            .filter(|p| p.profile_id == profile_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|p| p.joined_at);
        Ok(memberships)
    }

    async fn count_participants(&self, pool_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .participants
            .iter()
            .filter(|p| p.pool_id == pool_id)
            .count() as i64)
    }
}

fn set_complete(
    tables: &mut Tables,
    pool_id: Uuid,
    profile_id: Uuid,
    complete: bool,
) -> Result<()> {
    let participant = tables
        .participants
        .iter_mut()
        .find(|p| p.pool_id == pool_id && p.profile_id == profile_id)
        .ok_or_else(|| {
            HuddleError::NotFound("Profile has not joined this pool".to_string())
        })?;
    participant.selections_complete = complete;
    Ok(())
}

#[async_trait]
impl SelectionsRepository for InMemoryDatabase {
    async fn replace_selections(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
        selections: &[TeamSelection],
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        for (i, selection) in selections.iter().enumerate() {
            if !tables.teams.contains_key(&selection.team_id) {
                return Err(not_found("Team"));
            }
            if !(1..=DRAFT_SIZE as i32).contains(&selection.selection_order) {
                return Err(HuddleError::Validation(
                    "Selection order must be between 1 and 4".to_string(),
                ));
            }
            let earlier = &selections[..i];
            if earlier.iter().any(|s| s.team_id == selection.team_id) {
                return Err(conflict("team_selections_pool_profile_team_key"));
            }
            if earlier
                .iter()
                .any(|s| s.selection_order == selection.selection_order)
            {
                return Err(conflict("team_selections_pool_profile_order_key"));
            }
        }
        set_complete(&mut tables, pool_id, profile_id, !selections.is_empty())?;
        tables
            .selections
            .retain(|s| !(s.pool_id == pool_id && s.profile_id == profile_id));
        tables.selections.extend_from_slice(selections);
        Ok(())
    }

    async fn clear_selections(&self, pool_id: Uuid, profile_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        set_complete(&mut tables, pool_id, profile_id, false)?;
        tables
            .selections
            .retain(|s| !(s.pool_id == pool_id && s.profile_id == profile_id));
        Ok(())
    }

    async fn list_for_entry(
        &self,
        pool_id: Uuid,
        profile_id: Uuid,
    ) -> Result<Vec<TeamSelection>> {
        let tables = self.tables.read().await;
        let mut picks: Vec<TeamSelection> = tables
            .selections
            .iter()
            .filter(|s| s.pool_id == pool_id && s.profile_id == profile_id)
            .cloned()
            .collect();
        picks.sort_by_key(|s| s.selection_order);
        Ok(picks)
    }

    async fn list_for_pool(&self, pool_id: Uuid) -> Result<Vec<TeamSelection>> {
        let tables = self.tables.read().await;
        let mut picks: Vec<TeamSelection> = tables
            .selections
            .iter()
            .filter(|s| s.pool_id == pool_id)
            .cloned()
            .collect();
        picks.sort_by_key(|s| (s.profile_id, s.selection_order));
        Ok(picks)
    }

    async fn count_for_profile(&self, profile_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .selections
            .iter()
            .filter(|s| s.profile_id == profile_id)
            .count() as i64)
    }
}

#[async_trait]
impl NflRepository for InMemoryDatabase {
    async fn upsert_teams(&self, teams: &[Team]) -> Result<()> {
        let mut tables = self.tables.write().await;
        for team in teams {
            let team_id = tables
                .teams
                .values()
                .find(|t| t.team_code == team.team_code)
                .map_or(team.team_id, |t| t.team_id);
            tables.teams.insert(
                team_id,
                Team {
                    team_id,
                    ..team.clone()
                },
            );
        }
        Ok(())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let tables = self.tables.read().await;
        let mut teams: Vec<Team> = tables.teams.values().cloned().collect();
        teams.sort_by(|a, b| {
            (a.conference.as_str(), a.division.as_str(), &a.team_city).cmp(&(
                b.conference.as_str(),
                b.division.as_str(),
                &b.team_city,
            ))
        });
        Ok(teams)
    }

    async fn count_teams(&self) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.teams.len() as i64)
    }

    async fn create_season(&self, season: &Season, weeks: &[Week]) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables
            .seasons
            .values()
            .any(|s| s.season_year == season.season_year)
        {
            return Err(conflict("nfl_seasons_year_key"));
        }
        if season.is_current {
            for other in tables.seasons.values_mut() {
                other.is_current = false;
            }
        }
        tables.seasons.insert(season.season_id, season.clone());
        for week in weeks {
            tables.weeks.insert(week.week_id, week.clone());
        }
        Ok(())
    }

    async fn get_season(&self, season_id: Uuid) -> Result<Option<Season>> {
        let tables = self.tables.read().await;
        Ok(tables.seasons.get(&season_id).cloned())
    }

    async fn get_season_by_year(&self, season_year: i32) -> Result<Option<Season>> {
        let tables = self.tables.read().await;
        Ok(tables
            .seasons
            .values()
            .find(|s| s.season_year == season_year)
            .cloned())
    }

    async fn get_current_season(&self) -> Result<Option<Season>> {
        let tables = self.tables.read().await;
        Ok(tables
            .seasons
            .values()
            .filter(|s| s.is_current)
            .max_by_key(|s| s.season_year)
            .cloned())
    }

    async fn list_weeks(&self, season_id: Uuid) -> Result<Vec<Week>> {
        let tables = self.tables.read().await;
        let mut weeks: Vec<Week> = tables
            .weeks
            .values()
            .filter(|w| w.season_id == season_id)
            .cloned()
            .collect();
        weeks.sort_by_key(|w| w.week_number);
        Ok(weeks)
    }

    async fn insert_games(&self, games: &[Game]) -> Result<()> {
        let mut tables = self.tables.write().await;
        for game in games {
            if game.home_team_id == game.away_team_id {
                return Err(HuddleError::Validation(
                    "A team cannot play itself".to_string(),
                ));
            }
            if !tables.weeks.contains_key(&game.week_id) {
                return Err(not_found("Week"));
            }
        }
        for game in games {
            tables.games.insert(game.game_id, game.clone());
        }
        Ok(())
    }

    async fn get_game(&self, game_id: Uuid) -> Result<Option<Game>> {
        let tables = self.tables.read().await;
        Ok(tables.games.get(&game_id).cloned())
    }

    async fn list_games(&self, season_id: Uuid) -> Result<Vec<Game>> {
        let tables = self.tables.read().await;
        let mut games: Vec<Game> = tables
            .games
            .values()
            .filter(|g| g.season_id == season_id)
            .cloned()
            .collect();
        games.sort_by_key(|g| (g.game_date, g.game_id));
        Ok(games)
    }

    async fn record_result(
        &self,
        game_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> Result<Game> {
        let mut tables = self.tables.write().await;
        let game = tables
            .games
            .get_mut(&game_id)
            .ok_or_else(|| not_found("Game"))?;
        game.home_score = Some(home_score);
        game.away_score = Some(away_score);
        game.game_status = GameStatus::Completed;
        Ok(game.clone())
    }

    async fn save_team_performance(&self, records: &[TeamPerformance]) -> Result<()> {
        let mut tables = self.tables.write().await;
        for record in records {
            let key = (record.team_id, record.season_id);
            let performance_id = tables
                .performance
                .get(&key)
                .map_or(record.performance_id, |existing| existing.performance_id);
            tables.performance.insert(
                key,
                TeamPerformance {
                    performance_id,
                    ..record.clone()
                },
            );
        }
        Ok(())
    }

    async fn list_team_performance(&self, season_id: Uuid) -> Result<Vec<TeamPerformance>> {
        let tables = self.tables.read().await;
        let mut records: Vec<TeamPerformance> = tables
            .performance
            .values()
            .filter(|p| p.season_id == season_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.performance_score
                .total_cmp(&a.performance_score)
                .then_with(|| b.win_percentage.total_cmp(&a.win_percentage))
        });
        Ok(records)
    }
}

#[async_trait]
impl ScoresRepository for InMemoryDatabase {
    async fn replace_pool_scores(&self, pool_id: Uuid, scores: &[PoolScore]) -> Result<()> {
        let mut tables = self.tables.write().await;
        for (i, score) in scores.iter().enumerate() {
            let duplicate = scores[..i].iter().any(|s| {
                s.pool_id == score.pool_id
                    && s.profile_id == score.profile_id
                    && s.week_id == score.week_id
            });
            if duplicate {
                return Err(conflict("pool_scores_pool_profile_week_key"));
            }
        }
        tables.scores.retain(|s| s.pool_id != pool_id);
        tables.scores.extend_from_slice(scores);
        Ok(())
    }

    async fn list_for_pool(&self, pool_id: Uuid) -> Result<Vec<PoolScore>> {
        let tables = self.tables.read().await;
        let mut scores: Vec<PoolScore> = tables
            .scores
            .iter()
            .filter(|s| s.pool_id == pool_id)
            .cloned()
            .collect();
        scores.sort_by_key(|s| {
            (
                tables.week_number(s.week_id),
                s.rank_position.unwrap_or(i32::MAX),
            )
        });
        Ok(scores)
    }

    async fn list_for_entry(&self, pool_id: Uuid, profile_id: Uuid) -> Result<Vec<PoolScore>> {
        let tables = self.tables.read().await;
        let mut scores: Vec<PoolScore> = tables
            .scores
            .iter()
            .filter(|s| s.pool_id == pool_id && s.profile_id == profile_id)
            .cloned()
            .collect();
        scores.sort_by_key(|s| tables.week_number(s.week_id));
        Ok(scores)
    }
}

#[async_trait]
impl MaintenanceRepository for InMemoryDatabase {
    async fn reset_all(&self) -> Result<()> {
        let mut tables = self.tables.write().await;
        *tables = Tables::default();
        Ok(())
    }
}
