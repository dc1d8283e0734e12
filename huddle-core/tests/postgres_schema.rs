#![cfg(feature = "postgres-tests")]

use std::sync::Arc;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use huddle_core::application::{PoolService, SeedOptions, Seeder};
use huddle_core::database::PostgresDatabase;
use huddle_core::domain::pools::{CreatePoolRequest, DraftPicks};
use huddle_core::{AppUnitOfWork, AuthCrypto, HuddleError};
use sqlx::PgPool;
use uuid::Uuid;

const SEASON: i32 = 2030;

struct Harness {
    pool: PgPool,
    uow: Arc<AppUnitOfWork>,
}

impl Harness {
    async fn seeded(pool: PgPool) -> Result<Self> {
        let db = Arc::new(PostgresDatabase::from_pool(pool.clone()));
        let uow = Arc::new(AppUnitOfWork::from_postgres(db).map_err(anyhow::Error::msg)?);
        let crypto = Arc::new(AuthCrypto::for_tests("pepper", "token-key")?);
        Seeder::new(uow.clone(), crypto)
            .seed(
                SeedOptions {
                    season_year: SEASON,
                    with_samples: true,
                    force: false,
                    rng_seed: 5,
                },
                Utc.with_ymd_and_hms(SEASON, 6, 1, 12, 0, 0).unwrap(),
            )
            .await?;
        Ok(Self { pool, uow })
    }

    /// The seeded family pool with its two sample entries.
    async fn family_pool(&self) -> Result<(Uuid, Vec<Uuid>)> {
        let pool = self
            .uow
            .pools
            .list_pools_for_season(SEASON)
            .await?
            .into_iter()
            .next()
            .expect("sample pool seeded");
        let profiles = self
            .uow
            .pools
            .list_entries(pool.pool_id)
            .await?
            .into_iter()
            .map(|e| e.participant.profile_id)
            .collect();
        Ok((pool.pool_id, profiles))
    }

    async fn team_ids(&self) -> Result<Vec<Uuid>> {
        Ok(self
            .uow
            .nfl
            .list_teams()
            .await?
            .into_iter()
            .map(|t| t.team_id)
            .collect())
    }
}

async fn count(pool: &PgPool, sql: &str, id: Uuid) -> Result<i64> {
    Ok(sqlx::query_scalar(sql).bind(id).fetch_one(pool).await?)
}

#[sqlx::test(migrator = "huddle_core::MIGRATOR")]
async fn selection_order_outside_range_is_rejected(pool: PgPool) -> Result<()> {
    let h = Harness::seeded(pool).await?;
    let (pool_id, profiles) = h.family_pool().await?;
    let teams = h.team_ids().await?;

    let err = sqlx::query(
        "INSERT INTO team_selections (selection_id, pool_id, profile_id, team_id, selection_order)
         VALUES ($1, $2, $3, $4, 5)",
    )
    .bind(Uuid::now_v7())
    .bind(pool_id)
    .bind(profiles[0])
    .bind(teams[0])
    .execute(&h.pool)
    .await
    .unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|db| db.constraint())
        .map(str::to_owned);
    assert_eq!(constraint.as_deref(), Some("team_selections_order_range"));
    Ok(())
}

#[sqlx::test(migrator = "huddle_core::MIGRATOR")]
async fn entry_cannot_hold_a_team_or_slot_twice(pool: PgPool) -> Result<()> {
    let h = Harness::seeded(pool).await?;
    let (pool_id, profiles) = h.family_pool().await?;
    let teams = h.team_ids().await?;
    let now = Utc::now();

    let picks = DraftPicks::new(teams[..4].to_vec())?;
    h.uow
        .selections
        .replace_selections(pool_id, profiles[0], &picks.to_selections(pool_id, profiles[0], now))
        .await?;
    assert!(
        h.uow
            .pools
            .get_participant(pool_id, profiles[0])
            .await?
            .expect("participant")
            .selections_complete
    );

    // Same team in a different slot.
    let mut rows = picks.to_selections(pool_id, profiles[0], now);
    rows[1].team_id = rows[0].team_id;
    let err = h
        .uow
        .selections
        .replace_selections(pool_id, profiles[0], &rows)
        .await
        .unwrap_err();
    assert!(matches!(err, HuddleError::Conflict(msg) if msg == "Each team can only be selected once"));

    // The failed replacement left the original draft in place.
    let stored = h.uow.selections.list_for_entry(pool_id, profiles[0]).await?;
    let stored_teams: Vec<Uuid> = stored.iter().map(|s| s.team_id).collect();
    assert_eq!(stored_teams, teams[..4].to_vec());

    let mut rows = picks.to_selections(pool_id, profiles[0], now);
    rows[1].selection_order = 1;
    assert!(matches!(
        h.uow
            .selections
            .replace_selections(pool_id, profiles[0], &rows)
            .await,
        Err(HuddleError::Conflict(_))
    ));
    Ok(())
}

#[sqlx::test(migrator = "huddle_core::MIGRATOR")]
async fn one_score_row_per_entry_and_week(pool: PgPool) -> Result<()> {
    let h = Harness::seeded(pool).await?;
    let (pool_id, profiles) = h.family_pool().await?;
    let season = h.uow.nfl.get_season_by_year(SEASON).await?.expect("season");
    let week = h.uow.nfl.list_weeks(season.season_id).await?.remove(0);

    let insert = "INSERT INTO pool_scores (score_id, pool_id, profile_id, week_id, points_earned, total_points)
                  VALUES ($1, $2, $3, $4, 10, 10)";
    sqlx::query(insert)
        .bind(Uuid::now_v7())
        .bind(pool_id)
        .bind(profiles[0])
        .bind(week.week_id)
        .execute(&h.pool)
        .await?;
    let err = sqlx::query(insert)
        .bind(Uuid::now_v7())
        .bind(pool_id)
        .bind(profiles[0])
        .bind(week.week_id)
        .execute(&h.pool)
        .await
        .unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|db| db.constraint())
        .map(str::to_owned);
    assert_eq!(constraint.as_deref(), Some("pool_scores_pool_profile_week_key"));
    Ok(())
}

#[sqlx::test(migrator = "huddle_core::MIGRATOR")]
async fn deleting_a_pool_cascades_to_entries(pool: PgPool) -> Result<()> {
    let h = Harness::seeded(pool).await?;
    let (pool_id, profiles) = h.family_pool().await?;
    let teams = h.team_ids().await?;
    let picks = DraftPicks::new(teams[..4].to_vec())?;
    h.uow
        .selections
        .replace_selections(
            pool_id,
            profiles[1],
            &picks.to_selections(pool_id, profiles[1], Utc::now()),
        )
        .await?;

    h.uow.pools.delete_pool(pool_id).await?;
    for sql in [
        "SELECT COUNT(*) FROM pool_participants WHERE pool_id = $1",
        "SELECT COUNT(*) FROM team_selections WHERE pool_id = $1",
        "SELECT COUNT(*) FROM pool_scores WHERE pool_id = $1",
    ] {
        assert_eq!(count(&h.pool, sql, pool_id).await?, 0, "{sql}");
    }
    Ok(())
}

#[sqlx::test(migrator = "huddle_core::MIGRATOR")]
async fn deleting_a_user_removes_profiles_and_orphans_pools(pool: PgPool) -> Result<()> {
    let h = Harness::seeded(pool).await?;
    let (pool_id, _) = h.family_pool().await?;
    let creator = h
        .uow
        .pools
        .get_pool(pool_id)
        .await?
        .and_then(|p| p.created_by)
        .expect("creator recorded");

    h.uow.users.delete_user(creator).await?;
    assert_eq!(
        count(&h.pool, "SELECT COUNT(*) FROM profiles WHERE user_id = $1", creator).await?,
        0
    );
    let orphan = h.uow.pools.get_pool(pool_id).await?.expect("pool kept");
    assert_eq!(orphan.created_by, None);
    assert_eq!(h.uow.pools.count_participants(pool_id).await?, 1);
    Ok(())
}

#[sqlx::test(migrator = "huddle_core::MIGRATOR")]
async fn joining_fills_a_pool_to_capacity(pool: PgPool) -> Result<()> {
    let h = Harness::seeded(pool).await?;
    let (_, profiles) = h.family_pool().await?;
    let creator = h
        .uow
        .profiles
        .get_profile(profiles[0])
        .await?
        .expect("profile");
    let now = Utc.with_ymd_and_hms(SEASON, 6, 1, 12, 0, 0).unwrap();

    let pools = PoolService::new(h.uow.clone());
    let created = pools
        .create_pool(
            creator.user_id,
            CreatePoolRequest {
                profile_id: creator.profile_id,
                pool_name: "Tiny".into(),
                pool_description: None,
                season_year: Some(SEASON),
                entry_fee: None,
                max_participants: Some(2),
                registration_deadline_days: None,
            },
            now,
        )
        .await?;
    let other = h
        .uow
        .profiles
        .get_profile(profiles[1])
        .await?
        .expect("profile");
    pools
        .join_pool(other.user_id, created.pool.pool_id, other.profile_id, now)
        .await?;
    assert_eq!(h.uow.pools.count_participants(created.pool.pool_id).await?, 2);

    let late = h
        .uow
        .profiles
        .list_profiles_for_user(other.user_id)
        .await?
        .remove(0);
    let third = huddle_core::domain::users::Profile {
        profile_id: Uuid::now_v7(),
        profile_name: "Spare".into(),
        display_name: "Spare".into(),
        ..late
    };
    h.uow.profiles.create_profile(&third).await?;
    let err = pools
        .join_pool(other.user_id, created.pool.pool_id, third.profile_id, now)
        .await
        .unwrap_err();
    assert!(matches!(err, HuddleError::Conflict(msg) if msg == "Pool is full"));
    Ok(())
}

#[sqlx::test(migrator = "huddle_core::MIGRATOR")]
async fn every_application_table_has_row_level_security(pool: PgPool) -> Result<()> {
    let unprotected: Vec<String> = sqlx::query_scalar(
        "SELECT c.relname::text
         FROM pg_class c
         JOIN pg_namespace n ON n.oid = c.relnamespace
         WHERE n.nspname = 'public'
           AND c.relkind = 'r'
           AND c.relname <> '_sqlx_migrations'
           AND (NOT c.relrowsecurity
                OR NOT EXISTS (SELECT 1 FROM pg_policies p
                               WHERE p.schemaname = 'public' AND p.tablename = c.relname))
         ORDER BY c.relname",
    )
    .fetch_all(&pool)
    .await?;
    assert!(unprotected.is_empty(), "tables without RLS: {unprotected:?}");
    Ok(())
}
