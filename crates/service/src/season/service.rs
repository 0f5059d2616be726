use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::weeks;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use models::week::WeekSpec;
use models::{league, season, week};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeasonInput {
    pub name: String,
    pub week_count: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_current: bool,
    /// Explicit week list; when absent the schedule is generated by evenly
    /// dividing the season span.
    pub weeks: Option<Vec<WeekSpec>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSeasonInput {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
}

/// A season together with its week schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonWithWeeks {
    #[serde(flatten)]
    pub season: season::Model,
    pub weeks: Vec<week::Model>,
}

fn validate_week_count(week_count: i32) -> Result<(), ServiceError> {
    if !(1..=52).contains(&week_count) {
        return Err(ServiceError::Validation("week_count must be between 1 and 52".into()));
    }
    Ok(())
}

async fn check_overlap(
    db: &DatabaseConnection,
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    if let Some(other) = season::find_overlapping(db, start, end, exclude_id).await? {
        return Err(ServiceError::Validation(format!(
            "dates overlap with the existing season '{}' ({} to {})",
            other.name, other.start_date, other.end_date
        )));
    }
    Ok(())
}

/// Create a season and its weeks. All checks run before any insert; the
/// season row and its week rows go in as one transaction.
#[instrument(skip(db, input), fields(season = %input.name))]
pub async fn create_season(
    db: &DatabaseConnection,
    input: CreateSeasonInput,
    created_by: Uuid,
) -> Result<SeasonWithWeeks, ServiceError> {
    season::validate_name(&input.name)?;
    validate_week_count(input.week_count)?;
    weeks::validate_date_range(input.start_date, input.end_date, Utc::now().date_naive())?;

    if season::name_exists(db, &input.name, None).await? {
        return Err(ServiceError::Conflict(format!(
            "a season with the name '{}' already exists",
            input.name.trim()
        )));
    }
    check_overlap(db, input.start_date, input.end_date, None).await?;

    let week_specs = match input.weeks {
        Some(specs) => {
            if specs.len() != input.week_count as usize {
                return Err(ServiceError::Validation(format!(
                    "expected {} weeks, got {}",
                    input.week_count,
                    specs.len()
                )));
            }
            weeks::validate_week_ranges(&specs)?;
            weeks::validate_weeks_overlap(&specs)?;
            weeks::validate_weeks_within_season(&specs, input.start_date, input.end_date)?;
            specs
        }
        None => {
            let generated =
                weeks::generate_weeks(input.start_date, input.end_date, input.week_count);
            // A span shorter than the week count produces degenerate weeks
            weeks::validate_weeks_overlap(&generated).map_err(|_| {
                ServiceError::Validation(
                    "season span is too short for the requested week count".into(),
                )
            })?;
            generated
        }
    };

    let txn = db.begin().await?;
    if input.is_current {
        season::clear_current(&txn, None).await?;
    }
    let created = season::create(
        &txn,
        &input.name,
        input.week_count,
        input.start_date,
        input.end_date,
        input.is_current,
        created_by,
    )
    .await?;
    week::insert_for_season(&txn, created.id, &week_specs).await?;
    txn.commit().await?;

    let weeks = week::list_by_season(db, created.id).await?;
    info!(season_id = %created.id, weeks = weeks.len(), "season_created");
    Ok(SeasonWithWeeks { season: created, weeks })
}

/// Partial update. A name change re-runs the uniqueness check excluding
/// self; date changes re-run the range and overlap checks; `is_current =
/// true` clears the flag on every other season in the same transaction.
#[instrument(skip(db, input), fields(season_id = %season_id))]
pub async fn update_season(
    db: &DatabaseConnection,
    season_id: Uuid,
    input: UpdateSeasonInput,
) -> Result<season::Model, ServiceError> {
    let existing = season::find_by_id(db, season_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("season"))?;

    if input.name.is_none()
        && input.start_date.is_none()
        && input.end_date.is_none()
        && input.is_current.is_none()
    {
        return Ok(existing);
    }

    if let Some(name) = input.name.as_deref() {
        season::validate_name(name)?;
        if name.trim() != existing.name && season::name_exists(db, name, Some(season_id)).await? {
            return Err(ServiceError::Conflict(format!(
                "a season with the name '{}' already exists",
                name.trim()
            )));
        }
    }

    let start = input.start_date.unwrap_or(existing.start_date);
    let end = input.end_date.unwrap_or(existing.end_date);
    if input.start_date.is_some() || input.end_date.is_some() {
        if end <= start {
            return Err(ServiceError::Validation("end date must be after start date".into()));
        }
        check_overlap(db, start, end, Some(season_id)).await?;
    }

    let txn = db.begin().await?;
    if input.is_current == Some(true) {
        season::clear_current(&txn, Some(season_id)).await?;
    }

    let mut am: season::ActiveModel = existing.into();
    if let Some(name) = input.name.as_deref() {
        am.name = Set(name.trim().to_string());
    }
    if input.start_date.is_some() || input.end_date.is_some() {
        am.start_date = Set(start);
        am.end_date = Set(end);
        am.year = Set(chrono::Datelike::year(&start));
    }
    if let Some(current) = input.is_current {
        am.is_current = Set(current);
    }
    let updated = am.update(&txn).await.map_err(ServiceError::from)?;
    txn.commit().await?;

    info!(season_id = %updated.id, "season_updated");
    Ok(updated)
}

/// Explicitly make one season current, clearing the flag everywhere else in
/// the same transaction.
pub async fn set_current_season(
    db: &DatabaseConnection,
    season_id: Uuid,
) -> Result<season::Model, ServiceError> {
    let existing = season::find_by_id(db, season_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("season"))?;

    let txn = db.begin().await?;
    season::clear_current(&txn, Some(season_id)).await?;
    let mut am: season::ActiveModel = existing.into();
    am.is_current = Set(true);
    let updated = am.update(&txn).await.map_err(ServiceError::from)?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn list_seasons(
    db: &DatabaseConnection,
    pagination: Pagination,
) -> Result<Vec<SeasonWithWeeks>, ServiceError> {
    let (offset, limit) = pagination.normalize();
    let seasons = season::list(db, offset, limit).await?;
    let mut out = Vec::with_capacity(seasons.len());
    for s in seasons {
        let weeks = week::list_by_season(db, s.id).await?;
        out.push(SeasonWithWeeks { season: s, weeks });
    }
    Ok(out)
}

pub async fn get_season(
    db: &DatabaseConnection,
    season_id: Uuid,
) -> Result<SeasonWithWeeks, ServiceError> {
    let s = season::find_by_id(db, season_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("season"))?;
    let weeks = week::list_by_season(db, s.id).await?;
    Ok(SeasonWithWeeks { season: s, weeks })
}

pub async fn get_current_season(db: &DatabaseConnection) -> Result<SeasonWithWeeks, ServiceError> {
    let s = season::find_current(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("no current season found".into()))?;
    let weeks = week::list_by_season(db, s.id).await?;
    Ok(SeasonWithWeeks { season: s, weeks })
}

/// Delete a season and its weeks. Seasons referenced by leagues are
/// protected (restrict FK); surface that as a conflict instead of a raw
/// database error.
pub async fn delete_season(db: &DatabaseConnection, season_id: Uuid) -> Result<(), ServiceError> {
    let s = season::find_by_id(db, season_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("season"))?;

    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
    let leagues = league::Entity::find()
        .filter(league::Column::SeasonId.eq(season_id))
        .count(db)
        .await?;
    if leagues > 0 {
        return Err(ServiceError::Conflict(
            "season is referenced by existing leagues".into(),
        ));
    }

    season::delete_by_id(db, s.id).await?;
    info!(season_id = %season_id, "season_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::Duration;
    use models::user;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn seed_user(db: &DatabaseConnection) -> user::Model {
        let email = format!("season_{}@example.com", Uuid::new_v4());
        user::create(db, "Season Admin", &email, "sadmin", "hash").await.unwrap()
    }

    /// Far-future disjoint window per call: windows start on multiples of
    /// 400 days, longer than any span used in these tests, so two random
    /// slots never overlap.
    fn window(days: i64) -> (NaiveDate, NaiveDate) {
        assert!(days < 400);
        let slot = (Uuid::new_v4().as_u128() % 100_000) as i64;
        let start = d(2200, 1, 1) + Duration::days(slot * 400);
        (start, start + Duration::days(days - 1))
    }

    fn input(name: String, start: NaiveDate, end: NaiveDate, weeks: i32) -> CreateSeasonInput {
        CreateSeasonInput {
            name,
            week_count: weeks,
            start_date: start,
            end_date: end,
            is_current: false,
            weeks: None,
        }
    }

    #[tokio::test]
    async fn create_generates_weeks_and_enforces_name_uniqueness() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let admin = seed_user(&db).await;
        let (start, end) = window(122);

        let name = format!("Fall {}", Uuid::new_v4());
        let created = create_season(&db, input(name.clone(), start, end, 4), admin.id).await?;
        assert_eq!(created.weeks.len(), 4);
        assert_eq!(created.weeks[0].start_date, start);
        assert_eq!(created.weeks[3].end_date, end);

        let (s2, e2) = window(60);
        let err = create_season(&db, input(name, s2, e2, 4), admin.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn overlapping_seasons_are_rejected_before_any_write() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let admin = seed_user(&db).await;
        let (start, end) = window(100);

        create_season(&db, input(format!("Base {}", Uuid::new_v4()), start, end, 4), admin.id)
            .await?;

        // Contained inside the existing season
        let err = create_season(
            &db,
            input(
                format!("Inner {}", Uuid::new_v4()),
                start + Duration::days(10),
                end - Duration::days(10),
                2,
            ),
            admin.id,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        Ok(())
    }

    #[tokio::test]
    async fn explicit_weeks_must_match_count_and_fit() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let admin = seed_user(&db).await;
        let (start, end) = window(28);

        // Count mismatch
        let mut bad = input(format!("Short {}", Uuid::new_v4()), start, end, 2);
        bad.weeks = Some(vec![WeekSpec {
            week_number: 1,
            start_date: start,
            end_date: start + Duration::days(6),
        }]);
        let err = create_season(&db, bad, admin.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Overlapping weeks
        let mut bad = input(format!("Lap {}", Uuid::new_v4()), start, end, 2);
        bad.weeks = Some(vec![
            WeekSpec { week_number: 1, start_date: start, end_date: start + Duration::days(14) },
            WeekSpec {
                week_number: 2,
                start_date: start + Duration::days(14),
                end_date: end,
            },
        ]);
        let err = create_season(&db, bad, admin.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Week outside the season
        let mut bad = input(format!("Out {}", Uuid::new_v4()), start, end, 2);
        bad.weeks = Some(vec![
            WeekSpec { week_number: 1, start_date: start, end_date: start + Duration::days(6) },
            WeekSpec {
                week_number: 2,
                start_date: start + Duration::days(7),
                end_date: end + Duration::days(1),
            },
        ]);
        let err = create_season(&db, bad, admin.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        // Nothing was persisted by the failed attempts
        let rows = season::list(&db, 0, 200).await?;
        assert!(rows.iter().all(|s| !s.name.starts_with("Short ") && !s.name.starts_with("Lap ")));
        Ok(())
    }

    #[tokio::test]
    async fn at_most_one_current_season_after_any_sequence() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let _guard = crate::test_support::current_season_guard().await;
        let db = get_db().await?;
        let admin = seed_user(&db).await;

        let (s1, e1) = window(50);
        let mut first = input(format!("Cur A {}", Uuid::new_v4()), s1, e1, 2);
        first.is_current = true;
        let a = create_season(&db, first, admin.id).await?;

        let (s2, e2) = window(50);
        let mut second = input(format!("Cur B {}", Uuid::new_v4()), s2, e2, 2);
        second.is_current = true;
        let b = create_season(&db, second, admin.id).await?;

        let current = season::find_current(&db).await?.unwrap();
        assert_eq!(current.id, b.season.id);
        assert!(!season::find_by_id(&db, a.season.id).await?.unwrap().is_current);

        // update_season flips it back
        update_season(
            &db,
            a.season.id,
            UpdateSeasonInput { is_current: Some(true), ..Default::default() },
        )
        .await?;
        let current = season::find_current(&db).await?.unwrap();
        assert_eq!(current.id, a.season.id);

        // set_current_season is the explicit variant
        set_current_season(&db, b.season.id).await?;
        let current = season::find_current(&db).await?.unwrap();
        assert_eq!(current.id, b.season.id);
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_duplicate_name_and_missing_season() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let admin = seed_user(&db).await;

        let (s1, e1) = window(40);
        let a = create_season(&db, input(format!("Upd A {}", Uuid::new_v4()), s1, e1, 2), admin.id)
            .await?;
        let (s2, e2) = window(40);
        let b = create_season(&db, input(format!("Upd B {}", Uuid::new_v4()), s2, e2, 2), admin.id)
            .await?;

        let err = update_season(
            &db,
            b.season.id,
            UpdateSeasonInput { name: Some(a.season.name.clone()), ..Default::default() },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = update_season(&db, Uuid::new_v4(), UpdateSeasonInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
