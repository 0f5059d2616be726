use crate::db::connect;
use crate::{fantasy_team, league, league_member, season, team, user, week};
use anyhow::Result;
use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn make_user(db: &DatabaseConnection) -> Result<user::Model> {
    let email = format!("crud_{}@example.com", Uuid::new_v4());
    Ok(user::create(db, "Crud User", &email, "cruddy", "not-a-real-hash").await?)
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("test_{}@example.com", Uuid::new_v4());
    let created = user::create(&db, "Test User", &email, "tester", "hash").await?;
    assert_eq!(created.email, email);
    assert_eq!(created.role, user::ROLE_MANAGER);
    assert_eq!(created.account_status, user::STATUS_ACTIVE);
    assert_eq!(created.failed_login_attempts, 0);

    let found = user::find_by_email(&db, &email).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_season_with_weeks_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;
    let creator = make_user(&db).await?;

    let name = format!("Season {}", Uuid::new_v4());
    let start = NaiveDate::from_ymd_opt(2031, 9, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2031, 10, 26).unwrap();
    let created = season::create(&db, &name, 2, start, end, false, creator.id).await?;
    assert_eq!(created.year, 2031);

    let specs = vec![
        week::WeekSpec {
            week_number: 1,
            start_date: start,
            end_date: NaiveDate::from_ymd_opt(2031, 9, 28).unwrap(),
        },
        week::WeekSpec {
            week_number: 2,
            start_date: NaiveDate::from_ymd_opt(2031, 9, 29).unwrap(),
            end_date: end,
        },
    ];
    week::insert_for_season(&db, created.id, &specs).await?;

    let weeks = week::list_by_season(&db, created.id).await?;
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].week_number, 1);
    assert_eq!(weeks[1].end_date, end);

    // cascade removes the weeks
    season::delete_by_id(&db, created.id).await?;
    let weeks = week::list_by_season(&db, created.id).await?;
    assert!(weeks.is_empty());

    user::Entity::delete_by_id(creator.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_league_membership_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;
    let creator = make_user(&db).await?;

    let season_name = format!("Season {}", Uuid::new_v4());
    let start = NaiveDate::from_ymd_opt(2032, 9, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2032, 12, 31).unwrap();
    let s = season::create(&db, &season_name, 4, start, end, false, creator.id).await?;

    let league_name = format!("League {}", Uuid::new_v4());
    let lg = league::create(
        &db,
        &league_name,
        Some("test league"),
        8,
        "hash",
        true,
        4,
        creator.id,
        s.id,
        None,
        None,
    )
    .await?;
    assert_eq!(lg.status, league::STATUS_PRE_DRAFT);
    assert!(league::name_exists_ci(&db, &league_name.to_uppercase()).await?);

    let ft = fantasy_team::create(&db, "The Crushers", None, None, creator.id, Some(lg.id)).await?;
    let member = league_member::create(&db, lg.id, creator.id, ft.id, "The Crushers").await?;
    assert_eq!(league_member::count_by_league(&db, lg.id).await?, 1);
    assert!(league_member::alias_exists_ci(&db, lg.id, "the crushers").await?);

    let by_name = fantasy_team::find_by_name_in_league_ci(&db, lg.id, "THE CRUSHERS").await?;
    assert_eq!(by_name.map(|t| t.id), Some(ft.id));
    let roster = fantasy_team::list_by_league(&db, lg.id).await?;
    assert_eq!(roster.len(), 1);

    league_member::Entity::delete_by_id(member.id).exec(&db).await?;
    fantasy_team::Entity::delete_by_id(ft.id).exec(&db).await?;
    league::Entity::delete_by_id(lg.id).exec(&db).await?;
    season::delete_by_id(&db, s.id).await?;
    user::Entity::delete_by_id(creator.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_team_and_player_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }

    let db = setup_test_db().await?;
    let creator = make_user(&db).await?;

    let team_name = format!("Club {}", Uuid::new_v4());
    let t = team::create(&db, &team_name, "Springfield", None, None, creator.id).await?;
    assert!(team::find_by_name_ci(&db, &team_name.to_uppercase()).await?.is_some());

    let p = crate::player::create(&db, "Joe Montana", "QB", Some("/media/players/x.png"), None, creator.id, t.id)
        .await?;
    let dup = crate::player::find_by_name_in_team_ci(&db, t.id, "JOE MONTANA").await?;
    assert_eq!(dup.map(|p| p.id), Some(p.id));

    crate::player::Entity::delete_by_id(p.id).exec(&db).await?;
    team::Entity::delete_by_id(t.id).exec(&db).await?;
    user::Entity::delete_by_id(creator.id).exec(&db).await?;
    Ok(())
}
