use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{
    CreateLeagueInput, FantasyTeamDescriptor, JoinLeagueInput, LeagueSearchFilters, LeagueSearchRow,
};
use crate::auth::service::{hash_password, verify_password};
use crate::errors::ServiceError;
use crate::media::MediaStore;
use models::{fantasy_team, league, league_member, season};

const MEDIA_SUBDIR: &str = "fantasy_teams";

/// Commissioner team source resolved from the payload before any write.
enum TeamSource {
    New { name: String, image_url: Option<String> },
    Existing(fantasy_team::Model),
}

impl TeamSource {
    fn name(&self) -> &str {
        match self {
            TeamSource::New { name, .. } => name,
            TeamSource::Existing(team) => &team.name,
        }
    }
}

/// Validate the team part of a create/join payload and resolve it to either
/// a new descriptor or one of the caller's existing teams.
async fn resolve_team_source(
    db: &DatabaseConnection,
    user_id: Uuid,
    descriptor: Option<&FantasyTeamDescriptor>,
    existing_team_id: Option<Uuid>,
    existing_team_name: Option<&str>,
) -> Result<TeamSource, ServiceError> {
    if let Some(ft) = descriptor {
        fantasy_team::validate_name(&ft.name)?;
        return Ok(TeamSource::New {
            name: ft.name.trim().to_string(),
            image_url: ft.image_url.clone(),
        });
    }

    let team = match (existing_team_id, existing_team_name) {
        (Some(id), _) => fantasy_team::find_by_id(db, id).await?,
        (None, Some(name)) => {
            fantasy_team::find_by_owner_and_name_ci(db, user_id, name).await?
        }
        (None, None) => {
            return Err(ServiceError::Validation(
                "a fantasy team descriptor or an existing team reference is required".into(),
            ))
        }
    };
    let team = team.ok_or_else(|| ServiceError::not_found("fantasy team"))?;
    if team.user_id != user_id {
        return Err(ServiceError::Forbidden("team belongs to another user".into()));
    }
    if team.league_id.is_some() {
        return Err(ServiceError::Conflict("team is already assigned to a league".into()));
    }
    Ok(TeamSource::Existing(team))
}

/// Resolve a thumbnail for a new team's image before the transaction opens.
/// `/media/` references reuse the `_thumb.png` convention; remote URLs go
/// through the media store's bounded download. Failures degrade to no
/// thumbnail.
async fn resolve_thumbnail(media: &MediaStore, image_url: Option<&str>) -> Option<String> {
    match image_url {
        Some(url) => media.resolve_thumbnail(url, MEDIA_SUBDIR).await,
        None => None,
    }
}

/// Create a league together with its commissioner's fantasy team and the
/// commissioner's member row. Either all three rows are committed or none.
#[instrument(skip(db, media, input), fields(league = %input.name, creator = %creator_user_id))]
pub async fn create_league_with_commissioner_team(
    db: &DatabaseConnection,
    media: &MediaStore,
    creator_user_id: Uuid,
    input: CreateLeagueInput,
) -> Result<(league::Model, fantasy_team::Model), ServiceError> {
    league::validate_name(&input.name)?;
    league::validate_max_teams(input.max_teams)?;
    league::validate_playoff_format(input.playoff_format)?;
    league::validate_password(&input.password)?;

    if league::name_exists_ci(db, &input.name).await? {
        return Err(ServiceError::Conflict("a league with that name already exists".into()));
    }

    let season = season::find_current(db)
        .await?
        .ok_or_else(|| {
            ServiceError::Precondition(
                "no current season is set; an administrator must mark one season as current".into(),
            )
        })?;

    let source = resolve_team_source(
        db,
        creator_user_id,
        input.fantasy_team.as_ref(),
        input.existing_team_id,
        input.existing_team_name.as_deref(),
    )
    .await?;

    // Network call stays outside the transaction
    let thumb_url = match &source {
        TeamSource::New { image_url, .. } => resolve_thumbnail(media, image_url.as_deref()).await,
        TeamSource::Existing(_) => None,
    };

    let password_hash =
        hash_password(&input.password).map_err(|e| ServiceError::Validation(e.to_string()))?;

    let txn = db.begin().await?;

    let created_league = league::create(
        &txn,
        &input.name,
        input.description.as_deref(),
        input.max_teams,
        &password_hash,
        input.allow_decimal_scoring,
        input.playoff_format,
        creator_user_id,
        season.id,
        None,
        None,
    )
    .await?;

    let team = match source {
        TeamSource::New { name, image_url } => {
            if fantasy_team::find_by_name_in_league_ci(&txn, created_league.id, &name)
                .await?
                .is_some()
            {
                return Err(ServiceError::Conflict(
                    "a team with that name already exists in this league".into(),
                ));
            }
            fantasy_team::create(
                &txn,
                &name,
                image_url.as_deref(),
                thumb_url.as_deref(),
                creator_user_id,
                Some(created_league.id),
            )
            .await?
        }
        TeamSource::Existing(existing) => {
            fantasy_team::assign_to_league(&txn, existing, created_league.id).await?
        }
    };

    // Commissioner joins under the team name
    league_member::create(&txn, created_league.id, creator_user_id, team.id, &team.name).await?;

    txn.commit().await?;
    info!(league_id = %created_league.id, team_id = %team.id, "league_created");
    Ok((created_league, team))
}

/// Join an existing league. Steps 1-8 are pure reads; the first failure
/// wins and nothing is written until every check has passed.
#[instrument(skip(db, media, input), fields(league_id = %league_id, user_id = %user_id))]
pub async fn join_league(
    db: &DatabaseConnection,
    media: &MediaStore,
    league_id: Uuid,
    user_id: Uuid,
    input: JoinLeagueInput,
) -> Result<league_member::Model, ServiceError> {
    // 1) League exists
    let target = league::find_by_id(db, league_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("league"))?;

    // 2) Not completed
    if target.status == league::STATUS_COMPLETED {
        return Err(ServiceError::Validation(
            "this league is already finalized and does not accept new members".into(),
        ));
    }

    // 3) Password check (generic error, same as any credential failure)
    if !verify_password(&input.password, &target.password_hash) {
        return Err(ServiceError::Forbidden("invalid credentials".into()));
    }

    // 4) Existing membership
    if league_member::find_by_league_and_user(db, league_id, user_id)
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict("you are already a member of this league".into()));
    }

    // 5) Capacity
    let member_count = league_member::count_by_league(db, league_id).await?;
    if member_count >= target.max_teams as u64 {
        return Err(ServiceError::Validation("this league has no available slots".into()));
    }

    // 6) Team source must be supplied and minimally valid
    let alias = input.user_alias.trim().to_string();
    if alias.is_empty() || alias.len() > 50 {
        return Err(ServiceError::Validation("alias must be 1-50 characters".into()));
    }
    let source = resolve_team_source(
        db,
        user_id,
        input.fantasy_team.as_ref(),
        input.existing_team_id,
        input.existing_team_name.as_deref(),
    )
    .await?;

    // 7) Alias unique within the league
    if league_member::alias_exists_ci(db, league_id, &alias).await? {
        return Err(ServiceError::Conflict(format!(
            "the alias '{alias}' is already in use in this league"
        )));
    }

    // 8) Team name unique within the league
    if fantasy_team::find_by_name_in_league_ci(db, league_id, source.name())
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "a team named '{}' already exists in this league",
            source.name()
        )));
    }

    // 9) Create records; network call first, then one transaction
    let thumb_url = match &source {
        TeamSource::New { image_url, .. } => resolve_thumbnail(media, image_url.as_deref()).await,
        TeamSource::Existing(_) => None,
    };

    let txn = db.begin().await?;
    let team = match source {
        TeamSource::New { name, image_url } => {
            fantasy_team::create(
                &txn,
                &name,
                image_url.as_deref(),
                thumb_url.as_deref(),
                user_id,
                Some(league_id),
            )
            .await?
        }
        TeamSource::Existing(existing) => {
            fantasy_team::assign_to_league(&txn, existing, league_id).await?
        }
    };
    let member = league_member::create(&txn, league_id, user_id, team.id, &alias).await?;
    txn.commit().await?;

    info!(league_id = %league_id, member_id = %member.id, "league_joined");
    Ok(member)
}

/// Search leagues. At least one criterion is required and name filters must
/// be three characters or longer, so unauthenticated callers cannot
/// enumerate every league.
pub async fn search_leagues(
    db: &DatabaseConnection,
    filters: LeagueSearchFilters,
) -> Result<Vec<LeagueSearchRow>, ServiceError> {
    let name = filters.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    if name.is_none() && filters.season_id.is_none() && filters.status.is_none() {
        return Err(ServiceError::Validation("at least one search filter is required".into()));
    }
    if let Some(n) = name {
        if n.chars().count() < 3 {
            return Err(ServiceError::Validation(
                "name filter must be at least 3 characters".into(),
            ));
        }
    }

    let mut query = league::Entity::find();
    match filters.status.as_deref() {
        Some(status) => {
            if !league::OPEN_STATUSES.contains(&status) && status != league::STATUS_COMPLETED {
                return Err(ServiceError::Validation(format!("unknown status '{status}'")));
            }
            query = query.filter(league::Column::Status.eq(status));
        }
        // Default scope: leagues that are still running
        None => query = query.filter(league::Column::Status.is_in(league::OPEN_STATUSES)),
    }
    if let Some(n) = name {
        // Qualified column: the season join also carries a `name`
        query = query.filter(
            Expr::expr(Func::lower(Expr::col((league::Entity, league::Column::Name))))
                .like(format!("%{}%", n.to_lowercase())),
        );
    }
    if let Some(season_id) = filters.season_id {
        query = query.filter(league::Column::SeasonId.eq(season_id));
    }

    let leagues = query
        .find_also_related(season::Entity)
        .order_by_desc(league::Column::CreatedAt)
        .all(db)
        .await?;

    let mut rows = Vec::with_capacity(leagues.len());
    for (lg, season) in leagues {
        let member_count = league_member::count_by_league(db, lg.id).await?;
        rows.push(LeagueSearchRow {
            id: lg.id,
            name: lg.name,
            description: lg.description,
            status: lg.status,
            max_teams: lg.max_teams,
            season_id: lg.season_id,
            season_name: season.map(|s| s.name).unwrap_or_default(),
            slots_available: lg.max_teams as i64 - member_count as i64,
            created_at: lg.created_at,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, test_media_store};
    use chrono::NaiveDate;
    use models::user;
    use sea_orm::PaginatorTrait;

    async fn seed_user(db: &DatabaseConnection) -> user::Model {
        let email = format!("league_{}@example.com", Uuid::new_v4());
        user::create(db, "League User", &email, "lgu", &hash_password("Passw0rd").unwrap())
            .await
            .unwrap()
    }

    async fn seed_current_season(db: &DatabaseConnection, created_by: Uuid) -> season::Model {
        // Far-future 400-day slots so two random windows never overlap
        let slot = (Uuid::new_v4().as_u128() % 100_000) as i64;
        let start = NaiveDate::from_ymd_opt(2200, 1, 1).unwrap()
            + chrono::Duration::days(slot * 400 + 200);
        let end = start + chrono::Duration::days(30);
        let name = format!("Season {}", Uuid::new_v4());
        let s = season::create(db, &name, 4, start, end, false, created_by).await.unwrap();
        // Flip the flag directly; the season service owns the invariant
        season::clear_current(db, None).await.unwrap();
        let mut am: season::ActiveModel = s.clone().into();
        am.is_current = sea_orm::Set(true);
        use sea_orm::ActiveModelTrait;
        am.update(db).await.unwrap()
    }

    fn create_input(name: &str, team_name: &str) -> CreateLeagueInput {
        CreateLeagueInput {
            name: name.into(),
            description: Some("test league".into()),
            max_teams: 4,
            password: "Secret123".into(),
            playoff_format: 4,
            allow_decimal_scoring: true,
            fantasy_team: Some(FantasyTeamDescriptor { name: team_name.into(), image_url: None }),
            existing_team_id: None,
            existing_team_name: None,
        }
    }

    #[tokio::test]
    async fn create_league_commits_all_three_rows() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let _guard = crate::test_support::current_season_guard().await;
        let db = get_db().await?;
        let media = test_media_store();
        let creator = seed_user(&db).await;
        seed_current_season(&db, creator.id).await;

        let name = format!("Atomic {}", Uuid::new_v4());
        let (lg, team) =
            create_league_with_commissioner_team(&db, &media, creator.id, create_input(&name, "Crushers"))
                .await?;

        assert_eq!(lg.status, league::STATUS_PRE_DRAFT);
        assert_eq!(team.league_id, Some(lg.id));
        let members = league_member::count_by_league(&db, lg.id).await?;
        assert_eq!(members, 1);

        // Commissioner's alias defaults to the team name
        let member = league_member::find_by_league_and_user(&db, lg.id, creator.id).await?.unwrap();
        assert_eq!(member.user_alias, "Crushers");
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_league_name_is_case_insensitive() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let _guard = crate::test_support::current_season_guard().await;
        let db = get_db().await?;
        let media = test_media_store();
        let creator = seed_user(&db).await;
        seed_current_season(&db, creator.id).await;

        let name = format!("Dynasty {}", Uuid::new_v4());
        create_league_with_commissioner_team(&db, &media, creator.id, create_input(&name, "First"))
            .await?;

        let other = seed_user(&db).await;
        let err = create_league_with_commissioner_team(
            &db,
            &media,
            other.id,
            create_input(&name.to_lowercase(), "Second"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Failed attempt left no team or member rows behind
        let count = fantasy_team::Entity::find()
            .filter(fantasy_team::Column::UserId.eq(other.id))
            .count(&db)
            .await?;
        assert_eq!(count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn create_without_current_season_is_precondition_failure() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let _guard = crate::test_support::current_season_guard().await;
        let db = get_db().await?;
        let media = test_media_store();
        let creator = seed_user(&db).await;
        season::clear_current(&db, None).await?;

        let name = format!("Orphan {}", Uuid::new_v4());
        let err =
            create_league_with_commissioner_team(&db, &media, creator.id, create_input(&name, "T"))
                .await
                .unwrap_err();
        assert!(matches!(err, ServiceError::Precondition(_)));
        Ok(())
    }

    #[tokio::test]
    async fn join_validates_in_order_and_fills_slots() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let _guard = crate::test_support::current_season_guard().await;
        let db = get_db().await?;
        let media = test_media_store();
        let creator = seed_user(&db).await;
        seed_current_season(&db, creator.id).await;

        let name = format!("Joinable {}", Uuid::new_v4());
        let (lg, _) =
            create_league_with_commissioner_team(&db, &media, creator.id, create_input(&name, "Comish"))
                .await?;

        let join = |alias: &str, team: &str| JoinLeagueInput {
            password: "Secret123".into(),
            user_alias: alias.into(),
            fantasy_team: Some(FantasyTeamDescriptor { name: team.into(), image_url: None }),
            existing_team_id: None,
            existing_team_name: None,
        };

        // Wrong password is a generic forbidden
        let u2 = seed_user(&db).await;
        let err = join_league(
            &db,
            &media,
            lg.id,
            u2.id,
            JoinLeagueInput { password: "Wrong1234".into(), ..join("Bob", "Bobcats") },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        join_league(&db, &media, lg.id, u2.id, join("Bob", "Bobcats")).await?;

        // Duplicate membership
        let err = join_league(&db, &media, lg.id, u2.id, join("Bob2", "Bobcats2")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Alias conflicts are case-insensitive
        let u3 = seed_user(&db).await;
        let err = join_league(&db, &media, lg.id, u3.id, join("bob", "Cats")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Team-name conflicts are case-insensitive
        let err = join_league(&db, &media, lg.id, u3.id, join("Carol", "BOBCATS")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        join_league(&db, &media, lg.id, u3.id, join("Carol", "Cats")).await?;
        let u4 = seed_user(&db).await;
        join_league(&db, &media, lg.id, u4.id, join("Dave", "Daves")).await?;

        // max_teams = 4 and the league is full now
        let u5 = seed_user(&db).await;
        let err = join_league(&db, &media, lg.id, u5.id, join("Eve", "Eagles")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(league_member::count_by_league(&db, lg.id).await?, 4);
        Ok(())
    }

    #[tokio::test]
    async fn join_missing_league_is_not_found() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        let media = test_media_store();
        let user = seed_user(&db).await;
        let err = join_league(
            &db,
            &media,
            Uuid::new_v4(),
            user.id,
            JoinLeagueInput {
                password: "Secret123".into(),
                user_alias: "Ghost".into(),
                fantasy_team: Some(FantasyTeamDescriptor { name: "Ghosts".into(), image_url: None }),
                existing_team_id: None,
                existing_team_name: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn search_requires_a_filter_and_reports_slots() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let _guard = crate::test_support::current_season_guard().await;
        let db = get_db().await?;
        let media = test_media_store();
        let creator = seed_user(&db).await;
        let season = seed_current_season(&db, creator.id).await;

        let err = search_leagues(&db, LeagueSearchFilters::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = search_leagues(
            &db,
            LeagueSearchFilters { name: Some("ab".into()), ..Default::default() },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let marker = Uuid::new_v4().simple().to_string();
        let name = format!("Searchable {marker}");
        let (lg, _) =
            create_league_with_commissioner_team(&db, &media, creator.id, create_input(&name, "S1"))
                .await?;

        let rows = search_leagues(
            &db,
            LeagueSearchFilters {
                name: Some(marker.to_uppercase()),
                season_id: Some(season.id),
                status: None,
            },
        )
        .await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, lg.id);
        assert_eq!(rows[0].slots_available, 3); // commissioner holds one of four
        assert_eq!(rows[0].season_name, season.name);
        Ok(())
    }
}
