//! Secondary indexes, including the case-insensitive unique indexes that
//! back the service-level name checks. The `LOWER(...)` indexes are raw SQL
//! since sea-query has no portable builder for functional indexes.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // Case-insensitive uniqueness backstops (see service-layer checks).
        conn.execute_unprepared(
            r#"CREATE UNIQUE INDEX "uniq_league_name_ci" ON "league" (LOWER("name"))"#,
        )
        .await?;
        conn.execute_unprepared(
            r#"CREATE UNIQUE INDEX "uniq_fantasy_team_league_name_ci" ON "fantasy_team" ("league_id", LOWER("name")) WHERE "league_id" IS NOT NULL"#,
        )
        .await?;
        conn.execute_unprepared(
            r#"CREATE UNIQUE INDEX "uniq_fantasy_team_unattached_name_ci" ON "fantasy_team" ("user_id", LOWER("name")) WHERE "league_id" IS NULL"#,
        )
        .await?;
        conn.execute_unprepared(
            r#"CREATE UNIQUE INDEX "uniq_league_member_alias_ci" ON "league_member" ("league_id", LOWER("user_alias"))"#,
        )
        .await?;
        conn.execute_unprepared(
            r#"CREATE UNIQUE INDEX "uniq_team_name_ci" ON "team" (LOWER("name"))"#,
        )
        .await?;
        conn.execute_unprepared(
            r#"CREATE UNIQUE INDEX "uniq_player_team_name_ci" ON "player" ("team_id", LOWER("name"))"#,
        )
        .await?;

        // Week: one row per (season, week_number)
        manager
            .create_index(
                Index::create()
                    .name("uniq_week_season_number")
                    .table(Week::Table)
                    .col(Week::SeasonId)
                    .col(Week::WeekNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // LeagueMember: at most one membership per (league, user)
        manager
            .create_index(
                Index::create()
                    .name("uniq_league_member_league_user")
                    .table(LeagueMember::Table)
                    .col(LeagueMember::LeagueId)
                    .col(LeagueMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // League: lookup by season
        manager
            .create_index(
                Index::create()
                    .name("idx_league_season")
                    .table(League::Table)
                    .col(League::SeasonId)
                    .to_owned(),
            )
            .await?;

        // FantasyTeam: lookup by league
        manager
            .create_index(
                Index::create()
                    .name("idx_fantasy_team_league")
                    .table(FantasyTeam::Table)
                    .col(FantasyTeam::LeagueId)
                    .to_owned(),
            )
            .await?;

        // Player: lookup by team
        manager
            .create_index(
                Index::create()
                    .name("idx_player_team")
                    .table(Player::Table)
                    .col(Player::TeamId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        conn.execute_unprepared(r#"DROP INDEX "uniq_league_name_ci""#).await?;
        conn.execute_unprepared(r#"DROP INDEX "uniq_fantasy_team_league_name_ci""#)
            .await?;
        conn.execute_unprepared(r#"DROP INDEX "uniq_fantasy_team_unattached_name_ci""#)
            .await?;
        conn.execute_unprepared(r#"DROP INDEX "uniq_league_member_alias_ci""#).await?;
        conn.execute_unprepared(r#"DROP INDEX "uniq_team_name_ci""#).await?;
        conn.execute_unprepared(r#"DROP INDEX "uniq_player_team_name_ci""#).await?;
        manager
            .drop_index(
                Index::drop().name("uniq_week_season_number").table(Week::Table).to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_league_member_league_user")
                    .table(LeagueMember::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_league_season").table(League::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_fantasy_team_league")
                    .table(FantasyTeam::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_player_team").table(Player::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Week {
    Table,
    SeasonId,
    WeekNumber,
}

#[derive(DeriveIden)]
enum LeagueMember {
    Table,
    LeagueId,
    UserId,
}

#[derive(DeriveIden)]
enum League {
    Table,
    SeasonId,
}

#[derive(DeriveIden)]
enum FantasyTeam {
    Table,
    LeagueId,
}

#[derive(DeriveIden)]
enum Player {
    Table,
    TeamId,
}
