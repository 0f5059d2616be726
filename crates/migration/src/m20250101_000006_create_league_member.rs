//! Create `league_member` join table.
//!
//! One row per (league, user); alias uniqueness per league is enforced
//! case-insensitively by the index migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LeagueMember::Table)
                    .if_not_exists()
                    .col(uuid(LeagueMember::Id).primary_key())
                    .col(uuid(LeagueMember::LeagueId).not_null())
                    .col(uuid(LeagueMember::UserId).not_null())
                    .col(uuid(LeagueMember::FantasyTeamId).not_null())
                    .col(string_len(LeagueMember::UserAlias, 50).not_null())
                    .col(timestamp_with_time_zone(LeagueMember::JoinedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_member_league")
                            .from(LeagueMember::Table, LeagueMember::LeagueId)
                            .to(League::Table, League::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_member_user")
                            .from(LeagueMember::Table, LeagueMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_member_fantasy_team")
                            .from(LeagueMember::Table, LeagueMember::FantasyTeamId)
                            .to(FantasyTeam::Table, FantasyTeam::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeagueMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LeagueMember {
    Table,
    Id,
    LeagueId,
    UserId,
    FantasyTeamId,
    UserAlias,
    JoinedAt,
}

#[derive(DeriveIden)]
enum League {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum FantasyTeam {
    Table,
    Id,
}
