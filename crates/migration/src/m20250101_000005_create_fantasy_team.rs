//! Create `fantasy_team` table.
//!
//! `league_id` is nullable: a team may be created unattached and assigned to
//! a league when its owner creates or joins one.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FantasyTeam::Table)
                    .if_not_exists()
                    .col(uuid(FantasyTeam::Id).primary_key())
                    .col(string_len(FantasyTeam::Name, 128).not_null())
                    .col(
                        ColumnDef::new(FantasyTeam::ImageUrl)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FantasyTeam::ThumbnailUrl)
                            .string_len(512)
                            .null(),
                    )
                    .col(boolean(FantasyTeam::IsActive).not_null().default(true))
                    .col(uuid(FantasyTeam::UserId).not_null())
                    .col(ColumnDef::new(FantasyTeam::LeagueId).uuid().null())
                    .col(timestamp_with_time_zone(FantasyTeam::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fantasy_team_user")
                            .from(FantasyTeam::Table, FantasyTeam::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fantasy_team_league")
                            .from(FantasyTeam::Table, FantasyTeam::LeagueId)
                            .to(League::Table, League::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FantasyTeam::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FantasyTeam {
    Table,
    Id,
    Name,
    ImageUrl,
    ThumbnailUrl,
    IsActive,
    UserId,
    LeagueId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum League {
    Table,
    Id,
}
