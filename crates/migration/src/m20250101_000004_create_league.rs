//! Create `league` table with FKs to `user` and `season`.
//!
//! Name uniqueness is case-insensitive and enforced by the functional index
//! in the index migration, not by a column-level unique constraint.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(League::Table)
                    .if_not_exists()
                    .col(uuid(League::Id).primary_key())
                    .col(string_len(League::Name, 100).not_null())
                    .col(
                        ColumnDef::new(League::Description)
                            .string_len(1000)
                            .null(),
                    )
                    .col(integer(League::MaxTeams).not_null())
                    .col(string_len(League::PasswordHash, 255).not_null())
                    .col(string_len(League::Status, 30).not_null())
                    .col(boolean(League::AllowDecimalScoring).not_null().default(true))
                    .col(integer(League::PlayoffFormat).not_null())
                    .col(uuid(League::CreatedBy).not_null())
                    .col(uuid(League::SeasonId).not_null())
                    .col(json_binary(League::RosterSchema).not_null())
                    .col(json_binary(League::ScoringSchema).not_null())
                    .col(timestamp_with_time_zone(League::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_created_by")
                            .from(League::Table, League::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_season")
                            .from(League::Table, League::SeasonId)
                            .to(Season::Table, Season::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(League::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum League {
    Table,
    Id,
    Name,
    Description,
    MaxTeams,
    PasswordHash,
    Status,
    AllowDecimalScoring,
    PlayoffFormat,
    CreatedBy,
    SeasonId,
    RosterSchema,
    ScoringSchema,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Season {
    Table,
    Id,
}
