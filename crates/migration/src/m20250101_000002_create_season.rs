//! Create `season` table.
//!
//! A dated scheduling period; at most one row may have `is_current = true`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Season::Table)
                    .if_not_exists()
                    .col(uuid(Season::Id).primary_key())
                    .col(string_len(Season::Name, 100).unique_key().not_null())
                    .col(integer(Season::Year).not_null())
                    .col(integer(Season::WeekCount).not_null())
                    .col(date(Season::StartDate).not_null())
                    .col(date(Season::EndDate).not_null())
                    .col(boolean(Season::IsCurrent).not_null().default(false))
                    .col(uuid(Season::CreatedBy).not_null())
                    .col(timestamp_with_time_zone(Season::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_season_created_by")
                            .from(Season::Table, Season::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Season::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Season {
    Table,
    Id,
    Name,
    Year,
    WeekCount,
    StartDate,
    EndDate,
    IsCurrent,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
