//! Create `week` table with FK to `season`.
//!
//! Weeks are owned by their season and dropped with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Week::Table)
                    .if_not_exists()
                    .col(uuid(Week::Id).primary_key())
                    .col(uuid(Week::SeasonId).not_null())
                    .col(integer(Week::WeekNumber).not_null())
                    .col(date(Week::StartDate).not_null())
                    .col(date(Week::EndDate).not_null())
                    .col(timestamp_with_time_zone(Week::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_week_season")
                            .from(Week::Table, Week::SeasonId)
                            .to(Season::Table, Season::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Week::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Week {
    Table,
    Id,
    SeasonId,
    WeekNumber,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Season {
    Table,
    Id,
}
