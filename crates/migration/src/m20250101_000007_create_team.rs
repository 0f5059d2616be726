//! Create `team` table (real clubs players belong to).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(uuid(Team::Id).primary_key())
                    .col(string_len(Team::Name, 128).not_null())
                    .col(string_len(Team::City, 128).not_null())
                    .col(ColumnDef::new(Team::ImageUrl).string_len(512).null())
                    .col(ColumnDef::new(Team::ThumbnailUrl).string_len(512).null())
                    .col(boolean(Team::IsActive).not_null().default(true))
                    .col(uuid(Team::CreatedBy).not_null())
                    .col(timestamp_with_time_zone(Team::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_created_by")
                            .from(Team::Table, Team::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Team::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
    Name,
    City,
    ImageUrl,
    ThumbnailUrl,
    IsActive,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
