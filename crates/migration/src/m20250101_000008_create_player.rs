//! Create `player` table with FK to `team`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Player::Table)
                    .if_not_exists()
                    .col(uuid(Player::Id).primary_key())
                    .col(string_len(Player::Name, 128).not_null())
                    .col(string_len(Player::Position, 64).not_null())
                    .col(ColumnDef::new(Player::ImageUrl).string_len(512).null())
                    .col(ColumnDef::new(Player::ThumbnailUrl).string_len(512).null())
                    .col(boolean(Player::IsActive).not_null().default(true))
                    .col(uuid(Player::CreatedBy).not_null())
                    .col(uuid(Player::TeamId).not_null())
                    .col(timestamp_with_time_zone(Player::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_created_by")
                            .from(Player::Table, Player::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_team")
                            .from(Player::Table, Player::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Player::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Player {
    Table,
    Id,
    Name,
    Position,
    ImageUrl,
    ThumbnailUrl,
    IsActive,
    CreatedBy,
    TeamId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
}
