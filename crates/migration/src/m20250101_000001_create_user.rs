//! Create `user` table.
//!
//! Stores account identity, role, lockout state and the failed-login counter.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Name, 50).not_null())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(string_len(User::Alias, 50).not_null())
                    .col(string_len(User::HashedPassword, 255).not_null())
                    .col(string_len(User::Role, 20).not_null())
                    .col(string_len(User::AccountStatus, 20).not_null())
                    .col(integer(User::FailedLoginAttempts).not_null().default(0))
                    .col(
                        ColumnDef::new(User::LastActivity)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Name,
    Email,
    Alias,
    HashedPassword,
    Role,
    AccountStatus,
    FailedLoginAttempts,
    LastActivity,
    CreatedAt,
}
