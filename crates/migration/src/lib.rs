//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user;
mod m20250101_000002_create_season;
mod m20250101_000003_create_week;
mod m20250101_000004_create_league;
mod m20250101_000005_create_fantasy_team;
mod m20250101_000006_create_league_member;
mod m20250101_000007_create_team;
mod m20250101_000008_create_player;
mod m20250101_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user::Migration),
            Box::new(m20250101_000002_create_season::Migration),
            Box::new(m20250101_000003_create_week::Migration),
            Box::new(m20250101_000004_create_league::Migration),
            Box::new(m20250101_000005_create_fantasy_team::Migration),
            Box::new(m20250101_000006_create_league_member::Migration),
            Box::new(m20250101_000007_create_team::Migration),
            Box::new(m20250101_000008_create_player::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000009_add_indexes::Migration),
        ]
    }
}
