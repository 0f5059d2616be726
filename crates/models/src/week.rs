use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::season;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "week")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub season_id: Uuid,
    pub week_number: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Season,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Season => Entity::belongs_to(season::Entity)
                .from(Column::SeasonId)
                .to(season::Column::Id)
                .into(),
        }
    }
}

impl Related<season::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Season.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Descriptor used before a week row exists (validation and generation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSpec {
    pub week_number: i32,
    pub start_date: Date,
    pub end_date: Date,
}

pub async fn insert_for_season<C: ConnectionTrait>(
    conn: &C,
    season_id: Uuid,
    weeks: &[WeekSpec],
) -> Result<(), ModelError> {
    if weeks.is_empty() {
        return Ok(());
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = weeks.iter().map(|w| ActiveModel {
        id: Set(Uuid::new_v4()),
        season_id: Set(season_id),
        week_number: Set(w.week_number),
        start_date: Set(w.start_date),
        end_date: Set(w.end_date),
        created_at: Set(now),
    });
    Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

pub async fn list_by_season<C: ConnectionTrait>(
    conn: &C,
    season_id: Uuid,
) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::SeasonId.eq(season_id))
        .order_by_asc(Column::WeekNumber)
        .all(conn)
        .await?)
}
