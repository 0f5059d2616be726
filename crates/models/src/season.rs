use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, Condition, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{league, user, week};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "season")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub week_count: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub is_current: bool,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    CreatedBy,
    Weeks,
    Leagues,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::CreatedBy => Entity::belongs_to(user::Entity)
                .from(Column::CreatedBy)
                .to(user::Column::Id)
                .into(),
            Relation::Weeks => Entity::has_many(week::Entity).into(),
            Relation::Leagues => Entity::has_many(league::Entity).into(),
        }
    }
}

impl Related<week::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weeks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let n = name.trim();
    if n.is_empty() || n.len() > 100 {
        return Err(ModelError::Validation("season name must be 1-100 characters".into()));
    }
    Ok(())
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_current<C: ConnectionTrait>(conn: &C) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::IsCurrent.eq(true)).one(conn).await?)
}

pub async fn name_exists<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, ModelError> {
    let mut query = Entity::find().filter(Column::Name.eq(name.trim()));
    if let Some(id) = exclude_id {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.one(conn).await?.is_some())
}

/// Three-way interval overlap: the candidate starts inside an existing
/// season, ends inside one, or fully contains one.
pub async fn find_overlapping<C: ConnectionTrait>(
    conn: &C,
    start_date: Date,
    end_date: Date,
    exclude_id: Option<Uuid>,
) -> Result<Option<Model>, ModelError> {
    let overlap = Condition::any()
        .add(
            Condition::all()
                .add(Column::StartDate.lte(start_date))
                .add(Column::EndDate.gte(start_date)),
        )
        .add(
            Condition::all()
                .add(Column::StartDate.lte(end_date))
                .add(Column::EndDate.gte(end_date)),
        )
        .add(
            Condition::all()
                .add(Column::StartDate.gte(start_date))
                .add(Column::EndDate.lte(end_date)),
        );
    let mut query = Entity::find().filter(overlap);
    if let Some(id) = exclude_id {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.one(conn).await?)
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    skip: u64,
    limit: u64,
) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(conn)
        .await?)
}

#[allow(clippy::too_many_arguments)]
pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    week_count: i32,
    start_date: Date,
    end_date: Date,
    is_current: bool,
    created_by: Uuid,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        year: Set(chrono::Datelike::year(&start_date)),
        week_count: Set(week_count),
        start_date: Set(start_date),
        end_date: Set(end_date),
        is_current: Set(is_current),
        created_by: Set(created_by),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(conn).await?)
}

/// Clear `is_current` on every season except `exclude_id`.
pub async fn clear_current<C: ConnectionTrait>(
    conn: &C,
    exclude_id: Option<Uuid>,
) -> Result<(), ModelError> {
    let mut update = Entity::update_many()
        .col_expr(Column::IsCurrent, Expr::value(false))
        .filter(Column::IsCurrent.eq(true));
    if let Some(id) = exclude_id {
        update = update.filter(Column::Id.ne(id));
    }
    update.exec(conn).await?;
    Ok(())
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(conn).await?;
    Ok(())
}
