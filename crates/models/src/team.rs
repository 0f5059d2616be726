use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::{player, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    CreatedBy,
    Players,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::CreatedBy => Entity::belongs_to(user::Entity)
                .from(Column::CreatedBy)
                .to(user::Column::Id)
                .into(),
            Relation::Players => Entity::has_many(player::Entity).into(),
        }
    }
}

impl Related<player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let n = name.trim();
    if n.len() < 2 || n.len() > 128 {
        return Err(ModelError::Validation("team name must be 2-128 characters".into()));
    }
    Ok(())
}

pub fn validate_city(city: &str) -> Result<(), ModelError> {
    let c = city.trim();
    if c.len() < 2 || c.len() > 128 {
        return Err(ModelError::Validation("city must be 2-128 characters".into()));
    }
    Ok(())
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_by_name_ci<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).eq(name.trim().to_lowercase()))
        .one(conn)
        .await?)
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    name_contains: Option<&str>,
    active_only: Option<bool>,
    created_by: Option<Uuid>,
) -> Result<Vec<Model>, ModelError> {
    let mut query = Entity::find();
    if let Some(q) = name_contains {
        query = query.filter(Column::Name.contains(q.trim()));
    }
    if let Some(active) = active_only {
        query = query.filter(Column::IsActive.eq(active));
    }
    if let Some(uid) = created_by {
        query = query.filter(Column::CreatedBy.eq(uid));
    }
    Ok(query.order_by_desc(Column::CreatedAt).all(conn).await?)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    city: &str,
    image_url: Option<&str>,
    thumbnail_url: Option<&str>,
    created_by: Uuid,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    validate_city(city)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        city: Set(city.trim().to_string()),
        image_url: Set(image_url.map(str::to_string)),
        thumbnail_url: Set(thumbnail_url.map(str::to_string)),
        is_active: Set(true),
        created_by: Set(created_by),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(conn).await?)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    team: Model,
    name: Option<&str>,
    city: Option<&str>,
    image_url: Option<&str>,
    is_active: Option<bool>,
) -> Result<Model, ModelError> {
    let mut am: ActiveModel = team.into();
    if let Some(n) = name {
        validate_name(n)?;
        am.name = Set(n.trim().to_string());
    }
    if let Some(c) = city {
        validate_city(c)?;
        am.city = Set(c.trim().to_string());
    }
    if let Some(url) = image_url {
        am.image_url = Set(Some(url.to_string()));
    }
    if let Some(active) = is_active {
        am.is_active = Set(active);
    }
    Ok(am.update(conn).await?)
}
