use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A sellable item type. `quota` is the target size of its ticket pool; the
/// number of ticket rows is driven toward it and never past it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub slug: String,
    pub quota: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
