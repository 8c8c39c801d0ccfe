use crate::entities::events;
use crate::error::{AppError, AppResult};
use crate::services::expect_single_row;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Set,
};

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
}

impl EventService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Idempotent get-or-create keyed by slug.
    ///
    /// Under concurrent calls with the same slug exactly one row is ever
    /// created; every caller receives the persisted row and never an error
    /// from the race itself.
    pub async fn ensure(&self, slug: &str) -> AppResult<events::Model> {
        let inserted = events::Entity::insert(events::ActiveModel {
            slug: Set(slug.to_owned()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(events::Column::Slug)
                .do_nothing()
                .to_owned(),
        )
        .exec_with_returning(&self.pool)
        .await;

        match inserted {
            Ok(model) => Ok(model),
            // Conflict: a prior or concurrent insert already created the row.
            // RETURNING only reports newly inserted rows, so fetch it.
            Err(DbErr::RecordNotInserted) => match self.get(slug).await {
                Err(AppError::NotFound(_)) => Err(AppError::DataIntegrityFault(format!(
                    "insert of event '{slug}' conflicted but no row can be found"
                ))),
                other => other,
            },
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, slug: &str) -> AppResult<events::Model> {
        let rows = events::Entity::find()
            .filter(events::Column::Slug.eq(slug))
            .limit(2)
            .all(&self.pool)
            .await?;

        expect_single_row(rows, &format!("events slug='{slug}'"))
    }
}
