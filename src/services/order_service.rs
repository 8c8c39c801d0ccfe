use crate::entities::{events, orders};
use crate::error::AppResult;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Orders have no natural key; every call inserts a fresh row.
    pub async fn create(&self, event: &events::Model) -> AppResult<orders::Model> {
        let order = orders::ActiveModel {
            event_id: Set(event.id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(order)
    }
}
