use crate::entities::{orders, products, tickets};
use crate::error::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Statement,
};

#[derive(Clone)]
pub struct TicketService {
    pool: DatabaseConnection,
}

impl TicketService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Claim exactly `quantity` free tickets of `product` for `order`.
    ///
    /// Must run inside a transaction the caller has begun; `conn` is that
    /// transaction. Locking and assignment happen in one statement: free
    /// tickets currently locked by another open transaction are skipped
    /// rather than waited on, so competing reservations proceed immediately
    /// against the remaining pool. Which rows are claimed among the eligible
    /// set is arbitrary.
    ///
    /// If fewer than `quantity` rows could be claimed the call fails with
    /// [`AppError::NotEnoughTickets`] and the caller must roll back so the
    /// partial claim never becomes visible.
    pub async fn reserve<C: ConnectionTrait>(
        &self,
        conn: &C,
        order: &orders::Model,
        product: &products::Model,
        quantity: u64,
    ) -> AppResult<Vec<tickets::Model>> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            WITH reserved AS (
                SELECT id
                FROM tickets
                WHERE product_id = $1 AND order_id IS NULL
                LIMIT $2
                FOR UPDATE
                SKIP LOCKED
            )
            UPDATE tickets
            SET order_id = $3
            FROM reserved
            WHERE tickets.id = reserved.id
            RETURNING tickets.id
            "#,
            [
                product.id.into(),
                (quantity as i64).into(),
                order.id.into(),
            ],
        );

        let rows = conn.query_all(stmt).await?;

        if (rows.len() as u64) < quantity {
            log::debug!(
                "Reservation for order {} on product {} fell short: {}/{quantity}",
                order.id,
                product.id,
                rows.len()
            );
            return Err(AppError::NotEnoughTickets {
                requested: quantity,
                reserved: rows.len() as u64,
            });
        }

        rows.into_iter()
            .map(|row| {
                Ok(tickets::Model {
                    id: row.try_get("", "id")?,
                    product_id: product.id,
                    order_id: Some(order.id),
                })
            })
            .collect()
    }

    /// Non-locking count of free tickets for a product.
    pub async fn count_free(&self, product: &products::Model) -> AppResult<u64> {
        let count = tickets::Entity::find()
            .filter(tickets::Column::ProductId.eq(product.id))
            .filter(tickets::Column::OrderId.is_null())
            .count(&self.pool)
            .await?;

        Ok(count)
    }
}
