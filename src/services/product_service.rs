use crate::entities::{events, products, tickets};
use crate::error::{AppError, AppResult};
use crate::models::ProductAvailability;
use crate::services::expect_single_row;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QuerySelect, Set, Statement,
    TransactionTrait,
};

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
}

impl ProductService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Idempotent get-or-create keyed by (event, slug), followed by ticket
    /// pool reconciliation, so a product's inventory is materialized before
    /// any reservation can target it.
    ///
    /// Quota is mutable only upward: re-ensuring an existing product with a
    /// larger quota raises it (and grows the pool); a smaller quota leaves
    /// the stored one untouched.
    pub async fn ensure(
        &self,
        event: &events::Model,
        slug: &str,
        quota: i64,
    ) -> AppResult<products::Model> {
        let inserted = products::Entity::insert(products::ActiveModel {
            event_id: Set(event.id),
            slug: Set(slug.to_owned()),
            quota: Set(quota),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([products::Column::EventId, products::Column::Slug])
                .do_nothing()
                .to_owned(),
        )
        .exec_with_returning(&self.pool)
        .await;

        let mut product = match inserted {
            Ok(model) => model,
            Err(DbErr::RecordNotInserted) => match self.get(event, slug).await {
                Ok(model) => model,
                Err(AppError::NotFound(_)) => {
                    return Err(AppError::DataIntegrityFault(format!(
                        "insert of product '{slug}' (event {}) conflicted but no row can be found",
                        event.id
                    )));
                }
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e.into()),
        };

        if quota > product.quota {
            let mut am = product.clone().into_active_model();
            am.quota = Set(quota);
            product = am.update(&self.pool).await?;
        }

        self.reconcile_tickets(&product, product.quota).await?;

        Ok(product)
    }

    pub async fn get(&self, event: &events::Model, slug: &str) -> AppResult<products::Model> {
        let rows = products::Entity::find()
            .filter(products::Column::EventId.eq(event.id))
            .filter(products::Column::Slug.eq(slug))
            .limit(2)
            .all(&self.pool)
            .await?;

        expect_single_row(
            rows,
            &format!("products event_id={} slug='{slug}'", event.id),
        )
    }

    /// Grow the product's ticket pool to `target_quota`.
    ///
    /// A pool already at the target is a no-op. A pool larger than the target
    /// fails with [`AppError::UnsupportedShrink`]: deleting tickets (and
    /// deciding which possibly-claimed rows to drop) is not implemented.
    pub async fn reconcile_tickets(
        &self,
        product: &products::Model,
        target_quota: i64,
    ) -> AppResult<()> {
        let count = tickets::Entity::find()
            .filter(tickets::Column::ProductId.eq(product.id))
            .count(&self.pool)
            .await? as i64;

        if count == target_quota {
            return Ok(());
        }

        if count > target_quota {
            return Err(AppError::UnsupportedShrink {
                current: count,
                target: target_quota,
            });
        }

        let missing = target_quota - count;
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "INSERT INTO tickets (product_id) SELECT $1 FROM generate_series(1, $2) AS _",
            [product.id.into(), missing.into()],
        );
        self.pool.execute(stmt).await?;

        log::info!(
            "Created {missing} tickets for product {} '{}'",
            product.id,
            product.slug
        );

        Ok(())
    }

    /// Availability probe over every product of the event.
    ///
    /// Each product is available iff one of its free tickets can be locked
    /// with SKIP LOCKED right now; tickets held by another open transaction
    /// count as unavailable without being waited on. The probe runs in its
    /// own transaction which is rolled back, so the tentative locks are
    /// released and no state change can escape on any exit path.
    pub async fn availability(
        &self,
        event: &events::Model,
    ) -> AppResult<Vec<ProductAvailability>> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            SELECT
                id,
                slug,
                quota,
                created_at,
                (
                    SELECT id
                    FROM tickets
                    WHERE product_id = products.id AND order_id IS NULL
                    LIMIT 1
                    FOR UPDATE
                    SKIP LOCKED
                ) IS NOT NULL AS available
            FROM products
            WHERE event_id = $1
            ORDER BY id
            "#,
            [event.id.into()],
        );

        let txn = self.pool.begin().await?;
        let rows = txn.query_all(stmt).await;
        txn.rollback().await?;

        rows?
            .into_iter()
            .map(|row| {
                Ok(ProductAvailability {
                    product: products::Model {
                        id: row.try_get("", "id")?,
                        event_id: event.id,
                        slug: row.try_get("", "slug")?,
                        quota: row.try_get("", "quota")?,
                        created_at: row.try_get("", "created_at")?,
                    },
                    available: row.try_get("", "available")?,
                })
            })
            .collect()
    }
}
