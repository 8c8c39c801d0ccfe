mod common;

use boxoffice_backend::AppError;
use boxoffice_backend::entities::{events, tickets};
use boxoffice_backend::services::{EventService, ProductService};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

/// Concurrent ensure calls for one slug create exactly one row, and every
/// caller gets the same id.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ensure_event_is_idempotent_under_races() {
    let Some(pool) = common::setup("boxoffice_ensure").await else {
        return;
    };

    let events_service = EventService::new(pool.clone());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let events_service = events_service.clone();
        handles.push(tokio::spawn(
            async move { events_service.ensure("race-event").await },
        ));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    assert!(ids.iter().all(|&id| id == ids[0]));

    let row_count = events::Entity::find()
        .filter(events::Column::Slug.eq("race-event"))
        .count(&pool)
        .await
        .unwrap();
    assert_eq!(row_count, 1);
}

/// Re-ensuring a product with a larger quota grows the pool to exactly the
/// new quota; a smaller quota neither shrinks nor fails; an explicit
/// reconcile below the pool size is refused.
#[tokio::test]
async fn quota_is_mutable_only_upward() {
    let Some(pool) = common::setup("boxoffice_quota").await else {
        return;
    };

    let events_service = EventService::new(pool.clone());
    let products = ProductService::new(pool.clone());

    let event = events_service.ensure("test-event").await.unwrap();

    let product = products.ensure(&event, "ga", 10).await.unwrap();
    assert_eq!(product.quota, 10);
    assert_eq!(ticket_count(&pool, product.id).await, 10);

    let product = products.ensure(&event, "ga", 15).await.unwrap();
    assert_eq!(product.quota, 15);
    assert_eq!(ticket_count(&pool, product.id).await, 15);

    let product = products.ensure(&event, "ga", 12).await.unwrap();
    assert_eq!(product.quota, 15);
    assert_eq!(ticket_count(&pool, product.id).await, 15);

    let err = products
        .reconcile_tickets(&product, 5)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::UnsupportedShrink {
            current: 15,
            target: 5
        }
    ));
    assert_eq!(ticket_count(&pool, product.id).await, 15);
}

/// Looking up an entity that was never created is a recoverable NotFound.
#[tokio::test]
async fn get_unknown_event_is_not_found() {
    let Some(pool) = common::setup("boxoffice_notfound").await else {
        return;
    };

    let events_service = EventService::new(pool.clone());
    let err = events_service.get("no-such-event").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.is_recoverable());
}

async fn ticket_count(pool: &sea_orm::DatabaseConnection, product_id: i64) -> u64 {
    tickets::Entity::find()
        .filter(tickets::Column::ProductId.eq(product_id))
        .count(pool)
        .await
        .unwrap()
}
