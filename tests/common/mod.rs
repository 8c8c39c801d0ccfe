use boxoffice_backend::config::DatabaseConfig;
use boxoffice_backend::database::{DbPool, create_pool, run_migrations};
use sea_orm::ConnectionTrait;

/// Connects to `TEST_DATABASE_URL` and provisions a fresh schema for the
/// calling test, so concurrently running test binaries cannot interfere.
/// Returns `None` (the test skips) when no database is configured.
pub async fn setup(schema: &str) -> Option<DbPool> {
    let _ = env_logger::builder().is_test(true).try_init();

    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let config = DatabaseConfig {
        url,
        max_connections: 50,
        schema: Some(schema.to_string()),
    };

    let pool = create_pool(&config)
        .await
        .expect("failed to connect to test database");

    pool.execute_unprepared(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
        .await
        .expect("failed to drop test schema");
    pool.execute_unprepared(&format!("CREATE SCHEMA {schema}"))
        .await
        .expect("failed to create test schema");

    run_migrations(&pool).await.expect("migrations failed");

    Some(pool)
}
