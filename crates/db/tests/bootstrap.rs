//! Schema creation, reset and raw SQL execution.

mod common;

use mosaify_db::schema;
use sqlx::PgPool;

use common::{new_user, seed_project, store};

#[sqlx::test]
async fn test_reset_creates_all_tables_empty(pool: PgPool) {
    let mut store = store(&pool).await;

    store.create_tables(true).await.unwrap();
    let counts = store.table_row_counts().await.unwrap();
    let names: Vec<&str> = counts.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, schema::table_names().collect::<Vec<_>>());
    assert!(counts.iter().all(|(_, count)| *count == 0));

    // A second reset drops and recreates, again with zero rows.
    seed_project(&mut store).await;
    store.create_tables(true).await.unwrap();
    let counts = store.table_row_counts().await.unwrap();
    assert_eq!(counts.len(), 6);
    assert!(counts.iter().all(|(_, count)| *count == 0), "{counts:?}");
}

#[sqlx::test]
async fn test_create_without_reset_is_idempotent(pool: PgPool) {
    let mut store = store(&pool).await;
    let user_id = store.create_user(&new_user("keep@example.com")).await.unwrap();

    store.create_tables(false).await.unwrap();

    let user = store.read_user(user_id).await.unwrap();
    assert_eq!(user.email, "keep@example.com");
}

#[sqlx::test]
async fn test_reset_restarts_identity(pool: PgPool) {
    let mut store = store(&pool).await;
    store.create_user(&new_user("one@example.com")).await.unwrap();
    store.create_user(&new_user("two@example.com")).await.unwrap();

    store.reset().await.unwrap();

    let id = store.create_user(&new_user("fresh@example.com")).await.unwrap();
    assert_eq!(id, 1);
}

#[sqlx::test]
async fn test_reset_tolerates_missing_tables(pool: PgPool) {
    let mut store = store(&pool).await;
    store
        .execute_raw("DROP TABLE mosaic_maps; DROP TABLE images_roi")
        .await
        .unwrap();

    store.reset().await.unwrap();

    assert_eq!(store.table_row_counts().await.unwrap().len(), 6);
}

#[sqlx::test]
async fn test_execute_raw_reports_statement_failure(pool: PgPool) {
    let mut store = store(&pool).await;

    let err = store.execute_raw("CREATE TABLE").await.unwrap_err();

    assert_eq!(err.kind(), mosaify_db::ErrorKind::QueryFailed);
    assert!(err.to_string().contains("Execute SQL"), "{err}");
}

#[sqlx::test]
async fn test_health_check(pool: PgPool) {
    let mut store = store(&pool).await;
    store.health_check().await.unwrap();
}

/// Every id and foreign key column is INT4, matching `DbId`.
#[sqlx::test]
async fn test_key_columns_are_integer(pool: PgPool) {
    let _store = store(&pool).await;
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT table_name::text, column_name::text, data_type::text
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND (column_name = 'id' OR column_name LIKE '%_id')
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, column, data_type) in &rows {
        assert_eq!(data_type, "integer", "{table}.{column}");
    }
}
