//! Postgres persistence for the cabinet backend.
//!
//! `models` holds the `FromRow` row structs and DTOs, `repositories` the
//! zero-sized repos taking `&PgPool`, and `value_store` the Postgres-backed
//! [`cabinet_core::form::FormValueStore`].

pub mod models;
pub mod repositories;
pub mod value_store;

use sqlx::postgres::PgPoolOptions;

pub use value_store::PgFormValueStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
