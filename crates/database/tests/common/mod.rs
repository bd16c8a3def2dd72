//! Shared helpers for the live-database tests.
//!
//! The tests expect a reachable PostgreSQL instance described by the usual
//! `PG_*` environment variables (the configuration defaults point at a
//! local server) and provision the schema on first connect. Every test
//! works on its own ids and purges them up front, so the suite is
//! re-runnable and safe to run in parallel.

#![allow(dead_code)]

use configuration::load_database_settings;
use database::{connect, run_migrations};
use sqlx::PgPool;

pub async fn pool() -> PgPool {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let settings = load_database_settings().expect("database settings should load");
    let pool = connect(&settings)
        .await
        .expect("a PostgreSQL instance should be reachable");
    run_migrations(&pool).await.expect("schema should apply");
    pool
}

/// Removes any leftover customer rows (details first) for the given id.
pub async fn purge_customer(pool: &PgPool, id: i32) {
    sqlx::query("DELETE FROM detalle_cliente WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM cliente WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn purge_agent(pool: &PgPool, id: i32) {
    sqlx::query("DELETE FROM comercial WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn purge_courier(pool: &PgPool, id: i32) {
    sqlx::query("DELETE FROM repartidor WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}
