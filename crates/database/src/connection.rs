use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// A connection handed out by this pool executes each statement in
/// implicit-commit mode; callers that need atomicity begin an explicit
/// transaction on it instead. The pool restores a connection's autocommit
/// state when the transaction is over, so sessions can be safely reused.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.db)
        .username(&settings.user)
        .password(&settings.pass);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(DbError::Connectivity)?;

    tracing::debug!(
        host = %settings.host,
        db = %settings.db,
        "Connected to the database."
    );

    Ok(pool)
}

/// A utility function to apply the embedded schema definition.
///
/// The integration tests use this to provision an empty database before
/// exercising the repositories.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
