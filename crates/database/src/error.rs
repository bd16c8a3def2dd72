use thiserror::Error;

/// Errors carried out of the persistence layer.
///
/// "Not found" is deliberately not represented here: reads encode absence as
/// `Option::None` and writes encode it as a zero row count.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to acquire a database session: {0}")]
    Connectivity(#[source] sqlx::Error),

    #[error("A row with this primary key already exists: {0}")]
    DuplicateKey(String),

    #[error("Referential integrity violation: {0}")]
    Referential(String),

    #[error("Database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("Transaction rolled back: {source}")]
    Persistence {
        #[source]
        source: Box<DbError>,
    },

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Classifies a driver error raised by a write statement.
///
/// Unique-key violations and foreign-key violations get their own kinds so
/// callers can react to them; everything else is a plain query failure.
pub(crate) fn write_error(err: sqlx::Error) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DbError::DuplicateKey(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return DbError::Referential(db_err.message().to_string());
        }
    }
    DbError::Query(err)
}
