use serde::Deserialize;

/// Connection parameters for the PostgreSQL store.
///
/// Loaded from the environment with the `PG_` prefix; every field has a
/// default, so an empty environment still yields a usable local
/// configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Host name of the database server (`PG_HOST`).
    pub host: String,
    /// TCP port of the database server (`PG_PORT`).
    pub port: u16,
    /// Database name (`PG_DB`).
    pub db: String,
    /// Login role (`PG_USER`).
    pub user: String,
    /// Login password (`PG_PASS`).
    pub pass: String,
}
