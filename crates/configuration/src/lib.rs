use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::DatabaseSettings;

/// Loads the database settings from the environment.
///
/// This function is the primary entry point for this crate. A local `.env`
/// file is honoured when present, then the `PG_*` variables are read on top
/// of the built-in defaults and deserialized into our strongly-typed
/// `DatabaseSettings` struct.
pub fn load_database_settings() -> Result<DatabaseSettings, ConfigError> {
    // A missing .env file is not an error; the defaults below apply.
    dotenvy::dotenv().ok();

    settings_from_source(config::Environment::with_prefix("PG"))
}

fn settings_from_source(source: config::Environment) -> Result<DatabaseSettings, ConfigError> {
    let builder = config::Config::builder()
        .set_default("host", "localhost")?
        .set_default("port", "5432")?
        .set_default("db", "lampreaDB")?
        .set_default("user", "postgres")?
        .set_default("pass", "ThePowerFP")?
        .add_source(source)
        .build()?;

    let settings = builder.try_deserialize::<DatabaseSettings>()?;

    Ok(settings)
}
