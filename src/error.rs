//! Custom error types for menu-maint

use thiserror::Error;

/// Main error type for menu maintenance operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Foreign key, unique, or check violation reported by the database
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Price conversion error: {0}")]
    Price(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Already initialized at {0}")]
    AlreadyInitialized(String),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_foreign_key_violation() || db.is_unique_violation() || db.is_check_violation()
            {
                return Error::Constraint(db.message().to_string());
            }
        }
        Error::Database(err)
    }
}

/// Result type alias for menu-maint
pub type Result<T> = std::result::Result<T, Error>;
