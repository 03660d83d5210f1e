use thiserror::Error;

/// Errors produced by the connection layer.
///
/// Driver errors are wrapped transparently; everything else carries a plain
/// message. The public [`Connection`](crate::connection::Connection) surface
/// renders these into its `last_error()` string rather than returning them,
/// so only internal code and the backend adapters deal with this enum
/// directly.
#[derive(Debug, Error)]
pub enum SqlConduitError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] postgres::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MysqlError(#[from] mysql::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}
