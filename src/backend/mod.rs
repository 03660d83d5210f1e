// Driver adapters, one module per backend. Everything above this layer
// speaks RowValues/ResultSet; everything below is driver-specific.

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use crate::config::ConnOptions;
use crate::error::SqlConduitError;
use crate::results::ResultSet;
use crate::statement::PlaceholderStyle;
use crate::types::RowValues;

/// A live handle to one backend database.
///
/// Owned exclusively by an open [`Connection`](crate::connection::Connection);
/// dropping the handle releases the underlying driver resources.
pub enum BackendHandle {
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Connection),
    #[cfg(feature = "postgres")]
    Postgres(::postgres::Client),
    #[cfg(feature = "mysql")]
    Mysql(::mysql::Conn),
}

impl std::fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            #[cfg(feature = "sqlite")]
            BackendHandle::Sqlite(_) => "BackendHandle::Sqlite",
            #[cfg(feature = "postgres")]
            BackendHandle::Postgres(_) => "BackendHandle::Postgres",
            #[cfg(feature = "mysql")]
            BackendHandle::Mysql(_) => "BackendHandle::Mysql",
        })
    }
}

impl BackendHandle {
    /// Establish a connection for the held options variant.
    ///
    /// # Errors
    ///
    /// Returns the driver's connection error, or
    /// `SqlConduitError::Unimplemented` when the backend's feature is not
    /// compiled into this build.
    pub fn connect(options: &ConnOptions) -> Result<Self, SqlConduitError> {
        match options {
            #[cfg(feature = "sqlite")]
            ConnOptions::Sqlite(opts) => Ok(BackendHandle::Sqlite(self::sqlite::connect(opts)?)),
            #[cfg(feature = "postgres")]
            ConnOptions::Postgres(opts) => {
                Ok(BackendHandle::Postgres(self::postgres::connect(opts)?))
            }
            #[cfg(feature = "mysql")]
            ConnOptions::Mysql(opts) => Ok(BackendHandle::Mysql(self::mysql::connect(opts)?)),
            #[allow(unreachable_patterns)]
            other => Err(SqlConduitError::Unimplemented(format!(
                "support for the {} backend is not compiled into this build",
                other.driver_name()
            ))),
        }
    }

    /// Positional placeholder style this backend expects.
    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            #[cfg(feature = "sqlite")]
            BackendHandle::Sqlite(_) => PlaceholderStyle::SqliteNumbered,
            #[cfg(feature = "postgres")]
            BackendHandle::Postgres(_) => PlaceholderStyle::PostgresNumbered,
            #[cfg(feature = "mysql")]
            BackendHandle::Mysql(_) => PlaceholderStyle::Anonymous,
        }
    }

    /// Execute one or more statements without parameters or results.
    ///
    /// # Errors
    ///
    /// Returns the driver's execution error.
    pub fn execute_batch(&mut self, sql: &str) -> Result<(), SqlConduitError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendHandle::Sqlite(conn) => self::sqlite::execute_batch(conn, sql),
            #[cfg(feature = "postgres")]
            BackendHandle::Postgres(client) => self::postgres::execute_batch(client, sql),
            #[cfg(feature = "mysql")]
            BackendHandle::Mysql(conn) => self::mysql::execute_batch(conn, sql),
        }
    }

    /// Execute a single statement with positional parameters and materialize
    /// any rows it produces. DML statements run fine through this path; they
    /// simply produce no rows.
    ///
    /// # Errors
    ///
    /// Returns the driver's prepare/execution error.
    pub fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlConduitError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendHandle::Sqlite(conn) => self::sqlite::query(conn, sql, params),
            #[cfg(feature = "postgres")]
            BackendHandle::Postgres(client) => self::postgres::query(client, sql, params),
            #[cfg(feature = "mysql")]
            BackendHandle::Mysql(conn) => self::mysql::query(conn, sql, params),
        }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns the driver's execution error.
    pub fn begin(&mut self) -> Result<(), SqlConduitError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendHandle::Sqlite(conn) => self::sqlite::execute_batch(conn, "BEGIN"),
            #[cfg(feature = "postgres")]
            BackendHandle::Postgres(client) => self::postgres::execute_batch(client, "BEGIN"),
            #[cfg(feature = "mysql")]
            BackendHandle::Mysql(conn) => self::mysql::execute_batch(conn, "START TRANSACTION"),
        }
    }

    /// Commit the current transaction.
    ///
    /// # Errors
    ///
    /// Returns the driver's execution error.
    pub fn commit(&mut self) -> Result<(), SqlConduitError> {
        self.execute_batch("COMMIT")
    }

    /// Roll back the current transaction.
    ///
    /// # Errors
    ///
    /// Returns the driver's execution error.
    pub fn rollback(&mut self) -> Result<(), SqlConduitError> {
        self.execute_batch("ROLLBACK")
    }

    /// Probe the connection with `SELECT 1`.
    ///
    /// # Errors
    ///
    /// Returns the driver's execution error.
    pub fn ping(&mut self) -> Result<(), SqlConduitError> {
        self.execute_batch("SELECT 1")
    }

    /// List the user tables visible on this connection.
    ///
    /// # Errors
    ///
    /// Returns the driver's execution error.
    pub fn tables(&mut self) -> Result<Vec<String>, SqlConduitError> {
        match self {
            #[cfg(feature = "sqlite")]
            BackendHandle::Sqlite(conn) => self::sqlite::tables(conn),
            #[cfg(feature = "postgres")]
            BackendHandle::Postgres(client) => self::postgres::tables(client),
            #[cfg(feature = "mysql")]
            BackendHandle::Mysql(conn) => self::mysql::tables(conn),
        }
    }
}
