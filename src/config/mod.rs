// Connection configuration: one options type per backend plus the closed
// union over all three.

mod server;
mod sqlite;

pub use server::{
    MysqlKind, MysqlOptions, PostgresKind, PostgresOptions, ServerKind, ServerOptions,
    ServerOptionsBuilder,
};
pub use sqlite::{SqliteOptions, SqliteOptionsBuilder};

use serde::{Deserialize, Serialize};

use crate::types::Driver;

/// Connection options for exactly one backend.
///
/// The held variant is chosen at construction and never mutated afterward;
/// replace the whole value to change backends. Driver kind, driver name,
/// validation, and the connection string are all pure functions of the held
/// variant, each dispatched through a single exhaustive `match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "lowercase")]
pub enum ConnOptions {
    /// File-based `SQLite` options
    Sqlite(SqliteOptions),
    /// `PostgreSQL` client/server options
    Postgres(PostgresOptions),
    /// `MySQL`/MariaDB client/server options
    Mysql(MysqlOptions),
}

impl Default for ConnOptions {
    fn default() -> Self {
        ConnOptions::Sqlite(SqliteOptions::default())
    }
}

impl From<SqliteOptions> for ConnOptions {
    fn from(opts: SqliteOptions) -> Self {
        ConnOptions::Sqlite(opts)
    }
}

impl From<PostgresOptions> for ConnOptions {
    fn from(opts: PostgresOptions) -> Self {
        ConnOptions::Postgres(opts)
    }
}

impl From<MysqlOptions> for ConnOptions {
    fn from(opts: MysqlOptions) -> Self {
        ConnOptions::Mysql(opts)
    }
}

impl ConnOptions {
    /// The driver kind, derived from the held variant.
    #[must_use]
    pub fn driver(&self) -> Driver {
        match self {
            ConnOptions::Sqlite(_) => Driver::Sqlite,
            ConnOptions::Postgres(_) => Driver::Postgres,
            ConnOptions::Mysql(_) => Driver::Mysql,
        }
    }

    /// Fixed driver identifier string for the held variant.
    #[must_use]
    pub fn driver_name(&self) -> &'static str {
        self.driver().driver_name()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            ConnOptions::Sqlite(opts) => opts.is_valid(),
            ConnOptions::Postgres(opts) => opts.is_valid(),
            ConnOptions::Mysql(opts) => opts.is_valid(),
        }
    }

    /// First violated validation rule of the held variant, or `None`.
    #[must_use]
    pub fn validation_error(&self) -> Option<String> {
        match self {
            ConnOptions::Sqlite(opts) => opts.validation_error(),
            ConnOptions::Postgres(opts) => opts.validation_error(),
            ConnOptions::Mysql(opts) => opts.validation_error(),
        }
    }

    /// Connection string rendered by the held variant.
    #[must_use]
    pub fn connection_string(&self) -> String {
        match self {
            ConnOptions::Sqlite(opts) => opts.connection_string(),
            ConnOptions::Postgres(opts) => opts.connection_string(),
            ConnOptions::Mysql(opts) => opts.connection_string(),
        }
    }

    #[must_use]
    pub fn is_sqlite(&self) -> bool {
        matches!(self, ConnOptions::Sqlite(_))
    }

    #[must_use]
    pub fn is_postgres(&self) -> bool {
        matches!(self, ConnOptions::Postgres(_))
    }

    #[must_use]
    pub fn is_mysql(&self) -> bool {
        matches!(self, ConnOptions::Mysql(_))
    }

    /// The held `SQLite` options, if that is the current variant.
    #[must_use]
    pub fn as_sqlite(&self) -> Option<&SqliteOptions> {
        if let ConnOptions::Sqlite(opts) = self {
            Some(opts)
        } else {
            None
        }
    }

    /// The held `PostgreSQL` options, if that is the current variant.
    #[must_use]
    pub fn as_postgres(&self) -> Option<&PostgresOptions> {
        if let ConnOptions::Postgres(opts) = self {
            Some(opts)
        } else {
            None
        }
    }

    /// The held `MySQL` options, if that is the current variant.
    #[must_use]
    pub fn as_mysql(&self) -> Option<&MysqlOptions> {
        if let ConnOptions::Mysql(opts) = self {
            Some(opts)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ConnOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConnOptions({}, valid={})",
            self.driver_name(),
            self.is_valid()
        )
    }
}
