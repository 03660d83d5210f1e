use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::types::Driver;

mod sealed {
    pub trait Sealed {}
}

/// Marker trait distinguishing the two client/server backends.
///
/// Sealed: the set of server kinds is closed, like the variant set of
/// [`ConnOptions`](super::ConnOptions) itself.
pub trait ServerKind:
    sealed::Sealed + std::fmt::Debug + Clone + Copy + PartialEq + Eq + 'static
{
    /// Which driver this kind maps to.
    const DRIVER: Driver;
    /// Default port used when the builder leaves the port unset.
    const DEFAULT_PORT: u32;
}

/// Marker for `PostgreSQL` server options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostgresKind;

/// Marker for `MySQL`/MariaDB server options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MysqlKind;

impl sealed::Sealed for PostgresKind {}
impl sealed::Sealed for MysqlKind {}

impl ServerKind for PostgresKind {
    const DRIVER: Driver = Driver::Postgres;
    const DEFAULT_PORT: u32 = 5432;
}

impl ServerKind for MysqlKind {
    const DRIVER: Driver = Driver::Mysql;
    const DEFAULT_PORT: u32 = 3306;
}

/// Options for a client/server backend.
///
/// `PostgreSQL` and `MySQL` share this shape; the kind parameter only picks
/// the default port and driver identifier. The port is kept as `u32` so that
/// out-of-range values survive until [`validation_error`] instead of being
/// rejected at construction.
///
/// [`validation_error`]: ServerOptions::validation_error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ServerOptions<K: ServerKind> {
    pub database: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u32,
    #[serde(skip)]
    _kind: PhantomData<K>,
}

/// Options for the `PostgreSQL` backend (default port 5432).
pub type PostgresOptions = ServerOptions<PostgresKind>;

/// Options for the `MySQL` backend (default port 3306).
pub type MysqlOptions = ServerOptions<MysqlKind>;

impl<K: ServerKind> Default for ServerOptions<K> {
    fn default() -> Self {
        Self {
            database: String::new(),
            user: String::new(),
            password: String::new(),
            host: "127.0.0.1".to_string(),
            port: K::DEFAULT_PORT,
            _kind: PhantomData,
        }
    }
}

impl<K: ServerKind> ServerOptions<K> {
    pub fn new(
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: u32,
    ) -> Self {
        Self {
            database: database.into(),
            user: user.into(),
            password: password.into(),
            host: host.into(),
            port,
            _kind: PhantomData,
        }
    }

    /// Start a fluent builder.
    #[must_use]
    pub fn builder() -> ServerOptionsBuilder<K> {
        ServerOptionsBuilder::default()
    }

    /// Default port for this server kind (5432 or 3306).
    #[must_use]
    pub fn default_port() -> u32 {
        K::DEFAULT_PORT
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.port == 0 || self.port > 65535 {
            return false;
        }
        !self.database.is_empty() && !self.user.is_empty() && !self.host.is_empty()
    }

    /// First violated validation rule, or `None` if the options are valid.
    ///
    /// Required-field checks run before the port range check, in a fixed
    /// order: database, user, host, port.
    #[must_use]
    pub fn validation_error(&self) -> Option<String> {
        if self.database.is_empty() {
            return Some("Database name cannot be empty".to_string());
        }
        if self.user.is_empty() {
            return Some("User cannot be empty".to_string());
        }
        if self.host.is_empty() {
            return Some("Host cannot be empty".to_string());
        }
        if self.port == 0 || self.port > 65535 {
            return Some("Port must be between 1 and 65535".to_string());
        }
        None
    }

    /// Render the connection string for the driver.
    ///
    /// All five fields are always present, in fixed order, even when some
    /// are empty strings.
    #[must_use]
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }
}

/// Fluent builder for [`ServerOptions`].
///
/// Setters accept any value; nothing is validated until the built options
/// are asked. Unset host and port fall back to `"127.0.0.1"` and the kind's
/// default port.
#[derive(Debug, Clone)]
pub struct ServerOptionsBuilder<K: ServerKind> {
    database: String,
    user: String,
    password: String,
    host: Option<String>,
    port: Option<u32>,
    _kind: PhantomData<K>,
}

impl<K: ServerKind> Default for ServerOptionsBuilder<K> {
    fn default() -> Self {
        Self {
            database: String::new(),
            user: String::new(),
            password: String::new(),
            host: None,
            port: None,
            _kind: PhantomData,
        }
    }
}

impl<K: ServerKind> ServerOptionsBuilder<K> {
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u32) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn build(self) -> ServerOptions<K> {
        ServerOptions {
            database: self.database,
            user: self.user,
            password: self.password,
            host: self.host.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: self.port.unwrap_or(K::DEFAULT_PORT),
            _kind: PhantomData,
        }
    }
}
