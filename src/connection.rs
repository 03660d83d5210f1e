use uuid::Uuid;

use crate::backend::BackendHandle;
use crate::config::ConnOptions;
use crate::error::SqlConduitError;
use crate::registry::ConnectionRegistry;
use crate::results::ResultSet;
use crate::statement::PlaceholderStyle;
use crate::types::RowValues;

/// A connection to one database backend.
///
/// Construction does not touch the backend; call [`open`](Connection::open)
/// to connect. While open, the connection exclusively owns its backend
/// handle and holds its identity in the process-wide
/// [`ConnectionRegistry`]; closing (explicitly or on drop) releases both.
///
/// Failures are returned, never panicked: every operation reports success
/// through its return value and leaves detail in
/// [`last_error`](Connection::last_error).
///
/// Not `Clone` — a copy would mean two owners of one identity and handle.
/// Moving transfers ownership as usual; drop of the final owner closes.
///
/// A connection is meant to be driven by a single thread of control;
/// nothing here is synchronized except the registry.
///
/// ```no_run
/// use sql_conduit::prelude::*;
///
/// let mut conn = Connection::new(SqliteOptions::new("app.db"));
/// if !conn.open() {
///     eprintln!("{}", conn.last_error());
/// }
/// ```
#[derive(Debug)]
pub struct Connection {
    options: ConnOptions,
    name: String,
    handle: Option<BackendHandle>,
    is_open: bool,
    // True only while this instance holds the registry entry for `name`;
    // a failed open against an already-claimed name must not release the
    // owner's entry on close.
    registered: bool,
    last_error: String,
}

impl Connection {
    /// Create a closed connection with a generated identity.
    #[must_use]
    pub fn new(options: impl Into<ConnOptions>) -> Self {
        Self::with_name(options, String::new())
    }

    /// Create a closed connection with a caller-supplied identity.
    ///
    /// An empty name falls back to a generated one.
    #[must_use]
    pub fn with_name(options: impl Into<ConnOptions>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            options: options.into(),
            name: if name.is_empty() {
                Self::generate_name()
            } else {
                name
            },
            handle: None,
            is_open: false,
            registered: false,
            last_error: String::new(),
        }
    }

    fn generate_name() -> String {
        format!("conn_{}", Uuid::new_v4())
    }

    /// Open the connection using the configured options.
    ///
    /// Idempotent when already open. Fails without touching the registry if
    /// the options are invalid; fails and rolls the registry entry back if
    /// the backend refuses the connection. Returns `true` on success; on
    /// failure consult [`last_error`](Connection::last_error).
    pub fn open(&mut self) -> bool {
        if self.is_open {
            return true;
        }

        if let Some(error) = self.options.validation_error() {
            self.last_error = error;
            return false;
        }

        let registry = ConnectionRegistry::global();
        if let Err(err) = registry.register(&self.name, self.options.driver()) {
            self.last_error = err.to_string();
            return false;
        }
        self.registered = true;

        match BackendHandle::connect(&self.options) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.is_open = true;
                self.last_error.clear();
                tracing::debug!(name = %self.name, driver = %self.options.driver_name(), "connection opened");
                true
            }
            Err(err) => {
                self.last_error = format!("Failed to open database: {err}");
                registry.deregister(&self.name);
                self.registered = false;
                false
            }
        }
    }

    /// Close the connection and release its backend handle.
    ///
    /// Idempotent, and safe to call on a never-opened connection. Only the
    /// instance that claimed the registry entry releases it, so a
    /// connection whose open lost the identity race cannot evict the
    /// winner's entry when it goes away.
    pub fn close(&mut self) {
        if self.is_open {
            self.handle = None;
            self.is_open = false;
            tracing::debug!(name = %self.name, "connection closed");
        }
        if self.registered {
            ConnectionRegistry::global().deregister(&self.name);
            self.registered = false;
        }
    }

    /// Whether the connection is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open && self.handle.is_some()
    }

    /// The last error message, or an empty string if the most recent
    /// operation succeeded.
    #[must_use]
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// The unique identity of this connection.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The options this connection was built from.
    #[must_use]
    pub fn options(&self) -> &ConnOptions {
        &self.options
    }

    fn open_handle(&mut self, denied: &str) -> Option<&mut BackendHandle> {
        if self.is_open && self.handle.is_some() {
            self.handle.as_mut()
        } else {
            self.last_error = format!("{denied}: connection is not open");
            None
        }
    }

    fn record<T>(&mut self, result: Result<T, SqlConduitError>, failure: &str) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error.clear();
                Some(value)
            }
            Err(err) => {
                self.last_error = format!("{failure}: {err}");
                None
            }
        }
    }

    /// Execute a statement that returns no results (DDL, INSERT, UPDATE...).
    ///
    /// Returns `false` without contacting the backend when the connection
    /// is not open.
    pub fn execute(&mut self, statement: &str) -> bool {
        let result = match self.open_handle("Cannot execute statement") {
            Some(handle) => handle.execute_batch(statement),
            None => return false,
        };
        self.record(result, "Statement execution failed").is_some()
    }

    /// Execute a statement and materialize its rows.
    ///
    /// Returns `None` on failure; when the connection is not open no
    /// backend call is made.
    pub fn execute_query(&mut self, statement: &str) -> Option<ResultSet> {
        let result = match self.open_handle("Cannot execute query") {
            Some(handle) => handle.query(statement, &[]),
            None => return None,
        };
        self.record(result, "Query execution failed")
    }

    /// Begin a transaction.
    pub fn begin_transaction(&mut self) -> bool {
        let result = match self.open_handle("Cannot begin transaction") {
            Some(handle) => handle.begin(),
            None => return false,
        };
        self.record(result, "Failed to begin transaction").is_some()
    }

    /// Commit the current transaction.
    pub fn commit(&mut self) -> bool {
        let result = match self.open_handle("Cannot commit") {
            Some(handle) => handle.commit(),
            None => return false,
        };
        self.record(result, "Failed to commit transaction").is_some()
    }

    /// Roll back the current transaction.
    pub fn rollback(&mut self) -> bool {
        let result = match self.open_handle("Cannot rollback") {
            Some(handle) => handle.rollback(),
            None => return false,
        };
        self.record(result, "Failed to rollback transaction").is_some()
    }

    /// Probe the backend with a trivial query.
    pub fn test_connection(&mut self) -> bool {
        let result = match self.open_handle("Cannot test connection") {
            Some(handle) => handle.ping(),
            None => return false,
        };
        self.record(result, "Connection test failed").is_some()
    }

    /// List the user tables visible on this connection.
    ///
    /// Returns an empty list when the connection is closed or the backend
    /// call fails; this accessor never reports an error.
    pub fn tables(&mut self) -> Vec<String> {
        if !self.is_open() {
            return Vec::new();
        }
        self.handle
            .as_mut()
            .and_then(|handle| handle.tables().ok())
            .unwrap_or_default()
    }

    pub(crate) fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        if self.is_open {
            self.handle.as_ref().map(BackendHandle::placeholder_style)
        } else {
            None
        }
    }

    pub(crate) fn query_with_params(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlConduitError> {
        if !self.is_open {
            return Err(SqlConduitError::ConnectionError(
                "connection is not open".to_string(),
            ));
        }
        let handle = self.handle.as_mut().ok_or_else(|| {
            SqlConduitError::ConnectionError("connection is not open".to_string())
        })?;
        handle.query(sql, params)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
