use serde::{Deserialize, Serialize};

/// Options for the file-based `SQLite` backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    /// Database file name or path.
    pub db_name: String,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            db_name: "db.sqlite3".to_string(),
        }
    }
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_name: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
        }
    }

    /// Start a fluent builder.
    #[must_use]
    pub fn builder() -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::default()
    }

    /// The connection string is the database file path verbatim.
    #[must_use]
    pub fn connection_string(&self) -> String {
        self.db_name.clone()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.db_name.is_empty()
    }

    /// First violated validation rule, or `None` if the options are valid.
    #[must_use]
    pub fn validation_error(&self) -> Option<String> {
        if self.db_name.is_empty() {
            return Some("Database name cannot be empty".to_string());
        }
        None
    }
}

/// Fluent builder for [`SqliteOptions`].
///
/// Setters are total; validation is deferred to
/// [`SqliteOptions::is_valid`] on the built value.
#[derive(Debug, Clone, Default)]
pub struct SqliteOptionsBuilder {
    db_name: Option<String>,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = Some(db_name.into());
        self
    }

    /// Build the options, falling back to the default file name when unset.
    #[must_use]
    pub fn build(self) -> SqliteOptions {
        match self.db_name {
            Some(db_name) => SqliteOptions { db_name },
            None => SqliteOptions::default(),
        }
    }
}
