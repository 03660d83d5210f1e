use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row or bound as query parameters.
///
/// One enum shared by every backend, so callers never branch on driver types:
/// ```rust
/// use sql_conduit::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Boolean view. Backends without a native boolean type hand booleans
    /// back as 0/1 integers; those coerce here.
    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    /// Timestamp view. Text cells are parsed with the same layouts the
    /// `SQLite` adapter writes, with or without a fractional part.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

/// The database backends supported by this crate.
///
/// Which variant a connection uses is derived from its [`ConnOptions`], never
/// stored separately.
///
/// [`ConnOptions`]: crate::config::ConnOptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// `SQLite`, file-based
    Sqlite,
    /// `PostgreSQL` client/server
    Postgres,
    /// `MySQL`/MariaDB client/server
    Mysql,
}

impl Driver {
    /// Fixed driver identifier string, one per backend.
    #[must_use]
    pub fn driver_name(self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite",
            Driver::Postgres => "postgres",
            Driver::Mysql => "mysql",
        }
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.driver_name())
    }
}
