//! Convenient imports for common functionality.
//!
//! ```rust
//! use sql_conduit::prelude::*;
//! ```

pub use crate::config::{
    ConnOptions, MysqlOptions, PostgresOptions, ServerKind, ServerOptions, SqliteOptions,
};
pub use crate::connection::Connection;
pub use crate::error::SqlConduitError;
pub use crate::guard::TransactionGuard;
pub use crate::query::Query;
pub use crate::registry::ConnectionRegistry;
pub use crate::results::{DbRow, ResultSet};
pub use crate::types::{Driver, RowValues};
