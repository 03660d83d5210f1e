//! Synchronous multi-backend database connection layer.
//!
//! One configuration model covers three backends — file-based `SQLite` and
//! client/server `PostgreSQL` and `MySQL` — behind a closed
//! [`ConnOptions`](config::ConnOptions) union. A [`Connection`] owns one
//! live backend handle with an explicit open/close lifecycle and a
//! process-wide unique identity, [`TransactionGuard`] provides
//! commit-or-rollback scoping, and [`Query`] separates a statement template
//! from its named parameter bindings.
//!
//! Everything here is blocking and single-owner: no pools, no async, no
//! result caching. Callers check boolean/optional results and consult
//! [`Connection::last_error`] for detail; this layer never panics on
//! backend failure.
//!
//! ```no_run
//! use sql_conduit::prelude::*;
//!
//! let options = SqliteOptions::new("app.db");
//! let mut conn = Connection::new(options);
//! assert!(conn.open());
//! conn.execute("CREATE TABLE IF NOT EXISTS t (id INTEGER)");
//!
//! {
//!     let mut tx = TransactionGuard::new(&mut conn);
//!     tx.connection().execute("INSERT INTO t VALUES (1)");
//!     tx.commit();
//! }
//! ```

pub mod backend;
pub mod config;
pub mod connection;
pub mod error;
pub mod guard;
pub mod prelude;
pub mod query;
pub mod registry;
pub mod results;
pub mod statement;
pub mod types;

pub use config::ConnOptions;
pub use connection::Connection;
pub use error::SqlConduitError;
pub use guard::TransactionGuard;
pub use query::Query;
pub use results::ResultSet;
pub use types::{Driver, RowValues};
