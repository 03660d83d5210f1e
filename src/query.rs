use std::collections::HashMap;

use crate::connection::Connection;
use crate::error::SqlConduitError;
use crate::results::ResultSet;
use crate::statement::expand_named_placeholders;
use crate::types::RowValues;

/// A reusable statement template with named parameter bindings.
///
/// Parameters are referenced in the template as `:name` and bound with
/// [`bind_param`](Query::bind_param) in any order, any number of times —
/// the last write wins and nothing touches the backend until execution.
/// Execution expands the named placeholders into the backend's positional
/// style, runs the statement, and reports `(success, message)`.
///
/// ```no_run
/// use sql_conduit::prelude::*;
///
/// # fn demo(conn: &mut Connection) {
/// let mut query = Query::new(conn, "SELECT id FROM users WHERE name = :name");
/// query.bind_param("name", "alice");
/// let (ok, message) = query.execute_with(|results| {
///     for row in &results.rows {
///         println!("{:?}", row.get("id"));
///     }
/// });
/// assert!(ok, "{message}");
/// # }
/// ```
#[derive(Debug)]
pub struct Query<'conn> {
    connection: &'conn mut Connection,
    statement: String,
    params: HashMap<String, RowValues>,
}

impl<'conn> Query<'conn> {
    /// Create a query over the given connection and statement template.
    pub fn new(connection: &'conn mut Connection, statement: impl Into<String>) -> Self {
        Self {
            connection,
            statement: statement.into(),
            params: HashMap::new(),
        }
    }

    /// Bind a value to a named parameter, replacing any previous binding
    /// for that name.
    pub fn bind_param(
        &mut self,
        name: impl Into<String>,
        value: impl Into<RowValues>,
    ) -> &mut Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Execute the statement, discarding any rows it produces.
    ///
    /// Returns `(true, "")` on success, or `(false, message)` where the
    /// message starts with `"Failed to execute query: "`.
    pub fn execute(&mut self) -> (bool, String) {
        self.run(None::<fn(&ResultSet)>)
    }

    /// Execute the statement and hand the materialized rows to
    /// `process_results`.
    ///
    /// The handler is only invoked on success.
    pub fn execute_with<F>(&mut self, process_results: F) -> (bool, String)
    where
        F: FnOnce(&ResultSet),
    {
        self.run(Some(process_results))
    }

    fn run<F>(&mut self, process_results: Option<F>) -> (bool, String)
    where
        F: FnOnce(&ResultSet),
    {
        match self.try_execute() {
            Ok(result_set) => {
                if let Some(process) = process_results {
                    process(&result_set);
                }
                (true, String::new())
            }
            Err(err) => (false, format!("Failed to execute query: {err}")),
        }
    }

    fn try_execute(&mut self) -> Result<ResultSet, SqlConduitError> {
        let style = self.connection.placeholder_style().ok_or_else(|| {
            SqlConduitError::ConnectionError("connection is not open".to_string())
        })?;
        let expanded = expand_named_placeholders(&self.statement, style)?;

        let mut values = Vec::with_capacity(expanded.names.len());
        for name in &expanded.names {
            let value = self.params.get(name).ok_or_else(|| {
                SqlConduitError::ParameterError(format!("no binding for parameter :{name}"))
            })?;
            values.push(value.clone());
        }

        self.connection.query_with_params(&expanded.sql, &values)
    }
}
