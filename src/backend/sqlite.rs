use std::fmt::Write;
use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, Statement, ToSql};

use crate::config::SqliteOptions;
use crate::error::SqlConduitError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Open the database file named by the options.
///
/// # Errors
///
/// Returns `SqlConduitError::SqliteError` if the file cannot be opened.
pub fn connect(opts: &SqliteOptions) -> Result<Connection, SqlConduitError> {
    Ok(Connection::open(&opts.db_name)?)
}

/// Convert a single [`RowValues`] to a rusqlite value.
#[must_use]
pub fn to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => {
            let mut buf = String::with_capacity(32);
            // Formatting %F %T%.f cannot fail into a String
            let _ = write!(buf, "{}", dt.format("%F %T%.f"));
            Value::Text(buf)
        }
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Execute one or more statements without results.
///
/// # Errors
///
/// Returns `SqlConduitError::SqliteError` on execution failure.
pub fn execute_batch(conn: &Connection, sql: &str) -> Result<(), SqlConduitError> {
    conn.execute_batch(sql)?;
    Ok(())
}

fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, SqlConduitError> {
    let value: Value = row.get(idx).map_err(SqlConduitError::SqliteError)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a prepared statement and materialize any rows it produces.
///
/// DML statements run through the same path; stepping the statement applies
/// the change and yields no rows.
///
/// # Errors
///
/// Returns `SqlConduitError::SqliteError` on execution failure.
pub fn build_result_set(
    stmt: &mut Statement,
    params: &[Value],
) -> Result<ResultSet, SqlConduitError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            row_values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Prepare and run one statement with positional parameters.
///
/// # Errors
///
/// Returns `SqlConduitError::SqliteError` on prepare or execution failure.
pub fn query(
    conn: &Connection,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlConduitError> {
    let values: Vec<Value> = params.iter().map(to_sqlite_value).collect();
    let mut stmt = conn.prepare(sql)?;
    build_result_set(&mut stmt, &values)
}

/// List user tables, excluding `SQLite`'s internal ones.
///
/// # Errors
///
/// Returns `SqlConduitError::SqliteError` on execution failure.
pub fn tables(conn: &Connection) -> Result<Vec<String>, SqlConduitError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' \
         AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
