use std::sync::Arc;

use chrono::NaiveDate;
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Params, Value};

use crate::config::MysqlOptions;
use crate::error::SqlConduitError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Connect to the server named by the options.
///
/// # Errors
///
/// Returns `SqlConduitError::ConfigError` if the port is out of range, or
/// `SqlConduitError::MysqlError` if the server refuses the connection.
pub fn connect(opts: &MysqlOptions) -> Result<Conn, SqlConduitError> {
    let port = u16::try_from(opts.port).map_err(|_| {
        SqlConduitError::ConfigError(format!("port {} is out of range", opts.port))
    })?;
    let builder = OptsBuilder::new()
        .ip_or_hostname(Some(opts.host.clone()))
        .tcp_port(port)
        .db_name(Some(opts.database.clone()))
        .user(Some(opts.user.clone()))
        .pass(Some(opts.password.clone()));
    Ok(Conn::new(builder)?)
}

/// Convert a single [`RowValues`] to a `MySQL` value.
#[must_use]
pub fn to_mysql_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.clone().into_bytes()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Bytes(dt.format("%F %T%.f").to_string().into_bytes()),
        RowValues::Null => Value::NULL,
        RowValues::JSON(jval) => Value::Bytes(jval.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    }
}

fn from_mysql_value(value: Value) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        // The text protocol returns most scalars as bytes; surface valid
        // UTF-8 as text and keep everything else as a blob.
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(s) => RowValues::Text(s),
            Err(err) => RowValues::Blob(err.into_bytes()),
        },
        Value::Int(i) => RowValues::Int(i),
        Value::UInt(u) => {
            i64::try_from(u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int)
        }
        Value::Float(f) => RowValues::Float(f64::from(f)),
        Value::Double(d) => RowValues::Float(d),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(hour),
                        u32::from(minute),
                        u32::from(second),
                        micros,
                    )
                })
                .map_or(RowValues::Null, RowValues::Timestamp)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if negative { "-" } else { "" };
            let total_hours = days * 24 + u32::from(hours);
            RowValues::Text(format!(
                "{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            ))
        }
    }
}

/// Execute one or more statements without results.
///
/// # Errors
///
/// Returns `SqlConduitError::MysqlError` on execution failure.
pub fn execute_batch(conn: &mut Conn, sql: &str) -> Result<(), SqlConduitError> {
    conn.query_drop(sql)?;
    Ok(())
}

/// Run one statement with positional parameters.
///
/// # Errors
///
/// Returns `SqlConduitError::MysqlError` on prepare or execution failure.
pub fn query(
    conn: &mut Conn,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlConduitError> {
    let converted = if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(to_mysql_value).collect())
    };
    let mut result = conn.exec_iter(sql, converted)?;

    let column_names: Vec<String> = result
        .columns()
        .as_ref()
        .iter()
        .map(|col| col.name_str().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    for row in result.by_ref() {
        let row = row?;
        let values: Vec<RowValues> = row
            .unwrap()
            .into_iter()
            .take(column_count)
            .map(from_mysql_value)
            .collect();
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// List the tables of the connected schema.
///
/// # Errors
///
/// Returns `SqlConduitError::MysqlError` on execution failure.
pub fn tables(conn: &mut Conn) -> Result<Vec<String>, SqlConduitError> {
    Ok(conn.query("SHOW TABLES")?)
}
