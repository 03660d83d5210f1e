use std::error::Error;
use std::sync::Arc;

use bytes::BytesMut;
use chrono::NaiveDateTime;
use postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use postgres::{Client, NoTls, Row};
use serde_json::Value as JsonValue;

use crate::config::PostgresOptions;
use crate::error::SqlConduitError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Connect to the server named by the options, without TLS.
///
/// # Errors
///
/// Returns `SqlConduitError::ConfigError` if the port is out of range, or
/// `SqlConduitError::PostgresError` if the server refuses the connection.
pub fn connect(opts: &PostgresOptions) -> Result<Client, SqlConduitError> {
    let port = u16::try_from(opts.port).map_err(|_| {
        SqlConduitError::ConfigError(format!("port {} is out of range", opts.port))
    })?;
    let mut config = postgres::Config::new();
    config
        .host(&opts.host)
        .port(port)
        .dbname(&opts.database)
        .user(&opts.user)
        .password(&opts.password);
    Ok(config.connect(NoTls)?)
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            RowValues::Int(i) => (*i).to_sql(ty, out),
            RowValues::Float(f) => (*f).to_sql(ty, out),
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Bool(b) => (*b).to_sql(ty, out),
            RowValues::Timestamp(dt) => dt.to_sql(ty, out),
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jval) => jval.to_sql(ty, out),
            RowValues::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::CHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}

/// Execute one or more statements without results.
///
/// # Errors
///
/// Returns `SqlConduitError::PostgresError` on execution failure.
pub fn execute_batch(client: &mut Client, sql: &str) -> Result<(), SqlConduitError> {
    client.batch_execute(sql)?;
    Ok(())
}

fn extract_value(row: &Row, idx: usize) -> Result<RowValues, SqlConduitError> {
    let type_info = row.columns()[idx].type_();

    // Match on common type names; anything unrecognized falls back to text.
    match type_info.name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" | "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "json" | "jsonb" => {
            let val: Option<JsonValue> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        _ => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}

/// Build a result set from already-fetched rows.
///
/// # Errors
///
/// Returns `SqlConduitError::PostgresError` if a value cannot be extracted.
pub fn build_result_set(rows: &[Row]) -> Result<ResultSet, SqlConduitError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        let cols: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        result_set.set_column_names(Arc::new(cols));
    }

    for row in rows {
        let col_count = row.columns().len();
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Run one statement with positional parameters.
///
/// # Errors
///
/// Returns `SqlConduitError::PostgresError` on prepare or execution failure.
pub fn query(
    client: &mut Client,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlConduitError> {
    let refs: Vec<&(dyn ToSql + Sync)> =
        params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
    let rows = client.query(sql, &refs)?;
    build_result_set(&rows)
}

/// List user tables in the public schema.
///
/// # Errors
///
/// Returns `SqlConduitError::PostgresError` on execution failure.
pub fn tables(client: &mut Client) -> Result<Vec<String>, SqlConduitError> {
    let rows = client.query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
         ORDER BY table_name",
        &[],
    )?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}
