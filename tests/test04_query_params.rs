#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use sql_conduit::prelude::*;
use tempfile::TempDir;

fn seeded_connection(dir: &TempDir, file: &str) -> Connection {
    let path = dir.path().join(file);
    let mut conn = Connection::new(SqliteOptions::new(path.to_string_lossy()));
    assert!(conn.open(), "{}", conn.last_error());
    assert!(conn.execute(
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, age INTEGER);
         INSERT INTO people (name, age) VALUES ('alice', 30), ('bob', 41), ('carol', 30);"
    ));
    conn
}

#[test]
fn named_parameters_are_bound_by_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut conn = seeded_connection(&dir, "named.db");

    let mut query = Query::new(
        &mut conn,
        "SELECT name FROM people WHERE age = :age AND name <> :skip ORDER BY name",
    );
    // Binding order differs from appearance order; names still match.
    query.bind_param("skip", "carol");
    query.bind_param("age", 30_i64);

    let mut names = Vec::new();
    let (ok, message) = query.execute_with(|results| {
        for row in &results.rows {
            names.push(row.get("name").unwrap().as_text().unwrap().to_string());
        }
    });
    assert!(ok, "{message}");
    assert!(message.is_empty());
    assert_eq!(names, vec!["alice".to_string()]);
    Ok(())
}

#[test]
fn last_write_wins_for_rebound_parameters() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut conn = seeded_connection(&dir, "rebind.db");

    let mut query = Query::new(&mut conn, "SELECT count(*) AS n FROM people WHERE age = :age");
    query.bind_param("age", 99_i64);
    query.bind_param("age", 30_i64);

    let mut count = -1;
    let (ok, _) = query.execute_with(|results| {
        count = *results.rows[0].get("n").unwrap().as_int().unwrap();
    });
    assert!(ok);
    assert_eq!(count, 2);
    Ok(())
}

#[test]
fn query_is_reusable_with_fresh_bindings() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut conn = seeded_connection(&dir, "reuse.db");

    let mut query = Query::new(&mut conn, "SELECT count(*) AS n FROM people WHERE age = :age");

    for (age, expected) in [(30_i64, 2_i64), (41, 1), (99, 0)] {
        query.bind_param("age", age);
        let mut count = -1;
        let (ok, message) = query.execute_with(|results| {
            count = *results.rows[0].get("n").unwrap().as_int().unwrap();
        });
        assert!(ok, "{message}");
        assert_eq!(count, expected, "age {age}");
    }
    Ok(())
}

#[test]
fn missing_binding_fails_with_query_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut conn = seeded_connection(&dir, "missing.db");

    let mut query = Query::new(&mut conn, "SELECT * FROM people WHERE age = :age");
    let (ok, message) = query.execute();
    assert!(!ok);
    assert!(message.starts_with("Failed to execute query: "), "{message}");
    assert!(message.contains(":age"), "{message}");
    Ok(())
}

#[test]
fn bad_sql_fails_with_query_prefix() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut conn = seeded_connection(&dir, "bad_sql.db");

    let mut query = Query::new(&mut conn, "SELECT definitely_missing FROM people");
    let (ok, message) = query.execute();
    assert!(!ok);
    assert!(message.starts_with("Failed to execute query: "), "{message}");
    Ok(())
}

#[test]
fn query_on_a_closed_connection_fails_without_backend_contact() {
    let mut conn = Connection::new(SqliteOptions::new("never-opened.db"));
    let mut query = Query::new(&mut conn, "SELECT 1");
    let (ok, message) = query.execute();
    assert!(!ok);
    assert!(message.contains("not open"), "{message}");
}

#[test]
fn dml_through_query_and_unused_bindings_are_ignored()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut conn = seeded_connection(&dir, "dml.db");

    {
        let mut insert = Query::new(
            &mut conn,
            "INSERT INTO people (name, age) VALUES (:name, :age)",
        );
        insert.bind_param("name", "dave");
        insert.bind_param("age", 52_i64);
        // Bound but never referenced by the template; harmless.
        insert.bind_param("unused", true);
        let (ok, message) = insert.execute();
        assert!(ok, "{message}");
    }

    let results = conn
        .execute_query("SELECT count(*) AS n FROM people")
        .unwrap();
    assert_eq!(*results.rows[0].get("n").unwrap().as_int().unwrap(), 4);
    Ok(())
}

#[test]
fn bound_values_round_trip_through_the_accessors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("values.db");
    let mut conn = Connection::new(SqliteOptions::new(path.to_string_lossy()));
    assert!(conn.open(), "{}", conn.last_error());
    assert!(conn.execute(
        "CREATE TABLE vals (ts TEXT, data BLOB, ratio REAL, flag INTEGER, note TEXT)"
    ));

    let stamp = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap();
    let payload = vec![0x00_u8, 0xfe, 0x01]; // not valid UTF-8, must stay a blob

    {
        let mut insert = Query::new(
            &mut conn,
            "INSERT INTO vals VALUES (:ts, :data, :ratio, :flag, NULL)",
        );
        insert.bind_param("ts", RowValues::Timestamp(stamp));
        insert.bind_param("data", RowValues::Blob(payload.clone()));
        insert.bind_param("ratio", 2.5_f64);
        insert.bind_param("flag", RowValues::Bool(true));
        let (ok, message) = insert.execute();
        assert!(ok, "{message}");
    }

    let results = conn
        .execute_query("SELECT ts, data, ratio, flag, note FROM vals")
        .unwrap();
    let row = &results.rows[0];

    // Timestamps are stored as text and parsed back on access.
    assert_eq!(row.get("ts").unwrap().as_timestamp(), Some(stamp));
    assert_eq!(row.get("data").unwrap().as_blob(), Some(&payload[..]));
    assert_eq!(row.get("ratio").unwrap().as_float(), Some(2.5));
    // Booleans land as integers; the accessor coerces 0/1 back.
    assert_eq!(row.get("flag").unwrap().as_bool(), Some(&true));
    assert!(row.get("note").unwrap().is_null());
    assert!(!row.get("flag").unwrap().is_null());
    Ok(())
}

#[test]
fn colon_inside_literal_is_not_a_parameter() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut conn = seeded_connection(&dir, "literal.db");

    let mut query = Query::new(
        &mut conn,
        "SELECT count(*) AS n FROM people WHERE name <> ':age'",
    );
    let mut count = -1;
    let (ok, message) = query.execute_with(|results| {
        count = *results.rows[0].get("n").unwrap().as_int().unwrap();
    });
    assert!(ok, "{message}");
    assert_eq!(count, 3);
    Ok(())
}
