use sql_conduit::prelude::*;

#[test]
fn sqlite_options_default_and_connection_string() {
    let opts = SqliteOptions::default();
    assert_eq!(opts.db_name, "db.sqlite3");
    assert!(opts.is_valid());
    assert!(opts.validation_error().is_none());

    let opts = SqliteOptions::new("/var/lib/app/data.db");
    assert_eq!(opts.connection_string(), "/var/lib/app/data.db");
}

#[test]
fn sqlite_options_empty_path_is_invalid() {
    let opts = SqliteOptions::new("");
    assert!(!opts.is_valid());
    assert_eq!(
        opts.validation_error().as_deref(),
        Some("Database name cannot be empty")
    );
}

#[test]
fn server_builders_fill_backend_defaults() {
    let pg = PostgresOptions::builder()
        .database("inventory")
        .user("svc")
        .password("secret")
        .build();
    assert_eq!(pg.host, "127.0.0.1");
    assert_eq!(pg.port, 5432);
    assert!(pg.is_valid());

    let my = MysqlOptions::builder()
        .database("inventory")
        .user("svc")
        .host("db.internal")
        .build();
    assert_eq!(my.port, 3306);
    assert_eq!(my.host, "db.internal");
}

#[test]
fn validity_matches_validation_error_for_all_variants() {
    let cases: Vec<ConnOptions> = vec![
        SqliteOptions::new("ok.db").into(),
        SqliteOptions::new("").into(),
        PostgresOptions::new("d", "u", "p", "h", 5432).into(),
        PostgresOptions::new("", "u", "p", "h", 5432).into(),
        MysqlOptions::new("d", "u", "p", "h", 0).into(),
        MysqlOptions::new("d", "", "p", "h", 3306).into(),
    ];
    for options in cases {
        assert_eq!(
            options.is_valid(),
            options.validation_error().is_none(),
            "mismatch for {options}"
        );
    }
}

#[test]
fn out_of_range_port_reports_port_message_not_missing_field() {
    let opts = PostgresOptions::new("d", "u", "p", "h", 70000);
    assert!(!opts.is_valid());
    let message = opts.validation_error().unwrap();
    assert!(message.contains("Port must be between 1 and 65535"));
    assert!(!message.contains("cannot be empty"));
}

#[test]
fn required_field_checks_run_before_port_check() {
    // Both the database and the port are bad; the field message wins.
    let opts = MysqlOptions::new("", "u", "p", "h", 0);
    assert_eq!(
        opts.validation_error().as_deref(),
        Some("Database name cannot be empty")
    );
}

#[test]
fn server_connection_string_keeps_all_fields_in_fixed_order() {
    let opts = PostgresOptions::new("orders", "reader", "", "10.1.2.3", 5433);
    assert_eq!(
        opts.connection_string(),
        "host=10.1.2.3 port=5433 dbname=orders user=reader password="
    );
}

#[test]
fn conn_options_driver_is_derived_from_the_held_variant() {
    let sqlite: ConnOptions = SqliteOptions::default().into();
    let postgres: ConnOptions = PostgresOptions::default().into();
    let mysql: ConnOptions = MysqlOptions::default().into();

    assert_eq!(sqlite.driver(), Driver::Sqlite);
    assert_eq!(postgres.driver(), Driver::Postgres);
    assert_eq!(mysql.driver(), Driver::Mysql);

    assert_eq!(sqlite.driver_name(), "sqlite");
    assert_eq!(postgres.driver_name(), "postgres");
    assert_eq!(mysql.driver_name(), "mysql");

    assert!(sqlite.is_sqlite() && !sqlite.is_postgres() && !sqlite.is_mysql());
    assert!(postgres.is_postgres());
    assert!(mysql.is_mysql());
}

#[test]
fn conn_options_delegates_to_the_held_variant() {
    let inner = PostgresOptions::new("d", "u", "p", "h", 5432);
    let options: ConnOptions = inner.clone().into();

    assert_eq!(options.is_valid(), inner.is_valid());
    assert_eq!(options.validation_error(), inner.validation_error());
    assert_eq!(options.connection_string(), inner.connection_string());
    assert_eq!(options.as_postgres(), Some(&inner));
    assert!(options.as_sqlite().is_none());
}

#[test]
fn conn_options_equality_is_structural() {
    let a: ConnOptions = PostgresOptions::new("d", "u", "p", "h", 5432).into();
    let b: ConnOptions = PostgresOptions::new("d", "u", "p", "h", 5432).into();
    let c: ConnOptions = PostgresOptions::new("d", "u", "p", "h", 5433).into();
    // Same field values under a different variant are not equal.
    let d: ConnOptions = MysqlOptions::new("d", "u", "p", "h", 5432).into();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, d);
}

#[test]
fn conn_options_round_trips_through_json() -> Result<(), Box<dyn std::error::Error>> {
    let options: ConnOptions = MysqlOptions::new("shop", "svc", "pw", "db.local", 3307).into();
    let json = serde_json::to_string(&options)?;
    assert!(json.contains("\"driver\":\"mysql\""));
    let back: ConnOptions = serde_json::from_str(&json)?;
    assert_eq!(back, options);
    Ok(())
}
