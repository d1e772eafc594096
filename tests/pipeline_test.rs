use anyhow::Result;
use disaster_etl::pipeline::{describe_table, load_data};
use disaster_etl::{Config, EtlError, Pipeline, Value};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const MESSAGES: &str = "\
id,message,original,genre
2,Weather update - a cold front from Cuba,Un front froid se retrouve sur Cuba,direct
7,Is the Hurricane over or is it not over,Cyclone nan fini osinon li pa fini,direct
8,Looking for someone but no name,,direct
12,\"says: west side of Haiti, rest of the country today\",,direct
";

const CATEGORIES: &str = "\
id,categories
2,related-1;request-0;offer-0;aid_related-0
7,related-1;request-0;offer-0;aid_related-1
8,related-2;request-1;offer-0;aid_related-0
12,related-1;request-1;offer-0;aid_related-1
12,related-1;request-1;offer-0;aid_related-1
99,related-0;request-0;offer-0;aid_related-0
";

fn write_inputs(messages: &str, categories: &str) -> Result<(TempDir, PathBuf, PathBuf, PathBuf)> {
    let dir = tempdir()?;
    let messages_path = dir.path().join("messages.csv");
    let categories_path = dir.path().join("categories.csv");
    fs::write(&messages_path, messages)?;
    fs::write(&categories_path, categories)?;
    let db = dir.path().join("DisasterResponse.db");
    Ok((dir, messages_path, categories_path, db))
}

fn ids(db: &Path) -> Result<Vec<i64>> {
    let conn = Connection::open(db)?;
    let mut stmt = conn.prepare("SELECT id FROM DisasterResponse ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

#[test]
fn test_full_run_writes_expected_table() -> Result<()> {
    let (_dir, messages, categories, db) = write_inputs(MESSAGES, CATEGORIES)?;

    let report = Pipeline::new(Config::default()).run(&messages, &categories, &db)?;

    // id 12 joins twice, id 99 has no message
    assert_eq!(report.rows_loaded, 5);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(report.rows_saved, 4);
    assert_eq!(report.values_coerced, 1);
    assert_eq!(report.categories, vec!["related", "request", "offer", "aid_related"]);

    let stored = describe_table(&db, "DisasterResponse")?;
    assert_eq!(
        stored.columns,
        vec!["id", "message", "original", "genre", "related", "request", "offer", "aid_related"]
    );
    assert_eq!(ids(&db)?, vec![2, 7, 8, 12]);

    let conn = Connection::open(&db)?;
    let (related, request, original): (i64, i64, Option<String>) = conn.query_row(
        "SELECT related, request, original FROM DisasterResponse WHERE id = 8",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    assert_eq!(related, 0);
    assert_eq!(request, 1);
    assert_eq!(original, None);

    let out_of_range: i64 = conn.query_row(
        "SELECT COUNT(*) FROM DisasterResponse WHERE related NOT IN (0, 1)",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(out_of_range, 0);
    Ok(())
}

#[test]
fn test_single_flood_message() -> Result<()> {
    let (_dir, messages, categories, db) =
        write_inputs("id,message\n1,flood\n", "id,categories\n1,related-1;request-0\n")?;

    Pipeline::new(Config::default()).run(&messages, &categories, &db)?;

    let conn = Connection::open(&db)?;
    let row: (i64, String, i64, i64) = conn.query_row(
        "SELECT id, message, related, request FROM DisasterResponse",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;
    assert_eq!(row, (1, "flood".to_string(), 1, 0));
    Ok(())
}

#[test]
fn test_rerun_replaces_table() -> Result<()> {
    let (_dir, messages, categories, db) = write_inputs(MESSAGES, CATEGORIES)?;
    let pipeline = Pipeline::new(Config::default());

    pipeline.run(&messages, &categories, &db)?;
    fs::write(&messages, "id,message\n2,only one\n")?;
    let report = pipeline.run(&messages, &categories, &db)?;

    assert_eq!(report.rows_saved, 1);
    assert_eq!(ids(&db)?, vec![2]);
    Ok(())
}

#[test]
fn test_custom_table_name_from_config() -> Result<()> {
    let (dir, messages, categories, db) = write_inputs(MESSAGES, CATEGORIES)?;
    let config_path = dir.path().join("etl.toml");
    fs::write(&config_path, "table_name = \"Messages\"\n")?;

    let config = Config::load(Some(config_path.as_path()))?;
    Pipeline::new(config).run(&messages, &categories, &db)?;

    assert_eq!(describe_table(&db, "Messages")?.row_count, 4);
    assert!(describe_table(&db, "DisasterResponse").is_err());
    Ok(())
}

#[test]
fn test_load_data_is_an_inner_join() -> Result<()> {
    let (_dir, messages, categories, _db) = write_inputs(MESSAGES, CATEGORIES)?;

    let df = load_data(&messages, &categories)?;
    let id_values: Vec<Value> = df.column("id").expect("id column").cloned().collect();
    assert_eq!(
        id_values,
        vec![
            Value::Integer(2),
            Value::Integer(7),
            Value::Integer(8),
            Value::Integer(12),
            Value::Integer(12)
        ]
    );
    assert!(df.column("categories").is_some());
    Ok(())
}

#[test]
fn test_missing_input_is_io_error_and_writes_nothing() -> Result<()> {
    let (dir, _messages, categories, db) = write_inputs(MESSAGES, CATEGORIES)?;
    let missing = dir.path().join("nope.csv");

    let err = Pipeline::new(Config::default())
        .run(&missing, &categories, &db)
        .unwrap_err();
    assert!(matches!(err, EtlError::Io { .. }));
    assert!(!db.exists());
    Ok(())
}

#[test]
fn test_ragged_csv_is_format_error() -> Result<()> {
    let (_dir, messages, categories, db) =
        write_inputs("id,message\n1,flood,extra\n", "id,categories\n1,related-1\n")?;

    let err = Pipeline::new(Config::default())
        .run(&messages, &categories, &db)
        .unwrap_err();
    assert!(matches!(err, EtlError::Csv { .. }));
    Ok(())
}

#[test]
fn test_non_numeric_category_is_parse_error() -> Result<()> {
    let (_dir, messages, categories, db) =
        write_inputs("id,message\n1,flood\n", "id,categories\n1,related-1;request-?\n")?;

    let err = Pipeline::new(Config::default())
        .run(&messages, &categories, &db)
        .unwrap_err();
    assert!(matches!(err, EtlError::Parse { .. }));
    Ok(())
}
