use anyhow::Result;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_disaster_etl"))
}

#[test]
fn test_wrong_argument_count_prints_usage_and_succeeds() -> Result<()> {
    let dir = tempdir()?;
    let output = bin()
        .current_dir(dir.path())
        .args(["messages.csv", "categories.csv"])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Please provide the filepaths"));
    // no logs directory, no database
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_dash_prefixed_argument_still_gets_usage() -> Result<()> {
    let dir = tempdir()?;
    let output = bin()
        .current_dir(dir.path())
        .args(["-m.csv", "c.csv"])
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Please provide the filepaths"));
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_full_run_prints_stage_messages() -> Result<()> {
    let dir = tempdir()?;
    let messages = dir.path().join("messages.csv");
    let categories = dir.path().join("categories.csv");
    let db = dir.path().join("out.db");
    fs::write(&messages, "id,message\n1,flood\n")?;
    fs::write(&categories, "id,categories\n1,related-1;request-0\n")?;

    let output = bin().arg(&messages).arg(&categories).arg(&db).output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Loading data..."));
    assert!(stdout.contains("Cleaning data..."));
    assert!(stdout.contains("Saving data..."));
    assert!(stdout.contains("Cleaned data saved to database!"));
    assert!(db.exists());
    Ok(())
}

#[test]
fn test_failure_exits_non_zero_without_success_message() -> Result<()> {
    let dir = tempdir()?;
    let db = dir.path().join("out.db");

    let output = bin()
        .arg(dir.path().join("missing.csv"))
        .arg(dir.path().join("missing_too.csv"))
        .arg(&db)
        .output()?;

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Loading data..."));
    assert!(!stdout.contains("Cleaned data saved"));
    Ok(())
}
