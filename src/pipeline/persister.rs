use crate::error::Result;
use crate::table::{Table, Value};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::{info, instrument};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Real(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Column names and row count of a table read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTable {
    pub columns: Vec<String>,
    pub row_count: usize,
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Write `table` into the SQLite file at `destination` as `table_name`,
/// dropping any existing table of that name first. The replace runs in one
/// transaction, so a failed write leaves the previous table in place.
#[instrument(skip(table, destination), fields(rows = table.len(), destination = %destination.display()))]
pub fn save_data(table: &Table, destination: &Path, table_name: &str) -> Result<()> {
    let mut conn = Connection::open(destination)?;
    let tx = conn.transaction()?;

    let table_ident = quote_ident(table_name);
    let column_defs: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{} {}", quote_ident(h), table.column_type(i).sql_name()))
        .collect();

    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({columns});",
        table = table_ident,
        columns = column_defs.join(", ")
    ))?;

    {
        let placeholders = (1..=table.headers.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} VALUES ({})",
            table_ident, placeholders
        ))?;
        for row in &table.rows {
            stmt.execute(params_from_iter(row.iter()))?;
        }
    }

    tx.commit()?;
    info!(table = table_name, "Saved table");
    crate::metrics::rows_saved(table.len());
    Ok(())
}

/// Read back the column names and row count of `table_name`.
pub fn describe_table(destination: &Path, table_name: &str) -> Result<StoredTable> {
    let conn = Connection::open(destination)?;
    let table_ident = quote_ident(table_name);

    let stmt = conn.prepare(&format!("SELECT * FROM {} LIMIT 0", table_ident))?;
    let columns = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let row_count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table_ident),
        [],
        |row| row.get(0),
    )?;

    Ok(StoredTable {
        columns,
        row_count: row_count as usize,
    })
}
