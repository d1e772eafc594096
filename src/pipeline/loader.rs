use crate::constants::{ID_COLUMN, LEFT_SUFFIX, RIGHT_SUFFIX};
use crate::error::{EtlError, Result};
use crate::table::{ColumnType, Table, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Read a comma-separated file with a header row into a typed [`Table`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_csv(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| EtlError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EtlError::csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(EtlError::Format(format!(
            "'{}' has no header row",
            path.display()
        )));
    }

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(|e| EtlError::csv(path, e))?);
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|i| ColumnType::infer(records.iter().map(|r| r.get(i).unwrap_or(""))))
        .collect();
    debug!(?types, "Inferred column types");

    let rows = records
        .iter()
        .map(|record| {
            types
                .iter()
                .enumerate()
                .map(|(i, ty)| ty.parse(record.get(i).unwrap_or("")))
                .collect()
        })
        .collect();

    Ok(Table { headers, rows })
}

fn join_key(value: &Value, side: &str, row: usize) -> Result<i64> {
    value.as_i64().ok_or_else(|| {
        EtlError::Format(format!(
            "{} table row {} has non-integer join key '{}'",
            side, row, value
        ))
    })
}

/// Inner join on `key`.
///
/// Rows come out in left-table order; a left row matching several right rows
/// is repeated once per match, in right-table order. The right key column is
/// dropped and other shared column names get `_x` / `_y` suffixes.
pub fn inner_join(left: &Table, right: &Table, key: &str) -> Result<Table> {
    let left_key = left.require_column(key)?;
    let right_key = right.require_column(key)?;

    let mut index: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        let k = join_key(&row[right_key], "right", i)?;
        index.entry(k).or_default().push(i);
    }

    let shared = |name: &str| {
        name != key
            && left.headers.iter().any(|h| h == name)
            && right.headers.iter().any(|h| h == name)
    };

    let mut headers: Vec<String> = left
        .headers
        .iter()
        .map(|h| if shared(h) { format!("{}{}", h, LEFT_SUFFIX) } else { h.clone() })
        .collect();
    headers.extend(
        right
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != right_key)
            .map(|(_, h)| if shared(h) { format!("{}{}", h, RIGHT_SUFFIX) } else { h.clone() }),
    );

    let mut joined = Table::new(headers);
    for (i, row) in left.rows.iter().enumerate() {
        let k = join_key(&row[left_key], "left", i)?;
        let Some(matches) = index.get(&k) else {
            continue;
        };
        for &ri in matches {
            let mut combined = row.clone();
            combined.extend(
                right.rows[ri]
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != right_key)
                    .map(|(_, v)| v.clone()),
            );
            joined.rows.push(combined);
        }
    }
    Ok(joined)
}

/// Read the messages and categories files and inner-join them on `id`.
#[instrument(skip_all)]
pub fn load_data(messages_path: &Path, categories_path: &Path) -> Result<Table> {
    let messages = read_csv(messages_path)?;
    let categories = read_csv(categories_path)?;
    info!(
        messages = messages.len(),
        categories = categories.len(),
        "Read input files"
    );

    let df = inner_join(&messages, &categories, ID_COLUMN)?;
    info!(rows = df.len(), columns = df.headers.len(), "Merged datasets");
    crate::metrics::rows_loaded(df.len());
    Ok(df)
}
