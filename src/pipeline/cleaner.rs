use crate::config::{BinaryOverflow, Config};
use crate::constants::{CATEGORIES_COLUMN, CATEGORY_SUFFIX_LEN, ID_COLUMN};
use crate::error::{EtlError, Result};
use crate::table::{Table, Value};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Result of a cleaning pass.
#[derive(Debug, Clone)]
pub struct Cleaned {
    pub table: Table,
    /// Category column names in token order.
    pub categories: Vec<String>,
    pub duplicates_dropped: usize,
    pub values_coerced: usize,
}

/// Expands the packed `categories` field into integer columns, drops
/// duplicate ids and normalizes the binary label column.
#[derive(Debug, Clone)]
pub struct Cleaner {
    delimiter: char,
    binary_column: String,
    overflow: BinaryOverflow,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Cleaner {
    pub fn from_config(config: &Config) -> Self {
        Self {
            delimiter: config.category_delimiter,
            binary_column: config.binary_column.clone(),
            overflow: config.binary_overflow,
        }
    }

    #[instrument(skip_all, fields(rows = df.len()))]
    pub fn clean_data(&self, df: Table) -> Result<Cleaned> {
        let (mut table, categories) = self.expand_categories(df)?;
        debug!(count = categories.len(), "Expanded category columns");

        let duplicates_dropped = drop_duplicate_ids(&mut table)?;
        let values_coerced = normalize_binary(&mut table, &self.binary_column, self.overflow)?;
        warn_non_binary(&table, &categories);

        info!(
            rows = table.len(),
            categories = categories.len(),
            duplicates_dropped,
            values_coerced,
            "Cleaned dataset"
        );
        crate::metrics::rows_cleaned(table.len());
        crate::metrics::duplicates_dropped(duplicates_dropped);
        crate::metrics::binary_values_coerced(values_coerced);

        Ok(Cleaned {
            table,
            categories,
            duplicates_dropped,
            values_coerced,
        })
    }

    /// Replace the `categories` column with one integer column per category.
    ///
    /// Names come from the first row; every other row must carry the same
    /// names in the same order. Each row's values are parsed from that row's
    /// own field, so no positional realignment happens afterwards.
    pub fn expand_categories(&self, df: Table) -> Result<(Table, Vec<String>)> {
        let cat_idx = df.require_column(CATEGORIES_COLUMN)?;
        let id_idx = df.require_column(ID_COLUMN)?;

        let first = df.rows.first().ok_or_else(|| {
            EtlError::Format("no rows to derive category names from".to_string())
        })?;
        let names = category_names(category_field(first, cat_idx, id_idx)?, self.delimiter)?;

        let mut headers: Vec<String> = df
            .headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != cat_idx)
            .map(|(_, h)| h.clone())
            .collect();
        if let Some(clash) = names.iter().find(|n| headers.contains(n)) {
            return Err(EtlError::Format(format!(
                "category '{}' collides with an existing column",
                clash
            )));
        }
        headers.extend(names.iter().cloned());

        let mut expanded = Table::new(headers);
        expanded.rows.reserve(df.len());
        for mut row in df.rows {
            let values = {
                let field = category_field(&row, cat_idx, id_idx)?;
                category_values(field, self.delimiter, &names, &row[id_idx])?
            };
            row.remove(cat_idx);
            row.extend(values.into_iter().map(Value::Integer));
            expanded.rows.push(row);
        }
        Ok((expanded, names))
    }
}

fn category_field<'a>(row: &'a [Value], cat_idx: usize, id_idx: usize) -> Result<&'a str> {
    row[cat_idx].as_str().ok_or_else(|| {
        EtlError::Format(format!(
            "row with id {} has no category string (found '{}')",
            row[id_idx], row[cat_idx]
        ))
    })
}

/// Token minus its trailing `-<digit>`.
fn token_name(token: &str) -> Option<&str> {
    let (cut, _) = token.char_indices().rev().nth(CATEGORY_SUFFIX_LEN - 1)?;
    let name = &token[..cut];
    (!name.is_empty()).then_some(name)
}

/// Category names from a schema row, e.g. `related-1;request-0` gives
/// `["related", "request"]`.
pub fn category_names(field: &str, delimiter: char) -> Result<Vec<String>> {
    field
        .split(delimiter)
        .map(|token| {
            token_name(token).map(str::to_string).ok_or_else(|| {
                EtlError::Format(format!("malformed category token '{}'", token))
            })
        })
        .collect()
}

fn category_values(field: &str, delimiter: char, names: &[String], id: &Value) -> Result<Vec<i64>> {
    let tokens: Vec<&str> = field.split(delimiter).collect();
    if tokens.len() != names.len() {
        return Err(EtlError::Format(format!(
            "row with id {} has {} category tokens, expected {}",
            id,
            tokens.len(),
            names.len()
        )));
    }

    tokens
        .iter()
        .zip(names)
        .map(|(token, name)| {
            if token_name(token) != Some(name.as_str()) {
                return Err(EtlError::Format(format!(
                    "row with id {} has token '{}' where category '{}' was expected",
                    id, token, name
                )));
            }
            token
                .chars()
                .last()
                .and_then(|c| c.to_digit(10))
                .map(i64::from)
                .ok_or_else(|| EtlError::Parse {
                    id: id.to_string(),
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Keep the first row for each `id`. Returns the number of rows dropped.
pub fn drop_duplicate_ids(table: &mut Table) -> Result<usize> {
    let id_idx = table.require_column(ID_COLUMN)?;
    let ids = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row[id_idx].as_i64().ok_or_else(|| {
                EtlError::Format(format!("row {} has non-integer id '{}'", i, row[id_idx]))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let before = table.rows.len();
    let mut seen = HashSet::with_capacity(ids.len());
    let mut keep = ids.into_iter().map(|id| seen.insert(id));
    table.rows.retain(|_| keep.next().unwrap_or(true));
    Ok(before - table.rows.len())
}

/// Replace values greater than 1 in `column`. Returns the number of cells changed.
pub fn normalize_binary(table: &mut Table, column: &str, overflow: BinaryOverflow) -> Result<usize> {
    let idx = table.require_column(column)?;
    let replacement = overflow.replacement();
    let mut changed = 0;
    for row in &mut table.rows {
        if let Value::Integer(v) = row[idx] {
            if v > 1 {
                row[idx] = Value::Integer(replacement);
                changed += 1;
            }
        }
    }
    Ok(changed)
}

fn warn_non_binary(table: &Table, categories: &[String]) {
    for name in categories {
        let Some(values) = table.column(name) else {
            continue;
        };
        let off = values
            .filter(|v| !matches!(v, Value::Integer(0) | Value::Integer(1)))
            .count();
        if off > 0 {
            warn!(column = %name, rows = off, "Category column has non-binary values");
        }
    }
}
