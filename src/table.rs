//! In-memory table shared by the pipeline stages.
//!
//! A [`Table`] is an ordered list of column names plus rows of typed cells.
//! Column types are inferred once when a CSV file is read and carried by the
//! cells from then on.

use crate::error::{EtlError, Result};
use std::fmt;

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Storage class of a column, chosen from its non-empty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// Integer if every non-empty field parses as `i64`, else Real if every one
    /// parses as a finite `f64`, else Text. A column of only empty fields is Text.
    pub fn infer<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen_any = false;
        let mut all_int = true;
        let mut all_real = true;
        for field in fields.into_iter().filter(|f| !f.is_empty()) {
            seen_any = true;
            if all_int && field.parse::<i64>().is_err() {
                all_int = false;
            }
            if all_real && !field.parse::<f64>().is_ok_and(f64::is_finite) {
                all_real = false;
            }
            if !all_int && !all_real {
                return ColumnType::Text;
            }
        }
        match (seen_any, all_int, all_real) {
            (false, _, _) => ColumnType::Text,
            (true, true, _) => ColumnType::Integer,
            (true, false, true) => ColumnType::Real,
            _ => ColumnType::Text,
        }
    }

    /// Convert a raw field; callers only pass fields that matched the inferred type.
    pub fn parse(self, field: &str) -> Value {
        if field.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnType::Integer => field
                .parse()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(field.to_string())),
            ColumnType::Real => field
                .parse()
                .map(Value::Real)
                .unwrap_or_else(|_| Value::Text(field.to_string())),
            ColumnType::Text => Value::Text(field.to_string()),
        }
    }

    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| EtlError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Storage class of a column as seen from its cells. Integer cells mixed
    /// with Real cells widen to Real; anything with text is Text.
    pub fn column_type(&self, idx: usize) -> ColumnType {
        let mut ty: Option<ColumnType> = None;
        for row in &self.rows {
            let cell_ty = match &row[idx] {
                Value::Null => continue,
                Value::Integer(_) => ColumnType::Integer,
                Value::Real(_) => ColumnType::Real,
                Value::Text(_) => return ColumnType::Text,
            };
            ty = Some(match (ty, cell_ty) {
                (None, t) => t,
                (Some(ColumnType::Integer), ColumnType::Integer) => ColumnType::Integer,
                _ => ColumnType::Real,
            });
        }
        ty.unwrap_or(ColumnType::Text)
    }
}
