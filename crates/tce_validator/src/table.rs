//! Tabular dataset abstraction.
//!
//! A [`Table`] is a bounded, fully materialized set of named columns with
//! equal row counts. Values are typed as string/integer/float/bool/null.
//! The engine never mutates an input table; every pass works on a copy.

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
}

impl Value {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    /// Attempts to view this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to interpret this value as a float. Integers widen; strings
    /// and booleans do not coerce here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value rendered as a plain string, the way tests see it.
    /// Null renders as the empty string.
    pub fn string_form(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
        }
    }

    /// A stable representation used for composite keys and set membership.
    /// Null values share a sentinel so duplicate nulls compare equal.
    pub fn key_repr(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            other => other.string_form(),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A named column of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// An in-memory table: ordered named columns with equal row counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(name, values)` pairs.
    ///
    /// Fails if row counts differ or a column name repeats.
    pub fn from_columns(
        columns: impl IntoIterator<Item = (impl Into<String>, Vec<Value>)>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new();
        for (name, values) in columns {
            table.add_column(name.into(), values)?;
        }
        Ok(table)
    }

    /// Number of rows (0 for a table with no columns).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up a column's values by name.
    pub fn values(&self, name: &str) -> Option<&[Value]> {
        self.column(name).map(|c| c.values.as_slice())
    }

    /// Cell accessor.
    pub fn value(&self, name: &str, row: usize) -> Option<&Value> {
        self.values(name).and_then(|values| values.get(row))
    }

    /// Iterates over columns in declaration order.
    pub fn iter_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Adds a column; fails on row-count mismatch or duplicate name.
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<(), TableError> {
        let name = name.into();
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            return Err(TableError::RowCountMismatch {
                column: name,
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        if self.has_column(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Adds a column, replacing an existing one of the same name.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<(), TableError> {
        let name = name.into();
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            return Err(TableError::RowCountMismatch {
                column: name,
                expected: self.n_rows(),
                actual: values.len(),
            });
        }
        if let Some(col) = self.columns.iter_mut().find(|c| c.name == name) {
            col.values = values;
        } else {
            self.columns.push(Column { name, values });
        }
        Ok(())
    }

    /// Replaces a single cell. Out-of-range positions are ignored.
    pub fn set_value(&mut self, name: &str, row: usize, value: Value) {
        if let Some(col) = self.columns.iter_mut().find(|c| c.name == name)
            && let Some(slot) = col.values.get_mut(row)
        {
            *slot = value;
        }
    }

    /// Builds a new table containing only the rows the predicate keeps.
    /// Row order is preserved; indices are re-packed.
    pub fn filter_rows(&self, mut keep: impl FnMut(usize) -> bool) -> Table {
        let kept: Vec<usize> = (0..self.n_rows()).filter(|&i| keep(i)).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: kept.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Table { columns }
    }

    /// A composite key over the named columns for the given row. Columns
    /// absent from the table contribute nothing.
    pub fn row_key(&self, row: usize, subset: &[String]) -> String {
        let mut parts = Vec::with_capacity(subset.len());
        for name in subset {
            if let Some(value) = self.value(name, row) {
                parts.push(value.key_repr());
            }
        }
        parts.join("\u{1f}")
    }
}
