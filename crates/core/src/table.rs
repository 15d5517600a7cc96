//! Dynamic tabular model shared by every pipeline stage.
//!
//! A [`Table`] carries an ordered column list plus rows keyed by column
//! name. Absence of a key in a row is the null/undefined marker; there is
//! no NaN or sentinel value anywhere in the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0" so counts export
            // the way they were ingested.
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// One observation, keyed by column name. A key absent from the map is a
/// missing/undefined cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row(HashMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.0.get(column).and_then(Value::as_number)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(Value::as_text)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Move a cell from one key to another. Existing cells under the new
    /// key are never overwritten.
    pub fn rename_key(&mut self, from: &str, to: &str) {
        if self.0.contains_key(to) {
            return;
        }
        if let Some(value) = self.0.remove(from) {
            self.0.insert(to.to_string(), value);
        }
    }
}

/// Ordered sequence of rows sharing a column superset. The column list
/// drives iteration, union, and export order; rows may omit any column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for column in columns {
            table.add_column(&column.into());
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Register a column at the end of the column order. Registering an
    /// existing column is a no-op, so union order stays first-seen.
    pub fn add_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    /// Rename a column in place, in both the column order and every row.
    /// Returns `false` without touching anything when `from` is unknown or
    /// `to` already names a different column.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        if self.has_column(to) {
            return false;
        }
        let Some(index) = self.columns.iter().position(|c| c == from) else {
            return false;
        };
        self.columns[index] = to.to_string();
        for row in &mut self.rows {
            row.rename_key(from, to);
        }
        true
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Numeric cells of one column, in row order; `None` marks undefined
    /// cells (missing or non-numeric).
    pub fn numbers<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<f64>> + 'a {
        self.rows.iter().map(move |row| row.number(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display_trims_whole_numbers() {
        assert_eq!(Value::Number(1000.0).to_string(), "1000");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Text("Google Ads".to_string()).to_string(), "Google Ads");
    }

    #[test]
    fn test_add_column_keeps_first_seen_order() {
        let mut table = Table::with_columns(["a", "b"]);
        table.add_column("c");
        table.add_column("a");
        assert_eq!(table.columns(), &["a", "b", "c"]);
    }

    #[test]
    fn test_rename_column_updates_rows() {
        let mut table = Table::with_columns(["Cost"]);
        let mut row = Row::new();
        row.set("Cost", 12.5);
        table.push_row(row);

        assert!(table.rename_column("Cost", "spend"));
        assert_eq!(table.columns(), &["spend"]);
        assert_eq!(table.rows()[0].number("spend"), Some(12.5));
        assert!(!table.rows()[0].contains("Cost"));
    }

    #[test]
    fn test_rename_column_refuses_collision() {
        let mut table = Table::with_columns(["spend", "cost"]);
        assert!(!table.rename_column("cost", "spend"));
        assert_eq!(table.columns(), &["spend", "cost"]);
    }

    #[test]
    fn test_missing_cells_read_as_none() {
        let mut table = Table::with_columns(["clicks"]);
        table.push_row(Row::new());
        let mut row = Row::new();
        row.set("clicks", 3.0);
        table.push_row(row);

        let clicks: Vec<Option<f64>> = table.numbers("clicks").collect();
        assert_eq!(clicks, vec![None, Some(3.0)]);
    }
}
