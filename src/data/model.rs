use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Value – a single converted cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, used when one row mixes converters of
/// different output types (e.g. the same token read as int, string and bool).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

// ---------------------------------------------------------------------------
// Table – parsed lines regrouped by column
// ---------------------------------------------------------------------------

/// Column-oriented result of parsing several lines.
///
/// Column `i` holds the `i`-th converted value of every parsed line, in line
/// order, so all columns always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<T> {
    columns: Vec<Vec<T>>,
}

impl<T> Table<T> {
    /// An empty table with `width` columns.
    pub fn with_width(width: usize) -> Self {
        Table {
            columns: (0..width).map(|_| Vec::new()).collect(),
        }
    }

    /// Append one parsed row. The row must be exactly `width()` long.
    pub(crate) fn push_row(&mut self, row: Vec<T>) {
        debug_assert_eq!(row.len(), self.columns.len());
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of parsed rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Whether no rows were parsed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, i: usize) -> Option<&[T]> {
        self.columns.get(i).map(Vec::as_slice)
    }

    pub fn columns(&self) -> &[Vec<T>] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Vec<T>> {
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_spread_over_columns() {
        let mut table = Table::with_width(2);
        table.push_row(vec![1, 2]);
        table.push_row(vec![3, 4]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.width(), 2);
        assert_eq!(table.column(0), Some(&[1, 3][..]));
        assert_eq!(table.column(1), Some(&[2, 4][..]));
        assert_eq!(table.column(2), None);
    }

    #[test]
    fn zero_width_table_is_empty() {
        let table: Table<Value> = Table::with_width(0);
        assert!(table.is_empty());
        assert!(table.into_columns().is_empty());
    }

    #[test]
    fn value_display_and_string_view() {
        assert_eq!(Value::from(3_i64).to_string(), "3");
        assert_eq!(Value::from("foo").to_string(), "foo");
        assert_eq!(Value::Null.to_string(), "<null>");
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::Integer(2).as_str(), None);
    }

    #[test]
    fn value_serializes_untagged() {
        let row = vec![Value::Integer(1), Value::from("1"), Value::Bool(true)];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[1,"1",true]"#);
    }
}
