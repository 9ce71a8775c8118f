/// Query Module
///
/// Scalar values, rows, and the statement text the handler executes. Table
/// names and condition clauses are interpolated as given; row values only
/// ever appear as `?` placeholders.

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single column value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Copies a borrowed SQLite value out of a result row.
    pub fn from_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            Value::Null => ValueRef::Null,
            Value::Integer(i) => ValueRef::Integer(*i),
            Value::Real(f) => ValueRef::Real(*f),
            Value::Text(s) => ValueRef::Text(s.as_bytes()),
            Value::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Blob(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A record: column names mapped to values, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    /// Creates a new, empty row.
    pub fn new() -> Self {
        Row { fields: Vec::new() }
    }

    /// Builder form of [`Row::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets a column. An existing column keeps its position.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a row with `f` applied to every value.
    pub fn map_values<F>(&self, mut f: F) -> Row
    where
        F: FnMut(&Value) -> Value,
    {
        Row {
            fields: self
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), f(value)))
                .collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// `INSERT INTO <table> (<c1>, <c2>) VALUES (?, ?)`
pub fn insert_sql(table: &str, row: &Row) -> String {
    let columns = row.columns().collect::<Vec<_>>().join(", ");
    let placeholders = vec!["?"; row.len()].join(", ");
    format!("INSERT INTO {} ({}) VALUES ({})", table, columns, placeholders)
}

/// `SELECT * FROM <table>`, with ` WHERE <conditions>` when conditions are given.
pub fn select_sql(table: &str, conditions: &str) -> String {
    let mut sql = format!("SELECT * FROM {}", table);
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(conditions);
    }
    sql
}

/// `UPDATE <table> SET c1 = ?, c2 = ? WHERE <conditions>`
pub fn update_sql(table: &str, row: &Row, conditions: &str) -> String {
    let set = row
        .columns()
        .map(|column| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {} SET {} WHERE {}", table, set, conditions)
}

/// `DELETE FROM <table> WHERE <conditions>`
pub fn delete_sql(table: &str, conditions: &str) -> String {
    format!("DELETE FROM {} WHERE {}", table, conditions)
}
