use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::cmp::Ordering;
use std::fmt;

/// Semantic type of a column. Drives alignment and JSON encoding only,
/// values are never coerced when a row is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    String,
    Float,
    Bool,
    Date,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

/// A column definition: display label, type and minimum width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    pub min_width: usize,
}

impl Column {
    pub fn new<S: Into<String>>(name: S, kind: ColumnType, min_width: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            min_width,
        }
    }

    pub fn int<S: Into<String>>(name: S, min_width: usize) -> Self {
        Self::new(name, ColumnType::Int, min_width)
    }

    pub fn string<S: Into<String>>(name: S, min_width: usize) -> Self {
        Self::new(name, ColumnType::String, min_width)
    }

    pub fn float<S: Into<String>>(name: S, min_width: usize) -> Self {
        Self::new(name, ColumnType::Float, min_width)
    }

    pub fn bool<S: Into<String>>(name: S, min_width: usize) -> Self {
        Self::new(name, ColumnType::Bool, min_width)
    }

    pub fn date<S: Into<String>>(name: S, min_width: usize) -> Self {
        Self::new(name, ColumnType::Date, min_width)
    }
}

/// A single loosely typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Date(DateTime<FixedOffset>),
    Null,
}

impl Value {
    /// Parse an API timestamp into a date value, keeping the raw text when it
    /// is not RFC 3339 and mapping empty text to `Null`. The offset and the
    /// fractional seconds are kept as given.
    pub fn timestamp(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Null;
        }
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Value::Date(parsed),
            Err(_) => Value::Str(raw.to_string()),
        }
    }

    /// Text used by the human-readable renderer
    pub fn display_text(&self) -> String {
        match self {
            Value::Float(f) => format!("{:.2}", f),
            other => other.to_string(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Date(_) => 3,
            Value::Str(_) => 4,
        }
    }

    /// Total order used for sorting rows. Values of different kinds order by
    /// kind (null, bool, number, date, text) before their contents.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Null => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
