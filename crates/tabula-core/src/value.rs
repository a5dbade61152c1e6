//! Field value types

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// A single decoded field of a row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Missing value (zero-width field, or a temporal NaN)
    Null,

    /// Trimmed text
    Character(String),

    /// Numeric value (narrow encodings are widened to f64)
    Numeric(f64),

    /// Calendar date
    Date(NaiveDate),

    /// Full timestamp.
    ///
    /// Produced when a TIME column holds a value that only makes sense as
    /// seconds since the epoch.
    DateTime(NaiveDateTime),

    /// Time of day
    Time(NaiveTime),
}

impl Value {
    /// Create a new character value
    pub fn character<S: Into<String>>(s: S) -> Self {
        Value::Character(s.into())
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Character(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a date (timestamps yield their date part)
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    /// Try to get the value as a time of day
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            Value::DateTime(dt) => Some(dt.time()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, ""),
            Value::Character(s) => write!(f, "{}", s),
            Value::Numeric(n) if n.is_nan() => write!(f, "."),
            Value::Numeric(n) => write!(f, "{}", n),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.3f")),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Numeric(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Character(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Character(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
