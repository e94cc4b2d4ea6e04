//! Dynamically-typed SQL values for parameters and query results.

use std::fmt;

/// A single SQL value, as sent to or received from the server.
///
/// Exactly one case is active at a time. Every case reachable from server
/// column metadata decodes totally; the two cases the binder does not
/// transmit (`Bytes`, `Duration`) fail loudly at bind time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Variable-length string (VARCHAR, TEXT, CHAR, ...).
    Text(String),
    /// Boolean, transmitted as a single byte.
    Bool(bool),
    /// Single-byte character.
    Char(u8),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Arbitrary-precision integer. Binds through the 64-bit wire type;
    /// values outside that range are rejected rather than truncated.
    BigInt(i128),
    /// 32-bit unsigned integer.
    UInt32(u32),
    /// 64-bit unsigned integer.
    UInt64(u64),
    /// Double-precision float.
    Double(f64),
    /// Exact rational, transmitted as a double.
    Rational { numer: i64, denom: i64 },
    /// Point in time as seconds since the Unix epoch (UTC).
    Timestamp(i64),
    /// Time difference in seconds. Not yet bindable.
    Duration(i64),
    /// Opaque binary data. Not yet bindable.
    Bytes(Vec<u8>),
}

impl Value {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(*b as i64),
            Value::Char(c) => Some(*c as i64),
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::BigInt(v) => i64::try_from(*v).ok(),
            Value::UInt32(v) => Some(*v as i64),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::Timestamp(v) | Value::Duration(v) => Some(*v),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(v) => Some(*v as f64),
            Value::Int64(v) => Some(*v as f64),
            Value::BigInt(v) => Some(*v as f64),
            Value::UInt32(v) => Some(*v as f64),
            Value::UInt64(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::Rational { numer, denom } if *denom != 0 => {
                Some(*numer as f64 / *denom as f64)
            }
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", *c as char),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Rational { numer, denom } => write!(f, "{}/{}", numer, denom),
            Value::Timestamp(secs) => write!(f, "@{}", secs),
            Value::Duration(secs) => write!(f, "{}s", secs),
            Value::Bytes(b) => write!(f, "<binary: {} bytes>", b.len()),
        }
    }
}
