//! Parameter binder: application values → wire-format binding slots.
//!
//! The returned slots hold the encoded bytes and stay valid for exactly
//! one bind + execute call; ownership is scoped to that call frame, never
//! to the statement.

use bytes::{BufMut, BytesMut};

use crate::error::{Error, Result};
use crate::protocol::constants::*;
use crate::protocol::decode::encode_datetime;
use crate::protocol::types::Value;

use super::BindSlot;

/// Encode `values` as parameter slots for a statement with `expected`
/// placeholders.
///
/// # Errors
/// - `ParameterCountMismatch` when the counts differ; no padding or
///   truncation is ever attempted.
/// - `UnsupportedValueKind` for binary and time-difference values.
/// - `ValueOutOfRange` for integers that do not fit the 64-bit wire type.
pub fn encode_params(expected: usize, values: &[Value]) -> Result<Vec<BindSlot>> {
    if values.len() != expected {
        return Err(Error::ParameterCountMismatch {
            expected,
            actual: values.len(),
        });
    }
    values.iter().map(encode_param).collect()
}

/// Encode one value as a parameter slot with the most specific wire type.
fn encode_param(value: &Value) -> Result<BindSlot> {
    let slot = match value {
        Value::Null => BindSlot::null_param(),
        Value::Text(s) => {
            BindSlot::for_param(MYSQL_TYPE_VAR_STRING, BytesMut::from(s.as_bytes()))
        }
        Value::Bool(b) => {
            let mut buf = BytesMut::with_capacity(1);
            buf.put_u8(*b as u8);
            BindSlot::for_param(MYSQL_TYPE_TINY, buf)
        }
        Value::Char(c) => {
            let mut buf = BytesMut::with_capacity(1);
            buf.put_u8(*c);
            BindSlot::for_param(MYSQL_TYPE_TINY, buf)
        }
        Value::Int32(v) => {
            let mut buf = BytesMut::with_capacity(WIRE_SIZE_LONG);
            buf.put_i32_le(*v);
            BindSlot::for_param(MYSQL_TYPE_LONG, buf)
        }
        Value::UInt32(v) => {
            let mut buf = BytesMut::with_capacity(WIRE_SIZE_LONG);
            buf.put_u32_le(*v);
            BindSlot::for_param(MYSQL_TYPE_LONG, buf)
        }
        Value::Int64(v) => {
            let mut buf = BytesMut::with_capacity(WIRE_SIZE_LONGLONG);
            buf.put_i64_le(*v);
            BindSlot::for_param(MYSQL_TYPE_LONGLONG, buf)
        }
        Value::BigInt(v) => {
            let v = i64::try_from(*v).map_err(|_| {
                Error::out_of_range(format!("integer {} exceeds the 64-bit wire type", v))
            })?;
            let mut buf = BytesMut::with_capacity(WIRE_SIZE_LONGLONG);
            buf.put_i64_le(v);
            BindSlot::for_param(MYSQL_TYPE_LONGLONG, buf)
        }
        Value::UInt64(v) => {
            let mut buf = BytesMut::with_capacity(WIRE_SIZE_LONGLONG);
            buf.put_u64_le(*v);
            BindSlot::for_param(MYSQL_TYPE_LONGLONG, buf)
        }
        Value::Double(v) => {
            let mut buf = BytesMut::with_capacity(WIRE_SIZE_DOUBLE);
            buf.put_f64_le(*v);
            BindSlot::for_param(MYSQL_TYPE_DOUBLE, buf)
        }
        Value::Rational { numer, denom } => {
            if *denom == 0 {
                return Err(Error::out_of_range(format!(
                    "rational {}/0 has no double representation",
                    numer
                )));
            }
            let mut buf = BytesMut::with_capacity(WIRE_SIZE_DOUBLE);
            buf.put_f64_le(*numer as f64 / *denom as f64);
            BindSlot::for_param(MYSQL_TYPE_DOUBLE, buf)
        }
        Value::Timestamp(secs) => {
            let data = encode_datetime(*secs)?;
            BindSlot::for_param(MYSQL_TYPE_DATETIME, BytesMut::from(&data[..]))
        }
        Value::Duration(_) => {
            return Err(Error::UnsupportedValueKind {
                kind: "time difference",
            })
        }
        Value::Bytes(_) => {
            return Err(Error::UnsupportedValueKind {
                kind: "opaque binary",
            })
        }
    };
    Ok(slot)
}
