//! Binary cell decoders: received per-column buffers → [`Value`]s.

mod datetime;

pub use datetime::{decode_datetime, encode_datetime};

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::protocol::bind::BindSlot;
use crate::protocol::constants::*;
use crate::protocol::types::{ColumnMetadata, Row, Value};

/// Decode one fetched cell from its receive slot.
///
/// A set null flag wins before the buffer is inspected. Unknown wire types
/// decode to a diagnostic text value naming the type code rather than
/// failing; columns the driver cannot fetch should surface in data, not
/// abort the row.
pub fn decode_cell(slot: &BindSlot) -> Result<Value> {
    if slot.is_null {
        return Ok(Value::Null);
    }

    match slot.type_code {
        MYSQL_TYPE_TINY => {
            let data = fixed(slot, 1)?;
            Ok(Value::Int32(data[0] as i8 as i32))
        }
        MYSQL_TYPE_LONG => {
            let data = fixed(slot, WIRE_SIZE_LONG)?;
            Ok(Value::Int32(i32::from_le_bytes([
                data[0], data[1], data[2], data[3],
            ])))
        }
        MYSQL_TYPE_LONGLONG => {
            let data = fixed(slot, WIRE_SIZE_LONGLONG)?;
            let mut raw = [0u8; WIRE_SIZE_LONGLONG];
            raw.copy_from_slice(&data[..WIRE_SIZE_LONGLONG]);
            Ok(Value::Int64(i64::from_le_bytes(raw)))
        }
        MYSQL_TYPE_DOUBLE => {
            let data = fixed(slot, WIRE_SIZE_DOUBLE)?;
            let mut raw = [0u8; WIRE_SIZE_DOUBLE];
            raw.copy_from_slice(&data[..WIRE_SIZE_DOUBLE]);
            Ok(Value::Double(f64::from_le_bytes(raw)))
        }
        MYSQL_TYPE_DATETIME => Ok(Value::Timestamp(decode_datetime(slot.data())?)),
        MYSQL_TYPE_VARCHAR | MYSQL_TYPE_VAR_STRING | MYSQL_TYPE_STRING | MYSQL_TYPE_SET
        | MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB
        | MYSQL_TYPE_BLOB => {
            // Text runs to the first nul or the end of the valid bytes,
            // whichever comes first.
            let data = slot.data();
            let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
            Ok(Value::Text(
                String::from_utf8_lossy(&data[..end]).into_owned(),
            ))
        }
        other => Ok(Value::Text(format!("<unsupported column type {}>", other))),
    }
}

/// Decode a full row from its receive slots.
pub fn decode_row(slots: &[BindSlot], columns: Arc<Vec<ColumnMetadata>>) -> Result<Row> {
    let values = slots.iter().map(decode_cell).collect::<Result<Vec<_>>>()?;
    Ok(Row::new(values, columns))
}

fn fixed(slot: &BindSlot, width: usize) -> Result<&[u8]> {
    let data = slot.data();
    if data.len() < width {
        return Err(Error::decode(format!(
            "{} cell needs {} bytes, buffer holds {}",
            type_name(slot.type_code),
            width,
            data.len()
        )));
    }
    Ok(data)
}
