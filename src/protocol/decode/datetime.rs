//! Datetime struct codec.
//!
//! Temporal values cross the wire as a fixed 7-byte struct:
//! - bytes[0..2]: year, little-endian u16
//! - byte[2]: month (1-12)
//! - byte[3]: day (1-31)
//! - byte[4]: hour (0-23)
//! - byte[5]: minute (0-59)
//! - byte[6]: second (0-59)
//!
//! The driver treats the server's calendar fields as UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};

use crate::error::{Error, Result};
use crate::protocol::constants::WIRE_SIZE_DATETIME;

/// Decode a 7-byte datetime struct into seconds since the Unix epoch.
///
/// # Errors
/// Returns `Error::Decode` if `data` is shorter than 7 bytes or any field
/// is out of calendar range.
pub fn decode_datetime(data: &[u8]) -> Result<i64> {
    if data.len() < WIRE_SIZE_DATETIME {
        return Err(Error::decode(format!(
            "datetime struct must be {} bytes, got {}",
            WIRE_SIZE_DATETIME,
            data.len()
        )));
    }

    let year = u16::from_le_bytes([data[0], data[1]]) as i32;
    let month = data[2] as u32;
    let day = data[3] as u32;
    let hour = data[4] as u32;
    let minute = data[5] as u32;
    let second = data[6] as u32;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::decode(format!(
            "invalid date: year={}, month={}, day={}",
            year, month, day
        ))
    })?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
        Error::decode(format!(
            "invalid time: hour={}, minute={}, second={}",
            hour, minute, second
        ))
    })?;

    Ok(date.and_time(time).and_utc().timestamp())
}

/// Encode seconds since the Unix epoch as the 7-byte datetime struct.
///
/// # Errors
/// Returns `Error::ValueOutOfRange` if the instant is not representable
/// (outside chrono's range or before year 0 / after year 65535).
pub fn encode_datetime(epoch_secs: i64) -> Result<[u8; WIRE_SIZE_DATETIME]> {
    let dt: DateTime<Utc> = DateTime::from_timestamp(epoch_secs, 0)
        .ok_or_else(|| Error::out_of_range(format!("epoch seconds {}", epoch_secs)))?;

    let year = dt.year();
    if !(0..=u16::MAX as i32).contains(&year) {
        return Err(Error::out_of_range(format!(
            "year {} not encodable in datetime struct",
            year
        )));
    }

    let year_bytes = (year as u16).to_le_bytes();
    Ok([
        year_bytes[0],
        year_bytes[1],
        dt.month() as u8,
        dt.day() as u8,
        dt.hour() as u8,
        dt.minute() as u8,
        dt.second() as u8,
    ])
}
