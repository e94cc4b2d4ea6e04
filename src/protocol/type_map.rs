//! Mapping from server column types to requested wire types and buffer
//! sizes.
//!
//! When fetching, the client tells the server what binary format it wants
//! each column delivered in. Narrow integer subtypes are widened to one
//! 4-byte integer format, exact numerics without decimal places are read
//! as 64-bit integers, and the calendar types collapse into the single
//! datetime struct format.

use crate::protocol::constants::*;

/// Wire type to request when fetching a column of the given server type.
pub fn wire_type_for(server_type: u8, decimals: u32) -> u8 {
    match server_type {
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_YEAR
        | MYSQL_TYPE_ENUM => MYSQL_TYPE_LONG,
        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => {
            if decimals == 0 {
                MYSQL_TYPE_LONGLONG
            } else {
                MYSQL_TYPE_DOUBLE
            }
        }
        MYSQL_TYPE_FLOAT => MYSQL_TYPE_DOUBLE,
        MYSQL_TYPE_DATE | MYSQL_TYPE_TIMESTAMP | MYSQL_TYPE_NEWDATE => MYSQL_TYPE_DATETIME,
        other => other,
    }
}

/// Receive-buffer size for one value of the given wire type.
///
/// Fixed-width formats get their exact width; everything else is sized
/// from the server-declared length. A variable-length value longer than
/// its declaration does not fit and surfaces as the truncated fetch
/// status.
pub fn buffer_size_for(wire_type: u8, declared_len: u32) -> usize {
    match wire_type {
        MYSQL_TYPE_LONG => WIRE_SIZE_LONG,
        MYSQL_TYPE_DOUBLE => WIRE_SIZE_DOUBLE,
        _ => declared_len as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_integers_widen_to_long() {
        for t in [
            MYSQL_TYPE_TINY,
            MYSQL_TYPE_SHORT,
            MYSQL_TYPE_INT24,
            MYSQL_TYPE_YEAR,
            MYSQL_TYPE_ENUM,
        ] {
            assert_eq!(wire_type_for(t, 0), MYSQL_TYPE_LONG);
        }
    }

    #[test]
    fn test_decimal_depends_on_scale() {
        assert_eq!(wire_type_for(MYSQL_TYPE_DECIMAL, 0), MYSQL_TYPE_LONGLONG);
        assert_eq!(wire_type_for(MYSQL_TYPE_NEWDECIMAL, 0), MYSQL_TYPE_LONGLONG);
        assert_eq!(wire_type_for(MYSQL_TYPE_DECIMAL, 2), MYSQL_TYPE_DOUBLE);
        assert_eq!(wire_type_for(MYSQL_TYPE_NEWDECIMAL, 4), MYSQL_TYPE_DOUBLE);
    }

    #[test]
    fn test_float_widens_to_double() {
        assert_eq!(wire_type_for(MYSQL_TYPE_FLOAT, 0), MYSQL_TYPE_DOUBLE);
    }

    #[test]
    fn test_calendar_types_unify() {
        for t in [MYSQL_TYPE_DATE, MYSQL_TYPE_TIMESTAMP, MYSQL_TYPE_NEWDATE] {
            assert_eq!(wire_type_for(t, 0), MYSQL_TYPE_DATETIME);
        }
    }

    #[test]
    fn test_passthrough_types() {
        for t in [
            MYSQL_TYPE_LONG,
            MYSQL_TYPE_LONGLONG,
            MYSQL_TYPE_DOUBLE,
            MYSQL_TYPE_DATETIME,
            MYSQL_TYPE_VAR_STRING,
            MYSQL_TYPE_STRING,
            MYSQL_TYPE_BLOB,
            MYSQL_TYPE_TIME,
            MYSQL_TYPE_BIT,
        ] {
            assert_eq!(wire_type_for(t, 0), t);
        }
    }

    #[test]
    fn test_buffer_sizes() {
        assert_eq!(buffer_size_for(MYSQL_TYPE_LONG, 11), 4);
        assert_eq!(buffer_size_for(MYSQL_TYPE_DOUBLE, 22), 8);
        assert_eq!(buffer_size_for(MYSQL_TYPE_VAR_STRING, 100), 100);
        assert_eq!(buffer_size_for(MYSQL_TYPE_LONGLONG, 21), 21);
        assert_eq!(buffer_size_for(MYSQL_TYPE_DATETIME, 19), 19);
    }
}
