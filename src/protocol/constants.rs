//! Binary protocol constants.
//!
//! Type codes match the server's `enum_field_types` numbering; the binary
//! row format relies on them being transmitted verbatim.

// Column/wire type codes
pub const MYSQL_TYPE_DECIMAL: u8 = 0;
pub const MYSQL_TYPE_TINY: u8 = 1;
pub const MYSQL_TYPE_SHORT: u8 = 2;
pub const MYSQL_TYPE_LONG: u8 = 3;
pub const MYSQL_TYPE_FLOAT: u8 = 4;
pub const MYSQL_TYPE_DOUBLE: u8 = 5;
pub const MYSQL_TYPE_NULL: u8 = 6;
pub const MYSQL_TYPE_TIMESTAMP: u8 = 7;
pub const MYSQL_TYPE_LONGLONG: u8 = 8;
pub const MYSQL_TYPE_INT24: u8 = 9;
pub const MYSQL_TYPE_DATE: u8 = 10;
pub const MYSQL_TYPE_TIME: u8 = 11;
pub const MYSQL_TYPE_DATETIME: u8 = 12;
pub const MYSQL_TYPE_YEAR: u8 = 13;
pub const MYSQL_TYPE_NEWDATE: u8 = 14;
pub const MYSQL_TYPE_VARCHAR: u8 = 15;
pub const MYSQL_TYPE_BIT: u8 = 16;
pub const MYSQL_TYPE_NEWDECIMAL: u8 = 246;
pub const MYSQL_TYPE_ENUM: u8 = 247;
pub const MYSQL_TYPE_SET: u8 = 248;
pub const MYSQL_TYPE_TINY_BLOB: u8 = 249;
pub const MYSQL_TYPE_MEDIUM_BLOB: u8 = 250;
pub const MYSQL_TYPE_LONG_BLOB: u8 = 251;
pub const MYSQL_TYPE_BLOB: u8 = 252;
pub const MYSQL_TYPE_VAR_STRING: u8 = 253;
pub const MYSQL_TYPE_STRING: u8 = 254;
pub const MYSQL_TYPE_GEOMETRY: u8 = 255;

// Fixed wire widths
pub const WIRE_SIZE_LONG: usize = 4;
pub const WIRE_SIZE_LONGLONG: usize = 8;
pub const WIRE_SIZE_DOUBLE: usize = 8;

/// Encoded size of the datetime struct: year (u16 LE), month, day, hour,
/// minute, second.
pub const WIRE_SIZE_DATETIME: usize = 7;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3306;

/// Human-readable name for a wire type code, for diagnostics.
pub fn type_name(code: u8) -> &'static str {
    match code {
        MYSQL_TYPE_DECIMAL => "DECIMAL",
        MYSQL_TYPE_TINY => "TINY",
        MYSQL_TYPE_SHORT => "SHORT",
        MYSQL_TYPE_LONG => "LONG",
        MYSQL_TYPE_FLOAT => "FLOAT",
        MYSQL_TYPE_DOUBLE => "DOUBLE",
        MYSQL_TYPE_NULL => "NULL",
        MYSQL_TYPE_TIMESTAMP => "TIMESTAMP",
        MYSQL_TYPE_LONGLONG => "LONGLONG",
        MYSQL_TYPE_INT24 => "INT24",
        MYSQL_TYPE_DATE => "DATE",
        MYSQL_TYPE_TIME => "TIME",
        MYSQL_TYPE_DATETIME => "DATETIME",
        MYSQL_TYPE_YEAR => "YEAR",
        MYSQL_TYPE_NEWDATE => "NEWDATE",
        MYSQL_TYPE_VARCHAR => "VARCHAR",
        MYSQL_TYPE_BIT => "BIT",
        MYSQL_TYPE_NEWDECIMAL => "NEWDECIMAL",
        MYSQL_TYPE_ENUM => "ENUM",
        MYSQL_TYPE_SET => "SET",
        MYSQL_TYPE_TINY_BLOB => "TINY_BLOB",
        MYSQL_TYPE_MEDIUM_BLOB => "MEDIUM_BLOB",
        MYSQL_TYPE_LONG_BLOB => "LONG_BLOB",
        MYSQL_TYPE_BLOB => "BLOB",
        MYSQL_TYPE_VAR_STRING => "VAR_STRING",
        MYSQL_TYPE_STRING => "STRING",
        MYSQL_TYPE_GEOMETRY => "GEOMETRY",
        _ => "UNKNOWN",
    }
}
