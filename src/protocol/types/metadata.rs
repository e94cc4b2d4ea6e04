//! Column metadata as reported by the server.
//!
//! One descriptor per result/parameter slot, produced when a statement is
//! prepared and immutable for the statement's lifetime. Re-preparing a
//! query yields a fresh set.

use crate::protocol::constants::type_name;

/// Server-reported metadata for one result column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetadata {
    /// Column name.
    pub name: String,
    /// Server column type code (raw wire format).
    pub type_code: u8,
    /// Declared length in bytes.
    pub length: u32,
    /// Maximum observed length in the result set.
    pub max_length: u32,
    /// Decimal-place count for numeric subtypes.
    pub decimals: u32,
}

impl ColumnMetadata {
    /// Create metadata with minimal info.
    pub fn new(name: impl Into<String>, type_code: u8, length: u32) -> Self {
        Self {
            name: name.into(),
            type_code,
            length,
            max_length: 0,
            decimals: 0,
        }
    }

    /// Set the decimal-place count.
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Human-readable name of the column's type code.
    pub fn type_name(&self) -> &'static str {
        type_name(self.type_code)
    }
}
