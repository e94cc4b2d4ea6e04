//! Binding descriptors for binary parameter transmission and row receive.
//!
//! A [`BindSlot`] carries one parameter or column value in binary form:
//! the raw cell buffer plus the length, null and error cells the transport
//! reads or writes around it. Parameter slots are scratch owned by a
//! single execute call; result slots are owned by the statement and
//! overwritten in place on every fetch.

mod params;
mod results;

pub use params::encode_params;
pub use results::allocate_result_slots;

use bytes::BytesMut;

use crate::protocol::constants::MYSQL_TYPE_NULL;

/// Buffer + metadata descriptor for one parameter or column value.
#[derive(Debug, Clone)]
pub struct BindSlot {
    /// Wire type code for the cell.
    pub type_code: u8,
    /// Owned cell buffer.
    pub buffer: BytesMut,
    /// Valid byte count within the buffer. On fetch the server reports the
    /// value's true length here, which may exceed `capacity`.
    pub length: u32,
    /// NULL indicator cell.
    pub is_null: bool,
    /// Set by fetch when the cell did not fit the buffer.
    pub error: bool,
    /// Fixed buffer capacity.
    pub capacity: usize,
}

impl BindSlot {
    /// Create a parameter slot carrying an encoded value.
    pub fn for_param(type_code: u8, buffer: BytesMut) -> Self {
        let capacity = buffer.len();
        Self {
            type_code,
            length: capacity as u32,
            is_null: false,
            error: false,
            capacity,
            buffer,
        }
    }

    /// Create a parameter slot carrying SQL NULL.
    pub fn null_param() -> Self {
        Self {
            type_code: MYSQL_TYPE_NULL,
            buffer: BytesMut::new(),
            length: 0,
            is_null: true,
            error: false,
            capacity: 0,
        }
    }

    /// Create a zeroed receive slot of the given capacity.
    pub fn for_result(type_code: u8, capacity: usize) -> Self {
        Self {
            type_code,
            buffer: BytesMut::zeroed(capacity),
            length: 0,
            is_null: false,
            error: false,
            capacity,
        }
    }

    /// The valid bytes of the cell, clamped to the buffer capacity.
    pub fn data(&self) -> &[u8] {
        let len = (self.length as usize).min(self.capacity).min(self.buffer.len());
        &self.buffer[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::MYSQL_TYPE_VAR_STRING;

    #[test]
    fn test_param_slot_owns_encoded_bytes() {
        let slot = BindSlot::for_param(MYSQL_TYPE_VAR_STRING, BytesMut::from(&b"abc"[..]));
        assert_eq!(slot.length, 3);
        assert_eq!(slot.capacity, 3);
        assert!(!slot.is_null);
        assert_eq!(slot.data(), b"abc");
    }

    #[test]
    fn test_null_param_slot() {
        let slot = BindSlot::null_param();
        assert_eq!(slot.type_code, MYSQL_TYPE_NULL);
        assert!(slot.is_null);
        assert_eq!(slot.data(), b"");
    }

    #[test]
    fn test_result_slot_zeroed() {
        let slot = BindSlot::for_result(MYSQL_TYPE_VAR_STRING, 8);
        assert_eq!(slot.capacity, 8);
        assert_eq!(&slot.buffer[..], &[0u8; 8]);
    }

    #[test]
    fn test_data_clamps_overlong_length() {
        let mut slot = BindSlot::for_result(MYSQL_TYPE_VAR_STRING, 4);
        slot.buffer[..4].copy_from_slice(b"abcd");
        slot.length = 100;
        assert_eq!(slot.data(), b"abcd");
    }
}
