//! Result binder: server field descriptors → persistent receive slots.

use crate::protocol::type_map::{buffer_size_for, wire_type_for};
use crate::protocol::types::ColumnMetadata;

use super::BindSlot;

/// Allocate one receive slot per column, typed and sized from the server
/// metadata.
///
/// Allocation is eager and happens once per prepared statement; the slots
/// are overwritten in place on every fetch, trading resident memory for
/// zero per-row allocation. Buffers for variable-length columns rely on
/// the declared/max length being sufficient; values longer than both
/// arrive truncated (see the fetch status contract).
pub fn allocate_result_slots(columns: &[ColumnMetadata]) -> Vec<BindSlot> {
    columns
        .iter()
        .map(|col| {
            let wire_type = wire_type_for(col.type_code, col.decimals);
            let capacity = buffer_size_for(wire_type, col.length.max(col.max_length));
            BindSlot::for_result(wire_type, capacity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::*;

    #[test]
    fn test_no_columns_no_slots() {
        assert!(allocate_result_slots(&[]).is_empty());
    }

    #[test]
    fn test_slot_types_and_sizes_follow_metadata() {
        let columns = vec![
            ColumnMetadata::new("id", MYSQL_TYPE_TINY, 4),
            ColumnMetadata::new("total", MYSQL_TYPE_NEWDECIMAL, 12).with_decimals(2),
            ColumnMetadata::new("name", MYSQL_TYPE_VAR_STRING, 64),
            ColumnMetadata::new("created", MYSQL_TYPE_TIMESTAMP, 19),
        ];
        let slots = allocate_result_slots(&columns);

        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].type_code, MYSQL_TYPE_LONG);
        assert_eq!(slots[0].capacity, 4);
        assert_eq!(slots[1].type_code, MYSQL_TYPE_DOUBLE);
        assert_eq!(slots[1].capacity, 8);
        assert_eq!(slots[2].type_code, MYSQL_TYPE_VAR_STRING);
        assert_eq!(slots[2].capacity, 64);
        assert_eq!(slots[3].type_code, MYSQL_TYPE_DATETIME);
        assert_eq!(slots[3].capacity, 19);
    }

    #[test]
    fn test_max_observed_length_widens_buffer() {
        let mut col = ColumnMetadata::new("note", MYSQL_TYPE_VAR_STRING, 16);
        col.max_length = 40;
        let slots = allocate_result_slots(&[col]);
        assert_eq!(slots[0].capacity, 40);
    }

    #[test]
    fn test_slots_start_clear() {
        let columns = vec![ColumnMetadata::new("n", MYSQL_TYPE_LONG, 11)];
        let slots = allocate_result_slots(&columns);
        assert!(!slots[0].is_null);
        assert!(!slots[0].error);
        assert_eq!(slots[0].length, 0);
        assert_eq!(&slots[0].buffer[..], &[0u8; 4]);
    }
}
