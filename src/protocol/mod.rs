//! Binary protocol core: type mapping, binding descriptors and cell
//! decoding for the prepared-statement execution pipeline.

pub mod bind;
pub mod constants;
pub mod decode;
pub mod type_map;
pub mod types;

pub use bind::{allocate_result_slots, encode_params, BindSlot};
pub use decode::{decode_cell, decode_row};
pub use type_map::{buffer_size_for, wire_type_for};
pub use types::{ColumnMetadata, Row, Value};
