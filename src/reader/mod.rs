//! Binary decoding components
//!
//! This module provides the binary decoding layer: varint utilities,
//! primitive and complex value decoders, and the streaming reader.

pub mod decode;
pub mod stream;
pub mod varint;

pub use decode::{
    decode_array, decode_boolean, decode_bytes, decode_double, decode_enum, decode_fixed,
    decode_float, decode_int, decode_long, decode_map, decode_null, decode_record, decode_string,
    decode_union, decode_value, skip_value, AvroValue,
};
pub use stream::{CountingReader, StreamReader};
pub use varint::{decode_varint, decode_zigzag, encode_varint, encode_zigzag, skip_varint};
