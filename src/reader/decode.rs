//! Avro binary decoder for primitive and complex types.
//!
//! Decoders follow the Avro specification for binary encoding:
//! - Ints and longs are zigzag-encoded varints
//! - Floats and doubles are little-endian IEEE 754
//! - Bytes and strings are length-prefixed
//! - Arrays and maps are sequences of counted blocks
//!
//! All decoders read from a `std::io::Read` source and consume exactly the
//! bytes of the value they decode.

use std::io::Read;

use crate::error::DecodeError;
use crate::reader::varint;
use crate::schema::{AvroSchema, EnumSchema, RecordSchema, TypeRegistry};

/// Decode a null value (no-op, consumes no bytes).
#[inline]
pub fn decode_null<R: Read>(_reader: &mut R) -> Result<(), DecodeError> {
    Ok(())
}

/// Decode a boolean value.
///
/// One byte: 0x00 is false, any other value reads as true.
#[inline]
pub fn decode_boolean<R: Read>(reader: &mut R) -> Result<bool, DecodeError> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0] != 0)
}

/// Decode a 32-bit signed integer (zigzag varint encoded).
///
/// The value is decoded as a long first, then checked against the signed
/// 32-bit range.
#[inline]
pub fn decode_int<R: Read>(reader: &mut R) -> Result<i32, DecodeError> {
    let long = decode_long(reader)?;
    if long < i32::MIN as i64 || long > i32::MAX as i64 {
        return Err(DecodeError::OutOfRange(format!(
            "{} does not fit in a 32-bit integer",
            long
        )));
    }
    Ok(long as i32)
}

/// Decode a 64-bit signed integer (zigzag varint encoded).
#[inline]
pub fn decode_long<R: Read>(reader: &mut R) -> Result<i64, DecodeError> {
    varint::decode_zigzag(reader)
}

/// Decode a 32-bit IEEE 754 floating-point number (little-endian).
#[inline]
pub fn decode_float<R: Read>(reader: &mut R) -> Result<f32, DecodeError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Decode a 64-bit IEEE 754 floating-point number (little-endian).
#[inline]
pub fn decode_double<R: Read>(reader: &mut R) -> Result<f64, DecodeError> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Decode a byte array (long length prefix, then that many bytes).
#[inline]
pub fn decode_bytes<R: Read>(reader: &mut R) -> Result<Vec<u8>, DecodeError> {
    let len = decode_long(reader)?;
    if len < 0 {
        return Err(DecodeError::OutOfRange(format!(
            "negative bytes length: {}",
            len
        )));
    }

    let mut bytes = vec![0u8; len as usize];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Decode a UTF-8 string (long length prefix, then that many UTF-8 bytes).
///
/// Invalid UTF-8 is an error.
#[inline]
pub fn decode_string<R: Read>(reader: &mut R) -> Result<String, DecodeError> {
    let bytes = decode_bytes(reader)?;
    String::from_utf8(bytes).map_err(DecodeError::from)
}

/// Decode a fixed-size byte array of exactly `size` bytes.
#[inline]
pub fn decode_fixed<R: Read>(reader: &mut R, size: usize) -> Result<Vec<u8>, DecodeError> {
    let mut bytes = vec![0u8; size];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

// ============================================================================
// Decoded values
// ============================================================================

/// A decoded Avro value.
///
/// Record fields and map entries keep wire order. Enum and union variants
/// carry the wire index alongside the decoded payload; `to_json` flattens
/// both.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroValue {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// Byte array
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Record fields in declaration order
    Record(Vec<(String, AvroValue)>),
    /// Enum variant (wire index and symbol name)
    Enum(i32, String),
    /// Array of values
    Array(Vec<AvroValue>),
    /// Map entries in wire order
    Map(Vec<(String, AvroValue)>),
    /// Union variant (branch index and value)
    Union(i32, Box<AvroValue>),
    /// Fixed-size byte array
    Fixed(Vec<u8>),
}

impl AvroValue {
    /// Project the value tree onto `serde_json::Value`.
    ///
    /// Bytes and fixed values are base64-encoded; enum values become their
    /// symbol; union values collapse to the selected branch. Non-finite
    /// floats become JSON null.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::{Map, Value};

        match self {
            AvroValue::Null => Value::Null,
            AvroValue::Boolean(b) => Value::Bool(*b),
            AvroValue::Int(i) => Value::Number((*i).into()),
            AvroValue::Long(l) => Value::Number((*l).into()),
            AvroValue::Float(f) => serde_json::Number::from_f64(*f as f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AvroValue::Double(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AvroValue::Bytes(b) | AvroValue::Fixed(b) => Value::String(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                b,
            )),
            AvroValue::String(s) => Value::String(s.clone()),
            AvroValue::Record(fields) => {
                let mut map = Map::new();
                for (name, value) in fields {
                    map.insert(name.clone(), value.to_json());
                }
                Value::Object(map)
            }
            AvroValue::Enum(_index, symbol) => Value::String(symbol.clone()),
            AvroValue::Array(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            AvroValue::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json());
                }
                Value::Object(map)
            }
            AvroValue::Union(_index, value) => value.to_json(),
        }
    }
}

// ============================================================================
// Complex type decoders
// ============================================================================

/// Decode an enum value.
///
/// The wire form is an int index into the symbol list. An index past the
/// end of the list falls back to the declared default symbol when one
/// exists; a negative index is always an error.
pub fn decode_enum<R: Read>(
    reader: &mut R,
    schema: &EnumSchema,
) -> Result<(i32, String), DecodeError> {
    let index = decode_int(reader)?;

    if index >= 0 && (index as usize) < schema.symbols.len() {
        return Ok((index, schema.symbols[index as usize].clone()));
    }
    if index >= 0 {
        if let Some(default) = &schema.default {
            return Ok((index, default.clone()));
        }
    }
    Err(DecodeError::OutOfRange(format!(
        "no symbol at index {} in enum '{}' with {} symbols",
        index,
        schema.name,
        schema.symbols.len()
    )))
}

/// Decode a union value: an int branch index, then the branch payload.
pub fn decode_union<R: Read>(
    reader: &mut R,
    branches: &[AvroSchema],
    types: &TypeRegistry,
) -> Result<(i32, AvroValue), DecodeError> {
    let index = decode_int(reader)?;

    if index < 0 || index as usize >= branches.len() {
        return Err(DecodeError::OutOfRange(format!(
            "union has no branch with index {} (0..{})",
            index,
            branches.len()
        )));
    }

    let value = decode_value(reader, &branches[index as usize], types)?;
    Ok((index, value))
}

/// Decode a record: field values concatenated in declaration order.
///
/// A failure inside a field is wrapped with the field and record name.
pub fn decode_record<R: Read>(
    reader: &mut R,
    schema: &RecordSchema,
    types: &TypeRegistry,
) -> Result<Vec<(String, AvroValue)>, DecodeError> {
    let mut fields = Vec::with_capacity(schema.fields.len());

    for field in &schema.fields {
        let value = decode_value(reader, &field.schema, types).map_err(|e| {
            e.with_context(format!(
                "field '{}' of record '{}'",
                field.name, schema.name
            ))
        })?;
        fields.push((field.name.clone(), value));
    }

    Ok(fields)
}

/// Read the item count of the next array/map block.
///
/// Returns `None` for the zero terminator. A negative count means |count|
/// items preceded by a byte-size hint, which is read and discarded; the
/// hint only matters when skipping.
fn next_block_count<R: Read>(reader: &mut R) -> Result<Option<usize>, DecodeError> {
    let count = decode_long(reader)?;
    if count == 0 {
        return Ok(None);
    }
    if count < 0 {
        decode_long(reader)?;
        // i64::MIN would overflow negation; no real writer produces it
        return Ok(Some(count.unsigned_abs() as usize));
    }
    Ok(Some(count as usize))
}

/// Decode an array: one or more counted blocks terminated by a zero count.
///
/// Items from every block accumulate into a single sequence.
pub fn decode_array<R: Read>(
    reader: &mut R,
    item_schema: &AvroSchema,
    types: &TypeRegistry,
) -> Result<Vec<AvroValue>, DecodeError> {
    let mut items = Vec::new();

    while let Some(count) = next_block_count(reader)? {
        items.reserve(count);
        for _ in 0..count {
            let value = decode_value(reader, item_schema, types)
                .map_err(|e| e.with_context(format!("array item {}", items.len())))?;
            items.push(value);
        }
    }

    Ok(items)
}

/// Decode a map: blocks of key-value pairs, each key a string.
pub fn decode_map<R: Read>(
    reader: &mut R,
    value_schema: &AvroSchema,
    types: &TypeRegistry,
) -> Result<Vec<(String, AvroValue)>, DecodeError> {
    let mut entries = Vec::new();

    while let Some(count) = next_block_count(reader)? {
        entries.reserve(count);
        for _ in 0..count {
            let key = decode_string(reader)
                .map_err(|e| e.with_context(format!("map key after {} entries", entries.len())))?;
            let value = decode_value(reader, value_schema, types)
                .map_err(|e| e.with_context(format!("map entry '{}'", key)))?;
            entries.push((key, value));
        }
    }

    Ok(entries)
}

/// Decode any Avro value according to its schema.
///
/// `Named` references are dereferenced through the registry, which is how
/// recursive schemas terminate. A `CompiledSchema` guarantees every name
/// resolves; an unresolvable name here means the schema tree and registry
/// were assembled by hand and do not match.
pub fn decode_value<R: Read>(
    reader: &mut R,
    schema: &AvroSchema,
    types: &TypeRegistry,
) -> Result<AvroValue, DecodeError> {
    match schema {
        AvroSchema::Null => {
            decode_null(reader)?;
            Ok(AvroValue::Null)
        }
        AvroSchema::Boolean => Ok(AvroValue::Boolean(decode_boolean(reader)?)),
        AvroSchema::Int => Ok(AvroValue::Int(decode_int(reader)?)),
        AvroSchema::Long => Ok(AvroValue::Long(decode_long(reader)?)),
        AvroSchema::Float => Ok(AvroValue::Float(decode_float(reader)?)),
        AvroSchema::Double => Ok(AvroValue::Double(decode_double(reader)?)),
        AvroSchema::Bytes => Ok(AvroValue::Bytes(decode_bytes(reader)?)),
        AvroSchema::String => Ok(AvroValue::String(decode_string(reader)?)),
        AvroSchema::Fixed(fixed) => Ok(AvroValue::Fixed(decode_fixed(reader, fixed.size)?)),
        AvroSchema::Enum(enum_schema) => {
            let (index, symbol) = decode_enum(reader, enum_schema)?;
            Ok(AvroValue::Enum(index, symbol))
        }
        AvroSchema::Record(record_schema) => {
            Ok(AvroValue::Record(decode_record(reader, record_schema, types)?))
        }
        AvroSchema::Array(item_schema) => {
            Ok(AvroValue::Array(decode_array(reader, item_schema, types)?))
        }
        AvroSchema::Map(value_schema) => {
            Ok(AvroValue::Map(decode_map(reader, value_schema, types)?))
        }
        AvroSchema::Union(branches) => {
            let (index, value) = decode_union(reader, branches, types)?;
            Ok(AvroValue::Union(index, Box::new(value)))
        }
        AvroSchema::Named(name) => match types.get(name) {
            Some(resolved) => decode_value(reader, resolved, types),
            None => Err(DecodeError::UnresolvedName(name.clone())),
        },
    }
}

// ============================================================================
// Skip functions
// ============================================================================

/// Skip over exactly `size` bytes.
#[inline]
fn skip_exact<R: Read>(reader: &mut R, size: usize) -> Result<(), DecodeError> {
    // io::copy would need Seek to do better; sink through a small buffer
    let mut remaining = size as u64;
    let mut buf = [0u8; 512];
    while remaining > 0 {
        let chunk = remaining.min(buf.len() as u64) as usize;
        reader.read_exact(&mut buf[..chunk])?;
        remaining -= chunk as u64;
    }
    Ok(())
}

/// Skip over a bytes or string value.
#[inline]
fn skip_bytes<R: Read>(reader: &mut R) -> Result<(), DecodeError> {
    let len = decode_long(reader)?;
    if len < 0 {
        return Err(DecodeError::OutOfRange(format!(
            "negative bytes length: {}",
            len
        )));
    }
    skip_exact(reader, len as usize)
}

/// Skip the blocks of an array or map without materializing items.
///
/// When a block carries a byte-size hint (negative count), the whole block
/// is skipped in one jump; otherwise each item is skipped individually.
fn skip_blocks<R: Read>(
    reader: &mut R,
    types: &TypeRegistry,
    mut skip_item: impl FnMut(&mut R, &TypeRegistry) -> Result<(), DecodeError>,
) -> Result<(), DecodeError> {
    loop {
        let count = decode_long(reader)?;
        if count == 0 {
            return Ok(());
        }
        if count < 0 {
            let byte_size = decode_long(reader)?;
            if byte_size < 0 {
                return Err(DecodeError::OutOfRange(format!(
                    "negative block byte size: {}",
                    byte_size
                )));
            }
            skip_exact(reader, byte_size as usize)?;
            continue;
        }
        for _ in 0..count {
            skip_item(reader, types)?;
        }
    }
}

/// Skip over any Avro value without building it.
pub fn skip_value<R: Read>(
    reader: &mut R,
    schema: &AvroSchema,
    types: &TypeRegistry,
) -> Result<(), DecodeError> {
    match schema {
        AvroSchema::Null => Ok(()),
        AvroSchema::Boolean => skip_exact(reader, 1),
        AvroSchema::Int | AvroSchema::Long => varint::skip_varint(reader),
        AvroSchema::Float => skip_exact(reader, 4),
        AvroSchema::Double => skip_exact(reader, 8),
        AvroSchema::Bytes | AvroSchema::String => skip_bytes(reader),
        AvroSchema::Fixed(fixed) => skip_exact(reader, fixed.size),
        AvroSchema::Enum(_) => varint::skip_varint(reader),
        AvroSchema::Array(item_schema) => skip_blocks(reader, types, |r, t| {
            skip_value(r, item_schema, t)
        }),
        AvroSchema::Map(value_schema) => skip_blocks(reader, types, |r, t| {
            skip_bytes(r)?;
            skip_value(r, value_schema, t)
        }),
        AvroSchema::Union(branches) => {
            let index = decode_int(reader)?;
            if index < 0 || index as usize >= branches.len() {
                return Err(DecodeError::OutOfRange(format!(
                    "union has no branch with index {} (0..{})",
                    index,
                    branches.len()
                )));
            }
            skip_value(reader, &branches[index as usize], types)
        }
        AvroSchema::Record(record_schema) => {
            for field in &record_schema.fields {
                skip_value(reader, &field.schema, types)?;
            }
            Ok(())
        }
        AvroSchema::Named(name) => match types.get(name) {
            Some(resolved) => skip_value(reader, resolved, types),
            None => Err(DecodeError::UnresolvedName(name.clone())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::varint::encode_zigzag;

    fn no_types() -> TypeRegistry {
        TypeRegistry::new()
    }

    // ========================================================================
    // Primitive decoding
    // ========================================================================

    #[test]
    fn test_decode_null_consumes_nothing() {
        let data: &[u8] = &[0x01, 0x02];
        let mut cursor = data;
        decode_null(&mut cursor).unwrap();
        assert_eq!(cursor.len(), 2);
    }

    #[test]
    fn test_decode_boolean() {
        assert!(!decode_boolean(&mut &[0x00u8][..]).unwrap());
        assert!(decode_boolean(&mut &[0x01u8][..]).unwrap());
        // Any nonzero byte reads as true
        assert!(decode_boolean(&mut &[0x17u8][..]).unwrap());
        assert!(matches!(
            decode_boolean(&mut &[][..]),
            Err(DecodeError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_decode_int_range_check() {
        let encoded = encode_zigzag(i32::MAX as i64);
        assert_eq!(decode_int(&mut &encoded[..]).unwrap(), i32::MAX);

        let encoded = encode_zigzag(i32::MIN as i64);
        assert_eq!(decode_int(&mut &encoded[..]).unwrap(), i32::MIN);

        let encoded = encode_zigzag(i32::MAX as i64 + 1);
        assert!(matches!(
            decode_int(&mut &encoded[..]),
            Err(DecodeError::OutOfRange(_))
        ));

        let encoded = encode_zigzag(i32::MIN as i64 - 1);
        assert!(matches!(
            decode_int(&mut &encoded[..]),
            Err(DecodeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_decode_float_and_double() {
        let bytes = 1.5f32.to_le_bytes();
        assert_eq!(decode_float(&mut &bytes[..]).unwrap(), 1.5);

        let bytes = (-0.25f64).to_le_bytes();
        assert_eq!(decode_double(&mut &bytes[..]).unwrap(), -0.25);

        // Truncated
        assert!(matches!(
            decode_float(&mut &[0x00u8, 0x00][..]),
            Err(DecodeError::UnexpectedEof)
        ));
        assert!(matches!(
            decode_double(&mut &[0x00u8; 7][..]),
            Err(DecodeError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_decode_bytes() {
        // len 2, bytes [0xAB, 0xCD]
        let data: &[u8] = &[0x04, 0xAB, 0xCD];
        assert_eq!(decode_bytes(&mut &data[..]).unwrap(), vec![0xAB, 0xCD]);

        // Empty
        let data: &[u8] = &[0x00];
        assert_eq!(decode_bytes(&mut &data[..]).unwrap(), Vec::<u8>::new());

        // Negative length (zigzag 0x01 = -1)
        let data: &[u8] = &[0x01];
        assert!(matches!(
            decode_bytes(&mut &data[..]),
            Err(DecodeError::OutOfRange(_))
        ));

        // Fewer bytes than the prefix promises
        let data: &[u8] = &[0x06, 0xAA];
        assert!(matches!(
            decode_bytes(&mut &data[..]),
            Err(DecodeError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_decode_string() {
        let data: &[u8] = &[0x04, 0x68, 0x69];
        assert_eq!(decode_string(&mut &data[..]).unwrap(), "hi");
    }

    #[test]
    fn test_decode_string_invalid_utf8() {
        let data: &[u8] = &[0x04, 0xFF, 0xFE];
        assert!(matches!(
            decode_string(&mut &data[..]),
            Err(DecodeError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_decode_fixed() {
        let data: &[u8] = &[0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(
            decode_fixed(&mut &data[..], 4).unwrap(),
            vec![0xDE, 0xAD, 0xBE, 0xEF]
        );

        assert!(matches!(
            decode_fixed(&mut &data[..], 5),
            Err(DecodeError::UnexpectedEof)
        ));
    }

    // ========================================================================
    // Enum decoding
    // ========================================================================

    #[test]
    fn test_decode_enum() {
        let schema = EnumSchema::new("E", vec!["A".to_string(), "B".to_string()]);

        let data: &[u8] = &[0x00];
        assert_eq!(
            decode_enum(&mut &data[..], &schema).unwrap(),
            (0, "A".to_string())
        );

        let data: &[u8] = &[0x02];
        assert_eq!(
            decode_enum(&mut &data[..], &schema).unwrap(),
            (1, "B".to_string())
        );
    }

    #[test]
    fn test_decode_enum_out_of_range_with_default() {
        let schema =
            EnumSchema::new("E", vec!["A".to_string(), "B".to_string()]).with_default("A");

        // Index 2 is past the end; default applies
        let data: &[u8] = &[0x04];
        assert_eq!(
            decode_enum(&mut &data[..], &schema).unwrap(),
            (2, "A".to_string())
        );

        // Negative index never falls back
        let data: &[u8] = &[0x01];
        assert!(matches!(
            decode_enum(&mut &data[..], &schema),
            Err(DecodeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_decode_enum_out_of_range_without_default() {
        let schema = EnumSchema::new("E", vec!["A".to_string(), "B".to_string()]);
        let data: &[u8] = &[0x04];
        assert!(matches!(
            decode_enum(&mut &data[..], &schema),
            Err(DecodeError::OutOfRange(_))
        ));
    }

    // ========================================================================
    // Union decoding
    // ========================================================================

    #[test]
    fn test_decode_union() {
        let branches = vec![AvroSchema::Null, AvroSchema::String];

        let data: &[u8] = &[0x00];
        let (index, value) = decode_union(&mut &data[..], &branches, &no_types()).unwrap();
        assert_eq!(index, 0);
        assert_eq!(value, AvroValue::Null);

        // Branch 1, string "foo"
        let data: &[u8] = &[0x02, 0x06, 0x66, 0x6F, 0x6F];
        let (index, value) = decode_union(&mut &data[..], &branches, &no_types()).unwrap();
        assert_eq!(index, 1);
        assert_eq!(value, AvroValue::String("foo".to_string()));
    }

    #[test]
    fn test_decode_union_index_out_of_range() {
        let branches = vec![AvroSchema::Null, AvroSchema::String];
        let data: &[u8] = &[0x04];
        assert!(matches!(
            decode_union(&mut &data[..], &branches, &no_types()),
            Err(DecodeError::OutOfRange(_))
        ));
    }

    // ========================================================================
    // Record decoding
    // ========================================================================

    #[test]
    fn test_decode_record_field_order() {
        use crate::schema::FieldSchema;

        let schema = RecordSchema::new(
            "R",
            vec![
                FieldSchema::new("a", AvroSchema::Int),
                FieldSchema::new("b", AvroSchema::String),
            ],
        );

        // a = 3 (zigzag 0x06), b = "hi"
        let data: &[u8] = &[0x06, 0x04, 0x68, 0x69];
        let fields = decode_record(&mut &data[..], &schema, &no_types()).unwrap();
        assert_eq!(
            fields,
            vec![
                ("a".to_string(), AvroValue::Int(3)),
                ("b".to_string(), AvroValue::String("hi".to_string())),
            ]
        );
    }

    #[test]
    fn test_decode_record_error_names_field() {
        use crate::schema::FieldSchema;

        let schema = RecordSchema::new("R", vec![FieldSchema::new("a", AvroSchema::Double)]);
        let data: &[u8] = &[0x00];
        let err = decode_record(&mut &data[..], &schema, &no_types()).unwrap_err();
        assert!(err.to_string().contains("field 'a' of record 'R'"));
        assert!(err.is_eof());
    }

    // ========================================================================
    // Array and map block protocol
    // ========================================================================

    #[test]
    fn test_decode_array_single_block() {
        // Block of 2: [1, 2], then terminator
        let data: &[u8] = &[0x04, 0x02, 0x04, 0x00];
        let items = decode_array(&mut &data[..], &AvroSchema::Int, &no_types()).unwrap();
        assert_eq!(items, vec![AvroValue::Int(1), AvroValue::Int(2)]);
    }

    #[test]
    fn test_decode_array_blocks_accumulate() {
        // Block of 2: [1, 2]; block of -1 with byte-size hint 1: [3]; terminator.
        // All three items must survive.
        let data: &[u8] = &[0x04, 0x02, 0x04, 0x01, 0x02, 0x06, 0x00];
        let items = decode_array(&mut &data[..], &AvroSchema::Int, &no_types()).unwrap();
        assert_eq!(
            items,
            vec![AvroValue::Int(1), AvroValue::Int(2), AvroValue::Int(3)]
        );
    }

    #[test]
    fn test_decode_array_empty() {
        let data: &[u8] = &[0x00];
        let items = decode_array(&mut &data[..], &AvroSchema::Int, &no_types()).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_decode_array_missing_terminator() {
        let data: &[u8] = &[0x02, 0x02];
        assert!(matches!(
            decode_array(&mut &data[..], &AvroSchema::Int, &no_types()),
            Err(DecodeError::Context { .. }) | Err(DecodeError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_decode_map() {
        // One block, one entry: "a" -> 1, then terminator
        let data: &[u8] = &[0x02, 0x02, 0x61, 0x02, 0x00];
        let entries = decode_map(&mut &data[..], &AvroSchema::Long, &no_types()).unwrap();
        assert_eq!(entries, vec![("a".to_string(), AvroValue::Long(1))]);
    }

    #[test]
    fn test_decode_map_blocks_accumulate() {
        // Block of 1: "a" -> 1; block of -1 with hint: "b" -> 2; terminator
        let data: &[u8] = &[
            0x02, 0x02, 0x61, 0x02, // "a" -> 1
            0x01, 0x06, 0x02, 0x62, 0x04, // hint 3, "b" -> 2
            0x00,
        ];
        let entries = decode_map(&mut &data[..], &AvroSchema::Long, &no_types()).unwrap();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), AvroValue::Long(1)),
                ("b".to_string(), AvroValue::Long(2)),
            ]
        );
    }

    // ========================================================================
    // Named references
    // ========================================================================

    #[test]
    fn test_decode_named_through_registry() {
        let mut types = TypeRegistry::new();
        types
            .register(
                "E".to_string(),
                AvroSchema::Enum(EnumSchema::new("E", vec!["X".to_string()])),
            )
            .unwrap();

        let schema = AvroSchema::Named("E".to_string());
        let data: &[u8] = &[0x00];
        let value = decode_value(&mut &data[..], &schema, &types).unwrap();
        assert_eq!(value, AvroValue::Enum(0, "X".to_string()));
    }

    #[test]
    fn test_decode_named_missing_fails() {
        let schema = AvroSchema::Named("Ghost".to_string());
        let data: &[u8] = &[0x00];
        assert!(decode_value(&mut &data[..], &schema, &no_types()).is_err());
    }

    // ========================================================================
    // Skipping
    // ========================================================================

    #[test]
    fn test_skip_value_positions_cursor() {
        use crate::schema::FieldSchema;

        let schema = AvroSchema::Record(RecordSchema::new(
            "R",
            vec![
                FieldSchema::new("a", AvroSchema::Int),
                FieldSchema::new("b", AvroSchema::String),
            ],
        ));

        let data: &[u8] = &[0x06, 0x04, 0x68, 0x69, 0xAA];
        let mut cursor = data;
        skip_value(&mut cursor, &schema, &no_types()).unwrap();
        assert_eq!(cursor, &[0xAA]);
    }

    #[test]
    fn test_skip_array_uses_byte_size_hint() {
        // Block of -2 items, byte-size hint 2, two int items, terminator.
        // The skipper must jump the hinted bytes without touching the items.
        let data: &[u8] = &[0x03, 0x04, 0x02, 0x04, 0x00, 0xBB];
        let mut cursor = data;
        let schema = AvroSchema::Array(Box::new(AvroSchema::Int));
        skip_value(&mut cursor, &schema, &no_types()).unwrap();
        assert_eq!(cursor, &[0xBB]);
    }

    // ========================================================================
    // JSON projection
    // ========================================================================

    #[test]
    fn test_to_json() {
        use serde_json::json;

        let value = AvroValue::Record(vec![
            ("n".to_string(), AvroValue::Null),
            ("b".to_string(), AvroValue::Boolean(true)),
            ("i".to_string(), AvroValue::Int(7)),
            ("s".to_string(), AvroValue::String("hey".to_string())),
            (
                "u".to_string(),
                AvroValue::Union(1, Box::new(AvroValue::Long(9))),
            ),
            ("e".to_string(), AvroValue::Enum(0, "RED".to_string())),
            (
                "a".to_string(),
                AvroValue::Array(vec![AvroValue::Int(1), AvroValue::Int(2)]),
            ),
        ]);

        assert_eq!(
            value.to_json(),
            json!({
                "n": null,
                "b": true,
                "i": 7,
                "s": "hey",
                "u": 9,
                "e": "RED",
                "a": [1, 2],
            })
        );
    }

    #[test]
    fn test_to_json_bytes_base64() {
        let value = AvroValue::Bytes(vec![0xDE, 0xAD]);
        assert_eq!(value.to_json(), serde_json::json!("3q0="));
    }
}
