//! Streaming decoder for schema-driven Avro binary data
//!
//! This library compiles an Avro JSON schema into an immutable
//! [`CompiledSchema`](schema::CompiledSchema) and decodes a raw
//! concatenation of binary-encoded values against it, yielding one
//! [`AvroValue`](reader::AvroValue) tree per value.
//!
//! ```
//! use avrojet::reader::{AvroValue, StreamReader};
//! use avrojet::schema::parse_schema;
//!
//! let schema = parse_schema(
//!     r#"{"type": "record", "name": "R",
//!         "fields": [{"name": "a", "type": "int"},
//!                    {"name": "b", "type": "string"}]}"#,
//! ).unwrap();
//!
//! let data: &[u8] = &[0x06, 0x04, 0x68, 0x69];
//! let values: Vec<_> = StreamReader::new(schema, data)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(values.len(), 1);
//! ```

pub mod error;
pub mod reader;
pub mod schema;

// Re-export main types
pub use error::{DecodeError, SchemaError};
pub use reader::{decode_value, skip_value, AvroValue, CountingReader, StreamReader};
pub use schema::{
    parse_schema, parse_schema_with_options, AvroSchema, CompiledSchema, EnumSchema, FieldSchema,
    FixedSchema, RecordSchema, SchemaCompiler, TypeRegistry,
};
