//! Avro schema types and compilation.
//!
//! This module defines the schema type system (primitives, complex types,
//! named type references), the JSON schema compiler, and the registry of
//! named types that references resolve through.

mod parser;
mod registry;
mod types;

pub use parser::{parse_schema, parse_schema_with_options, CompiledSchema, SchemaCompiler};
pub use registry::TypeRegistry;
pub use types::*;
