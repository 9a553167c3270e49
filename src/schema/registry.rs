//! Registry of named schema types.
//!
//! Named types (records, enums, fixed) register here during compilation.
//! `Named` references in the schema tree are dereferenced through the
//! registry at decode time rather than being inlined, which is what lets
//! self-referential schemas (a record whose field refers back to the
//! record) terminate.

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::schema::AvroSchema;

/// Registry of named types, keyed by the name they were declared under.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    named_types: HashMap<String, AvroSchema>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type.
    ///
    /// Declaring two types under the same name is a compile failure.
    pub fn register(&mut self, name: String, schema: AvroSchema) -> Result<(), SchemaError> {
        if self.named_types.contains_key(&name) {
            return Err(SchemaError::DuplicateName(name));
        }
        self.named_types.insert(name, schema);
        Ok(())
    }

    /// Get a named type from the registry.
    pub fn get(&self, name: &str) -> Option<&AvroSchema> {
        self.named_types.get(name)
    }

    /// Check if a named type exists in the registry.
    pub fn contains(&self, name: &str) -> bool {
        self.named_types.contains_key(name)
    }

    /// Number of registered named types.
    pub fn len(&self) -> usize {
        self.named_types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.named_types.is_empty()
    }
}
