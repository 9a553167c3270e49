//! JSON schema compiler.
//!
//! Compiles an Avro schema document (a parsed `serde_json::Value` tree)
//! into an [`AvroSchema`] tree plus a [`TypeRegistry`] of named types.
//!
//! Compilation is two passes: a recursive walk that builds the tree and
//! defers references to named types, then a resolve pass that checks every
//! deferred name against the registry. References stay as `Named` nodes in
//! the tree and are dereferenced through the registry at decode time, so a
//! record may reference itself.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::SchemaError;
use crate::schema::{
    AvroSchema, EnumSchema, FieldSchema, FixedSchema, RecordSchema, TypeRegistry,
};

/// A fully compiled schema: the root tree plus the registry its `Named`
/// references dereference through.
///
/// Immutable after compilation; may be shared freely across threads for
/// decoding independent streams.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    root: AvroSchema,
    types: TypeRegistry,
}

impl CompiledSchema {
    /// The root schema node.
    pub fn root(&self) -> &AvroSchema {
        &self.root
    }

    /// The registry of named types.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }
}

/// Compile an Avro schema from a JSON string.
///
/// # Example
/// ```
/// use avrojet::schema::parse_schema;
///
/// let schema = parse_schema(r#""long""#).unwrap();
/// ```
pub fn parse_schema(json: &str) -> Result<CompiledSchema, SchemaError> {
    parse_schema_with_options(json, false)
}

/// Compile an Avro schema from a JSON string with validation options.
///
/// In strict mode, names must follow Avro naming rules (start with a letter
/// or underscore, contain only alphanumerics and underscores). In permissive
/// mode (the default) violations are logged as warnings, which maximizes
/// compatibility with existing data.
pub fn parse_schema_with_options(json: &str, strict: bool) -> Result<CompiledSchema, SchemaError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SchemaError::InvalidSchema(format!("Invalid JSON: {}", e)))?;

    SchemaCompiler::new().with_strict(strict).compile(&value)
}

/// Schema compiler with named type registration and deferred reference
/// resolution.
#[derive(Debug, Default)]
pub struct SchemaCompiler {
    /// Registry of named types by declared name
    registry: TypeRegistry,
    /// Names referenced before (or without) a matching declaration
    deferred: Vec<String>,
    /// Whether to enforce Avro naming rules
    strict_names: bool,
}

impl SchemaCompiler {
    /// Create a new SchemaCompiler with default settings (permissive mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to enforce Avro naming rules.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }

    /// Compile a schema document into a [`CompiledSchema`].
    ///
    /// Consumes the compiler: the registry it accumulated becomes part of
    /// the result.
    pub fn compile(mut self, value: &Value) -> Result<CompiledSchema, SchemaError> {
        let root = self.compile_element(value)?;

        // Every deferred reference must name a registered type.
        for name in &self.deferred {
            if !self.registry.contains(name) {
                return Err(SchemaError::UnresolvedReference(name.clone()));
            }
        }

        Ok(CompiledSchema {
            root,
            types: self.registry,
        })
    }

    /// Compile one element of the document, dispatching on its dynamic shape.
    fn compile_element(&mut self, value: &Value) -> Result<AvroSchema, SchemaError> {
        match value {
            Value::String(s) => Ok(self.compile_string_schema(s)),
            Value::Object(obj) => self.compile_object_schema(obj),
            Value::Array(arr) => self.compile_union(arr),
            _ => Err(SchemaError::InvalidSchema(format!(
                "Expected string, object, or array, found: {}",
                value
            ))),
        }
    }

    /// A text scalar is a primitive name or a reference to a named type.
    fn compile_string_schema(&mut self, s: &str) -> AvroSchema {
        match s {
            "null" => AvroSchema::Null,
            "boolean" => AvroSchema::Boolean,
            "int" => AvroSchema::Int,
            "long" => AvroSchema::Long,
            "float" => AvroSchema::Float,
            "double" => AvroSchema::Double,
            "bytes" => AvroSchema::Bytes,
            "string" => AvroSchema::String,
            name => {
                // May be declared anywhere in the document; checked after
                // the walk completes.
                self.deferred.push(name.to_string());
                AvroSchema::Named(name.to_string())
            }
        }
    }

    /// A mapping carries a `"type"` tag selecting the composite kind.
    fn compile_object_schema(&mut self, obj: &Map<String, Value>) -> Result<AvroSchema, SchemaError> {
        let type_str = match obj.get("type") {
            Some(Value::String(s)) => s.as_str(),
            Some(_) => {
                return Err(SchemaError::AttributeType {
                    attribute: "type",
                    context: "schema object".to_string(),
                    expected: "a string",
                })
            }
            None => {
                return Err(SchemaError::MissingAttribute {
                    attribute: "type",
                    context: "schema object".to_string(),
                })
            }
        };

        match type_str {
            "record" => self.compile_record(obj),
            "enum" => self.compile_enum(obj),
            "array" => self.compile_array(obj),
            "map" => self.compile_map(obj),
            "fixed" => self.compile_fixed(obj),
            // Primitives may appear in object form too
            other => Ok(self.compile_string_schema(other)),
        }
    }

    /// A sequence denotes a union over its compiled branches.
    fn compile_union(&mut self, arr: &[Value]) -> Result<AvroSchema, SchemaError> {
        if arr.is_empty() {
            return Err(SchemaError::InvalidSchema(
                "Union schema cannot be empty".to_string(),
            ));
        }

        let branches: Result<Vec<AvroSchema>, SchemaError> =
            arr.iter().map(|v| self.compile_element(v)).collect();

        Ok(AvroSchema::Union(branches?))
    }

    fn compile_record(&mut self, obj: &Map<String, Value>) -> Result<AvroSchema, SchemaError> {
        let name = req_string(obj, "name", "record")?;
        self.validate_name(&name, "Record")?;
        let context = format!("record '{}'", name);

        let namespace = opt_string(obj, "namespace", &context)?;
        let doc = opt_string(obj, "doc", &context)?;
        let aliases = string_array(obj, "aliases", &context)?;

        let fields_value = match obj.get("fields") {
            Some(Value::Array(arr)) => arr,
            Some(_) => {
                return Err(SchemaError::AttributeType {
                    attribute: "fields",
                    context,
                    expected: "an array",
                })
            }
            None => {
                return Err(SchemaError::MissingAttribute {
                    attribute: "fields",
                    context,
                })
            }
        };

        let mut fields = Vec::with_capacity(fields_value.len());
        for field_value in fields_value {
            fields.push(self.compile_field(field_value, &name)?);
        }

        let schema = AvroSchema::Record(RecordSchema {
            name: name.clone(),
            namespace,
            fields,
            doc,
            aliases,
        });

        self.registry.register(name, schema.clone())?;
        Ok(schema)
    }

    fn compile_field(
        &mut self,
        value: &Value,
        record_name: &str,
    ) -> Result<FieldSchema, SchemaError> {
        let obj = value.as_object().ok_or_else(|| {
            SchemaError::InvalidSchema(format!(
                "Field of record '{}' must be an object",
                record_name
            ))
        })?;

        let context = format!("field of record '{}'", record_name);
        let name = req_string(obj, "name", &context)?;
        self.validate_name(&name, "Field")?;

        let context = format!("field '{}' of record '{}'", name, record_name);
        let type_value = obj.get("type").ok_or_else(|| SchemaError::MissingAttribute {
            attribute: "type",
            context: context.clone(),
        })?;
        let schema = self.compile_element(type_value)?;

        let doc = opt_string(obj, "doc", &context)?;
        let aliases = string_array(obj, "aliases", &context)?;
        let default = obj.get("default").cloned();

        Ok(FieldSchema {
            name,
            schema,
            default,
            doc,
            aliases,
        })
    }

    fn compile_enum(&mut self, obj: &Map<String, Value>) -> Result<AvroSchema, SchemaError> {
        let name = req_string(obj, "name", "enum")?;
        self.validate_name(&name, "Enum")?;
        let context = format!("enum '{}'", name);

        let namespace = opt_string(obj, "namespace", &context)?;
        let doc = opt_string(obj, "doc", &context)?;
        let aliases = string_array(obj, "aliases", &context)?;

        let symbols = match obj.get("symbols") {
            Some(Value::Array(_)) => string_array(obj, "symbols", &context)?,
            Some(_) => {
                return Err(SchemaError::AttributeType {
                    attribute: "symbols",
                    context,
                    expected: "an array of strings",
                })
            }
            None => {
                return Err(SchemaError::MissingAttribute {
                    attribute: "symbols",
                    context,
                })
            }
        };
        if symbols.is_empty() {
            return Err(SchemaError::InvalidSchema(format!(
                "Enum '{}' must have at least one symbol",
                name
            )));
        }
        for symbol in &symbols {
            self.validate_name(symbol, "Enum symbol")?;
        }

        let default = opt_string(obj, "default", &context)?;
        if let Some(default_symbol) = &default {
            if !symbols.iter().any(|s| s == default_symbol) {
                return Err(SchemaError::InvalidSchema(format!(
                    "Default symbol '{}' of enum '{}' is not in its symbols",
                    default_symbol, name
                )));
            }
        }

        let schema = AvroSchema::Enum(EnumSchema {
            name: name.clone(),
            namespace,
            symbols,
            doc,
            aliases,
            default,
        });

        self.registry.register(name, schema.clone())?;
        Ok(schema)
    }

    fn compile_array(&mut self, obj: &Map<String, Value>) -> Result<AvroSchema, SchemaError> {
        let items = obj.get("items").ok_or_else(|| SchemaError::MissingAttribute {
            attribute: "items",
            context: "array".to_string(),
        })?;

        let item_schema = self.compile_element(items)?;
        Ok(AvroSchema::Array(Box::new(item_schema)))
    }

    fn compile_map(&mut self, obj: &Map<String, Value>) -> Result<AvroSchema, SchemaError> {
        let values = obj.get("values").ok_or_else(|| SchemaError::MissingAttribute {
            attribute: "values",
            context: "map".to_string(),
        })?;

        let value_schema = self.compile_element(values)?;
        Ok(AvroSchema::Map(Box::new(value_schema)))
    }

    fn compile_fixed(&mut self, obj: &Map<String, Value>) -> Result<AvroSchema, SchemaError> {
        let name = req_string(obj, "name", "fixed")?;
        self.validate_name(&name, "Fixed")?;
        let context = format!("fixed '{}'", name);

        let namespace = opt_string(obj, "namespace", &context)?;
        let doc = opt_string(obj, "doc", &context)?;
        let aliases = string_array(obj, "aliases", &context)?;
        let size = req_size(obj, &context)?;

        let schema = AvroSchema::Fixed(FixedSchema {
            name: name.clone(),
            namespace,
            size,
            doc,
            aliases,
        });

        self.registry.register(name, schema.clone())?;
        Ok(schema)
    }

    /// Validate that a name follows Avro naming rules.
    ///
    /// Names must start with `[A-Za-z_]` and contain only `[A-Za-z0-9_]`.
    /// Violations fail in strict mode and are logged otherwise.
    fn validate_name(&self, name: &str, kind: &str) -> Result<(), SchemaError> {
        let valid = match name.chars().next() {
            None => false,
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
        };

        if valid {
            return Ok(());
        }
        if self.strict_names {
            return Err(SchemaError::InvalidSchema(format!(
                "{} name '{}' violates Avro naming rules",
                kind, name
            )));
        }
        warn!(kind, name, "name violates Avro naming rules");
        Ok(())
    }
}

// ============================================================================
// Attribute extraction
// ============================================================================

fn req_string(
    obj: &Map<String, Value>,
    attribute: &'static str,
    context: &str,
) -> Result<String, SchemaError> {
    match obj.get(attribute) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::AttributeType {
            attribute,
            context: context.to_string(),
            expected: "a string",
        }),
        None => Err(SchemaError::MissingAttribute {
            attribute,
            context: context.to_string(),
        }),
    }
}

fn opt_string(
    obj: &Map<String, Value>,
    attribute: &'static str,
    context: &str,
) -> Result<Option<String>, SchemaError> {
    match obj.get(attribute) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::AttributeType {
            attribute,
            context: context.to_string(),
            expected: "a string",
        }),
        None => Ok(None),
    }
}

fn string_array(
    obj: &Map<String, Value>,
    attribute: &'static str,
    context: &str,
) -> Result<Vec<String>, SchemaError> {
    let arr = match obj.get(attribute) {
        Some(Value::Array(arr)) => arr,
        Some(_) => {
            return Err(SchemaError::AttributeType {
                attribute,
                context: context.to_string(),
                expected: "an array of strings",
            })
        }
        None => return Ok(Vec::new()),
    };

    let mut result = Vec::with_capacity(arr.len());
    for item in arr {
        match item {
            Value::String(s) => result.push(s.clone()),
            _ => {
                return Err(SchemaError::AttributeType {
                    attribute,
                    context: context.to_string(),
                    expected: "an array of strings",
                })
            }
        }
    }
    Ok(result)
}

/// Extract the required `size` attribute as a non-negative integer.
///
/// JSON decoders commonly surface numbers as floating point, so an `f64`
/// with zero fraction is accepted too.
fn req_size(obj: &Map<String, Value>, context: &str) -> Result<usize, SchemaError> {
    let number = match obj.get("size") {
        Some(Value::Number(n)) => n,
        Some(_) => {
            return Err(SchemaError::AttributeType {
                attribute: "size",
                context: context.to_string(),
                expected: "a non-negative integer",
            })
        }
        None => {
            return Err(SchemaError::MissingAttribute {
                attribute: "size",
                context: context.to_string(),
            })
        }
    };

    if let Some(size) = number.as_u64() {
        return Ok(size as usize);
    }
    if let Some(f) = number.as_f64() {
        if f.fract() == 0.0 && f >= 0.0 && f <= usize::MAX as f64 {
            return Ok(f as usize);
        }
    }
    Err(SchemaError::AttributeType {
        attribute: "size",
        context: context.to_string(),
        expected: "a non-negative integer",
    })
}
