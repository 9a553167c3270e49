//! Error types for schema compilation and binary decoding

use std::io;
use thiserror::Error;

/// Errors that can occur while compiling a schema document
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema document has an invalid shape
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    /// A required attribute is missing
    #[error("Missing required attribute '{attribute}' in {context}")]
    MissingAttribute {
        attribute: &'static str,
        context: String,
    },
    /// An attribute has the wrong dynamic type
    #[error("Attribute '{attribute}' in {context} must be {expected}")]
    AttributeType {
        attribute: &'static str,
        context: String,
        expected: &'static str,
    },
    /// A reference names a type that was never declared
    #[error("Unresolved reference to named type '{0}'")]
    UnresolvedReference(String),
    /// Two named types were declared under the same name
    #[error("Duplicate named type '{0}'")]
    DuplicateName(String),
}

/// Errors that can occur while decoding binary data
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Source ran out of bytes mid-value
    #[error("Unexpected end of data")]
    UnexpectedEof,
    /// Varint exceeds 10 bytes
    #[error("Invalid varint encoding: exceeds 10 bytes")]
    InvalidVarint,
    /// A decoded value violates a range constraint
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    /// String is not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// A named reference did not resolve through the registry
    #[error("Named type '{0}' is not in the registry")]
    UnresolvedName(String),
    /// The underlying byte source failed
    #[error("I/O error: {0}")]
    Io(io::Error),
    /// A failure inside a composite value, with its location
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wrap this error with positional context (record field, array index,
    /// map key). The root cause stays reachable through `is_eof`.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DecodeError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the root cause of this error is end-of-input.
    ///
    /// The stream driver uses this together with a per-record byte counter
    /// to tell clean end-of-stream apart from a truncated value.
    pub fn is_eof(&self) -> bool {
        match self {
            DecodeError::UnexpectedEof => true,
            DecodeError::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            DecodeError::Context { source, .. } => source.is_eof(),
            _ => false,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::UnexpectedEof
        } else {
            DecodeError::Io(err)
        }
    }
}
