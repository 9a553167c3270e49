//! Streaming reader for concatenated Avro values.
//!
//! A datum stream is a raw concatenation of binary-encoded values, each
//! matching the same schema, with no framing between them. The reader
//! decodes one value per iteration until the source is cleanly exhausted.
//!
//! End-of-stream detection: a decode failure whose root cause is EOF, with
//! zero bytes read on that iteration, means the previous value ended
//! exactly at the end of the source. Any bytes read before the failure mean
//! a truncated value, which is surfaced as an error.

use std::io::{self, Read};

use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::reader::decode::{decode_value, AvroValue};
use crate::schema::CompiledSchema;

/// A `Read` wrapper that counts bytes successfully read.
///
/// The count only ever includes bytes actually delivered, so after a failed
/// decode it tells whether the failure happened on the first byte of a
/// value or somewhere inside it.
pub struct CountingReader<R> {
    inner: R,
    bytes_read: u64,
}

impl<R: Read> CountingReader<R> {
    /// Wrap a reader with a zeroed counter.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Bytes successfully read since construction.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Streaming reader decoding one value per iteration.
///
/// ```no_run
/// use avrojet::reader::StreamReader;
/// use avrojet::schema::parse_schema;
///
/// let schema = parse_schema(r#""long""#).unwrap();
/// let reader = StreamReader::new(schema, std::io::stdin().lock());
/// for value in reader {
///     println!("{}", value.unwrap().to_json());
/// }
/// ```
pub struct StreamReader<R> {
    schema: CompiledSchema,
    source: R,
    finished: bool,
}

impl<R: Read> StreamReader<R> {
    /// Create a reader over a compiled schema and a byte source.
    ///
    /// The source is borrowed for reading only; the caller keeps ownership
    /// semantics such as closing.
    pub fn new(schema: CompiledSchema, source: R) -> Self {
        Self {
            schema,
            source,
            finished: false,
        }
    }

    /// Decode the next value, or `None` at clean end-of-stream.
    fn next_value(&mut self) -> Option<Result<AvroValue, DecodeError>> {
        if self.finished {
            return None;
        }

        // Fresh counter per value so "nothing read" is per-record.
        let mut counted = CountingReader::new(&mut self.source);
        match decode_value(&mut counted, self.schema.root(), self.schema.types()) {
            Ok(value) => {
                let n = counted.bytes_read();
                trace!(bytes = n, "decoded value");
                if n == 0 {
                    // A zero-width root schema (e.g. "null") would otherwise
                    // yield values forever; one per stream is the only
                    // meaningful reading.
                    self.finished = true;
                }
                Some(Ok(value))
            }
            Err(e) if e.is_eof() && counted.bytes_read() == 0 => {
                debug!("end of stream");
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> Iterator for StreamReader<R> {
    type Item = Result<AvroValue, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_value()
    }
}
