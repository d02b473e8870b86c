//! Defines everything necessary for avro serialization
//!
//! You typically want to use the top-level functions such as
//! [`to_datum_vec`](crate::to_datum_vec), but access to this may be necessary
//! for more advanced usage (e.g. non-default [`SerializerConfig`]).

mod error;
mod serializer;

pub use error::{SerError, SerErrorKind};

use crate::{
	schema::{Schema, SchemaKey},
	Value,
};

use std::io::Write;

/// Schema + other configs for serialization
#[derive(Clone, Copy)]
pub struct SerializerConfig<'s> {
	pub(crate) schema: &'s Schema,
	pub(crate) include_block_byte_size: bool,
}

impl<'s> SerializerConfig<'s> {
	pub fn new(schema: &'s Schema) -> Self {
		Self {
			schema,
			include_block_byte_size: false,
		}
	}

	/// Emit array and map blocks in the negated-count-plus-byte-size form, so
	/// that consumers can skip over a whole block without decoding its items
	///
	/// This buffers each container in memory to learn its encoded size, so it
	/// is off by default.
	pub fn include_block_byte_size(mut self, include_block_byte_size: bool) -> Self {
		self.include_block_byte_size = include_block_byte_size;
		self
	}

	pub fn schema(&self) -> &'s Schema {
		self.schema
	}
}

/// All configuration and state necessary for the serialization to run
///
/// Notably holds the writer and a [`SerializerConfig`].
pub struct SerializerState<'s, W> {
	pub(crate) writer: W,
	pub(crate) config: SerializerConfig<'s>,
}

impl<'s, W: Write> SerializerState<'s, W> {
	pub fn from_writer(writer: W, schema: &'s Schema) -> Self {
		Self::with_config(writer, SerializerConfig::new(schema))
	}

	pub fn with_config(writer: W, config: SerializerConfig<'s>) -> Self {
		SerializerState { writer, config }
	}

	pub fn config(&self) -> &SerializerConfig<'s> {
		&self.config
	}

	/// Encode a single datum under the schema root
	pub fn write_datum(&mut self, value: &Value) -> Result<(), SerError> {
		serializer::write_value(self, SchemaKey::ROOT, value)
	}
}

impl<W> SerializerState<'_, W> {
	/// Get writer back
	pub fn into_writer(self) -> W {
		self.writer
	}
}
