//! Defines everything necessary for avro deserialization
//!
//! You typically want to use the top-level functions such as
//! [`from_datum_slice`](crate::from_datum_slice), but access to this may be
//! necessary for more advanced usage (e.g. non-default
//! [`DeserializerConfig`]).

mod allowed_depth;
mod decoder;
mod error;
pub mod read;

pub use error::{DeError, DeErrorKind};

use {allowed_depth::AllowedDepth, read::SliceRead};

use crate::{
	schema::{Schema, SchemaKey},
	Value,
};

/// How decimal values are materialized
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecimalMode {
	/// `unscaled * 10^(-scale)` as an `f64`, yielding a [`Value::Double`]
	#[default]
	Approximate,
	/// An exact [`Value::Decimal`]
	Exact,
}

/// Output representation of a fixed-backed uuid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UuidFormat {
	/// The raw 16 bytes, as a [`Value::Fixed`]
	#[default]
	Binary,
	/// 36-character lowercase hyphenated text, as a [`Value::String`]
	CanonicalString,
}

/// Schema + all configuration for the deserialization to run
#[derive(Clone, Copy)]
pub struct DeserializerConfig<'s> {
	pub(crate) schema: &'s Schema,
	pub(crate) tagged_unions: bool,
	pub(crate) decimal_mode: DecimalMode,
	pub(crate) uuid_format: UuidFormat,
	pub(crate) reject_trailing_bytes: bool,
	pub(crate) max_seq_size: usize,
	pub(crate) max_depth: usize,
}

impl<'s> DeserializerConfig<'s> {
	pub fn new(schema: &'s Schema) -> Self {
		Self {
			schema,
			tagged_unions: false,
			decimal_mode: DecimalMode::default(),
			uuid_format: UuidFormat::default(),
			reject_trailing_bytes: false,
			max_seq_size: 1_000_000_000,
			max_depth: 128,
		}
	}

	/// Return union values as [`Value::Union`] carrying the branch name,
	/// instead of the bare inner value
	///
	/// `null` stays bare either way, since it carries no information worth
	/// retaining.
	pub fn tagged_unions(mut self, tagged_unions: bool) -> Self {
		self.tagged_unions = tagged_unions;
		self
	}

	pub fn decimal_mode(mut self, decimal_mode: DecimalMode) -> Self {
		self.decimal_mode = decimal_mode;
		self
	}

	pub fn uuid_format(mut self, uuid_format: UuidFormat) -> Self {
		self.uuid_format = uuid_format;
		self
	}

	/// Report bytes left over after the datum has been fully decoded, instead
	/// of silently accepting them
	pub fn reject_trailing_bytes(mut self, reject_trailing_bytes: bool) -> Self {
		self.reject_trailing_bytes = reject_trailing_bytes;
		self
	}

	/// Safeguard against malformed data advertising absurd container sizes
	pub fn max_seq_size(mut self, max_seq_size: usize) -> Self {
		self.max_seq_size = max_seq_size;
		self
	}

	/// Recursion budget for recursive schemas (stack overflow prevention)
	pub fn max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn schema(&self) -> &'s Schema {
		self.schema
	}
}

/// All configuration and state necessary for the deserialization to run
pub struct DeserializerState<'s, 'de> {
	pub(crate) reader: SliceRead<'de>,
	config: DeserializerConfig<'s>,
}

impl<'s, 'de> DeserializerState<'s, 'de> {
	pub fn from_slice(slice: &'de [u8], schema: &'s Schema) -> Self {
		Self::with_config(slice, DeserializerConfig::new(schema))
	}

	pub fn with_config(slice: &'de [u8], config: DeserializerConfig<'s>) -> Self {
		Self {
			reader: SliceRead::new(slice),
			config,
		}
	}

	pub fn config(&self) -> &DeserializerConfig<'s> {
		&self.config
	}

	/// Decode a single datum under the schema root
	pub fn read_datum(&mut self) -> Result<Value, DeError> {
		let allowed_depth = AllowedDepth::new(self.config.max_depth);
		let value = decoder::read_value(self, SchemaKey::ROOT, allowed_depth)?;
		if self.config.reject_trailing_bytes && !self.reader.is_empty() {
			return Err(DeError::new(DeErrorKind::TrailingBytes {
				remaining: self.reader.len(),
			}));
		}
		Ok(value)
	}
}
