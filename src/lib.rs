//! # Getting started
//!
//! ```
//! let schema: avro_datum::Schema = r#"
//! {
//! 	"namespace": "test",
//! 	"type": "record",
//! 	"name": "Test",
//! 	"fields": [
//! 		{
//! 			"type": "string",
//! 			"name": "field"
//! 		}
//! 	]
//! }
//! "#
//! .parse()
//! .expect("Failed to parse schema");
//!
//! let value = avro_datum::Value::Record(vec![(
//! 	"field".to_owned(),
//! 	avro_datum::Value::String("foo".to_owned()),
//! )]);
//!
//! let datum = avro_datum::to_datum_vec(&value, &schema).expect("Failed to serialize");
//! assert_eq!(datum, [6, 102, 111, 111]);
//! assert_eq!(
//! 	avro_datum::from_datum_slice(&datum, &schema).expect("Failed to deserialize"),
//! 	value
//! );
//! ```
//!
//! # A schema-driven Avro binary codec
//!
//! This crate implements the [Avro](https://avro.apache.org/docs/current/specification/)
//! binary encoding for raw datums (no file headers, no sync markers): a
//! JSON schema is parsed once into an immutable [`Schema`] graph, then any
//! number of [`Value`]s can be encoded or decoded under it, concurrently if
//! desired.
//!
//! Logical types (`date`, `time-*`, `timestamp-*`, `decimal`, `uuid`) are
//! first-class: the parser resolves them into dedicated schema nodes, and the
//! codec converts them to and from dedicated [`Value`] variants.
//!
//! Non-default behaviors are driven by the configs:
//! - [`ser::SerializerConfig::include_block_byte_size`] emits skippable
//!   array/map blocks,
//! - [`de::DeserializerConfig::tagged_unions`] preserves union branch names
//!   on decode,
//! - [`de::DeserializerConfig::decimal_mode`] picks exact or approximate
//!   decimals,
//! - [`de::DeserializerConfig::uuid_format`] picks the output representation
//!   of fixed-backed uuids.

pub mod de;
pub mod schema;
pub mod ser;
mod value;

pub use {schema::Schema, value::Value};

/// Decode an avro "datum" (raw data, no headers...) from a slice
///
/// For non-default configuration (tagged unions, exact decimals...), use
/// [`de::DeserializerState::with_config`].
pub fn from_datum_slice(slice: &[u8], schema: &Schema) -> Result<Value, de::DeError> {
	de::DeserializerState::from_slice(slice, schema).read_datum()
}

/// Encode an avro "datum" (raw data, no headers...) to the provided writer
pub fn to_datum<W>(value: &Value, writer: W, schema: &Schema) -> Result<(), ser::SerError>
where
	W: std::io::Write,
{
	ser::SerializerState::from_writer(writer, schema).write_datum(value)
}

/// Encode an avro "datum" (raw data, no headers...) to a fresh `Vec<u8>`
pub fn to_datum_vec(value: &Value, schema: &Schema) -> Result<Vec<u8>, ser::SerError> {
	let mut serializer_state = ser::SerializerState::from_writer(Vec::new(), schema);
	serializer_state.write_datum(value)?;
	Ok(serializer_state.into_writer())
}
