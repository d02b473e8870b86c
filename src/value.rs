//! The dynamic [`Value`] model the codec produces and consumes

use std::collections::HashMap;

/// Any value that can be encoded to or decoded from an Avro datum
///
/// The serializer is schema-directed: a `Value` is interpreted through the
/// schema node it is encoded under, so e.g. an [`Value::Int`] may serialize
/// under a `long` schema. The deserializer always produces the variant
/// matching the schema node it decoded under.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	/// A `null` Avro value
	Null,
	/// A `boolean` Avro value
	Boolean(bool),
	/// An `int` Avro value
	Int(i32),
	/// A `long` Avro value
	Long(i64),
	/// A `float` Avro value
	Float(f32),
	/// A `double` Avro value
	Double(f64),
	/// A `bytes` Avro value
	Bytes(Vec<u8>),
	/// A `string` Avro value
	String(String),
	/// Raw content of a `fixed` value (also produced for a fixed-backed uuid
	/// decoded in binary format)
	Fixed(Vec<u8>),
	/// An `enum` symbol
	Enum(String),
	/// An `array` Avro value
	Array(Vec<Value>),
	/// A `map` Avro value (keys are always strings)
	Map(HashMap<String, Value>),
	/// A `record` Avro value, with fields in schema-declared order
	Record(Vec<(String, Value)>),
	/// A value paired with the union branch under which it was decoded or
	/// should be encoded
	///
	/// When encoding, the tag always overrides shape-based branch inference.
	/// Branch names are the fullname (or bare name) for named types and the
	/// primitive type name otherwise.
	Union {
		branch: String,
		value: Box<Value>,
	},
	/// Days since 1970-01-01 (`date` logical type)
	Date(i32),
	/// Milliseconds since midnight (`time-millis` logical type)
	TimeMillis(i32),
	/// Microseconds since midnight (`time-micros` logical type)
	TimeMicros(i64),
	/// Milliseconds since 1970-01-01T00:00:00Z (`timestamp-millis`)
	TimestampMillis(i64),
	/// Microseconds since 1970-01-01T00:00:00Z (`timestamp-micros`)
	TimestampMicros(i64),
	/// Nanoseconds since 1970-01-01T00:00:00Z (`timestamp-nanos`)
	TimestampNanos(i64),
	/// A `decimal` logical value (produced by the decoder in exact mode)
	Decimal(rust_decimal::Decimal),
	/// A `uuid` logical value
	Uuid(uuid::Uuid),
}

impl Value {
	/// Tag a value with the union branch it should be encoded under
	pub fn tagged(branch: impl Into<String>, value: Value) -> Self {
		Value::Union {
			branch: branch.into(),
			value: Box::new(value),
		}
	}

	/// A short name of the value's shape, for diagnostics
	pub(crate) fn kind_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Boolean(_) => "boolean",
			Value::Int(_) => "int",
			Value::Long(_) => "long",
			Value::Float(_) => "float",
			Value::Double(_) => "double",
			Value::Bytes(_) => "bytes",
			Value::String(_) => "string",
			Value::Fixed(_) => "fixed",
			Value::Enum(_) => "enum symbol",
			Value::Array(_) => "array",
			Value::Map(_) => "map",
			Value::Record(_) => "record",
			Value::Union { .. } => "tagged union",
			Value::Date(_) => "date",
			Value::TimeMillis(_) => "time-millis",
			Value::TimeMicros(_) => "time-micros",
			Value::TimestampMillis(_) => "timestamp-millis",
			Value::TimestampMicros(_) => "timestamp-micros",
			Value::TimestampNanos(_) => "timestamp-nanos",
			Value::Decimal(_) => "decimal",
			Value::Uuid(_) => "uuid",
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Long(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Double(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Value::Bytes(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Value::Array(value)
	}
}

impl From<HashMap<String, Value>> for Value {
	fn from(value: HashMap<String, Value>) -> Self {
		Value::Map(value)
	}
}

impl From<rust_decimal::Decimal> for Value {
	fn from(value: rust_decimal::Decimal) -> Self {
		Value::Decimal(value)
	}
}

impl From<uuid::Uuid> for Value {
	fn from(value: uuid::Uuid) -> Self {
		Value::Uuid(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		match value {
			None => Value::Null,
			Some(value) => value.into(),
		}
	}
}
