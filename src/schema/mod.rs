//! Parse, navigate and validate the [`Schema`]

mod canonical_form;
mod check_for_cycles;
mod error;
mod parsing;
mod rabin;

pub use {
	error::{SchemaError, SchemaErrorKind},
	parsing::ParserConfig,
};

use std::collections::HashMap;

/// A parsed and fully linked Avro schema
///
/// References to named types are resolved at construction time: all nodes are
/// stored in a flat array and refer to each other through [`SchemaKey`]s, so
/// even self-referential records boil down to a plain table plus handles
/// instead of an ownership cycle.
///
/// A `Schema` is immutable once built and holds no interior mutability, so it
/// may be shared freely across concurrently running serializations and
/// deserializations.
#[derive(Clone, Debug)]
pub struct Schema {
	// First node in the array is considered to be the root
	pub(crate) nodes: Vec<SchemaNode>,
	// Fullnames and aliases of all named types, pointing at their defining node
	pub(crate) names: HashMap<String, SchemaKey>,
	pub(crate) schema_json: String,
}

impl Schema {
	/// The root node of the schema
	pub fn root(&self) -> &SchemaNode {
		&self.nodes[SchemaKey::ROOT.idx]
	}

	/// The underlying graph storage
	///
	/// [`SchemaKey`]s are indexes into this slice.
	pub fn nodes(&self) -> &[SchemaNode] {
		&self.nodes
	}

	/// Resolve a named type (record, enum, fixed) by fullname or alias
	pub fn lookup(&self, fullname: &str) -> Option<SchemaKey> {
		self.names.get(fullname).copied()
	}

	/// The sanitized (minified, all keys preserved) JSON this schema was
	/// parsed from
	pub fn json(&self) -> &str {
		&self.schema_json
	}
}

impl std::ops::Index<SchemaKey> for Schema {
	type Output = SchemaNode;
	fn index(&self, key: SchemaKey) -> &Self::Output {
		&self.nodes[key.idx]
	}
}

impl std::str::FromStr for Schema {
	type Err = SchemaError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ParserConfig::new().parse_str(s)
	}
}

/// The location of a node in the [`Schema`]
///
/// This can be used to [`Index`](std::ops::Index) into the [`Schema`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SchemaKey {
	pub(crate) idx: usize,
}

impl SchemaKey {
	pub(crate) const ROOT: SchemaKey = SchemaKey { idx: 0 };

	pub fn idx(self) -> usize {
		self.idx
	}
}

/// A node of the schema graph
///
/// Logical types are first-class variants here: a `{"type": "int",
/// "logicalType": "date"}` parses as [`SchemaNode::Date`], so the codec can
/// dispatch on a single tag.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum SchemaNode {
	/// A `null` Avro schema
	Null,
	/// A `boolean` Avro schema
	Boolean,
	/// An `int` Avro schema
	Int,
	/// A `long` Avro schema
	Long,
	/// A `float` Avro schema
	Float,
	/// A `double` Avro schema
	Double,
	/// A `bytes` Avro schema, a sequence of 8-bit unsigned bytes
	Bytes,
	/// A `string` Avro schema, a unicode character sequence
	String,
	/// An `array` Avro schema; the key designates the schema of the items
	Array(SchemaKey),
	/// A `map` Avro schema; the key designates the schema of the values
	/// (map keys are always strings)
	Map(SchemaKey),
	/// A `union` Avro schema
	Union(Union),
	/// A `record` Avro schema
	Record(Record),
	/// An `enum` Avro schema
	Enum(Enum),
	/// A `fixed` Avro schema
	Fixed(Fixed),
	/// The `decimal` logical type, backed by `bytes` or `fixed`
	///
	/// <https://avro.apache.org/docs/current/specification/#decimal>
	Decimal(Decimal),
	/// The `uuid` logical type, backed by `string` or a 16-byte `fixed`
	Uuid(UuidRepr),
	/// Number of days since the unix epoch, backed by `int`
	Date,
	/// Time of day in milliseconds after midnight, backed by `int`
	TimeMillis,
	/// Time of day in microseconds after midnight, backed by `long`
	TimeMicros,
	/// An instant as milliseconds since the unix epoch, backed by `long`
	TimestampMillis,
	/// An instant as microseconds since the unix epoch, backed by `long`
	TimestampMicros,
	/// An instant as nanoseconds since the unix epoch, backed by `long`
	TimestampNanos,
}

impl SchemaNode {
	/// Name under which this node participates in union tagging and
	/// diagnostics: the fullname for named types, the underlying primitive
	/// name for everything else (logical types included)
	pub(crate) fn wire_name(&self) -> &str {
		match self {
			SchemaNode::Null => "null",
			SchemaNode::Boolean => "boolean",
			SchemaNode::Int | SchemaNode::Date | SchemaNode::TimeMillis => "int",
			SchemaNode::Long
			| SchemaNode::TimeMicros
			| SchemaNode::TimestampMillis
			| SchemaNode::TimestampMicros
			| SchemaNode::TimestampNanos => "long",
			SchemaNode::Float => "float",
			SchemaNode::Double => "double",
			SchemaNode::Bytes => "bytes",
			SchemaNode::String | SchemaNode::Uuid(UuidRepr::String) => "string",
			SchemaNode::Array(_) => "array",
			SchemaNode::Map(_) => "map",
			SchemaNode::Union(_) => "union",
			SchemaNode::Record(record) => record.name.fully_qualified_name(),
			SchemaNode::Enum(enum_) => enum_.name.fully_qualified_name(),
			SchemaNode::Fixed(fixed) => fixed.name.fully_qualified_name(),
			SchemaNode::Decimal(Decimal {
				repr: DecimalRepr::Bytes,
				..
			}) => "bytes",
			SchemaNode::Decimal(Decimal {
				repr: DecimalRepr::Fixed(fixed),
				..
			})
			| SchemaNode::Uuid(UuidRepr::Fixed(fixed)) => fixed.name.fully_qualified_name(),
		}
	}

	/// Whether an explicitly tagged union value designates this node
	///
	/// Named types answer to both their bare name and their fullname.
	pub(crate) fn matches_tag(&self, tag: &str) -> bool {
		let name = match self {
			SchemaNode::Record(record) => &record.name,
			SchemaNode::Enum(enum_) => &enum_.name,
			SchemaNode::Fixed(fixed) => &fixed.name,
			SchemaNode::Decimal(Decimal {
				repr: DecimalRepr::Fixed(fixed),
				..
			})
			| SchemaNode::Uuid(UuidRepr::Fixed(fixed)) => &fixed.name,
			other => return other.wire_name() == tag,
		};
		name.name() == tag || name.fully_qualified_name() == tag
	}
}

/// Component of a [`SchemaNode`]
#[derive(Clone, Debug)]
pub struct Union {
	pub variants: Vec<SchemaKey>,
}

/// Component of a [`SchemaNode`]
#[derive(Clone, Debug)]
pub struct Record {
	pub name: Name,
	pub aliases: Vec<Name>,
	pub doc: Option<String>,
	pub fields: Vec<RecordField>,
}

/// Component of a [`Record`]
#[derive(Clone, Debug)]
pub struct RecordField {
	pub name: String,
	pub aliases: Vec<String>,
	pub doc: Option<String>,
	pub schema: SchemaKey,
	/// Default value for this field, as JSON, validated against the field's
	/// schema at parse time
	pub default: Option<serde_json::Value>,
	pub order: FieldOrder,
}

/// Sort order of a [`RecordField`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldOrder {
	#[default]
	Ascending,
	Descending,
	Ignore,
}

/// Component of a [`SchemaNode`]
#[derive(Clone, Debug)]
pub struct Enum {
	pub name: Name,
	pub aliases: Vec<Name>,
	pub doc: Option<String>,
	/// Symbols, in the order that defines their discriminants
	pub symbols: Vec<String>,
	pub default_symbol: Option<String>,
	pub(crate) per_symbol_lookup: HashMap<String, usize>,
}

/// Component of a [`SchemaNode`]
#[derive(Clone, Debug)]
pub struct Fixed {
	pub name: Name,
	pub aliases: Vec<Name>,
	pub size: usize,
}

/// Component of a [`SchemaNode`]
///
/// `scale` defaults to 0 and `precision` is an integer greater than 0.
#[derive(Clone, Debug)]
pub struct Decimal {
	pub precision: usize,
	pub scale: u32,
	pub repr: DecimalRepr,
}

/// Representation of a [`Decimal`] on the wire
#[derive(Clone, Debug)]
pub enum DecimalRepr {
	Bytes,
	Fixed(Fixed),
}

/// Representation of the `uuid` logical type on the wire
#[derive(Clone, Debug)]
pub enum UuidRepr {
	/// Canonical 36-character hyphenated text
	String,
	/// Raw 16 bytes
	Fixed(Fixed),
}

/// Schema component for named variants of a [`SchemaNode`]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name {
	fully_qualified_name: String,
	namespace_delimiter_idx: Option<usize>,
}

impl std::fmt::Debug for Name {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Debug::fmt(&self.fully_qualified_name, f)
	}
}

impl Name {
	pub(crate) fn from_parts(namespace: Option<&str>, name: &str) -> Self {
		match namespace {
			None => Name {
				fully_qualified_name: name.to_owned(),
				namespace_delimiter_idx: None,
			},
			Some(namespace) => Name {
				fully_qualified_name: format!("{}.{}", namespace, name),
				namespace_delimiter_idx: Some(namespace.len()),
			},
		}
	}

	pub fn name(&self) -> &str {
		match self.namespace_delimiter_idx {
			None => &self.fully_qualified_name,
			Some(delimiter_idx) => &self.fully_qualified_name[delimiter_idx + 1..],
		}
	}

	pub fn namespace(&self) -> Option<&str> {
		self.namespace_delimiter_idx
			.map(|idx| &self.fully_qualified_name[..idx])
	}

	pub fn fully_qualified_name(&self) -> &str {
		&self.fully_qualified_name
	}
}
