//! Borrowed mirror of the schema JSON, prior to any validation or linking

use serde::de::*;

use std::borrow::Cow;

pub(super) enum SchemaNode<'a> {
	Type(Type),
	Ref(Cow<'a, str>),
	Object(Box<SchemaNodeObject<'a>>),
	Union(Vec<SchemaNode<'a>>),
}

#[derive(serde_derive::Deserialize, Clone, Copy, Debug)]
#[serde(rename_all = "kebab-case")]
pub(super) enum Type {
	// Primitive types
	Null,
	Boolean,
	Int,
	Long,
	Float,
	Double,
	Bytes,
	String,
	// Complex types
	Array,
	Map,
	Record,
	Enum,
	Fixed,
}

pub(super) struct SchemaNodeObject<'a> {
	/// With a logical type this can be a primitive type name or a `fixed`
	/// declaration; without one it must be a complex type (or a nested full
	/// schema, which is legal but pointless)
	pub(super) type_: SchemaNode<'a>,
	pub(super) logical_type: Option<Cow<'a, str>>,
	/// For named types
	pub(super) name: Option<Cow<'a, str>>,
	/// For named types
	pub(super) namespace: Option<Cow<'a, str>>,
	/// For named types
	pub(super) aliases: Option<Vec<Cow<'a, str>>>,
	pub(super) doc: Option<Cow<'a, str>>,
	/// For record type
	pub(super) fields: Option<Vec<Field<'a>>>,
	/// For enum type
	pub(super) symbols: Option<Vec<Cow<'a, str>>>,
	/// For array type
	pub(super) items: Option<SchemaNode<'a>>,
	/// For map type
	pub(super) values: Option<SchemaNode<'a>>,
	/// For fixed type
	pub(super) size: Option<usize>,
	/// For decimal logical type
	pub(super) precision: Option<usize>,
	/// For decimal logical type
	pub(super) scale: Option<u32>,
	/// For enum type (default symbol)
	pub(super) default: Option<serde_json::Value>,
	/// Everything we did not recognize, in document order (hard error in
	/// strict parsing mode)
	pub(super) unknown_keys: Vec<String>,
}

impl SchemaNodeObject<'_> {
	/// Keys that prevent treating `{"type": <nested schema>}` as a plain
	/// passthrough to the nested schema
	pub(super) fn has_local_properties(&self) -> bool {
		self.fields.is_some()
			|| self.symbols.is_some()
			|| self.items.is_some()
			|| self.values.is_some()
			|| self.size.is_some()
			|| self.precision.is_some()
			|| self.scale.is_some()
			|| self.default.is_some()
	}
}

pub(super) struct Field<'a> {
	pub(super) name: Cow<'a, str>,
	pub(super) type_: SchemaNode<'a>,
	pub(super) default: Option<serde_json::Value>,
	pub(super) order: Option<Cow<'a, str>>,
	pub(super) aliases: Option<Vec<Cow<'a, str>>>,
	pub(super) doc: Option<Cow<'a, str>>,
	pub(super) unknown_keys: Vec<String>,
}

#[derive(serde_derive::Deserialize)]
pub(super) struct BorrowedCowIfPossible<'a>(#[serde(borrow)] pub(super) Cow<'a, str>);

impl<'de> Deserialize<'de> for SchemaNode<'de> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct SchemaNodeVisitor<'de>(std::marker::PhantomData<&'de ()>);
		impl<'de> Visitor<'de> for SchemaNodeVisitor<'de> {
			type Value = SchemaNode<'de>;

			fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
				write!(
					formatter,
					"A string (type) or an object with a `type` field or an array (union)"
				)
			}

			fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
			where
				A: MapAccess<'de>,
			{
				// That's an object.
				Ok(SchemaNode::Object(Deserialize::deserialize(
					serde::de::value::MapAccessDeserializer::new(map),
				)?))
			}

			fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
			where
				A: SeqAccess<'de>,
			{
				// That's a union.
				Ok(SchemaNode::Union(Deserialize::deserialize(
					serde::de::value::SeqAccessDeserializer::new(seq),
				)?))
			}

			fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
			where
				E: Error,
			{
				// That's a type right away, or a ref.
				Ok(match type_from_str(v) {
					Some(type_) => SchemaNode::Type(type_),
					None => SchemaNode::Ref(v.to_owned().into()),
				})
			}

			fn visit_borrowed_str<E>(self, v: &'de str) -> Result<Self::Value, E>
			where
				E: Error,
			{
				Ok(match type_from_str(v) {
					Some(type_) => SchemaNode::Type(type_),
					None => SchemaNode::Ref(v.into()),
				})
			}

			fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
			where
				E: Error,
			{
				Ok(match type_from_str(&v) {
					Some(type_) => SchemaNode::Type(type_),
					None => SchemaNode::Ref(v.into()),
				})
			}
		}
		deserializer.deserialize_any(SchemaNodeVisitor(std::marker::PhantomData))
	}
}

fn type_from_str(v: &str) -> Option<Type> {
	Type::deserialize(value::StrDeserializer::<FailedDeserialization>::new(v)).ok()
}

impl<'de> Deserialize<'de> for SchemaNodeObject<'de> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct ObjectVisitor<'de>(std::marker::PhantomData<&'de ()>);
		impl<'de> Visitor<'de> for ObjectVisitor<'de> {
			type Value = SchemaNodeObject<'de>;

			fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
				write!(formatter, "A schema object with a `type` field")
			}

			fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
			where
				A: MapAccess<'de>,
			{
				let mut type_ = None;
				let mut logical_type = None;
				let mut name = None;
				let mut namespace = None;
				let mut aliases = None;
				let mut doc = None;
				let mut fields = None;
				let mut symbols = None;
				let mut items = None;
				let mut values = None;
				let mut size = None;
				let mut precision = None;
				let mut scale = None;
				let mut default = None;
				let mut unknown_keys = Vec::new();
				while let Some(key) = map.next_key::<BorrowedCowIfPossible<'de>>()? {
					match &*key.0 {
						"type" => type_ = Some(map.next_value::<SchemaNode<'de>>()?),
						"logicalType" => logical_type = Some(map.next_value::<BorrowedCowIfPossible<'de>>()?.0),
						"name" => name = Some(map.next_value::<BorrowedCowIfPossible<'de>>()?.0),
						"namespace" => namespace = Some(map.next_value::<BorrowedCowIfPossible<'de>>()?.0),
						"aliases" => {
							aliases = Some(
								map.next_value::<Vec<BorrowedCowIfPossible<'de>>>()?
									.into_iter()
									.map(|c| c.0)
									.collect(),
							)
						}
						"doc" => doc = Some(map.next_value::<BorrowedCowIfPossible<'de>>()?.0),
						"fields" => fields = Some(map.next_value::<Vec<Field<'de>>>()?),
						"symbols" => {
							symbols = Some(
								map.next_value::<Vec<BorrowedCowIfPossible<'de>>>()?
									.into_iter()
									.map(|c| c.0)
									.collect(),
							)
						}
						"items" => items = Some(map.next_value::<SchemaNode<'de>>()?),
						"values" => values = Some(map.next_value::<SchemaNode<'de>>()?),
						"size" => size = Some(map.next_value::<usize>()?),
						"precision" => precision = Some(map.next_value::<usize>()?),
						"scale" => scale = Some(map.next_value::<u32>()?),
						"default" => default = Some(map.next_value::<serde_json::Value>()?),
						other => {
							unknown_keys.push(other.to_owned());
							map.next_value::<IgnoredAny>()?;
						}
					}
				}
				Ok(SchemaNodeObject {
					type_: type_.ok_or_else(|| A::Error::missing_field("type"))?,
					logical_type,
					name,
					namespace,
					aliases,
					doc,
					fields,
					symbols,
					items,
					values,
					size,
					precision,
					scale,
					default,
					unknown_keys,
				})
			}
		}
		deserializer.deserialize_map(ObjectVisitor(std::marker::PhantomData))
	}
}

impl<'de> Deserialize<'de> for Field<'de> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct FieldVisitor<'de>(std::marker::PhantomData<&'de ()>);
		impl<'de> Visitor<'de> for FieldVisitor<'de> {
			type Value = Field<'de>;

			fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
				write!(formatter, "A record field object with `name` and `type`")
			}

			fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
			where
				A: MapAccess<'de>,
			{
				let mut name = None;
				let mut type_ = None;
				let mut default = None;
				let mut order = None;
				let mut aliases = None;
				let mut doc = None;
				let mut unknown_keys = Vec::new();
				while let Some(key) = map.next_key::<BorrowedCowIfPossible<'de>>()? {
					match &*key.0 {
						"name" => name = Some(map.next_value::<BorrowedCowIfPossible<'de>>()?.0),
						"type" => type_ = Some(map.next_value::<SchemaNode<'de>>()?),
						"default" => default = Some(map.next_value::<serde_json::Value>()?),
						"order" => order = Some(map.next_value::<BorrowedCowIfPossible<'de>>()?.0),
						"aliases" => {
							aliases = Some(
								map.next_value::<Vec<BorrowedCowIfPossible<'de>>>()?
									.into_iter()
									.map(|c| c.0)
									.collect(),
							)
						}
						"doc" => doc = Some(map.next_value::<BorrowedCowIfPossible<'de>>()?.0),
						other => {
							unknown_keys.push(other.to_owned());
							map.next_value::<IgnoredAny>()?;
						}
					}
				}
				Ok(Field {
					name: name.ok_or_else(|| A::Error::missing_field("name"))?,
					type_: type_.ok_or_else(|| A::Error::missing_field("type"))?,
					default,
					order,
					aliases,
					doc,
					unknown_keys,
				})
			}
		}
		deserializer.deserialize_map(FieldVisitor(std::marker::PhantomData))
	}
}

#[derive(thiserror::Error, Debug)]
#[error("Failed to deserialize")]
struct FailedDeserialization;
impl Error for FailedDeserialization {
	fn custom<T: std::fmt::Display>(_msg: T) -> Self {
		FailedDeserialization
	}
}
