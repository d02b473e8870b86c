mod blocks;
mod decimal;

use super::{
	allowed_depth::AllowedDepth,
	error::{DeError, DeErrorKind},
	DeserializerState, UuidFormat,
};

use crate::{
	schema::{SchemaKey, SchemaNode, UuidRepr},
	Value,
};

/// Schema-directed decoding of a single value
///
/// Consumes bytes left to right under direction of the node designated by
/// `key`, allocating the output value for the caller.
pub(super) fn read_value(
	state: &mut DeserializerState<'_, '_>,
	key: SchemaKey,
	allowed_depth: AllowedDepth,
) -> Result<Value, DeError> {
	let schema = state.config().schema;
	match &schema[key] {
		SchemaNode::Null => Ok(Value::Null),
		SchemaNode::Boolean => match state.reader.read_slice(1)?[0] {
			0 => Ok(Value::Boolean(false)),
			1 => Ok(Value::Boolean(true)),
			byte => Err(DeError::new(DeErrorKind::InvalidBoolean { byte })),
		},
		SchemaNode::Int => Ok(Value::Int(read_int(state)?)),
		SchemaNode::Long => Ok(Value::Long(state.reader.read_varint()?)),
		SchemaNode::Float => Ok(Value::Float(f32::from_le_bytes(
			state.reader.read_const_size_buf()?,
		))),
		SchemaNode::Double => Ok(Value::Double(f64::from_le_bytes(
			state.reader.read_const_size_buf()?,
		))),
		SchemaNode::Bytes => Ok(Value::Bytes(read_length_delimited(state)?.to_vec())),
		SchemaNode::String => Ok(Value::String(read_string(state)?.to_owned())),
		SchemaNode::Fixed(fixed) => {
			Ok(Value::Fixed(state.reader.read_slice(fixed.size)?.to_vec()))
		}
		SchemaNode::Enum(enum_) => {
			let index: i64 = state.reader.read_varint()?;
			let symbol = usize::try_from(index)
				.ok()
				.and_then(|i| enum_.symbols.get(i))
				.ok_or_else(|| {
					DeError::new(DeErrorKind::EnumIndexOutOfRange {
						index,
						len: enum_.symbols.len(),
					})
				})?;
			Ok(Value::Enum(symbol.clone()))
		}
		SchemaNode::Array(items) => blocks::read_array(state, *items, allowed_depth.dec()?),
		SchemaNode::Map(values) => blocks::read_map(state, *values, allowed_depth.dec()?),
		SchemaNode::Union(union) => {
			let index: i64 = state.reader.read_varint()?;
			let &branch = usize::try_from(index)
				.ok()
				.and_then(|i| union.variants.get(i))
				.ok_or_else(|| {
					DeError::new(DeErrorKind::UnionBranchOutOfRange {
						index,
						len: union.variants.len(),
					})
				})?;
			let value = read_value(state, branch, allowed_depth.dec()?)?;
			Ok(
				match (state.config().tagged_unions, &schema[branch]) {
					// null carries no information worth retaining
					(false, _) | (true, SchemaNode::Null) => value,
					(true, node) => Value::Union {
						branch: node.wire_name().to_owned(),
						value: Box::new(value),
					},
				},
			)
		}
		SchemaNode::Record(record) => {
			let allowed_depth = allowed_depth.dec()?;
			let mut fields = Vec::with_capacity(record.fields.len());
			for field in &record.fields {
				let value = read_value(state, field.schema, allowed_depth)
					.map_err(|e| e.amend_path(&field.name))?;
				fields.push((field.name.clone(), value));
			}
			Ok(Value::Record(fields))
		}
		SchemaNode::Decimal(decimal) => decimal::read_decimal(state, decimal),
		SchemaNode::Uuid(UuidRepr::String) => {
			let text = read_string(state)?;
			let uuid = uuid::Uuid::parse_str(text).map_err(|_| {
				DeError::new(DeErrorKind::InvalidUuid {
					text: text.to_owned(),
				})
			})?;
			Ok(Value::Uuid(uuid))
		}
		SchemaNode::Uuid(UuidRepr::Fixed(fixed)) => {
			if fixed.size != 16 {
				return Err(DeError::new(DeErrorKind::InvalidBinaryUuid {
					size: fixed.size,
				}));
			}
			let raw = state.reader.read_slice(16)?;
			Ok(match state.config().uuid_format {
				UuidFormat::Binary => Value::Fixed(raw.to_vec()),
				UuidFormat::CanonicalString => {
					let uuid = uuid::Uuid::from_slice(raw).map_err(|_| {
						DeError::new(DeErrorKind::InvalidBinaryUuid { size: raw.len() })
					})?;
					Value::String(uuid.as_hyphenated().to_string())
				}
			})
		}
		SchemaNode::Date => Ok(Value::Date(read_int(state)?)),
		SchemaNode::TimeMillis => Ok(Value::TimeMillis(read_int(state)?)),
		SchemaNode::TimeMicros => Ok(Value::TimeMicros(state.reader.read_varint()?)),
		SchemaNode::TimestampMillis => Ok(Value::TimestampMillis(state.reader.read_varint()?)),
		SchemaNode::TimestampMicros => Ok(Value::TimestampMicros(state.reader.read_varint()?)),
		SchemaNode::TimestampNanos => Ok(Value::TimestampNanos(state.reader.read_varint()?)),
	}
}

/// `int` is long-encoded on the wire; the 32-bit range check happens after
/// the varint is decoded
fn read_int(state: &mut DeserializerState<'_, '_>) -> Result<i32, DeError> {
	let value: i64 = state.reader.read_varint()?;
	value
		.try_into()
		.map_err(|_| DeError::new(DeErrorKind::IntegerOutOfRange { value }))
}

pub(super) fn read_len(state: &mut DeserializerState<'_, '_>) -> Result<usize, DeError> {
	let len: i64 = state.reader.read_varint()?;
	len.try_into()
		.map_err(|_| DeError::new(DeErrorKind::InvalidLength { len }))
}

fn read_length_delimited<'de>(
	state: &mut DeserializerState<'_, 'de>,
) -> Result<&'de [u8], DeError> {
	let len = read_len(state)?;
	state.reader.read_slice(len)
}

pub(super) fn read_string<'de>(
	state: &mut DeserializerState<'_, 'de>,
) -> Result<&'de str, DeError> {
	let bytes = read_length_delimited(state)?;
	std::str::from_utf8(bytes).map_err(|_| {
		DeError::new(DeErrorKind::InvalidString {
			bytes: bytes.to_vec(),
		})
	})
}
