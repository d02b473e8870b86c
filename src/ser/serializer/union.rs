use super::*;

use crate::schema::{Record, Schema, Union};

/// Select the union branch and encode the value under it
///
/// An explicitly tagged value forces the named branch. An untagged value is
/// matched against every branch: an exact variant match beats a lossless
/// widening, which beats a lossy-but-representable one; among equal matches
/// the branch declared first wins.
pub(super) fn write_union<W: Write>(
	state: &mut SerializerState<'_, W>,
	union: &Union,
	value: &Value,
) -> Result<(), SerError> {
	let schema = state.config.schema;
	let (discriminant, branch, value) = match value {
		Value::Union {
			branch,
			value: inner,
		} => {
			match union
				.variants
				.iter()
				.enumerate()
				.find(|&(_, &key)| schema[key].matches_tag(branch))
			{
				Some((i, &key)) => (i as i64, key, &**inner),
				None => {
					return Err(SerError::new(SerErrorKind::UnionBranchNotFound {
						value: format!("tagged branch {branch:?}").into(),
						branches: branch_list(schema, union),
					}))
				}
			}
		}
		value => {
			let mut best: Option<(u8, usize, SchemaKey)> = None;
			for (i, &key) in union.variants.iter().enumerate() {
				if let Some(priority) = match_priority(schema, key, value) {
					if best.map_or(true, |(best_priority, ..)| priority < best_priority) {
						best = Some((priority, i, key));
					}
					if priority == 0 {
						break;
					}
				}
			}
			match best {
				Some((_, i, key)) => (i as i64, key, value),
				None => {
					return Err(SerError::new(SerErrorKind::UnionBranchNotFound {
						value: value.kind_name().into(),
						branches: branch_list(schema, union),
					}))
				}
			}
		}
	};
	state
		.writer
		.write_varint(discriminant)
		.map_err(SerError::io)?;
	write_value(state, branch, value)
}

/// How well `value` fits the branch: `Some(0)` is an exact variant match,
/// higher values are coercions, `None` is no match
fn match_priority(schema: &Schema, key: SchemaKey, value: &Value) -> Option<u8> {
	match (&schema[key], value) {
		(SchemaNode::Null, Value::Null) => Some(0),
		(SchemaNode::Boolean, Value::Boolean(_)) => Some(0),
		(SchemaNode::Int, Value::Int(_)) => Some(0),
		(SchemaNode::Int, Value::Long(v)) if i32::try_from(*v).is_ok() => Some(1),
		(SchemaNode::Long, Value::Long(_)) => Some(0),
		(SchemaNode::Long, Value::Int(_)) => Some(1),
		(SchemaNode::Float, Value::Float(_)) => Some(0),
		(SchemaNode::Float, Value::Int(_) | Value::Long(_)) => Some(2),
		(SchemaNode::Double, Value::Double(_)) => Some(0),
		(SchemaNode::Double, Value::Float(_)) => Some(1),
		(SchemaNode::Double, Value::Int(_) | Value::Long(_)) => Some(2),
		(SchemaNode::Bytes, Value::Bytes(_)) => Some(0),
		(SchemaNode::Bytes, Value::String(_)) => Some(2),
		(SchemaNode::String, Value::String(_)) => Some(0),
		(SchemaNode::Array(_), Value::Array(_)) => Some(0),
		(SchemaNode::Map(_), Value::Map(_)) => Some(0),
		(SchemaNode::Map(_), Value::Record(_)) => Some(1),
		(SchemaNode::Record(record), Value::Record(_)) if fields_present(record, value) => Some(0),
		(SchemaNode::Record(record), Value::Map(_)) if fields_present(record, value) => Some(1),
		(SchemaNode::Enum(enum_), Value::Enum(symbol)) => {
			enum_.per_symbol_lookup.contains_key(symbol.as_str()).then_some(0)
		}
		(SchemaNode::Enum(enum_), Value::String(symbol)) => {
			enum_.per_symbol_lookup.contains_key(symbol.as_str()).then_some(1)
		}
		(SchemaNode::Fixed(fixed), Value::Fixed(raw)) if raw.len() == fixed.size => Some(0),
		(SchemaNode::Fixed(fixed), Value::Bytes(raw)) if raw.len() == fixed.size => Some(1),
		(SchemaNode::Fixed(fixed), Value::String(s)) if s.len() == fixed.size => Some(2),
		(SchemaNode::Decimal(_), Value::Decimal(_)) => Some(0),
		(SchemaNode::Decimal(_), Value::Int(_) | Value::Long(_) | Value::Double(_)) => Some(2),
		(SchemaNode::Uuid(_), Value::Uuid(_)) => Some(0),
		(SchemaNode::Uuid(UuidRepr::String), Value::String(s)) => {
			uuid::Uuid::parse_str(s).is_ok().then_some(1)
		}
		(SchemaNode::Uuid(UuidRepr::Fixed(_)), Value::Fixed(raw)) if raw.len() == 16 => Some(1),
		(SchemaNode::Uuid(UuidRepr::Fixed(_)), Value::Bytes(raw)) if raw.len() == 16 => Some(2),
		(SchemaNode::Uuid(UuidRepr::Fixed(_)), Value::String(s)) => {
			uuid::Uuid::parse_str(s).is_ok().then_some(2)
		}
		(SchemaNode::Date, Value::Date(_)) => Some(0),
		(SchemaNode::Date, Value::Int(_)) => Some(1),
		(SchemaNode::Date, Value::Long(v)) if i32::try_from(*v).is_ok() => Some(2),
		(SchemaNode::TimeMillis, Value::TimeMillis(_)) => Some(0),
		(SchemaNode::TimeMillis, Value::Int(_)) => Some(1),
		(SchemaNode::TimeMillis, Value::Long(v)) if i32::try_from(*v).is_ok() => Some(2),
		(SchemaNode::TimeMicros, Value::TimeMicros(_)) => Some(0),
		(SchemaNode::TimeMicros, Value::Long(_)) => Some(1),
		(SchemaNode::TimeMicros, Value::Int(_)) => Some(2),
		(SchemaNode::TimestampMillis, Value::TimestampMillis(_)) => Some(0),
		(SchemaNode::TimestampMillis, Value::Long(_)) => Some(1),
		(SchemaNode::TimestampMillis, Value::Int(_)) => Some(2),
		(SchemaNode::TimestampMicros, Value::TimestampMicros(_)) => Some(0),
		(SchemaNode::TimestampMicros, Value::Long(_)) => Some(1),
		(SchemaNode::TimestampMicros, Value::Int(_)) => Some(2),
		(SchemaNode::TimestampNanos, Value::TimestampNanos(_)) => Some(0),
		(SchemaNode::TimestampNanos, Value::Long(_)) => Some(1),
		(SchemaNode::TimestampNanos, Value::Int(_)) => Some(2),
		// Nested unions are rejected at parse time
		_ => None,
	}
}

/// Record matching goes by field names: every field that has no default must
/// be present in the value
fn fields_present(record: &Record, value: &Value) -> bool {
	record.fields.iter().all(|field| {
		field.default.is_some()
			|| match value {
				Value::Record(fields) => fields.iter().any(|(name, _)| *name == field.name),
				Value::Map(map) => map.contains_key(&field.name),
				_ => false,
			}
	})
}

fn branch_list(schema: &Schema, union: &Union) -> String {
	union
		.variants
		.iter()
		.map(|&key| schema[key].wire_name())
		.collect::<Vec<_>>()
		.join(", ")
}
