mod blocks;
mod decimal;
mod defaults;
mod union;

use super::{
	error::{SerError, SerErrorKind},
	SerializerState,
};

use crate::{
	schema::{Record, SchemaKey, SchemaNode, UuidRepr},
	Value,
};

use {integer_encoding::VarIntWriter, std::borrow::Cow, std::io::Write};

/// Schema-directed encoding of a single value
///
/// The value is interpreted through the schema node designated by `key`;
/// lossless widenings (e.g. `Int` under a `long` schema) are accepted,
/// narrowings are accepted when the concrete value fits.
pub(super) fn write_value<W: Write>(
	state: &mut SerializerState<'_, W>,
	key: SchemaKey,
	value: &Value,
) -> Result<(), SerError> {
	let schema = state.config.schema;
	match &schema[key] {
		node @ SchemaNode::Null => match value {
			Value::Null => Ok(()),
			value => Err(mismatch(value, node)),
		},
		node @ SchemaNode::Boolean => match value {
			Value::Boolean(v) => state.writer.write_all(&[*v as u8]).map_err(SerError::io),
			value => Err(mismatch(value, node)),
		},
		node @ (SchemaNode::Int | SchemaNode::Date | SchemaNode::TimeMillis) => {
			let v: i32 = match (node, value) {
				(_, Value::Int(v)) => *v,
				(SchemaNode::Date, Value::Date(v)) | (SchemaNode::TimeMillis, Value::TimeMillis(v)) => *v,
				(_, Value::Long(v)) => (*v)
					.try_into()
					.map_err(|_| out_of_range(*v, node))?,
				(_, value) => return Err(mismatch(value, node)),
			};
			state
				.writer
				.write_varint(v)
				.map_err(SerError::io)
				.map(drop)
		}
		node @ (SchemaNode::Long
		| SchemaNode::TimeMicros
		| SchemaNode::TimestampMillis
		| SchemaNode::TimestampMicros
		| SchemaNode::TimestampNanos) => {
			let v: i64 = match (node, value) {
				(_, Value::Long(v)) => *v,
				(_, Value::Int(v)) => (*v).into(),
				(SchemaNode::TimeMicros, Value::TimeMicros(v))
				| (SchemaNode::TimestampMillis, Value::TimestampMillis(v))
				| (SchemaNode::TimestampMicros, Value::TimestampMicros(v))
				| (SchemaNode::TimestampNanos, Value::TimestampNanos(v)) => *v,
				(_, value) => return Err(mismatch(value, node)),
			};
			state
				.writer
				.write_varint(v)
				.map_err(SerError::io)
				.map(drop)
		}
		node @ SchemaNode::Float => {
			let v: f32 = match value {
				Value::Float(v) => *v,
				Value::Int(v) => *v as f32,
				Value::Long(v) => *v as f32,
				// f64 -> f32 narrowing is lossy
				value => return Err(mismatch(value, node)),
			};
			state.writer.write_all(&v.to_le_bytes()).map_err(SerError::io)
		}
		node @ SchemaNode::Double => {
			let v: f64 = match value {
				Value::Double(v) => *v,
				Value::Float(v) => (*v).into(),
				Value::Int(v) => (*v).into(),
				Value::Long(v) => *v as f64,
				value => return Err(mismatch(value, node)),
			};
			state.writer.write_all(&v.to_le_bytes()).map_err(SerError::io)
		}
		node @ SchemaNode::Bytes => match value {
			Value::Bytes(v) => state.write_length_delimited(v),
			Value::String(v) => state.write_length_delimited(v.as_bytes()),
			value => Err(mismatch(value, node)),
		},
		node @ SchemaNode::String => match value {
			Value::String(v) => state.write_length_delimited(v.as_bytes()),
			Value::Bytes(v) => match std::str::from_utf8(v) {
				Ok(_) => state.write_length_delimited(v),
				Err(_) => Err(SerError::new(SerErrorKind::InvalidString)),
			},
			value => Err(mismatch(value, node)),
		},
		node @ SchemaNode::Fixed(fixed) => {
			let raw: &[u8] = match value {
				Value::Fixed(v) | Value::Bytes(v) => v,
				Value::String(v) => v.as_bytes(),
				value => return Err(mismatch(value, node)),
			};
			if raw.len() != fixed.size {
				return Err(SerError::new(SerErrorKind::FixedSizeMismatch {
					expected: fixed.size,
					got: raw.len(),
				}));
			}
			state.writer.write_all(raw).map_err(SerError::io)
		}
		node @ SchemaNode::Enum(enum_) => {
			let symbol = match value {
				Value::Enum(symbol) | Value::String(symbol) => symbol,
				value => return Err(mismatch(value, node)),
			};
			let discriminant: i64 = match enum_.per_symbol_lookup.get(symbol.as_str()) {
				Some(&discriminant) => discriminant.try_into().map_err(|_| {
					SerError::new(SerErrorKind::LengthOverflow {
						what: "enum discriminant",
					})
				})?,
				None => {
					return Err(SerError::new(SerErrorKind::EnumSymbolNotFound {
						symbol: symbol.clone(),
					}))
				}
			};
			state
				.writer
				.write_varint(discriminant)
				.map_err(SerError::io)
				.map(drop)
		}
		node @ SchemaNode::Array(items) => match value {
			Value::Array(values) => blocks::write_array(state, *items, values),
			value => Err(mismatch(value, node)),
		},
		node @ SchemaNode::Map(values_schema) => match value {
			Value::Map(map) => blocks::write_map(state, *values_schema, map),
			value => Err(mismatch(value, node)),
		},
		SchemaNode::Union(union) => union::write_union(state, union, value),
		node @ SchemaNode::Record(record) => match value {
			Value::Record(_) | Value::Map(_) => write_record(state, record, value),
			value => Err(mismatch(value, node)),
		},
		SchemaNode::Decimal(decimal) => decimal::write_decimal(state, decimal, value),
		node @ SchemaNode::Uuid(repr) => write_uuid(state, node, repr, value),
	}
}

fn write_record<W: Write>(
	state: &mut SerializerState<'_, W>,
	record: &Record,
	value: &Value,
) -> Result<(), SerError> {
	for (i, field) in record.fields.iter().enumerate() {
		match field_value(value, i, &field.name) {
			Some(v) => {
				write_value(state, field.schema, v).map_err(|e| e.amend_path(&field.name))?
			}
			None => match &field.default {
				Some(default) => {
					let v = defaults::value_from_default(state.config.schema, field.schema, default)
						.map_err(|e| e.amend_path(&field.name))?;
					write_value(state, field.schema, &v).map_err(|e| e.amend_path(&field.name))?;
				}
				None => {
					return Err(SerError::new(SerErrorKind::TypeMismatch {
						value: format!("record value missing field `{}`", field.name).into(),
						schema: Cow::Owned(format!(
							"record {}",
							record.name.fully_qualified_name()
						)),
					}))
				}
			},
		}
	}
	Ok(())
}

/// Fields typically come in schema order, so try the positional slot before
/// falling back to a scan
fn field_value<'v>(value: &'v Value, i: usize, name: &str) -> Option<&'v Value> {
	match value {
		Value::Record(fields) => match fields.get(i) {
			Some((n, v)) if n == name => Some(v),
			_ => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
		},
		Value::Map(map) => map.get(name),
		_ => None,
	}
}

fn write_uuid<W: Write>(
	state: &mut SerializerState<'_, W>,
	node: &SchemaNode,
	repr: &UuidRepr,
	value: &Value,
) -> Result<(), SerError> {
	match repr {
		UuidRepr::String => match value {
			Value::Uuid(uuid) => {
				let mut buf = [0u8; uuid::fmt::Hyphenated::LENGTH];
				let text = uuid.as_hyphenated().encode_lower(&mut buf);
				state.write_length_delimited(text.as_bytes())
			}
			Value::String(text) => {
				// The text is forwarded as-is, but it has to actually be a uuid
				uuid::Uuid::parse_str(text).map_err(|_| {
					SerError::new(SerErrorKind::InvalidUuid { text: text.clone() })
				})?;
				state.write_length_delimited(text.as_bytes())
			}
			value => Err(mismatch(value, node)),
		},
		UuidRepr::Fixed(fixed) => {
			let raw: &[u8] = match value {
				Value::Uuid(uuid) => uuid.as_bytes(),
				Value::Fixed(raw) | Value::Bytes(raw) => raw,
				Value::String(text) => {
					let uuid = uuid::Uuid::parse_str(text).map_err(|_| {
						SerError::new(SerErrorKind::InvalidUuid { text: text.clone() })
					})?;
					return state.writer.write_all(uuid.as_bytes()).map_err(SerError::io);
				}
				value => return Err(mismatch(value, node)),
			};
			if raw.len() != fixed.size {
				return Err(SerError::new(SerErrorKind::FixedSizeMismatch {
					expected: fixed.size,
					got: raw.len(),
				}));
			}
			state.writer.write_all(raw).map_err(SerError::io)
		}
	}
}

fn mismatch(value: &Value, node: &SchemaNode) -> SerError {
	SerError::new(SerErrorKind::TypeMismatch {
		value: value.kind_name().into(),
		schema: Cow::Owned(node.wire_name().to_owned()),
	})
}

fn out_of_range(v: i64, node: &SchemaNode) -> SerError {
	SerError::new(SerErrorKind::TypeMismatch {
		value: Cow::Owned(format!("long {v}")),
		schema: Cow::Owned(node.wire_name().to_owned()),
	})
}

impl<W: Write> SerializerState<'_, W> {
	pub(crate) fn write_length_delimited(&mut self, data: &[u8]) -> Result<(), SerError> {
		self.writer
			.write_varint::<i64>(data.len().try_into().map_err(|_| {
				SerError::new(SerErrorKind::LengthOverflow {
					what: "length-delimited field size",
				})
			})?)
			.map_err(SerError::io)?;
		self.writer.write_all(data).map_err(SerError::io)
	}
}
