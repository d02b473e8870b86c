use super::*;

use crate::schema::{DecimalRepr, Schema};

use std::collections::HashMap;

/// Materialize a schema default (validated at parse time) as a [`Value`], so
/// that a record value may omit fields that carry one
pub(super) fn value_from_default(
	schema: &Schema,
	key: SchemaKey,
	default: &serde_json::Value,
) -> Result<Value, SerError> {
	let incompatible = || {
		SerError::new(SerErrorKind::TypeMismatch {
			value: Cow::Owned(format!("default {default}")),
			schema: Cow::Owned(schema[key].wire_name().to_owned()),
		})
	};
	Ok(match &schema[key] {
		SchemaNode::Null => match default {
			serde_json::Value::Null => Value::Null,
			_ => return Err(incompatible()),
		},
		SchemaNode::Boolean => Value::Boolean(default.as_bool().ok_or_else(incompatible)?),
		SchemaNode::Int => Value::Int(
			default
				.as_i64()
				.and_then(|v| i32::try_from(v).ok())
				.ok_or_else(incompatible)?,
		),
		SchemaNode::Date => Value::Date(
			default
				.as_i64()
				.and_then(|v| i32::try_from(v).ok())
				.ok_or_else(incompatible)?,
		),
		SchemaNode::TimeMillis => Value::TimeMillis(
			default
				.as_i64()
				.and_then(|v| i32::try_from(v).ok())
				.ok_or_else(incompatible)?,
		),
		SchemaNode::Long => Value::Long(default.as_i64().ok_or_else(incompatible)?),
		SchemaNode::TimeMicros => Value::TimeMicros(default.as_i64().ok_or_else(incompatible)?),
		SchemaNode::TimestampMillis => {
			Value::TimestampMillis(default.as_i64().ok_or_else(incompatible)?)
		}
		SchemaNode::TimestampMicros => {
			Value::TimestampMicros(default.as_i64().ok_or_else(incompatible)?)
		}
		SchemaNode::TimestampNanos => {
			Value::TimestampNanos(default.as_i64().ok_or_else(incompatible)?)
		}
		SchemaNode::Float => Value::Float(default.as_f64().ok_or_else(incompatible)? as f32),
		SchemaNode::Double => Value::Double(default.as_f64().ok_or_else(incompatible)?),
		SchemaNode::String | SchemaNode::Uuid(UuidRepr::String) => {
			Value::String(default.as_str().ok_or_else(incompatible)?.to_owned())
		}
		SchemaNode::Bytes => Value::Bytes(json_str_to_bytes(
			default.as_str().ok_or_else(incompatible)?,
		)),
		SchemaNode::Fixed(_) | SchemaNode::Uuid(UuidRepr::Fixed(_)) => Value::Fixed(
			json_str_to_bytes(default.as_str().ok_or_else(incompatible)?),
		),
		SchemaNode::Enum(_) => Value::Enum(default.as_str().ok_or_else(incompatible)?.to_owned()),
		SchemaNode::Array(items) => {
			let values = default.as_array().ok_or_else(incompatible)?;
			Value::Array(
				values
					.iter()
					.map(|v| value_from_default(schema, *items, v))
					.collect::<Result<_, _>>()?,
			)
		}
		SchemaNode::Map(values_schema) => {
			let object = default.as_object().ok_or_else(incompatible)?;
			Value::Map(
				object
					.iter()
					.map(|(k, v)| Ok((k.clone(), value_from_default(schema, *values_schema, v)?)))
					.collect::<Result<HashMap<_, _>, SerError>>()?,
			)
		}
		SchemaNode::Record(record) => {
			let object = default.as_object().ok_or_else(incompatible)?;
			let mut fields = Vec::with_capacity(record.fields.len());
			for field in &record.fields {
				let value = match object.get(&field.name).or(field.default.as_ref()) {
					Some(v) => value_from_default(schema, field.schema, v)?,
					None => return Err(incompatible()),
				};
				fields.push((field.name.clone(), value));
			}
			Value::Record(fields)
		}
		// A union default always corresponds to the first branch
		SchemaNode::Union(union) => {
			let &first = union.variants.first().ok_or_else(incompatible)?;
			let value = value_from_default(schema, first, default)?;
			Value::tagged(schema[first].wire_name(), value)
		}
		// The default string holds the raw two's-complement bytes, which are
		// reinterpreted at the schema scale
		SchemaNode::Decimal(decimal) => {
			let raw = json_str_to_bytes(default.as_str().ok_or_else(incompatible)?);
			if let DecimalRepr::Fixed(fixed) = &decimal.repr {
				if raw.len() != fixed.size {
					return Err(incompatible());
				}
			}
			if raw.len() > 16 {
				return Err(SerError::new(SerErrorKind::DecimalOutOfRange {
					reason: "unscaled values larger than 16 bytes are not supported".into(),
				}));
			}
			let mut buf = if raw.first().map_or(false, |&b| b & 0x80 != 0) {
				[0xFFu8; 16]
			} else {
				[0u8; 16]
			};
			buf[16 - raw.len()..].copy_from_slice(&raw);
			let unscaled = i128::from_be_bytes(buf);
			Value::Decimal(
				rust_decimal::Decimal::try_from_i128_with_scale(unscaled, decimal.scale).map_err(
					|_| {
						SerError::new(SerErrorKind::DecimalOutOfRange {
							reason: "default is not representable as a decimal".into(),
						})
					},
				)?,
			)
		}
	})
}

/// Byte-ish JSON defaults are strings whose code points all are <= U+00FF,
/// each one standing for a byte
fn json_str_to_bytes(s: &str) -> Vec<u8> {
	s.chars().map(|c| c as u8).collect()
}
