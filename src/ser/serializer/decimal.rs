use super::*;

use crate::schema::{Decimal, DecimalRepr};

/// Encode the unscaled integer value at the schema's scale, two's-complement
/// big-endian: minimal-length for a bytes-backed decimal, sign-extended to
/// the declared size for a fixed-backed one
pub(super) fn write_decimal<W: Write>(
	state: &mut SerializerState<'_, W>,
	decimal: &Decimal,
	value: &Value,
) -> Result<(), SerError> {
	let unscaled: i128 = match value {
		Value::Decimal(d) => rescale(d.mantissa(), d.scale(), decimal.scale)?,
		Value::Int(v) => rescale((*v).into(), 0, decimal.scale)?,
		Value::Long(v) => rescale((*v).into(), 0, decimal.scale)?,
		Value::Double(v) => {
			let d: rust_decimal::Decimal =
				num_traits::FromPrimitive::from_f64(*v).ok_or_else(|| {
					SerError::new(SerErrorKind::DecimalOutOfRange {
						reason: "f64 cannot be converted to a decimal".into(),
					})
				})?;
			rescale(d.mantissa(), d.scale(), decimal.scale)?
		}
		Value::String(s) => {
			let d: rust_decimal::Decimal = s.parse().map_err(|_| {
				SerError::new(SerErrorKind::TypeMismatch {
					value: Cow::Owned(format!("string {s:?}")),
					schema: "decimal".into(),
				})
			})?;
			rescale(d.mantissa(), d.scale(), decimal.scale)?
		}
		value => {
			return Err(SerError::new(SerErrorKind::TypeMismatch {
				value: value.kind_name().into(),
				schema: "decimal".into(),
			}))
		}
	};

	// Declared precision bound, checkable as long as 10^precision fits an i128
	if let Some(limit) = decimal
		.precision
		.try_into()
		.ok()
		.and_then(|precision| 10i128.checked_pow(precision))
	{
		match unscaled.checked_abs() {
			Some(magnitude) if magnitude < limit => {}
			_ => {
				return Err(SerError::new(SerErrorKind::DecimalOutOfRange {
					reason: format!(
						"unscaled value {unscaled} exceeds declared precision {}",
						decimal.precision
					)
					.into(),
				}))
			}
		}
	}

	let bytes = unscaled.to_be_bytes();
	match decimal.repr {
		DecimalRepr::Bytes => {
			// Minimal-length two's-complement: drop each leading byte that is
			// pure sign extension of the remainder
			let mut start = 0;
			while start < bytes.len() - 1
				&& ((bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
					|| (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0))
			{
				start += 1;
			}
			state.write_length_delimited(&bytes[start..])
		}
		DecimalRepr::Fixed(ref fixed) => {
			let sign_byte = if unscaled < 0 { 0xFFu8 } else { 0x00 };
			match fixed.size.checked_sub(bytes.len()) {
				// Wider than 16 bytes: left-pad with sign bytes
				Some(padding) => {
					for _ in 0..padding {
						state.writer.write_all(&[sign_byte]).map_err(SerError::io)?;
					}
					state.writer.write_all(&bytes).map_err(SerError::io)
				}
				None => {
					let start = bytes.len() - fixed.size;
					// Every dropped byte must be redundant sign extension,
					// and the remaining top bit must still carry the sign
					if bytes[..start].iter().any(|&b| b != sign_byte)
						|| (bytes[start] & 0x80 != 0) != (unscaled < 0)
					{
						return Err(SerError::new(SerErrorKind::DecimalOutOfRange {
							reason: format!(
								"unscaled value {unscaled} does not fit in a fixed of size {}",
								fixed.size
							)
							.into(),
						}));
					}
					state.writer.write_all(&bytes[start..]).map_err(SerError::io)
				}
			}
		}
	}
}

/// Move a mantissa from its own scale to the schema-mandated one, refusing
/// anything that cannot be represented exactly
fn rescale(mantissa: i128, scale: u32, target_scale: u32) -> Result<i128, SerError> {
	if scale <= target_scale {
		10i128
			.checked_pow(target_scale - scale)
			.and_then(|pow| mantissa.checked_mul(pow))
			.ok_or_else(|| {
				SerError::new(SerErrorKind::DecimalOutOfRange {
					reason: "unscaled value at the schema scale overflows an i128".into(),
				})
			})
	} else {
		let pow = 10i128.checked_pow(scale - target_scale).ok_or_else(|| {
			SerError::new(SerErrorKind::DecimalOutOfRange {
				reason: "unscaled value at the schema scale overflows an i128".into(),
			})
		})?;
		if mantissa % pow != 0 {
			Err(SerError::new(SerErrorKind::DecimalOutOfRange {
				reason: format!(
					"effective scale {scale} is not representable at schema scale {target_scale}"
				)
				.into(),
			}))
		} else {
			Ok(mantissa / pow)
		}
	}
}
