use super::*;

use crate::{
	de::DecimalMode,
	schema::{Decimal, DecimalRepr},
};

/// Read the two's-complement big-endian unscaled value and combine it with
/// the schema's scale
///
/// Unscaled values are materialized through an `i128`, so at most 16 bytes of
/// payload are supported (that is enough for any decimal of precision <= 38).
pub(super) fn read_decimal(
	state: &mut DeserializerState<'_, '_>,
	decimal: &Decimal,
) -> Result<Value, DeError> {
	let size = match decimal.repr {
		DecimalRepr::Bytes => read_len(state)?,
		DecimalRepr::Fixed(ref fixed) => fixed.size,
	};
	let start = 16usize.checked_sub(size).ok_or_else(|| {
		DeError::new(DeErrorKind::DecimalOutOfRange {
			reason: "unscaled values larger than 16 bytes are not supported".into(),
		})
	})?;
	let raw = state.reader.read_slice(size)?;
	// Sign-extend into the 16-byte window
	let mut buf = if raw.first().map_or(false, |&b| b & 0x80 != 0) {
		[0xFFu8; 16]
	} else {
		[0u8; 16]
	};
	buf[start..].copy_from_slice(raw);
	let unscaled = i128::from_be_bytes(buf);
	match state.config().decimal_mode {
		DecimalMode::Exact => {
			let decimal = rust_decimal::Decimal::try_from_i128_with_scale(unscaled, decimal.scale)
				.map_err(|e| {
					DeError::new(DeErrorKind::DecimalOutOfRange {
						reason: e.to_string().into(),
					})
				})?;
			Ok(Value::Decimal(decimal))
		}
		DecimalMode::Approximate => {
			Ok(Value::Double(unscaled as f64 * 10f64.powi(-(decimal.scale as i32))))
		}
	}
}
