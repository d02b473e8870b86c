use super::*;

use std::{collections::HashMap, num::NonZeroUsize};

/// Read the count of the next block
///
/// A negative count advertises a skippable block: its absolute value is the
/// item count and a byte-size long follows, which we consume and ignore since
/// items are decoded one by one anyway.
fn read_block_len(state: &mut DeserializerState<'_, '_>) -> Result<Option<NonZeroUsize>, DeError> {
	let len: i64 = state.reader.read_varint()?;
	let res;
	if len < 0 {
		// res = -len, properly handling i64::MIN
		res = u64::from_ne_bytes(len.to_ne_bytes()).wrapping_neg();
		// The byte size consumes the same varint framing whether or not it is
		// interpreted as zig-zag, so it is dropped as a plain u64
		let _: u64 = state.reader.read_varint()?;
	} else {
		res = len as u64;
	}
	res.try_into()
		.map(NonZeroUsize::new)
		.map_err(|_| DeError::new(DeErrorKind::InvalidLength { len }))
}

struct BlockReader {
	current_block_len: usize,
	n_read: usize,
}

impl BlockReader {
	fn new() -> Self {
		Self {
			current_block_len: 0,
			n_read: 0,
		}
	}

	fn has_more(&mut self, state: &mut DeserializerState<'_, '_>) -> Result<bool, DeError> {
		self.current_block_len = match self.current_block_len.checked_sub(1) {
			None => {
				let new_len = read_block_len(state)?;
				match new_len {
					None => return Ok(false),
					Some(new_len) => {
						let l = new_len.get();
						let n_read = self.n_read.saturating_add(l);
						if n_read > state.config().max_seq_size {
							return Err(DeError::new(DeErrorKind::MaxSeqSizeExceeded));
						}
						self.n_read = n_read;
						l - 1
					}
				}
			}
			Some(new_len) => new_len,
		};
		Ok(true)
	}
}

pub(super) fn read_array(
	state: &mut DeserializerState<'_, '_>,
	items: SchemaKey,
	allowed_depth: AllowedDepth,
) -> Result<Value, DeError> {
	let mut block_reader = BlockReader::new();
	let mut values = Vec::new();
	while block_reader.has_more(state)? {
		let i = values.len();
		values.push(
			read_value(state, items, allowed_depth)
				.map_err(|e| e.amend_path(format_args!("[{i}]")))?,
		);
	}
	Ok(Value::Array(values))
}

pub(super) fn read_map(
	state: &mut DeserializerState<'_, '_>,
	values_schema: SchemaKey,
	allowed_depth: AllowedDepth,
) -> Result<Value, DeError> {
	let mut block_reader = BlockReader::new();
	let mut map = HashMap::new();
	while block_reader.has_more(state)? {
		let key = read_string(state)?.to_owned();
		let value =
			read_value(state, values_schema, allowed_depth).map_err(|e| e.amend_path(&key))?;
		// Duplicate keys across blocks: last value wins
		map.insert(key, value);
	}
	Ok(Value::Map(map))
}
