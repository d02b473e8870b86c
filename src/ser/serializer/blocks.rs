use super::*;

use std::collections::HashMap;

/// Arrays are written as a single block holding every item, terminated by a
/// zero-count block. Empty arrays are just the terminator.
pub(super) fn write_array<W: Write>(
	state: &mut SerializerState<'_, W>,
	items: SchemaKey,
	values: &[Value],
) -> Result<(), SerError> {
	if !values.is_empty() {
		if state.config.include_block_byte_size {
			// Learn the encoded size of the items by buffering them, then
			// advertise it with a negated count so skippers can jump the block
			let mut buffered = SerializerState {
				writer: Vec::new(),
				config: state.config,
			};
			write_items(&mut buffered, items, values)?;
			write_sized_block_header(state, values.len(), buffered.writer.len())?;
			state
				.writer
				.write_all(&buffered.writer)
				.map_err(SerError::io)?;
		} else {
			write_count(state, values.len())?;
			write_items(state, items, values)?;
		}
	}
	// Advertise end (zero-sized block)
	state.writer.write_varint(0i32).map_err(SerError::io)?;
	Ok(())
}

fn write_items<W: Write>(
	state: &mut SerializerState<'_, W>,
	items: SchemaKey,
	values: &[Value],
) -> Result<(), SerError> {
	for (i, value) in values.iter().enumerate() {
		write_value(state, items, value).map_err(|e| e.amend_path(format_args!("[{i}]")))?;
	}
	Ok(())
}

/// Maps follow the same block framing as arrays, with each item being a
/// length-delimited key followed by the value
pub(super) fn write_map<W: Write>(
	state: &mut SerializerState<'_, W>,
	values_schema: SchemaKey,
	map: &HashMap<String, Value>,
) -> Result<(), SerError> {
	if !map.is_empty() {
		if state.config.include_block_byte_size {
			let mut buffered = SerializerState {
				writer: Vec::new(),
				config: state.config,
			};
			write_entries(&mut buffered, values_schema, map)?;
			write_sized_block_header(state, map.len(), buffered.writer.len())?;
			state
				.writer
				.write_all(&buffered.writer)
				.map_err(SerError::io)?;
		} else {
			write_count(state, map.len())?;
			write_entries(state, values_schema, map)?;
		}
	}
	state.writer.write_varint(0i32).map_err(SerError::io)?;
	Ok(())
}

fn write_entries<W: Write>(
	state: &mut SerializerState<'_, W>,
	values_schema: SchemaKey,
	map: &HashMap<String, Value>,
) -> Result<(), SerError> {
	for (key, value) in map {
		state.write_length_delimited(key.as_bytes())?;
		write_value(state, values_schema, value).map_err(|e| e.amend_path(key))?;
	}
	Ok(())
}

fn write_count<W: Write>(state: &mut SerializerState<'_, W>, len: usize) -> Result<(), SerError> {
	let len: i64 = len.try_into().map_err(|_| {
		SerError::new(SerErrorKind::LengthOverflow {
			what: "array or map length",
		})
	})?;
	state.writer.write_varint(len).map_err(SerError::io)?;
	Ok(())
}

fn write_sized_block_header<W: Write>(
	state: &mut SerializerState<'_, W>,
	count: usize,
	byte_size: usize,
) -> Result<(), SerError> {
	let count: i64 = count.try_into().map_err(|_| {
		SerError::new(SerErrorKind::LengthOverflow {
			what: "array or map length",
		})
	})?;
	let byte_size: i64 = byte_size.try_into().map_err(|_| {
		SerError::new(SerErrorKind::LengthOverflow {
			what: "block byte size",
		})
	})?;
	state.writer.write_varint(-count).map_err(SerError::io)?;
	state.writer.write_varint(byte_size).map_err(SerError::io)?;
	Ok(())
}
