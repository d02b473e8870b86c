use super::{
	error::{SchemaError, SchemaErrorKind},
	SchemaNode,
};

/// Check that the schema does not contain zero-sized unconditional cycles
///
/// Zero-size cycles (that would trigger infinite recursion when decoding,
/// without consuming any input) can only happen with records that end up
/// containing themselves ~immediately (that is, only through record paths).
/// Any other path would consume at least one byte (e.g. union
/// discriminant...).
///
/// Since we shouldn't forbid conditional self-referential records (e.g.
/// `Self { next: union { null, Self } }`), we can't really prevent non
/// zero-sized stack overflows at this step anyway (the deserializer limits
/// recursion depth for that), so best we can reliably do here is to prevent
/// zero-sized cycles.
pub(super) fn check_for_cycles(nodes: &[SchemaNode]) -> Result<(), SchemaError> {
	let mut visited_nodes = vec![false; nodes.len()];
	let mut checked_nodes = vec![false; nodes.len()];
	for (idx, node) in nodes.iter().enumerate() {
		if matches!(node, SchemaNode::Record(_)) && !checked_nodes[idx] {
			check_no_zero_sized_cycle_inner(nodes, idx, &mut visited_nodes, &mut checked_nodes)?;
		}
	}
	Ok(())
}

fn check_no_zero_sized_cycle_inner(
	nodes: &[SchemaNode],
	node_idx: usize,
	visited_nodes: &mut Vec<bool>,
	checked_nodes: &mut Vec<bool>,
) -> Result<(), SchemaError> {
	visited_nodes[node_idx] = true;
	for field in match &nodes[node_idx] {
		SchemaNode::Record(record) => &record.fields,
		_ => unreachable!("only called on records"),
	} {
		if let SchemaNode::Record(_) = &nodes[field.schema.idx] {
			if visited_nodes[field.schema.idx] {
				return Err(SchemaError::new(SchemaErrorKind::UnconditionalCycle));
			} else {
				check_no_zero_sized_cycle_inner(
					nodes,
					field.schema.idx,
					visited_nodes,
					checked_nodes,
				)?;
			}
		}
	}
	visited_nodes[node_idx] = false;
	// If we have visited a node and it was ok as part of another record, no
	// need to re-visit it individually.
	checked_nodes[node_idx] = true;
	Ok(())
}
