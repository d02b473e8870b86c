//! Union branch selection and tagged-union behavior

use avro_datum::{
	de::{DeErrorKind, DeserializerConfig, DeserializerState},
	ser::SerErrorKind,
	Schema, Value,
};

use pretty_assertions::assert_eq;

fn encode(schema: &Schema, value: &Value) -> Vec<u8> {
	avro_datum::to_datum_vec(value, schema).unwrap()
}

#[test]
fn selection_prefers_the_exact_variant() {
	let schema: Schema = r#"["int", "long"]"#.parse().unwrap();
	// Long(5) picks the long branch even though it would fit the int branch
	assert_eq!(encode(&schema, &Value::Long(5)), [2, 10]);
	assert_eq!(encode(&schema, &Value::Int(5)), [0, 10]);
}

#[test]
fn declared_order_breaks_ties() {
	let schema: Schema = r#"["long", "double"]"#.parse().unwrap();
	// Int(5) widens into both branches; the earlier and narrower one wins
	assert_eq!(encode(&schema, &Value::Int(5)), [0, 10]);
}

#[test]
fn tagged_input_overrides_shape_inference() {
	let schema: Schema = r#"["int", "long"]"#.parse().unwrap();
	let tagged = Value::tagged("long", Value::Int(5));
	assert_eq!(encode(&schema, &tagged), [2, 10]);
}

#[test]
fn tags_match_bare_names_and_fullnames() {
	let schema: Schema = r#"
	[
		"null",
		{
			"type": "record",
			"name": "Rec",
			"namespace": "ns",
			"fields": [{"name": "x", "type": "long"}]
		}
	]"#
	.parse()
	.unwrap();
	let record = Value::Record(vec![("x".to_owned(), Value::Long(1))]);
	let by_fullname = encode(&schema, &Value::tagged("ns.Rec", record.clone()));
	let by_bare_name = encode(&schema, &Value::tagged("Rec", record));
	assert_eq!(by_fullname, [2, 2]);
	assert_eq!(by_fullname, by_bare_name);
}

#[test]
fn unknown_tags_are_rejected() {
	let schema: Schema = r#"["null", "int"]"#.parse().unwrap();
	let err =
		avro_datum::to_datum_vec(&Value::tagged("bytes", Value::Bytes(vec![1])), &schema)
			.unwrap_err();
	assert!(matches!(
		err.kind(),
		SerErrorKind::UnionBranchNotFound { .. }
	));
}

#[test]
fn unmatched_shapes_are_rejected() {
	let schema: Schema = r#"["null", "int"]"#.parse().unwrap();
	let err = avro_datum::to_datum_vec(&Value::String("nope".to_owned()), &schema).unwrap_err();
	assert!(matches!(
		err.kind(),
		SerErrorKind::UnionBranchNotFound { .. }
	));
}

#[test]
fn tagged_unions_decode_with_branch_names() {
	let schema: Schema = r#"["null", "int"]"#.parse().unwrap();
	let config = DeserializerConfig::new(&schema).tagged_unions(true);

	let value = DeserializerState::with_config(&[2, 50], config)
		.read_datum()
		.unwrap();
	assert_eq!(value, Value::tagged("int", Value::Int(25)));

	// null stays bare: it carries no information worth retaining
	let value = DeserializerState::with_config(&[0], config)
		.read_datum()
		.unwrap();
	assert_eq!(value, Value::Null);
}

#[test]
fn tagged_decode_names_named_branches_by_fullname() {
	let schema: Schema = r#"
	[
		"null",
		{
			"type": "record",
			"name": "Rec",
			"namespace": "ns",
			"fields": [{"name": "x", "type": "long"}]
		}
	]"#
	.parse()
	.unwrap();
	let config = DeserializerConfig::new(&schema).tagged_unions(true);
	let value = DeserializerState::with_config(&[2, 2], config)
		.read_datum()
		.unwrap();
	assert_eq!(
		value,
		Value::tagged(
			"ns.Rec",
			Value::Record(vec![("x".to_owned(), Value::Long(1))])
		)
	);
}

#[test]
fn decode_checks_discriminant_bounds() {
	let schema: Schema = r#"["null", "int"]"#.parse().unwrap();
	let err = avro_datum::from_datum_slice(&[4], &schema).unwrap_err();
	assert!(matches!(
		err.kind(),
		DeErrorKind::UnionBranchOutOfRange { index: 2, len: 2 }
	));
}

#[test]
fn records_are_matched_by_field_names() {
	let schema: Schema = r#"
	[
		{"type": "record", "name": "A", "fields": [{"name": "x", "type": "long"}]},
		{"type": "record", "name": "B", "fields": [{"name": "y", "type": "long"}]}
	]"#
	.parse()
	.unwrap();
	let value = Value::Record(vec![("y".to_owned(), Value::Long(1))]);
	assert_eq!(encode(&schema, &value), [2, 2]);
	assert_eq!(
		avro_datum::from_datum_slice(&[2, 2], &schema).unwrap(),
		value
	);
}

#[test]
fn enum_symbols_match_within_their_set() {
	let schema: Schema = r#"
	[
		"null",
		{"type": "enum", "name": "E", "symbols": ["A", "B"]}
	]"#
	.parse()
	.unwrap();
	assert_eq!(encode(&schema, &Value::String("B".to_owned())), [2, 2]);
	let err = avro_datum::to_datum_vec(&Value::String("Z".to_owned()), &schema).unwrap_err();
	assert!(matches!(
		err.kind(),
		SerErrorKind::UnionBranchNotFound { .. }
	));
}
