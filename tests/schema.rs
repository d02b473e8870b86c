//! Schema parsing and validation behavior

use avro_datum::{
	schema::{ParserConfig, SchemaErrorKind, SchemaNode},
	Schema,
};

use pretty_assertions::assert_eq;

fn parse(s: &str) -> Schema {
	s.parse().expect(s)
}

fn parse_err(s: &str) -> avro_datum::schema::SchemaError {
	s.parse::<Schema>().expect_err(s)
}

fn parse_strict_err(s: &str) -> avro_datum::schema::SchemaError {
	ParserConfig::new().strict(true).parse_str(s).expect_err(s)
}

#[test]
fn forbids_zero_sized_cycles() {
	let schema = r#"
	{
		"type": "record",
		"name": "A",
		"fields": [
			{
				"name": "a",
				"type": {
					"type": "record",
					"name": "B",
					"fields": [
						{
							"name": "b",
							"type": "A"
						}
					]
				}
			}
		]
	}"#;
	assert_eq!(
		schema.parse::<Schema>().unwrap_err().to_string(),
		"the schema contains a record that ends up always containing itself"
	);
}

#[test]
fn conditional_self_reference_is_fine() {
	parse(
		r#"
		{
			"type": "record",
			"name": "LongList",
			"fields": [
				{"name": "value", "type": "long"},
				{"name": "next", "type": ["null", "LongList"]}
			]
		}"#,
	);
}

#[test]
fn forward_references_resolve() {
	let schema = parse(
		r#"
		{
			"type": "record",
			"name": "Holder",
			"fields": [
				{"name": "first", "type": "Late"},
				{"name": "second", "type": {"type": "fixed", "name": "Late", "size": 4}}
			]
		}"#,
	);
	assert!(schema.lookup("Late").is_some());
}

#[test]
fn unknown_references_are_rejected() {
	let err = parse_err(r#"{"type": "array", "items": "Nope"}"#);
	assert!(matches!(
		err.kind(),
		SchemaErrorKind::UnknownReference { name } if name == "Nope"
	));
}

#[test]
fn duplicate_definitions_are_rejected() {
	let err = parse_err(
		r#"
		{
			"type": "record",
			"name": "R",
			"fields": [
				{"name": "a", "type": {"type": "fixed", "name": "F", "size": 1}},
				{"name": "b", "type": {"type": "fixed", "name": "F", "size": 2}}
			]
		}"#,
	);
	assert!(matches!(err.kind(), SchemaErrorKind::DuplicateName { name } if name == "F"));
}

#[test]
fn namespaces_are_inherited_by_nested_definitions() {
	let schema = parse(
		r#"
		{
			"type": "record",
			"name": "A",
			"namespace": "ns",
			"fields": [
				{"name": "b", "type": {"type": "record", "name": "B", "fields": []}},
				{"name": "c", "type": {"type": "record", "name": "C", "namespace": "", "fields": []}}
			]
		}"#,
	);
	assert!(schema.lookup("ns.A").is_some());
	// B inherits the enclosing namespace
	assert!(schema.lookup("ns.B").is_some());
	assert!(schema.lookup("B").is_none());
	// An explicit empty namespace means the null namespace
	assert!(schema.lookup("C").is_some());
}

#[test]
fn dotted_names_carry_their_own_namespace() {
	let schema = parse(
		r#"{"type": "fixed", "name": "x.y.Z", "namespace": "ignored", "size": 1}"#,
	);
	assert!(schema.lookup("x.y.Z").is_some());
	assert!(schema.lookup("ignored.Z").is_none());
}

#[test]
fn aliases_resolve_references() {
	let schema = parse(
		r#"
		{
			"type": "record",
			"name": "R",
			"fields": [
				{"name": "a", "type": {"type": "fixed", "name": "F", "aliases": ["Legacy"], "size": 1}},
				{"name": "b", "type": "Legacy"}
			]
		}"#,
	);
	assert!(schema.lookup("Legacy").is_some());
	assert_eq!(schema.lookup("Legacy"), schema.lookup("F"));
}

#[test]
fn alias_collisions_are_rejected() {
	let err = parse_err(
		r#"
		{
			"type": "record",
			"name": "R",
			"fields": [
				{"name": "a", "type": {"type": "fixed", "name": "A", "size": 1}},
				{"name": "b", "type": {"type": "fixed", "name": "B", "aliases": ["A"], "size": 1}}
			]
		}"#,
	);
	assert!(matches!(err.kind(), SchemaErrorKind::DuplicateName { name } if name == "A"));
}

#[test]
fn nested_unions_are_rejected() {
	let err = parse_err(r#"["int", ["null", "string"]]"#);
	assert!(matches!(err.kind(), SchemaErrorKind::InvalidUnion { .. }));

	// Nesting through an object wrapper is no better
	let err = parse_err(r#"["int", {"type": ["null", "string"]}]"#);
	assert!(matches!(err.kind(), SchemaErrorKind::InvalidUnion { .. }));
}

#[test]
fn duplicate_union_branches_are_rejected() {
	assert!(matches!(
		parse_err(r#"["int", "int"]"#).kind(),
		SchemaErrorKind::InvalidUnion { .. }
	));
	assert!(matches!(
		parse_err(r#"[{"type": "array", "items": "int"}, {"type": "array", "items": "long"}]"#)
			.kind(),
		SchemaErrorKind::InvalidUnion { .. }
	));
	// Logical types count as their underlying primitive
	assert!(matches!(
		parse_err(r#"["string", {"type": "string", "logicalType": "uuid"}]"#).kind(),
		SchemaErrorKind::InvalidUnion { .. }
	));
}

#[test]
fn named_types_may_repeat_in_unions_if_fullnames_differ() {
	parse(
		r#"[
			{"type": "fixed", "name": "A", "size": 1},
			{"type": "fixed", "name": "B", "size": 1}
		]"#,
	);
	let err = parse_err(
		r#"[
			{"type": "fixed", "name": "A", "size": 1},
			{"type": "enum", "name": "A2", "aliases": ["A"], "symbols": ["X"]}
		]"#,
	);
	assert!(matches!(err.kind(), SchemaErrorKind::DuplicateName { .. }));
}

#[test]
fn strict_mode_rejects_unknown_keys() {
	let schema = r#"{"type": "fixed", "name": "F", "size": 4, "customAnnotation": true}"#;
	parse(schema);
	let err = parse_strict_err(schema);
	assert!(matches!(
		err.kind(),
		SchemaErrorKind::UnrecognizedKey { key } if key == "customAnnotation"
	));
}

#[test]
fn strict_mode_rejects_non_canonical_names() {
	let schema = r#"{"type": "fixed", "name": "not-a-name", "size": 4}"#;
	parse(schema);
	assert!(matches!(
		parse_strict_err(schema).kind(),
		SchemaErrorKind::InvalidName { .. }
	));
	// Empty names are rejected in both modes
	assert!(matches!(
		parse_err(r#"{"type": "fixed", "name": "", "size": 4}"#).kind(),
		SchemaErrorKind::InvalidName { .. }
	));
}

#[test]
fn enum_symbols_are_validated() {
	assert!(matches!(
		parse_err(r#"{"type": "enum", "name": "E", "symbols": ["A", "A"]}"#).kind(),
		SchemaErrorKind::DuplicateName { .. }
	));
	assert!(matches!(
		parse_err(r#"{"type": "enum", "name": "E", "symbols": ["9bad"]}"#).kind(),
		SchemaErrorKind::InvalidName { .. }
	));
	let schema = parse(r#"{"type": "enum", "name": "E", "symbols": ["A", "B"], "default": "B"}"#);
	match schema.root() {
		SchemaNode::Enum(enum_) => assert_eq!(enum_.default_symbol.as_deref(), Some("B")),
		other => panic!("expected an enum, got {other:?}"),
	}
	assert!(matches!(
		parse_err(r#"{"type": "enum", "name": "E", "symbols": ["A"], "default": "Z"}"#).kind(),
		SchemaErrorKind::InvalidDefault { .. }
	));
}

#[test]
fn missing_required_attributes_are_reported() {
	assert!(matches!(
		parse_err(r#"{"type": "record", "name": "R"}"#).kind(),
		SchemaErrorKind::MissingRequiredField { field: "fields" }
	));
	assert!(matches!(
		parse_err(r#"{"type": "fixed", "name": "F"}"#).kind(),
		SchemaErrorKind::MissingRequiredField { field: "size" }
	));
	assert!(matches!(
		parse_err(r#"{"type": "enum", "symbols": ["A"]}"#).kind(),
		SchemaErrorKind::MissingRequiredField { field: "name" }
	));
	assert!(matches!(
		parse_err(r#"{"type": "array"}"#).kind(),
		SchemaErrorKind::MissingRequiredField { field: "items" }
	));
	assert!(matches!(
		parse_err(r#"{"type": "map"}"#).kind(),
		SchemaErrorKind::MissingRequiredField { field: "values" }
	));
}

#[test]
fn fixed_size_must_be_positive() {
	assert!(matches!(
		parse_err(r#"{"type": "fixed", "name": "F", "size": 0}"#).kind(),
		SchemaErrorKind::InvalidFixedSize { size: 0 }
	));
}

#[test]
fn lenient_mode_drops_failed_logical_types() {
	// precision is missing
	let schema = parse(r#"{"type": "bytes", "logicalType": "decimal"}"#);
	assert!(matches!(schema.root(), SchemaNode::Bytes));
	// date only annotates int
	let schema = parse(r#"{"type": "string", "logicalType": "date"}"#);
	assert!(matches!(schema.root(), SchemaNode::String));
	// uuid needs a 16-byte fixed
	let schema = parse(r#"{"type": "fixed", "name": "F", "size": 8, "logicalType": "uuid"}"#);
	assert!(matches!(schema.root(), SchemaNode::Fixed(_)));
}

#[test]
fn strict_mode_rejects_failed_logical_types() {
	assert!(matches!(
		parse_strict_err(r#"{"type": "bytes", "logicalType": "decimal"}"#).kind(),
		SchemaErrorKind::InvalidLogicalType { .. }
	));
	assert!(matches!(
		parse_strict_err(r#"{"type": "bytes", "logicalType": "decimal", "precision": 4, "scale": 10}"#)
			.kind(),
		SchemaErrorKind::InvalidLogicalType { .. }
	));
}

#[test]
fn unknown_logical_types_are_ignored() {
	let schema = ParserConfig::new()
		.strict(true)
		.parse_str(r#"{"type": "int", "logicalType": "datetime2"}"#)
		.unwrap();
	assert!(matches!(schema.root(), SchemaNode::Int));
}

#[test]
fn logical_types_parse_to_dedicated_nodes() {
	assert!(matches!(
		parse(r#"{"type": "int", "logicalType": "date"}"#).root(),
		SchemaNode::Date
	));
	assert!(matches!(
		parse(r#"{"type": "long", "logicalType": "timestamp-nanos"}"#).root(),
		SchemaNode::TimestampNanos
	));
	assert!(matches!(
		parse(r#"{"type": "bytes", "logicalType": "decimal", "precision": 12, "scale": 8}"#).root(),
		SchemaNode::Decimal(_)
	));
	assert!(matches!(
		parse(r#"{"type": "fixed", "name": "D", "size": 4, "logicalType": "decimal", "precision": 9, "scale": 2}"#)
			.root(),
		SchemaNode::Decimal(_)
	));
	assert!(matches!(
		parse(r#"{"type": "string", "logicalType": "uuid"}"#).root(),
		SchemaNode::Uuid(_)
	));
}

#[test]
fn defaults_are_validated_against_the_field_schema() {
	assert!(matches!(
		parse_err(
			r#"
			{
				"type": "record",
				"name": "R",
				"fields": [{"name": "s", "type": "string", "default": 123}]
			}"#
		)
		.kind(),
		SchemaErrorKind::InvalidDefault { .. }
	));
	// int defaults must fit 32 bits
	assert!(matches!(
		parse_err(
			r#"
			{
				"type": "record",
				"name": "R",
				"fields": [{"name": "i", "type": "int", "default": 5000000000}]
			}"#
		)
		.kind(),
		SchemaErrorKind::InvalidDefault { .. }
	));
	// A union default always corresponds to the first branch
	assert!(matches!(
		parse_err(
			r#"
			{
				"type": "record",
				"name": "R",
				"fields": [{"name": "u", "type": ["null", "int"], "default": 5}]
			}"#
		)
		.kind(),
		SchemaErrorKind::InvalidDefault { .. }
	));
	parse(
		r#"
		{
			"type": "record",
			"name": "R",
			"fields": [{"name": "u", "type": ["null", "int"], "default": null}]
		}"#,
	);
}

#[test]
fn parse_errors_carry_the_json_path() {
	let err = parse_err(
		r#"
		{
			"type": "record",
			"name": "R",
			"fields": [
				{"name": "ok", "type": "long"},
				{"name": "bad", "type": "record"}
			]
		}"#,
	);
	assert_eq!(err.path(), Some("fields[1].type"));

	let err = parse_err(
		r#"
		{
			"type": "record",
			"name": "R",
			"fields": [{"name": "s", "type": "string", "default": 123}]
		}"#,
	);
	assert_eq!(err.path(), Some("R.fields[0].default"));
}

#[test]
fn structured_json_trees_parse_too() {
	let json = serde_json::json!({
		"type": "array",
		"items": {"type": "int", "logicalType": "date"}
	});
	let schema = ParserConfig::new().parse_json(&json).unwrap();
	let items = match schema.root() {
		SchemaNode::Array(items) => *items,
		other => panic!("expected an array, got {other:?}"),
	};
	assert!(matches!(schema[items], SchemaNode::Date));
}

#[test]
fn schema_json_is_minified_and_retained() {
	let schema = parse(" { \"type\" : \"int\" } ");
	assert_eq!(schema.json(), r#"{"type":"int"}"#);
}

#[test]
fn rabin_fingerprints_match_the_reference_vectors() {
	let data: &[(&str, i64)] = &[
		(r#""null""#, 7195948357588979594),
		(r#""boolean""#, -6970731678124411036),
		(
			r#"{"name": "foo", "type": "fixed", "size": 15}"#,
			1756455273707447556,
		),
		(
			r#"{
				"name": "PigValue",
				"type": "record",
				"fields": [
					{"name": "value", "type": ["null", "int", "long", "PigValue"]}
				]
			}"#,
			-1759257747318642341,
		),
	];
	for (raw_schema, expected) in data {
		let schema = parse(raw_schema);
		let fingerprint = i64::from_le_bytes(schema.canonical_form_rabin_fingerprint());
		assert_eq!(fingerprint, *expected, "{raw_schema}");
	}
}
