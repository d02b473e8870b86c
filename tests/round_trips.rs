//! Encode-then-decode must reproduce the input value, for every kind of
//! schema

use {avro_datum::Value, lazy_static::lazy_static, pretty_assertions::assert_eq};

lazy_static! {
	static ref SCHEMAS_TO_VALIDATE: Vec<(&'static str, Value)> = vec![
		(r#""null""#, Value::Null),
		(r#""boolean""#, Value::Boolean(true)),
		(
			r#""string""#,
			Value::String("adsfasdf09809dsf-=adsf".to_owned())
		),
		(r#""bytes""#, Value::Bytes(b"12345abcd".to_vec())),
		(r#""int""#, Value::Int(1234)),
		(r#""long""#, Value::Long(1234)),
		(r#""float""#, Value::Float(1234.0)),
		(r#""double""#, Value::Double(1234.0)),
		(
			r#"{"type": "fixed", "name": "Test", "size": 1}"#,
			Value::Fixed(vec![b'B'])
		),
		(
			r#"{"type": "enum", "name": "Test", "symbols": ["A", "B"]}"#,
			Value::Enum("B".to_owned())
		),
		(
			r#"{"type": "array", "items": "long"}"#,
			Value::Array(vec![Value::Long(1), Value::Long(3), Value::Long(2)])
		),
		(
			r#"{"type": "map", "values": "long"}"#,
			Value::Map(
				[
					("a".to_owned(), Value::Long(1)),
					("b".to_owned(), Value::Long(3)),
					("c".to_owned(), Value::Long(2)),
				]
				.into_iter()
				.collect()
			)
		),
		(r#"["string", "null", "long"]"#, Value::Null),
		(
			r#"{"type": "record", "name": "Test", "fields": [{"name": "f", "type": "long"}]}"#,
			Value::Record(vec![("f".to_owned(), Value::Long(1))])
		),
		(
			r#"{
				"type": "record",
				"name": "LongerRecord",
				"fields": [
					{"name": "f", "type": "long"},
					{"name": "g", "type": "long"},
					{"name": "h", "type": "string"}
				]
			}"#,
			Value::Record(vec![
				("f".to_owned(), Value::Long(1)),
				("g".to_owned(), Value::Long(2)),
				("h".to_owned(), Value::String("Abc".to_owned())),
			])
		),
	];
}

#[test]
fn round_trips() {
	for (raw_schema, value) in SCHEMAS_TO_VALIDATE.iter() {
		let schema: avro_datum::Schema = raw_schema.parse().expect(raw_schema);
		let encoded = avro_datum::to_datum_vec(value, &schema).expect(raw_schema);
		let decoded = avro_datum::from_datum_slice(&encoded, &schema).expect(raw_schema);
		assert_eq!(value, &decoded, "{raw_schema}");
	}
}

#[test]
fn encoding_is_deterministic() {
	for (raw_schema, value) in SCHEMAS_TO_VALIDATE.iter() {
		let schema: avro_datum::Schema = raw_schema.parse().expect(raw_schema);
		let first = avro_datum::to_datum_vec(value, &schema).expect(raw_schema);
		let second = avro_datum::to_datum_vec(value, &schema).expect(raw_schema);
		assert_eq!(first, second, "{raw_schema}");
	}
}

#[test]
fn long_extremes_round_trip() {
	let schema: avro_datum::Schema = r#""long""#.parse().unwrap();
	for v in [i64::MIN, i64::MIN + 1, -1, 0, 1, i64::MAX - 1, i64::MAX] {
		let encoded = avro_datum::to_datum_vec(&Value::Long(v), &schema).unwrap();
		assert_eq!(
			avro_datum::from_datum_slice(&encoded, &schema).unwrap(),
			Value::Long(v)
		);
	}
}

#[test]
fn int_extremes_round_trip() {
	let schema: avro_datum::Schema = r#""int""#.parse().unwrap();
	for v in [i32::MIN, -1, 0, 1, i32::MAX] {
		let encoded = avro_datum::to_datum_vec(&Value::Int(v), &schema).unwrap();
		assert_eq!(
			avro_datum::from_datum_slice(&encoded, &schema).unwrap(),
			Value::Int(v)
		);
	}
}

#[test]
fn nested_values_round_trip() {
	let schema: avro_datum::Schema = r#"
	{
		"type": "record",
		"name": "Outer",
		"fields": [
			{"name": "items", "type": {"type": "array", "items": ["null", "int"]}},
			{"name": "attributes", "type": {"type": "map", "values": "string"}}
		]
	}"#
	.parse()
	.unwrap();
	let value = Value::Record(vec![
		(
			"items".to_owned(),
			Value::Array(vec![Value::Int(1), Value::Null, Value::Int(3)]),
		),
		(
			"attributes".to_owned(),
			[("color".to_owned(), Value::String("green".to_owned()))]
				.into_iter()
				.collect::<std::collections::HashMap<_, _>>()
				.into(),
		),
	]);
	let encoded = avro_datum::to_datum_vec(&value, &schema).unwrap();
	assert_eq!(avro_datum::from_datum_slice(&encoded, &schema).unwrap(), value);
}

#[test]
fn recursive_schema_round_trips() {
	let schema: avro_datum::Schema = r#"
	{
		"type": "record",
		"name": "LongList",
		"fields": [
			{"name": "value", "type": "long"},
			{"name": "next", "type": ["null", "LongList"]}
		]
	}"#
	.parse()
	.unwrap();
	let value = Value::Record(vec![
		("value".to_owned(), Value::Long(1)),
		(
			"next".to_owned(),
			Value::Record(vec![
				("value".to_owned(), Value::Long(2)),
				("next".to_owned(), Value::Null),
			]),
		),
	]);
	let encoded = avro_datum::to_datum_vec(&value, &schema).unwrap();
	assert_eq!(avro_datum::from_datum_slice(&encoded, &schema).unwrap(), value);
}
