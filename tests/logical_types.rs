//! Logical type conversions on both sides of the codec

use avro_datum::{
	de::{DecimalMode, DeserializerConfig, DeserializerState, UuidFormat},
	ser::SerErrorKind,
	Schema, Value,
};

use pretty_assertions::assert_eq;

fn round_trip(schema: &Schema, value: &Value) -> Value {
	let encoded = avro_datum::to_datum_vec(value, schema).unwrap();
	avro_datum::from_datum_slice(&encoded, schema).unwrap()
}

#[test]
fn date_is_days_since_epoch() {
	let schema: Schema = r#"{"type": "int", "logicalType": "date"}"#.parse().unwrap();
	// 1970-03-01 is 59 days after the epoch
	let encoded = avro_datum::to_datum_vec(&Value::Date(59), &schema).unwrap();
	assert_eq!(encoded, [118]);
	assert_eq!(
		avro_datum::from_datum_slice(&encoded, &schema).unwrap(),
		Value::Date(59)
	);
	// Plain ints are accepted on the encode side
	assert_eq!(
		avro_datum::to_datum_vec(&Value::Int(59), &schema).unwrap(),
		[118]
	);
}

#[test]
fn times_and_timestamps_round_trip() {
	for (raw_schema, value) in [
		(
			r#"{"type": "int", "logicalType": "time-millis"}"#,
			Value::TimeMillis(13 * 3_600_000),
		),
		(
			r#"{"type": "long", "logicalType": "time-micros"}"#,
			Value::TimeMicros(13 * 3_600_000_000),
		),
		(
			r#"{"type": "long", "logicalType": "timestamp-millis"}"#,
			Value::TimestampMillis(1_234_567_890_123),
		),
		(
			r#"{"type": "long", "logicalType": "timestamp-micros"}"#,
			Value::TimestampMicros(1_234_567_890_123_456),
		),
		(
			r#"{"type": "long", "logicalType": "timestamp-nanos"}"#,
			Value::TimestampNanos(1_234_567_890_123_456_789),
		),
	] {
		let schema: Schema = raw_schema.parse().unwrap();
		assert_eq!(round_trip(&schema, &value), value, "{raw_schema}");
	}
}

#[test]
fn string_uuids_round_trip() {
	let schema: Schema = r#"{"type": "string", "logicalType": "uuid"}"#.parse().unwrap();
	let uuid: uuid::Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
	assert_eq!(round_trip(&schema, &Value::Uuid(uuid)), Value::Uuid(uuid));
	// Canonical text is accepted on the encode side
	let encoded = avro_datum::to_datum_vec(
		&Value::String("550e8400-e29b-41d4-a716-446655440000".to_owned()),
		&schema,
	)
	.unwrap();
	assert_eq!(
		avro_datum::from_datum_slice(&encoded, &schema).unwrap(),
		Value::Uuid(uuid)
	);
}

#[test]
fn invalid_uuid_text_is_rejected_on_encode() {
	let schema: Schema = r#"{"type": "string", "logicalType": "uuid"}"#.parse().unwrap();
	let err = avro_datum::to_datum_vec(&Value::String("not-a-uuid".to_owned()), &schema)
		.unwrap_err();
	assert!(matches!(err.kind(), SerErrorKind::InvalidUuid { .. }));
}

const UUID_BYTES: [u8; 16] = [
	0x55, 0x0e, 0x84, 0x00, 0xe2, 0x9b, 0x41, 0xd4, 0xa7, 0x16, 0x44, 0x66, 0x55, 0x44, 0x00,
	0x00,
];

#[test]
fn fixed_uuids_decode_as_binary_by_default() {
	let schema: Schema =
		r#"{"type": "fixed", "size": 16, "name": "fixed_uuid", "logicalType": "uuid"}"#
			.parse()
			.unwrap();
	assert_eq!(
		avro_datum::from_datum_slice(&UUID_BYTES, &schema).unwrap(),
		Value::Fixed(UUID_BYTES.to_vec())
	);
}

#[test]
fn fixed_uuids_decode_as_canonical_text_on_request() {
	let schema: Schema =
		r#"{"type": "fixed", "size": 16, "name": "fixed_uuid", "logicalType": "uuid"}"#
			.parse()
			.unwrap();
	let config = DeserializerConfig::new(&schema).uuid_format(UuidFormat::CanonicalString);
	let value = DeserializerState::with_config(&UUID_BYTES, config)
		.read_datum()
		.unwrap();
	let text = match &value {
		Value::String(text) => text,
		other => panic!("expected a string, got {other:?}"),
	};
	assert_eq!(text, "550e8400-e29b-41d4-a716-446655440000");
	assert_eq!(text.len(), 36);
	for hyphen_position in [8, 13, 18, 23] {
		assert_eq!(text.as_bytes()[hyphen_position], b'-');
	}
}

#[test]
fn fixed_uuids_encode_from_any_reasonable_input() {
	let schema: Schema =
		r#"{"type": "fixed", "size": 16, "name": "fixed_uuid", "logicalType": "uuid"}"#
			.parse()
			.unwrap();
	let uuid = uuid::Uuid::from_bytes(UUID_BYTES);
	for value in [
		Value::Uuid(uuid),
		Value::Fixed(UUID_BYTES.to_vec()),
		Value::String("550e8400-e29b-41d4-a716-446655440000".to_owned()),
	] {
		assert_eq!(
			avro_datum::to_datum_vec(&value, &schema).unwrap(),
			UUID_BYTES
		);
	}
}

#[test]
fn decimals_decode_approximately_by_default() {
	let schema: Schema =
		r#"{"type": "bytes", "logicalType": "decimal", "precision": 12, "scale": 8}"#
			.parse()
			.unwrap();
	// length prefix 4, then the two's-complement unscaled value 8072448
	let datum = [8u8, 0, 123, 45, 0];
	let value = avro_datum::from_datum_slice(&datum, &schema).unwrap();
	match value {
		Value::Double(v) => assert!((v - 0.08072448).abs() < 1e-12, "{v}"),
		other => panic!("expected a double, got {other:?}"),
	}
}

#[test]
fn decimals_decode_exactly_on_request() {
	let schema: Schema =
		r#"{"type": "bytes", "logicalType": "decimal", "precision": 12, "scale": 8}"#
			.parse()
			.unwrap();
	let config = DeserializerConfig::new(&schema).decimal_mode(DecimalMode::Exact);
	let value = DeserializerState::with_config(&[8, 0, 123, 45, 0], config)
		.read_datum()
		.unwrap();
	assert_eq!(value, Value::Decimal("0.08072448".parse().unwrap()));
}

#[test]
fn decimals_encode_with_minimal_two_complement_bytes() {
	let schema: Schema =
		r#"{"type": "bytes", "logicalType": "decimal", "precision": 10, "scale": 2}"#
			.parse()
			.unwrap();
	// 123.45 -> unscaled 12345 = 0x3039
	assert_eq!(
		avro_datum::to_datum_vec(&Value::Decimal("123.45".parse().unwrap()), &schema).unwrap(),
		[4, 0x30, 0x39]
	);
	// -1 -> unscaled -100, minimal two's complement is the single byte 0x9C
	assert_eq!(
		avro_datum::to_datum_vec(&Value::Decimal("-1".parse().unwrap()), &schema).unwrap(),
		[2, 0x9C]
	);
}

#[test]
fn decimal_round_trips_exactly() {
	let schema: Schema =
		r#"{"type": "bytes", "logicalType": "decimal", "precision": 10, "scale": 2}"#
			.parse()
			.unwrap();
	let config = DeserializerConfig::new(&schema).decimal_mode(DecimalMode::Exact);
	for text in ["123.45", "-123.45", "0", "0.01", "-0.01", "99999999.99"] {
		let value = Value::Decimal(text.parse().unwrap());
		let encoded = avro_datum::to_datum_vec(&value, &schema).unwrap();
		let decoded = DeserializerState::with_config(&encoded, config)
			.read_datum()
			.unwrap();
		assert_eq!(decoded, value, "{text}");
	}
}

#[test]
fn fixed_backed_decimals_are_sign_extended_to_size() {
	let schema: Schema = r#"
	{
		"type": "fixed",
		"name": "money",
		"size": 4,
		"logicalType": "decimal",
		"precision": 9,
		"scale": 2
	}"#
	.parse()
	.unwrap();
	// 1.5 -> unscaled 150
	assert_eq!(
		avro_datum::to_datum_vec(&Value::Decimal("1.5".parse().unwrap()), &schema).unwrap(),
		[0, 0, 0, 150]
	);
	// -1 -> unscaled -100
	assert_eq!(
		avro_datum::to_datum_vec(&Value::Decimal("-1".parse().unwrap()), &schema).unwrap(),
		[0xFF, 0xFF, 0xFF, 0x9C]
	);
	let config = DeserializerConfig::new(&schema).decimal_mode(DecimalMode::Exact);
	assert_eq!(
		DeserializerState::with_config(&[0xFF, 0xFF, 0xFF, 0x9C], config)
			.read_datum()
			.unwrap(),
		Value::Decimal("-1.00".parse().unwrap())
	);
}

#[test]
fn unrepresentable_decimals_are_rejected() {
	let schema: Schema =
		r#"{"type": "bytes", "logicalType": "decimal", "precision": 4, "scale": 2}"#
			.parse()
			.unwrap();
	// More fractional digits than the schema scale allows
	let err = avro_datum::to_datum_vec(&Value::Decimal("0.005".parse().unwrap()), &schema)
		.unwrap_err();
	assert!(matches!(err.kind(), SerErrorKind::DecimalOutOfRange { .. }));
	// Exceeds the declared precision
	let err = avro_datum::to_datum_vec(&Value::Decimal("123.45".parse().unwrap()), &schema)
		.unwrap_err();
	assert!(matches!(err.kind(), SerErrorKind::DecimalOutOfRange { .. }));
}

#[test]
fn integers_encode_under_decimal_schemas() {
	let schema: Schema =
		r#"{"type": "bytes", "logicalType": "decimal", "precision": 10, "scale": 2}"#
			.parse()
			.unwrap();
	// 3 -> unscaled 300 = 0x012C
	assert_eq!(
		avro_datum::to_datum_vec(&Value::Int(3), &schema).unwrap(),
		[4, 0x01, 0x2C]
	);
}
