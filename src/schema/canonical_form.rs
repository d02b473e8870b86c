use super::{rabin::Rabin, DecimalRepr, Schema, SchemaKey, SchemaNode, UuidRepr};

impl Schema {
	/// Obtain the Rabin fingerprint of the schema's
	/// [Parsing Canonical Form](https://avro.apache.org/docs/current/specification/#parsing-canonical-form-for-schemas)
	///
	/// This is what is used for avro [single object encoding](https://avro.apache.org/docs/current/specification/#single-object-encoding).
	///
	/// There is no public function to obtain a `String` version of the
	/// parsing canonical form because one shouldn't use that when
	/// transmitting the schema to other people, notably because it loses the
	/// logical types information (see <https://issues.apache.org/jira/browse/AVRO-1721>),
	/// and additionally because it may be invalid JSON (there's no escaping
	/// in the reference Java implementation).
	pub fn canonical_form_rabin_fingerprint(&self) -> [u8; 8] {
		let mut hasher = Rabin::default();
		hasher.write(self.parsing_canonical_form().as_bytes());
		hasher.finish()
	}

	/// Manual implementation that strictly copies that of the reference
	/// implementation in Java (which is why this does not go through
	/// `serde_json`: the output is not guaranteed to actually be valid JSON)
	pub(crate) fn parsing_canonical_form(&self) -> String {
		let mut state = WriteCanonicalFormState {
			schema: self,
			out: String::new(),
			named_type_written: vec![false; self.nodes.len()],
		};
		state.write_canonical_form(SchemaKey::ROOT);
		state.out
	}
}

struct WriteCanonicalFormState<'s> {
	schema: &'s Schema,
	out: String,
	named_type_written: Vec<bool>,
}

impl WriteCanonicalFormState<'_> {
	fn write_canonical_form(&mut self, key: SchemaKey) {
		// In PCF, logical types are completely ignored
		// https://issues.apache.org/jira/browse/AVRO-1721
		match &self.schema.nodes[key.idx] {
			SchemaNode::Null => self.out.push_str("\"null\""),
			SchemaNode::Boolean => self.out.push_str("\"boolean\""),
			SchemaNode::Int | SchemaNode::Date | SchemaNode::TimeMillis => {
				self.out.push_str("\"int\"")
			}
			SchemaNode::Long
			| SchemaNode::TimeMicros
			| SchemaNode::TimestampMillis
			| SchemaNode::TimestampMicros
			| SchemaNode::TimestampNanos => self.out.push_str("\"long\""),
			SchemaNode::Float => self.out.push_str("\"float\""),
			SchemaNode::Double => self.out.push_str("\"double\""),
			SchemaNode::Bytes
			| SchemaNode::Decimal(super::Decimal {
				repr: DecimalRepr::Bytes,
				..
			}) => self.out.push_str("\"bytes\""),
			SchemaNode::String | SchemaNode::Uuid(UuidRepr::String) => {
				self.out.push_str("\"string\"")
			}
			SchemaNode::Union(union) => {
				self.out.push('[');
				for (i, &variant) in union.variants.iter().enumerate() {
					if i > 0 {
						self.out.push(',');
					}
					self.write_canonical_form(variant);
				}
				self.out.push(']');
			}
			SchemaNode::Array(items) => {
				self.out.push_str("{\"type\":\"array\",\"items\":");
				self.write_canonical_form(*items);
				self.out.push('}');
			}
			SchemaNode::Map(values) => {
				self.out.push_str("{\"type\":\"map\",\"values\":");
				self.write_canonical_form(*values);
				self.out.push('}');
			}
			SchemaNode::Enum(enum_) => {
				if self.should_write_full(key) {
					self.out.push_str("{\"name\":\"");
					self.out.push_str(enum_.name.fully_qualified_name());
					self.out.push_str("\",\"type\":\"enum\",\"symbols\":[");
					for (i, symbol) in enum_.symbols.iter().enumerate() {
						if i > 0 {
							self.out.push(',');
						}
						self.out.push('"');
						self.out.push_str(symbol);
						self.out.push('"');
					}
					self.out.push_str("]}");
				} else {
					self.write_name_only(enum_.name.fully_qualified_name());
				}
			}
			SchemaNode::Fixed(fixed)
			| SchemaNode::Decimal(super::Decimal {
				repr: DecimalRepr::Fixed(fixed),
				..
			})
			| SchemaNode::Uuid(UuidRepr::Fixed(fixed)) => {
				if self.should_write_full(key) {
					self.out.push_str("{\"name\":\"");
					self.out.push_str(fixed.name.fully_qualified_name());
					self.out.push_str("\",\"type\":\"fixed\",\"size\":");
					self.out.push_str(&fixed.size.to_string());
					self.out.push('}');
				} else {
					self.write_name_only(fixed.name.fully_qualified_name());
				}
			}
			SchemaNode::Record(record) => {
				if self.should_write_full(key) {
					self.out.push_str("{\"name\":\"");
					self.out.push_str(record.name.fully_qualified_name());
					self.out.push_str("\",\"type\":\"record\",\"fields\":[");
					for (i, field) in record.fields.iter().enumerate() {
						if i > 0 {
							self.out.push(',');
						}
						self.out.push_str("{\"name\":\"");
						self.out.push_str(&field.name);
						self.out.push_str("\",\"type\":");
						self.write_canonical_form(field.schema);
						self.out.push('}');
					}
					self.out.push_str("]}");
				} else {
					self.write_name_only(record.name.fully_qualified_name());
				}
			}
		}
	}

	/// A named type is written in full the first time it is encountered, and
	/// by name afterwards
	fn should_write_full(&mut self, key: SchemaKey) -> bool {
		match &mut self.named_type_written[key.idx] {
			b @ false => {
				*b = true;
				true
			}
			true => false,
		}
	}

	fn write_name_only(&mut self, fully_qualified_name: &str) {
		self.out.push('"');
		self.out.push_str(fully_qualified_name);
		self.out.push('"');
	}
}
