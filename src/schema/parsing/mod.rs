mod raw;

use crate::schema::{
	check_for_cycles::check_for_cycles,
	error::{SchemaError, SchemaErrorKind},
	Decimal, DecimalRepr, Enum, FieldOrder, Fixed, Name, Record, RecordField, Schema, SchemaKey,
	SchemaNode, Union, UuidRepr,
};

use {
	lazy_static::lazy_static,
	std::{
		borrow::Cow,
		collections::{HashMap, HashSet},
	},
};

const LATE_NAME_LOOKUP_REMAP_BIT: usize = 1usize << (usize::BITS - 1);

lazy_static! {
	static ref NAME_REGEX: regex::Regex =
		regex::Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("name regex is valid");
}

/// Parsing configuration for a [`Schema`]
///
/// ```
/// let schema = avro_datum::schema::ParserConfig::new()
/// 	.strict(true)
/// 	.parse_str(r#"{"type": "fixed", "name": "Block", "size": 16}"#)
/// 	.expect("Failed to parse schema");
/// assert!(matches!(
/// 	schema.root(),
/// 	avro_datum::schema::SchemaNode::Fixed(_)
/// ));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ParserConfig {
	strict: bool,
}

impl ParserConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// In strict mode, unknown keys in schema objects, non-canonical name
	/// characters and logical types that fail their own validation are hard
	/// errors; in the (default) lenient mode they are accepted or dropped to
	/// the underlying type.
	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	/// Parse a schema from its JSON text representation
	pub fn parse_str(&self, s: &str) -> Result<Schema, SchemaError> {
		let raw_schema: raw::SchemaNode =
			serde_json::from_str(s).map_err(SchemaError::serde_json)?;
		let schema_json = String::from_utf8({
			// Sanitize & minify json, preserving all keys.
			let mut serializer = serde_json::Serializer::new(Vec::new());
			serde_transcode::transcode(&mut serde_json::Deserializer::from_str(s), &mut serializer)
				.map_err(SchemaError::serde_json)?;
			serializer.into_inner()
		})
		.map_err(|e| {
			SchemaError::new(SchemaErrorKind::InvalidSchema {
				reason: format!("serde_json should not emit invalid UTF-8 but got {e}").into(),
			})
		})?;
		self.parse_raw(&raw_schema, schema_json)
	}

	/// Parse a schema from an already-deserialized JSON tree
	pub fn parse_json(&self, json: &serde_json::Value) -> Result<Schema, SchemaError> {
		let raw_schema: raw::SchemaNode =
			serde::Deserialize::deserialize(json).map_err(SchemaError::serde_json)?;
		let schema_json = serde_json::to_string(json).map_err(SchemaError::serde_json)?;
		self.parse_raw(&raw_schema, schema_json)
	}

	fn parse_raw(
		&self,
		raw_schema: &raw::SchemaNode<'_>,
		schema_json: String,
	) -> Result<Schema, SchemaError> {
		let mut state = SchemaConstructionState {
			strict: self.strict,
			nodes: Vec::new(),
			names: HashMap::new(),
			unresolved_names: Vec::new(),
			path: Vec::new(),
		};

		state.register_node(raw_schema, None)?;

		// Support for unordered name definitions
		if !state.unresolved_names.is_empty() {
			let resolved_names: Vec<SchemaKey> = state
				.unresolved_names
				.iter()
				.map(|name| {
					state
						.names
						.get(name)
						.map(|&idx| SchemaKey { idx })
						.ok_or_else(|| {
							SchemaError::new(SchemaErrorKind::UnknownReference {
								name: name.to_string(),
							})
						})
				})
				.collect::<Result<_, _>>()?;
			let fix_key = |key: &mut SchemaKey| {
				if key.idx & LATE_NAME_LOOKUP_REMAP_BIT != 0 {
					*key = resolved_names[key.idx ^ LATE_NAME_LOOKUP_REMAP_BIT];
				}
			};
			for schema_node in &mut state.nodes {
				match schema_node {
					SchemaNode::Array(key) | SchemaNode::Map(key) => fix_key(key),
					SchemaNode::Union(union) => union.variants.iter_mut().for_each(fix_key),
					SchemaNode::Record(record) => record
						.fields
						.iter_mut()
						.for_each(|f| fix_key(&mut f.schema)),
					SchemaNode::Null
					| SchemaNode::Boolean
					| SchemaNode::Int
					| SchemaNode::Long
					| SchemaNode::Float
					| SchemaNode::Double
					| SchemaNode::Bytes
					| SchemaNode::String
					| SchemaNode::Enum(_)
					| SchemaNode::Fixed(_)
					| SchemaNode::Decimal(_)
					| SchemaNode::Uuid(_)
					| SchemaNode::Date
					| SchemaNode::TimeMillis
					| SchemaNode::TimeMicros
					| SchemaNode::TimestampMillis
					| SchemaNode::TimestampMicros
					| SchemaNode::TimestampNanos => {}
				}
			}
		}

		// Validation that has to wait until references are resolved
		validate_unions(&state.nodes)?;
		validate_defaults(&state.nodes)?;
		check_for_cycles(&state.nodes)?;

		// Precompute symbol lookup for enum encoding
		for schema_node in &mut state.nodes {
			if let SchemaNode::Enum(enum_) = schema_node {
				enum_.per_symbol_lookup = enum_
					.symbols
					.iter()
					.enumerate()
					.map(|(discriminant, symbol)| (symbol.clone(), discriminant))
					.collect();
			}
		}

		Ok(Schema {
			names: state
				.names
				.into_iter()
				.map(|(name_key, idx)| (name_key.to_string(), SchemaKey { idx }))
				.collect(),
			nodes: state.nodes,
			schema_json,
		})
	}
}

struct SchemaConstructionState<'a> {
	strict: bool,
	nodes: Vec<SchemaNode>,
	names: HashMap<NameKey<'a>, usize>,
	unresolved_names: Vec<NameKey<'a>>,
	path: Vec<String>,
}

impl<'a> SchemaConstructionState<'a> {
	fn register_node(
		&mut self,
		raw_schema: &'a raw::SchemaNode<'a>,
		enclosing_namespace: Option<&'a str>,
	) -> Result<SchemaKey, SchemaError> {
		Ok(match *raw_schema {
			raw::SchemaNode::Type(type_) => {
				let idx = self.nodes.len();
				self.nodes.push(match type_ {
					raw::Type::Null => SchemaNode::Null,
					raw::Type::Boolean => SchemaNode::Boolean,
					raw::Type::Int => SchemaNode::Int,
					raw::Type::Long => SchemaNode::Long,
					raw::Type::Float => SchemaNode::Float,
					raw::Type::Double => SchemaNode::Double,
					raw::Type::Bytes => SchemaNode::Bytes,
					raw::Type::String => SchemaNode::String,
					complex_type @ (raw::Type::Array
					| raw::Type::Map
					| raw::Type::Record
					| raw::Type::Enum
					| raw::Type::Fixed) => {
						return Err(self.error(SchemaErrorKind::InvalidSchema {
							reason: format!(
								"{:?} is a complex type, so it should be declared as an object",
								complex_type
							)
							.into(),
						}))
					}
				});
				SchemaKey { idx }
			}
			raw::SchemaNode::Union(ref union_schemas) => {
				let idx = self.nodes.len();
				self.nodes.push(SchemaNode::Null); // Reserve the spot for us
				let mut variants = Vec::with_capacity(union_schemas.len());
				for (i, union_schema) in union_schemas.iter().enumerate() {
					if matches!(union_schema, raw::SchemaNode::Union(_)) {
						return Err(self.error(SchemaErrorKind::InvalidUnion {
							reason: "unions may not immediately contain other unions".into(),
						}));
					}
					self.path.push(format!("[{i}]"));
					let variant = self.register_node(union_schema, enclosing_namespace);
					self.path.pop();
					variants.push(variant?);
				}
				self.nodes[idx] = SchemaNode::Union(Union { variants });
				SchemaKey { idx }
			}
			raw::SchemaNode::Ref(ref reference) => {
				// This is supposed to be the fullname of a previous named
				// type. According to the spec the type definition should
				// always be parsed before, but we support even if it's
				// unordered because we're not in 1980 anymore.
				let name_key = if let Some((namespace, name)) = reference.rsplit_once('.') {
					NameKey {
						namespace: Some(namespace).filter(|&s| !s.is_empty()),
						name,
					}
				} else {
					NameKey {
						namespace: enclosing_namespace,
						name: &**reference,
					}
				};
				match self.names.get(&name_key) {
					Some(&idx) => SchemaKey { idx },
					None => {
						let idx = self.unresolved_names.len();
						self.unresolved_names.push(name_key);
						SchemaKey {
							idx: idx | LATE_NAME_LOOKUP_REMAP_BIT,
						}
					}
				}
			}
			raw::SchemaNode::Object(ref object) => {
				let object = &**object;

				if self.strict {
					if let Some(key) = object.unknown_keys.first() {
						return Err(self.error(SchemaErrorKind::UnrecognizedKey { key: key.clone() }));
					}
				}

				// We have to allow {"type": {"type": "string"}} (an object
				// with an inner full schema and nothing else is a valid
				// representation). However in that case we would ignore all
				// keys that are set at our current level, so we check for
				// this. Let's just pass the namespace if overridden, that
				// seems reasonable...
				if let inner_type @ (raw::SchemaNode::Ref(_)
				| raw::SchemaNode::Object(_)
				| raw::SchemaNode::Union(_)) = &object.type_
				{
					if object.has_local_properties() {
						return Err(self.error(SchemaErrorKind::InvalidSchema {
							reason: "got unnecessarily-nested type, but local object properties \
								are set - those would be ignored"
								.into(),
						}));
					}
					if object.logical_type.is_some() {
						return Err(self.error(SchemaErrorKind::InvalidLogicalType {
							reason: "logical types only annotate primitive types or fixed".into(),
						}));
					}
					return self.register_node(
						inner_type,
						object
							.namespace
							.as_deref()
							.filter(|s| !s.is_empty())
							.or(enclosing_namespace),
					);
				}

				let idx = self.nodes.len();

				// Register the name (and aliases) to the name map before
				// parsing children, so that self-references resolve
				let named_parts = match object.name {
					Some(ref name) => Some(self.register_names(
						&**name,
						object.namespace.as_deref(),
						object.aliases.as_deref(),
						enclosing_namespace,
						idx,
					)?),
					None => None,
				};
				macro_rules! named {
					($type_: ident) => {
						match &named_parts {
							Some((name_key, aliases)) => (*name_key, aliases.clone()),
							None => {
								return Err(
									self.error(SchemaErrorKind::MissingRequiredField { field: "name" })
								)
							}
						}
					};
				}

				self.nodes.push(SchemaNode::Null); // Reserve the spot for us

				match object.type_ {
					raw::SchemaNode::Type(t @ raw::Type::Array) => {
						let items = match &object.items {
							Some(items) => items,
							None => return Err(self.missing_attribute("items", t)),
						};
						self.path.push("items".to_owned());
						let items = self.register_node(items, enclosing_namespace);
						self.path.pop();
						self.nodes[idx] = SchemaNode::Array(items?);
					}
					raw::SchemaNode::Type(t @ raw::Type::Map) => {
						let values = match &object.values {
							Some(values) => values,
							None => return Err(self.missing_attribute("values", t)),
						};
						self.path.push("values".to_owned());
						let values = self.register_node(values, enclosing_namespace);
						self.path.pop();
						self.nodes[idx] = SchemaNode::Map(values?);
					}
					raw::SchemaNode::Type(t @ raw::Type::Enum) => {
						let (name_key, aliases) = named!(t);
						let raw_symbols = match &object.symbols {
							Some(symbols) => symbols,
							None => return Err(self.missing_attribute("symbols", t)),
						};
						let mut symbols = Vec::with_capacity(raw_symbols.len());
						let mut seen = HashSet::with_capacity(raw_symbols.len());
						for symbol in raw_symbols {
							let symbol: &str = &**symbol;
							// Symbols obey the same rules as names, in both
							// parsing modes
							if symbol.is_empty() || !NAME_REGEX.is_match(symbol) {
								return Err(self.error(SchemaErrorKind::InvalidName {
									name: symbol.to_owned(),
								}));
							}
							if !seen.insert(symbol) {
								return Err(self.error(SchemaErrorKind::DuplicateName {
									name: symbol.to_owned(),
								}));
							}
							symbols.push(symbol.to_owned());
						}
						let default_symbol = match &object.default {
							None => None,
							Some(default) => match default.as_str() {
								Some(s) if symbols.iter().any(|symbol| symbol == s) => {
									Some(s.to_owned())
								}
								_ => {
									return Err(self.error(SchemaErrorKind::InvalidDefault {
										default: default.clone(),
									}))
								}
							},
						};
						self.nodes[idx] = SchemaNode::Enum(Enum {
							name: name_key.name(),
							aliases,
							doc: object.doc.as_deref().map(str::to_owned),
							symbols,
							default_symbol,
							per_symbol_lookup: HashMap::new(),
						});
					}
					raw::SchemaNode::Type(t @ raw::Type::Fixed) => {
						let (name_key, aliases) = named!(t);
						let size = match object.size {
							Some(size) => size,
							None => return Err(self.missing_attribute("size", t)),
						};
						if size == 0 {
							return Err(self.error(SchemaErrorKind::InvalidFixedSize { size }));
						}
						self.nodes[idx] = SchemaNode::Fixed(Fixed {
							name: name_key.name(),
							aliases,
							size,
						});
					}
					raw::SchemaNode::Type(t @ raw::Type::Record) => {
						let (name_key, aliases) = named!(t);
						let raw_fields = match &object.fields {
							Some(fields) => fields,
							None => return Err(self.missing_attribute("fields", t)),
						};
						// Primary field names must be unique, and field
						// aliases must not collide with them
						let mut primary_names = HashSet::with_capacity(raw_fields.len());
						for (i, field) in raw_fields.iter().enumerate() {
							if !primary_names.insert(&*field.name) {
								self.path.push(format!("fields[{i}]"));
								let err = self.error(SchemaErrorKind::DuplicateName {
									name: field.name.clone().into_owned(),
								});
								self.path.pop();
								return Err(err);
							}
						}
						let mut fields = Vec::with_capacity(raw_fields.len());
						for (i, field) in raw_fields.iter().enumerate() {
							self.path.push(format!("fields[{i}]"));
							let parsed = self.record_field(field, &primary_names, name_key.namespace);
							self.path.pop();
							fields.push(parsed?);
						}
						self.nodes[idx] = SchemaNode::Record(Record {
							name: name_key.name(),
							aliases,
							doc: object.doc.as_deref().map(str::to_owned),
							fields,
						});
					}
					raw::SchemaNode::Type(primitive) => {
						self.nodes[idx] = match primitive {
							raw::Type::Null => SchemaNode::Null,
							raw::Type::Boolean => SchemaNode::Boolean,
							raw::Type::Int => SchemaNode::Int,
							raw::Type::Long => SchemaNode::Long,
							raw::Type::Float => SchemaNode::Float,
							raw::Type::Double => SchemaNode::Double,
							raw::Type::Bytes => SchemaNode::Bytes,
							raw::Type::String => SchemaNode::String,
							raw::Type::Array
							| raw::Type::Map
							| raw::Type::Record
							| raw::Type::Enum
							| raw::Type::Fixed => unreachable!("handled by the arms above"),
						};
					}
					raw::SchemaNode::Ref(_)
					| raw::SchemaNode::Object(_)
					| raw::SchemaNode::Union(_) => {
						unreachable!("nested types are handled before name registration")
					}
				}

				if let Some(ref logical_type) = object.logical_type {
					self.apply_logical_type(idx, logical_type, object)?;
				}

				SchemaKey { idx }
			}
		})
	}

	/// Replace the regular node at `idx` with its logical-type'd counterpart
	///
	/// A logical type that fails its own validation is a hard error in strict
	/// mode and is dropped to the underlying type otherwise. Unrecognized
	/// logical type names are always ignored, as the Avro spec mandates.
	fn apply_logical_type(
		&mut self,
		idx: usize,
		logical_type: &str,
		object: &raw::SchemaNodeObject<'_>,
	) -> Result<(), SchemaError> {
		let fail = |state: &Self, reason: Cow<'static, str>| {
			if state.strict {
				Err(state.error(SchemaErrorKind::InvalidLogicalType { reason }))
			} else {
				Ok(())
			}
		};
		match logical_type {
			"decimal" => {
				let precision = match object.precision {
					Some(precision) if precision >= 1 => precision,
					Some(_) => return fail(self, "`decimal` requires `precision` >= 1".into()),
					None => return fail(self, "`decimal` requires a `precision`".into()),
				};
				let scale = object.scale.unwrap_or(0);
				if scale as usize > precision {
					return fail(
						self,
						format!("`decimal` requires `scale` ({scale}) <= `precision` ({precision})")
							.into(),
					);
				}
				let repr = match &self.nodes[idx] {
					SchemaNode::Bytes => DecimalRepr::Bytes,
					SchemaNode::Fixed(fixed) => DecimalRepr::Fixed(fixed.clone()),
					_ => return fail(self, "`decimal` annotates `bytes` or `fixed`".into()),
				};
				self.nodes[idx] = SchemaNode::Decimal(Decimal {
					precision,
					scale,
					repr,
				});
			}
			"uuid" => match &self.nodes[idx] {
				SchemaNode::String => self.nodes[idx] = SchemaNode::Uuid(UuidRepr::String),
				SchemaNode::Fixed(fixed) if fixed.size == 16 => {
					let fixed = fixed.clone();
					self.nodes[idx] = SchemaNode::Uuid(UuidRepr::Fixed(fixed));
				}
				_ => return fail(self, "`uuid` annotates `string` or a 16-byte `fixed`".into()),
			},
			"date" => match &self.nodes[idx] {
				SchemaNode::Int => self.nodes[idx] = SchemaNode::Date,
				_ => return fail(self, "`date` annotates `int`".into()),
			},
			"time-millis" => match &self.nodes[idx] {
				SchemaNode::Int => self.nodes[idx] = SchemaNode::TimeMillis,
				_ => return fail(self, "`time-millis` annotates `int`".into()),
			},
			"time-micros" => match &self.nodes[idx] {
				SchemaNode::Long => self.nodes[idx] = SchemaNode::TimeMicros,
				_ => return fail(self, "`time-micros` annotates `long`".into()),
			},
			"timestamp-millis" => match &self.nodes[idx] {
				SchemaNode::Long => self.nodes[idx] = SchemaNode::TimestampMillis,
				_ => return fail(self, "`timestamp-millis` annotates `long`".into()),
			},
			"timestamp-micros" => match &self.nodes[idx] {
				SchemaNode::Long => self.nodes[idx] = SchemaNode::TimestampMicros,
				_ => return fail(self, "`timestamp-micros` annotates `long`".into()),
			},
			"timestamp-nanos" => match &self.nodes[idx] {
				SchemaNode::Long => self.nodes[idx] = SchemaNode::TimestampNanos,
				_ => return fail(self, "`timestamp-nanos` annotates `long`".into()),
			},
			// Unknown logical types must be ignored so that schemas keep
			// working as new ones get specified
			_ => {}
		}
		Ok(())
	}

	fn record_field(
		&mut self,
		field: &'a raw::Field<'a>,
		primary_names: &HashSet<&str>,
		record_namespace: Option<&'a str>,
	) -> Result<RecordField, SchemaError> {
		if self.strict {
			if let Some(key) = field.unknown_keys.first() {
				return Err(self.error(SchemaErrorKind::UnrecognizedKey { key: key.clone() }));
			}
		}
		self.check_name(&field.name)?;
		let mut aliases = Vec::new();
		for alias in field.aliases.iter().flatten() {
			let alias: &str = &**alias;
			if self.strict {
				self.check_name(alias)?;
			}
			if primary_names.contains(alias) {
				return Err(self.error(SchemaErrorKind::DuplicateName {
					name: alias.to_owned(),
				}));
			}
			aliases.push(alias.to_owned());
		}
		let order = match field.order.as_deref() {
			None | Some("ascending") => FieldOrder::Ascending,
			Some("descending") => FieldOrder::Descending,
			Some("ignore") => FieldOrder::Ignore,
			Some(other) => {
				if self.strict {
					return Err(self.error(SchemaErrorKind::InvalidSchema {
						reason: format!("unknown field order {other:?}").into(),
					}));
				}
				FieldOrder::Ascending
			}
		};
		self.path.push("type".to_owned());
		let schema = self.register_node(&field.type_, record_namespace);
		self.path.pop();
		Ok(RecordField {
			name: field.name.clone().into_owned(),
			aliases,
			doc: field.doc.as_deref().map(str::to_owned),
			schema: schema?,
			default: field.default.clone(),
			order,
		})
	}

	/// Register the primary name and all aliases of a named type, pointing at
	/// the node that is about to be constructed at `idx`
	fn register_names(
		&mut self,
		name: &'a str,
		namespace: Option<&'a str>,
		aliases: Option<&'a [Cow<'a, str>]>,
		enclosing_namespace: Option<&'a str>,
		idx: usize,
	) -> Result<(NameKey<'a>, Vec<Name>), SchemaError> {
		let name_key = if let Some((namespace, name)) = name.rsplit_once('.') {
			NameKey {
				namespace: Some(namespace).filter(|&s| !s.is_empty()),
				name,
			}
		} else {
			NameKey {
				namespace: match namespace {
					// If the object explicitly specifies an empty string as
					// namespace, "this indicates the null namespace"
					Some(namespace) => Some(namespace).filter(|&s| !s.is_empty()),
					None => enclosing_namespace,
				},
				name,
			}
		};
		self.check_name(name_key.name)?;
		if let Some(namespace) = name_key.namespace {
			self.check_namespace(namespace)?;
		}
		if self.names.insert(name_key, idx).is_some() {
			return Err(self.error(SchemaErrorKind::DuplicateName {
				name: name_key.to_string(),
			}));
		}
		// Aliases live in the same name space as the type itself, and must
		// not collide with anything in it
		let mut alias_names = Vec::new();
		for alias in aliases.into_iter().flatten() {
			let alias: &str = &**alias;
			let alias_key = if let Some((namespace, alias)) = alias.rsplit_once('.') {
				NameKey {
					namespace: Some(namespace).filter(|&s| !s.is_empty()),
					name: alias,
				}
			} else {
				NameKey {
					namespace: name_key.namespace,
					name: alias,
				}
			};
			self.check_name(alias_key.name)?;
			if self.names.insert(alias_key, idx).is_some() {
				return Err(self.error(SchemaErrorKind::DuplicateName {
					name: alias_key.to_string(),
				}));
			}
			alias_names.push(alias_key.name());
		}
		Ok((name_key, alias_names))
	}

	/// Names must always be non-empty; the full Avro name regex is only
	/// enforced in strict mode
	fn check_name(&self, name: &str) -> Result<(), SchemaError> {
		if name.is_empty() || (self.strict && !NAME_REGEX.is_match(name)) {
			Err(self.error(SchemaErrorKind::InvalidName {
				name: name.to_owned(),
			}))
		} else {
			Ok(())
		}
	}

	fn check_namespace(&self, namespace: &str) -> Result<(), SchemaError> {
		if self.strict
			&& !namespace
				.split('.')
				.all(|component| NAME_REGEX.is_match(component))
		{
			Err(self.error(SchemaErrorKind::InvalidName {
				name: namespace.to_owned(),
			}))
		} else {
			Ok(())
		}
	}

	fn missing_attribute(&self, field: &'static str, _type: raw::Type) -> SchemaError {
		self.error(SchemaErrorKind::MissingRequiredField { field })
	}

	fn error(&self, kind: SchemaErrorKind) -> SchemaError {
		SchemaError::at(kind, self.path_string())
	}

	fn path_string(&self) -> String {
		let mut out = String::new();
		for segment in &self.path {
			if !out.is_empty() && !segment.starts_with('[') {
				out.push('.');
			}
			out.push_str(segment);
		}
		out
	}
}

/// Union invariants can only be checked once late name references have been
/// resolved, since a branch may be a forward reference
fn validate_unions(nodes: &[SchemaNode]) -> Result<(), SchemaError> {
	for schema_node in nodes {
		let union = match schema_node {
			SchemaNode::Union(union) => union,
			_ => continue,
		};
		let mut seen_unnamed: HashSet<&'static str> = HashSet::new();
		let mut seen_named: HashSet<&str> = HashSet::new();
		for &variant in &union.variants {
			let unnamed = match &nodes[variant.idx] {
				SchemaNode::Union(_) => {
					return Err(SchemaError::new(SchemaErrorKind::InvalidUnion {
						reason: "unions may not immediately contain other unions".into(),
					}))
				}
				SchemaNode::Record(record) => {
					register_named(&mut seen_named, &record.name)?;
					continue;
				}
				SchemaNode::Enum(enum_) => {
					register_named(&mut seen_named, &enum_.name)?;
					continue;
				}
				SchemaNode::Fixed(fixed)
				| SchemaNode::Decimal(Decimal {
					repr: DecimalRepr::Fixed(fixed),
					..
				})
				| SchemaNode::Uuid(UuidRepr::Fixed(fixed)) => {
					register_named(&mut seen_named, &fixed.name)?;
					continue;
				}
				SchemaNode::Null => "null",
				SchemaNode::Boolean => "boolean",
				SchemaNode::Int | SchemaNode::Date | SchemaNode::TimeMillis => "int",
				SchemaNode::Long
				| SchemaNode::TimeMicros
				| SchemaNode::TimestampMillis
				| SchemaNode::TimestampMicros
				| SchemaNode::TimestampNanos => "long",
				SchemaNode::Float => "float",
				SchemaNode::Double => "double",
				SchemaNode::Bytes
				| SchemaNode::Decimal(Decimal {
					repr: DecimalRepr::Bytes,
					..
				}) => "bytes",
				SchemaNode::String | SchemaNode::Uuid(UuidRepr::String) => "string",
				SchemaNode::Array(_) => "array",
				SchemaNode::Map(_) => "map",
			};
			if !seen_unnamed.insert(unnamed) {
				return Err(SchemaError::new(SchemaErrorKind::InvalidUnion {
					reason: format!("union contains duplicate {unnamed} branches").into(),
				}));
			}
		}
	}
	Ok(())
}

fn register_named<'s>(seen_named: &mut HashSet<&'s str>, name: &'s Name) -> Result<(), SchemaError> {
	if !seen_named.insert(name.fully_qualified_name()) {
		Err(SchemaError::new(SchemaErrorKind::InvalidUnion {
			reason: format!(
				"union contains duplicate branches for {}",
				name.fully_qualified_name()
			)
			.into(),
		}))
	} else {
		Ok(())
	}
}

/// Field defaults may sit on a forward-referenced type, so they are validated
/// once the graph is linked. Errors anchor their path at the record fullname.
fn validate_defaults(nodes: &[SchemaNode]) -> Result<(), SchemaError> {
	for schema_node in nodes {
		let record = match schema_node {
			SchemaNode::Record(record) => record,
			_ => continue,
		};
		for (i, field) in record.fields.iter().enumerate() {
			if let Some(default) = &field.default {
				if !default_matches(nodes, field.schema, default) {
					return Err(SchemaError::at(
						SchemaErrorKind::InvalidDefault {
							default: default.clone(),
						},
						format!(
							"{}.fields[{i}].default",
							record.name.fully_qualified_name()
						),
					));
				}
			}
		}
	}
	Ok(())
}

fn default_matches(nodes: &[SchemaNode], key: SchemaKey, default: &serde_json::Value) -> bool {
	match &nodes[key.idx] {
		SchemaNode::Null => default.is_null(),
		SchemaNode::Boolean => default.is_boolean(),
		SchemaNode::Int | SchemaNode::Date | SchemaNode::TimeMillis => default
			.as_i64()
			.map_or(false, |v| i32::try_from(v).is_ok()),
		SchemaNode::Long
		| SchemaNode::TimeMicros
		| SchemaNode::TimestampMillis
		| SchemaNode::TimestampMicros
		| SchemaNode::TimestampNanos => default.as_i64().is_some(),
		SchemaNode::Float | SchemaNode::Double => default.is_number(),
		SchemaNode::String | SchemaNode::Uuid(UuidRepr::String) => default.is_string(),
		// Byte-ish defaults are strings whose code points are all <= U+00FF,
		// each one standing for a byte
		SchemaNode::Bytes
		| SchemaNode::Decimal(Decimal {
			repr: DecimalRepr::Bytes,
			..
		}) => default.as_str().map_or(false, byte_compatible_str),
		SchemaNode::Fixed(fixed)
		| SchemaNode::Decimal(Decimal {
			repr: DecimalRepr::Fixed(fixed),
			..
		})
		| SchemaNode::Uuid(UuidRepr::Fixed(fixed)) => default.as_str().map_or(false, |s| {
			byte_compatible_str(s) && s.chars().count() == fixed.size
		}),
		SchemaNode::Enum(enum_) => default
			.as_str()
			.map_or(false, |s| enum_.symbols.iter().any(|symbol| symbol == s)),
		SchemaNode::Array(items) => default
			.as_array()
			.map_or(false, |values| {
				values.iter().all(|v| default_matches(nodes, *items, v))
			}),
		SchemaNode::Map(values) => default.as_object().map_or(false, |object| {
			object.values().all(|v| default_matches(nodes, *values, v))
		}),
		// A union default always corresponds to the first branch
		SchemaNode::Union(union) => union
			.variants
			.first()
			.map_or(false, |&first| default_matches(nodes, first, default)),
		SchemaNode::Record(record) => default.as_object().map_or(false, |object| {
			record.fields.iter().all(|field| match object.get(&field.name) {
				Some(v) => default_matches(nodes, field.schema, v),
				None => field.default.is_some(),
			})
		}),
	}
}

fn byte_compatible_str(s: &str) -> bool {
	s.chars().all(|c| (c as u32) <= 0xFF)
}

#[derive(PartialEq, Eq, Hash, Clone, Copy)]
struct NameKey<'a> {
	namespace: Option<&'a str>,
	name: &'a str,
}

impl NameKey<'_> {
	fn name(&self) -> Name {
		Name::from_parts(self.namespace, self.name)
	}
}

impl std::fmt::Display for NameKey<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.namespace {
			None => self.name.fmt(f),
			Some(namespace) => write!(f, "{}.{}", namespace, self.name),
		}
	}
}
