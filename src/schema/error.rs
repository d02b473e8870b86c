use std::borrow::Cow;

/// Any error that may happen when parsing or validating a schema
pub struct SchemaError {
	inner: Box<ErrorInner>,
}

impl std::error::Error for SchemaError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.inner.kind)
	}
}

struct ErrorInner {
	kind: SchemaErrorKind,
	path: Option<String>,
}

/// What went wrong during schema parsing or validation
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SchemaErrorKind {
	/// The schema document is not valid JSON, or a known key holds a value of
	/// the wrong JSON type
	#[error("invalid schema JSON: {0}")]
	Json(serde_json::Error),
	#[error("invalid name {name:?}")]
	InvalidName { name: String },
	#[error("duplicate definition of {name:?}")]
	DuplicateName { name: String },
	#[error("unknown reference to {name:?}")]
	UnknownReference { name: String },
	#[error("invalid union: {reason}")]
	InvalidUnion { reason: Cow<'static, str> },
	#[error("default value {default} does not match the schema of the field")]
	InvalidDefault { default: serde_json::Value },
	#[error("invalid logical type: {reason}")]
	InvalidLogicalType { reason: Cow<'static, str> },
	#[error("missing required field `{field}`")]
	MissingRequiredField { field: &'static str },
	#[error("unrecognized key `{key}`")]
	UnrecognizedKey { key: String },
	#[error("fixed size must be a positive integer (got {size})")]
	InvalidFixedSize { size: usize },
	#[error("the schema contains a record that ends up always containing itself")]
	UnconditionalCycle,
	#[error("{reason}")]
	InvalidSchema { reason: Cow<'static, str> },
}

impl SchemaError {
	pub(crate) fn new(kind: SchemaErrorKind) -> Self {
		Self {
			inner: Box::new(ErrorInner { kind, path: None }),
		}
	}

	pub(crate) fn at(kind: SchemaErrorKind, path: String) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				kind,
				path: (!path.is_empty()).then_some(path),
			}),
		}
	}

	pub(crate) fn serde_json(serde_json_error: serde_json::Error) -> Self {
		Self::new(SchemaErrorKind::Json(serde_json_error))
	}

	/// What went wrong
	pub fn kind(&self) -> &SchemaErrorKind {
		&self.inner.kind
	}

	/// JSON path of the offending node, when known
	///
	/// Errors raised after named references are resolved anchor their path at
	/// the enclosing type's fullname instead of the document root.
	pub fn path(&self) -> Option<&str> {
		self.inner.path.as_deref()
	}
}

impl std::fmt::Display for SchemaError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.inner.path {
			Some(ref path) => write!(f, "{} (at {})", self.inner.kind, path),
			None => std::fmt::Display::fmt(&self.inner.kind, f),
		}
	}
}

impl std::fmt::Debug for SchemaError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(self, f)
	}
}
