use std::borrow::Cow;

/// Any error that may happen during serialization
pub struct SerError {
	inner: Box<ErrorInner>,
}

impl std::error::Error for SerError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.inner.kind)
	}
}

struct ErrorInner {
	kind: SerErrorKind,
	// Dotted path of the offending value inside the datum, innermost last
	path: String,
}

/// What went wrong during serialization
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SerErrorKind {
	#[error("cannot encode {value} under schema {schema}")]
	TypeMismatch {
		value: Cow<'static, str>,
		schema: Cow<'static, str>,
	},
	#[error("no union branch matches {value}, branches are [{branches}]")]
	UnionBranchNotFound {
		value: Cow<'static, str>,
		branches: String,
	},
	#[error("enum symbol {symbol:?} is not part of the declared symbols")]
	EnumSymbolNotFound { symbol: String },
	#[error("fixed value length {got} does not match declared size {expected}")]
	FixedSizeMismatch { expected: usize, got: usize },
	#[error("bytes are not valid UTF-8 so cannot be encoded as an avro string")]
	InvalidString,
	#[error("{text:?} is not a valid UUID")]
	InvalidUuid { text: String },
	#[error("decimal is not representable at the declared precision/scale: {reason}")]
	DecimalOutOfRange { reason: Cow<'static, str> },
	#[error("{what} overflows i64")]
	LengthOverflow { what: &'static str },
	#[error("encountered IO error when writing for serialization: {0}")]
	Io(std::io::Error),
}

impl SerError {
	pub(crate) fn new(kind: SerErrorKind) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				kind,
				path: String::new(),
			}),
		}
	}

	pub(crate) fn io(io_error: std::io::Error) -> Self {
		Self::new(SerErrorKind::Io(io_error))
	}

	/// Prepend a path segment as the error bubbles out of the value traversal
	pub(crate) fn amend_path(mut self, segment: impl std::fmt::Display) -> Self {
		let path = &mut self.inner.path;
		if path.is_empty() {
			*path = segment.to_string();
		} else if path.starts_with('[') {
			*path = format!("{segment}{path}");
		} else {
			*path = format!("{segment}.{path}");
		}
		self
	}

	/// What went wrong
	pub fn kind(&self) -> &SerErrorKind {
		&self.inner.kind
	}

	/// Path of the offending value inside the datum, when not at the root
	pub fn path(&self) -> Option<&str> {
		(!self.inner.path.is_empty()).then_some(self.inner.path.as_str())
	}
}

impl std::fmt::Display for SerError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.inner.path.is_empty() {
			std::fmt::Display::fmt(&self.inner.kind, f)
		} else {
			write!(f, "{} (at {})", self.inner.kind, self.inner.path)
		}
	}
}

impl std::fmt::Debug for SerError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(self, f)
	}
}
