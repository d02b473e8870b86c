use std::borrow::Cow;

/// Any error that may happen during deserialization
pub struct DeError {
	inner: Box<ErrorInner>,
}

impl std::error::Error for DeError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.inner.kind)
	}
}

struct ErrorInner {
	kind: DeErrorKind,
	// Dotted schema path of the failing node, innermost last
	path: String,
}

/// What went wrong during deserialization
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DeErrorKind {
	#[error("unexpected end of input while deserializing")]
	UnexpectedEof,
	#[error("invalid boolean byte {byte:#04x}")]
	InvalidBoolean { byte: u8 },
	#[error("invalid UTF-8 in avro string: {bytes:?}")]
	InvalidString { bytes: Vec<u8> },
	#[error("{text:?} is not a valid UUID")]
	InvalidUuid { text: String },
	#[error("a fixed of size {size} cannot hold a binary UUID")]
	InvalidBinaryUuid { size: usize },
	#[error("union discriminant {index} is out of range for a union of {len} branches")]
	UnionBranchOutOfRange { index: i64, len: usize },
	#[error("enum discriminant {index} is out of range for an enum of {len} symbols")]
	EnumIndexOutOfRange { index: i64, len: usize },
	#[error("value {value} does not fit the expected integer width")]
	IntegerOutOfRange { value: i64 },
	#[error("invalid length prefix {len}")]
	InvalidLength { len: i64 },
	#[error("decimal is not representable: {reason}")]
	DecimalOutOfRange { reason: Cow<'static, str> },
	#[error("{remaining} trailing byte(s) after deserializing the datum")]
	TrailingBytes { remaining: usize },
	#[error("exceeding max sequence size while deserializing")]
	MaxSeqSizeExceeded,
	#[error("deserialization recursivity limit reached (stack overflow prevention)")]
	MaxDepthExceeded,
}

impl DeError {
	pub(crate) fn new(kind: DeErrorKind) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				kind,
				path: String::new(),
			}),
		}
	}

	pub(crate) fn unexpected_eof() -> Self {
		Self::new(DeErrorKind::UnexpectedEof)
	}

	/// Prepend a path segment as the error bubbles out of the traversal
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
	pub fn kind(&self) -> &DeErrorKind {
		&self.inner.kind
	}

	/// Schema path of the failing node, when not at the root
	pub fn path(&self) -> Option<&str> {
		(!self.inner.path.is_empty()).then_some(self.inner.path.as_str())
	}
}

impl std::fmt::Display for DeError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.inner.path.is_empty() {
			std::fmt::Display::fmt(&self.inner.kind, f)
		} else {
			write!(f, "{} (at {})", self.inner.kind, self.inner.path)
		}
	}
}

impl std::fmt::Debug for DeError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(self, f)
	}
}
