use thiserror::Error;

/// Errors raised while producing a canonical encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("type {type_name} has no canonical encoding")]
    Unsupported { type_name: &'static str },

    #[error("type {type_name} is recursive through a pointer")]
    RecursivePointer { type_name: &'static str },

    #[error("offset {offset} exceeds the maximum byte offset")]
    OffsetOverflow { offset: usize },

    #[error("value of type {type_name} does not match its shape: {detail}")]
    ShapeMismatch {
        type_name: &'static str,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building or running a hashing strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("type {type_name} is not hashable")]
    Unsupported { type_name: &'static str },

    #[error("type {type_name} is recursive through a pointer")]
    RecursivePointer { type_name: &'static str },

    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    #[error("cannot resolve fields of {type_name}: {reason}")]
    FieldResolution {
        type_name: &'static str,
        reason: String,
    },

    #[error("value of type {type_name} does not match its shape: {detail}")]
    ShapeMismatch {
        type_name: &'static str,
        detail: String,
    },

    #[error("failed to hash field `{field}` of {container}: {source}")]
    Field {
        container: &'static str,
        field: &'static str,
        source: Box<StrategyError>,
    },
}

impl StrategyError {
    /// Kind of the innermost failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrategyError::Unsupported { .. } | StrategyError::RecursivePointer { .. } => {
                ErrorKind::UnsupportedType
            }
            StrategyError::Encoding(
                EncodeError::Unsupported { .. } | EncodeError::RecursivePointer { .. },
            ) => ErrorKind::UnsupportedType,
            StrategyError::Encoding(EncodeError::ShapeMismatch { .. }) => ErrorKind::ShapeMismatch,
            StrategyError::Encoding(_) => ErrorKind::EncodingFailure,
            StrategyError::FieldResolution { .. } => ErrorKind::FieldResolutionFailure,
            StrategyError::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            StrategyError::Field { source, .. } => source.kind(),
        }
    }
}

/// Broad category of a [`HashError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NilInput,
    UnsupportedType,
    EncodingFailure,
    FieldResolutionFailure,
    ShapeMismatch,
}

/// Error returned by [`TreeHasher::hash_tree_root`](crate::TreeHasher::hash_tree_root).
///
/// Carries the failure message together with the type that was being hashed.
#[derive(Debug, Error)]
#[error("hash error: {message} for input type {}", .type_name.unwrap_or("<nil>"))]
pub struct HashError {
    kind: ErrorKind,
    message: String,
    type_name: Option<&'static str>,
    #[source]
    source: Option<StrategyError>,
}

impl HashError {
    pub(crate) fn nil_input() -> Self {
        Self {
            kind: ErrorKind::NilInput,
            message: "untyped nil is not supported".to_string(),
            type_name: None,
            source: None,
        }
    }

    pub(crate) fn wrap(err: StrategyError, type_name: &'static str) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            type_name: Some(type_name),
            source: Some(err),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the offending type, `None` for nil input.
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }
}
