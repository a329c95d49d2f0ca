//! Body normalization error types
//!
//! Provides a single error type for every failure the body pipeline can
//! report, along with its classification and the HTTP status a host should
//! answer with.

use thiserror::Error;

/// Broad category of a [`BodyError`]
///
/// Every failure is a deterministic function of the request bytes, so none
/// of these categories are retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The content type requires a body or parameter that was not supplied
    Precondition,
    /// Malformed JSON, URL-encoded pairs, multipart framing or non-UTF-8 text
    Syntax,
    /// JSON parsed fine but its top-level shape is not accepted
    Shape,
    /// The decoded result could not be turned into JSON bytes
    Serialization,
    /// The body could not be read from the wire
    Transport,
}

/// Body pipeline error type
///
/// Any variant aborts the whole decode; partial results are never returned
/// alongside it.
///
/// # Example
///
/// ```rust,ignore
/// use kit_body::{BodyError, ErrorKind};
///
/// let err = BodyError::InvalidArrayItem { index: 2 };
/// assert_eq!(err.to_string(), "invalid JSON array item at index 2");
/// assert_eq!(err.kind(), ErrorKind::Shape);
/// assert_eq!(err.status_code(), 400);
/// ```
#[derive(Debug, Clone, Error)]
pub enum BodyError {
    /// Form content type without a body
    #[error("empty form body")]
    EmptyFormBody,

    /// Multipart content type without a body
    #[error("empty multipart body")]
    EmptyMultipartBody,

    /// The multipart content type could not be parsed as a media type
    #[error("failed to parse content type: {0}")]
    ContentType(String),

    /// The multipart content type has no `boundary` parameter
    #[error("no boundary in multipart content type")]
    MissingBoundary,

    /// Malformed JSON syntax
    #[error("failed to parse body: {0}")]
    Json(String),

    /// A JSON array element is not an object
    #[error("invalid JSON array item at index {index}")]
    InvalidArrayItem {
        /// Position of the first offending element
        index: usize,
    },

    /// The top-level JSON value is neither an object nor an array
    #[error("unsupported JSON structure: {shape}")]
    UnsupportedStructure {
        /// Name of the encountered JSON type
        shape: &'static str,
    },

    /// A `text/plain` body that is not valid UTF-8
    #[error("invalid text body: {0}")]
    InvalidText(String),

    /// Malformed URL-encoded form data
    #[error("failed to parse form data: {0}")]
    Form(String),

    /// Malformed multipart framing or part headers
    #[error("failed to read multipart part: {0}")]
    MultipartPart(String),

    /// A multipart part body could not be read
    #[error("failed to read part value: {0}")]
    MultipartValue(String),

    /// The decoded payload could not be encoded as JSON
    #[error("failed to serialize body: {0}")]
    Serialization(String),

    /// Reading the body from the connection failed
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The body is larger than the configured limit
    #[error("request body exceeds {limit} bytes")]
    TooLarge {
        /// Configured limit in bytes
        limit: usize,
    },
}

impl BodyError {
    /// Create a Json syntax error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// Create a Form syntax error
    pub fn form(message: impl Into<String>) -> Self {
        Self::Form(message.into())
    }

    /// Create a Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyFormBody | Self::EmptyMultipartBody | Self::MissingBoundary => {
                ErrorKind::Precondition
            }
            Self::ContentType(_)
            | Self::Json(_)
            | Self::InvalidText(_)
            | Self::Form(_)
            | Self::MultipartPart(_)
            | Self::MultipartValue(_) => ErrorKind::Syntax,
            Self::InvalidArrayItem { .. } | Self::UnsupportedStructure { .. } => ErrorKind::Shape,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::BodyRead(_) | Self::TooLarge { .. } => ErrorKind::Transport,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::TooLarge { .. } => 413,
            _ => match self.kind() {
                ErrorKind::Precondition | ErrorKind::Syntax | ErrorKind::Shape => 400,
                ErrorKind::Serialization | ErrorKind::Transport => 500,
            },
        }
    }
}

impl From<serde_json::Error> for BodyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
