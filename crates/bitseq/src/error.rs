//! Error types for bitseq operations

use thiserror::Error;

/// Main error type for bitseq operations.
///
/// The variants mirror the failure classes of the library: errors while
/// creating a bit sequence, errors while interpreting one as a value,
/// errors from reading past the end of the data, and whole-byte alignment
/// requirements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A bit sequence could not be created from the given input
    #[error("creation error: {0}")]
    Creation(String),

    /// The bits cannot be interpreted as the requested type
    #[error("interpret error: {0}")]
    Interpret(String),

    /// A read or peek went past the end of the available bits
    #[error("read error: {0}")]
    Read(String),

    /// An operation needed a whole-byte position or length
    #[error("byte align error: {0}")]
    ByteAlign(String),

    /// An argument was out of range or otherwise invalid
    #[error("value error: {0}")]
    Value(String),
}

impl Error {
    /// Shorthand for a `Creation` error.
    pub(crate) fn creation(msg: impl Into<String>) -> Self {
        Error::Creation(msg.into())
    }

    /// Shorthand for an `Interpret` error.
    pub(crate) fn interpret(msg: impl Into<String>) -> Self {
        Error::Interpret(msg.into())
    }

    /// Shorthand for a `Read` error.
    pub(crate) fn read(msg: impl Into<String>) -> Self {
        Error::Read(msg.into())
    }

    /// Shorthand for a `ByteAlign` error.
    pub(crate) fn byte_align(msg: impl Into<String>) -> Self {
        Error::ByteAlign(msg.into())
    }

    /// Shorthand for a `Value` error.
    pub(crate) fn value(msg: impl Into<String>) -> Self {
        Error::Value(msg.into())
    }
}

/// Result type alias for bitseq operations
pub type Result<T> = std::result::Result<T, Error>;
