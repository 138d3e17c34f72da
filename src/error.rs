//! All error types for the josm-i18n crate.
//!
//! These are returned from all fallible operations (encoding, decoding, file plumbing).
//! A malformed document always aborts the whole decode, no partial tables are returned.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A value was constructed from input that violates its contract
    /// (e.g. a `MessageText` without any strings).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value cannot be represented in the target format
    /// (e.g. a `.lang` string of 65534 or more UTF-8 bytes).
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// The bytes are not a document of the expected format
    /// (wrong magic number, truncated data, offsets beyond the end, invalid UTF-8).
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A base `.lang` document uses a sentinel that is only legal in translated documents.
    #[error("inconsistent base language: {0}")]
    InconsistentBaseLanguage(String),

    /// A reserved, undocumented sentinel value was encountered.
    #[error("unsupported sentinel: {0}")]
    UnsupportedSentinel(String),

    /// The textual `.po` document could not be parsed.
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDocument(message.into())
    }

    /// Creates a new syntax error
    pub fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax(message.into())
    }
}
