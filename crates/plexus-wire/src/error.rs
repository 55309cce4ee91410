//! Codec error types.

use thiserror::Error;

/// Wire codec errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A runtime value has no registered encoder/decoder.
    #[error("no codec registered for type {0}")]
    Unresolvable(String),

    /// The configured class resolver refused to resolve a type.
    ///
    /// The resolver's own message is preserved verbatim so callers can
    /// tell resolution policy failures apart from codec bugs.
    #[error("class resolver rejected registration: {message}")]
    ResolverRejected {
        /// The resolver's error text, unmodified.
        message: String,
    },

    /// A single atomic write could not fit in the configured buffer.
    #[error("buffer exhausted: single write of {required} bytes exceeds capacity {capacity}")]
    BufferExhausted { required: usize, capacity: usize },

    /// Decode hit an unknown tag, a truncated buffer, or a framing mismatch.
    #[error("malformed stream: {0}")]
    MalformedStream(String),

    /// An extension provider or resolver supplier could not be built.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Shorthand for a truncation error naming what was being read.
    pub(crate) fn truncated(what: &str, needed: usize, remaining: usize) -> Self {
        Error::MalformedStream(format!(
            "truncated while reading {what}: need {needed} bytes, {remaining} remaining"
        ))
    }
}
