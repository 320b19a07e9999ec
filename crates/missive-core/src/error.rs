//! Error types for the core crate.

use std::io;

use thiserror::Error;

/// Errors that can occur while encoding, decoding, or releasing messages.
#[derive(Debug, Error)]
pub enum Error {
    /// A byte discriminator on the binary wire did not name any message kind.
    #[error("invalid message kind byte: {0:#04x}")]
    InvalidKindByte(u8),

    /// A character discriminator on the textual wire did not name any message kind.
    #[error("invalid message kind char: {0:?}")]
    InvalidKindChar(char),

    /// A textual composite was missing an expected field delimiter.
    #[error("delimiter not found")]
    MissingDelimiter,

    /// A count or length field was not a plain non-negative decimal literal.
    #[error("invalid length field: {0:?}")]
    InvalidLength(String),

    /// The input ended before a declared count or length was satisfied.
    #[error("truncated input: needed {expected} more, {remaining} remaining")]
    Truncated {
        /// Units (bytes or characters) still required by the declared structure.
        expected: usize,
        /// Units actually left in the input.
        remaining: usize,
    },

    /// Input remained after the declared structure was fully consumed.
    #[error("leftover input: consumed {consumed} of {total}")]
    TrailingInput {
        /// Units consumed by the declared structure.
        consumed: usize,
        /// Total units in the input.
        total: usize,
    },

    /// A binary payload that must be UTF-8 was not.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A textual payload that must be base64 was not.
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// A count or payload exceeded the 32-bit limit of the binary wire format.
    #[error("{what} too long for wire format: {len}")]
    Oversized {
        /// What overflowed.
        what: &'static str,
        /// The offending length.
        len: usize,
    },

    /// The child count observed while encoding differed from the count
    /// recorded before iteration began.
    #[error("message count changed during encode: expected {expected}, observed {actual}")]
    SizeChanged {
        /// Count recorded before iteration.
        expected: usize,
        /// Count observed during iteration.
        actual: usize,
    },

    /// A decode needed a temporary file but the provider refuses to supply one.
    #[error("no temporary file provider available")]
    TempFilesUnavailable,

    /// An operation was invoked on a released temporary file message.
    #[error("file message already released")]
    Released,

    /// Releasing a composite failed for one or more children.
    ///
    /// Every child is attempted regardless of earlier failures; this variant
    /// carries all of them.
    #[error("failed to release {} message(s)", .failures.len())]
    Release {
        /// The failures, in child order.
        failures: Vec<Error>,
    },

    /// An I/O error occurred while reading, writing, or deleting a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for message operations.
pub type Result<T> = std::result::Result<T, Error>;
