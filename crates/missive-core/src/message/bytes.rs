//! The raw-bytes message variant.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::kind::MessageKind;

/// A message that is a byte sequence.
///
/// The textual wire form is standard base64; the binary wire form is the
/// wrapped buffer itself. Holds no external resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BytesMessage {
    payload: ByteBuffer,
}

impl BytesMessage {
    /// Creates a message wrapping the given bytes.
    #[must_use]
    pub fn new(payload: impl Into<ByteBuffer>) -> Self {
        Self { payload: payload.into() }
    }

    /// The empty bytes message.
    #[must_use]
    pub fn empty() -> Self {
        Self { payload: ByteBuffer::empty() }
    }

    /// The wrapped bytes.
    #[must_use]
    pub fn payload(&self) -> &ByteBuffer {
        &self.payload
    }

    /// The kind discriminator for this variant.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        MessageKind::Bytes
    }

    /// Base64-decodes the textual wire form.
    ///
    /// The empty string decodes to the shared empty message without touching
    /// the base64 machinery.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if `encoded` is not valid base64.
    pub(crate) fn decode_text(encoded: &str) -> Result<Self> {
        if encoded.is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self::new(STANDARD.decode(encoded)?))
    }

    /// Base64-encodes the payload; the empty payload encodes to the empty
    /// string without allocation.
    #[must_use]
    pub fn encode_as_text(&self) -> String {
        if self.payload.is_empty() {
            return String::new();
        }
        STANDARD.encode(self.payload.as_slice())
    }

    /// Returns the wrapped buffer directly; no copy is made.
    #[must_use]
    pub fn encode_as_bytes(&self) -> ByteBuffer {
        self.payload.clone()
    }
}

impl From<Vec<u8>> for BytesMessage {
    fn from(payload: Vec<u8>) -> Self {
        Self::new(payload)
    }
}

impl fmt::Display for BytesMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytesMessage({})", self.payload.len())
    }
}
