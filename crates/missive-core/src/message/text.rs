//! The UTF-8 text message variant.

use std::fmt;

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::kind::MessageKind;

/// A message that is a Unicode string.
///
/// The textual wire form is the string itself; the binary wire form is its
/// UTF-8 encoding. Holds no external resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextMessage {
    text: String,
}

impl TextMessage {
    /// Creates a message wrapping the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The empty text message.
    #[must_use]
    pub fn empty() -> Self {
        Self { text: String::new() }
    }

    /// The wrapped text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The kind discriminator for this variant.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        MessageKind::Text
    }

    /// UTF-8 decodes the binary wire form.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if the payload is not valid UTF-8.
    pub(crate) fn decode_binary(encoded: &ByteBuffer) -> Result<Self> {
        if encoded.is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self::new(String::from_utf8(encoded.as_slice().to_vec())?))
    }

    /// The textual wire form is the string itself.
    #[must_use]
    pub fn encode_as_text(&self) -> String {
        self.text.clone()
    }

    /// UTF-8 encodes the text; the empty string encodes to the shared empty
    /// buffer.
    #[must_use]
    pub fn encode_as_bytes(&self) -> ByteBuffer {
        if self.text.is_empty() {
            return ByteBuffer::empty();
        }
        ByteBuffer::from(self.text.as_bytes())
    }
}

impl From<String> for TextMessage {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for TextMessage {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for TextMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bounded preview keeps log lines short.
        if self.text.chars().count() > 21 {
            let preview: String = self.text.chars().take(20).collect();
            write!(f, "TextMessage(\"{preview}\u{2026}\")")
        } else {
            write!(f, "TextMessage(\"{}\")", self.text)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn binary_roundtrip() {
        for s in ["", "hello", "héllo wörld", "\u{1F600}\u{1F680}"] {
            let original = TextMessage::new(s);
            let decoded = TextMessage::decode_binary(&original.encode_as_bytes()).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn text_form_is_identity() {
        let message = TextMessage::new("payload");
        assert_eq!(message.encode_as_text(), "payload");
    }

    #[test]
    fn empty_text_encodes_to_empty_buffer() {
        assert!(TextMessage::empty().encode_as_bytes().is_empty());
    }

    #[test]
    fn empty_buffer_decodes_to_empty_message() {
        let decoded = TextMessage::decode_binary(&ByteBuffer::empty()).unwrap();
        assert_eq!(decoded, TextMessage::empty());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let encoded = ByteBuffer::from(vec![0xFFu8, 0xFE]);
        assert!(TextMessage::decode_binary(&encoded).is_err());
    }

    #[test]
    fn display_truncates_long_text() {
        let short = TextMessage::new("short");
        assert_eq!(short.to_string(), "TextMessage(\"short\")");

        let long = TextMessage::new("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(long.to_string(), "TextMessage(\"abcdefghijklmnopqrst\u{2026}\")");
    }
}
