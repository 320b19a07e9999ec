//! The composite message variant and its two wire formats.
//!
//! # Textual format
//!
//! The empty composite encodes to the empty string. Otherwise:
//!
//! ```text
//! <count>,
//! then, per child, with no further separators:
//! <kindChar><encodedLength>,<encodedText>
//! ```
//!
//! `count` and each `encodedLength` are variable-width non-negative decimal
//! literals (no sign, no whitespace), so the trailing comma is searched for,
//! never assumed at a fixed offset. `encodedLength` counts the *characters*
//! of the child's own textual encoding.
//!
//! # Binary format
//!
//! The empty composite encodes to the empty buffer. Otherwise: a 4-byte
//! big-endian child count, then per child a 1-byte kind code, a 4-byte
//! big-endian payload length, and exactly that many payload bytes. Decoding
//! verifies that the bytes consumed equal the total input length, so
//! truncation and trailing garbage are both hard errors.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};
use crate::kind::MessageKind;
use crate::message::Message;
use crate::temp::TempFileProvider;

const DELIMITER: char = ',';

/// A message that is an ordered combination of other messages.
///
/// The sequence is immutable and insertion order is semantic: it is
/// preserved through both wire formats and participates in equality. The
/// composite holds its children by value and delegates encoding, equality,
/// hashing, and release to them.
#[derive(Debug, Default)]
pub struct MultiMessage {
    messages: Vec<Message>,
}

impl MultiMessage {
    /// Creates a composite over the given messages, preserving their order.
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// The empty composite.
    #[must_use]
    pub fn empty() -> Self {
        Self { messages: Vec::new() }
    }

    /// The child messages, in order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The number of child messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the composite has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The kind discriminator for this variant.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        MessageKind::Multi
    }

    /// Encodes the children into a single string.
    ///
    /// # Errors
    ///
    /// Propagates child encoding failures, and fails with
    /// [`Error::SizeChanged`] if the sequence length observed during
    /// iteration differs from the length recorded before it began.
    pub fn encode_as_text(&self) -> Result<String> {
        let size = self.messages.len();
        if size == 0 {
            return Ok(String::new());
        }

        let mut out = String::new();
        out.push_str(&size.to_string());
        out.push(DELIMITER);
        let mut count = 0;
        for message in &self.messages {
            count += 1;
            let encoded = message.encode_as_text()?;
            out.push(message.kind().as_char());
            out.push_str(&encoded.chars().count().to_string());
            out.push(DELIMITER);
            out.push_str(&encoded);
        }
        if count != size {
            return Err(Error::SizeChanged { expected: size, actual: count });
        }
        Ok(out)
    }

    /// Encodes the children into a single buffer.
    ///
    /// # Errors
    ///
    /// Propagates child encoding failures; fails with [`Error::Oversized`]
    /// when a count or payload exceeds the format's 32-bit fields, and with
    /// [`Error::SizeChanged`] on an iteration-length mismatch.
    pub fn encode_as_bytes(&self) -> Result<ByteBuffer> {
        let size = self.messages.len();
        if size == 0 {
            return Ok(ByteBuffer::empty());
        }

        let count_field = u32::try_from(size)
            .map_err(|_| Error::Oversized { what: "message count", len: size })?;
        let mut out = Vec::new();
        out.extend_from_slice(&count_field.to_be_bytes());
        let mut count = 0;
        for message in &self.messages {
            count += 1;
            let payload = message.encode_as_bytes()?;
            let len_field = u32::try_from(payload.len())
                .map_err(|_| Error::Oversized { what: "message payload", len: payload.len() })?;
            out.push(message.kind().code());
            out.extend_from_slice(&len_field.to_be_bytes());
            out.extend_from_slice(payload.as_slice());
        }
        if count != size {
            return Err(Error::SizeChanged { expected: size, actual: count });
        }
        Ok(ByteBuffer::from(out))
    }

    /// Decodes the textual wire form.
    ///
    /// The empty string yields the empty composite without any delimiter
    /// search. The cursor must land exactly at end of input once the
    /// declared count of children has been consumed.
    ///
    /// # Errors
    ///
    /// Any structural violation (missing delimiter, malformed length
    /// field, unknown kind character, exhausted input, leftover input)
    /// is a hard decode error.
    pub(crate) fn decode_text(encoded: &str, temp: &dyn TempFileProvider) -> Result<Self> {
        if encoded.is_empty() {
            return Ok(Self::empty());
        }

        let comma = encoded.find(DELIMITER).ok_or(Error::MissingDelimiter)?;
        let count = parse_decimal(&encoded[..comma])?;
        let mut rest = &encoded[comma + 1..];
        let mut messages = Vec::with_capacity(count.min(rest.len()));
        for _ in 0..count {
            let mut chars = rest.chars();
            let kind = match chars.next() {
                Some(c) => MessageKind::from_char(c)?,
                None => return Err(Error::Truncated { expected: 1, remaining: 0 }),
            };
            rest = chars.as_str();
            let comma = rest.find(DELIMITER).ok_or(Error::MissingDelimiter)?;
            let len = parse_decimal(&rest[..comma])?;
            rest = &rest[comma + 1..];
            let (child, remainder) = split_chars(rest, len)?;
            messages.push(Message::decode_text(kind, child, temp)?);
            rest = remainder;
        }
        if !rest.is_empty() {
            let total = encoded.chars().count();
            let consumed = total - rest.chars().count();
            return Err(Error::TrailingInput { consumed, total });
        }
        Ok(Self::new(messages))
    }

    /// Decodes the binary wire form.
    ///
    /// Each child's declared length is bounded against the remaining input
    /// before its payload is materialized, and the total bytes consumed must
    /// equal the input length.
    ///
    /// # Errors
    ///
    /// Any structural violation (unknown kind code, truncated field or
    /// payload, leftover bytes) is a hard decode error.
    pub(crate) fn decode_binary(encoded: &ByteBuffer, temp: &dyn TempFileProvider) -> Result<Self> {
        if encoded.is_empty() {
            return Ok(Self::empty());
        }

        let bytes = encoded.as_slice();
        let total = bytes.len();
        let mut pos = 0usize;
        let count = read_u32(bytes, &mut pos)? as usize;
        let mut messages = Vec::with_capacity(count.min(total));
        for _ in 0..count {
            let kind = MessageKind::from_code(read_u8(bytes, &mut pos)?)?;
            let len = read_u32(bytes, &mut pos)? as usize;
            let remaining = total - pos;
            if len > remaining {
                return Err(Error::Truncated { expected: len, remaining });
            }
            let payload = ByteBuffer::from(&bytes[pos..pos + len]);
            pos += len;
            messages.push(Message::decode_binary(kind, payload, temp)?);
        }
        if pos != total {
            return Err(Error::TrailingInput { consumed: pos, total });
        }
        Ok(Self::new(messages))
    }

    /// Ordered, position-wise comparison of the child sequences.
    ///
    /// # Errors
    ///
    /// Propagates child comparison failures (file-backed children read
    /// their content).
    pub fn content_eq(&self, other: &Self) -> Result<bool> {
        if self.messages.len() != other.messages.len() {
            return Ok(false);
        }
        for (ours, theirs) in self.messages.iter().zip(&other.messages) {
            if !ours.content_eq(theirs)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Hashes the child sequence in order, consistent with
    /// [`content_eq`](Self::content_eq).
    ///
    /// # Errors
    ///
    /// Propagates child hashing failures.
    pub fn content_hash(&self) -> Result<u64> {
        let mut hasher = DefaultHasher::new();
        self.messages.len().hash(&mut hasher);
        for message in &self.messages {
            message.content_hash()?.hash(&mut hasher);
        }
        Ok(hasher.finish())
    }

    /// Releases every child in order.
    ///
    /// A failing child never prevents the release of its siblings: every
    /// child is attempted, and all failures are surfaced together.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Release`] aggregating every child failure.
    pub fn release(&self) -> Result<()> {
        let mut failures = Vec::new();
        for message in &self.messages {
            if let Err(e) = message.release() {
                failures.push(e);
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Release { failures })
        }
    }
}

impl From<Vec<Message>> for MultiMessage {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

impl fmt::Display for MultiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiMessage({})", self.messages.len())
    }
}

/// Parses a count or length field: plain decimal digits, nothing else.
fn parse_decimal(field: &str) -> Result<usize> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidLength(field.to_owned()));
    }
    field.parse().map_err(|_| Error::InvalidLength(field.to_owned()))
}

/// Splits off exactly `n` characters, erroring if fewer remain.
fn split_chars(s: &str, n: usize) -> Result<(&str, &str)> {
    let mut indices = s.char_indices();
    for _ in 0..n {
        if indices.next().is_none() {
            return Err(Error::Truncated { expected: n, remaining: s.chars().count() });
        }
    }
    let split = indices.next().map_or(s.len(), |(i, _)| i);
    Ok(s.split_at(split))
}

fn read_u8(bytes: &[u8], pos: &mut usize) -> Result<u8> {
    match bytes.get(*pos) {
        Some(&b) => {
            *pos += 1;
            Ok(b)
        }
        None => Err(Error::Truncated { expected: 1, remaining: 0 }),
    }
}

fn read_u32(bytes: &[u8], pos: &mut usize) -> Result<u32> {
    let remaining = bytes.len() - *pos;
    let Some(slice) = bytes.get(*pos..*pos + 4) else {
        return Err(Error::Truncated { expected: 4, remaining });
    };
    let field: [u8; 4] = slice
        .try_into()
        .map_err(|_| Error::Truncated { expected: 4, remaining })?;
    *pos += 4;
    Ok(u32::from_be_bytes(field))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::{BytesMessage, TextMessage};
    use crate::temp::NoTempFiles;

    fn sample() -> MultiMessage {
        MultiMessage::new(vec![
            Message::Bytes(BytesMessage::new(vec![0xDEu8, 0xAD])),
            Message::Text(TextMessage::new("hi")),
        ])
    }

    #[test]
    fn text_roundtrip() {
        let original = sample();
        let encoded = original.encode_as_text().unwrap();
        let decoded = MultiMessage::decode_text(&encoded, &NoTempFiles).unwrap();
        assert!(original.content_eq(&decoded).unwrap());
    }

    #[test]
    fn text_encoding_shape() {
        // 2 children: bytes "3q0=" (base64 of DE AD), text "hi".
        assert_eq!(sample().encode_as_text().unwrap(), "2,b4,3q0=s2,hi");
    }

    #[test]
    fn nested_composites_roundtrip() {
        let inner = MultiMessage::new(vec![Message::Text(TextMessage::new("nested"))]);
        let outer = MultiMessage::new(vec![
            Message::Multi(inner),
            Message::Bytes(BytesMessage::new(vec![1u8, 2, 3])),
            Message::Multi(MultiMessage::empty()),
        ]);

        let text = outer.encode_as_text().unwrap();
        let from_text = MultiMessage::decode_text(&text, &NoTempFiles).unwrap();
        assert!(outer.content_eq(&from_text).unwrap());

        let binary = outer.encode_as_bytes().unwrap();
        let from_binary = MultiMessage::decode_binary(&binary, &NoTempFiles).unwrap();
        assert!(outer.content_eq(&from_binary).unwrap());
    }

    #[test]
    fn multibyte_text_lengths_count_characters() {
        let original = MultiMessage::new(vec![
            Message::Text(TextMessage::new("héllo \u{1F600}")),
            Message::Text(TextMessage::new("plain")),
        ]);
        let encoded = original.encode_as_text().unwrap();
        let decoded = MultiMessage::decode_text(&encoded, &NoTempFiles).unwrap();
        assert!(original.content_eq(&decoded).unwrap());
    }

    #[test]
    fn empty_composite_encodes_to_empty_forms() {
        let empty = MultiMessage::empty();
        assert_eq!(empty.encode_as_text().unwrap(), "");
        assert!(empty.encode_as_bytes().unwrap().is_empty());
    }

    #[test]
    fn empty_forms_decode_to_empty_composite() {
        let from_text = MultiMessage::decode_text("", &NoTempFiles).unwrap();
        let from_binary = MultiMessage::decode_binary(&ByteBuffer::empty(), &NoTempFiles).unwrap();
        assert!(from_text.is_empty());
        assert!(from_binary.is_empty());
        assert!(from_text.content_eq(&MultiMessage::empty()).unwrap());
    }

    #[test]
    fn missing_delimiter_is_rejected() {
        assert!(matches!(
            MultiMessage::decode_text("2", &NoTempFiles),
            Err(Error::MissingDelimiter)
        ));
    }

    #[test]
    fn signed_or_garbage_count_is_rejected() {
        for input in ["-1,", "+2,b0,", "2x,b0,", ","] {
            assert!(matches!(
                MultiMessage::decode_text(input, &NoTempFiles),
                Err(Error::InvalidLength(_))
            ));
        }
    }

    #[test]
    fn unknown_kind_char_is_rejected() {
        assert!(matches!(
            MultiMessage::decode_text("1,x2,hi", &NoTempFiles),
            Err(Error::InvalidKindChar('x'))
        ));
    }

    #[test]
    fn text_trailing_garbage_is_rejected() {
        let mut encoded = sample().encode_as_text().unwrap();
        encoded.push('x');
        assert!(matches!(
            MultiMessage::decode_text(&encoded, &NoTempFiles),
            Err(Error::TrailingInput { .. })
        ));
    }

    #[test]
    fn text_exhausted_mid_parse_is_rejected() {
        // Declares two children, supplies one.
        assert!(MultiMessage::decode_text("2,s2,hi", &NoTempFiles).is_err());
        // Declares more characters than remain.
        assert!(matches!(
            MultiMessage::decode_text("1,s5,hi", &NoTempFiles),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn binary_roundtrip() {
        let original = sample();
        let encoded = original.encode_as_bytes().unwrap();
        let decoded = MultiMessage::decode_binary(&encoded, &NoTempFiles).unwrap();
        assert!(original.content_eq(&decoded).unwrap());
    }

    #[test]
    fn binary_truncation_is_rejected() {
        let encoded = sample().encode_as_bytes().unwrap();
        let bytes = encoded.as_slice();
        // Every strict prefix must fail, never silently yield fewer children.
        for cut in 0..bytes.len() {
            if cut == 0 {
                continue; // empty input is the empty composite
            }
            let truncated = ByteBuffer::from(&bytes[..cut]);
            assert!(
                MultiMessage::decode_binary(&truncated, &NoTempFiles).is_err(),
                "prefix of {cut} bytes decoded successfully"
            );
        }
    }

    #[test]
    fn binary_trailing_garbage_is_rejected() {
        let encoded = sample().encode_as_bytes().unwrap();
        let mut bytes = encoded.as_slice().to_vec();
        bytes.push(0);
        assert!(matches!(
            MultiMessage::decode_binary(&ByteBuffer::from(bytes), &NoTempFiles),
            Err(Error::TrailingInput { .. })
        ));
    }

    #[test]
    fn binary_child_length_is_bounded_before_allocation() {
        // count=1, kind=0, declared length far beyond the remaining input.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        bytes.extend_from_slice(b"ab");
        assert!(matches!(
            MultiMessage::decode_binary(&ByteBuffer::from(bytes), &NoTempFiles),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn binary_unknown_kind_code_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.push(9);
        bytes.extend_from_slice(&0u32.to_be_bytes());
        assert!(matches!(
            MultiMessage::decode_binary(&ByteBuffer::from(bytes), &NoTempFiles),
            Err(Error::InvalidKindByte(9))
        ));
    }

    #[test]
    fn order_is_significant() {
        let a = Message::Text(TextMessage::new("a"));
        let b = Message::Text(TextMessage::new("b"));
        let ab = MultiMessage::new(vec![a, b]);
        let ba = MultiMessage::new(vec![
            Message::Text(TextMessage::new("b")),
            Message::Text(TextMessage::new("a")),
        ]);
        assert!(!ab.content_eq(&ba).unwrap());
    }

    #[test]
    fn hash_is_consistent_with_content_eq() {
        let a = sample();
        let b = sample();
        assert!(a.content_eq(&b).unwrap());
        assert_eq!(a.content_hash().unwrap(), b.content_hash().unwrap());
    }
}
