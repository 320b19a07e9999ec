//! Message variants and the uniform capability surface over them.
//!
//! [`Message`] is a closed sum type: exactly four payload kinds exist, and
//! every operation dispatches over them with an exhaustive `match`. Adding a
//! variant is therefore a compile-enforced update of every dispatch site,
//! including the two decode entry points.

mod bytes;
mod file;
mod multi;
mod text;


pub use bytes::BytesMessage;
pub use file::FileMessage;
pub use multi::MultiMessage;
pub use text::TextMessage;

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::kind::MessageKind;
use crate::temp::TempFileProvider;

/// Any of the four encapsulated message kinds.
///
/// A message is constructed either directly (wrapping in-memory or on-disk
/// content) or by one of the decode entry points, encoded any number of
/// times (encoding is non-destructive), and finally released exactly once by
/// whoever owns it. Only file-backed content makes any of these operations
/// fallible; the in-memory kinds never touch external resources.
#[derive(Debug)]
pub enum Message {
    /// Raw bytes.
    Bytes(BytesMessage),
    /// Filesystem-backed payload.
    File(FileMessage),
    /// UTF-8 text.
    Text(TextMessage),
    /// Ordered composite of other messages.
    Multi(MultiMessage),
}

impl Message {
    /// Decodes a message of the given kind from its textual wire form.
    ///
    /// The temporary-file provider is invoked lazily: at most once per
    /// file-backed value in the input, and never for in-memory kinds.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error for any structural violation, or a
    /// resource error if temporary-file provisioning or a write fails.
    pub fn decode_text(
        kind: MessageKind,
        encoded: &str,
        temp: &dyn TempFileProvider,
    ) -> Result<Self> {
        match kind {
            MessageKind::Bytes => Ok(Self::Bytes(BytesMessage::decode_text(encoded)?)),
            MessageKind::File => Ok(Self::File(FileMessage::decode_text(encoded, temp)?)),
            MessageKind::Text => Ok(Self::Text(TextMessage::new(encoded))),
            MessageKind::Multi => Ok(Self::Multi(MultiMessage::decode_text(encoded, temp)?)),
        }
    }

    /// Decodes a message of the given kind from its binary wire form.
    ///
    /// See [`decode_text`](Self::decode_text) for provider semantics.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error for any structural violation, or a
    /// resource error if temporary-file provisioning or a write fails.
    pub fn decode_binary(
        kind: MessageKind,
        encoded: ByteBuffer,
        temp: &dyn TempFileProvider,
    ) -> Result<Self> {
        match kind {
            MessageKind::Bytes => Ok(Self::Bytes(BytesMessage::new(encoded))),
            MessageKind::File => Ok(Self::File(FileMessage::decode_binary(&encoded, temp)?)),
            MessageKind::Text => Ok(Self::Text(TextMessage::decode_binary(&encoded)?)),
            MessageKind::Multi => Ok(Self::Multi(MultiMessage::decode_binary(&encoded, temp)?)),
        }
    }

    /// The kind discriminator for this message.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Bytes(_) => MessageKind::Bytes,
            Self::File(_) => MessageKind::File,
            Self::Text(_) => MessageKind::Text,
            Self::Multi(_) => MessageKind::Multi,
        }
    }

    /// Encodes this message into its textual wire form.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if file-backed content cannot be read.
    pub fn encode_as_text(&self) -> Result<String> {
        match self {
            Self::Bytes(m) => Ok(m.encode_as_text()),
            Self::File(m) => m.encode_as_text(),
            Self::Text(m) => Ok(m.encode_as_text()),
            Self::Multi(m) => m.encode_as_text(),
        }
    }

    /// Encodes this message into its binary wire form.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if file-backed content cannot be read.
    pub fn encode_as_bytes(&self) -> Result<ByteBuffer> {
        match self {
            Self::Bytes(m) => Ok(m.encode_as_bytes()),
            Self::File(m) => m.encode_as_bytes(),
            Self::Text(m) => Ok(m.encode_as_bytes()),
            Self::Multi(m) => m.encode_as_bytes(),
        }
    }

    /// Whether two messages have the same kind and the same decoded content.
    ///
    /// File-backed content is compared byte-for-byte by reading it, so this
    /// is fallible: an unreadable file is an error, never "not equal".
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from file-backed children.
    pub fn content_eq(&self, other: &Self) -> Result<bool> {
        match (self, other) {
            (Self::Bytes(a), Self::Bytes(b)) => Ok(a == b),
            (Self::File(a), Self::File(b)) => a.content_eq(b),
            (Self::Text(a), Self::Text(b)) => Ok(a == b),
            (Self::Multi(a), Self::Multi(b)) => a.content_eq(b),
            _ => Ok(false),
        }
    }

    /// Hashes the decoded content, consistent with
    /// [`content_eq`](Self::content_eq).
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from file-backed children.
    pub fn content_hash(&self) -> Result<u64> {
        match self {
            Self::Bytes(m) => {
                let mut hasher = DefaultHasher::new();
                m.payload().hash(&mut hasher);
                Ok(hasher.finish())
            }
            Self::File(m) => m.content_hash(),
            Self::Text(m) => {
                let mut hasher = DefaultHasher::new();
                m.text().hash(&mut hasher);
                Ok(hasher.finish())
            }
            Self::Multi(m) => m.content_hash(),
        }
    }

    /// Releases any resources held by this message.
    ///
    /// Idempotent. In-memory kinds hold nothing and always succeed; a
    /// temporary file-backed message deletes its file on the first call; a
    /// composite releases every child even when some fail, surfacing an
    /// aggregate error.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a deletion fails, or
    /// [`Error::Release`](crate::Error::Release) aggregating child failures.
    pub fn release(&self) -> Result<()> {
        match self {
            Self::Bytes(_) | Self::Text(_) => Ok(()),
            Self::File(m) => m.release(),
            Self::Multi(m) => m.release(),
        }
    }
}

impl From<BytesMessage> for Message {
    fn from(message: BytesMessage) -> Self {
        Self::Bytes(message)
    }
}

impl From<FileMessage> for Message {
    fn from(message: FileMessage) -> Self {
        Self::File(message)
    }
}

impl From<TextMessage> for Message {
    fn from(message: TextMessage) -> Self {
        Self::Text(message)
    }
}

impl From<MultiMessage> for Message {
    fn from(message: MultiMessage) -> Self {
        Self::Multi(message)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(m) => m.fmt(f),
            Self::File(m) => m.fmt(f),
            Self::Text(m) => m.fmt(f),
            Self::Multi(m) => m.fmt(f),
        }
    }
}
