//! Missive Core
//!
//! This crate provides the message envelope types and wire codecs shared by
//! the missive messaging stack: a closed set of message kinds (raw bytes,
//! UTF-8 text, filesystem-backed payloads, and recursive composites), each
//! serializable to and from two wire formats with byte-exact round-tripping.
//!
//! # Overview
//!
//! - **Buffers**: [`ByteBuffer`], an immutable shared byte view with a
//!   logical length
//! - **Kinds**: [`MessageKind`], the stable wire discriminators
//! - **Messages**: [`Message`] and the four variants ([`BytesMessage`],
//!   [`TextMessage`], [`FileMessage`], [`MultiMessage`])
//! - **Temp files**: [`TempFileProvider`], the capability decoded
//!   file-backed payloads are provisioned through
//!
//! Transport concerns (sockets, listeners, connection lifecycles) are out of
//! scope: this crate has no outbound dependency on any transport layer.
//!
//! # Example
//!
//! ```
//! use missive_core::{BytesMessage, Message, MessageKind, MultiMessage, NoTempFiles, TextMessage};
//!
//! # fn main() -> missive_core::Result<()> {
//! let envelope = Message::Multi(MultiMessage::new(vec![
//!     Message::Bytes(BytesMessage::new(vec![0xDE, 0xAD])),
//!     Message::Text(TextMessage::new("hi")),
//! ]));
//!
//! // Encode for transmission; both forms are repeatable and non-destructive.
//! let text = envelope.encode_as_text()?;
//! let binary = envelope.encode_as_bytes()?;
//!
//! // Decode back; no file-backed payloads here, so no temp files are needed.
//! let decoded = Message::decode_binary(MessageKind::Multi, binary, &NoTempFiles)?;
//! assert!(envelope.content_eq(&decoded)?);
//!
//! decoded.release()?;
//! envelope.release()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`buffer`] - Immutable byte buffers
//! - [`kind`] - Wire discriminators
//! - [`message`] - Message variants and codecs
//! - [`temp`] - Temporary-file provisioning
//! - [`error`] - Error types ([`Error`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod buffer;
pub mod error;
pub mod kind;
pub mod message;
pub mod temp;

// Re-export commonly used types
pub use buffer::ByteBuffer;
pub use error::{Error, Result};
pub use kind::MessageKind;
pub use message::{BytesMessage, FileMessage, Message, MultiMessage, TextMessage};
pub use temp::{NoTempFiles, TempDirProvider, TempFileProvider};
