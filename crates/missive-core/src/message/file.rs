//! The filesystem-backed message variant.

use std::fmt;
use std::fs::{self, File};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::buffer::ByteBuffer;
use crate::error::{Error, Result};
use crate::kind::MessageKind;
use crate::temp::TempFileProvider;

/// Capacity hint when the file length is unknown or exceeds addressable size.
const DEFAULT_READ_CAPACITY: usize = 32;

/// Lifecycle of the backing file.
#[derive(Debug)]
enum FileState {
    /// The message points at a readable file.
    Active(PathBuf),
    /// The temporary backing file has been deleted.
    Released,
}

/// A message whose content lives in a file rather than memory.
///
/// Two lifecycle modes exist. A caller-constructed message
/// ([`FileMessage::new`]) borrows a file the caller owns; releasing it leaves
/// the file alone and the message stays usable. A decode-constructed message
/// wraps a temporary file obtained from the [`TempFileProvider`], which the
/// codec owns exclusively: the first [`release`](Self::release) deletes the
/// file, and any further operation on the message fails with
/// [`Error::Released`].
///
/// Equality and hashing are defined over the file's *content*, not its path,
/// so they read the file in full and propagate I/O failures.
#[derive(Debug)]
pub struct FileMessage {
    temporary: bool,
    state: Mutex<FileState>,
}

impl FileMessage {
    /// Creates a message over a caller-owned file.
    ///
    /// The caller retains ownership: releasing the message does not delete
    /// the file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { temporary: false, state: Mutex::new(FileState::Active(path.into())) }
    }

    /// Base64-decodes the textual wire form into a fresh temporary file.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error for invalid base64, or a resource
    /// error if the provider or the write fails.
    pub(crate) fn decode_text(encoded: &str, temp: &dyn TempFileProvider) -> Result<Self> {
        let payload =
            if encoded.is_empty() { Vec::new() } else { STANDARD.decode(encoded)? };
        Self::decode_payload(&payload, temp)
    }

    /// Writes the binary wire form into a fresh temporary file.
    ///
    /// # Errors
    ///
    /// Returns a resource error if the provider or the write fails.
    pub(crate) fn decode_binary(encoded: &ByteBuffer, temp: &dyn TempFileProvider) -> Result<Self> {
        Self::decode_payload(encoded.as_slice(), temp)
    }

    fn decode_payload(payload: &[u8], temp: &dyn TempFileProvider) -> Result<Self> {
        let (mut file, path) = temp.create_temp_file()?;
        file.write_all(payload)?;
        Ok(Self { temporary: true, state: Mutex::new(FileState::Active(path)) })
    }

    /// Whether the codec owns the backing file and will delete it on release.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// The path of the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Released`] once a temporary message has been
    /// released.
    pub fn path(&self) -> Result<PathBuf> {
        match &*self.lock() {
            FileState::Active(path) => Ok(path.clone()),
            FileState::Released => Err(Error::Released),
        }
    }

    /// The kind discriminator for this variant.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        MessageKind::File
    }

    /// Base64-encodes the file content; an empty file encodes to the empty
    /// string.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`Error::Released`] after release.
    pub fn encode_as_text(&self) -> Result<String> {
        let content = self.encode_as_bytes()?;
        if content.is_empty() {
            return Ok(String::new());
        }
        Ok(STANDARD.encode(content.as_slice()))
    }

    /// Reads the full file content.
    ///
    /// The read buffer is sized from the file's reported length, falling
    /// back to a small default when the length is unknown or exceeds
    /// addressable size.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`Error::Released`] after release.
    pub fn encode_as_bytes(&self) -> Result<ByteBuffer> {
        let state = self.lock();
        let path = match &*state {
            FileState::Active(path) => path,
            FileState::Released => return Err(Error::Released),
        };
        let mut file = File::open(path)?;
        let capacity = usize::try_from(file.metadata()?.len())
            .ok()
            .filter(|&len| len > 0)
            .unwrap_or(DEFAULT_READ_CAPACITY);
        let mut content = Vec::with_capacity(capacity);
        file.read_to_end(&mut content)?;
        Ok(ByteBuffer::from(content))
    }

    /// Compares the file contents of two messages.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures; an unreadable file is an error, never
    /// "not equal".
    pub fn content_eq(&self, other: &Self) -> Result<bool> {
        let ours = self.encode_as_bytes()?;
        let theirs = other.encode_as_bytes()?;
        Ok(ours == theirs)
    }

    /// Hashes the file content, consistent with [`content_eq`](Self::content_eq).
    ///
    /// # Errors
    ///
    /// Propagates I/O failures.
    pub fn content_hash(&self) -> Result<u64> {
        let content = self.encode_as_bytes()?;
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Ok(hasher.finish())
    }

    /// Releases the backing file.
    ///
    /// For a temporary message the first call deletes the file and
    /// transitions to the released state; concurrent or repeated calls
    /// observe that state and are error-free no-ops. For a caller-owned
    /// message this does nothing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the deletion fails; the message then remains
    /// active so the release can be retried.
    pub fn release(&self) -> Result<()> {
        if !self.temporary {
            return Ok(());
        }
        let mut state = self.lock();
        match std::mem::replace(&mut *state, FileState::Released) {
            FileState::Active(path) => {
                if let Err(e) = fs::remove_file(&path) {
                    // Deletion failed; stay active so the release can be retried.
                    *state = FileState::Active(path);
                    return Err(e.into());
                }
                debug!(path = %path.display(), "deleted temp file on release");
                Ok(())
            }
            FileState::Released => Ok(()),
        }
    }

    /// A poisoned lock still holds a consistent state; recover the guard.
    fn lock(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for FileMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.lock() {
            FileState::Active(path) => write!(f, "FileMessage(\"{}\")", path.display()),
            FileState::Released => write!(f, "FileMessage(released)"),
        }
    }
}
