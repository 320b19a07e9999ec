//! Temporary-file provisioning for decoded file messages.

use std::fs::File;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

/// Supplies fresh writable files for decoded file-backed payloads.
///
/// Decoding a [`File`](crate::MessageKind::File) message (directly, or inside
/// a composite) needs somewhere to put the payload. Implementations hand out
/// a fresh, uniquely-named, writable file on each call; ownership of the
/// path transfers to the codec, which deletes the file when the resulting
/// message is released.
///
/// The provider is invoked lazily: at most once per file-backed value being
/// decoded, and never for in-memory kinds.
pub trait TempFileProvider {
    /// Creates a fresh writable file and returns the open handle with its path.
    ///
    /// # Errors
    ///
    /// Returns a resource or configuration error when no file can be
    /// supplied.
    fn create_temp_file(&self) -> Result<(File, PathBuf)>;
}

/// A [`TempFileProvider`] backed by a private temporary directory.
///
/// Each call creates a uniquely-named file inside the directory. Files handed
/// out here are deleted individually when their messages are released; the
/// directory itself (and anything left in it) is removed when the provider is
/// dropped.
#[derive(Debug)]
pub struct TempDirProvider {
    dir: tempfile::TempDir,
}

impl TempDirProvider {
    /// Creates a provider with a fresh private directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self { dir: tempfile::tempdir()? })
    }

    /// The directory the provider hands files out of.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

impl TempFileProvider for TempDirProvider {
    fn create_temp_file(&self) -> Result<(File, PathBuf)> {
        let named = tempfile::Builder::new().prefix("missive_").tempfile_in(self.dir.path())?;
        // Disarm the handle's drop-time deletion: the message owns the path now.
        let (file, path) = named.keep().map_err(|e| Error::Io(e.error))?;
        debug!(path = %path.display(), "created temp file for decoded message");
        Ok((file, path))
    }
}

/// A provider for callers that only ever decode in-memory kinds.
///
/// Every call fails with [`Error::TempFilesUnavailable`]; decoding a
/// file-backed payload through this provider is a configuration error. There
/// is deliberately no fallback to unmanaged process-lifetime temp files.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTempFiles;

impl TempFileProvider for NoTempFiles {
    fn create_temp_file(&self) -> Result<(File, PathBuf)> {
        Err(Error::TempFilesUnavailable)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn temp_dir_provider_hands_out_distinct_writable_files() {
        let provider = TempDirProvider::new().unwrap();
        let (mut f1, p1) = provider.create_temp_file().unwrap();
        let (mut f2, p2) = provider.create_temp_file().unwrap();
        assert_ne!(p1, p2);
        f1.write_all(b"one").unwrap();
        f2.write_all(b"two").unwrap();
        assert_eq!(std::fs::read(&p1).unwrap(), b"one");
        assert_eq!(std::fs::read(&p2).unwrap(), b"two");
    }

    #[test]
    fn files_survive_handle_drop() {
        let provider = TempDirProvider::new().unwrap();
        let path = {
            let (mut file, path) = provider.create_temp_file().unwrap();
            file.write_all(b"payload").unwrap();
            path
        };
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn no_temp_files_always_fails() {
        assert!(matches!(
            NoTempFiles.create_temp_file(),
            Err(Error::TempFilesUnavailable)
        ));
    }
}
