//! Immutable byte buffers with an explicit logical length.

use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

static EMPTY: LazyLock<Arc<[u8]>> = LazyLock::new(|| Arc::from(Vec::new()));

/// An immutable view over a byte sequence plus a logical length.
///
/// The backing store may be larger than the logical content; equality and
/// hashing are defined over exactly the first [`len`](Self::len) bytes, so
/// two buffers with different backing capacity but identical logical content
/// are equal. The backing store is shared, making clones cheap, and is never
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    data: Arc<[u8]>,
    len: usize,
}

impl ByteBuffer {
    /// Creates a buffer whose logical length is the full backing sequence.
    #[must_use]
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        let data = data.into();
        let len = data.len();
        Self { data, len }
    }

    /// Creates a buffer with an explicit logical length.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the backing capacity. A violated invariant
    /// here is a programming error, not a recoverable condition.
    #[must_use]
    pub fn with_len(data: impl Into<Arc<[u8]>>, len: usize) -> Self {
        let data = data.into();
        assert!(len <= data.len(), "logical length {len} exceeds capacity {}", data.len());
        Self { data, len }
    }

    /// The shared empty buffer.
    #[must_use]
    pub fn empty() -> Self {
        Self { data: Arc::clone(&EMPTY), len: 0 }
    }

    /// The logical content, excluding any spare backing capacity.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The logical length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteBuffer {}

impl Hash for ByteBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
