//! Wire discriminators for the closed set of message kinds.

use crate::error::{Error, Result};

/// Identifies which of the four payload kinds a message is.
///
/// Each kind has a stable one-byte code used by the binary wire format and a
/// stable one-character code used by the textual wire format:
///
/// | Kind | byte | char |
/// |------|------|------|
/// | `Bytes` | 0 | `'b'` |
/// | `File` | 1 | `'f'` |
/// | `Text` | 2 | `'s'` |
/// | `Multi` | 3 | `'m'` |
///
/// The codes are part of the wire format and must never be renumbered.
/// Decode dispatch lives in [`Message`](crate::Message); the kind itself
/// carries no behavior beyond the code mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Raw bytes.
    Bytes,
    /// Filesystem-backed payload.
    File,
    /// UTF-8 text.
    Text,
    /// Ordered composite of other messages.
    Multi,
}

impl MessageKind {
    /// The one-byte code used by the binary wire format.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Bytes => 0,
            Self::File => 1,
            Self::Text => 2,
            Self::Multi => 3,
        }
    }

    /// The one-character code used by the textual wire format.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Bytes => 'b',
            Self::File => 'f',
            Self::Text => 's',
            Self::Multi => 'm',
        }
    }

    /// Looks up the kind for a binary wire code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKindByte`] for any code outside `0..=3`.
    /// Unknown codes are never mapped to a kind.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Bytes),
            1 => Ok(Self::File),
            2 => Ok(Self::Text),
            3 => Ok(Self::Multi),
            other => Err(Error::InvalidKindByte(other)),
        }
    }

    /// Looks up the kind for a textual wire code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKindChar`] for any character outside
    /// `{'b', 'f', 's', 'm'}`.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'b' => Ok(Self::Bytes),
            'f' => Ok(Self::File),
            's' => Ok(Self::Text),
            'm' => Ok(Self::Multi),
            other => Err(Error::InvalidKindChar(other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [MessageKind; 4] =
        [MessageKind::Bytes, MessageKind::File, MessageKind::Text, MessageKind::Multi];

    #[test]
    fn byte_codes_round_trip() {
        for kind in ALL {
            assert_eq!(MessageKind::from_code(kind.code()).unwrap(), kind);
        }
    }

    #[test]
    fn char_codes_round_trip() {
        for kind in ALL {
            assert_eq!(MessageKind::from_char(kind.as_char()).unwrap(), kind);
        }
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(MessageKind::Bytes.code(), 0);
        assert_eq!(MessageKind::File.code(), 1);
        assert_eq!(MessageKind::Text.code(), 2);
        assert_eq!(MessageKind::Multi.code(), 3);
        assert_eq!(MessageKind::Bytes.as_char(), 'b');
        assert_eq!(MessageKind::File.as_char(), 'f');
        assert_eq!(MessageKind::Text.as_char(), 's');
        assert_eq!(MessageKind::Multi.as_char(), 'm');
    }

    #[test]
    fn unknown_byte_code_is_rejected() {
        assert!(matches!(MessageKind::from_code(4), Err(Error::InvalidKindByte(4))));
        assert!(matches!(MessageKind::from_code(0xFF), Err(Error::InvalidKindByte(0xFF))));
    }

    #[test]
    fn unknown_char_code_is_rejected() {
        assert!(matches!(MessageKind::from_char('x'), Err(Error::InvalidKindChar('x'))));
        assert!(matches!(MessageKind::from_char('B'), Err(Error::InvalidKindChar('B'))));
    }
}
