//! Packet error types.

use thiserror::Error;

use crate::types::PacketKind;

/// Errors that can occur when decoding packets.
///
/// Encoding has no failure path: every field of a fixed-layout packet has a
/// byte representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// Input length differs from the fixed size of the target packet.
    #[error("{kind} packet layout mismatch: expected {expected} bytes, got {actual}")]
    LayoutMismatch {
        /// Packet kind being decoded.
        kind: PacketKind,
        /// Fixed size of that kind.
        expected: usize,
        /// Length of the input.
        actual: usize,
    },

    /// First byte is not one of the known header bytes.
    #[error("unknown packet header: 0x{0:02X}")]
    UnknownHeader(u8),

    /// First byte differs from the header of the requested kind.
    #[error("{kind} packet header mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    HeaderMismatch {
        /// Packet kind being decoded.
        kind: PacketKind,
        /// Header constant of that kind.
        expected: u8,
        /// Header byte found in the input.
        actual: u8,
    },

    /// Input is empty.
    #[error("empty packet data")]
    Empty,
}

impl PacketError {
    /// Create a layout mismatch error for `kind`.
    pub fn layout_mismatch(kind: PacketKind, actual: usize) -> Self {
        PacketError::LayoutMismatch {
            kind,
            expected: kind.size(),
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PacketError::layout_mismatch(PacketKind::Receive, 28);
        let text = err.to_string();
        assert!(text.contains("expected 34"));
        assert!(text.contains("got 28"));

        let err = PacketError::UnknownHeader(0x11);
        assert_eq!(err.to_string(), "unknown packet header: 0x11");
    }
}
