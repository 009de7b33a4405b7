//! Error types for the tool.

use rm_serial_packet::PacketError;
use thiserror::Error;

/// Errors that can occur while inspecting or building packets.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The packet layer rejected the bytes.
    #[error(transparent)]
    Packet(#[from] PacketError),

    /// Trailing checksum does not match the bytes before it.
    #[error("checksum invalid: computed 0x{expected:04X}, packet carries 0x{actual:04X}")]
    ChecksumInvalid {
        /// Value computed over the packet body.
        expected: u16,
        /// Value found in the checksum field.
        actual: u16,
    },

    /// Input was not valid hex.
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Packet JSON could not be read or written.
    #[error("invalid packet JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
