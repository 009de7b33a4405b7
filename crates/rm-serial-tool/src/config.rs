//! Tool configuration.
//!
//! Loaded from a YAML file when `--config` is given, defaults otherwise:
//!
//! ```yaml
//! checksum: crc16            # or `none`
//! resync_on_checksum_error: true
//! accept: [receive]          # header kinds that start a frame when splitting
//! ```

use std::path::Path;

use rm_serial_packet::PacketKind;
use serde::{Deserialize, Serialize};

use crate::crc::ChecksumKind;
use crate::error::ToolResult;

/// Configuration for decoding and encoding packets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Checksum routine used to seal and verify packets.
    pub checksum: ChecksumKind,
    /// When splitting a capture, treat a frame with a bad checksum as a false
    /// header and rescan inside it instead of reporting it.
    pub resync_on_checksum_error: bool,
    /// Packet kinds whose header starts a frame when splitting a capture.
    pub accept: Vec<PacketKind>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            checksum: ChecksumKind::Crc16,
            resync_on_checksum_error: true,
            accept: vec![PacketKind::Receive],
        }
    }
}

impl ToolConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(text: &str) -> ToolResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load the configuration file, or the defaults if no path is given.
    pub fn load(path: Option<&Path>) -> ToolResult<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                let config = Self::from_yaml(&text)?;
                tracing::debug!("loaded configuration from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}
