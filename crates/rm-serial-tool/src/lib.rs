//! Host-side companion for the vision ↔ board serial packets
//!
//! The packet crate stops at the byte layout. This crate supplies
//! the pieces a transport needs around it, without opening a port:
//!
//! - the referee-system CRC-16 that fills and checks the trailing checksum
//! - a YAML configuration selecting the checksum and resync policy
//! - decode / encode / split operations used by the `rm-serial` binary

pub mod commands;
pub mod config;
pub mod crc;
pub mod error;

pub use commands::{decode_hex, encode_json, split_capture, SplitReport};
pub use config::ToolConfig;
pub use crc::{seal, verify, ChecksumAlgorithm, ChecksumKind, Crc16, NoChecksum};
pub use error::{ToolError, ToolResult};
