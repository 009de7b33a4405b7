//! Vision host ↔ controller board serial packets
//!
//! This crate defines the fixed-layout binary packets exchanged between the
//! vision/targeting host and the gimbal controller board, and the conversion
//! between those packets and raw bytes.
//!
//! # Protocol Overview
//!
//! Every packet is a fixed number of bytes, packed without padding, with all
//! multi-byte values little-endian:
//!
//! - **`ReceivePacket`** (board → host, header `0x5A`, 34 bytes): gimbal
//!   attitude, aim point, game state flags and board time
//! - **`SendPacket`** (host → board, header `0xA5`, 54 bytes): tracked target
//!   pose, velocity and armor geometry
//! - **`SendPacketTwist`** (host → board, header `0xA4`, 27 bytes): chassis
//!   velocity command
//!
//! The last two bytes of every packet are a checksum. Its algorithm belongs to
//! the transport: this crate only carries the field.
//!
//! # Example
//!
//! ```rust
//! use rm_serial_packet::{decode_receive_packet, encode_send_packet, SendPacket, TrackingState};
//!
//! let cmd = SendPacket {
//!     state: TrackingState::TrackingAim,
//!     armors_num: 4,
//!     x: 3.0,
//!     ..Default::default()
//! };
//! let bytes = encode_send_packet(&cmd);
//! assert_eq!(bytes.len(), 54);
//!
//! // A short read is reported, never decoded.
//! assert!(decode_receive_packet(&bytes[..20]).is_err());
//! ```

mod bits;
mod codec;
mod constants;
mod error;
mod packet;
mod stream;
mod types;

pub use bits::*;
pub use codec::*;
pub use constants::*;
pub use error::*;
pub use packet::*;
pub use stream::*;
pub use types::*;
