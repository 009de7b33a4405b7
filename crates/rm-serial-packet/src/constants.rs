//! Wire constants
//!
//! Header bytes, fixed packet sizes and the positions of the sub-byte fields
//! shared by the host and the controller board firmware.

use crate::bits::BitField;

// ============================================================================
// Header Bytes
// ============================================================================

/// Header of the telemetry packet sent by the board (board → host).
pub const RECEIVE_PACKET_HEADER: u8 = 0x5A;
/// Header of the target command packet (host → board).
pub const SEND_PACKET_HEADER: u8 = 0xA5;
/// Header of the velocity command packet (host → board).
pub const SEND_TWIST_PACKET_HEADER: u8 = 0xA4;

// ============================================================================
// Packet Sizes
// ============================================================================

/// Size of the trailing checksum field.
pub const CHECKSUM_SIZE: usize = 2;

/// header(1) + flags(1) + 6 x f32 + game_time(2) + timestamp(4) + checksum(2)
pub const RECEIVE_PACKET_SIZE: usize = 34;
/// header(1) + flags(1) + 11 x f32 + cap_timestamp(4) + t_offset(2) + checksum(2)
pub const SEND_PACKET_SIZE: usize = 54;
/// header(1) + 6 x f32 + checksum(2)
pub const SEND_TWIST_PACKET_SIZE: usize = 27;

/// Largest of the fixed packet sizes.
pub const MAX_PACKET_SIZE: usize = SEND_PACKET_SIZE;

// ============================================================================
// ReceivePacket flag byte (offset 1), LSB first
// ============================================================================

/// 0 = red, 1 = blue.
pub const DETECT_COLOR_BITS: BitField = BitField::new(0, 1);
/// 0 = auto, 1 = aim, 2 = buff.
pub const TASK_MODE_BITS: BitField = BitField::new(1, 2);
pub const RESET_TRACKER_BITS: BitField = BitField::new(3, 1);
pub const IS_PLAY_BITS: BitField = BitField::new(4, 1);
pub const CHANGE_TARGET_BITS: BitField = BitField::new(5, 1);
/// Unused by either side; carried through unchanged.
pub const RECEIVE_RESERVED_BITS: BitField = BitField::new(6, 2);

// ============================================================================
// SendPacket flag byte (offset 1), LSB first
// ============================================================================

/// 0 = untracking, 1 = tracking aim, 2 = tracking buff.
pub const TRACKING_STATE_BITS: BitField = BitField::new(0, 2);
/// Target identity (aim: 0 outpost, 6 guard, 7 base).
pub const TARGET_ID_BITS: BitField = BitField::new(2, 3);
/// Armor plate count class (2 balance, 3 outpost, 4 normal).
pub const ARMORS_NUM_BITS: BitField = BitField::new(5, 3);
