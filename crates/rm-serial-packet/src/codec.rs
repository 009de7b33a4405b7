//! Packet encoding and decoding.
//!
//! Every packet is serialized field by field, little-endian, with no padding.
//! The flag byte at offset 1 of the receive and send packets is packed with the
//! [`BitField`](crate::bits::BitField) constants from [`crate::constants`].
//!
//! ## ReceivePacket (34 bytes)
//!
//! | Offset | Size | Field                                              |
//! |--------|------|----------------------------------------------------|
//! | 0      | 1    | header (`0x5A`)                                    |
//! | 1      | 1    | color:1, mode:2, reset:1, play:1, change:1, rsv:2  |
//! | 2      | 24   | roll, pitch, yaw, aim_x, aim_y, aim_z (f32)        |
//! | 26     | 2    | game_time (u16)                                    |
//! | 28     | 4    | timestamp (u32)                                    |
//! | 32     | 2    | checksum (u16)                                     |
//!
//! ## SendPacket (54 bytes)
//!
//! | Offset | Size | Field                                              |
//! |--------|------|----------------------------------------------------|
//! | 0      | 1    | header (`0xA5`)                                    |
//! | 1      | 1    | state:2, id:3, armors_num:3                        |
//! | 2      | 44   | x, y, z, yaw, vx, vy, vz, v_yaw, r1, r2, dz (f32)  |
//! | 46     | 4    | cap_timestamp (u32)                                |
//! | 50     | 2    | t_offset (u16)                                     |
//! | 52     | 2    | checksum (u16)                                     |
//!
//! ## SendPacketTwist (27 bytes)
//!
//! | Offset | Size | Field                                              |
//! |--------|------|----------------------------------------------------|
//! | 0      | 1    | header (`0xA4`)                                    |
//! | 1      | 24   | linear_x/y/z, angular_x/y/z (f32)                  |
//! | 25     | 2    | checksum (u16)                                     |

use bytes::{Buf, BufMut};

use crate::{
    constants::*, AnyPacket, PacketError, PacketKind, ReceivePacket, SendPacket, SendPacketTwist,
};

/// A packet with a fixed wire layout.
pub trait WirePacket: Sized {
    /// Kind identifying the header and size of this packet.
    const KIND: PacketKind;

    /// Serialize to exactly `Self::KIND.size()` bytes.
    fn encode(&self) -> Vec<u8>;

    /// Deserialize from exactly `Self::KIND.size()` bytes.
    ///
    /// The header byte is copied as received and field values are not range
    /// checked.
    fn decode(data: &[u8]) -> Result<Self, PacketError>;

    /// Like [`WirePacket::decode`], but also rejects a header byte other than
    /// the kind's constant.
    fn decode_checked(data: &[u8]) -> Result<Self, PacketError> {
        check_header(Self::KIND, data)?;
        Self::decode(data)
    }
}

// ============================================================================
// Public Entry Points
// ============================================================================

/// Decode board telemetry.
pub fn decode_receive_packet(data: &[u8]) -> Result<ReceivePacket, PacketError> {
    check_len(PacketKind::Receive, data)?;
    let mut buf = data;

    let header = buf.get_u8();
    let flags = buf.get_u8();

    Ok(ReceivePacket {
        header,
        detect_color: DETECT_COLOR_BITS.get(flags).into(),
        task_mode: TASK_MODE_BITS.get(flags).into(),
        reset_tracker: RESET_TRACKER_BITS.get_flag(flags),
        is_play: IS_PLAY_BITS.get_flag(flags),
        change_target: CHANGE_TARGET_BITS.get_flag(flags),
        reserved: RECEIVE_RESERVED_BITS.get(flags),
        roll: buf.get_f32_le(),
        pitch: buf.get_f32_le(),
        yaw: buf.get_f32_le(),
        aim_x: buf.get_f32_le(),
        aim_y: buf.get_f32_le(),
        aim_z: buf.get_f32_le(),
        game_time: buf.get_u16_le(),
        timestamp: buf.get_u32_le(),
        checksum: buf.get_u16_le(),
    })
}

/// Encode a target command.
pub fn encode_send_packet(packet: &SendPacket) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SEND_PACKET_SIZE);

    buf.put_u8(packet.header);
    buf.put_u8(send_flags(packet));

    for value in [
        packet.x,
        packet.y,
        packet.z,
        packet.yaw,
        packet.vx,
        packet.vy,
        packet.vz,
        packet.v_yaw,
        packet.r1,
        packet.r2,
        packet.dz,
    ] {
        buf.put_f32_le(value);
    }

    buf.put_u32_le(packet.cap_timestamp);
    buf.put_u16_le(packet.t_offset);
    buf.put_u16_le(packet.checksum);

    debug_assert_eq!(buf.len(), SEND_PACKET_SIZE);
    buf
}

/// Encode a velocity command.
pub fn encode_twist_packet(packet: &SendPacketTwist) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SEND_TWIST_PACKET_SIZE);

    buf.put_u8(packet.header);
    for value in [
        packet.linear_x,
        packet.linear_y,
        packet.linear_z,
        packet.angular_x,
        packet.angular_y,
        packet.angular_z,
    ] {
        buf.put_f32_le(value);
    }
    buf.put_u16_le(packet.checksum);

    debug_assert_eq!(buf.len(), SEND_TWIST_PACKET_SIZE);
    buf
}

// ============================================================================
// Board-Side Counterparts
// ============================================================================

/// Encode board telemetry, as the board firmware would.
pub fn encode_receive_packet(packet: &ReceivePacket) -> Vec<u8> {
    let mut buf = Vec::with_capacity(RECEIVE_PACKET_SIZE);

    buf.put_u8(packet.header);
    buf.put_u8(receive_flags(packet));
    for value in [
        packet.roll,
        packet.pitch,
        packet.yaw,
        packet.aim_x,
        packet.aim_y,
        packet.aim_z,
    ] {
        buf.put_f32_le(value);
    }
    buf.put_u16_le(packet.game_time);
    buf.put_u32_le(packet.timestamp);
    buf.put_u16_le(packet.checksum);

    debug_assert_eq!(buf.len(), RECEIVE_PACKET_SIZE);
    buf
}

/// Decode a target command, as the board firmware would.
pub fn decode_send_packet(data: &[u8]) -> Result<SendPacket, PacketError> {
    check_len(PacketKind::Send, data)?;
    let mut buf = data;

    let header = buf.get_u8();
    let flags = buf.get_u8();

    Ok(SendPacket {
        header,
        state: TRACKING_STATE_BITS.get(flags).into(),
        id: TARGET_ID_BITS.get(flags),
        armors_num: ARMORS_NUM_BITS.get(flags),
        x: buf.get_f32_le(),
        y: buf.get_f32_le(),
        z: buf.get_f32_le(),
        yaw: buf.get_f32_le(),
        vx: buf.get_f32_le(),
        vy: buf.get_f32_le(),
        vz: buf.get_f32_le(),
        v_yaw: buf.get_f32_le(),
        r1: buf.get_f32_le(),
        r2: buf.get_f32_le(),
        dz: buf.get_f32_le(),
        cap_timestamp: buf.get_u32_le(),
        t_offset: buf.get_u16_le(),
        checksum: buf.get_u16_le(),
    })
}

/// Decode a velocity command, as the board firmware would.
pub fn decode_twist_packet(data: &[u8]) -> Result<SendPacketTwist, PacketError> {
    check_len(PacketKind::Twist, data)?;
    let mut buf = data;

    Ok(SendPacketTwist {
        header: buf.get_u8(),
        linear_x: buf.get_f32_le(),
        linear_y: buf.get_f32_le(),
        linear_z: buf.get_f32_le(),
        angular_x: buf.get_f32_le(),
        angular_y: buf.get_f32_le(),
        angular_z: buf.get_f32_le(),
        checksum: buf.get_u16_le(),
    })
}

/// Decode whichever packet the header byte announces.
pub fn decode_any(data: &[u8]) -> Result<AnyPacket, PacketError> {
    let header = *data.first().ok_or(PacketError::Empty)?;
    let kind = PacketKind::from_header(header).ok_or(PacketError::UnknownHeader(header))?;

    match kind {
        PacketKind::Receive => decode_receive_packet(data).map(AnyPacket::Receive),
        PacketKind::Send => decode_send_packet(data).map(AnyPacket::Send),
        PacketKind::Twist => decode_twist_packet(data).map(AnyPacket::Twist),
    }
}

/// Encode whichever packet is wrapped.
pub fn encode_any(packet: &AnyPacket) -> Vec<u8> {
    match packet {
        AnyPacket::Receive(p) => encode_receive_packet(p),
        AnyPacket::Send(p) => encode_send_packet(p),
        AnyPacket::Twist(p) => encode_twist_packet(p),
    }
}

impl WirePacket for ReceivePacket {
    const KIND: PacketKind = PacketKind::Receive;

    fn encode(&self) -> Vec<u8> {
        encode_receive_packet(self)
    }

    fn decode(data: &[u8]) -> Result<Self, PacketError> {
        decode_receive_packet(data)
    }
}

impl WirePacket for SendPacket {
    const KIND: PacketKind = PacketKind::Send;

    fn encode(&self) -> Vec<u8> {
        encode_send_packet(self)
    }

    fn decode(data: &[u8]) -> Result<Self, PacketError> {
        decode_send_packet(data)
    }
}

impl WirePacket for SendPacketTwist {
    const KIND: PacketKind = PacketKind::Twist;

    fn encode(&self) -> Vec<u8> {
        encode_twist_packet(self)
    }

    fn decode(data: &[u8]) -> Result<Self, PacketError> {
        decode_twist_packet(data)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn check_len(kind: PacketKind, data: &[u8]) -> Result<(), PacketError> {
    if data.len() != kind.size() {
        log::trace!("rejecting {} bytes as {} packet", data.len(), kind);
        return Err(PacketError::layout_mismatch(kind, data.len()));
    }
    Ok(())
}

fn check_header(kind: PacketKind, data: &[u8]) -> Result<(), PacketError> {
    let actual = *data.first().ok_or(PacketError::Empty)?;
    if actual != kind.header() {
        return Err(PacketError::HeaderMismatch {
            kind,
            expected: kind.header(),
            actual,
        });
    }
    Ok(())
}

fn receive_flags(packet: &ReceivePacket) -> u8 {
    let mut flags = 0;
    flags = DETECT_COLOR_BITS.set(flags, packet.detect_color.into());
    flags = TASK_MODE_BITS.set(flags, packet.task_mode.into());
    flags = RESET_TRACKER_BITS.set_flag(flags, packet.reset_tracker);
    flags = IS_PLAY_BITS.set_flag(flags, packet.is_play);
    flags = CHANGE_TARGET_BITS.set_flag(flags, packet.change_target);
    RECEIVE_RESERVED_BITS.set(flags, packet.reserved)
}

fn send_flags(packet: &SendPacket) -> u8 {
    let mut flags = 0;
    flags = TRACKING_STATE_BITS.set(flags, packet.state.into());
    flags = TARGET_ID_BITS.set(flags, packet.id);
    ARMORS_NUM_BITS.set(flags, packet.armors_num)
}

// ============================================================================
// Tests
// ============================================================================
