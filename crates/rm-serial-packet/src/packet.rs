//! Packet layouts.
//!
//! Each struct mirrors one packed struct of the board firmware, field for
//! field and in wire order. The byte layout itself lives in [`crate::codec`].

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::*;

/// Gimbal telemetry sent by the board (board → host), 34 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceivePacket {
    /// Always [`RECEIVE_PACKET_HEADER`] on a well-formed link. Decoding copies
    /// whatever byte was received.
    pub header: u8,
    pub detect_color: DetectColor,
    pub task_mode: TaskMode,
    pub reset_tracker: bool,
    pub is_play: bool,
    pub change_target: bool,
    /// Two spare bits at the top of the flag byte.
    pub reserved: u8,
    /// Current gimbal roll in the world frame (rad).
    pub roll: f32,
    /// Current gimbal pitch in the world frame (rad).
    pub pitch: f32,
    /// Current gimbal yaw in the world frame (rad).
    pub yaw: f32,
    pub aim_x: f32,
    pub aim_y: f32,
    pub aim_z: f32,
    /// Game time in seconds, nominally within [0, 450].
    pub game_time: u16,
    /// Board clock (ms).
    pub timestamp: u32,
    pub checksum: u16,
}

impl Default for ReceivePacket {
    fn default() -> Self {
        ReceivePacket {
            header: RECEIVE_PACKET_HEADER,
            detect_color: DetectColor::Red,
            task_mode: TaskMode::Auto,
            reset_tracker: false,
            is_play: false,
            change_target: false,
            reserved: 0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            aim_x: 0.0,
            aim_y: 0.0,
            aim_z: 0.0,
            game_time: 0,
            timestamp: 0,
            checksum: 0,
        }
    }
}

/// Target state sent to the board (host → board), 54 bytes on the wire.
///
/// In aim mode the pose fields describe the robot center; in buff mode they
/// describe the rune, with `yaw` holding the rune angle and `vx`, `vy`, `vz`
/// holding `a`, `b`, `w` of the spin speed model `spd = a*sin(w*t)+b`
/// (positive is clockwise).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendPacket {
    pub header: u8,
    /// Two bits on the wire.
    pub state: TrackingState,
    /// Target identity, three bits (aim: 0 outpost, 6 guard, 7 base).
    pub id: u8,
    /// Armor plate count class, three bits (2 balance, 3 outpost, 4 normal).
    pub armors_num: u8,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub v_yaw: f32,
    /// Radius of one armor pair around the target center.
    pub r1: f32,
    /// Radius of the other armor pair.
    pub r2: f32,
    /// Height of the previously tracked armor relative to the current one.
    pub dz: f32,
    /// Frame capture time (ms).
    pub cap_timestamp: u32,
    /// Prediction time offset for the speed model (ms).
    pub t_offset: u16,
    pub checksum: u16,
}

impl Default for SendPacket {
    fn default() -> Self {
        SendPacket {
            header: SEND_PACKET_HEADER,
            state: TrackingState::Untracking,
            id: 0,
            armors_num: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            yaw: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            v_yaw: 0.0,
            r1: 0.0,
            r2: 0.0,
            dz: 0.0,
            cap_timestamp: 0,
            t_offset: 0,
            checksum: 0,
        }
    }
}

/// Chassis velocity command (host → board), 27 bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendPacketTwist {
    pub header: u8,
    pub linear_x: f32,
    pub linear_y: f32,
    pub linear_z: f32,
    pub angular_x: f32,
    pub angular_y: f32,
    pub angular_z: f32,
    pub checksum: u16,
}

impl SendPacketTwist {
    /// Build a twist command from linear and angular velocity vectors.
    pub fn new(linear: [f32; 3], angular: [f32; 3]) -> Self {
        SendPacketTwist {
            linear_x: linear[0],
            linear_y: linear[1],
            linear_z: linear[2],
            angular_x: angular[0],
            angular_y: angular[1],
            angular_z: angular[2],
            ..Default::default()
        }
    }
}

impl Default for SendPacketTwist {
    fn default() -> Self {
        SendPacketTwist {
            header: SEND_TWIST_PACKET_HEADER,
            linear_x: 0.0,
            linear_y: 0.0,
            linear_z: 0.0,
            angular_x: 0.0,
            angular_y: 0.0,
            angular_z: 0.0,
            checksum: 0,
        }
    }
}

/// Any of the three packets, as produced by [`crate::decode_any`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyPacket {
    Receive(ReceivePacket),
    Send(SendPacket),
    Twist(SendPacketTwist),
}

impl AnyPacket {
    /// Kind of the wrapped packet.
    pub fn kind(&self) -> PacketKind {
        match self {
            AnyPacket::Receive(_) => PacketKind::Receive,
            AnyPacket::Send(_) => PacketKind::Send,
            AnyPacket::Twist(_) => PacketKind::Twist,
        }
    }

    /// Trailing checksum field of the wrapped packet.
    pub fn checksum(&self) -> u16 {
        match self {
            AnyPacket::Receive(p) => p.checksum,
            AnyPacket::Send(p) => p.checksum,
            AnyPacket::Twist(p) => p.checksum,
        }
    }
}

impl From<ReceivePacket> for AnyPacket {
    fn from(packet: ReceivePacket) -> Self {
        AnyPacket::Receive(packet)
    }
}

impl From<SendPacket> for AnyPacket {
    fn from(packet: SendPacket) -> Self {
        AnyPacket::Send(packet)
    }
}

impl From<SendPacketTwist> for AnyPacket {
    fn from(packet: SendPacketTwist) -> Self {
        AnyPacket::Twist(packet)
    }
}
