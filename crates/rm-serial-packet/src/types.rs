//! Enumerations carried inside packets.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// The three packet kinds on the link, identified by their header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    /// Board telemetry, `ReceivePacket`.
    Receive,
    /// Target command, `SendPacket`.
    Send,
    /// Velocity command, `SendPacketTwist`.
    Twist,
}

impl PacketKind {
    /// All kinds, in header-scan priority order.
    pub const ALL: [PacketKind; 3] = [PacketKind::Receive, PacketKind::Send, PacketKind::Twist];

    /// Identify a packet kind from its header byte.
    pub fn from_header(header: u8) -> Option<Self> {
        match header {
            RECEIVE_PACKET_HEADER => Some(PacketKind::Receive),
            SEND_PACKET_HEADER => Some(PacketKind::Send),
            SEND_TWIST_PACKET_HEADER => Some(PacketKind::Twist),
            _ => None,
        }
    }

    /// Header byte of this kind.
    pub const fn header(self) -> u8 {
        match self {
            PacketKind::Receive => RECEIVE_PACKET_HEADER,
            PacketKind::Send => SEND_PACKET_HEADER,
            PacketKind::Twist => SEND_TWIST_PACKET_HEADER,
        }
    }

    /// Fixed wire size of this kind, checksum included.
    pub const fn size(self) -> usize {
        match self {
            PacketKind::Receive => RECEIVE_PACKET_SIZE,
            PacketKind::Send => SEND_PACKET_SIZE,
            PacketKind::Twist => SEND_TWIST_PACKET_SIZE,
        }
    }
}

impl std::fmt::Display for PacketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketKind::Receive => write!(f, "receive"),
            PacketKind::Send => write!(f, "send"),
            PacketKind::Twist => write!(f, "twist"),
        }
    }
}

/// Enemy color the referee system assigned to detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectColor {
    #[default]
    Red,
    Blue,
}

impl From<u8> for DetectColor {
    fn from(bits: u8) -> Self {
        if bits & 1 == 0 {
            DetectColor::Red
        } else {
            DetectColor::Blue
        }
    }
}

impl From<DetectColor> for u8 {
    fn from(color: DetectColor) -> Self {
        match color {
            DetectColor::Red => 0,
            DetectColor::Blue => 1,
        }
    }
}

/// Task the gimbal operator selected on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    #[default]
    Auto,
    /// Armor aiming.
    Aim,
    /// Rune (buff) hitting.
    Buff,
    /// Raw value with no assigned meaning. Decoding only ever yields
    /// `Unknown(3)`, the one unassigned 2-bit value; an encoder writes the
    /// value masked to two bits, so `Unknown(1)` goes out as an assigned mode
    /// and `Unknown(9)` as 1.
    Unknown(u8),
}

impl From<u8> for TaskMode {
    fn from(bits: u8) -> Self {
        match bits {
            0 => TaskMode::Auto,
            1 => TaskMode::Aim,
            2 => TaskMode::Buff,
            other => TaskMode::Unknown(other),
        }
    }
}

impl From<TaskMode> for u8 {
    fn from(mode: TaskMode) -> Self {
        match mode {
            TaskMode::Auto => 0,
            TaskMode::Aim => 1,
            TaskMode::Buff => 2,
            TaskMode::Unknown(bits) => bits,
        }
    }
}

/// Tracker state reported to the board with every target command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    #[default]
    Untracking,
    TrackingAim,
    TrackingBuff,
    /// Raw value with no assigned meaning, under the same rules as
    /// [`TaskMode::Unknown`].
    Unknown(u8),
}

impl From<u8> for TrackingState {
    fn from(bits: u8) -> Self {
        match bits {
            0 => TrackingState::Untracking,
            1 => TrackingState::TrackingAim,
            2 => TrackingState::TrackingBuff,
            other => TrackingState::Unknown(other),
        }
    }
}

impl From<TrackingState> for u8 {
    fn from(state: TrackingState) -> Self {
        match state {
            TrackingState::Untracking => 0,
            TrackingState::TrackingAim => 1,
            TrackingState::TrackingBuff => 2,
            TrackingState::Unknown(bits) => bits,
        }
    }
}
