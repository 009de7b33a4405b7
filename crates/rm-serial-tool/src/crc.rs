//! Packet checksums.
//!
//! The packet layer only reserves the trailing two bytes; the routine that
//! fills them is chosen here, per header byte. The board firmware uses the
//! referee-system CRC-16 (CRC-16/MCRF4XX: polynomial 0x1021 reflected, initial
//! value 0xFFFF, no final XOR), stored little-endian and computed over every
//! byte before the checksum field.

use rm_serial_packet::{PacketError, PacketKind, CHECKSUM_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{ToolError, ToolResult};

/// A checksum routine, keyed by the packet's header byte.
pub trait ChecksumAlgorithm {
    /// Compute the checksum of `body` (every byte before the checksum field).
    fn compute(&self, header: u8, body: &[u8]) -> u16;

    /// Whether [`verify`] compares the stored checksum against [`compute`].
    ///
    /// [`compute`]: ChecksumAlgorithm::compute
    fn checks(&self) -> bool {
        true
    }
}

impl<F> ChecksumAlgorithm for F
where
    F: Fn(u8, &[u8]) -> u16,
{
    fn compute(&self, header: u8, body: &[u8]) -> u16 {
        self(header, body)
    }
}

/// Referee-system CRC-16 used by the board firmware.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc16;

const CRC16_INIT: u16 = 0xFFFF;
const CRC16_POLY_REFLECTED: u16 = 0x8408;

const CRC16_TABLE: [u16; 256] = build_table();

const fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC16_POLY_REFLECTED
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

impl Crc16 {
    /// CRC of `data` with the standard initial value.
    pub fn checksum(data: &[u8]) -> u16 {
        data.iter().fold(CRC16_INIT, |crc, &byte| {
            (crc >> 8) ^ CRC16_TABLE[((crc ^ byte as u16) & 0xFF) as usize]
        })
    }
}

impl ChecksumAlgorithm for Crc16 {
    fn compute(&self, _header: u8, body: &[u8]) -> u16 {
        Crc16::checksum(body)
    }
}

/// Seals the checksum field as zero and accepts any stored checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChecksum;

impl ChecksumAlgorithm for NoChecksum {
    fn compute(&self, _header: u8, _body: &[u8]) -> u16 {
        0
    }

    fn checks(&self) -> bool {
        false
    }
}

/// Checksum selection from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumKind {
    /// Referee-system CRC-16.
    #[default]
    Crc16,
    /// No checksum: sealing writes zero, verification always passes.
    None,
}

impl ChecksumKind {
    /// The routine this selection stands for.
    pub fn algorithm(self) -> &'static dyn ChecksumAlgorithm {
        match self {
            ChecksumKind::Crc16 => &Crc16,
            ChecksumKind::None => &NoChecksum,
        }
    }
}

/// Write the checksum of an encoded packet into its last two bytes.
pub fn seal(packet: &mut [u8], algorithm: &dyn ChecksumAlgorithm) -> ToolResult<u16> {
    let header = check_packet(packet)?;
    let (body, tail) = packet.split_at_mut(packet.len() - CHECKSUM_SIZE);
    let value = algorithm.compute(header, body);
    tail.copy_from_slice(&value.to_le_bytes());
    Ok(value)
}

/// Check the trailing checksum of an encoded packet.
///
/// The packet layout is always checked; the checksum itself only when the
/// algorithm [`checks`](ChecksumAlgorithm::checks).
pub fn verify(packet: &[u8], algorithm: &dyn ChecksumAlgorithm) -> ToolResult<()> {
    let header = check_packet(packet)?;
    if !algorithm.checks() {
        return Ok(());
    }
    let (body, tail) = packet.split_at(packet.len() - CHECKSUM_SIZE);
    let expected = algorithm.compute(header, body);
    let actual = u16::from_le_bytes([tail[0], tail[1]]);

    if expected != actual {
        return Err(ToolError::ChecksumInvalid { expected, actual });
    }
    Ok(())
}

/// The bytes must be exactly one known packet.
fn check_packet(packet: &[u8]) -> Result<u8, PacketError> {
    let header = *packet.first().ok_or(PacketError::Empty)?;
    let kind = PacketKind::from_header(header).ok_or(PacketError::UnknownHeader(header))?;
    if packet.len() != kind.size() {
        return Err(PacketError::layout_mismatch(kind, packet.len()));
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rm_serial_packet::{encode_twist_packet, ReceivePacket, SendPacketTwist, WirePacket};

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(Crc16::checksum(b"123456789"), 0x6F91);
        assert_eq!(Crc16::checksum(&[]), CRC16_INIT);
    }

    #[test]
    fn test_table_matches_bitwise() {
        fn bitwise(data: &[u8]) -> u16 {
            let mut crc = CRC16_INIT;
            for &byte in data {
                crc ^= byte as u16;
                for _ in 0..8 {
                    crc = if crc & 1 != 0 {
                        (crc >> 1) ^ CRC16_POLY_REFLECTED
                    } else {
                        crc >> 1
                    };
                }
            }
            crc
        }

        let data: Vec<u8> = (0..=255u8).collect();
        assert_eq!(Crc16::checksum(&data), bitwise(&data));
    }

    #[test]
    fn test_seal_then_verify() {
        let mut bytes = encode_twist_packet(&SendPacketTwist::new([1.0, 0.0, 0.0], [0.0; 3]));
        let value = seal(&mut bytes, &Crc16).unwrap();

        assert_eq!(&bytes[25..], &value.to_le_bytes());
        assert_eq!(value, Crc16::checksum(&bytes[..25]));
        assert!(verify(&bytes, &Crc16).is_ok());
    }

    #[test]
    fn test_verify_detects_corruption() {
        let mut bytes = ReceivePacket::default().encode();
        seal(&mut bytes, &Crc16).unwrap();
        bytes[5] ^= 0x01;

        assert!(matches!(
            verify(&bytes, &Crc16),
            Err(ToolError::ChecksumInvalid { .. })
        ));
    }

    #[test]
    fn test_no_checksum() {
        let mut bytes = ReceivePacket {
            checksum: 0x5555,
            ..Default::default()
        }
        .encode();
        assert_eq!(seal(&mut bytes, &NoChecksum).unwrap(), 0);
        assert_eq!(&bytes[32..], &[0, 0]);
        assert!(verify(&bytes, ChecksumKind::None.algorithm()).is_ok());
    }

    #[test]
    fn test_no_checksum_accepts_any_stored_value() {
        let mut bytes = ReceivePacket::default().encode();
        seal(&mut bytes, &Crc16).unwrap();
        assert!(verify(&bytes, &NoChecksum).is_ok());

        bytes[32] ^= 0xFF;
        assert!(verify(&bytes, ChecksumKind::None.algorithm()).is_ok());
        assert!(verify(&bytes, &Crc16).is_err());

        // Layout is still enforced.
        assert!(matches!(
            verify(&bytes[..30], &NoChecksum),
            Err(ToolError::Packet(PacketError::LayoutMismatch { .. }))
        ));
    }

    #[test]
    fn test_closure_keyed_by_header() {
        let by_header = |header: u8, _body: &[u8]| header as u16;
        let mut bytes = ReceivePacket::default().encode();
        assert_eq!(seal(&mut bytes, &by_header).unwrap(), 0x5A);
    }

    #[test]
    fn test_rejects_non_packets() {
        assert!(matches!(
            verify(&[0x5A, 0x00], &Crc16),
            Err(ToolError::Packet(PacketError::LayoutMismatch { .. }))
        ));
        assert!(matches!(
            verify(&[0x10; 27], &Crc16),
            Err(ToolError::Packet(PacketError::UnknownHeader(0x10)))
        ));
    }
}
