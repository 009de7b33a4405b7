//! Operations behind the command line.

use rm_serial_packet::{
    decode_any, encode_any, AnyPacket, PacketKind, PacketStream, ReceivePacket, SendPacket,
    SendPacketTwist, MAX_BUFFERED, MAX_PACKET_SIZE,
};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::ToolConfig;
use crate::crc::{seal, verify};
use crate::error::ToolResult;

/// Decode one packet given as hex (whitespace ignored), verifying its
/// checksum first.
pub fn decode_hex(input: &str, config: &ToolConfig) -> ToolResult<AnyPacket> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(compact)?;

    verify(&bytes, config.checksum.algorithm())?;
    let packet = decode_any(&bytes)?;
    debug!("decoded {} packet", packet.kind());
    Ok(packet)
}

/// Build a packet of `kind` from JSON, encode it and seal its checksum.
///
/// Fields missing from the JSON take their defaults, so `{}` yields an idle
/// packet with the right header.
pub fn encode_json(json: &str, kind: PacketKind, config: &ToolConfig) -> ToolResult<Vec<u8>> {
    let packet = match kind {
        PacketKind::Receive => AnyPacket::Receive(serde_json::from_str::<ReceivePacket>(json)?),
        PacketKind::Send => AnyPacket::Send(serde_json::from_str::<SendPacket>(json)?),
        PacketKind::Twist => AnyPacket::Twist(serde_json::from_str::<SendPacketTwist>(json)?),
    };

    let mut bytes = encode_any(&packet);
    let checksum = seal(&mut bytes, config.checksum.algorithm())?;
    debug!("encoded {} packet, checksum 0x{:04X}", kind, checksum);
    Ok(bytes)
}

/// Outcome of splitting a raw capture.
#[derive(Debug, Default, Serialize)]
pub struct SplitReport {
    /// Packets whose checksum verified, in stream order.
    pub packets: Vec<AnyPacket>,
    /// Candidate frames rejected by checksum.
    pub rejected: usize,
    /// Bytes skipped while searching for headers.
    pub discarded: u64,
    /// Trailing bytes that never completed a packet.
    pub incomplete: usize,
}

/// Bytes fed to the stream between drains. A drained stream holds less than
/// one packet, so a chunk never pushes it past its buffer limit.
const SPLIT_CHUNK: usize = MAX_BUFFERED - MAX_PACKET_SIZE;

/// Split a raw serial capture into verified packets.
pub fn split_capture(data: &[u8], config: &ToolConfig) -> ToolResult<SplitReport> {
    let mut stream = PacketStream::for_kinds(&config.accept);
    let mut report = SplitReport::default();

    for chunk in data.chunks(SPLIT_CHUNK) {
        stream.push(chunk);
        drain_frames(&mut stream, config, &mut report)?;
    }

    report.discarded = stream.discarded();
    report.incomplete = stream.buffered_len();
    debug!(
        "split {} packets, {} rejected, {} bytes discarded",
        report.packets.len(),
        report.rejected,
        report.discarded
    );
    Ok(report)
}

fn drain_frames(
    stream: &mut PacketStream,
    config: &ToolConfig,
    report: &mut SplitReport,
) -> ToolResult<()> {
    while let Some((kind, frame)) = stream.next_frame() {
        if let Err(err) = verify(&frame, config.checksum.algorithm()) {
            report.rejected += 1;
            if config.resync_on_checksum_error {
                trace!("{} frame rejected ({}), rescanning", kind, err);
                stream.resync();
            } else {
                warn!("dropping {} frame: {}", kind, err);
            }
            continue;
        }

        report.packets.push(decode_any(&frame)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::ChecksumKind;
    use crate::error::ToolError;
    use approx::assert_relative_eq;
    use rm_serial_packet::{
        encode_receive_packet, DetectColor, TaskMode, TrackingState, RECEIVE_PACKET_HEADER,
    };

    fn sealed_telemetry(timestamp: u32) -> Vec<u8> {
        let mut bytes = encode_receive_packet(&ReceivePacket {
            detect_color: DetectColor::Blue,
            task_mode: TaskMode::Aim,
            yaw: 1.5708,
            aim_y: 2.0,
            game_time: 100,
            timestamp,
            ..Default::default()
        });
        seal(&mut bytes, ChecksumKind::Crc16.algorithm()).unwrap();
        bytes
    }

    #[test]
    fn test_decode_hex() {
        let config = ToolConfig::default();
        let text = hex::encode(sealed_telemetry(123456));

        match decode_hex(&text, &config).unwrap() {
            AnyPacket::Receive(packet) => {
                assert_relative_eq!(packet.yaw, 1.5708);
                assert_eq!(packet.aim_y, 2.0);
                assert_eq!(packet.game_time, 100);
                assert_eq!(packet.timestamp, 123456);
            }
            other => panic!("Expected receive packet, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_hex_with_spaces() {
        let bytes = sealed_telemetry(1);
        let spaced: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        assert!(decode_hex(&spaced.join(" "), &ToolConfig::default()).is_ok());
    }

    #[test]
    fn test_decode_hex_bad_checksum() {
        let mut bytes = sealed_telemetry(1);
        bytes[33] ^= 0xFF;

        let result = decode_hex(&hex::encode(&bytes), &ToolConfig::default());
        assert!(matches!(result, Err(ToolError::ChecksumInvalid { .. })));

        let lenient = ToolConfig {
            checksum: ChecksumKind::None,
            ..Default::default()
        };
        assert!(decode_hex(&hex::encode(&bytes), &lenient).is_ok());
    }

    #[test]
    fn test_decode_hex_without_checksum() {
        let bytes = encode_receive_packet(&ReceivePacket {
            checksum: 0xBEEF,
            ..Default::default()
        });
        let config = ToolConfig {
            checksum: ChecksumKind::None,
            ..Default::default()
        };

        match decode_hex(&hex::encode(bytes), &config).unwrap() {
            AnyPacket::Receive(packet) => assert_eq!(packet.checksum, 0xBEEF),
            other => panic!("Expected receive packet, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_hex_invalid() {
        assert!(matches!(
            decode_hex("zz", &ToolConfig::default()),
            Err(ToolError::Hex(_))
        ));
    }

    #[test]
    fn test_encode_json_send() {
        let json =
            r#"{"state": "tracking_aim", "id": 7, "armors_num": 4, "x": 1.5, "t_offset": 20}"#;
        let bytes = encode_json(json, PacketKind::Send, &ToolConfig::default()).unwrap();

        assert_eq!(bytes.len(), PacketKind::Send.size());
        assert_eq!(bytes[0], 0xA5);
        assert!(verify(&bytes, ChecksumKind::Crc16.algorithm()).is_ok());

        match decode_any(&bytes).unwrap() {
            AnyPacket::Send(packet) => {
                assert_eq!(packet.state, TrackingState::TrackingAim);
                assert_eq!(packet.id, 7);
                assert_eq!(packet.armors_num, 4);
                assert_eq!(packet.x, 1.5);
                assert_eq!(packet.t_offset, 20);
            }
            other => panic!("Expected send packet, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_json_empty_twist() {
        let bytes = encode_json("{}", PacketKind::Twist, &ToolConfig::default()).unwrap();
        assert_eq!(bytes.len(), 27);
        assert_eq!(bytes[0], 0xA4);
        assert!(bytes[1..25].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_json_invalid() {
        let result = encode_json("{\"x\": \"far\"}", PacketKind::Send, &ToolConfig::default());
        assert!(matches!(result, Err(ToolError::Json(_))));
    }

    #[test]
    fn test_split_capture() {
        let mut capture = vec![0x00, 0x13, RECEIVE_PACKET_HEADER, 0x77];
        capture.extend(sealed_telemetry(1));
        capture.extend(sealed_telemetry(2));
        capture.extend(&sealed_telemetry(3)[..10]);

        let report = split_capture(&capture, &ToolConfig::default()).unwrap();
        let timestamps: Vec<u32> = report
            .packets
            .iter()
            .map(|p| match p {
                AnyPacket::Receive(r) => r.timestamp,
                other => panic!("Expected receive packet, got {:?}", other),
            })
            .collect();

        assert_eq!(timestamps, [1, 2]);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.discarded, 4);
        assert_eq!(report.incomplete, 10);
    }

    #[test]
    fn test_split_capture_without_resync() {
        let mut capture = sealed_telemetry(1);
        capture[10] ^= 0x01;
        capture.extend(sealed_telemetry(2));

        let config = ToolConfig {
            resync_on_checksum_error: false,
            ..Default::default()
        };
        let report = split_capture(&capture, &config).unwrap();
        assert_eq!(report.packets.len(), 1);
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn test_split_capture_larger_than_stream_buffer() {
        let count = 200;
        let mut capture = Vec::new();
        for tick in 0..count {
            capture.extend(sealed_telemetry(tick));
        }
        assert!(capture.len() > MAX_BUFFERED);

        let report = split_capture(&capture, &ToolConfig::default()).unwrap();
        assert_eq!(report.packets.len(), count as usize);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.discarded, 0);
        assert_eq!(report.incomplete, 0);
        match report.packets.first() {
            Some(AnyPacket::Receive(packet)) => assert_eq!(packet.timestamp, 0),
            other => panic!("Expected receive packet, got {:?}", other),
        }
    }
}
