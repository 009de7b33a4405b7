//! End-to-end exchanges between a simulated host and board, using the tool's
//! checksum routine on both sides.

use rm_serial_packet::{
    decode_send_packet, decode_twist_packet, encode_receive_packet, encode_send_packet,
    PacketKind, ReceivePacket, SendPacket, TaskMode, TrackingState,
};
use rm_serial_tool::{encode_json, seal, split_capture, verify, Crc16, ToolConfig, ToolError};

#[test]
fn test_host_command_reaches_board() {
    let command = SendPacket {
        state: TrackingState::TrackingBuff,
        id: 0,
        armors_num: 7,
        x: 7.1,
        yaw: 0.3,
        vx: 0.913,
        vy: 1.177,
        vz: 1.942,
        cap_timestamp: 55_000,
        t_offset: 120,
        ..Default::default()
    };

    let mut wire = encode_send_packet(&command);
    let checksum = seal(&mut wire, &Crc16).unwrap();

    // Board side.
    verify(&wire, &Crc16).unwrap();
    let received = decode_send_packet(&wire).unwrap();
    assert_eq!(received.checksum, checksum);
    assert_eq!(
        received,
        SendPacket {
            checksum,
            ..command
        }
    );
}

#[test]
fn test_twist_json_reaches_board() {
    let json = r#"{"linear_x": 0.5, "angular_z": 1.0}"#;
    let wire = encode_json(json, PacketKind::Twist, &ToolConfig::default()).unwrap();

    verify(&wire, &Crc16).unwrap();
    let twist = decode_twist_packet(&wire).unwrap();
    assert_eq!(twist.linear_x, 0.5);
    assert_eq!(twist.angular_z, 1.0);
    assert_eq!(twist.linear_y, 0.0);
}

#[test]
fn test_board_stream_with_line_noise() {
    let mut capture = Vec::new();
    for tick in 0..5u32 {
        let mut bytes = encode_receive_packet(&ReceivePacket {
            task_mode: TaskMode::Aim,
            is_play: true,
            pitch: -0.05 * tick as f32,
            game_time: 420 - tick as u16,
            timestamp: 1000 + tick * 5,
            ..Default::default()
        });
        seal(&mut bytes, &Crc16).unwrap();
        capture.extend_from_slice(&bytes);
        // Idle-line noise between packets.
        capture.extend_from_slice(&[0xFF, 0x00]);
    }

    let report = split_capture(&capture, &ToolConfig::default()).unwrap();
    assert_eq!(report.packets.len(), 5);
    assert_eq!(report.rejected, 0);
    assert_eq!(report.discarded, 10);
}

#[test]
fn test_corrupted_telemetry_is_reported() {
    let mut bytes = encode_receive_packet(&ReceivePacket::default());
    seal(&mut bytes, &Crc16).unwrap();
    bytes[20] = 0x42;

    let err = verify(&bytes, &Crc16).unwrap_err();
    assert!(matches!(err, ToolError::ChecksumInvalid { .. }));
    assert!(err.to_string().starts_with("checksum invalid"));
}
