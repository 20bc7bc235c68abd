//! Codec Tests
//!
//! Frame serialization/deserialization laws and corrupt-frame handling.

use arrcon::protocol::{
    deserialize, packet_type, serialize, Packet, PSIZE_MAX, PSIZE_MIN,
};
use arrcon::RconError;

// =============================================================================
// Round-trip and Size Laws
// =============================================================================

#[test]
fn test_round_trip_auth() {
    let packet = Packet::auth(1, "secret");
    let frame = serialize(&packet).unwrap();
    assert_eq!(deserialize(&frame).unwrap(), packet);
}

#[test]
fn test_round_trip_exec() {
    let packet = Packet::exec(42, "say hello world");
    let frame = serialize(&packet).unwrap();
    assert_eq!(deserialize(&frame).unwrap(), packet);
}

#[test]
fn test_round_trip_empty_body() {
    let packet = Packet::response_value(7, "");
    let frame = serialize(&packet).unwrap();
    assert_eq!(deserialize(&frame).unwrap(), packet);
}

#[test]
fn test_round_trip_preserves_bytes() {
    // Byte-for-byte: reserializing the decoded packet gives the same frame
    let packet = Packet::exec(3, "mp_warmuptime 0");
    let frame = serialize(&packet).unwrap();
    let again = serialize(&deserialize(&frame).unwrap()).unwrap();
    assert_eq!(frame, again);
}

#[test]
fn test_size_law() {
    let packet = Packet::exec(1, "status");
    let frame = serialize(&packet).unwrap();

    // len(frame) == 4 + size == 14 + len(body)
    assert_eq!(frame.len() as i32, 4 + packet.size());
    assert_eq!(frame.len(), 14 + packet.body.len());
}

#[test]
fn test_endian_law() {
    // The size prefix is little-endian regardless of host endianness
    let packet = Packet::exec(1, "status"); // size = 16
    let frame = serialize(&packet).unwrap();
    assert_eq!(&frame[0..4], &[0x10, 0x00, 0x00, 0x00]);
}

#[test]
fn test_wire_format_exact() {
    // Expected: size(12) id(5) type(2) "st" \0 \0
    let frame = serialize(&Packet::exec(5, "st")).unwrap();
    assert_eq!(
        frame,
        vec![
            0x0C, 0x00, 0x00, 0x00, // size = 12
            0x05, 0x00, 0x00, 0x00, // id = 5
            0x02, 0x00, 0x00, 0x00, // type = EXEC_COMMAND
            b's', b't', 0x00, 0x00,
        ]
    );
}

#[test]
fn test_type_codes() {
    assert_eq!(packet_type::AUTH, 3);
    assert_eq!(packet_type::AUTH_RESPONSE, 2);
    assert_eq!(packet_type::EXEC_COMMAND, 2);
    assert_eq!(packet_type::RESPONSE_VALUE, 0);
}

#[test]
fn test_minimum_size_packet() {
    let packet = Packet::response_value(1, "");
    assert_eq!(packet.size(), PSIZE_MIN);
}

// =============================================================================
// Serialization Failures
// =============================================================================

#[test]
fn test_serialize_rejects_interior_nul() {
    let packet = Packet::exec(1, "bad\0body");
    assert!(matches!(
        serialize(&packet),
        Err(RconError::CorruptFrame(_))
    ));
}

#[test]
fn test_serialize_rejects_oversize_body() {
    let body = "x".repeat(PSIZE_MAX as usize); // size = 10 + 4096 > PSIZE_MAX
    let packet = Packet::exec(1, &body);
    assert!(matches!(
        serialize(&packet),
        Err(RconError::OversizePacket { .. })
    ));
}

#[test]
fn test_serialize_accepts_max_size_body() {
    let body = "x".repeat((PSIZE_MAX - PSIZE_MIN) as usize);
    let packet = Packet::exec(1, &body);
    assert_eq!(packet.size(), PSIZE_MAX);
    assert!(serialize(&packet).is_ok());
}

// =============================================================================
// Deserialization Failures
// =============================================================================

#[test]
fn test_deserialize_rejects_undersize() {
    let mut frame = serialize(&Packet::response_value(1, "")).unwrap();
    frame[0] = (PSIZE_MIN - 1) as u8;
    assert!(matches!(
        deserialize(&frame),
        Err(RconError::CorruptFrame(_))
    ));
}

#[test]
fn test_deserialize_rejects_oversize() {
    let mut frame = serialize(&Packet::response_value(1, "")).unwrap();
    let declared = (PSIZE_MAX + 1).to_le_bytes();
    frame[..4].copy_from_slice(&declared);
    assert!(matches!(
        deserialize(&frame),
        Err(RconError::OversizePacket { size, .. }) if size == PSIZE_MAX + 1
    ));
}

#[test]
fn test_deserialize_rejects_truncated_frame() {
    let frame = serialize(&Packet::exec(1, "status")).unwrap();
    assert!(matches!(
        deserialize(&frame[..frame.len() - 3]),
        Err(RconError::CorruptFrame(_))
    ));
}

#[test]
fn test_deserialize_rejects_missing_terminator() {
    // Hand-build a frame whose body runs to the end with no NUL
    let mut frame = Vec::new();
    frame.extend_from_slice(&12i32.to_le_bytes());
    frame.extend_from_slice(&1i32.to_le_bytes());
    frame.extend_from_slice(&0i32.to_le_bytes());
    frame.extend_from_slice(b"abcd");
    assert!(matches!(
        deserialize(&frame),
        Err(RconError::CorruptFrame(_))
    ));
}

#[test]
fn test_deserialize_rejects_short_buffer() {
    assert!(matches!(
        deserialize(&[0x01, 0x02]),
        Err(RconError::CorruptFrame(_))
    ));
}

#[test]
fn test_deserialize_negative_id_passes_through() {
    // id = -1 is how servers signal auth rejection; the codec must not
    // reject it, the session interprets it
    let mut frame = Vec::new();
    frame.extend_from_slice(&10i32.to_le_bytes());
    frame.extend_from_slice(&(-1i32).to_le_bytes());
    frame.extend_from_slice(&2i32.to_le_bytes());
    frame.push(0x00);
    frame.push(0x00);
    let packet = deserialize(&frame).unwrap();
    assert_eq!(packet.id, -1);
    assert_eq!(packet.ptype, 2);
    assert!(packet.body.is_empty());
}
