//! Packet codec
//!
//! Pure serialization and deserialization of one RCON frame. No I/O happens
//! here; the frame channel owns the socket side.
//!
//! All integer fields are little-endian on the wire regardless of host
//! endianness.

use crate::error::{RconError, Result};

use super::packet::{Packet, PSIZE_MAX, PSIZE_MIN};

/// Serialize a packet into a complete wire frame
///
/// Layout: size (LE i32) + id (LE i32) + type (LE i32) + body + `\0` + `\0`.
///
/// Fails with `CorruptFrame` if the body contains an interior NUL, and with
/// `OversizePacket` if the declared size would exceed [`PSIZE_MAX`].
pub fn serialize(packet: &Packet) -> Result<Vec<u8>> {
    if packet.body.as_bytes().contains(&0x00) {
        return Err(RconError::CorruptFrame(
            "packet body contains an interior NUL".to_string(),
        ));
    }

    let size = packet.size();
    if size > PSIZE_MAX {
        return Err(RconError::OversizePacket {
            size,
            max: PSIZE_MAX,
        });
    }

    let mut frame = Vec::with_capacity(4 + size as usize);
    frame.extend_from_slice(&size.to_le_bytes());
    frame.extend_from_slice(&packet.id.to_le_bytes());
    frame.extend_from_slice(&packet.ptype.to_le_bytes());
    frame.extend_from_slice(packet.body.as_bytes());
    frame.push(0x00); // body terminator
    frame.push(0x00); // trailing empty string terminator

    Ok(frame)
}

/// Deserialize a complete wire frame (including the size prefix)
///
/// Fails with `CorruptFrame` if the buffer is short, the declared size is
/// under [`PSIZE_MIN`], or a terminator is missing; with `OversizePacket` if
/// the declared size exceeds [`PSIZE_MAX`].
pub fn deserialize(bytes: &[u8]) -> Result<Packet> {
    if bytes.len() < 4 {
        return Err(RconError::CorruptFrame(format!(
            "incomplete size field: expected 4 bytes, got {}",
            bytes.len()
        )));
    }

    let size = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if size > PSIZE_MAX {
        return Err(RconError::OversizePacket {
            size,
            max: PSIZE_MAX,
        });
    }
    if size < PSIZE_MIN {
        return Err(RconError::CorruptFrame(format!(
            "declared size {} is below the minimum {}",
            size, PSIZE_MIN
        )));
    }

    let total = 4 + size as usize;
    if bytes.len() < total {
        return Err(RconError::CorruptFrame(format!(
            "incomplete frame: declared {} bytes, got {}",
            size,
            bytes.len() - 4
        )));
    }

    decode_payload(size, &bytes[4..total])
}

/// Decode the portion of a frame after the size prefix
///
/// `payload` must hold exactly `size` bytes: id + type + NUL-terminated body
/// + trailing NUL. The frame channel calls this after `recv_exact(size)`.
pub fn decode_payload(size: i32, payload: &[u8]) -> Result<Packet> {
    if size < PSIZE_MIN || payload.len() != size as usize {
        return Err(RconError::CorruptFrame(format!(
            "payload length {} does not match declared size {}",
            payload.len(),
            size
        )));
    }

    let id = i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let ptype = i32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);

    // Body runs from offset 8 up to its NUL terminator; the frame then ends
    // with the empty string's own NUL.
    let rest = &payload[8..];
    let body_end = rest
        .iter()
        .position(|&b| b == 0x00)
        .ok_or_else(|| RconError::CorruptFrame("missing body terminator".to_string()))?;

    if body_end + 2 != rest.len() {
        return Err(RconError::CorruptFrame(format!(
            "expected 2 terminator bytes after {}-byte body, frame has {}",
            body_end,
            rest.len() - body_end
        )));
    }
    if rest[rest.len() - 1] != 0x00 {
        return Err(RconError::CorruptFrame(
            "missing trailing empty-string terminator".to_string(),
        ));
    }

    let body = String::from_utf8_lossy(&rest[..body_end]).into_owned();

    Ok(Packet { id, ptype, body })
}
