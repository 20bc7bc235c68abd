//! Frame channel
//!
//! Sends and receives exactly one packet at a time over a [`Transport`],
//! so higher layers never see a partially consumed frame.

use crate::error::{RconError, Result};
use crate::protocol::{self, Packet, PSIZE_MAX, PSIZE_MIN};

use super::transport::Transport;

/// Serialize and send one packet
pub fn send_frame(transport: &mut Transport, packet: &Packet) -> Result<()> {
    let frame = protocol::serialize(packet)?;
    transport.send_all(&frame)
}

/// Receive one packet
///
/// Reads the 4-byte size prefix, validates it against
/// [`PSIZE_MIN`]..=[`PSIZE_MAX`], then reads and decodes the declared bytes.
///
/// An oversize frame is read to completion and any stragglers drained, then
/// surfaced as `OversizePacket` so the caller can skip it without the stream
/// desynchronizing. An undersize frame is `CorruptFrame`.
pub fn recv_frame(transport: &mut Transport) -> Result<Packet> {
    let size_bytes = transport.recv_exact(4)?;
    let size = i32::from_le_bytes([size_bytes[0], size_bytes[1], size_bytes[2], size_bytes[3]]);

    if size > PSIZE_MAX {
        tracing::warn!(size, "received unexpectedly large packet; discarding");
        // Consume the declared bytes so the next frame starts clean, then
        // drain whatever else the server has already queued behind it.
        let mut remaining = size as usize;
        while remaining > 0 {
            let chunk = remaining.min(PSIZE_MAX as usize);
            transport.recv_exact(chunk)?;
            remaining -= chunk;
        }
        transport.flush_pending()?;
        return Err(RconError::OversizePacket {
            size,
            max: PSIZE_MAX,
        });
    }
    if size < PSIZE_MIN {
        tracing::warn!(size, "received unexpectedly small packet size");
        return Err(RconError::CorruptFrame(format!(
            "declared size {} is below the minimum {}",
            size, PSIZE_MIN
        )));
    }

    let payload = transport.recv_exact(size as usize)?;
    protocol::decode_payload(size, &payload)
}
