//! Packet definitions
//!
//! The RCON protocol's unit of work, plus the per-session request id
//! allocator.

/// Minimum valid declared packet size: id + type + two NUL terminators.
pub const PSIZE_MIN: i32 = 10;

/// Maximum declared packet size for outbound packets. Inbound packets that
/// declare more than this are drained and skipped rather than decoded.
pub const PSIZE_MAX: i32 = 4096;

/// Wire type codes.
///
/// `AUTH_RESPONSE` and `EXEC_COMMAND` share the value 2; which one a frame
/// means depends on its direction, so [`Packet`] keeps the raw `i32` rather
/// than forcing an enum on the response path.
pub mod packet_type {
    /// Authentication request (client → server).
    pub const AUTH: i32 = 3;
    /// Authentication reply (server → client).
    pub const AUTH_RESPONSE: i32 = 2;
    /// Command request (client → server).
    pub const EXEC_COMMAND: i32 = 2;
    /// Command output chunk (server → client); also sent by the client as
    /// the end-of-response sentinel.
    pub const RESPONSE_VALUE: i32 = 0;
}

/// A single RCON packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Request correlation id; chosen by the client, echoed by the server.
    /// `-1` from the server means authentication failed.
    pub id: i32,

    /// Wire type code (see [`packet_type`])
    pub ptype: i32,

    /// Payload; conventionally UTF-8 and must not contain an interior NUL
    pub body: String,
}

impl Packet {
    /// Create an authentication request carrying the password
    pub fn auth(id: i32, password: &str) -> Self {
        Self {
            id,
            ptype: packet_type::AUTH,
            body: password.to_string(),
        }
    }

    /// Create a command request
    pub fn exec(id: i32, command: &str) -> Self {
        Self {
            id,
            ptype: packet_type::EXEC_COMMAND,
            body: command.to_string(),
        }
    }

    /// Create a RESPONSE_VALUE packet (the client uses an empty one as the
    /// end-of-response sentinel)
    pub fn response_value(id: i32, body: &str) -> Self {
        Self {
            id,
            ptype: packet_type::RESPONSE_VALUE,
            body: body.to_string(),
        }
    }

    /// Declared size: the bytes following the size field itself
    /// (id + type + body + body NUL + trailing empty-string NUL).
    pub fn size(&self) -> i32 {
        4 + 4 + self.body.len() as i32 + 1 + 1
    }
}

/// Hands out monotonically increasing, session-unique request ids.
///
/// Owned by the session; distinct sessions restart from the beginning.
/// Wraparound after 2^31 - 1 allocations is not defended against; no real
/// session sends that many requests.
#[derive(Debug)]
pub struct IdAllocator {
    next: i32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id
    pub fn next(&mut self) -> i32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_law() {
        assert_eq!(Packet::auth(1, "").size(), PSIZE_MIN);
        assert_eq!(Packet::exec(1, "status").size(), 16);
    }

    #[test]
    fn test_id_allocator_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next();
        let b = ids.next();
        let c = ids.next();
        assert!(0 < a && a < b && b < c);
    }
}
