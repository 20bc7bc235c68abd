//! RCON Session
//!
//! The protocol state machine over one authenticated TCP connection:
//! authentication (including the Minecraft empty-frame quirk) and per-command
//! exchange with sentinel-based multi-packet response reassembly.
//!
//! ## Reassembly
//!
//! The protocol has no end-of-response marker: a long reply arrives as
//! several RESPONSE_VALUE frames sharing the command's id. Immediately after
//! each command the client sends a second request (an empty RESPONSE_VALUE,
//! which is syntactically invalid coming from a client) and the server
//! echoes an empty reply carrying that sentinel's id. TCP preserves order,
//! so the sentinel echo cannot arrive before the last chunk of the command's
//! own output; seeing it means the response is complete.

use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::error::{RconError, Result};
use crate::protocol::{packet_type, IdAllocator, Packet};

use super::frame;
use super::transport::Transport;

/// Pause between sending a command and its sentinel, giving the server time
/// to start producing output. Some servers answer the sentinel out of order
/// without this.
const SENTINEL_SETTLE: Duration = Duration::from_millis(10);

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// TCP connected, not yet authenticated
    Connected,
    /// Authentication accepted; commands may run
    Authenticated,
    /// Terminal; every further call returns `SessionClosed`
    Closed,
}

/// One RCON session over an exclusively owned transport
///
/// There is no overall command timeout: a stuck server can hold
/// [`Session::run_command`] indefinitely. That limitation is accepted; the
/// interrupt handler's socket shutdown is the escape hatch.
#[derive(Debug)]
pub struct Session {
    transport: Transport,
    ids: IdAllocator,
    state: SessionState,
}

impl Session {
    /// Wrap a connected transport. The session owns it for its lifetime.
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            ids: IdAllocator::new(),
            state: SessionState::Connected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// A second socket handle for the driver's signal slot
    pub fn try_clone_stream(&self) -> Result<std::net::TcpStream> {
        self.transport.try_clone_stream()
    }

    /// Authenticate with the server.
    ///
    /// Success requires an AUTH_RESPONSE echoing our request id. An id of
    /// `-1` (or any other foreign id) is `AuthRejected`. Minecraft servers
    /// sometimes send a spurious empty RESPONSE_VALUE before the real auth
    /// reply; it is accepted and discarded.
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        if self.state != SessionState::Connected {
            return Err(self.closed_error());
        }

        let pid = self.ids.next();
        let result = self.authenticate_inner(pid, password);
        match result {
            Ok(()) => {
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) => {
                self.close();
                Err(e)
            }
        }
    }

    fn authenticate_inner(&mut self, pid: i32, password: &str) -> Result<()> {
        frame::send_frame(&mut self.transport, &Packet::auth(pid, password))?;

        let mut reply = frame::recv_frame(&mut self.transport)?;
        if reply.ptype == packet_type::RESPONSE_VALUE && reply.body.is_empty() {
            // Minecraft quirk: empty RESPONSE_VALUE precedes the auth reply.
            tracing::debug!(id = reply.id, "discarding empty pre-auth response");
            reply = frame::recv_frame(&mut self.transport)?;
        }

        if reply.ptype != packet_type::AUTH_RESPONSE {
            return Err(RconError::CorruptFrame(format!(
                "expected auth response (type {}), got type {}",
                packet_type::AUTH_RESPONSE,
                reply.ptype
            )));
        }
        if reply.id != pid {
            return Err(RconError::AuthRejected { id: reply.id });
        }
        Ok(())
    }

    /// Run one command, streaming its (possibly fragmented) output into
    /// `sink` as chunks arrive.
    ///
    /// On `ConnectionLost` mid-reassembly, everything received so far has
    /// already been written to `sink` before the error propagates.
    pub fn run_command<W: Write>(&mut self, command: &str, sink: &mut W) -> Result<()> {
        if self.state != SessionState::Authenticated {
            return Err(self.closed_error());
        }

        let result = self.run_command_inner(command, sink);
        if let Err(e) = &result {
            match e {
                // The frame layer already resynchronized the stream.
                RconError::OversizePacket { .. } => {}
                _ => self.close(),
            }
        }
        result
    }

    fn run_command_inner<W: Write>(&mut self, command: &str, sink: &mut W) -> Result<()> {
        let cmd_pid = self.ids.next();
        frame::send_frame(&mut self.transport, &Packet::exec(cmd_pid, command))?;

        // Let the server start responding before the sentinel goes out.
        thread::sleep(SENTINEL_SETTLE);

        let term_pid = self.ids.next();
        frame::send_frame(&mut self.transport, &Packet::response_value(term_pid, ""))?;

        let receive_delay = self.transport.receive_delay();
        loop {
            let packet = match frame::recv_frame(&mut self.transport) {
                Ok(p) => p,
                Err(RconError::OversizePacket { size, .. }) => {
                    // The oversized frame was drained; the sentinel may have
                    // gone with it. Wait briefly for it, else call the
                    // response complete.
                    tracing::warn!(size, "skipping oversize frame in command response");
                    let max = self.transport.select_timeout();
                    if self.transport.wait_for_packet(max)? {
                        continue;
                    }
                    break;
                }
                Err(e) => return Err(e),
            };

            if packet.id == cmd_pid {
                sink.write_all(packet.body.as_bytes())
                    .map_err(RconError::WriteFailed)?;
                sink.flush().map_err(RconError::WriteFailed)?;
            } else if packet.id == term_pid {
                // Servers echo the sentinel as an empty frame, sometimes two.
                self.transport.flush_pending()?;
                break;
            } else {
                tracing::warn!(
                    id = packet.id,
                    expected = cmd_pid,
                    "discarding response with unexpected id"
                );
            }

            thread::sleep(receive_delay);
        }

        Ok(())
    }

    /// Close the session and its transport. Idempotent.
    pub fn close(&mut self) {
        if self.state != SessionState::Closed {
            self.transport.close();
            self.state = SessionState::Closed;
        }
    }

    fn closed_error(&self) -> RconError {
        match self.state {
            SessionState::Closed => RconError::SessionClosed,
            // Connected/Authenticated reached from the wrong entry point
            _ => RconError::Usage("session is not in a state to do that".to_string()),
        }
    }
}
