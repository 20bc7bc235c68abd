//! TCP Transport
//!
//! Blocking socket I/O for one RCON connection: connect with address-family
//! fallback, exact-count reads and writes, a non-destructive readiness probe,
//! and a bounded drain for data the caller wants to discard.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{RconError, Result};
use crate::protocol::PSIZE_MAX;

/// Upper bound on `flush_pending` drain iterations, so a peer that streams
/// garbage forever cannot pin the client in the drain loop.
const FLUSH_STEP_LIMIT: usize = 64;

/// A connected TCP transport
///
/// Strictly synchronous: the only suspension points are the blocking socket
/// calls and the sleeps inside `flush_pending`.
#[derive(Debug)]
pub struct Transport {
    stream: TcpStream,

    /// How long the readiness probe waits before reporting quiet
    select_timeout: Duration,

    /// Sleep between drain iterations in `flush_pending`
    receive_delay: Duration,

    /// Set once `close()` has run; makes close idempotent
    closed: bool,
}

impl Transport {
    /// Connect to `host:port`.
    ///
    /// Resolution is address-family unspecified; every returned address is
    /// tried in order and the first that completes the TCP handshake wins.
    pub fn connect(host: &str, port: &str) -> Result<Self> {
        let port: u16 = port.parse().map_err(|_| {
            RconError::Usage(format!("Invalid port value given: \"{}\"", port))
        })?;

        let addrs: Vec<_> = (host, port)
            .to_socket_addrs()
            .map_err(|e| RconError::ResolveFailed {
                host: host.to_string(),
                port: port.to_string(),
                source: e,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(RconError::ResolveFailed {
                host: host.to_string(),
                port: port.to_string(),
                source: std::io::Error::new(ErrorKind::NotFound, "no usable address"),
            });
        }

        // Go through the resolved addresses and try to connect
        let mut last_err = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr) {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => last_err = Some(e),
            }
        }

        let stream = stream.ok_or_else(|| RconError::ConnectFailed {
            host: host.to_string(),
            port: port.to_string(),
            source: last_err
                .unwrap_or_else(|| std::io::Error::new(ErrorKind::Other, "connect failed")),
        })?;

        // Commands are small; send them immediately rather than batched.
        let _ = stream.set_nodelay(true);

        Ok(Self {
            stream,
            select_timeout: Duration::from_millis(500),
            receive_delay: Duration::from_millis(10),
            closed: false,
        })
    }

    /// Wrap an already-connected stream (tests connect to a local mock)
    pub fn from_stream(stream: TcpStream) -> Self {
        let _ = stream.set_nodelay(true);
        Self {
            stream,
            select_timeout: Duration::from_millis(500),
            receive_delay: Duration::from_millis(10),
            closed: false,
        }
    }

    /// Override the probe timeout and drain sleep
    pub fn set_timing(&mut self, select_timeout: Duration, receive_delay: Duration) {
        self.select_timeout = select_timeout;
        self.receive_delay = receive_delay;
    }

    /// Probe timeout currently in effect
    pub fn select_timeout(&self) -> Duration {
        self.select_timeout
    }

    /// Drain sleep currently in effect
    pub fn receive_delay(&self) -> Duration {
        self.receive_delay
    }

    /// A second handle to the underlying socket, for the signal handler's
    /// shutdown slot. Shutting the clone down unblocks any in-flight read.
    pub fn try_clone_stream(&self) -> Result<TcpStream> {
        self.stream.try_clone().map_err(RconError::Io)
    }

    /// Write the entire buffer, resuming on short writes
    pub fn send_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes).map_err(|e| match e.kind() {
            ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
                RconError::ConnectionLost
            }
            _ => RconError::WriteFailed(e),
        })?;
        self.stream.flush().map_err(RconError::WriteFailed)
    }

    /// Read exactly `n` bytes. A clean zero-byte read is `ConnectionLost`.
    pub fn recv_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.stream.read_exact(&mut buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted => RconError::ConnectionLost,
            _ => RconError::ReadFailed(e),
        })?;
        Ok(buf)
    }

    /// Non-destructive readiness probe: does the socket have data (or EOF)
    /// pending within `timeout`?
    ///
    /// Implemented as a scoped read-timeout around a one-byte `peek`, the
    /// single-socket equivalent of the classic `select` probe. EOF reports
    /// as readable so the next real read surfaces `ConnectionLost`.
    pub fn readable_within(&mut self, timeout: Duration) -> Result<bool> {
        let previous = self.stream.read_timeout().map_err(RconError::ReadFailed)?;

        // A zero timeout would mean "block forever" to the OS.
        let timeout = timeout.max(Duration::from_millis(1));
        self.stream
            .set_read_timeout(Some(timeout))
            .map_err(RconError::ReadFailed)?;

        let mut probe = [0u8; 1];
        let readable = match self.stream.peek(&mut probe) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                Ok(false)
            }
            Err(e) => Err(RconError::ReadFailed(e)),
        };

        self.stream
            .set_read_timeout(previous)
            .map_err(RconError::ReadFailed)?;

        readable
    }

    /// Poll `readable_within` until data is pending or `max` elapses.
    /// Returns whether data became available.
    pub fn wait_for_packet(&mut self, max: Duration) -> Result<bool> {
        let start = Instant::now();
        let step = self.select_timeout.min(max).max(Duration::from_millis(1));
        loop {
            if self.readable_within(step)? {
                return Ok(true);
            }
            if start.elapsed() >= max {
                return Ok(false);
            }
        }
    }

    /// Drain pending inbound data the caller has decided to discard.
    ///
    /// Sleeps `receive_delay` between drains so a server still flushing its
    /// own buffers is not spin-read, and stops once the readiness probe
    /// reports quiet (or after `FLUSH_STEP_LIMIT` gulps).
    pub fn flush_pending(&mut self) -> Result<()> {
        let mut discard = [0u8; PSIZE_MAX as usize];

        for _ in 0..FLUSH_STEP_LIMIT {
            if !self.readable_within(self.select_timeout)? {
                return Ok(());
            }
            match self.stream.read(&mut discard) {
                Ok(0) => return Err(RconError::ConnectionLost),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                    return Ok(())
                }
                Err(e) => return Err(RconError::ReadFailed(e)),
            }
            thread::sleep(self.receive_delay);
        }

        tracing::warn!("flush_pending hit its step limit; leaving remaining data unread");
        Ok(())
    }

    /// Best-effort, idempotent close
    pub fn close(&mut self) {
        if !self.closed {
            let _ = self.stream.shutdown(Shutdown::Both);
            self.closed = true;
        }
    }

    /// Whether `close()` has run
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close();
    }
}
