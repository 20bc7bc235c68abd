//! Shared test helpers: a scripted mock RCON server.
//!
//! Each test spawns a listener on an ephemeral port and hands it a script
//! closure that plays the server's side of the exchange with real frames.

// Not every test crate uses every helper.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arrcon::protocol::{self, Packet};

/// A one-connection scripted RCON server
pub struct MockServer {
    pub port: u16,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    /// Bind an ephemeral port and serve exactly one connection with `script`
    pub fn start<F>(script: F) -> Self
    where
        F: FnOnce(&mut TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock listener");
        let port = listener.local_addr().expect("mock local addr").port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("mock accept");
            stream
                .set_read_timeout(Some(Duration::from_secs(10)))
                .expect("mock read timeout");
            script(&mut stream);
        });

        Self {
            port,
            handle: Some(handle),
        }
    }

    /// Wait for the script to finish, surfacing its panics
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("mock server script panicked");
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Read one frame from the client
pub fn read_packet(stream: &mut TcpStream) -> Packet {
    let mut size_bytes = [0u8; 4];
    stream.read_exact(&mut size_bytes).expect("mock read size");
    let size = i32::from_le_bytes(size_bytes);
    let mut payload = vec![0u8; size as usize];
    stream.read_exact(&mut payload).expect("mock read payload");
    protocol::decode_payload(size, &payload).expect("mock decode")
}

/// Send one well-formed frame to the client
pub fn write_packet(stream: &mut TcpStream, id: i32, ptype: i32, body: &str) {
    let frame = protocol::serialize(&Packet {
        id,
        ptype,
        body: body.to_string(),
    })
    .expect("mock serialize");
    stream.write_all(&frame).expect("mock write");
}

/// Send raw bytes (for deliberately malformed frames)
pub fn write_raw(stream: &mut TcpStream, bytes: &[u8]) {
    stream.write_all(bytes).expect("mock write raw");
}

/// Play the server's half of a successful authentication
pub fn serve_auth(stream: &mut TcpStream, password: &str) {
    let auth = read_packet(stream);
    assert_eq!(auth.ptype, arrcon::protocol::packet_type::AUTH);
    assert_eq!(auth.body, password);
    write_packet(
        stream,
        auth.id,
        arrcon::protocol::packet_type::AUTH_RESPONSE,
        "",
    );
}

/// Block until the client closes its end, so the test controls when EOF is
/// observed (a real server holds the connection open between commands).
pub fn hold_open(stream: &mut TcpStream) {
    let mut sink = [0u8; 256];
    loop {
        match stream.read(&mut sink) {
            Ok(0) => return,
            Ok(_) => continue,
            Err(_) => return,
        }
    }
}
