//! Error types for ARRCON
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for ARRCON operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Name resolution of \"{host}:{port}\" failed: {source}")]
    ResolveFailed {
        host: String,
        port: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection lost")]
    ConnectionLost,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Authentication rejected by server (response id {id})")]
    AuthRejected { id: i32 },

    #[error("Corrupted packet: {0}")]
    CorruptFrame(String),

    #[error("Oversize packet: declared {size} bytes (max {max})")]
    OversizePacket { size: i32, max: i32 },

    #[error("Session is closed")]
    SessionClosed,

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // User-facing Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Usage(String),

    #[error("File error: {path}: {message}")]
    File { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
