//! # ARRCON
//!
//! A commandline Source RCON client with:
//! - Little-endian length-prefixed packet framing
//! - Sentinel-based multi-packet response reassembly
//! - Batch (argv / stdin / script file) and interactive execution modes
//! - Saved-host registry persisted beside the executable
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Driver                                │
//! │        (command list, delays, render, interactive)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Session                                │
//! │       (auth, per-command exchange, reassembly)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────▼────────────┐
//!          │      Frame channel      │
//!          │   (one packet in/out)   │
//!          └────────────┬────────────┘
//!                       │
//!                       ▼
//!               ┌─────────────┐
//!               │  Transport  │
//!               │ (TCP socket)│
//!               └─────────────┘
//! ```
//!
//! Control flow is single-threaded and synchronous end-to-end; the only
//! suspension points are the blocking socket calls and sleeps.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod ini;

pub mod protocol;
pub mod network;
pub mod driver;
pub mod hosts;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RconError, Result};
pub use config::Config;
pub use network::{Session, Transport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ARRCON
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
