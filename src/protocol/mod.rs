//! Protocol Module
//!
//! Defines the Source RCON wire protocol.
//!
//! ## Frame Format (little-endian, byte-exact)
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬───────────┬──────┬──────┐
//! │ Size (4) │  Id (4)  │ Type (4) │  Body (N) │ 0x00 │ 0x00 │
//! └──────────┴──────────┴──────────┴───────────┴──────┴──────┘
//! ```
//!
//! `Size` counts the bytes after itself: 4 + 4 + N + 1 + 1. Total wire
//! length is therefore `14 + N`.
//!
//! ### Type Codes
//! - 3: AUTH            (client → server)
//! - 2: EXEC_COMMAND    (client → server)
//! - 2: AUTH_RESPONSE   (server → client)
//! - 0: RESPONSE_VALUE  (server → client, also the client's sentinel)
//!
//! AUTH_RESPONSE and EXEC_COMMAND share the numeric value 2; direction
//! disambiguates them.

mod packet;
mod codec;

pub use packet::{packet_type, IdAllocator, Packet, PSIZE_MAX, PSIZE_MIN};
pub use codec::{decode_payload, deserialize, serialize};
