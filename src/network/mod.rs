//! Network Module
//!
//! The synchronous TCP stack under the driver: transport (socket I/O),
//! frame channel (one packet in/out), and session (auth + command exchange).

mod transport;
mod frame;
mod session;

pub use transport::Transport;
pub use frame::{recv_frame, send_frame};
pub use session::{Session, SessionState};
