//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Broadcast → HTTP server stops accepting → in-flight scrapes finish → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
