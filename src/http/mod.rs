//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace layer)
//!     → metrics path: collector scrape → text encoding
//!     → any other path: landing.rs
//! ```

pub mod landing;
pub mod server;

pub use server::{AppState, HttpServer, ServerError};
