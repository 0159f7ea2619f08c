//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl+C
//!     → Shutdown::trigger (shutdown.rs)
//!     → HTTP server drains and stops
//!     → config refresher loop exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
