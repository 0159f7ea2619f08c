//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → greeting.rs (/api/greeting, placeholder substitution)
//!     → health.rs (/api/health/*)
//!     → license texts from licenses/ under /licenses
//!     → static assets from public/ for everything else
//! ```

pub mod greeting;
pub mod health;
pub mod server;

pub use server::HttpServer;
