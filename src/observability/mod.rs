//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce tracing events
//!     → logging.rs (subscriber with reloadable level filter)
//!     → stdout
//!
//! config refresher
//!     → LevelHandle::set (retargets the filter at runtime)
//! ```

pub mod logging;

pub use logging::{init_logging, LevelHandle};
