//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ConfigMap file (YAML)
//!     → loader.rs (read & deserialize)
//!     → ConfigMap (immutable document)
//!     → refresher.rs (structural diff against published copy)
//!     → atomic swap of the published document
//!     → readers observe the new greeting template
//!     → level filter retargeted when `level` changed
//!
//! settings.rs holds the startup-only knobs (file path, bind address,
//! poll interval); those never hot-reload.
//! ```
//!
//! # Design Decisions
//! - Documents are immutable once parsed; a change means a full swap
//! - Change detection compares parsed documents, not file bytes, so
//!   formatting-only edits are not treated as changes
//! - A missing or broken file unpublishes the greeting instead of
//!   serving a stale one

pub mod loader;
pub mod refresher;
pub mod schema;
pub mod settings;

pub use loader::ConfigError;
pub use refresher::{ConfigRefresher, PublishedConfig};
pub use schema::ConfigMap;
pub use settings::Settings;
