//! Structured logging with a runtime-adjustable level filter.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber at startup
//! - Expose the active level filter through [`LevelHandle`]
//!
//! The filter sits behind a `reload` layer so the config refresher can
//! retarget verbosity without touching the subscriber itself.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, Registry};

/// Handle to the process-wide log level filter.
///
/// Cloneable; reads and writes go through the reload layer, so a write
/// is observed by all logging calls as a single transition.
#[derive(Clone)]
pub struct LevelHandle {
    inner: reload::Handle<LevelFilter, Registry>,
}

impl LevelHandle {
    /// Wrap an existing reload handle.
    pub fn new(inner: reload::Handle<LevelFilter, Registry>) -> Self {
        Self { inner }
    }

    /// The currently active level filter, if the subscriber is alive.
    pub fn current(&self) -> Option<LevelFilter> {
        self.inner.clone_current()
    }

    /// Replace the active level filter.
    pub fn set(&self, level: LevelFilter) {
        if let Err(e) = self.inner.reload(level) {
            tracing::error!("Failed to update log level: {}", e);
        }
    }
}

/// Initialize the tracing subscriber with a reloadable level filter.
///
/// The initial level comes from `RUST_LOG` when it names a plain level,
/// otherwise `info`.
pub fn init_logging() -> LevelHandle {
    let initial = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO);

    let (filter, handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    LevelHandle::new(handle)
}
