//! Greeting microservice with a live-reloaded ConfigMap.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!                  │               GREETING SERVICE                │
//!                  │                                               │
//!   GET /api/...   │  ┌─────────┐       ┌──────────────────┐      │
//!   ───────────────┼─▶│  http   │──────▶│ PublishedConfig  │      │
//!                  │  │ server  │ read  │ (atomic snapshot)│      │
//!   JSON response  │  └─────────┘       └────────▲─────────┘      │
//!   ◀──────────────┼                             │ swap           │
//!                  │                    ┌────────┴─────────┐      │
//!   ConfigMap file │                    │ ConfigRefresher  │      │
//!   ───────────────┼───────────────────▶│ (poll + diff)    │      │
//!    (YAML, 2s)    │                    └────────┬─────────┘      │
//!                  │                             │ level          │
//!                  │                    ┌────────▼─────────┐      │
//!                  │                    │  LevelHandle     │      │
//!                  │                    │ (tracing filter) │      │
//!                  │                    └──────────────────┘      │
//!                  └──────────────────────────────────────────────┘
//! ```
//!
//! The refresher is the only writer of the published snapshot; request
//! handlers read it lock-free on their own schedule.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigMap, ConfigRefresher, PublishedConfig, Settings};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::LevelHandle;
