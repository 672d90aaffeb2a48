//! Observability subsystem for soildb
//!
//! - Structured logging through `tracing`, one `event` field per line
//! - Lock-free store metrics
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on store behaviour
//! 3. No background threads

mod events;
mod logging;
mod metrics;

pub use events::Event;
pub use logging::init_logging;
pub use metrics::{MetricsRegistry, MetricsSnapshot};
