//! Observability for validation components.
//!
//! Provides structured JSON logging through an injected [`LogSink`]. Logging
//! happens only at defined checkpoints: the validation entry point, each
//! recorded failure, and the store boundary.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation outcomes
//! 3. No async or background threads
//! 4. Deterministic output

mod events;
mod logger;

pub use events::Event;
pub use logger::{JsonLogger, LogSink, MemoryLogger, NullLogger, Severity};

use std::sync::Arc;

/// Shared handle to a sink.
pub type SharedLog = Arc<dyn LogSink>;

/// A sink that drops everything, for callers that do not care.
pub fn null_log() -> SharedLog {
    Arc::new(NullLogger)
}
