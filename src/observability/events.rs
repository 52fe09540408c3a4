//! Observable events emitted by validation components.
//!
//! Events are explicit and typed. Each one is emitted at a single,
//! well-defined checkpoint.

use std::fmt;

use super::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Validation entry point reached
    ValidationStart,
    /// Validation completed with no failures
    ValidationPassed,
    /// Validation completed with one or more failures
    ValidationFailed,
    /// A single failure was appended to the collector
    FailureRecorded,
    /// A rule-check reported invalid without recording any failure
    EmptyFailureList,
    /// A store lookup raised an error that was converted to absence
    StoreLookupFailed,
    /// A schema entry was skipped because its name was blank
    SchemaEntrySkipped,
    /// CLI configuration loaded
    ConfigLoaded,
}

impl Event {
    /// Returns the event name as it appears in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ValidationStart => "VALIDATION_START",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::FailureRecorded => "FAILURE_RECORDED",
            Event::EmptyFailureList => "EMPTY_FAILURE_LIST",
            Event::StoreLookupFailed => "STORE_LOOKUP_FAILED",
            Event::SchemaEntrySkipped => "SCHEMA_ENTRY_SKIPPED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::FailureRecorded | Event::SchemaEntrySkipped => Severity::Trace,
            Event::ValidationStart
            | Event::ValidationPassed
            | Event::ValidationFailed
            | Event::ConfigLoaded => Severity::Info,
            Event::EmptyFailureList | Event::StoreLookupFailed => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
