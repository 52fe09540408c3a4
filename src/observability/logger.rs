//! Structured JSON logging.
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//!
//! Components never log through a global; they receive a [`LogSink`] at
//! construction.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Mutex;

use super::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Severity::Trace),
            "INFO" => Ok(Severity::Info),
            "WARN" => Ok(Severity::Warn),
            "ERROR" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Destination for structured log events.
pub trait LogSink: Send + Sync {
    /// Record one event with its fields.
    fn log(&self, event: Event, fields: &[(&str, &str)]);
}

/// Writes one JSON object per line to the wrapped writer.
pub struct JsonLogger<W: Write + Send> {
    writer: Mutex<W>,
    min_severity: Severity,
}

impl JsonLogger<io::Stderr> {
    pub fn stderr(min_severity: Severity) -> Self {
        Self::new(io::stderr(), min_severity)
    }
}

impl JsonLogger<io::Stdout> {
    pub fn stdout(min_severity: Severity) -> Self {
        Self::new(io::stdout(), min_severity)
    }
}

impl<W: Write + Send> JsonLogger<W> {
    pub fn new(writer: W, min_severity: Severity) -> Self {
        Self {
            writer: Mutex::new(writer),
            min_severity,
        }
    }

    /// Consumes the logger and returns the writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> LogSink for JsonLogger<W> {
    fn log(&self, event: Event, fields: &[(&str, &str)]) {
        let severity = event.severity();
        if severity < self.min_severity {
            return;
        }
        let line = format_line(severity, event.as_str(), fields);

        // A poisoned writer still gets the line; logging must never panic.
        let mut writer = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

/// Keeps every formatted line in memory.
#[derive(Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the captured lines, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the captured lines whose event matches.
    pub fn lines_for(&self, event: Event) -> Vec<String> {
        let needle = format!("{{\"event\":\"{}\"", event.as_str());
        self.lines()
            .into_iter()
            .filter(|l| l.starts_with(&needle))
            .collect()
    }
}

impl LogSink for MemoryLogger {
    fn log(&self, event: Event, fields: &[(&str, &str)]) {
        let line = format_line(event.severity(), event.as_str(), fields);
        let mut lines = match self.lines.lock() {
            Ok(l) => l,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.trim_end().to_string());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl LogSink for NullLogger {
    fn log(&self, _event: Event, _fields: &[(&str, &str)]) {}
}

fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(128);

    output.push_str("{\"event\":");
    output.push_str(&quote(event));
    output.push_str(",\"severity\":");
    output.push_str(&quote(severity.as_str()));

    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted {
        output.push(',');
        output.push_str(&quote(key));
        output.push(':');
        output.push_str(&quote(value));
    }

    output.push_str("}\n");
    output
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
