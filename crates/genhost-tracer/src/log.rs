//! Trace log entries and the sink they are forwarded to

use std::fmt;

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped message recorded by a generator or by the tracer itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    #[must_use]
    pub fn now(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            timestamp: Local::now(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    /// `[Warning 14:03:59.120] message`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}] {}",
            self.severity,
            self.timestamp.format("%H:%M:%S%.3f"),
            self.message
        )
    }
}

/// Receives every entry appended to a tracer.
///
/// A sink is created with the tracer and lives exactly as long as it does.
pub trait LogSink: Send + Sync {
    fn record(&self, entry: &LogEntry);
}

/// Forwards entries to `tracing` at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, entry: &LogEntry) {
        match entry.severity {
            Severity::Info => tracing::info!(target: "genhost::tracer", "{}", entry.message),
            Severity::Warning => tracing::warn!(target: "genhost::tracer", "{}", entry.message),
            Severity::Error => tracing::error!(target: "genhost::tracer", "{}", entry.message),
        }
    }
}

/// Discards entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn record(&self, _entry: &LogEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_severity_and_millisecond_clock() {
        let entry = LogEntry::now(Severity::Warning, "disk almost full");
        let line = entry.to_string();

        assert!(line.starts_with("[Warning "));
        assert!(line.ends_with("] disk almost full"));

        // [Warning HH:MM:SS.fff]
        let clock = &line["[Warning ".len()..line.find(']').unwrap()];
        assert_eq!(clock.len(), 12);
        assert_eq!(&clock[8..9], ".");
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Info.to_string(), "Info");
        assert_eq!(Severity::Warning.to_string(), "Warning");
        assert_eq!(Severity::Error.to_string(), "Error");
    }
}
