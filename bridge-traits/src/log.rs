//! Log forwarding to the host.
//!
//! Bindings for higher-level languages usually want link-layer log lines to
//! land in the host's own logging framework. [`LoggerSink`] is that seam; the
//! tracing layer in `core-runtime` turns every event into a [`LogEntry`].
//!
//! Link-layer events name their subject with a few well-known fields:
//!
//! | Field     | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `handle`  | Native address, formatted as hex         |
//! | `kind`    | Resource kind of `handle` (`link`, `playlist`, ...) |
//! | `uri`     | Link text as given or as read back        |
//! | `session` | Native session address                    |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Reference count traffic (`add_ref`, `release`) and cache hits
    Trace,
    Debug,
    Info,
    /// Rejected URIs and failed native reference calls
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One forwarded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Module path of the emitter, e.g. `core_link::handle`
    pub target: String,
    pub message: String,
    /// Event fields, ordered by name
    pub fields: BTreeMap<String, String>,
    /// Innermost span the event was emitted in
    pub span: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: BTreeMap::new(),
            span: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn in_span(mut self, name: impl Into<String>) -> Self {
        self.span = Some(name.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Native address the event is about.
    pub fn handle(&self) -> Option<&str> {
        self.field("handle")
    }

    pub fn uri(&self) -> Option<&str> {
        self.field("uri")
    }
}

/// One line: timestamp, level, target, message, then `key=value` pairs.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<5} {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        if let Some(span) = &self.span {
            write!(f, " [{}]", span)?;
        }
        Ok(())
    }
}

/// Receives link-layer log entries on behalf of the host.
///
/// Sinks can be invoked while the native lock is held, for example when a
/// wrapper dropped inside a resolution logs its release. Implementations
/// must not create or drop links, playlists or other wrappers.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::log::{LoggerSink, LogEntry, LogLevel};
///
/// async fn report_rejected(logger: &dyn LoggerSink, uri: &str) {
///     let entry = LogEntry::new(LogLevel::Warn, "core_link::link", "Rejected URI")
///         .with_field("uri", uri);
///     logger.log(entry).await.ok();
/// }
/// ```
#[async_trait::async_trait]
pub trait LoggerSink: Send + Sync {
    async fn log(&self, entry: LogEntry) -> Result<()>;

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Minimum level this sink wants; lower levels are dropped at the source.
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Writes entries to stderr, one line each.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[async_trait::async_trait]
impl LoggerSink for ConsoleLogger {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            writeln!(io::stderr().lock(), "{}", entry)?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        io::stderr().lock().flush()?;
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}
