//! # Diagnostics
//!
//! Per-record problems (a point without coordinates, a tile without a series
//! marker, a table row that cannot be keyed) never abort a run. The core
//! components report them through a [`DiagnosticSink`] supplied by the caller
//! instead of writing to the process-wide logger directly, so they can be
//! inspected in tests and forwarded to `log` by the binary.

use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational progress or empty-result notice
    Info,
    /// A record was skipped; the run continues
    Warning,
    /// An input could not be used at all
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A single message emitted by a core component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the problem is
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// Informational diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    /// Warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Forward this diagnostic to the `log` facade
    pub fn log(&self) {
        match self.severity {
            Severity::Info => log::info!("{}", self.message),
            Severity::Warning => log::warn!("{}", self.message),
            Severity::Error => log::error!("{}", self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receiver for diagnostics emitted by the matcher, mapping builder and renamer
pub trait DiagnosticSink {
    /// Accept one diagnostic
    fn emit(&mut self, diagnostic: Diagnostic);

    /// Emit an informational message
    fn info(&mut self, message: String) {
        self.emit(Diagnostic::info(message));
    }

    /// Emit a warning
    fn warning(&mut self, message: String) {
        self.emit(Diagnostic::warning(message));
    }

    /// Emit an error
    fn error(&mut self, message: String) {
        self.emit(Diagnostic::error(message));
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that forwards every diagnostic straight to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
    }
}

/// Collected diagnostics for one stage of a run
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected diagnostics in emission order
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of diagnostics at the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    /// Check whether any warning was collected
    pub fn has_warnings(&self) -> bool {
        self.count(Severity::Warning) > 0
    }

    /// Check whether any error was collected
    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Consume the collection
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}
