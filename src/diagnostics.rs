//! Diagnostic collection.
//!
//! Parser and transpiler stages both emit into a shared `Diagnostics` sink
//! rather than returning a single the-first-error-wins `Result`, so a run
//! surfaces every problem it found instead of stopping at the first one.
//! Each diagnostic is also logged through `tracing` as it is recorded,
//! at the point of observation rather than batched up for a final report.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.line, self.col, self.severity, self.message)
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { items: Vec::new() }
    }

    pub fn error(&mut self, message: impl Into<String>, line: u32, col: u32) {
        let message = message.into();
        tracing::error!(line, col, %message, "parse error");
        self.items.push(Diagnostic { severity: Severity::Error, message, line, col });
    }

    pub fn warn(&mut self, message: impl Into<String>, line: u32, col: u32) {
        let message = message.into();
        tracing::warn!(line, col, %message, "transpile warning");
        self.items.push(Diagnostic { severity: Severity::Warning, message, line, col });
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
