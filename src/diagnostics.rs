//! Sinks for rows the tally engine skips.
//!
//! The engine never logs on its own; it reports each skipped row to a
//! [`RowDiagnostics`] implementation supplied by the caller. The command line
//! uses [`LogDiagnostics`], which forwards to the `log` facade. Tests and
//! embedding callers can use [`CollectedDiagnostics`] to keep the lines.

use log::warn;

use crate::error::RowIssue;

pub trait RowDiagnostics {
    /// Called exactly once per skipped row, in input order.
    fn row_skipped(&mut self, issue: RowIssue);

    /// Number of rows reported so far.
    fn skipped(&self) -> usize;
}

/// Emits each skipped row as a `warn` record.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    skipped: usize,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowDiagnostics for LogDiagnostics {
    fn row_skipped(&mut self, issue: RowIssue) {
        self.skipped += 1;
        warn!("{issue}");
    }

    fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Keeps every skipped row in memory.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    issues: Vec<RowIssue>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issues(&self) -> &[RowIssue] {
        &self.issues
    }

    /// Rendered diagnostic lines, one per skipped row.
    pub fn lines(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl RowDiagnostics for CollectedDiagnostics {
    fn row_skipped(&mut self, issue: RowIssue) {
        self.issues.push(issue);
    }

    fn skipped(&self) -> usize {
        self.issues.len()
    }
}
