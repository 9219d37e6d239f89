//! Typed errors for the column locator, the address extractor, and the tally
//! engine.
//!
//! Errors split into two tiers:
//!
//! - **Fatal**: [`TallyError`] ends a run before any statistics exist.
//! - **Recoverable**: [`RowIssue`] describes one skipped row. It never leaves
//!   the row loop; the engine hands it to a
//!   [`RowDiagnostics`](crate::diagnostics::RowDiagnostics) sink and moves on.
//!
//! The command layer wraps all of these in `anyhow` with path context.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("no email column found")]
    NoEmailColumnFound,
}

/// Grammar failures raised while parsing a mailbox.
///
/// The display text is the reason reported in row diagnostics, so keep it
/// stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("no address")]
    NoAddress,
    #[error("no addr-spec")]
    NoAddrSpec,
    #[error("missing phrase")]
    MissingPhrase,
    #[error("missing word in phrase: {0}")]
    MissingWordInPhrase(Box<SyntaxError>),
    #[error("no angle-addr")]
    NoAngleAddr,
    #[error("unclosed angle-addr")]
    UnclosedAngleAddr,
    #[error("missing @ in addr-spec")]
    MissingAtInAddrSpec,
    #[error("no domain in addr-spec")]
    NoDomainInAddrSpec,
    #[error("invalid string")]
    InvalidString,
    #[error("leading dot in atom")]
    LeadingDot,
    #[error("double dot in atom")]
    DoubleDot,
    #[error("trailing dot in atom")]
    TrailingDot,
    #[error("unclosed quoted-string")]
    UnclosedQuotedString,
    #[error("bad character in quoted-string: {0:?}")]
    BadQuotedChar(char),
    #[error("empty quoted-string")]
    EmptyQuotedString,
    #[error("misformatted parenthetical comment")]
    MisformattedComment,
    #[error("expected single address, got {0:?}")]
    TrailingInput(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error(transparent)]
    InvalidAddressSyntax(#[from] SyntaxError),
    #[error("no @ in email address")]
    MissingAtSign,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode text with encoding {encoding}")]
pub struct DecodeError {
    pub encoding: &'static str,
}

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("input is empty; expected a header row")]
    MissingHeader,
    #[error("unable to read header row: {reason}")]
    HeaderUnreadable { reason: String },
    #[error(transparent)]
    NoEmailColumn(#[from] ColumnError),
    #[error("reading input after line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: csv::Error,
    },
}

/// Why a single row was left out of the tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssueKind {
    /// The record could not be read as a well-formed row.
    Decode(String),
    /// The e-mail field did not yield a domain.
    Address(AddressError),
}

/// One skipped row, tagged with its 1-based input line (the header is line 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub line: usize,
    pub kind: RowIssueKind,
}

impl RowIssue {
    pub fn decode(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            kind: RowIssueKind::Decode(reason.into()),
        }
    }

    pub fn address(line: usize, error: AddressError) -> Self {
        Self {
            line,
            kind: RowIssueKind::Address(error),
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RowIssueKind::Decode(reason) => {
                write!(f, "[line {}] Error parsing CSV: {reason}", self.line)
            }
            RowIssueKind::Address(err) => {
                write!(f, "[line {}] Error parsing email address: {err}", self.line)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_phrase_error_reads_naturally() {
        let err = SyntaxError::MissingWordInPhrase(Box::new(SyntaxError::InvalidString));
        assert_eq!(err.to_string(), "missing word in phrase: invalid string");
    }

    #[test]
    fn row_issue_lines_name_the_failure_tier() {
        let address = RowIssue::address(1002, SyntaxError::MissingPhrase.into());
        assert_eq!(
            address.to_string(),
            "[line 1002] Error parsing email address: missing phrase"
        );
        let decode = RowIssue::decode(7, "found record with 2 fields");
        assert_eq!(
            decode.to_string(),
            "[line 7] Error parsing CSV: found record with 2 fields"
        );
    }
}
