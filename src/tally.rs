//! Streaming per-domain tally over a CSV of customer records.
//!
//! The engine reads the header row, picks the e-mail column with
//! [`locate_email_column`], then walks the remaining records one at a time
//! through a single reused [`ByteRecord`]. Only the e-mail field of each
//! record is decoded. Rows that cannot be read or whose address does not
//! parse are reported to the caller's [`RowDiagnostics`] and left out; they
//! never end the run. Memory grows with the number of distinct domains (and
//! distinct local parts when unique counting is on), not with the row count.

use std::{
    collections::{HashMap, HashSet},
    io::Read,
};

use clap::ValueEnum;
use csv::{ByteRecord, ErrorKind};
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::{
    address::{AddressParts, extract_parts},
    columns::locate_email_column,
    diagnostics::RowDiagnostics,
    error::{RowIssue, TallyError},
    io_utils,
};

/// Aggregated statistics for one lowercase domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainStat {
    pub domain_name: String,
    pub address_count: usize,
    /// Distinct addresses for the domain; `None` unless unique counting is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_address_count: Option<usize>,
}

/// How distinct addresses are counted per domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum UniqueMode {
    /// Only total address counts.
    #[default]
    Off,
    /// Local parts compared exactly as written.
    Exact,
    /// Local parts lowercased before comparison.
    IgnoreCase,
}

impl UniqueMode {
    pub fn is_enabled(self) -> bool {
        self != UniqueMode::Off
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TallyOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub unique: UniqueMode,
}

impl Default for TallyOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
            unique: UniqueMode::Off,
        }
    }
}

#[derive(Debug, Default)]
struct DomainEntry {
    addresses: usize,
    // Local parts only; the domain is the map key.
    local_parts: HashSet<String>,
}

/// Running tally for one run, keyed by lowercase domain.
#[derive(Debug)]
pub struct DomainTally {
    unique: UniqueMode,
    domains: HashMap<String, DomainEntry>,
}

impl DomainTally {
    pub fn new(unique: UniqueMode) -> Self {
        Self {
            unique,
            domains: HashMap::new(),
        }
    }

    /// Counts one successfully extracted address.
    pub fn record(&mut self, parts: &AddressParts) {
        let entry = self
            .domains
            .entry(parts.domain.to_lowercase())
            .or_default();
        entry.addresses += 1;
        match self.unique {
            UniqueMode::Off => {}
            UniqueMode::Exact => {
                if !entry.local_parts.contains(&parts.local_part) {
                    entry.local_parts.insert(parts.local_part.clone());
                }
            }
            UniqueMode::IgnoreCase => {
                entry.local_parts.insert(parts.local_part.to_lowercase());
            }
        }
    }

    /// Consumes the tally into stats sorted ascending by domain name.
    pub fn into_sorted(self) -> Vec<DomainStat> {
        let unique = self.unique.is_enabled();
        let mut stats = self
            .domains
            .into_iter()
            .map(|(domain_name, entry)| DomainStat {
                domain_name,
                address_count: entry.addresses,
                unique_address_count: unique.then_some(entry.local_parts.len()),
            })
            .collect::<Vec<_>>();
        stats.sort_unstable_by(|a, b| a.domain_name.cmp(&b.domain_name));
        stats
    }
}

/// Reads delimited rows from `input` (first row is the header) and returns
/// one [`DomainStat`] per domain, ascending by domain name.
///
/// Each skipped row is reported to `diagnostics` exactly once, tagged with its
/// 1-based line (the header is line 1). Header problems and I/O failures are
/// fatal and produce no result. Header cells are decoded leniently; only a
/// header the CSV layer cannot read is [`TallyError::HeaderUnreadable`].
pub fn tally_domain_stats<R: Read>(
    input: R,
    options: &TallyOptions,
    diagnostics: &mut dyn RowDiagnostics,
) -> Result<Vec<DomainStat>, TallyError> {
    let mut reader = io_utils::open_csv_reader(input, options.delimiter);
    let mut record = ByteRecord::new();

    let has_header = reader
        .read_byte_record(&mut record)
        .map_err(|err| TallyError::HeaderUnreadable {
            reason: err.to_string(),
        })?;
    if !has_header {
        return Err(TallyError::MissingHeader);
    }
    let headers = io_utils::decode_header(&record, options.encoding);
    let column = locate_email_column(headers.as_slice())?;

    let mut tally = DomainTally::new(options.unique);
    let mut line = 1usize;
    loop {
        line += 1;
        match reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) if err.is_io_error() => {
                return Err(TallyError::Read { line, source: err });
            }
            Err(err) => {
                diagnostics.row_skipped(RowIssue::decode(line, row_error_reason(&err)));
                continue;
            }
        }

        let field = record.get(column).unwrap_or_default();
        let raw = match io_utils::decode_bytes(field, options.encoding) {
            Ok(raw) => raw,
            Err(err) => {
                diagnostics.row_skipped(RowIssue::decode(line, err.to_string()));
                continue;
            }
        };
        match extract_parts(&raw) {
            Ok(parts) => tally.record(&parts),
            Err(err) => diagnostics.row_skipped(RowIssue::address(line, err)),
        }
    }

    Ok(tally.into_sorted())
}

fn row_error_reason(err: &csv::Error) -> String {
    match err.kind() {
        ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("wrong number of fields (expected {expected_len}, found {len})"),
        _ => err.to_string(),
    }
}
