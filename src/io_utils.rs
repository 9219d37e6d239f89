//! I/O helpers for input streams, CSV readers and writers, and decoding.
//!
//! - **Delimiter resolution**: `.tsv` inputs default to tab, everything else
//!   to comma, unless the caller passes one explicitly.
//! - **Encoding**: fields are decoded through `encoding_rs`, defaulting to
//!   UTF-8.
//! - **stdin/stdout**: the `-` path routes through the standard streams.
//!
//! Readers are built without header handling; the tally engine reads the
//! header row itself so that it can tell an empty input from a bad header.

use std::{
    borrow::Cow,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::error::DecodeError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Output delimiter: explicit choice first, then a `.csv`/`.tsv` extension on
/// the output path, then `fallback` (usually the input delimiter).
pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delimiter) = provided {
        return delimiter;
    }
    match path
        .filter(|p| !is_dash(p))
        .and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
    {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(reader)
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    Ok(writer)
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).double_quote(true);
    Ok(builder.from_writer(open_output(path)?))
}

pub fn decode_bytes<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> Result<Cow<'a, str>, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(DecodeError {
            encoding: encoding.name(),
        })
    } else {
        Ok(text)
    }
}

/// Decodes every field of a header row. Malformed sequences become U+FFFD
/// instead of failing, so one odd byte in an unrelated column cannot hide
/// the e-mail column.
pub fn decode_header(record: &csv::ByteRecord, encoding: &'static Encoding) -> Vec<String> {
    record
        .iter()
        .map(|field| encoding.decode(field).0.into_owned())
        .collect()
}
