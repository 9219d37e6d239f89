use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{report::ReportFormat, tally::UniqueMode};

#[derive(Debug, Parser)]
#[command(author, version, about = "Count customers per e-mail domain in CSV files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tally e-mail addresses per domain, sorted by domain name
    Tally(TallyArgs),
    /// Show which header column would be read as the e-mail column
    Locate(LocateArgs),
}

#[derive(Debug, Args)]
pub struct TallyArgs {
    /// Input CSV file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter for csv output (defaults from the output extension, then the input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Count distinct addresses per domain
    #[arg(long, value_enum, default_value = "off")]
    pub unique: UniqueMode,
    /// Report format
    #[arg(long, value_enum, default_value = "table")]
    pub format: ReportFormat,
}

#[derive(Debug, Args)]
pub struct LocateArgs {
    /// Input CSV file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
