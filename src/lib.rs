pub mod address;
pub mod cli;
pub mod columns;
pub mod diagnostics;
pub mod error;
pub mod io_utils;
pub mod report;
pub mod tally;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, LocateArgs, TallyArgs},
    diagnostics::{LogDiagnostics, RowDiagnostics},
    tally::TallyOptions,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("domain_tally", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Tally(args) => handle_tally(&args),
        Commands::Locate(args) => handle_locate(&args),
    }
}

fn handle_tally(args: &TallyArgs) -> Result<()> {
    let options = TallyOptions {
        delimiter: io_utils::resolve_input_delimiter(&args.input, args.delimiter),
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        unique: args.unique,
    };
    info!(
        "Tallying e-mail domains in '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(options.delimiter)
    );
    debug!("Tally options: {:?}", options);

    let input = io_utils::open_input(&args.input)?;
    let mut diagnostics = LogDiagnostics::new();
    let stats = tally::tally_domain_stats(input, &options, &mut diagnostics)
        .with_context(|| format!("Tallying domains in {:?}", args.input))?;

    let output_delimiter = io_utils::resolve_output_delimiter(
        args.output.as_deref(),
        args.output_delimiter,
        options.delimiter,
    );
    report::write_report(
        &stats,
        args.format,
        options.unique.is_enabled(),
        args.output.as_deref(),
        output_delimiter,
    )?;

    let addresses: usize = stats.iter().map(|stat| stat.address_count).sum();
    info!(
        "Counted {} address(es) across {} domain(s); skipped {} row(s)",
        addresses,
        stats.len(),
        diagnostics.skipped()
    );
    Ok(())
}

fn handle_locate(args: &LocateArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let input = io_utils::open_input(&args.input)?;
    let mut reader = io_utils::open_csv_reader(input, delimiter);

    let mut record = csv::ByteRecord::new();
    let has_header = reader
        .read_byte_record(&mut record)
        .with_context(|| format!("Reading header row of {:?}", args.input))?;
    if !has_header {
        return Err(anyhow!("{:?} is empty; expected a header row", args.input));
    }
    let headers = io_utils::decode_header(&record, encoding);
    let column = columns::locate_email_column(headers.as_slice())
        .with_context(|| format!("Locating e-mail column in {:?}", args.input))?;

    println!("{column}\t{}", headers[column]);
    debug!("Scanned {} header(s)", headers.len());
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
