//! Rendering of tally results as a text table, CSV, or JSON.

use std::{fmt::Write as _, io::Write, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::{io_utils, tally::DomainStat};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Aligned text columns
    #[default]
    Table,
    /// Delimited rows with a header
    Csv,
    /// Pretty-printed JSON array
    Json,
}

pub fn report_headers(unique: bool) -> Vec<String> {
    let mut headers = vec!["domain".to_string(), "addresses".to_string()];
    if unique {
        headers.push("unique_addresses".to_string());
    }
    headers
}

pub fn report_rows(stats: &[DomainStat], unique: bool) -> Vec<Vec<String>> {
    stats
        .iter()
        .map(|stat| {
            let mut row = vec![stat.domain_name.clone(), stat.address_count.to_string()];
            if unique {
                row.push(stat.unique_address_count.unwrap_or_default().to_string());
            }
            row
        })
        .collect()
}

/// Lays out `rows` under `headers`. The first column is left-aligned; the
/// count columns are right-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_line(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row, &widths));
    }
    output
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths.iter().copied())
        .enumerate()
        .map(|(idx, (cell, width))| {
            if idx == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

/// Writes `stats` to `output` (stdout when `None` or `-`).
pub fn write_report(
    stats: &[DomainStat],
    format: ReportFormat,
    unique: bool,
    output: Option<&Path>,
    delimiter: u8,
) -> Result<()> {
    match format {
        ReportFormat::Table => {
            let rendered = render_table(&report_headers(unique), &report_rows(stats, unique));
            let mut writer = io_utils::open_output(output)?;
            writer
                .write_all(rendered.as_bytes())
                .context("Writing table output")?;
            writer.flush().context("Flushing table output")?;
        }
        ReportFormat::Csv => {
            let mut writer = io_utils::open_csv_writer(output, delimiter)?;
            writer
                .write_record(report_headers(unique))
                .context("Writing output headers")?;
            for (idx, row) in report_rows(stats, unique).iter().enumerate() {
                writer
                    .write_record(row)
                    .with_context(|| format!("Writing output row {}", idx + 2))?;
            }
            writer.flush().context("Flushing output writer")?;
        }
        ReportFormat::Json => {
            let mut writer = io_utils::open_output(output)?;
            serde_json::to_writer_pretty(&mut writer, stats).context("Writing JSON output")?;
            writeln!(writer).context("Writing JSON output")?;
            writer.flush().context("Flushing JSON output")?;
        }
    }
    Ok(())
}
