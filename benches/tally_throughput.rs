use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use domain_tally::diagnostics::CollectedDiagnostics;
use domain_tally::tally::{TallyOptions, UniqueMode, tally_domain_stats};
use tempfile::TempDir;

fn generate_customers(rows: usize, domains: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("customers.csv");
    let mut file = BufWriter::new(File::create(&csv_path).expect("create csv"));
    writeln!(file, "id,first_name,last_name,email,gender").expect("header");
    for i in 0..rows {
        let domain = i % domains;
        let email = match i % 4 {
            0 => format!("\"\"\"Customer {i}\"\" <user{i}@Domain{domain}.example>\""),
            1 => format!("user{i}@domain{domain}.example"),
            2 => format!("<User.{i}@domain{domain}.example>"),
            _ => format!("\"\"\"quoted@{i}\"\"@domain{domain}.example\""),
        };
        writeln!(file, "{i},First{i},Last{i},{email},F").expect("row");
    }
    file.flush().expect("flush csv");
    (temp_dir, csv_path)
}

fn bench_tally(c: &mut Criterion) {
    let (temp_dir, csv_path) = generate_customers(200_000, 5_000);

    let mut group = c.benchmark_group("tally_domain_stats");
    group.sample_size(20);

    for (name, unique) in [
        ("counts_only", UniqueMode::Off),
        ("unique_ignore_case", UniqueMode::IgnoreCase),
    ] {
        let options = TallyOptions {
            unique,
            ..TallyOptions::default()
        };
        group.bench_function(name, |b| {
            b.iter_batched(
                || BufReader::new(File::open(&csv_path).expect("open csv")),
                |input| {
                    let mut diagnostics = CollectedDiagnostics::new();
                    tally_domain_stats(input, &options, &mut diagnostics).expect("tally")
                },
                BatchSize::SmallInput,
            );
        });
    }

    drop(temp_dir);
    group.finish();
}

criterion_group!(benches, bench_tally);
criterion_main!(benches);
