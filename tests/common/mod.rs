#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const FIXTURE_DOMAINS: usize = 500;
pub const FIXTURE_ADDRESSES: usize = 3000;
/// Input lines (header is line 1) holding an address that does not parse.
pub const FIXTURE_BAD_LINES: [usize; 2] = [1002, 2003];

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Domain number `idx` of the customers fixture, e.g. `shop007.example`.
pub fn fixture_domain(idx: usize) -> String {
    format!("shop{idx:03}.example")
}

/// Builds a customers CSV with [`FIXTURE_ADDRESSES`] valid addresses spread
/// evenly over [`FIXTURE_DOMAINS`] domains, plus one unparseable address on
/// each of [`FIXTURE_BAD_LINES`].
///
/// Every third address writes its domain in upper case and every fifth uses
/// a display name, so the tally has to normalize and parse both forms.
pub fn customers_csv() -> String {
    let mut csv = String::from("id,first_name,last_name,email,gender,ip_address\n");
    let mut valid = 0usize;
    let total_rows = FIXTURE_ADDRESSES + FIXTURE_BAD_LINES.len();
    for line in 2..total_rows + 2 {
        let id = line - 1;
        if FIXTURE_BAD_LINES.contains(&line) {
            csv.push_str(&format!(
                "{id},Broken,Row,an invalid address,Female,10.0.0.{}\n",
                id % 256
            ));
            continue;
        }
        let mut domain = fixture_domain(valid % FIXTURE_DOMAINS);
        if valid % 3 == 0 {
            domain = domain.to_uppercase();
        }
        let address = if valid % 5 == 0 {
            format!("\"\"\"Customer {valid}\"\" <customer{valid}@{domain}>\"")
        } else {
            format!("customer{valid}@{domain}")
        };
        csv.push_str(&format!(
            "{id},First{valid},Last{valid},{address},Male,10.0.0.{}\n",
            id % 256
        ));
        valid += 1;
    }
    csv
}
