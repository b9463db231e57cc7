//! Shared fixtures for the integration tests
#![allow(dead_code)]

use alndiff::{AlignedSequence, Alignment};
use std::io::Write;
use tempfile::NamedTempFile;

/// The four-sequence alignment used throughout the diff tests
pub fn simple_alignment() -> Alignment {
    Alignment::from_pairs([("A", "AAAAA"), ("B", "TAAAA"), ("C", "TAAAA"), ("D", "TAAAC")])
        .expect("fixture alignment is valid")
}

/// Dated swine surveillance style headers: name|state|date
pub fn dated_alignment() -> Alignment {
    Alignment::from_pairs([
        ("A|Iowa|2019-06-01", "AAAAA"),
        ("B|Iowa|2019-06-06", "AAAAA"),
        ("C|Iowa|2019-06-06", "TTAAA"),
        ("D|Iowa|2018-06-06", "AAAAA"),
    ])
    .expect("fixture alignment is valid")
}

pub fn to_fasta(sequences: &[AlignedSequence]) -> String {
    sequences
        .iter()
        .map(|s| format!(">{}\n{}\n", s.header, s.to_string()))
        .collect()
}

/// Write `contents` to a temporary file that lives as long as the handle
pub fn temp_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Rows of a table as borrowed strings, for compact assertions
pub fn str_rows(rows: &[Vec<String>]) -> Vec<Vec<&str>> {
    rows.iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect()
}
