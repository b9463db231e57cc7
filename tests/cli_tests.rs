//! End-to-end runs of the `alndiff` binary
mod common;

use assert_cmd::Command;
use common::temp_file;
use predicates::prelude::*;
use std::io::Write;
use std::process::{self, Stdio};

const SIMPLE: &str = ">A\nAAAAA\n>B\nTAAAA\n>C\nTAAAA\n>D\nTAAAC\n";

const DATED: &str = "\
>A|Iowa|2019-06-01
AAAAA
>B|Iowa|2019-06-06
AAAAA
>C|Iowa|2019-06-06
TTAAA
>D|Iowa|2018-06-06
AAAAA
";

fn alndiff() -> Command {
    let mut cmd = Command::cargo_bin("alndiff").expect("binary is built");
    cmd.env_remove("ALNDIFF_LOG").env_remove("ALNDIFF_CONFIG");
    cmd
}

#[test]
fn test_diff_from_file() {
    let input = temp_file(SIMPLE, ".fasta");
    alndiff()
        .arg("diff")
        .arg(input.path())
        .assert()
        .success()
        .stdout("site\tA\tB\tC\tD\n1\tA\tT\tT\tT\n5\tA\t\t\tC\n");
}

#[test]
fn test_diff_from_stdin_with_reference() {
    alndiff()
        .args(["diff", "--reference", "B"])
        .write_stdin(SIMPLE)
        .assert()
        .success()
        .stdout("site\tRef\tA\tC\tD\n1\tT\tA\t\t\n5\tA\t\t\tC\n");
}

#[test]
fn test_diff_with_annotation_table() {
    let input = temp_file(SIMPLE, ".fasta");
    let notes = temp_file("site\tregion\n5\tCa\n", ".tsv");
    alndiff()
        .arg("diff")
        .arg(input.path())
        .arg("--annotation-tables")
        .arg(notes.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("site\tA\tB\tC\tD\tregion\n"))
        .stdout(predicate::str::contains("5\tA\t\t\tC\tCa\n"));
}

#[test]
fn test_annotate_emits_every_column() {
    let notes = temp_file("site\tregion\n2\tloop\n", ".tsv");
    let output = alndiff()
        .args(["annotate", "-", "--annotation-tables"])
        .arg(notes.path())
        .write_stdin(SIMPLE)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[2], "2\tA\t\t\t\tloop");
}

#[test]
fn test_represent_writes_kept_fasta() {
    alndiff()
        .args(["represent", "--max-day-sep", "5"])
        .write_stdin(DATED)
        .assert()
        .success()
        .stdout(">B|Iowa|2019-06-06\nAAAAA\n>D|Iowa|2018-06-06\nAAAAA\n");
}

#[test]
fn test_represent_print_groups() {
    alndiff()
        .args(["represent", "--max-day-sep", "5", "--print-groups"])
        .write_stdin(DATED)
        .assert()
        .success()
        .stdout(
            "B|Iowa|2019-06-06\nA|Iowa|2019-06-01\nC|Iowa|2019-06-06\n\nD|Iowa|2018-06-06\n\n",
        );
}

#[test]
fn test_represent_json() {
    let output = alndiff()
        .args(["represent", "--max-day-sep", "5", "--json"])
        .write_stdin(DATED)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["kept"], 2);
    assert_eq!(json["groups"][1]["representative"], "D|Iowa|2018-06-06");
    assert_eq!(json["params"]["max_day_sep"], 5);
}

#[test]
fn test_unequal_lengths_exit_code() {
    alndiff()
        .arg("diff")
        .write_stdin(">a\nAAAA\n>b\nAAA\n")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_invalid_threshold_exit_code() {
    alndiff()
        .args(["represent", "--min-pident-sep", "1.5"])
        .write_stdin(DATED)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("min_pident_sep"));
}

#[test]
fn test_missing_input_exit_code() {
    alndiff()
        .args(["diff", "/nonexistent/alignment.fasta"])
        .assert()
        .code(3);
}

#[test]
fn test_config_file_sets_defaults() {
    let config = temp_file("[represent]\nmax_day_sep = 5\n", ".toml");
    alndiff()
        .arg("--config")
        .arg(config.path())
        .arg("represent")
        .write_stdin(DATED)
        .assert()
        .success()
        .stdout(predicate::str::contains(">D|Iowa|2018-06-06"));
}

#[test]
fn test_invalid_config_exit_code() {
    let config = temp_file("[alignment]\ngap_char = \" \"\n", ".toml");
    alndiff()
        .arg("--config")
        .arg(config.path())
        .arg("diff")
        .write_stdin(SIMPLE)
        .assert()
        .code(2);
}

#[test]
fn test_config_command_prints_defaults() {
    alndiff()
        .args(["config", "--defaults"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[represent]"))
        .stdout(predicate::str::contains("min_pident_sep = 1.0"))
        .stdout(predicate::str::contains("gap_char = \"-\""));
}

/// Run the binary with its stdout closed before anything is read.
fn run_with_closed_stdout(args: &[&str]) -> process::Output {
    let mut child = process::Command::new(assert_cmd::cargo::cargo_bin("alndiff"))
        .args(args)
        .env_remove("ALNDIFF_LOG")
        .env_remove("ALNDIFF_CONFIG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn alndiff");
    drop(child.stdout.take());
    child.wait_with_output().expect("Failed to wait for alndiff")
}

#[test]
fn test_closed_stdout_is_not_an_error() {
    // wide enough that the table cannot fit in the pipe buffer
    let width = 200_000;
    let fasta = format!(">ref\n{}\n>query\n{}\n", "A".repeat(width), "C".repeat(width));
    let input = temp_file(&fasta, ".fasta");
    let path = input.path().to_str().unwrap();

    for args in [vec!["diff", path], vec!["annotate", path], vec!["config", "--defaults"]] {
        let output = run_with_closed_stdout(&args);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(output.status.code(), Some(0), "{:?}: {}", args, stderr);
        assert!(!stderr.contains("panicked"), "{:?}: {}", args, stderr);
    }
}

const PARTLY_DATED: &str = "\
>A|Iowa|2019-06-01
AAAAA
>B|Iowa
AAAAA
>C|Iowa|2019-06-03
AAAAT
";

#[test]
fn test_day_window_warns_about_undated_headers() {
    let output = alndiff()
        .args(["represent", "--max-day-sep", "5"])
        .write_stdin(PARTLY_DATED)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "1 sequences have no YYYY-MM-DD date in their header",
        ))
        .get_output()
        .stdout
        .clone();

    let kept = alndiff::bio::fasta::parse_fasta_from_bytes(&output).unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].header, "C|Iowa|2019-06-03");
}

#[test]
fn test_no_warning_without_day_window() {
    alndiff()
        .arg("represent")
        .write_stdin(PARTLY_DATED)
        .assert()
        .success()
        .stderr(predicate::str::contains("YYYY-MM-DD").not())
        .stdout(predicate::str::starts_with(">C|Iowa|2019-06-03\n"));
}

#[test]
fn test_diff_reads_gzipped_alignment() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let file = tempfile::Builder::new()
        .suffix(".fasta.gz")
        .tempfile()
        .unwrap();
    let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
    encoder.write_all(SIMPLE.as_bytes()).unwrap();
    encoder.finish().unwrap();

    alndiff()
        .arg("diff")
        .arg(file.path())
        .assert()
        .success()
        .stdout("site\tA\tB\tC\tD\n1\tA\tT\tT\tT\n5\tA\t\t\tC\n");
}

#[test]
fn test_no_same_state_flag_overrides_config() {
    let config = temp_file("[represent]\nsame_state = true\n", ".toml");
    let mixed = ">A|Iowa|2020-01-01\nACGT\n>B|Ohio|2020-01-02\nACGT\n";

    alndiff()
        .arg("--config")
        .arg(config.path())
        .arg("represent")
        .write_stdin(mixed)
        .assert()
        .success()
        .stdout(predicate::str::contains(">A|Iowa").and(predicate::str::contains(">B|Ohio")));

    alndiff()
        .arg("--config")
        .arg(config.path())
        .args(["represent", "--no-same-state"])
        .write_stdin(mixed)
        .assert()
        .success()
        .stdout(">B|Ohio|2020-01-02\nACGT\n");
}
