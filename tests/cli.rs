mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

use common::data_file;

#[test]
fn test_missing_input_exits_non_zero() {
    let input = data_file("no_such_file.csv");
    cargo_bin_cmd!("migratrack")
        .args(["tracks", "--input", input.as_str()])
        .assert()
        .failure()
        .stderr(contains("no_such_file.csv"));
}

#[test]
fn test_bad_delimiter_exits_non_zero() {
    let input = data_file("scenario_a.csv");
    cargo_bin_cmd!("migratrack")
        .args(["tracks", "--input", input.as_str(), "--delimiter", "é"])
        .assert()
        .failure()
        .stderr(contains("not a single ASCII character"));
}

#[test]
fn test_tracks_prints_table() {
    let input = data_file("mixed_rules.csv");
    cargo_bin_cmd!("migratrack")
        .args(["tracks", "--input", input.as_str()])
        .assert()
        .success()
        .stdout(contains("Anser anser"))
        .stdout(contains("Points per track"));
}

#[test]
fn test_month_precision_dates_are_accepted() {
    let input = data_file("month_precision.csv");
    cargo_bin_cmd!("migratrack")
        .args(["tracks", "--input", input.as_str()])
        .assert()
        .success()
        .stdout(contains("Ciconia ciconia"));
}
