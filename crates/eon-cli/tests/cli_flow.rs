//! End-to-end tests for the import → convert → check flow.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn eon_binary() -> String {
    env!("CARGO_BIN_EXE_eon").to_string()
}

fn run_eon(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(eon_binary())
        .env("HOME", home)
        .args(args)
        .output()
        .expect("failed to run eon")
}

const SAMPLE_CSV: &str = "eventId,title,start,end,type,category,color,isParent,parentId\n\
P1,Degree,2015-09-01,2019-06-30,range,studies,#101010,true,\n\
C1,Thesis,2018-09-01,2019-05-31,range,studies,#202020,false,P1\n\
M1,Defense,2019-05-20,2019-05-20,milestone,studies,#303030,false,C1\n";

#[test]
fn import_reports_counts() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.csv");
    fs::write(&input, SAMPLE_CSV).unwrap();

    let output = run_eon(temp.path(), &["import", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("imported 3 event(s)"), "{stdout}");
}

#[test]
fn import_json_summary_is_parseable() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.csv");
    fs::write(&input, SAMPLE_CSV).unwrap();

    let output = run_eon(temp.path(), &["import", input.to_str().unwrap(), "--json"]);
    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary should be valid JSON");
    assert_eq!(summary["events"], 3);
    assert_eq!(summary["rejected"], 0);
}

#[test]
fn import_surfaces_row_warnings_without_failing() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.csv");
    fs::write(
        &input,
        "eventId,title,start,parentId\nA,Good,2023-01-01,\nB,Orphan,2023-02-01,GHOST\n,NoId,2023-03-01,\n",
    )
    .unwrap();

    let output = run_eon(temp.path(), &["import", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("imported 2 event(s)"), "{stdout}");
    assert!(stdout.contains("1 row(s) rejected"), "{stdout}");
    assert!(stderr.contains("GHOST"), "{stderr}");
}

#[test]
fn import_fails_on_malformed_csv() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.csv");
    fs::write(&input, "eventId,title\nE1,\"unclosed\n").unwrap();

    let output = run_eon(temp.path(), &["import", input.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse"), "{stderr}");
}

#[test]
fn convert_csv_to_yaml_and_back() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.csv");
    let as_yaml = temp.path().join("events.yaml");
    let back = temp.path().join("back.csv");
    fs::write(&input, SAMPLE_CSV).unwrap();

    let output = run_eon(
        temp.path(),
        &[
            "convert",
            input.to_str().unwrap(),
            as_yaml.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let yaml_text = fs::read_to_string(&as_yaml).unwrap();
    assert!(yaml_text.contains("eventId: P1"));
    assert!(yaml_text.contains("parentId: C1"));
    // CSV input gets a synthesized category table.
    assert!(yaml_text.contains("id: studies"));

    let output = run_eon(
        temp.path(),
        &["convert", as_yaml.to_str().unwrap(), back.to_str().unwrap()],
    );
    assert!(output.status.success());

    let round = fs::read_to_string(&back).unwrap();
    assert_eq!(round.lines().count(), 4); // header + 3 events
    assert!(round.contains("M1,Defense,milestone,2019-05-20,2019-05-20"), "{round}");
}

#[test]
fn convert_multiline_metadata_survives_reimport() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.yaml");
    let as_csv = temp.path().join("events.csv");
    fs::write(
        &input,
        "events:\n  - eventId: N1\n    title: Notes\n    type: milestone\n    start: 2023-01-01\n    color: '#222222'\n    metadata: \"line one\\nline two\"\n",
    )
    .unwrap();

    let output = run_eon(
        temp.path(),
        &["convert", input.to_str().unwrap(), as_csv.to_str().unwrap()],
    );
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    // The tool must be able to read its own output back.
    let output = run_eon(temp.path(), &["import", as_csv.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("imported 1 event(s)"), "{stdout}");
}

#[test]
fn check_samples_pass() {
    let temp = TempDir::new().unwrap();
    let output = run_eon(temp.path(), &["check"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("parent-chain (csv): ok"), "{stdout}");
    assert!(stdout.contains("geographic (yaml): ok"), "{stdout}");
}

#[test]
fn check_file_roundtrip_passes() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.csv");
    fs::write(&input, SAMPLE_CSV).unwrap();

    let output = run_eon(
        temp.path(),
        &["check", input.to_str().unwrap(), "--format", "csv"],
    );
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn rows_shows_lane_collision_resolution() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.csv");
    // Two overlapping ranges in one category: rows 0 and 1.
    fs::write(
        &input,
        "eventId,title,start,end,type,category\n\
         A,First,2023-01-01,2023-01-10,range,work\n\
         B,Second,2023-01-05,2023-01-20,range,work\n",
    )
    .unwrap();

    let output = run_eon(temp.path(), &["rows", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("row 0: A"), "{stdout}");
    assert!(stdout.contains("row 1: B"), "{stdout}");
}

#[test]
fn axis_prints_window_and_scale() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("events.yaml");
    fs::write(
        &input,
        "timeline:\n  start: 2023-01-01\n  end: 2023-01-10\nevents:\n  - eventId: E1\n    title: Short\n    type: milestone\n    start: 2023-01-05\n    color: '#111111'\n",
    )
    .unwrap();

    let output = run_eon(temp.path(), &["axis", input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("window: 2023-01-01 .. 2023-01-10"), "{stdout}");
    assert!(stdout.contains("Day"), "{stdout}");
}
