use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with HOME pointed at a scratch directory so no real
/// config file is picked up.
fn run(home: &Path, args: &[&str]) -> Output {
    let data = home.join("scores.csv");
    Command::new(env!("CARGO_BIN_EXE_class-scores"))
        .env("HOME", home)
        .env_remove("CLASS_SCORES_LOG")
        .arg("--data")
        .arg(&data)
        .args(args)
        .output()
        .expect("spawn class-scores")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn add(home: &Path, id: &str, name: &str, scores: [&str; 3]) -> Output {
    run(
        home,
        &[
            "add", "--id", id, "--name", name, "--chinese", scores[0], "--math", scores[1],
            "--english", scores[2],
        ],
    )
}

#[test]
fn add_then_list_as_json() {
    let home = TempDir::new().expect("temp dir");
    let out = add(home.path(), "001", "Mei", ["88", "92", "76"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("Saved scores for Mei"));

    let out = run(home.path(), &["list", "--format", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json");
    assert_eq!(value[0]["name"], "Mei");
    assert_eq!(value[0]["total"], 256);
}

#[test]
fn add_trims_id_and_name() {
    let home = TempDir::new().expect("temp dir");
    let out = add(home.path(), " 001 ", " Mei ", ["1", "2", "3"]);
    assert_eq!(out.status.code(), Some(0));

    let contents = std::fs::read_to_string(home.path().join("scores.csv")).expect("read");
    assert_eq!(contents, "student_id,name,chinese,math,english\n001,Mei,1,2,3\n");

    let out = run(home.path(), &["student", "Mei"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn summary_on_empty_table_prints_hint() {
    let home = TempDir::new().expect("temp dir");
    let out = run(home.path(), &["summary"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("No students yet"));
}

#[test]
fn top_respects_limit() {
    let home = TempDir::new().expect("temp dir");
    add(home.path(), "001", "A", ["50", "50", "50"]);
    add(home.path(), "002", "B", ["90", "95", "95"]);
    add(home.path(), "003", "C", ["60", "70", "70"]);

    let out = run(home.path(), &["top", "-n", "2", "--format", "tsv"]);
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    let names: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .collect();
    assert_eq!(names, vec!["B", "C"]);
}

#[test]
fn blank_name_is_a_validation_error() {
    let home = TempDir::new().expect("temp dir");
    let out = add(home.path(), "001", "  ", ["88", "92", "76"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn unknown_student_exits_with_usage_code() {
    let home = TempDir::new().expect("temp dir");
    let out = run(home.path(), &["student", "Nobody"]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn corrupt_score_file_is_a_storage_error() {
    let home = TempDir::new().expect("temp dir");
    std::fs::write(home.path().join("scores.csv"), "id,who\n1,2\n").expect("write");
    let out = run(home.path(), &["list"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn export_writes_bom_and_total() {
    let home = TempDir::new().expect("temp dir");
    add(home.path(), "001", "Mei", ["88", "92", "76"]);
    let target = home.path().join("out.csv");

    let out = run(home.path(), &["export", "--output", target.to_str().expect("utf-8 path")]);
    assert_eq!(out.status.code(), Some(0));

    let bytes = std::fs::read(&target).expect("read export");
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8_lossy(&bytes[3..]).into_owned();
    assert!(text.starts_with("student_id,name,chinese,math,english,total"));
    assert!(text.contains("001,Mei,88,92,76,256"));
}
