use assert_cmd::Command;
use predicates::prelude::*;

fn stream() -> String {
    let options = r#"{"t":5,"module_mode":true,"debug_mode":false}"#;
    let module = r#"{"t":4,"mod":{"moduleName":"m","moduleRequests":["./a.js"]}}"#;
    let function = r#"{"t":0,"fb":{"n":"foo","s":{"p":1},"r":3}}"#;
    format!("${options}$${module}$${function}$")
}

#[test]
fn compiles_a_stream_to_a_json_program() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("out.abc");
    std::fs::write(&input, stream()).unwrap();

    Command::cargo_bin("abcgen")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let emitted = std::fs::read_to_string(&output).unwrap();
    let program: serde_json::Value = serde_json::from_str(&emitted).unwrap();
    assert!(program["function_table"]["foo"].is_object());
    assert!(program["record_table"]["_ESModuleRecord"].is_object());
    assert!(program["literalarray_table"]["0"].is_object());
}

#[test]
fn empty_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    let output = dir.path().join("out.abc");
    std::fs::write(&input, "").unwrap();

    Command::cargo_bin("abcgen")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn input_is_required_without_pipe_mode() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("abcgen")
        .unwrap()
        .arg("-o")
        .arg(dir.path().join("out.abc"))
        .assert()
        .failure();
}

#[test]
fn corrupt_stream_fails_with_fragment() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("out.abc");
    std::fs::write(&input, "$not json$").unwrap();

    Command::cargo_bin("abcgen")
        .unwrap()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not json"));
}
