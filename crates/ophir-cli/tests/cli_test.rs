use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const UNIT: &str = r#"{
    "name": "builtin.module",
    "regions": [{ "blocks": [{ "operations": [
        {
            "name": "arith.constant",
            "results": [{ "id": 0, "ty": { "Integer": 32 } }],
            "attributes": { "value": { "Integer": [7, { "Integer": 32 }] } },
            "location": { "FileLineCol": { "file": "unit.mlir", "line": 1, "column": 1 } }
        }
    ] }] }]
}"#;

const RENDERED: &str = "\"builtin.module\"() ({\n  %0 = \"arith.constant\"() {value = 7 : i32} : () -> i32\n}) : () -> ()\n";

fn write_unit() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("unit.json");
    fs::write(&input, UNIT).unwrap();
    (dir, input)
}

fn ophir() -> Command {
    Command::cargo_bin("ophir").unwrap()
}

#[test]
fn test_print_to_stderr() {
    let (_dir, input) = write_unit();

    ophir()
        .arg("print")
        .arg(&input)
        .args(["--label", "before-opt"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains(format!(
            "// -----// IR Dump before-opt //----- //\n{}",
            RENDERED
        )));
}

#[test]
fn test_print_to_file() {
    let (dir, input) = write_unit();
    let output = dir.path().join("dump.mlir");

    ophir()
        .arg("print")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        format!("// -----// IR Dump //----- //\n{}", RENDERED)
    );
}

#[test]
fn test_print_to_unwritable_path_fails() {
    let (dir, input) = write_unit();
    let output = dir.path().join("missing").join("dump.mlir");

    ophir()
        .arg("print")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not open file"));

    assert!(!output.exists());
}

#[test]
fn test_run_pipeline() {
    let (_dir, input) = write_unit();

    ophir()
        .arg("run")
        .arg(&input)
        .args([
            "--pass-pipeline",
            "print-ir{label=before print-debuginfo},strip-debuginfo,print-ir{label=after print-debuginfo}",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("// -----// IR Dump before //----- //"))
        .stderr(predicate::str::contains("loc(\"unit.mlir\":1:1)"))
        .stderr(predicate::str::contains("// -----// IR Dump after //----- //"));
}

#[test]
fn test_run_continues_after_failure_and_reports_stats() {
    let (dir, input) = write_unit();

    ophir()
        .current_dir(dir.path())
        .arg("run")
        .arg(&input)
        .args([
            "--pass-pipeline",
            "print-ir{label=first file-name=missing/dump.mlir},print-ir{label=second}",
            "--continue-on-failure",
            "--stats",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Pass statistics"))
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("ok"))
        .stderr(predicate::str::contains("Could not open file"))
        .stderr(predicate::str::contains("// -----// IR Dump second //----- //"));

    assert!(!dir.path().join("missing").exists());
}

#[test]
fn test_run_halts_at_first_failure_by_default() {
    let (dir, input) = write_unit();

    ophir()
        .current_dir(dir.path())
        .arg("run")
        .arg(&input)
        .args([
            "--pass-pipeline",
            "print-ir{label=first file-name=missing/dump.mlir},print-ir{label=second}",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not open file"))
        .stderr(predicate::str::contains("IR Dump second").not());
}

#[test]
fn test_run_rejects_unknown_pass() {
    let (_dir, input) = write_unit();

    ophir()
        .arg("run")
        .arg(&input)
        .args(["--pass-pipeline", "canonicalize"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown pass: canonicalize"));
}

#[test]
fn test_list_passes() {
    ophir()
        .arg("list-passes")
        .assert()
        .success()
        .stdout(predicate::str::contains("print-ir"))
        .stdout(predicate::str::contains("strip-debuginfo"));
}
