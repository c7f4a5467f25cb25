//! Command-line behavior of the `genhost` and `genhost-stub` binaries.

use assert_cmd::assert::OutputAssertExt;
use genhost::protocol::{BuildId, SentinelFrame, decode};
use predicates::prelude::*;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn genhost_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("genhost"));
    cmd.stdin(Stdio::null());
    cmd
}

fn stub_cmd(project: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("genhost-stub"));
    cmd.stdin(Stdio::null())
        .arg("--project-dir")
        .arg(project.path())
        .args(["--output-path", "obj/gen"]);
    cmd
}

#[test]
fn help_lists_subcommands() {
    genhost_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("worker"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn worker_requires_project_dir() {
    genhost_cmd()
        .args(["worker", "--build-id", "b1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--project-dir"));
}

#[test]
fn worker_without_generators_prints_no_frame() {
    let project = TempDir::new().unwrap();
    genhost_cmd()
        .arg("worker")
        .arg("--project-dir")
        .arg(project.path())
        .args(["--build-id", "b1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+++++++++++++b1").not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn stub_worker_prints_framed_result() {
    let project = TempDir::new().unwrap();
    let output = stub_cmd(&project)
        .args(["--build-id", "cli_b1", "--generators", "stub:two-tasks"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let frame = SentinelFrame::for_build(&BuildId::new("cli_b1").unwrap());
    let result = decode(frame.extract(&stdout).unwrap()).unwrap();
    assert_eq!(result.generated_code_files, vec!["a.cs".to_string()]);
}

#[test]
fn stub_worker_rejects_invalid_build_id() {
    let project = TempDir::new().unwrap();
    stub_cmd(&project)
        .args(["--build-id", "a+++++++++++++b", "--generators", "stub:two-tasks"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("genhost worker:"));
}

#[test]
fn stub_worker_honours_disabled_configuration() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("codegen.json"),
        r#"{ "CodeGenerator": { "Disabled": true } }"#,
    )
    .unwrap();

    stub_cmd(&project)
        .args(["--build-id", "cli_b2", "--generators", "stub:write-files"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+++++++++++++cli_b2").not());
    assert!(!project.path().join("obj/gen/Root.g.cs").exists());
}

#[test]
fn stub_worker_writes_run_log_when_configured() {
    let project = TempDir::new().unwrap();
    std::fs::write(
        project.path().join("appsettings.json"),
        r#"{ "Logging": {}, "codeGenerator": { "logging": true } }"#,
    )
    .unwrap();

    stub_cmd(&project)
        .args(["--build-id", "cli_b3", "--generators", "stub:two-tasks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+++++++++++++cli_b3"));

    let log = std::fs::read_to_string(project.path().join("obj/gen/genhost.log")).unwrap();
    assert!(log.contains("--generators stub:two-tasks"));
}

#[test]
fn run_with_no_generators_reports_empty() {
    let project = TempDir::new().unwrap();
    genhost_cmd()
        .arg("run")
        .arg("--project-dir")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome": "empty""#));
}

#[test]
fn run_with_stub_worker_reports_success() {
    let project = TempDir::new().unwrap();
    genhost_cmd()
        .arg("run")
        .arg("--project-dir")
        .arg(project.path())
        .args(["--output-path", "obj/gen", "--generators", "stub:two-tasks"])
        .arg("--worker")
        .arg(assert_cmd::cargo::cargo_bin!("genhost-stub"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""outcome": "success""#))
        .stdout(predicate::str::contains("a.cs"));
}

#[test]
fn run_with_failing_worker_exits_with_worker_failure() {
    let project = TempDir::new().unwrap();
    genhost_cmd()
        .arg("run")
        .arg("--project-dir")
        .arg(project.path())
        .args(["--generators", "stub:stderr"])
        .arg("--worker")
        .arg(assert_cmd::cargo::cargo_bin!("genhost-stub"))
        .assert()
        .code(3)
        .stdout(predicate::str::contains(r#""outcome": "failed""#));
}

#[test]
fn run_with_missing_worker_exits_with_spawn_failure() {
    let project = TempDir::new().unwrap();
    genhost_cmd()
        .arg("run")
        .arg("--project-dir")
        .arg(project.path())
        .args(["--generators", "stub:two-tasks"])
        .args(["--worker", "/nonexistent/genhost-worker"])
        .assert()
        .code(4);
}
