use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tracewalk-tests-{}-{}", prefix, nonce));
    let _ = std::fs::create_dir_all(&dir);
    dir
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_tracewalk"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Tracewalk Replayer"));
}

#[test]
fn test_cli_load_missing_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_tracewalk"))
        .arg("-p")
        .arg("non_existent_payload.json")
        .output()
        .expect("Failed to execute command");

    // It should fail because the payload is missing
    assert!(!output.status.success());
}

#[test]
fn test_cli_report_outputs() {
    let payload = std::fs::canonicalize("../../tests/fixtures/payload-ok.json").unwrap();
    let dir = temp_dir("report");
    let report_dir = dir.join("artifacts");

    let output = Command::new(env!("CARGO_BIN_EXE_tracewalk"))
        .args([
            "--payload",
            payload.to_str().unwrap(),
            "--report-dir",
            report_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());

    let report_path = report_dir.join("report.json");
    assert!(report_path.exists());

    let report_content = std::fs::read_to_string(&report_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&report_content).unwrap();

    assert_eq!(report["status"], "pass");
    assert_eq!(report["steps"], 4);
    assert_eq!(report["blocks"], 4);
    assert_eq!(report["interactive"], true);
    assert_eq!(report["profile"], "x86_64-att");
    assert!(report["payload_hash"].as_str().is_some());
    assert!(report["payload"]
        .as_str()
        .unwrap()
        .contains("payload-ok.json"));

    let views = report["views"].as_array().unwrap();
    assert_eq!(views.len(), 4);
    assert_eq!(views[1]["added"][0], "x");
    assert_eq!(views[3]["active_block"]["label"], "assign x");

    // Clean up
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_cli_failed_compilation_exits_nonzero() {
    let payload = std::fs::canonicalize("../../tests/fixtures/payload-failed.json").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tracewalk"))
        .args(["--payload", payload.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Compilation failed"));
}

#[test]
fn test_cli_custom_profile() {
    let payload = std::fs::canonicalize("../../tests/fixtures/payload-ok.json").unwrap();
    let dir = temp_dir("profile");

    // Same dialect under a different name; the report records it.
    let profile_path = dir.join("profile.yaml");
    std::fs::write(
        &profile_path,
        r##"
name: "x86_64-att-lab"
step_marker: "# SNAPIDX"
entry_function: "main"
print_intrinsics: ["printf"]
call_mnemonic: "call"
frame_push: "pushq %rbp"
frame_setup: "movq %rsp, %rbp"
global_directive: ".globl"
"##,
    )
    .unwrap();

    let report_dir = dir.join("artifacts");
    let output = Command::new(env!("CARGO_BIN_EXE_tracewalk"))
        .args([
            "--payload",
            payload.to_str().unwrap(),
            "--profile",
            profile_path.to_str().unwrap(),
            "--report-dir",
            report_dir.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_dir.join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["profile"], "x86_64-att-lab");

    let _ = std::fs::remove_dir_all(&dir);
}
