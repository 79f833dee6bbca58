//! Integration tests for the abridge CLI (attach, probe, config)

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::net::TcpListener;
use tempfile::TempDir;

const ABRIDGE_VARS: &[&str] = &[
    "ABRIDGE_PORT",
    "ABRIDGE_LISTENER",
    "ABRIDGE_CONFIG_PATH",
    "ABRIDGE_HOST",
    "ABRIDGE_PYTHON",
    "ABRIDGE_SESSION_PID",
    "ABRIDGE_LOG",
];

/// Isolate the command from the operator's environment and config files
fn isolated_cmd(temp_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("abridge");
    cmd.env("HOME", temp_dir.path())
        .env("USERPROFILE", temp_dir.path())
        .env("ABRIDGE_HOME", temp_dir.path())
        .current_dir(temp_dir.path());
    for var in ABRIDGE_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Temp dir marked as a git root so config discovery stops there
fn workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join(".git")).unwrap();
    temp_dir
}

#[test]
fn test_attach_writes_launch_file() {
    let temp_dir = workspace();

    isolated_cmd(&temp_dir)
        .args(["attach", "--pid", "4321", "--port", "5678", "--no-listener"])
        .assert()
        .success()
        .stdout(predicate::str::contains("launch.json"))
        .stdout(predicate::str::contains("3 created"))
        .stdout(predicate::str::contains("skipped"))
        .stdout(predicate::str::contains("Python + Native: Attach to Session"));

    let path = temp_dir.path().join(".vscode/launch.json");
    let doc: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(doc["configurations"].as_array().unwrap().len(), 3);
    assert_eq!(doc["compounds"].as_array().unwrap().len(), 1);
    assert_eq!(doc["configurations"][1]["pid"], 4321);
}

#[test]
fn test_attach_json_output() {
    let temp_dir = workspace();
    let target = temp_dir.path().join("ide/launch.json");

    let output = isolated_cmd(&temp_dir)
        .args(["attach", "--pid", "4321", "--no-listener", "--json", "--config-path"])
        .arg(&target)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["pid"], 4321);
    assert_eq!(report["port"], 5678);
    assert_eq!(report["listener"], "skipped");
    assert_eq!(report["outcome"], "created");
    assert_eq!(report["summary"]["compounds"]["created"], 1);
    assert!(report["next_action"].as_str().unwrap().contains("start it"));
    assert!(target.exists());
}

#[test]
fn test_attach_twice_reports_up_to_date() {
    let temp_dir = workspace();
    let args = ["attach", "--pid", "4321", "--no-listener"];

    isolated_cmd(&temp_dir).args(args).assert().success();
    let first = fs::read(temp_dir.path().join(".vscode/launch.json")).unwrap();

    isolated_cmd(&temp_dir)
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
    let second = fs::read(temp_dir.path().join(".vscode/launch.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_attach_invalid_pid_fails_without_writing() {
    let temp_dir = workspace();

    isolated_cmd(&temp_dir)
        .args(["attach", "--pid=-1", "--no-listener"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: failed to validate input"))
        .stderr(predicate::str::contains("hint:"));

    assert!(!temp_dir.path().join(".vscode").exists());
}

#[test]
fn test_attach_invalid_port_fails() {
    let temp_dir = workspace();

    isolated_cmd(&temp_dir)
        .args(["attach", "--pid", "4321", "--port", "70000", "--no-listener"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid port 70000"));
}

#[test]
fn test_attach_refuses_corrupt_file() {
    let temp_dir = workspace();
    let vscode = temp_dir.path().join(".vscode");
    fs::create_dir(&vscode).unwrap();
    let corrupt = "{ \"configurations\": [ // half-edited\n";
    fs::write(vscode.join("launch.json"), corrupt).unwrap();

    isolated_cmd(&temp_dir)
        .args(["attach", "--pid", "4321", "--no-listener"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid launch configuration file"))
        .stderr(predicate::str::contains("repair"));

    assert_eq!(
        fs::read_to_string(vscode.join("launch.json")).unwrap(),
        corrupt
    );
}

#[test]
fn test_attach_uses_session_pid_env() {
    let temp_dir = workspace();

    isolated_cmd(&temp_dir)
        .env("ABRIDGE_SESSION_PID", "2468")
        .args(["attach", "--no-listener"])
        .assert()
        .success()
        .stdout(predicate::str::contains("session pid: 2468"));
}

#[test]
fn test_attach_respects_repo_config() {
    let temp_dir = workspace();
    fs::write(
        temp_dir.path().join(".abridge.toml"),
        "[listener]\nenabled = false\nport = 6001\n[launch]\nconfig_path = \"dbg/launch.json\"\n",
    )
    .unwrap();

    isolated_cmd(&temp_dir)
        .args(["attach", "--pid", "4321"])
        .assert()
        .success()
        .stdout(predicate::str::contains(":6001: skipped"));

    assert!(temp_dir.path().join("dbg/launch.json").exists());
}

#[test]
fn test_attach_listener_already_active() {
    let temp_dir = workspace();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    isolated_cmd(&temp_dir)
        .args(["attach", "--pid", "4321", "--port", &port.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("already active"));
}

#[test]
fn test_probe_reports_listening_port() {
    let temp_dir = workspace();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let output = isolated_cmd(&temp_dir)
        .args(["probe", "--json", "--port", &port.to_string()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["listening"], true);
    assert_eq!(result["port"], port);
}

#[test]
fn test_probe_rejects_port_zero() {
    let temp_dir = workspace();

    isolated_cmd(&temp_dir)
        .args(["probe", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid port 0"))
        .stderr(predicate::str::contains("hint: the port must be between 1 and 65535"));
}

#[test]
fn test_config_json_shows_defaults_and_sources() {
    let temp_dir = workspace();

    let output = isolated_cmd(&temp_dir)
        .env("ABRIDGE_PORT", "6123")
        .args(["config", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["options"]["port"], 6123);
    assert_eq!(config["options"]["enable_listener"], true);
    assert_eq!(config["options"]["config_path"], ".vscode/launch.json");
    assert_eq!(config["configFiles"]["global"]["exists"], false);
    assert_eq!(config["configFiles"]["repo"]["exists"], false);
}

#[test]
fn test_config_invalid_env_fails() {
    let temp_dir = workspace();

    isolated_cmd(&temp_dir)
        .env("ABRIDGE_LISTENER", "perhaps")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ABRIDGE_LISTENER"));
}
