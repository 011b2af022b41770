//! Integration tests for the `restsync` CLI binary.
//!
//! Argument parsing, help output, completions, the offline `compare`
//! command, and `apply` against a mock RESTCONF server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `restsync` binary with env isolation.
///
/// Clears `RESTSYNC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn restsync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("restsync");
    cmd.env("HOME", "/tmp/restsync-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/restsync-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("RESTSYNC_PROFILE")
        .env_remove("RESTSYNC_HOST")
        .env_remove("RESTSYNC_USERNAME")
        .env_remove("RESTSYNC_PASSWORD")
        .env_remove("RESTSYNC_OUTPUT")
        .env_remove("RESTSYNC_INSECURE")
        .env_remove("RESTSYNC_TIMEOUT");
    cmd
}

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> String {
    let file = dir.join(name);
    std::fs::write(&file, value.to_string()).unwrap();
    file.display().to_string()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = restsync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    restsync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("RESTCONF")
            .and(predicate::str::contains("apply"))
            .and(predicate::str::contains("compare"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    restsync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("restsync"));
}

#[test]
fn test_apply_help_lists_flags() {
    restsync_cmd().args(["apply", "--help"]).assert().success().stdout(
        predicate::str::contains("--keys-ignore")
            .and(predicate::str::contains("--check"))
            .and(predicate::str::contains("--config-query")),
    );
}

#[test]
fn test_invalid_method_is_usage_error() {
    restsync_cmd()
        .args(["apply", "/restconf/data/x", "--method", "post"])
        .assert()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    restsync_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    restsync_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restsync"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_prints_toml_location() {
    restsync_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_device_command_without_config_fails() {
    let output = restsync_cmd()
        .args(["get", "/restconf/data/x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected setup hint:\n{text}");
}

#[test]
fn test_unknown_profile_is_not_found() {
    restsync_cmd()
        .args(["--profile", "nope", "get", "/restconf/data/x"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nope"));
}

// ── Compare (offline) ───────────────────────────────────────────────

#[test]
fn test_compare_equal_after_normalization() {
    let dir = tempfile::tempdir().unwrap();
    let current = write_json(
        dir.path(),
        "current.json",
        &json!({
            "servers": {"server": [
                {"address": "192.0.2.1", "config": {"port": 123, "iburst": true},
                 "state": {"port": 123, "iburst": true, "stratum": 2}},
                {"address": "192.0.2.2", "config": {"port": 123, "iburst": false},
                 "state": {"port": 123, "iburst": false, "stratum": 3}},
            ]}
        }),
    );
    let desired = write_json(
        dir.path(),
        "desired.json",
        &json!({
            "servers": {"server": [
                {"address": "192.0.2.2", "config": {"port": "123", "iburst": "false"}},
                {"address": "192.0.2.1", "config": {"port": "123", "iburst": "True"}},
            ]}
        }),
    );

    restsync_cmd()
        .args(["compare", &current, &desired, "--exit-code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("equal"));
}

#[test]
fn test_compare_drift_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let current = write_json(dir.path(), "current.json", &json!({"config": {"port": 123}}));
    let desired = write_json(dir.path(), "desired.json", &json!({"config": {"port": 124}}));

    restsync_cmd()
        .args(["compare", &current, &desired, "--exit-code"])
        .assert()
        .code(6)
        .stdout(predicate::str::contains("root['config']['port']"));

    // Without --exit-code drift is reported but not fatal.
    restsync_cmd()
        .args(["compare", &current, &desired])
        .assert()
        .success()
        .stdout(predicate::str::contains("differs"));
}

#[test]
fn test_compare_keys_ignore() {
    let dir = tempfile::tempdir().unwrap();
    let current = write_json(
        dir.path(),
        "current.json",
        &json!({"config": {"name": "mgmt", "last-change": 1_700_000_000}}),
    );
    let desired = write_json(
        dir.path(),
        "desired.json",
        &json!({"config": {"name": "mgmt", "last-change": 0}}),
    );

    restsync_cmd()
        .args(["compare", &current, &desired, "--exit-code", "-i", "last-change"])
        .assert()
        .success();
}

#[test]
fn test_compare_yaml_desired_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let current = write_json(dir.path(), "current.json", &json!({"enabled": true}));
    let desired = dir.path().join("desired.yaml");
    std::fs::write(&desired, "enabled: \"false\"\n").unwrap();

    let output = restsync_cmd()
        .args(["-o", "json-compact", "compare", &current])
        .arg(&desired)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["equal"], json!(false));
    assert_eq!(report["changes"]["before"], json!({"enabled": true}));
    assert_eq!(report["changes"]["after"], json!({"enabled": false}));
}

#[test]
fn test_compare_missing_file() {
    restsync_cmd()
        .args(["compare", "/nonexistent/a.json", "/nonexistent/b.json"])
        .assert()
        .failure();
}

// ── Apply against a mock device ─────────────────────────────────────

const NTP: &str = "/restconf/data/openconfig-system:system/ntp";

async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_in_sync_makes_no_write() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NTP))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "openconfig-system:ntp": {
                "config": {"enabled": true},
                "state": {"enabled": true, "ntp-service": "running"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = restsync_cmd();
    cmd.args(["--host", &server.uri(), "-o", "json", "apply", NTP])
        .args(["--config", r#"{"openconfig-system:ntp": {"config": {"enabled": "true"}}}"#]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changed"], json!(false));
    assert_eq!(report["changes"], json!({}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_drift_writes_and_reports_change() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NTP))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"openconfig-system:ntp": {"config": {"enabled": false}}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(NTP))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = restsync_cmd();
    cmd.args(["--host", &server.uri(), "-o", "json", "apply", NTP, "--method", "patch"])
        .args(["--config", r#"{"openconfig-system:ntp": {"config": {"enabled": true}}}"#]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changed"], json!(true));
    assert_eq!(
        report["changes"]["after"],
        json!({"openconfig-system:ntp": {"config": {"enabled": true}}})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_check_mode_summary_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(NTP))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"openconfig-system:ntp": {"config": {"enabled": false}}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = restsync_cmd();
    cmd.args(["--host", &server.uri(), "apply", NTP, "--check"])
        .args(["--config", r#"{"openconfig-system:ntp": {"config": {"enabled": true}}}"#]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(&format!("changed: {NTP} (update, check mode)")),
        "{stdout}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apply_config_query_reshapes_live_config() {
    const USER: &str = "/restconf/data/openconfig-system:system/aaa/authentication/f5-system-aaa:users/f5-system-aaa:user=admin/config";
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USER))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "f5-system-aaa:config": {"username": "admin", "role": "admin", "last-change": "2024-05-01"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = restsync_cmd();
    cmd.args(["--host", &server.uri(), "-o", "json", "apply", USER, "--method", "patch"])
        .args(["--config", r#"{"f5-system-aaa:config": {"last-change": "2024-05-01"}}"#])
        .args([
            "--config-query",
            r#""f5-system-aaa:config"."last-change" | { "f5-system-aaa:config": { "last-change": @ } }"#,
        ]);
    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changed"], json!(false));
    assert_eq!(
        report["current_config_state"]["current_config"],
        json!({"f5-system-aaa:config": {"last-change": "2024-05-01"}})
    );
}
