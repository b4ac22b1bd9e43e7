use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Helper to create a test command isolated from the caller's environment
fn atlasctl() -> Command {
    let mut cmd = Command::cargo_bin("atlasctl").unwrap();
    cmd.env_remove("ATLASCTL_PROFILE")
        .env_remove("ATLASCTL_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Command bound to a config file inside `dir`
fn atlasctl_with_config(dir: &Path) -> Command {
    let mut cmd = atlasctl();
    cmd.arg("--config-file").arg(dir.join("config.toml"));
    cmd
}

#[test]
fn test_help_flag() {
    atlasctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MongoDB Atlas admin API"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version_flag() {
    atlasctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("atlasctl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_json() {
    atlasctl()
        .args(["version", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "atlasctl""#));
}

#[test]
fn test_no_args_shows_help() {
    atlasctl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    atlasctl()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_completions_bash() {
    atlasctl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_atlasctl"));
}

#[test]
fn test_invalid_log_type_rejected() {
    atlasctl()
        .args([
            "process",
            "log",
            "--project-id",
            "p1",
            "--process-id",
            "host-00",
            "--log-type",
            "syslog",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[test]
fn test_profile_lifecycle() {
    let dir = TempDir::new().unwrap();

    atlasctl_with_config(dir.path())
        .args([
            "profile",
            "set",
            "local",
            "--username",
            "dev",
            "--api-key",
            "dev-key",
            "--base-url",
            "http://localhost:8080",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'local' saved"));

    atlasctl_with_config(dir.path())
        .args(["profile", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""count": 1"#))
        .stdout(predicate::str::contains(r#""name": "local""#))
        .stdout(predicate::str::contains("dev-key").not());

    atlasctl_with_config(dir.path())
        .args(["profile", "show", "local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8080"))
        .stdout(predicate::str::contains("dev-key").not());

    atlasctl_with_config(dir.path())
        .args(["profile", "remove", "local"])
        .assert()
        .success();

    atlasctl_with_config(dir.path())
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles configured"));
}

#[test]
fn test_trace_logging_never_shows_api_key() {
    let dir = TempDir::new().unwrap();

    atlasctl_with_config(dir.path())
        .args([
            "-vvv",
            "profile",
            "set",
            "traced",
            "--username",
            "dev",
            "--api-key",
            "SUPERSECRET123",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Executing command"))
        .stderr(predicate::str::contains("credentials redacted"))
        .stderr(predicate::str::contains("SUPERSECRET123").not());
}

#[test]
fn test_unknown_profile_fails() {
    let dir = TempDir::new().unwrap();

    atlasctl_with_config(dir.path())
        .args(["org", "list", "--profile", "missing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'missing' not found"));
}

#[test]
fn test_no_profile_configured_fails() {
    let dir = TempDir::new().unwrap();

    atlasctl_with_config(dir.path())
        .args(["org", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No profile configured"));
}

// ---------------------------------------------------------------------------
// Against a mock Atlas API
// ---------------------------------------------------------------------------

const CHALLENGE: &str = r#"Digest realm="MMS Public API", domain="", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c0", algorithm=MD5, qop="auth", stale=false"#;

fn unauthenticated(req: &Request) -> bool {
    !req.headers.contains_key("authorization")
}

async fn atlas_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(unauthenticated)
        .respond_with(ResponseTemplate::new(401).insert_header("WWW-Authenticate", CHALLENGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/atlas/v1.0/orgs"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "o1", "name": "Acme"}],
            "totalCount": 1
        })))
        .mount(&server)
        .await;
    server
}

/// Write a profile pointing at `server` into `dir`
fn configure(dir: &Path, server: &MockServer) {
    atlasctl_with_config(dir)
        .args([
            "profile",
            "set",
            "mock",
            "--username",
            "alice",
            "--api-key",
            "api-key",
            "--base-url",
        ])
        .arg(server.uri())
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_org_list_against_mock_server() {
    let server = atlas_server().await;
    let dir = TempDir::new().unwrap();
    configure(dir.path(), &server);

    atlasctl_with_config(dir.path())
        .args(["org", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "o1""#));

    atlasctl_with_config(dir.path())
        .args(["org", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("NAME"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_org_get_not_found() {
    let server = atlas_server().await;
    Mock::given(method("GET"))
        .and(path("/api/atlas/v1.0/orgs/o2"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    configure(dir.path(), &server);

    atlasctl_with_config(dir.path())
        .args(["org", "get", "o2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to find Org by ID [o2]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_process_log_download() {
    let server = atlas_server().await;
    Mock::given(method("GET"))
        .and(path(
            "/api/atlas/v1.0/groups/p1/clusters/host-00/logs/mongodb.gz",
        ))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x1f\x8b compressed".to_vec()))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    configure(dir.path(), &server);
    let out = TempDir::new().unwrap();

    atlasctl_with_config(dir.path())
        .args([
            "process",
            "log",
            "--project-id",
            "p1",
            "--process-id",
            "host-00",
            "--log-type",
            "mongodb",
            "--output-dir",
        ])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("log_host-00_mongodb.gz"));

    let written = std::fs::read(out.path().join("log_host-00_mongodb.gz")).unwrap();
    assert_eq!(written, b"\x1f\x8b compressed");
}

#[test]
fn test_unreachable_server_is_connection_error() {
    let dir = TempDir::new().unwrap();
    atlasctl_with_config(dir.path())
        .args([
            "profile",
            "set",
            "down",
            "--username",
            "alice",
            "--api-key",
            "api-key",
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .assert()
        .success();

    atlasctl_with_config(dir.path())
        .args(["org", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Connection error"));
}
