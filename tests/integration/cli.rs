//! The binary against a mock API server.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::template;

const DOCUMENT: &str = r##"{
  "openapi": "3.0.2",
  "components": {
    "schemas": {
      "management.v1alpha1.Environment": {
        "x-axway-group": "management",
        "x-axway-version": "v1alpha1",
        "x-axway-kind": "Environment",
        "x-axway-plural": "environments",
        "properties": {
          "name": {"type": "string"},
          "spec": {"$ref": "#/components/schemas/management.v1alpha1.EnvironmentSpec"}
        }
      },
      "management.v1alpha1.EnvironmentSpec": {"type": "object"}
    }
  }
}"##;

fn bin() -> Command {
    Command::cargo_bin("apiserver-gen").unwrap()
}

/// Config pointing at the shipped templates and a stand-in generator script.
#[cfg(unix)]
fn write_config(dir: &Path, generator_body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-generator.sh");
    fs::write(&script, format!("#!/bin/sh\n{generator_body}\n")).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let config = dir.join("apiserver-gen.toml");
    fs::write(
        &config,
        format!(
            "[templates]\nresources = {:?}\nclients = {:?}\nset = {:?}\n\n[generator]\nprogram = {:?}\n",
            template("resources.tmpl"),
            template("clients.tmpl"),
            template("set.tmpl"),
            script
        ),
    )
    .unwrap();
    config
}

async fn mock_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apis/docs"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn port_of(server: &MockServer) -> String {
    server.address().port().to_string()
}

#[test]
fn test_missing_arguments_exit_1() {
    bin().args(["http", "localhost"]).env_remove("OUTDIR").assert().code(1);
}

#[test]
fn test_missing_output_root_exit_1() {
    bin()
        .args(["http", "localhost", "8080"])
        .env_remove("OUTDIR")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--output-root"));
}

#[test]
fn test_help() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetches the OpenAPI document"))
        .stdout(predicate::str::contains("--output-root"));
}

#[test]
fn test_short_help_uses_about() {
    bin()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate models and clients"));
}

#[test]
fn test_bad_config_file_reports_error() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("bad.toml");
    fs::write(&config, "duplicate_kinds = \"sometimes\"\n").unwrap();

    bin()
        .args(["http", "127.0.0.1", "9"])
        .arg("--output-root")
        .arg(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ERROR:"))
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_document_fails() {
    let server = mock_server(200, "").await;
    let temp = TempDir::new().unwrap();
    let port = port_of(&server);
    let out = temp.path().to_path_buf();

    let assert = tokio::task::spawn_blocking(move || {
        bin().args(["http", "127.0.0.1", port.as_str()]).env("OUTDIR", &out).assert()
    })
    .await
    .unwrap();

    assert
        .code(1)
        .stderr(predicate::str::contains("ERROR:"))
        .stderr(predicate::str::contains("empty"));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_full_run_with_shipped_templates() {
    let server = mock_server(200, DOCUMENT).await;
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "cat > /dev/null");
    let out = temp.path().join("out");
    let port = port_of(&server);

    let out_for_cmd = out.clone();
    let assert = tokio::task::spawn_blocking(move || {
        bin()
            .args(["http", "127.0.0.1", port.as_str(), "--dump-partitions", "-q"])
            .arg("--config")
            .arg(&config)
            .env("OUTDIR", &out_for_cmd)
            .assert()
    })
    .await
    .unwrap();
    assert.success();

    let model = fs::read_to_string(out.join("models/management/v1alpha1/Environment.go")).unwrap();
    assert!(model.contains("type Environment struct"));
    // EnvironmentSpec is empty, so nothing was generated for it
    assert!(!model.contains("EnvironmentSpec"));
    assert!(out.join("clients/management/v1alpha1/Environment.go").exists());
    assert!(fs::read_to_string(out.join("clients/set.go")).unwrap().contains("EnvironmentManagementV1alpha1"));
    assert!(out.join("sub-resources.json").exists());
    assert!(out.join("main-resources.json").exists());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_generator_failure_exit_1() {
    let server = mock_server(200, DOCUMENT).await;
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "echo 'invalid spec' >&2\nexit 2");
    let out = temp.path().join("out");
    let port = port_of(&server);

    let assert = tokio::task::spawn_blocking(move || {
        bin()
            .args(["http", "127.0.0.1", port.as_str()])
            .arg("--config")
            .arg(&config)
            .env("OUTDIR", &out)
            .assert()
    })
    .await
    .unwrap();

    assert
        .code(1)
        .stderr(predicate::str::contains("ERROR:"))
        .stderr(predicate::str::contains("invalid spec"));
}
