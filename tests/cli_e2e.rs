//! End-to-end CLI tests for the pagegrab binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::{
    file_names, socket_skip_return, start_mock_server_or_skip, unused_local_port,
};

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("pagegrab").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download files linked from web pages"))
        .stdout(predicate::str::contains("--extension"))
        .stdout(predicate::str::contains("--on-collision"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("pagegrab").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("pagegrab").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_rejects_unparsable_base_url() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("pagegrab").unwrap();
    cmd.arg("--base-url")
        .arg("not a url")
        .arg("-o")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}

/// An unreachable page is reported but is not a process failure.
#[test]
fn test_binary_unreachable_page_still_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    let page = format!("http://127.0.0.1:{}/archives", unused_local_port());

    let mut cmd = Command::cargo_bin("pagegrab").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--base-url")
        .arg(&page)
        .arg("-o")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("succeeded=0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_downloads_linked_files() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };

    Mock::given(method("GET"))
        .and(path("/archives"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/files/one.bakent_fronted">1</a>
               <a href='/files/two.bakent_fronted'>2</a>
               <a href="/files/skip.txt">skip</a>
               <a href="/files/gone.bakent_fronted">gone</a>"#,
        ))
        .mount(&mock_server)
        .await;
    for name in ["one", "two"] {
        Mock::given(method("GET"))
            .and(path(format!("/files/{name}.bakent_fronted")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(name.as_bytes().to_vec()))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/files/gone.bakent_fronted"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("archivos");

    let mut cmd = Command::cargo_bin("pagegrab").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--base-url")
        .arg(format!("{}/archives", mock_server.uri()))
        .arg("--output-dir")
        .arg(&output_dir)
        .arg("-c")
        .arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("succeeded=2"))
        .stdout(predicate::str::contains("failed=1"));

    assert_eq!(
        file_names(&output_dir),
        vec!["one.bakent_fronted", "two.bakent_fronted"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_quiet_run_prints_nothing() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>nothing here</p>"))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("pagegrab").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("-q")
        .arg("-o")
        .arg(temp_dir.path())
        .arg(format!("{}/empty", mock_server.uri()));

    cmd.assert().success().stdout(predicate::str::is_empty());
}
