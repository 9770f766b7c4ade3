//! Command-line integration tests
//!
//! Runs the `tree-uploadr` binary and checks exit status and log output.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn uploadr() -> Command {
    let mut cmd = Command::cargo_bin("tree-uploadr").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("AWS_ACCESS_KEY_ID")
        .env_remove("AWS_SECRET_ACCESS_KEY")
        .env_remove("AWS_SESSION_TOKEN")
        .env("AWS_EC2_METADATA_DISABLED", "true");
    cmd
}

#[test]
fn test_help_lists_flags() {
    uploadr()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--uri")
                .and(predicate::str::contains("--region"))
                .and(predicate::str::contains("--key-id"))
                .and(predicate::str::contains("--secret"))
                .and(predicate::str::contains("--permissions"))
                .and(predicate::str::contains("--source"))
                .and(predicate::str::contains("--bucket"))
                .and(predicate::str::contains("--bucket-prefix"))
                .and(predicate::str::contains("--thread-num")),
        );
}

#[test]
fn test_missing_source_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();

    uploadr()
        .args(["--bucket", "b", "--key-id", "k", "--secret", "s", "--source"])
        .arg(dir.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Upload aborted")
                .and(predicate::str::contains("Cannot stat")),
        );
}

#[test]
fn test_missing_bucket_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

    uploadr()
        .arg("--source")
        .arg(dir.path().join("a.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("A destination bucket must be given"));
}

#[test]
fn test_unknown_permissions_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

    uploadr()
        .args(["--bucket", "b", "--permissions", "world-writable", "--source"])
        .arg(dir.path().join("a.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid permissions"));
}

#[test]
fn test_zero_threads_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();

    uploadr()
        .args(["--bucket", "b", "--thread-num", "0", "--source"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be at least 1"));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_oversized_thread_num_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();

    uploadr()
        .args(["--bucket", "b", "--thread-num", "18446744073709551615", "--source"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Upload aborted")
                .and(predicate::str::contains("exceeds the maximum"))
                .and(predicate::str::contains("panicked").not()),
        );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_directory_upload_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/b/x/a.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/b/x/sub/b.txt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("b.txt"), b"b").unwrap();

    let uri = mock_server.uri();
    let source = dir.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        uploadr()
            .args([
                "--uri",
                uri.as_str(),
                "--region",
                "us-east-1",
                "--key-id",
                "test-access",
                "--secret",
                "test-secret",
                "--bucket",
                "b",
                "--bucket-prefix",
                "x",
                "--thread-num",
                "2",
                "--path-style",
                "--source",
            ])
            .arg(&source)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .success()
        .stderr(
            predicate::str::contains("Upload ")
                .and(predicate::str::contains("to b/x/a.txt"))
                .and(predicate::str::contains("to b/x/sub/b.txt"))
                .and(predicate::str::contains("finished successfully")),
        );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_store_failure_exits_non_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("report.csv"), b"1").unwrap();

    let uri = mock_server.uri();
    let source = dir.path().join("report.csv");
    let output = tokio::task::spawn_blocking(move || {
        uploadr()
            .args([
                "--uri",
                uri.as_str(),
                "--region",
                "us-east-1",
                "--key-id",
                "test-access",
                "--secret",
                "test-secret",
                "--bucket",
                "b",
                "--path-style",
                "--log-format",
                "json",
                "--source",
            ])
            .arg(&source)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .failure()
        .stderr(predicate::str::contains("Upload aborted"))
        .stderr(predicate::str::contains("finished successfully").not());
}
