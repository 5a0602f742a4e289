//! Exit codes and output of the `ldpcheck` binary.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;
use std::net::TcpListener;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn ldpcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ldpcheck"))
        .args(args)
        .env_remove("LDPCHECK_ROOT")
        .env_remove("LDPCHECK_TIMEOUT_MS")
        .env_remove("LDPCHECK_USER")
        .env_remove("LDPCHECK_PASSWORD")
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

/// A root URL on a port nothing listens on.
fn closed_root() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/rest")
}

#[test]
fn test_list_needs_no_server() {
    let output = ldpcheck(&["--list", "--root", &closed_root()]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bad-digest-algorithm"));
    assert!(stdout.contains("delete-unsupported-depth"));
}

#[test]
fn test_unreachable_server_exits_2() {
    let output = ldpcheck(&["--root", &closed_root(), "--timeout-ms", "2000"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ldpcheck: "), "{stderr}");
}

#[test]
fn test_invalid_configuration_exits_2() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timeout_ms: 0").unwrap();

    let output = ldpcheck(&["--config", file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("timeout_ms must be greater than zero"), "{stderr}");
}

#[test]
fn test_unknown_module_exits_2() {
    let output = ldpcheck(&["--root", &closed_root(), "--module", "patch"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown module: patch"), "{stderr}");
}
