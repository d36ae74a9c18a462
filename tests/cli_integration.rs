//! CLI integration tests
//!
//! Exercises the eth-event-export binary end-to-end for offline paths

use assert_cmd::Command;
use predicates::prelude::*;

fn exporter() -> Command {
    Command::cargo_bin("eth-event-export").unwrap()
}

#[test]
fn test_version() {
    exporter()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("eth-event-export"));
}

#[test]
fn test_help() {
    exporter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Chunked Ethereum event log extractor",
        ));
}

#[test]
fn test_missing_rpc_url_is_rejected() {
    exporter()
        .args(["-c", "0xabc", "-f", "1", "-t", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RPC URL is required"));
}

#[test]
fn test_missing_contract_is_rejected() {
    exporter()
        .args(["--rpc-url", "http://127.0.0.1:1/rpc", "-t", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Contract address is required"));
}

#[test]
fn test_missing_end_height_is_rejected() {
    exporter()
        .args(["--rpc-url", "http://127.0.0.1:1/rpc", "-c", "0xabc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("End height is required"));
}

#[test]
fn test_end_below_start_is_rejected() {
    exporter()
        .args([
            "--rpc-url",
            "http://127.0.0.1:1/rpc",
            "-c",
            "0xabc",
            "-f",
            "500",
            "-t",
            "100",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below start height"));
}

#[test]
fn test_unknown_transport_is_rejected() {
    exporter()
        .args([
            "--rpc-url",
            "http://127.0.0.1:1/rpc",
            "-c",
            "0xabc",
            "-t",
            "100",
            "--transport",
            "carrier-pigeon",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown transport backend"));
}

#[test]
fn test_call_with_unsupported_method_is_rejected() {
    exporter()
        .args([
            "--rpc-url",
            "http://127.0.0.1:1/rpc",
            "-c",
            "0xabc",
            "call",
            "--method",
            "PATCH",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http method not supported"));
}

#[test]
fn test_call_with_malformed_param_is_rejected() {
    exporter()
        .args([
            "--rpc-url",
            "http://127.0.0.1:1/rpc",
            "-c",
            "0xabc",
            "call",
            "--param",
            "no-equals-sign",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameter"));
}
