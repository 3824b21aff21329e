//! Exit statuses and output of the `ordergraph` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

const SCENARIO: &str = r#"{"orderId":"O1","products":[{"productSequenceNumber":1,"lines":[{"lineSequence":10,"addressSequence":5}]}],"addresses":[{"addressSequence":5}]}"#;

/// Run the binary with `args`, feeding `stdin` to it.
fn run(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ordergraph"))
        .args(args)
        .env_remove("ORDERGRAPH_STRATEGY")
        .env_remove("ORDERGRAPH_RULES")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary should start");
    // The binary may exit before reading stdin; a closed pipe is fine.
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn build_prints_graph_json() {
    let out = run(&["build", "-"], SCENARIO);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.starts_with(r#"{"nodes":[{"id":"n0""#), "{text}");
    assert!(text.contains(r#"{"source":"n2","target":"n3","type":"reference"}"#));
}

#[test]
fn invalid_json_exits_with_status_2() {
    let out = run(&["build", "-"], "{not valid json");
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Invalid JSON"), "{}", stderr(&out));
    assert!(out.stdout.is_empty());
}

#[test]
fn unreadable_file_exits_with_status_2() {
    let out = run(&["check", "/nonexistent/order.json"], "");
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("cannot read /nonexistent/order.json"));
}

#[test]
fn unreadable_rules_file_exits_with_status_2() {
    let out = run(&["build", "-", "--rules", "/nonexistent/rules.json"], SCENARIO);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn unknown_node_exits_with_status_2() {
    let out = run(&["summary", "-", "--node", "n99"], SCENARIO);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains(r#"no node with id "n99""#));
}

#[test]
fn check_reports_counts_on_success() {
    let out = run(&["check", "-"], SCENARIO);
    assert_eq!(out.status.code(), Some(0), "{}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "ok: 4 nodes, 4 edges");
}

#[test]
fn non_object_document_checks_clean() {
    let out = run(&["check", "-"], "[1,2,3]");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out).trim(), "ok: 0 nodes, 0 edges");
}

#[test]
fn strategy_comes_from_the_environment() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ordergraph"))
        .args(["build", "-"])
        .env("ORDERGRAPH_STRATEGY", "fancy")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    drop(child.stdin.take());
    let out = child.wait_with_output().unwrap();
    // clap rejects the value before any input is read.
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("fancy"));
}
