use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn capture_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_capture"))
}

fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write input");
    path
}

fn run(args: &[&str], input: &Path) -> Output {
    Command::new(capture_bin())
        .args(args)
        .arg("--input")
        .arg(input)
        .env("RUST_LOG", "off")
        .output()
        .expect("run capture")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "capture failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn normalize_plain_object_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "reason.json", r#"{"status": 404, "url": "/api/items"}"#);

    let report = stdout_json(&run(&["normalize", "--rejection"], &input));
    let record = &report["exception"]["values"][0];
    assert_eq!(record["type"], "UnhandledRejection");
    assert_eq!(
        record["value"],
        "Non-Error promise rejection captured with keys: status, url"
    );
    assert_eq!(record["mechanism"]["type"], "onunhandledrejection");
    assert_eq!(record["mechanism"]["synthetic"], true);
    assert_eq!(report["extra"]["__serialized__"]["url"], "/api/items");
}

#[test]
fn normalize_dom_exception() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "dom.json", r#"{"message": "boom", "code": 11}"#);

    let report = stdout_json(&run(
        &["normalize", "--class", "dom-exception", "--page-location", "https://example.com/"],
        &input,
    ));
    assert_eq!(report["message"], "DOMException: boom");
    assert_eq!(report["tags"]["DOMException.code"], "11");
    let record = &report["exception"]["values"][0];
    assert_eq!(record["mechanism"]["type"], "onerror");
    assert_eq!(
        record["stacktrace"]["frames"][0]["filename"],
        "https://example.com/"
    );
}

#[test]
fn normalize_prints_store_request() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "primitive.json", "42");

    let out = stdout_json(&run(
        &[
            "normalize",
            "--rejection",
            "--store-request",
            "--dsn",
            "https://abc@ingest.example.io/9",
        ],
        &input,
    ));
    assert_eq!(
        out["url"],
        "https://ingest.example.io/api/9/store/?sentry_version=7&sentry_key=abc"
    );
    assert_eq!(out["body"]["platform"], "javascript");
    assert_eq!(
        out["body"]["exception"]["values"][0]["value"],
        "Non-Error promise rejection captured with value: 42"
    );
}

#[test]
fn parse_stack_reports_frames() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "stack.txt",
        "TypeError: boom\n    at inner (http://x.com/a.js:3:9)\n    at outer (http://x.com/a.js:7:1)\n",
    );

    let parsed = stdout_json(&run(
        &["parse-stack", "--name", "TypeError", "--message", "boom"],
        &input,
    ));
    assert_eq!(parsed["failed"], false);
    assert_eq!(parsed["name"], "TypeError");
    let frames = parsed["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["function"], "inner");
    assert_eq!(frames[0]["line"], 3);
}

#[test]
fn parse_stack_without_matches_is_degraded() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "stack.txt", "nothing to see here\n");

    let parsed = stdout_json(&run(&["parse-stack"], &input));
    assert_eq!(parsed["failed"], true);
    assert_eq!(parsed["name"], "<unknown>");
    assert_eq!(parsed["message"], "No error message");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["normalize"], &dir.path().join("absent.json"));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.json"));
}
