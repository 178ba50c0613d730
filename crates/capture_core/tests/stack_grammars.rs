use std::path::PathBuf;

use capture_core::{compute_stack_trace, normalize_frames, JsObject, JsValue, ObjectClass};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/stacks")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_root().join(name)).expect("read fixture")
}

fn error_with_stack(name: &str, message: &str, stack: &str) -> JsValue {
    JsValue::error(name, message, Some(stack))
}

#[test]
fn chrome_stack_resolves_every_location_line() {
    let stack = read_fixture("chrome.txt");
    let location_lines = stack.lines().filter(|l| l.trim_start().starts_with("at ")).count();

    let parsed = compute_stack_trace(&error_with_stack("TypeError", "boom", &stack));
    assert!(!parsed.failed);
    assert_eq!(parsed.frames.len(), location_lines);

    let first = &parsed.frames[0];
    assert_eq!(first.function, "renderRow");
    assert_eq!(first.url, "https://app.example.com/static/js/main.4f2a.js");
    assert_eq!((first.line, first.column), (Some(120), Some(17)));

    let anonymous = parsed.frames.last().unwrap();
    assert_eq!(anonymous.function, "?");
    assert_eq!(anonymous.column, Some(1045));
}

#[test]
fn firefox_stack_matches_gecko_grammar() {
    let stack = read_fixture("firefox.txt");
    let parsed = compute_stack_trace(&error_with_stack("TypeError", "boom", &stack));

    let functions: Vec<_> = parsed.frames.iter().map(|f| f.function.as_str()).collect();
    assert_eq!(functions, vec!["renderRow", "renderTable", "onClick", "?"]);
    assert!(parsed.frames.iter().all(|f| f.line.is_some()));
}

#[test]
fn indirect_eval_resolves_to_eval_target() {
    let stack = "Error: x\n    at foo (eval at bar (bar.js:10:5), <anonymous>:1:1)";
    let parsed = compute_stack_trace(&error_with_stack("Error", "x", stack));

    assert_eq!(parsed.frames.len(), 1);
    let frame = &parsed.frames[0];
    assert_eq!(frame.function, "foo");
    assert_eq!(frame.url, "bar.js");
    assert_eq!((frame.line, frame.column), (Some(10), Some(5)));
}

#[test]
fn no_stack_degrades_with_name_and_message() {
    let ex = JsValue::error("RangeError", "out of range", None);
    let parsed = compute_stack_trace(&ex);

    assert!(parsed.failed);
    assert!(parsed.frames.is_empty());
    assert_eq!(parsed.name, "RangeError");
    assert_eq!(parsed.message, "out of range");
}

#[test]
fn minified_react_error_pops_one_frame() {
    let stack = read_fixture("chrome.txt");
    let ex = error_with_stack(
        "Error",
        "Minified React error #130; visit https://reactjs.org/docs/error-decoder.html",
        &stack,
    );
    let parsed = compute_stack_trace(&ex);
    assert_eq!(parsed.frames[0].function, "Array.map");
}

#[test]
fn normalized_frames_are_oldest_first() {
    let stack = read_fixture("chrome.txt");
    let parsed = compute_stack_trace(&error_with_stack("TypeError", "boom", &stack));
    let frames = normalize_frames(&parsed.frames);

    assert_eq!(frames.len(), parsed.frames.len());
    assert_eq!(frames.last().unwrap().function, "renderRow");
    assert_eq!(frames.first().unwrap().function, "?");
    assert!(frames.iter().all(|f| f.in_app));
}

#[test]
fn gecko_column_number_at_u32_limit_is_clamped() {
    let ex = JsValue::from(
        JsObject::new(ObjectClass::Error)
            .with("name", "Error")
            .with("message", "x")
            .with("stack", "bar@http://example.com/a.js:12")
            .with("columnNumber", 4294967295.0),
    );
    let parsed = compute_stack_trace(&ex);

    assert!(!parsed.failed);
    assert_eq!(parsed.frames[0].line, Some(12));
    assert_eq!(parsed.frames[0].column, Some(u32::MAX));
}
