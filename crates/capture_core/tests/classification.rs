use capture_core::summary::summarize_keys;
use capture_core::{
    add_exception_mechanism, classify, CaptureKind, JsObject, JsValue, Mechanism, ObjectClass,
    DOM_EXCEPTION_CODE_TAG, MAX_FRAMES,
};
use serde_json::json;

fn synthetic_error(frames: usize) -> JsValue {
    let mut stack = String::from("Error: synthetic");
    for i in 0..frames {
        stack.push_str(&format!("\n    at f{i} (https://x.com/app.js:{}:1)", i + 1));
    }
    JsValue::error("Error", "synthetic", Some(&stack))
}

#[test]
fn wrapped_error_event_classifies_inner_error() {
    let event = JsValue::from(
        JsObject::new(ObjectClass::ErrorEvent)
            .with("message", "Uncaught TypeError: boom")
            .with("error", synthetic_error(3)),
    );

    let report = classify(&event, None, CaptureKind::Exception);
    let record = report.exception().unwrap();
    assert_eq!(record.ty, "Error");
    assert_eq!(record.value, "synthetic");
    assert_eq!(record.frames().len(), 3);
    assert!(report.extra.is_none());
}

#[test]
fn deep_stacks_keep_frames_nearest_the_throw() {
    let report = classify(&synthetic_error(30), None, CaptureKind::Exception);
    let frames = report.exception().unwrap().frames();

    assert_eq!(frames.len(), MAX_FRAMES);
    assert_eq!(frames.first().unwrap().function, "f19");
    assert_eq!(frames.last().unwrap().function, "f0");
}

#[test]
fn dom_exception_without_name() {
    let exception = JsValue::from(
        JsObject::new(ObjectClass::DomException)
            .with("message", "boom")
            .with("code", 11.0),
    );

    let report = classify(&exception, Some(&synthetic_error(2)), CaptureKind::Exception);
    assert_eq!(report.exception().unwrap().value, "DOMException: boom");
    assert_eq!(
        report.tags.as_ref().unwrap().get(DOM_EXCEPTION_CODE_TAG).map(String::as_str),
        Some("11")
    );
    assert_eq!(report.stacktrace.as_ref().unwrap().frames.len(), 2);
}

#[test]
fn primitive_rejection_reason() {
    let report = classify(&JsValue::Number(42.0), None, CaptureKind::Rejection);
    let record = report.exception().unwrap();
    assert_eq!(record.ty, "UnhandledRejection");
    assert_eq!(
        record.value,
        "Non-Error promise rejection captured with value: 42"
    );
}

#[test]
fn custom_event_uses_constructor_name_and_top_level_stack() {
    let event = JsValue::from(
        JsObject::new(ObjectClass::CustomEvent)
            .with_constructor("CustomEvent")
            .with("type", "app:failed")
            .with("detail", JsValue::from(json!({"reason": "timeout"}))),
    );

    let report = classify(&event, Some(&synthetic_error(4)), CaptureKind::Rejection);
    let record = report.exception().unwrap();
    assert_eq!(record.ty, "CustomEvent");
    assert!(record.value.starts_with("Non-Error promise rejection captured with keys: "));
    assert!(record.stacktrace.is_none());
    assert_eq!(report.stacktrace.as_ref().unwrap().frames.len(), 4);
    assert_eq!(
        report.serialized_snapshot().unwrap()["detail"],
        json!("[object Object]")
    );
}

#[test]
fn non_error_exception_keys() {
    let report = classify(
        &JsValue::from(json!({"a": 1, "bb": 2, "ccc": 3})),
        None,
        CaptureKind::Exception,
    );
    let record = report.exception().unwrap();
    assert_eq!(record.ty, "Error");
    assert_eq!(
        record.value,
        "Non-Error exception captured with keys: a, bb, ccc"
    );
}

#[test]
fn long_key_lists_stay_bounded() {
    let out = summarize_keys(["firstName", "lastName", "emailAddress", "phone"]);
    assert!(out.ends_with("<...>"));
    assert!(out.chars().count() <= 25);
}

#[test]
fn mechanism_first_write_wins_after_classification() {
    let mut report = classify(&synthetic_error(1), None, CaptureKind::Exception);
    add_exception_mechanism(&mut report, &Mechanism::origin(false, "onerror"));
    add_exception_mechanism(&mut report, &Mechanism::origin(true, "onerror"));

    let mechanism = report.exception().unwrap().mechanism.as_ref().unwrap();
    assert_eq!(mechanism.handled(), Some(false));
    assert_eq!(mechanism.kind(), Some("onerror"));
}

#[test]
fn report_serializes_wire_names() {
    let report = classify(&JsValue::Null, None, CaptureKind::Rejection);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["exception"]["values"][0]["type"], "UnhandledRejection");
    assert_eq!(
        value["exception"]["values"][0]["value"],
        "Non-Error promise rejection captured with value: null"
    );
}
