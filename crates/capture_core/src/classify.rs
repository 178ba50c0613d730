use tracing::debug;

use crate::frames::normalize_frames;
use crate::mechanism::add_exception_mechanism;
use crate::report::{ErrorReport, ExceptionRecord, Extra, Mechanism, Stacktrace};
use crate::shape::InputShape;
use crate::stacktrace::{compute_stack_trace, ParsedStackTrace};
use crate::summary::ObjectSummary;
use crate::value::{JsObject, JsValue};

pub const UNRECOVERABLE_ERROR: &str = "Unrecoverable error caught";
pub const UNHANDLED_REJECTION: &str = "UnhandledRejection";
pub const DOM_EXCEPTION_CODE_TAG: &str = "DOMException.code";

/// Where the captured value came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CaptureKind {
    /// A thrown value reported through the host's error notification.
    Exception,
    /// The reason of an unhandled promise rejection.
    Rejection,
}

impl CaptureKind {
    fn describe(self) -> &'static str {
        match self {
            CaptureKind::Exception => "exception",
            CaptureKind::Rejection => "promise rejection",
        }
    }
}

/// Maps any captured value onto one of the canonical report shapes.
///
/// `synthetic` is an optional error manufactured at the capture site, used
/// only to give non-error values a best-effort stack.
pub fn classify(value: &JsValue, synthetic: Option<&JsValue>, kind: CaptureKind) -> ErrorReport {
    let shape = InputShape::of(value);
    debug!(shape = shape.label(), ?kind, "classifying captured value");

    match shape {
        InputShape::WrappedErrorEvent(inner) | InputShape::ErrorLike(inner) => {
            report_from_stacktrace(compute_stack_trace(inner))
        }
        InputShape::PlatformError(obj) => report_from_platform_error(obj, "DOMError", synthetic),
        InputShape::PlatformException(obj) => {
            report_from_platform_error(obj, "DOMException", synthetic)
        }
        InputShape::GenericEvent(obj) | InputShape::PlainObject(obj) => {
            let mut report = report_from_plain_object(obj, synthetic, kind);
            add_exception_mechanism(&mut report, &Mechanism::synthetic());
            report
        }
        InputShape::Primitive(primitive) if kind == CaptureKind::Rejection => {
            report_from_rejection_primitive(primitive)
        }
        InputShape::Primitive(other) | InputShape::Other(other) => {
            let message = other.to_js_string();
            let mut report = report_from_string(&message, synthetic);
            let value = if message.is_empty() { UNRECOVERABLE_ERROR } else { message.as_str() };
            report.fill_exception_type_value(value, None);
            add_exception_mechanism(&mut report, &Mechanism::synthetic());
            report
        }
    }
}

/// Report for a rejection whose reason is a primitive.
pub fn report_from_rejection_primitive(reason: &JsValue) -> ErrorReport {
    ErrorReport::from_exception(ExceptionRecord::new(
        UNHANDLED_REJECTION,
        format!(
            "Non-Error promise rejection captured with value: {}",
            reason.to_js_string()
        ),
    ))
}

fn synthetic_stacktrace(synthetic: Option<&JsValue>) -> Option<Stacktrace> {
    synthetic.map(|error| Stacktrace {
        frames: normalize_frames(&compute_stack_trace(error).frames),
    })
}

fn exception_from_stacktrace(parsed: ParsedStackTrace) -> ExceptionRecord {
    let frames = normalize_frames(&parsed.frames);
    let mut record = ExceptionRecord::new(parsed.name, parsed.message);
    if !frames.is_empty() {
        record.stacktrace = Some(Stacktrace { frames });
    }
    if record.ty.is_empty() && record.value.is_empty() {
        record.value = UNRECOVERABLE_ERROR.to_string();
    }
    record
}

fn report_from_stacktrace(parsed: ParsedStackTrace) -> ErrorReport {
    ErrorReport::from_exception(exception_from_stacktrace(parsed))
}

fn report_from_string(message: &str, synthetic: Option<&JsValue>) -> ErrorReport {
    ErrorReport {
        stacktrace: synthetic_stacktrace(synthetic),
        ..ErrorReport::from_message(message)
    }
}

fn report_from_platform_error(
    obj: &JsObject,
    default_name: &str,
    synthetic: Option<&JsValue>,
) -> ErrorReport {
    let name = obj
        .get("name")
        .filter(|name| name.is_truthy())
        .map(JsValue::to_js_string)
        .unwrap_or_else(|| default_name.to_string());
    let message = match obj.get("message").filter(|m| m.is_truthy()) {
        Some(message) => format!("{name}: {}", message.to_js_string()),
        None => name,
    };

    let mut report = report_from_string(&message, synthetic);
    report.fill_exception_type_value(&message, None);
    if let Some(code) = obj.get("code").filter(|code| !matches!(code, JsValue::Undefined)) {
        report.insert_tag(DOM_EXCEPTION_CODE_TAG, code.to_js_string());
    }
    report
}

fn report_from_plain_object(
    obj: &JsObject,
    synthetic: Option<&JsValue>,
    kind: CaptureKind,
) -> ErrorReport {
    let summary = ObjectSummary::of(obj);
    let ty = if obj.class.is_event() {
        obj.constructor_name().to_string()
    } else if kind == CaptureKind::Rejection {
        UNHANDLED_REJECTION.to_string()
    } else {
        ExceptionRecord::DEFAULT_TYPE.to_string()
    };
    let value = format!(
        "Non-Error {} captured with keys: {}",
        kind.describe(),
        summary.keys
    );

    ErrorReport {
        stacktrace: synthetic_stacktrace(synthetic),
        extra: Some(Extra {
            serialized_snapshot: summary.snapshot,
        }),
        ..ErrorReport::from_exception(ExceptionRecord::new(ty, value))
    }
}
