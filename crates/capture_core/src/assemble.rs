use std::sync::OnceLock;

use regex::Regex;

use crate::classify::UNRECOVERABLE_ERROR;
use crate::report::{CanonicalFrame, ErrorReport, ExceptionRecord, Stacktrace};
use crate::stacktrace::UNKNOWN_FUNCTION;

/// What the host knows about where an error surfaced when it has no stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitialLocation<'a> {
    pub filename: Option<&'a str>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Adds a single leading frame built from `location` when the exception
/// record has no frames yet. Existing frames are left untouched.
///
/// Absent line or column become `0`; an absent or empty filename falls back
/// to `page_location`.
pub fn enhance_with_initial_frame(
    report: &mut ErrorReport,
    location: InitialLocation<'_>,
    page_location: &str,
) {
    let stacktrace = report
        .exception_mut()
        .stacktrace
        .get_or_insert_with(Stacktrace::default);
    if !stacktrace.frames.is_empty() {
        return;
    }

    let filename = location
        .filename
        .filter(|name| !name.is_empty())
        .unwrap_or(page_location);
    stacktrace.frames.push(CanonicalFrame {
        filename: filename.to_string(),
        function: UNKNOWN_FUNCTION.to_string(),
        line: Some(location.line.unwrap_or(0)),
        column: Some(location.column.unwrap_or(0)),
        in_app: true,
    });
}

fn error_types_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:[Uu]ncaught (?:exception: )?)?(?:((?:Eval|Internal|Range|Reference|Syntax|Type|URI|)Error): )?(.*)$",
        )
        .expect("static pattern is a valid regex")
    })
}

/// Report for a host error notification that carried only a message and a
/// location, such as `Uncaught TypeError: x is undefined` at `app.js:3:7`.
pub fn report_from_incomplete_error(
    message: &str,
    location: InitialLocation<'_>,
    page_location: &str,
) -> ErrorReport {
    let (ty, value) = match error_types_re().captures(message) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty()),
            caps.get(2).map(|m| m.as_str()).unwrap_or_default(),
        ),
        None => (None, message),
    };
    let value = if value.is_empty() { UNRECOVERABLE_ERROR } else { value };

    let mut report = ErrorReport::from_exception(ExceptionRecord::new(
        ty.unwrap_or(ExceptionRecord::DEFAULT_TYPE),
        value,
    ));
    enhance_with_initial_frame(&mut report, location, page_location);
    report
}
