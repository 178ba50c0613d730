//! Recovery of call-site frames from the textual stack properties of an
//! error-like value.
//!
//! Two sources are consulted in order: the opera-style `stacktrace` property,
//! then the generic `stack` property. Each line is matched against a fixed
//! grammar table (see [`grammar`]); unmatched lines are skipped. When neither
//! source yields a frame the result is the degraded stub with `failed` set.

mod grammar;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::message::extract_message;
use crate::value::JsValue;

use grammar::{stack_table, stacktrace_table, GrammarTable, LineContext};

pub const UNKNOWN_FUNCTION: &str = "?";

const UNKNOWN_NAME: &str = "<unknown>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStackFrame {
    pub url: String,
    pub function: String,
    pub arguments: Vec<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

/// Frames are innermost (most recent) first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStackTrace {
    pub name: String,
    pub message: String,
    pub frames: Vec<RawStackFrame>,
    pub failed: bool,
}

impl ParsedStackTrace {
    fn degraded(ex: &JsValue) -> Self {
        Self {
            name: error_name(ex),
            message: extract_message(ex),
            frames: Vec::new(),
            failed: true,
        }
    }

    fn parsed(ex: &JsValue, frames: Vec<RawStackFrame>) -> Self {
        Self {
            name: error_name(ex),
            message: extract_message(ex),
            frames,
            failed: false,
        }
    }
}

fn error_name(ex: &JsValue) -> String {
    ex.get("name")
        .filter(|name| name.is_truthy())
        .map(JsValue::to_js_string)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

fn minified_react_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Minified React error #\d+;").expect("static pattern is a valid regex")
    })
}

/// Number of innermost frames to discard before reporting.
fn frames_to_pop(ex: &JsValue) -> usize {
    if let Some(count) = ex.get("framesToPop").and_then(JsValue::as_number) {
        return if count.is_finite() && count > 0.0 {
            count as usize
        } else {
            0
        };
    }
    let message = ex.get("message").and_then(JsValue::as_str).unwrap_or_default();
    usize::from(minified_react_re().is_match(message))
}

fn text_property<'a>(ex: &'a JsValue, key: &str) -> Option<&'a str> {
    ex.get(key).and_then(JsValue::as_str).filter(|s| !s.is_empty())
}

fn collect_frames<'a>(
    table: &GrammarTable,
    lines: impl Iterator<Item = (usize, &'a str)>,
    column_number: Option<f64>,
) -> Option<Vec<RawStackFrame>> {
    let frames: Vec<_> = lines
        .filter_map(|(index, line)| {
            table.match_line(
                line,
                LineContext {
                    index,
                    column_number,
                },
            )
        })
        .collect();
    (!frames.is_empty()).then_some(frames)
}

fn from_stacktrace_property(ex: &JsValue) -> Option<Vec<RawStackFrame>> {
    let text = text_property(ex, "stacktrace")?;
    // Message lines alternate with location lines; only the latter are parsed.
    collect_frames(
        stacktrace_table(),
        text.split('\n').enumerate().step_by(2),
        None,
    )
}

fn from_stack_property(ex: &JsValue) -> Option<Vec<RawStackFrame>> {
    let text = text_property(ex, "stack")?;
    let column_number = ex.get("columnNumber").and_then(JsValue::as_number);
    collect_frames(stack_table(), text.split('\n').enumerate(), column_number)
}

/// Parses the stack information carried by `ex`.
///
/// Never fails: when no grammar matches any line, or when popping leaves
/// nothing, the degraded stub (`failed = true`, no frames) is returned with
/// `name` and `message` still populated.
pub fn compute_stack_trace(ex: &JsValue) -> ParsedStackTrace {
    let pop = frames_to_pop(ex);

    let Some(mut frames) = from_stacktrace_property(ex).or_else(|| from_stack_property(ex)) else {
        debug!("no stack grammar matched; returning degraded trace");
        return ParsedStackTrace::degraded(ex);
    };

    if pop > 0 {
        frames.drain(..pop.min(frames.len()));
        if frames.is_empty() {
            debug!(pop, "popping removed every frame; returning degraded trace");
            return ParsedStackTrace::degraded(ex);
        }
    }

    debug!(frames = frames.len(), pop, "parsed stack trace");
    ParsedStackTrace::parsed(ex, frames)
}
