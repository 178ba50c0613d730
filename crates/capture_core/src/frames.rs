use crate::report::CanonicalFrame;
use crate::stacktrace::{RawStackFrame, UNKNOWN_FUNCTION};

pub const MAX_FRAMES: usize = 20;

/// Function-name fragments of the public capture entrypoints.
const CAPTURE_ENTRYPOINT_MARKERS: [&str; 2] = ["captureMessage", "captureException"];
/// Function-name fragment of the internal scheduling wrapper.
const WRAPPER_MARKER: &str = "sentryWrapped";

/// Turns innermost-first raw frames into the canonical, capped, oldest-first list.
pub fn normalize_frames(frames: &[RawStackFrame]) -> Vec<CanonicalFrame> {
    let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
        return Vec::new();
    };

    let mut start = 0;
    let mut end = frames.len();
    if CAPTURE_ENTRYPOINT_MARKERS
        .iter()
        .any(|marker| first.function.contains(marker))
    {
        start += 1;
    }
    if last.function.contains(WRAPPER_MARKER) {
        end = end.saturating_sub(1);
    }
    if start >= end {
        return Vec::new();
    }

    let kept = &frames[start..end];
    let fallback_filename = kept[0].url.as_str();

    let mut out: Vec<CanonicalFrame> = kept
        .iter()
        .take(MAX_FRAMES)
        .map(|frame| CanonicalFrame {
            filename: if frame.url.is_empty() {
                fallback_filename.to_string()
            } else {
                frame.url.clone()
            },
            function: if frame.function.is_empty() {
                UNKNOWN_FUNCTION.to_string()
            } else {
                frame.function.clone()
            },
            line: frame.line,
            column: frame.column,
            in_app: true,
        })
        .collect();
    out.reverse();
    out
}
