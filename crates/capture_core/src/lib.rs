#![forbid(unsafe_code)]
//! Normalization of arbitrary thrown values into canonical error reports.
//!
//! The pipeline is synchronous and never fails outward:
//! - [`classify`] routes a captured [`JsValue`] by its [`InputShape`].
//! - [`compute_stack_trace`] recovers raw frames from textual stacks.
//! - [`normalize_frames`] caps and reorders them into [`CanonicalFrame`]s.
//! - [`add_exception_mechanism`] and [`enhance_with_initial_frame`] finish the report.

mod assemble;
mod classify;
mod frames;
mod mechanism;
mod message;
mod report;
mod shape;
mod stacktrace;
mod value;

pub mod summary;

pub use assemble::{enhance_with_initial_frame, report_from_incomplete_error, InitialLocation};
pub use classify::{
    classify, report_from_rejection_primitive, CaptureKind, DOM_EXCEPTION_CODE_TAG,
    UNHANDLED_REJECTION, UNRECOVERABLE_ERROR,
};
pub use frames::{normalize_frames, MAX_FRAMES};
pub use mechanism::add_exception_mechanism;
pub use message::{extract_message, NO_ERROR_MESSAGE};
pub use report::{
    CanonicalFrame, ErrorReport, ExceptionRecord, ExceptionValues, Extra, Mechanism, Stacktrace,
};
pub use shape::InputShape;
pub use stacktrace::{compute_stack_trace, ParsedStackTrace, RawStackFrame, UNKNOWN_FUNCTION};
pub use summary::ObjectSummary;
pub use value::{JsObject, JsValue, ObjectClass};
