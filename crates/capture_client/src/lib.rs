#![forbid(unsafe_code)]
//! Capture-site plumbing around `capture_core`.
//!
//! [`CaptureHooks`] turns host error and rejection notifications into
//! finished reports and hands them to a [`Dispatcher`]. Configuration is an
//! explicit immutable [`ClientConfig`]; nothing here holds global state.

mod config;
mod dispatch;
mod hooks;

pub mod scheduling;

pub use config::{ClientConfig, ConfigError, PageContext};
pub use dispatch::{DispatchError, Dispatcher, RecordingDispatcher, StoreRequest};
pub use hooks::{CaptureHooks, ErrorEventInit, ON_ERROR, ON_UNHANDLED_REJECTION};
