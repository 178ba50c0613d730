use capture_core::{
    add_exception_mechanism, classify, enhance_with_initial_frame, report_from_incomplete_error,
    CaptureKind, ErrorReport, InitialLocation, JsValue, Mechanism, UNKNOWN_FUNCTION,
};
use tracing::{debug, warn};

use crate::config::{ClientConfig, PageContext};
use crate::dispatch::{DispatchError, Dispatcher, StoreRequest};
use crate::scheduling::NamedCallback;

pub const ON_ERROR: &str = "onerror";
pub const ON_UNHANDLED_REJECTION: &str = "onunhandledrejection";

/// The fields of a host error notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEventInit {
    pub message: JsValue,
    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub colno: Option<u32>,
    pub error: JsValue,
}

impl Default for ErrorEventInit {
    fn default() -> Self {
        Self {
            message: JsValue::Undefined,
            filename: None,
            lineno: None,
            colno: None,
            error: JsValue::Undefined,
        }
    }
}

impl ErrorEventInit {
    fn location(&self) -> InitialLocation<'_> {
        InitialLocation {
            filename: self.filename.as_deref(),
            line: self.lineno,
            column: self.colno,
        }
    }
}

/// Handlers the host's global error and rejection hooks call into.
pub struct CaptureHooks<D> {
    dispatcher: D,
    config: ClientConfig,
    page: PageContext,
}

impl<D: Dispatcher> CaptureHooks<D> {
    pub fn new(dispatcher: D, config: ClientConfig, page: PageContext) -> Self {
        Self {
            dispatcher,
            config,
            page,
        }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Builds the finished report for an error notification.
    pub fn report_for_error(&self, event: &ErrorEventInit) -> ErrorReport {
        let mut report = match (&event.error, &event.message) {
            (error, JsValue::String(message)) if error.is_nullish() => {
                report_from_incomplete_error(message, event.location(), &self.page.location)
            }
            (error, message) => {
                let value = if error.is_truthy() { error } else { message };
                let mut report = classify(value, None, CaptureKind::Exception);
                enhance_with_initial_frame(&mut report, event.location(), &self.page.location);
                report
            }
        };
        add_exception_mechanism(&mut report, &Mechanism::origin(false, ON_ERROR));
        report
    }

    /// Builds the finished report for an unhandled rejection.
    ///
    /// `event` may be the rejection event itself (carrying `reason`), a custom
    /// event carrying `detail.reason`, or the bare reason.
    pub fn report_for_rejection(&self, event: &JsValue) -> ErrorReport {
        let reason = rejection_reason(event);
        let mut report = classify(reason, None, CaptureKind::Rejection);
        add_exception_mechanism(
            &mut report,
            &Mechanism::origin(false, ON_UNHANDLED_REJECTION),
        );
        report
    }

    pub fn on_error(&self, event: &ErrorEventInit) {
        let report = self.report_for_error(event);
        self.forward(report, ON_ERROR);
    }

    pub fn on_unhandled_rejection(&self, event: &JsValue) {
        let report = self.report_for_rejection(event);
        self.forward(report, ON_UNHANDLED_REJECTION);
    }

    /// Runs a decorated scheduled callback. A value it throws is reported as
    /// an uncaught error whose unnamed innermost frame takes the callback's
    /// composite name.
    pub fn run_scheduled<F>(&self, callback: &mut NamedCallback<F>)
    where
        F: FnMut() -> Result<(), JsValue>,
    {
        let Err(thrown) = callback.call() else {
            return;
        };
        debug!(callback = callback.name(), "scheduled callback threw");

        let mut report = self.report_for_error(&ErrorEventInit {
            error: thrown,
            ..ErrorEventInit::default()
        });
        let innermost = report
            .exception_mut()
            .stacktrace
            .as_mut()
            .and_then(|st| st.frames.last_mut());
        if let Some(frame) = innermost.filter(|f| f.function == UNKNOWN_FUNCTION) {
            frame.function = callback.name().to_string();
        }
        self.forward(report, ON_ERROR);
    }

    /// The store request the configured endpoint expects for `report`.
    pub fn store_request(&self, report: &ErrorReport) -> Result<StoreRequest, DispatchError> {
        StoreRequest::new(&self.config, &self.page, report)
    }

    fn forward(&self, report: ErrorReport, origin: &'static str) {
        debug!(origin, "dispatching captured report");
        if let Err(err) = self.dispatcher.dispatch(report) {
            warn!(origin, error = %err, "failed to dispatch captured report");
        }
    }
}

fn rejection_reason(event: &JsValue) -> &JsValue {
    let Some(obj) = event.as_object() else {
        return event;
    };
    if let Some(reason) = obj.get("reason") {
        return reason;
    }
    obj.get("detail")
        .and_then(|detail| detail.get("reason"))
        .unwrap_or(event)
}
