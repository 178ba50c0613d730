use std::sync::{Mutex, PoisonError};

use capture_core::ErrorReport;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ClientConfig, PageContext};

const PLATFORM: &str = "javascript";
const LEVEL: &str = "error";
const ENVIRONMENT: &str = "production";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("transport rejected report: {0}")]
    Transport(String),
}

/// Delivers finished reports. Implementations own serialization and transport.
pub trait Dispatcher {
    fn dispatch(&self, report: ErrorReport) -> Result<(), DispatchError>;
}

#[derive(Serialize)]
struct RequestHeaders<'a> {
    #[serde(rename = "Referer")]
    referer: &'a str,
    #[serde(rename = "User-Agent")]
    user_agent: &'a str,
}

#[derive(Serialize)]
struct RequestInfo<'a> {
    url: &'a str,
    headers: RequestHeaders<'a>,
}

#[derive(Serialize)]
struct StorePayload<'a> {
    #[serde(flatten)]
    report: &'a ErrorReport,
    platform: &'static str,
    level: &'static str,
    environment: &'static str,
    request: RequestInfo<'a>,
}

/// A ready-to-send store request: target URL and JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRequest {
    pub url: String,
    pub body: String,
}

impl StoreRequest {
    pub const CONTENT_TYPE: &'static str = "text/plain;charset=UTF-8";

    pub fn new(
        config: &ClientConfig,
        page: &PageContext,
        report: &ErrorReport,
    ) -> Result<Self, DispatchError> {
        let payload = StorePayload {
            report,
            platform: PLATFORM,
            level: LEVEL,
            environment: ENVIRONMENT,
            request: RequestInfo {
                url: &page.location,
                headers: RequestHeaders {
                    referer: page.referrer(),
                    user_agent: &page.user_agent,
                },
            },
        };
        Ok(Self {
            url: config.store_url(),
            body: serde_json::to_string(&payload)?,
        })
    }
}

/// Keeps every dispatched report in memory.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    reports: Mutex<Vec<ErrorReport>>,
    reject_with: Option<String>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that records nothing and fails every delivery.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reports: Mutex::default(),
            reject_with: Some(reason.into()),
        }
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, report: ErrorReport) -> Result<(), DispatchError> {
        if let Some(reason) = &self.reject_with {
            return Err(DispatchError::Transport(reason.clone()));
        }
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capture_core::ExceptionRecord;
    use serde_json::Value;

    #[test]
    fn store_request_carries_page_context() {
        let config = ClientConfig::new("k", "ingest.example.io", "7");
        let page = PageContext {
            location: "https://app.example.com/".to_string(),
            referrer: None,
            user_agent: "Mozilla/5.0".to_string(),
        };
        let report = ErrorReport::from_exception(ExceptionRecord::new("TypeError", "x"));

        let request = StoreRequest::new(&config, &page, &report).unwrap();
        assert_eq!(request.url, config.store_url());

        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["exception"]["values"][0]["type"], "TypeError");
        assert_eq!(body["platform"], "javascript");
        assert_eq!(body["request"]["headers"]["Referer"], "https://app.example.com/");
        assert_eq!(body["request"]["headers"]["User-Agent"], "Mozilla/5.0");
    }

    #[test]
    fn recording_dispatcher() {
        let dispatcher = RecordingDispatcher::new();
        dispatcher.dispatch(ErrorReport::from_message("a")).unwrap();
        assert_eq!(dispatcher.reports().len(), 1);

        let failing = RecordingDispatcher::failing("offline");
        let err = failing.dispatch(ErrorReport::default()).unwrap_err();
        assert_eq!(err.to_string(), "transport rejected report: offline");
        assert!(failing.reports().is_empty());
    }
}
