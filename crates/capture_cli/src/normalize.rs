use std::path::PathBuf;

use capture_client::{
    CaptureHooks, ClientConfig, ErrorEventInit, PageContext, RecordingDispatcher,
};
use capture_core::{JsValue, ObjectClass};
use clap::{Parser, ValueEnum};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{read_input, Error};

/// Host class assigned to the top-level input object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InputClass {
    #[default]
    Plain,
    Error,
    Exception,
    DomError,
    DomException,
    ErrorEvent,
    Event,
    CustomEvent,
}

impl From<InputClass> for ObjectClass {
    fn from(class: InputClass) -> Self {
        match class {
            InputClass::Plain => ObjectClass::Plain,
            InputClass::Error => ObjectClass::Error,
            InputClass::Exception => ObjectClass::Exception,
            InputClass::DomError => ObjectClass::DomError,
            InputClass::DomException => ObjectClass::DomException,
            InputClass::ErrorEvent => ObjectClass::ErrorEvent,
            InputClass::Event => ObjectClass::Event,
            InputClass::CustomEvent => ObjectClass::CustomEvent,
        }
    }
}

#[derive(Debug, Parser)]
pub struct Args {
    /// JSON file holding the captured value.
    #[arg(long)]
    pub input: PathBuf,

    /// Class of the top-level value when it is an object.
    #[arg(long, value_enum, default_value_t = InputClass::Plain)]
    pub class: InputClass,

    /// Constructor name of the top-level object (e.g. `MouseEvent`).
    #[arg(long)]
    pub constructor: Option<String>,

    /// Treat the value as an unhandled rejection reason instead of a thrown error.
    #[arg(long)]
    pub rejection: bool,

    /// Location of the page the value was captured on.
    #[arg(long, default_value = "about:blank")]
    pub page_location: String,

    /// DSN used to address the store request.
    #[arg(long, default_value = "https://public@localhost/1")]
    pub dsn: String,

    /// Print the store request (`url` and `body`) instead of the bare report.
    #[arg(long)]
    pub store_request: bool,
}

fn captured_value(raw: Value, args: &Args) -> JsValue {
    let mut value = JsValue::from(raw);
    if let JsValue::Object(obj) = &mut value {
        obj.class = args.class.into();
        obj.constructor.clone_from(&args.constructor);
    }
    value
}

pub fn run(args: Args) -> Result<(), Error> {
    let raw: Value = serde_json::from_str(&read_input(&args.input)?)?;
    let value = captured_value(raw, &args);
    debug!(class = ?args.class, rejection = args.rejection, "normalizing captured value");

    let config = ClientConfig::from_dsn(&args.dsn)?;
    let hooks = CaptureHooks::new(
        RecordingDispatcher::new(),
        config,
        PageContext::new(args.page_location.as_str()),
    );

    let report = if args.rejection {
        hooks.report_for_rejection(&value)
    } else {
        hooks.report_for_error(&ErrorEventInit {
            error: value,
            ..ErrorEventInit::default()
        })
    };

    let output = if args.store_request {
        let request = hooks.store_request(&report)?;
        json!({
            "url": request.url,
            "body": serde_json::from_str::<Value>(&request.body)?,
        })
    } else {
        serde_json::to_value(&report)?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
