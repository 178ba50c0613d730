use std::path::PathBuf;

use capture_core::{compute_stack_trace, JsObject, JsValue, ObjectClass};
use clap::Parser;

use crate::error::{read_input, Error};

#[derive(Debug, Parser)]
pub struct Args {
    /// File holding the raw `stack` text.
    #[arg(long)]
    pub input: PathBuf,

    /// Error name reported alongside the frames.
    #[arg(long)]
    pub name: Option<String>,

    /// Error message reported alongside the frames.
    #[arg(long)]
    pub message: Option<String>,
}

pub fn run(args: Args) -> Result<(), Error> {
    let stack = read_input(&args.input)?;

    let mut error = JsObject::new(ObjectClass::Error).with("stack", stack);
    if let Some(name) = args.name {
        error.set("name", name);
    }
    if let Some(message) = args.message {
        error.set("message", message);
    }

    let parsed = compute_stack_trace(&JsValue::from(error));
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}
