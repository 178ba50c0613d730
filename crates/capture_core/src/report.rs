use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized call-site record, oldest call first within a [`Stacktrace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFrame {
    pub filename: String,
    pub function: String,
    #[serde(rename = "lineno", default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(rename = "colno", default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub in_app: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacktrace {
    pub frames: Vec<CanonicalFrame>,
}

/// Capture-origin metadata. Fields are write-once: see [`Mechanism::merge_missing`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mechanism(BTreeMap<String, Value>);

impl Mechanism {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{handled, type}` as attached by the capture-site hooks.
    pub fn origin(handled: bool, kind: &str) -> Self {
        Self::new().with("handled", handled).with("type", kind)
    }

    pub fn synthetic() -> Self {
        Self::new().with("synthetic", true)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn handled(&self) -> Option<bool> {
        self.get("handled").and_then(Value::as_bool)
    }

    pub fn kind(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    pub fn is_synthetic(&self) -> bool {
        self.get("synthetic").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies every field of `fields` that is not already present.
    pub fn merge_missing(&mut self, fields: &Mechanism) {
        for (key, value) in &fields.0 {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mechanism: Option<Mechanism>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Stacktrace>,
}

impl ExceptionRecord {
    pub const DEFAULT_TYPE: &'static str = "Error";

    pub fn new(ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            value: value.into(),
            mechanism: None,
            stacktrace: None,
        }
    }

    pub fn frames(&self) -> &[CanonicalFrame] {
        self.stacktrace
            .as_ref()
            .map(|st| st.frames.as_slice())
            .unwrap_or_default()
    }
}

impl Default for ExceptionRecord {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TYPE, "")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionValues {
    pub values: Vec<ExceptionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    #[serde(rename = "__serialized__")]
    pub serialized_snapshot: Map<String, Value>,
}

/// The finished artifact handed to a dispatcher.
///
/// Either message-only (`message`, optional `stacktrace`) or exception-bearing.
/// When `exception` is present it holds exactly one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Stacktrace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Extra>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl ErrorReport {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn from_exception(record: ExceptionRecord) -> Self {
        Self {
            exception: Some(ExceptionValues {
                values: vec![record],
            }),
            ..Self::default()
        }
    }

    pub fn exception(&self) -> Option<&ExceptionRecord> {
        self.exception.as_ref().and_then(|ex| ex.values.first())
    }

    /// Returns the single exception record, creating a default one if absent.
    pub fn exception_mut(&mut self) -> &mut ExceptionRecord {
        let values = &mut self.exception.get_or_insert_with(ExceptionValues::default).values;
        if values.is_empty() {
            values.push(ExceptionRecord::default());
        }
        &mut values[0]
    }

    /// Fills an empty `value` and an empty `type` without touching populated ones.
    pub fn fill_exception_type_value(&mut self, value: &str, ty: Option<&str>) {
        let record = self.exception_mut();
        if record.value.is_empty() {
            record.value = value.to_string();
        }
        if record.ty.is_empty() {
            record.ty = ty.unwrap_or(ExceptionRecord::DEFAULT_TYPE).to_string();
        }
    }

    /// The `extra.__serialized__` snapshot as a JSON object, if any.
    pub fn serialized_snapshot(&self) -> Option<Value> {
        self.extra
            .as_ref()
            .map(|extra| Value::Object(extra.serialized_snapshot.clone()))
    }

    pub fn insert_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
    }
}
