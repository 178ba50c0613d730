use serde_json::Value;

/// Host-runtime classification of an object, standing in for the `[object X]`
/// tag and prototype chain the host would expose.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ObjectClass {
    Plain,
    Error,
    Exception,
    DomError,
    DomException,
    ErrorEvent,
    Event,
    CustomEvent,
    Element,
    Array,
    Instance,
}

impl ObjectClass {
    pub fn tag_name(self) -> &'static str {
        match self {
            ObjectClass::Plain | ObjectClass::Instance => "Object",
            ObjectClass::Error => "Error",
            ObjectClass::Exception => "Exception",
            ObjectClass::DomError => "DOMError",
            ObjectClass::DomException => "DOMException",
            ObjectClass::ErrorEvent => "ErrorEvent",
            ObjectClass::Event => "Event",
            ObjectClass::CustomEvent => "CustomEvent",
            ObjectClass::Element => "HTMLElement",
            ObjectClass::Array => "Array",
        }
    }

    pub fn is_event(self) -> bool {
        matches!(
            self,
            ObjectClass::Event | ObjectClass::CustomEvent | ObjectClass::ErrorEvent
        )
    }

    fn is_error(self) -> bool {
        matches!(
            self,
            ObjectClass::Error
                | ObjectClass::Exception
                | ObjectClass::DomError
                | ObjectClass::DomException
        )
    }
}

/// A value as captured from the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Option<String>),
    Object(Box<JsObject>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsObject {
    pub class: ObjectClass,
    pub constructor: Option<String>,
    properties: Vec<(String, JsValue)>,
}

impl JsObject {
    pub fn new(class: ObjectClass) -> Self {
        Self {
            class,
            constructor: None,
            properties: Vec::new(),
        }
    }

    pub fn plain() -> Self {
        Self::new(ObjectClass::Plain)
    }

    pub fn with_constructor(mut self, name: impl Into<String>) -> Self {
        self.constructor = Some(name.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces an own property, keeping first-insertion order.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsValue>) {
        let key = key.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsValue> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(k, _)| k.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &JsValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn type_tag(&self) -> String {
        format!("[object {}]", self.class.tag_name())
    }

    /// Name of the constructor, falling back to the class tag.
    pub fn constructor_name(&self) -> &str {
        self.constructor
            .as_deref()
            .unwrap_or_else(|| self.class.tag_name())
    }

    fn to_js_string(&self) -> String {
        match self.class {
            ObjectClass::Array => self
                .properties
                .iter()
                .map(|(_, v)| match v {
                    JsValue::Undefined | JsValue::Null => String::new(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            class if class.is_error() => {
                let name = self
                    .get("name")
                    .filter(|v| !matches!(v, JsValue::Undefined))
                    .map(JsValue::to_js_string)
                    .unwrap_or_else(|| "Error".to_string());
                let message = self
                    .get("message")
                    .filter(|v| !matches!(v, JsValue::Undefined))
                    .map(JsValue::to_js_string)
                    .unwrap_or_default();
                match (name.is_empty(), message.is_empty()) {
                    (_, true) => name,
                    (true, false) => message,
                    (false, false) => format!("{name}: {message}"),
                }
            }
            _ => self.type_tag(),
        }
    }
}

impl JsValue {
    /// Builds an `Error` instance carrying `name`, `message` and optionally `stack`.
    pub fn error(name: &str, message: &str, stack: Option<&str>) -> Self {
        let mut obj = JsObject::new(ObjectClass::Error)
            .with_constructor(name)
            .with("name", name)
            .with("message", message);
        if let Some(stack) = stack {
            obj.set("stack", stack);
        }
        obj.into()
    }

    pub fn as_object(&self) -> Option<&JsObject> {
        match self {
            JsValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            JsValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Own-property lookup; absent for anything that is not an object.
    pub fn get(&self, key: &str) -> Option<&JsValue> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, JsValue::Undefined | JsValue::Null)
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, JsValue::Object(_) | JsValue::Function(_))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            JsValue::Undefined | JsValue::Null => false,
            JsValue::Bool(b) => *b,
            JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
            JsValue::String(s) => !s.is_empty(),
            JsValue::Function(_) | JsValue::Object(_) => true,
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null | JsValue::Object(_) => "object",
            JsValue::Bool(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::String(_) => "string",
            JsValue::Function(_) => "function",
        }
    }

    pub fn type_tag(&self) -> String {
        match self {
            JsValue::Undefined => "[object Undefined]".to_string(),
            JsValue::Null => "[object Null]".to_string(),
            JsValue::Bool(_) => "[object Boolean]".to_string(),
            JsValue::Number(_) => "[object Number]".to_string(),
            JsValue::String(_) => "[object String]".to_string(),
            JsValue::Function(_) => "[object Function]".to_string(),
            JsValue::Object(obj) => obj.type_tag(),
        }
    }

    pub fn to_js_string(&self) -> String {
        match self {
            JsValue::Undefined => "undefined".to_string(),
            JsValue::Null => "null".to_string(),
            JsValue::Bool(b) => b.to_string(),
            JsValue::Number(n) => format_number(*n),
            JsValue::String(s) => s.clone(),
            JsValue::Function(name) => format!(
                "function {}() {{ [native code] }}",
                name.as_deref().unwrap_or_default()
            ),
            JsValue::Object(obj) => obj.to_js_string(),
        }
    }

    /// JSON rendering of a primitive; `None` where the host would drop the value.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            JsValue::Undefined | JsValue::Function(_) => None,
            JsValue::Null => Some(Value::Null),
            JsValue::Bool(b) => Some(Value::Bool(*b)),
            JsValue::Number(n) => Some(
                serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            ),
            JsValue::String(s) => Some(Value::String(s.clone())),
            JsValue::Object(obj) => Some(Value::String(obj.type_tag())),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n == n.trunc() && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    format!("{n}")
}

impl From<JsObject> for JsValue {
    fn from(obj: JsObject) -> Self {
        JsValue::Object(Box::new(obj))
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::String(s.to_string())
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::String(s)
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        JsValue::Number(n)
    }
}

impl From<i64> for JsValue {
    fn from(n: i64) -> Self {
        JsValue::Number(n as f64)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Bool(b)
    }
}

impl From<Value> for JsValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsValue::Null,
            Value::Bool(b) => JsValue::Bool(b),
            Value::Number(n) => JsValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => JsValue::String(s),
            Value::Array(items) => {
                let mut obj = JsObject::new(ObjectClass::Array);
                for (idx, item) in items.into_iter().enumerate() {
                    obj.set(idx.to_string(), JsValue::from(item));
                }
                obj.into()
            }
            Value::Object(map) => {
                let mut obj = JsObject::plain();
                for (key, item) in map {
                    obj.set(key, JsValue::from(item));
                }
                obj.into()
            }
        }
    }
}
