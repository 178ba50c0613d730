use crate::value::JsValue;

pub const NO_ERROR_MESSAGE: &str = "No error message";

/// Human-readable message of an arbitrary captured value.
///
/// Doubly-wrapped platform errors carry their text under `message.error.message`.
pub fn extract_message(ex: &JsValue) -> String {
    let Some(message) = ex.get("message").filter(|m| m.is_truthy()) else {
        return NO_ERROR_MESSAGE.to_string();
    };
    if let Some(nested) = message
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(JsValue::as_str)
    {
        return nested.to_string();
    }
    message.to_js_string()
}
