use crate::value::{JsObject, JsValue, ObjectClass};

/// Structural classification of a captured value.
///
/// Produced by a single ordered predicate chain; the first matching predicate
/// wins, so an `ErrorEvent` carrying an error is never seen as a generic event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputShape<'a> {
    /// An error event whose `error` payload is set; holds the payload.
    WrappedErrorEvent(&'a JsValue),
    PlatformError(&'a JsObject),
    PlatformException(&'a JsObject),
    ErrorLike(&'a JsValue),
    GenericEvent(&'a JsObject),
    PlainObject(&'a JsObject),
    Primitive(&'a JsValue),
    Other(&'a JsValue),
}

impl<'a> InputShape<'a> {
    pub fn of(value: &'a JsValue) -> Self {
        let JsValue::Object(obj) = value else {
            return if value.is_primitive() {
                InputShape::Primitive(value)
            } else {
                InputShape::Other(value)
            };
        };

        if obj.class == ObjectClass::ErrorEvent {
            if let Some(inner) = obj.get("error").filter(|inner| inner.is_truthy()) {
                return InputShape::WrappedErrorEvent(inner);
            }
        }

        match obj.class {
            ObjectClass::DomError => InputShape::PlatformError(obj),
            ObjectClass::DomException => InputShape::PlatformException(obj),
            ObjectClass::Error | ObjectClass::Exception => InputShape::ErrorLike(value),
            class if class.is_event() => InputShape::GenericEvent(obj),
            ObjectClass::Plain => InputShape::PlainObject(obj),
            _ => InputShape::Other(value),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputShape::WrappedErrorEvent(_) => "wrapped_error_event",
            InputShape::PlatformError(_) => "platform_error",
            InputShape::PlatformException(_) => "platform_exception",
            InputShape::ErrorLike(_) => "error_like",
            InputShape::GenericEvent(_) => "generic_event",
            InputShape::PlainObject(_) => "plain_object",
            InputShape::Primitive(_) => "primitive",
            InputShape::Other(_) => "other",
        }
    }
}
