//! Compact digests of non-error objects: a bounded key list for the report
//! value and a shallow snapshot for `extra`.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::value::{JsObject, JsValue, ObjectClass};

pub const ELLIPSIS: &str = "<...>";
pub const NO_KEYS: &str = "[object has no keys]";
pub const MAX_KEYS_LENGTH: usize = 20;
pub const MAX_STRING_LENGTH: usize = 25;

const UNKNOWN_TARGET: &str = "<unknown>";
const MAX_TRAVERSE_HEIGHT: usize = 5;
const MAX_OUTPUT_LEN: usize = 80;
const SEPARATOR: &str = " > ";

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSummary {
    pub keys: String,
    pub snapshot: Map<String, Value>,
}

impl ObjectSummary {
    pub fn of(obj: &JsObject) -> Self {
        Self {
            keys: summarize_keys(walk_source(obj).keys()),
            snapshot: snapshot(obj),
        }
    }
}

fn prefix(s: &str, chars: usize) -> &str {
    match s.char_indices().nth(chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn ellipsize(s: &str, max: usize) -> String {
    format!("{}{ELLIPSIS}", prefix(s, max))
}

/// Strings longer than [`MAX_STRING_LENGTH`] keep 20 characters plus the ellipsis.
pub fn truncate(s: &str) -> String {
    if s.chars().count() > MAX_STRING_LENGTH {
        ellipsize(s, MAX_KEYS_LENGTH)
    } else {
        s.to_string()
    }
}

/// Sorted, comma-joined keys bounded to [`MAX_KEYS_LENGTH`] characters plus
/// an optional ellipsis.
pub fn summarize_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> String {
    let mut keys: Vec<&str> = keys.into_iter().collect();
    keys.sort_unstable();

    let Some(first) = keys.first() else {
        return NO_KEYS.to_string();
    };
    if first.chars().count() > MAX_KEYS_LENGTH {
        return ellipsize(first, MAX_KEYS_LENGTH);
    }

    for included in (1..=keys.len()).rev() {
        let serialized = keys[..included].join(", ");
        if serialized.chars().count() > MAX_KEYS_LENGTH {
            continue;
        }
        if included == keys.len() {
            return serialized;
        }
        return ellipsize(&serialized, MAX_KEYS_LENGTH);
    }

    ellipsize(&keys.join(", "), MAX_KEYS_LENGTH)
}

/// Shallow copy where long strings are truncated and objects become their type tag.
pub fn snapshot(obj: &JsObject) -> Map<String, Value> {
    obj.entries()
        .filter_map(|(key, value)| {
            let rendered = match value {
                JsValue::String(s) => Some(Value::String(truncate(s))),
                JsValue::Null | JsValue::Object(_) => Some(Value::String(value.type_tag())),
                other => other.to_json(),
            };
            rendered.map(|v| (key.to_string(), v))
        })
        .collect()
}

/// The view of `obj` whose keys and values are summarized.
pub fn walk_source(obj: &JsObject) -> Cow<'_, JsObject> {
    match obj.class {
        ObjectClass::Error | ObjectClass::Exception | ObjectClass::DomException => {
            let mut source = JsObject::plain();
            for key in ["message", "name", "stack"] {
                source.set(key, obj.get(key).cloned().unwrap_or(JsValue::Undefined));
            }
            copy_missing(&mut source, obj);
            Cow::Owned(source)
        }
        class if class.is_event() => {
            let mut source = JsObject::plain();
            source.set("type", obj.get("type").cloned().unwrap_or(JsValue::Undefined));
            source.set("target", describe_target(obj.get("target")));
            source.set("currentTarget", describe_target(obj.get("currentTarget")));
            if class == ObjectClass::CustomEvent {
                source.set("detail", obj.get("detail").cloned().unwrap_or(JsValue::Undefined));
            }
            copy_missing(&mut source, obj);
            Cow::Owned(source)
        }
        _ => Cow::Borrowed(obj),
    }
}

fn copy_missing(source: &mut JsObject, obj: &JsObject) {
    for (key, value) in obj.entries() {
        if !source.has(key) {
            source.set(key, value.clone());
        }
    }
}

fn describe_target(target: Option<&JsValue>) -> JsValue {
    let target = target.unwrap_or(&JsValue::Undefined);
    match target.as_object() {
        Some(el) if el.class == ObjectClass::Element => html_tree_as_string(el)
            .unwrap_or_else(|| UNKNOWN_TARGET.to_string())
            .into(),
        _ => target.type_tag().into(),
    }
}

fn element_as_string(el: &JsObject) -> Option<String> {
    let tag = el.get("tagName").and_then(JsValue::as_str)?;
    let mut out = tag.to_lowercase();

    if let Some(id) = el.get("id").and_then(JsValue::as_str).filter(|id| !id.is_empty()) {
        out.push('#');
        out.push_str(id);
    }

    // SVG elements expose their class list through `baseVal`.
    let class_name = match el.get("className") {
        Some(JsValue::String(s)) => Some(s.as_str()),
        Some(other) => other.get("baseVal").and_then(JsValue::as_str),
        None => None,
    };
    for class in class_name.unwrap_or_default().split_whitespace() {
        out.push('.');
        out.push_str(class);
    }

    Some(out)
}

/// CSS-like path of an element and up to four ancestors, e.g. `body > div#app`.
pub fn html_tree_as_string(elem: &JsObject) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut len = 0;
    let mut current = Some(elem);

    while let Some(el) = current {
        if parts.len() >= MAX_TRAVERSE_HEIGHT {
            break;
        }
        let Some(next) = element_as_string(el) else {
            break;
        };
        if next == "html"
            || (!parts.is_empty()
                && len + parts.len() * SEPARATOR.len() + next.len() >= MAX_OUTPUT_LEN)
        {
            break;
        }
        len += next.len();
        parts.push(next);
        current = el
            .get("parentNode")
            .and_then(JsValue::as_object)
            .filter(|parent| parent.class == ObjectClass::Element);
    }

    if parts.is_empty() {
        return None;
    }
    parts.reverse();
    Some(parts.join(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(tag: &str, id: &str, class: &str, parent: Option<JsObject>) -> JsObject {
        let mut el = JsObject::new(ObjectClass::Element)
            .with("tagName", tag)
            .with("id", id)
            .with("className", class);
        if let Some(parent) = parent {
            el.set("parentNode", parent);
        }
        el
    }

    #[test]
    fn short_key_list_is_verbatim() {
        assert_eq!(summarize_keys(["ccc", "a", "bb"]), "a, bb, ccc");
    }

    #[test]
    fn long_key_list_is_bounded() {
        let out = summarize_keys(["alpha", "bravo", "charlie", "delta", "echo"]);
        assert_eq!(out, "alpha, bravo<...>");
        assert!(out.chars().count() <= MAX_KEYS_LENGTH + ELLIPSIS.len());
    }

    #[test]
    fn long_first_key_is_truncated() {
        let out = summarize_keys(["averyveryverylongkeyname_indeed", "z"]);
        assert_eq!(out, "averyveryverylongkey<...>");
    }

    #[test]
    fn empty_keys() {
        assert_eq!(summarize_keys(std::iter::empty()), NO_KEYS);
    }

    #[test]
    fn snapshot_truncates_and_tags() {
        let obj = JsObject::plain()
            .with("short", "fits")
            .with("long", "0123456789012345678901234567")
            .with("nested", JsValue::from(json!({"a": 1})))
            .with("list", JsValue::from(json!([1])))
            .with("nothing", JsValue::Null)
            .with("n", 3.0)
            .with("cb", JsValue::Function(Some("cb".to_string())));

        assert_eq!(
            Value::Object(snapshot(&obj)),
            json!({
                "short": "fits",
                "long": "01234567890123456789<...>",
                "nested": "[object Object]",
                "list": "[object Array]",
                "nothing": "[object Null]",
                "n": 3.0
            })
        );
    }

    #[test]
    fn html_path_walks_ancestors() {
        let html = element("HTML", "", "", None);
        let body = element("BODY", "", "", Some(html));
        let div = element("DIV", "app", "main wide", Some(body));
        assert_eq!(html_tree_as_string(&div).unwrap(), "body > div#app.main.wide");
    }

    #[test]
    fn event_walk_source_describes_targets() {
        let button = element("BUTTON", "go", "", None);
        let event = JsObject::new(ObjectClass::Event)
            .with_constructor("MouseEvent")
            .with("type", "click")
            .with("target", button)
            .with("isTrusted", true);

        let source = walk_source(&event);
        assert_eq!(source.get("target"), Some(&JsValue::from("button#go")));
        assert_eq!(
            source.get("currentTarget"),
            Some(&JsValue::from("[object Undefined]"))
        );

        let summary = ObjectSummary::of(&event);
        assert_eq!(summary.keys, "currentTarget<...>");
        assert_eq!(summary.snapshot["isTrusted"], json!(true));
        assert_eq!(summary.snapshot["target"], json!("[object HTMLElement]"));
        assert!(!summary.snapshot.contains_key("currentTarget"));
    }

    #[test]
    fn element_without_tag_is_unknown() {
        let event = JsObject::new(ObjectClass::Event)
            .with("target", JsObject::new(ObjectClass::Element));
        assert_eq!(
            walk_source(&event).get("target"),
            Some(&JsValue::from(UNKNOWN_TARGET))
        );
    }
}
