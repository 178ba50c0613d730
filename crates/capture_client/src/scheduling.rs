//! Display names for callbacks handed to the host's scheduling primitives, so
//! frames captured inside them read `setTimeout(poll)` instead of `?`.

pub const SCHEDULING_PRIMITIVES: [&str; 3] = ["setTimeout", "setInterval", "requestAnimationFrame"];

const ANONYMOUS: &str = "<anonymous>";

/// `wrapper(inner)`, or `wrapper(<anonymous>)` when the callback has no name.
pub fn wrapped_name(wrapper: &str, inner: Option<&str>) -> String {
    let inner = inner.filter(|name| !name.is_empty()).unwrap_or(ANONYMOUS);
    format!("{wrapper}({inner})")
}

/// A scheduled callback together with its composite display name.
#[derive(Debug, Clone)]
pub struct NamedCallback<F> {
    name: String,
    callback: F,
}

impl<F> NamedCallback<F> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<F: FnMut() -> R, R> NamedCallback<F> {
    pub fn call(&mut self) -> R {
        (self.callback)()
    }
}

pub fn decorate<F>(wrapper: &str, inner: Option<&str>, callback: F) -> NamedCallback<F> {
    NamedCallback {
        name: wrapped_name(wrapper, inner),
        callback,
    }
}
