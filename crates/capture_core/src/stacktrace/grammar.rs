use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::trace;

use super::{RawStackFrame, UNKNOWN_FUNCTION};

/// Per-line facts an extractor may consult besides the match itself.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineContext {
    pub(crate) index: usize,
    /// The error's `columnNumber`, when numeric.
    pub(crate) column_number: Option<f64>,
}

/// One recognized stack-trace dialect: a line pattern and the extractor
/// turning its captures into a frame.
pub(crate) struct LineGrammar {
    pub(crate) name: &'static str,
    pattern: &'static str,
    extract: fn(&Captures<'_>, LineContext) -> RawStackFrame,
}

const V8: &str = r"(?i)^\s*at (?:(.*?) ?\()?((?:file|https?|blob|chrome-extension|address|native|eval|webpack|<anonymous>|[-a-z]+:|.*bundle|/).*?)(?::(\d+))?(?::(\d+))?\)?\s*$";
const WINJS: &str = r"(?i)^\s*at (?:((?:\[object object\])?.+) )?\(?((?:file|ms-appx|https?|webpack|blob):.*?):(\d+)(?::(\d+))?\)?\s*$";
const GECKO: &str = r"(?i)^\s*(.*?)(?:\((.*?)\))?(?:^|@)?((?:file|https?|blob|chrome|webpack|resource|moz-extension|capacitor).*?:/.*?|\[native code\]|[^@]*(?:bundle|\d+\.js)|/[\w\-. /=]+)(?::(\d+))?(?::(\d+))?\s*$";
const OPERA10: &str = r"(?i) line (\d+).*script (?:in )?(\S+)(?:: in function (\S+))?$";
const OPERA11: &str = r"(?i) line (\d+), column (\d+)\s*(?:in (?:<anonymous function: ([^>]+)>|([^)]+))\((.*)\))? in (.*):\s*$";

const V8_EVAL: &str = r"\((\S*)(?::(\d+))(?::(\d+))\)";
const GECKO_EVAL: &str = r"(?i)(\S+) line (\d+)(?: > eval line \d+)* > eval";

/// Grammars for the generic `stack` property, tried top to bottom per line.
pub(crate) const STACK_GRAMMARS: &[LineGrammar] = &[
    LineGrammar {
        name: "v8",
        pattern: V8,
        extract: v8_frame,
    },
    LineGrammar {
        name: "winjs",
        pattern: WINJS,
        extract: winjs_frame,
    },
    LineGrammar {
        name: "gecko",
        pattern: GECKO,
        extract: gecko_frame,
    },
];

/// Grammars for the opera-style `stacktrace` property.
pub(crate) const STACKTRACE_GRAMMARS: &[LineGrammar] = &[
    LineGrammar {
        name: "opera10",
        pattern: OPERA10,
        extract: opera10_frame,
    },
    LineGrammar {
        name: "opera11",
        pattern: OPERA11,
        extract: opera11_frame,
    },
];

pub(crate) struct GrammarTable {
    entries: Vec<(&'static LineGrammar, Regex)>,
}

impl GrammarTable {
    fn compile(grammars: &'static [LineGrammar]) -> Self {
        let entries = grammars
            .iter()
            .map(|grammar| {
                let re = Regex::new(grammar.pattern).unwrap_or_else(|err| {
                    panic!("stack grammar {} is not a valid regex: {err}", grammar.name)
                });
                (grammar, re)
            })
            .collect();
        Self { entries }
    }

    /// First grammar whose pattern matches wins; `None` when none does.
    pub(crate) fn match_line(&self, line: &str, ctx: LineContext) -> Option<RawStackFrame> {
        self.entries.iter().find_map(|(grammar, re)| {
            let caps = re.captures(line)?;
            trace!(grammar = grammar.name, line = ctx.index, "stack line matched");
            Some((grammar.extract)(&caps, ctx))
        })
    }
}

pub(crate) fn stack_table() -> &'static GrammarTable {
    static TABLE: OnceLock<GrammarTable> = OnceLock::new();
    TABLE.get_or_init(|| GrammarTable::compile(STACK_GRAMMARS))
}

pub(crate) fn stacktrace_table() -> &'static GrammarTable {
    static TABLE: OnceLock<GrammarTable> = OnceLock::new();
    TABLE.get_or_init(|| GrammarTable::compile(STACKTRACE_GRAMMARS))
}

fn static_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static stack pattern is a valid regex"))
}

fn v8_eval_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    static_regex(&RE, V8_EVAL)
}

fn gecko_eval_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    static_regex(&RE, GECKO_EVAL)
}

/// A capture group, treating an empty match like a missing one.
fn group<'t>(caps: &Captures<'t>, idx: usize) -> Option<&'t str> {
    caps.get(idx).map(|m| m.as_str()).filter(|s| !s.is_empty())
}

/// Parses a digit group, saturating at `u32::MAX` when it overflows.
fn number(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    let digits = group(caps, idx)?;
    match digits.parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) if digits.bytes().all(|b| b.is_ascii_digit()) => Some(u32::MAX),
        Err(_) => None,
    }
}

fn split_args(raw: Option<&str>) -> Vec<String> {
    raw.map(|args| args.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

fn function_or_unknown(name: Option<&str>) -> String {
    name.unwrap_or(UNKNOWN_FUNCTION).to_string()
}

fn v8_frame(caps: &Captures<'_>, _ctx: LineContext) -> RawStackFrame {
    let mut location = group(caps, 2).unwrap_or_default().to_string();
    let mut line = number(caps, 3);
    let mut column = number(caps, 4);

    let is_native = location.starts_with("native");
    if location.starts_with("eval") {
        if let Some(sub) = v8_eval_re().captures(&location) {
            let target = sub.get(1).map(|m| m.as_str()).unwrap_or_default().to_string();
            line = number(&sub, 2);
            column = number(&sub, 3);
            location = target;
        }
    }

    let mut url = location
        .strip_prefix("address at ")
        .unwrap_or(&location)
        .to_string();
    let mut function = function_or_unknown(group(caps, 1));

    // Safari prefixes extension frames with a marker in the function slot.
    let extension_scheme = if function.contains("safari-extension") {
        Some("safari-extension")
    } else if function.contains("safari-web-extension") {
        Some("safari-web-extension")
    } else {
        None
    };
    if let Some(scheme) = extension_scheme {
        function = match function.split_once('@') {
            Some((head, _)) => head.to_string(),
            None => UNKNOWN_FUNCTION.to_string(),
        };
        url = format!("{scheme}:{url}");
    }

    RawStackFrame {
        url,
        function,
        arguments: if is_native { vec![location] } else { Vec::new() },
        line,
        column,
    }
}

fn winjs_frame(caps: &Captures<'_>, _ctx: LineContext) -> RawStackFrame {
    RawStackFrame {
        url: group(caps, 2).unwrap_or_default().to_string(),
        function: function_or_unknown(group(caps, 1)),
        arguments: Vec::new(),
        line: number(caps, 3),
        column: number(caps, 4),
    }
}

fn gecko_frame(caps: &Captures<'_>, ctx: LineContext) -> RawStackFrame {
    let mut function = group(caps, 1).map(str::to_string);
    let mut url = group(caps, 3).unwrap_or_default().to_string();
    let mut line = number(caps, 4);
    let mut column = number(caps, 5);

    let eval_target = if url.contains(" > eval") {
        gecko_eval_re().captures(&url).map(|sub| {
            (
                sub.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
                number(&sub, 2),
            )
        })
    } else {
        None
    };

    if let Some((target, target_line)) = eval_target {
        function.get_or_insert_with(|| "eval".to_string());
        url = target;
        line = target_line;
        column = None;
    } else if ctx.index == 0 && column.is_none() {
        if let Some(col) = ctx.column_number.filter(|c| c.is_finite() && *c >= 0.0) {
            column = Some((col as u32).saturating_add(1));
        }
    }

    RawStackFrame {
        url,
        function: function.unwrap_or_else(|| UNKNOWN_FUNCTION.to_string()),
        arguments: split_args(group(caps, 2)),
        line,
        column,
    }
}

fn opera10_frame(caps: &Captures<'_>, _ctx: LineContext) -> RawStackFrame {
    RawStackFrame {
        url: group(caps, 2).unwrap_or_default().to_string(),
        function: function_or_unknown(group(caps, 3)),
        arguments: Vec::new(),
        line: number(caps, 1),
        column: None,
    }
}

fn opera11_frame(caps: &Captures<'_>, _ctx: LineContext) -> RawStackFrame {
    RawStackFrame {
        url: group(caps, 6).unwrap_or_default().to_string(),
        function: function_or_unknown(group(caps, 3).or_else(|| group(caps, 4))),
        arguments: split_args(group(caps, 5)),
        line: number(caps, 1),
        column: number(caps, 2),
    }
}
