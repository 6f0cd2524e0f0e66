//! BindingValue → Python literal conversion.

use crate::ir::types::{BindingValue, KeywordArg};

/// Strings emitted bare because they already spell a Python constant.
const PYTHON_CONSTANTS: &[&str] = &["None", "True", "False"];

/// Format keyword arguments as `name=value` pairs joined by `, `.
/// Empty-string bindings and names listed in `exclude` are dropped.
pub fn emit_keyword_args(args: &[KeywordArg], exclude: &[&str]) -> String {
    args.iter()
        .filter(|a| !exclude.contains(&a.name.as_str()))
        .filter_map(|a| emit_binding_value(&a.value).map(|v| format!("{}={}", a.name, v)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convert a top-level binding into a Python expression.
/// Returns `None` for an empty string, which means "leave the parameter unset".
pub fn emit_binding_value(value: &BindingValue) -> Option<String> {
    match value {
        BindingValue::String(s) if s.is_empty() => None,
        BindingValue::String(s) => Some(emit_string_binding(s)),
        BindingValue::Number(n) => Some(emit_number(*n)),
        BindingValue::Bool(b) => Some(emit_bool(*b).to_string()),
        BindingValue::Null => Some("None".to_string()),
        BindingValue::Sequence(items) => Some(emit_sequence(items)),
    }
}

/// Strings that already read as Python literals pass through unquoted.
fn emit_string_binding(s: &str) -> String {
    if PYTHON_CONSTANTS.contains(&s) || is_numeric(s) || is_bracketed(s) {
        s.to_string()
    } else {
        quote_single(s)
    }
}

/// Whole numbers print as integers, everything else with six decimals.
pub fn emit_number(n: f64) -> String {
    if n.is_nan() {
        return "float('nan')".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "float('inf')" } else { "-float('inf')" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        format!("{:.6}", n)
    }
}

fn emit_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Sequence elements never get the bare-string treatment: strings are always quoted.
fn emit_sequence(items: &[BindingValue]) -> String {
    let parts: Vec<String> = items.iter().map(emit_sequence_element).collect();
    format!("[{}]", parts.join(", "))
}

fn emit_sequence_element(item: &BindingValue) -> String {
    match item {
        BindingValue::String(s) => quote_single(s),
        BindingValue::Number(n) => emit_number(*n),
        BindingValue::Bool(b) => emit_bool(*b).to_string(),
        BindingValue::Null => "None".to_string(),
        BindingValue::Sequence(inner) => emit_sequence(inner),
    }
}

fn is_numeric(s: &str) -> bool {
    s.parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_bracketed(s: &str) -> bool {
    [('(', ')'), ('[', ']'), ('{', '}')]
        .iter()
        .any(|&(open, close)| s.len() >= 2 && s.starts_with(open) && s.ends_with(close))
}

/// Single-quoted Python string literal.
pub fn quote_single(s: &str) -> String {
    format!("'{}'", escape(s, '\''))
}

/// Double-quoted Python string literal.
pub fn quote_double(s: &str) -> String {
    format!("\"{}\"", escape(s, '"'))
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
