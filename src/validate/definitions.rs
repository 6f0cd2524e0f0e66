//! Static check that every invoked callable is defined in the component code.
//!
//! The component body text is never executed or parsed beyond a line scan for
//! top-level `def name(` headers.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CompilerError;
use crate::ir::types::PipelineIR;

static TOP_LEVEL_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:async[ \t]+)?def[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(")
        .expect("definition pattern is valid")
});

/// Count top-level function definitions by name.
pub fn defined_functions(component_code: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for caps in TOP_LEVEL_DEF.captures_iter(component_code) {
        if let Some(name) = caps.get(1) {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

/// Every callable must have exactly one top-level definition (V007/V008).
pub fn check_definitions(ir: &PipelineIR, component_code: &str) -> Vec<CompilerError> {
    let defined = defined_functions(component_code);
    let mut errors = Vec::new();
    let mut reported = Vec::new();

    for inv in ir.invocations() {
        if reported.contains(&inv.callable.as_str()) {
            continue;
        }
        match defined.get(inv.callable.as_str()).copied().unwrap_or(0) {
            1 => {}
            0 => {
                reported.push(inv.callable.as_str());
                errors.push(CompilerError::validate(
                    "V007",
                    format!("Function '{}' is not defined in the component code", inv.callable),
                    Some(inv.node_id.clone()),
                ));
            }
            n => {
                reported.push(inv.callable.as_str());
                errors.push(CompilerError::validate(
                    "V008",
                    format!(
                        "Function '{}' is defined {} times in the component code",
                        inv.callable, n
                    ),
                    Some(inv.node_id.clone()),
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_top_level_defs_only() {
        let code = "def clean(df):\n    def inner(x):\n        return x\n    return df\n\n\
                    async def fetch (u):\n    pass\n";
        let defs = defined_functions(code);
        assert_eq!(defs.get("clean"), Some(&1));
        assert_eq!(defs.get("fetch"), Some(&1));
        assert_eq!(defs.get("inner"), None);
    }

    #[test]
    fn counts_redefinitions() {
        let code = "def a(x):\n    pass\n\ndef a(x):\n    pass\n";
        assert_eq!(defined_functions(code).get("a"), Some(&2));
    }
}
