//! Per-node rules (V004–V006).

use crate::error::CompilerError;
use crate::lower::resolve::callable_name;
use crate::parse::types::PipelineNode;

use super::identifier::{is_python_identifier, is_script_reserved};

pub fn validate_node_rules(node: &PipelineNode) -> Vec<CompilerError> {
    let mut errors = Vec::new();

    v004_callable_is_identifier(node, &mut errors);
    v005_binding_names_are_identifiers(node, &mut errors);
    v006_role_matches_stage(node, &mut errors);

    errors
}

fn v004_callable_is_identifier(node: &PipelineNode, errors: &mut Vec<CompilerError>) {
    // Unresolvable names are reported by V003.
    let Some(callable) = callable_name(node) else {
        return;
    };
    if !is_python_identifier(&callable) {
        errors.push(CompilerError::validate(
            "V004",
            format!(
                "Callable name '{}' is not a valid Python identifier; \
                 set an explicit code identifier",
                callable
            ),
            Some(node.id.clone()),
        ));
    } else if is_script_reserved(&callable) {
        errors.push(CompilerError::validate(
            "V004",
            format!(
                "Callable name '{}' clashes with a name used by the generated script",
                callable
            ),
            Some(node.id.clone()),
        ));
    }
}

fn v005_binding_names_are_identifiers(node: &PipelineNode, errors: &mut Vec<CompilerError>) {
    for name in node.variables.keys() {
        if !is_python_identifier(name) {
            errors.push(CompilerError::validate(
                "V005",
                format!("Binding name '{}' is not a valid keyword argument name", name),
                Some(node.id.clone()),
            ));
        }
    }
}

fn v006_role_matches_stage(node: &PipelineNode, errors: &mut Vec<CompilerError>) {
    let Some(role) = node.role else {
        return;
    };
    let stage = node.effective_stage();
    if !role.allowed_in(stage) {
        errors.push(CompilerError::validate(
            "V006",
            format!("Role '{}' cannot run in {}", role.as_str(), stage),
            Some(node.id.clone()),
        ));
    }
}
