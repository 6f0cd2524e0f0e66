//! Manifest structural rules (V001, V003).
//!
//! Node ids are opaque to the compiler and may repeat: the same component can
//! run in several places of one pipeline.

use crate::error::CompilerError;
use crate::lower::resolve::callable_name;
use crate::parse::types::WorkflowManifest;

/// Run all structural validation rules. Returns all errors found.
pub fn validate_structural(manifest: &WorkflowManifest) -> Vec<CompilerError> {
    let mut errors = Vec::new();

    v001_non_empty(manifest, &mut errors);
    v003_callable_resolvable(manifest, &mut errors);

    errors
}

fn v001_non_empty(manifest: &WorkflowManifest, errors: &mut Vec<CompilerError>) {
    if manifest.nodes.is_empty() {
        errors.push(CompilerError::validate(
            "V001",
            "Manifest must contain at least one node",
            None,
        ));
    }
}

fn v003_callable_resolvable(manifest: &WorkflowManifest, errors: &mut Vec<CompilerError>) {
    for node in &manifest.nodes {
        if callable_name(node).is_none() {
            errors.push(CompilerError::validate(
                "V003",
                "Node has neither a code identifier nor a name to derive one from",
                Some(node.id.clone()),
            ));
        }
    }
}
