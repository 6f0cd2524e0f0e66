//! Manifest-level validation phase (pre-IR).
//!
//! Validates the parsed manifest before lowering to IR.

pub mod definitions;
pub mod identifier;
pub mod node_rules;
pub mod structural;

use crate::error::CompilerError;
use crate::parse::types::{PipelineNode, WorkflowManifest};

pub use definitions::check_definitions;

/// Validate the entire manifest (structural + per-node rules).
pub fn validate_manifest(manifest: &WorkflowManifest) -> Vec<CompilerError> {
    let mut errors = structural::validate_structural(manifest);

    for node in &manifest.nodes {
        errors.extend(validate_node(node));
    }

    errors
}

/// Validate a single node.
pub fn validate_node(node: &PipelineNode) -> Vec<CompilerError> {
    node_rules::validate_node_rules(node)
}
