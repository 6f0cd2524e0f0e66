//! IR invariant validation.
//!
//! Validates that a `PipelineIR` satisfies the structural invariants codegen
//! relies on before any text is emitted.

use std::collections::HashSet;

use crate::ir::types::*;
use crate::validate::identifier::{is_python_identifier, is_script_reserved};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    /// The node ID where the error was found, if applicable.
    pub node_id: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "[{}] {} (at node '{}')", self.code, self.message, id),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Validate a PipelineIR against all invariants. Returns all errors found.
pub fn validate_ir(ir: &PipelineIR) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_non_empty(ir, &mut errors);
    validate_callables(ir, &mut errors);
    validate_roles(ir, &mut errors);
    validate_unique_arguments(ir, &mut errors);
    validate_stage_order(ir, &mut errors);

    errors
}

// ---------------------------------------------------------------------------
// Invariant: at least one invocation
// ---------------------------------------------------------------------------

fn validate_non_empty(ir: &PipelineIR, errors: &mut Vec<ValidationError>) {
    if ir.invocations().next().is_none() {
        errors.push(ValidationError {
            code: "E001",
            message: "Pipeline must contain at least one invocation".into(),
            node_id: None,
        });
    }
}

// ---------------------------------------------------------------------------
// Invariant: every callable is a usable Python name
// ---------------------------------------------------------------------------

fn validate_callables(ir: &PipelineIR, errors: &mut Vec<ValidationError>) {
    for inv in ir.invocations() {
        if !is_python_identifier(&inv.callable) || is_script_reserved(&inv.callable) {
            errors.push(ValidationError {
                code: "E002",
                message: format!("Invalid callable name '{}'", inv.callable),
                node_id: Some(inv.node_id.clone()),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: role matches the enclosing stage
// ---------------------------------------------------------------------------

fn validate_roles(ir: &PipelineIR, errors: &mut Vec<ValidationError>) {
    for block in &ir.stages {
        for inv in &block.invocations {
            if !inv.role.allowed_in(block.stage) {
                errors.push(ValidationError {
                    code: "E003",
                    message: format!(
                        "Role '{}' is not permitted in {}",
                        inv.role.as_str(),
                        block.stage
                    ),
                    node_id: Some(inv.node_id.clone()),
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: keyword names are unique per call
// ---------------------------------------------------------------------------

fn validate_unique_arguments(ir: &PipelineIR, errors: &mut Vec<ValidationError>) {
    for inv in ir.invocations() {
        let mut seen = HashSet::new();
        for arg in &inv.arguments {
            if !seen.insert(arg.name.as_str()) {
                errors.push(ValidationError {
                    code: "E004",
                    message: format!(
                        "Duplicate keyword argument '{}' in call to '{}'",
                        arg.name, inv.callable
                    ),
                    node_id: Some(inv.node_id.clone()),
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: stage blocks appear once each, in stage order
// ---------------------------------------------------------------------------

fn validate_stage_order(ir: &PipelineIR, errors: &mut Vec<ValidationError>) {
    let ordered = ir.stages.windows(2).all(|w| w[0].stage < w[1].stage);
    if !ordered {
        errors.push(ValidationError {
            code: "E006",
            message: "Stage blocks must be unique and in stage order".into(),
            node_id: None,
        });
    }
}
