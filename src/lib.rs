//! Pipeline compiler: turns an exported ML workflow manifest plus the source
//! of its component functions into one runnable Python script.
//!
//! Phases: parse → validate → lower → IR validate → codegen.

pub mod codegen;
pub mod error;
pub mod ir;
pub mod lower;
pub mod parse;
pub mod sandbox;
pub mod store;
pub mod validate;
pub mod wasm;

use chrono::{DateTime, Utc};

use crate::error::CompilerError;
use crate::ir::types::PipelineIR;
use crate::parse::types::WorkflowManifest;

/// Compile manifest JSON and component code into a script stamped with the current time.
pub fn compile(json: &str, component_code: &str) -> Result<String, Vec<CompilerError>> {
    compile_at(json, component_code, Utc::now())
}

/// Same as [`compile`] with a fixed generation timestamp.
pub fn compile_at(
    json: &str,
    component_code: &str,
    generated_at: DateTime<Utc>,
) -> Result<String, Vec<CompilerError>> {
    let manifest = parse::parse(json)?;
    compile_manifest(&manifest, component_code, generated_at)
}

/// Compile an already parsed manifest.
pub fn compile_manifest(
    manifest: &WorkflowManifest,
    component_code: &str,
    generated_at: DateTime<Utc>,
) -> Result<String, Vec<CompilerError>> {
    let ir = build_ir(manifest)?;
    Ok(codegen::codegen(&ir, component_code, generated_at))
}

/// Run every phase up to (not including) codegen.
pub fn build_ir(manifest: &WorkflowManifest) -> Result<PipelineIR, Vec<CompilerError>> {
    let errors = validate::validate_manifest(manifest);
    if !errors.is_empty() {
        return Err(errors);
    }

    let ir = lower::lower(manifest)?;

    let ir_errors = ir::validate_ir(&ir);
    if !ir_errors.is_empty() {
        return Err(ir_errors.into_iter().map(CompilerError::from).collect());
    }

    tracing::debug!(
        nodes = ir.metadata.node_count,
        version = %ir.metadata.version,
        "manifest compiled to IR"
    );
    Ok(ir)
}
