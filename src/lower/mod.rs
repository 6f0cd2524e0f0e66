//! Lowering phase: WorkflowManifest → PipelineIR.
//!
//! Partitions nodes into stage buckets, then resolves each node's callable
//! name, role and keyword arguments.

pub mod partition;
pub mod resolve;

use crate::error::CompilerError;
use crate::ir::types::*;
use crate::parse::types::{PipelineNode, WorkflowManifest};

pub use partition::{partition, StageBuckets};

/// Lower a parsed manifest into a PipelineIR.
pub fn lower(manifest: &WorkflowManifest) -> Result<PipelineIR, Vec<CompilerError>> {
    let buckets = partition(&manifest.nodes);
    let mut errors = Vec::new();
    let mut stages = Vec::with_capacity(buckets.len());

    for (stage, nodes) in buckets {
        let mut invocations = Vec::with_capacity(nodes.len());
        for node in nodes {
            match lower_node(node, stage) {
                Ok(inv) => invocations.push(inv),
                Err(e) => errors.push(e),
            }
        }
        stages.push(StageBlock { stage, invocations });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    tracing::debug!(
        nodes = manifest.nodes.len(),
        version = %manifest.version,
        "lowered manifest"
    );

    Ok(PipelineIR {
        metadata: PipelineMetadata {
            version: manifest.version.clone(),
            node_count: manifest.nodes.len(),
        },
        stages,
    })
}

fn lower_node(node: &PipelineNode, stage: Stage) -> Result<Invocation, CompilerError> {
    let callable = resolve::callable_name(node).ok_or_else(|| {
        CompilerError::lower(
            "L001",
            "Cannot resolve a callable name: node has no code identifier or name",
            Some(node.id.clone()),
        )
    })?;
    let role = resolve::resolve_role(node, stage, &callable);

    for (name, value) in &node.variables {
        if matches!(value, BindingValue::String(s) if s.is_empty()) {
            tracing::debug!(
                node = %node.id,
                parameter = %name,
                "empty string binding will be omitted from the call"
            );
        }
    }

    Ok(Invocation {
        node_id: node.id.clone(),
        label: node.label().to_string(),
        callable,
        role,
        arguments: node
            .variables
            .iter()
            .map(|(name, value)| KeywordArg::new(name.clone(), value.clone()))
            .collect(),
    })
}
