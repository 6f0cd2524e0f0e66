//! IR type definitions for the pipeline compiler.
//!
//! The IR bridges the exported manifest (input) and the generated Python
//! script (output). Nodes are bucketed into the four fixed stages, each
//! resolved to a callable name, a call-shape role and an ordered keyword
//! argument list.

use serde::{Deserialize, Serialize};

pub use crate::parse::types::{BindingValue, NodeRole, Stage};

// =============================================================================
// TOP-LEVEL IR
// =============================================================================

/// Complete intermediate representation of a compiled pipeline.
/// Produced by the lowering pass, consumed by the codegen pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineIR {
    pub metadata: PipelineMetadata,
    /// One block per stage, in stage order. Empty stages are kept.
    pub stages: Vec<StageBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// Manifest format version, echoed into the script header.
    pub version: String,
    /// Total number of nodes across all stages.
    pub node_count: usize,
}

impl PipelineIR {
    pub fn block(&self, stage: Stage) -> Option<&StageBlock> {
        self.stages.iter().find(|b| b.stage == stage)
    }

    /// All invocations in execution order.
    pub fn invocations(&self) -> impl Iterator<Item = &Invocation> {
        self.stages.iter().flat_map(|b| b.invocations.iter())
    }

    pub fn has_invocations_in(&self, stage: Stage) -> bool {
        self.block(stage).is_some_and(|b| !b.invocations.is_empty())
    }
}

// =============================================================================
// STAGES AND INVOCATIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageBlock {
    pub stage: Stage,
    pub invocations: Vec<Invocation>,
}

/// A single component call inside a stage block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// Source node identifier, for diagnostics only.
    pub node_id: String,
    /// Label printed in the progress output.
    pub label: String,
    /// Python function name defined in the component body text.
    pub callable: String,
    pub role: NodeRole,
    /// Keyword arguments, sorted by name.
    pub arguments: Vec<KeywordArg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordArg {
    pub name: String,
    pub value: BindingValue,
}

impl KeywordArg {
    pub fn new(name: impl Into<String>, value: BindingValue) -> Self {
        KeywordArg {
            name: name.into(),
            value,
        }
    }
}
