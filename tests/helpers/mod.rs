use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use pipeline_compiler::parse::types::*;

// =============================================================================
// Manifest builders
// =============================================================================

/// Node with a display name and stage, no code identifier or bindings.
pub fn node(id: &str, name: &str, stage: i64) -> PipelineNode {
    PipelineNode {
        id: id.into(),
        name: name.into(),
        stage,
        description: None,
        code: None,
        inputs: vec![],
        output: None,
        variables: BTreeMap::new(),
        role: None,
    }
}

/// Node with an explicit code identifier.
pub fn code_node(id: &str, code: &str, stage: i64) -> PipelineNode {
    PipelineNode {
        code: Some(code.into()),
        ..node(id, "", stage)
    }
}

pub fn with_var(mut node: PipelineNode, name: &str, value: BindingValue) -> PipelineNode {
    node.variables.insert(name.into(), value);
    node
}

pub fn with_role(mut node: PipelineNode, role: NodeRole) -> PipelineNode {
    node.role = Some(role);
    node
}

pub fn manifest(nodes: Vec<PipelineNode>) -> WorkflowManifest {
    WorkflowManifest {
        version: "1.0".into(),
        exported_at: None,
        nodes,
    }
}

pub fn manifest_json(nodes: Vec<PipelineNode>) -> String {
    serde_json::to_string(&manifest(nodes)).expect("manifest serializes")
}

// =============================================================================
// Component code
// =============================================================================

/// One stub definition per name, separated by blank lines.
pub fn stub_definitions(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("def {}(*args, **kwargs):\n    return args[0] if args else None\n", n))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

// =============================================================================
// Script inspection
// =============================================================================

/// Text between the banner of `stage` and the next banner line.
pub fn stage_section(script: &str, stage: u8) -> &str {
    let start = script
        .find(&format!("# STAGE {}:", stage))
        .unwrap_or_else(|| panic!("no banner for stage {}", stage));
    let body_start = start + script[start..].find('\n').map_or(0, |i| i + 1);
    // Skip the closing rule of this banner.
    let body_start = body_start + script[body_start..].find('\n').map_or(0, |i| i + 1);
    let end = script[body_start..]
        .find("# ====")
        .map_or(script.len(), |i| body_start + i);
    &script[body_start..end]
}
