//! Callable name and call-shape role resolution.
//!
//! An explicit `role` on the node always wins. Without one, the role is
//! inferred from keywords in the callable name.

use crate::parse::types::{NodeRole, PipelineNode, Stage};

const SPLIT_KEYWORDS: &[&str] = &["split", "stratified"];
const CROSS_VALIDATION_KEYWORDS: &[&str] = &["cross", "kfold", "k_fold", "_cv", "crossval"];
const ROW_FILTER_KEYWORDS: &[&str] = &["outlier", "remove", "drop", "filter"];

/// Lowercase and replace spaces with underscores: "Train Test Split" → "train_test_split".
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// The Python function name a node invokes. `None` when the node carries
/// neither a code identifier nor a display name.
pub fn callable_name(node: &PipelineNode) -> Option<String> {
    if let Some(code) = node.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        return Some(code.to_string());
    }
    let name = node.name.trim();
    if name.is_empty() {
        None
    } else {
        Some(slugify(name))
    }
}

pub fn resolve_role(node: &PipelineNode, stage: Stage, callable: &str) -> NodeRole {
    node.role.unwrap_or_else(|| infer_role(stage, callable))
}

/// Keyword-based role inference for nodes without an explicit role.
pub fn infer_role(stage: Stage, callable: &str) -> NodeRole {
    match stage {
        Stage::Preprocessing | Stage::FeatureEngineering => {
            if contains_any(callable, SPLIT_KEYWORDS) {
                NodeRole::Split
            } else if contains_any(callable, ROW_FILTER_KEYWORDS) {
                NodeRole::RowFilter
            } else {
                NodeRole::Transform
            }
        }
        Stage::Training => NodeRole::Fit,
        Stage::Evaluation => {
            if contains_any(callable, CROSS_VALIDATION_KEYWORDS) {
                NodeRole::CrossValidate
            } else {
                NodeRole::Evaluate
            }
        }
    }
}

fn contains_any(callable: &str, keywords: &[&str]) -> bool {
    let lower = callable.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}
