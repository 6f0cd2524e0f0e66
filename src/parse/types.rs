//! Rust types for the exported workflow manifest.
//!
//! These types are the serde target for the manifest JSON produced by the
//! pipeline builder: an ordered node list, each node naming a component
//! callable, its stage, and the keyword arguments bound to it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// TOP-LEVEL MANIFEST
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowManifest {
    /// Echoed into the generated header, never validated.
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
    pub nodes: Vec<PipelineNode>,
}

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineNode {
    pub id: String,
    /// Display name. Slugified into the callable name when `code` is absent.
    #[serde(default)]
    pub name: String,
    /// Declared stage number. Values outside 1..=4 run in stage 1.
    #[serde(default)]
    pub stage: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit callable name of the component function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub inputs: Vec<ComponentInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ComponentOutput>,
    /// Keyword arguments, iterated in parameter-name order.
    #[serde(default)]
    pub variables: BTreeMap<String, BindingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<NodeRole>,
}

impl PipelineNode {
    /// The stage this node actually runs in.
    pub fn effective_stage(&self) -> Stage {
        Stage::normalize(self.stage)
    }

    /// Human label used in progress output: display name, else code identifier.
    pub fn label(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else {
            self.code.as_deref().unwrap_or(&self.id)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInput {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentOutput {
    #[serde(rename = "type", default)]
    pub data_type: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// STAGES
// =============================================================================

/// One of the four fixed pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "stage1")]
    Preprocessing,
    #[serde(rename = "stage2")]
    FeatureEngineering,
    #[serde(rename = "stage3")]
    Training,
    #[serde(rename = "stage4")]
    Evaluation,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Preprocessing,
        Stage::FeatureEngineering,
        Stage::Training,
        Stage::Evaluation,
    ];

    pub fn number(self) -> u8 {
        match self {
            Stage::Preprocessing => 1,
            Stage::FeatureEngineering => 2,
            Stage::Training => 3,
            Stage::Evaluation => 4,
        }
    }

    pub fn from_number(n: i64) -> Option<Stage> {
        match n {
            1 => Some(Stage::Preprocessing),
            2 => Some(Stage::FeatureEngineering),
            3 => Some(Stage::Training),
            4 => Some(Stage::Evaluation),
            _ => None,
        }
    }

    /// Out-of-range stage numbers fall back to preprocessing.
    pub fn normalize(n: i64) -> Stage {
        Stage::from_number(n).unwrap_or(Stage::Preprocessing)
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::Preprocessing => "PREPROCESSING",
            Stage::FeatureEngineering => "FEATURE ENGINEERING",
            Stage::Training => "MODEL TRAINING",
            Stage::Evaluation => "EVALUATION",
        }
    }

    /// Stages 1 and 2 both transform the working dataset.
    pub fn is_transform(self) -> bool {
        matches!(self, Stage::Preprocessing | Stage::FeatureEngineering)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStage(pub String);

impl fmt::Display for UnknownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stage '{}' (expected stage1..stage4 or 1..4)", self.0)
    }
}

impl std::error::Error for UnknownStage {}

impl FromStr for Stage {
    type Err = UnknownStage;

    /// Accepts `stage1`..`stage4` and bare `1`..`4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("stage").unwrap_or(trimmed);
        digits
            .parse::<i64>()
            .ok()
            .and_then(Stage::from_number)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Call shape a node takes inside its stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// `result = fn(current_data, ...)`.
    Transform,
    /// Transform that may drop rows; labels are re-synchronized afterwards.
    RowFilter,
    /// Train/test split producing four outputs.
    Split,
    /// Model fitting.
    Fit,
    /// Predict + score into a metrics mapping.
    Evaluate,
    /// Cross-validation summary over the fitted model.
    CrossValidate,
}

impl NodeRole {
    pub fn allowed_in(self, stage: Stage) -> bool {
        match self {
            NodeRole::Transform | NodeRole::RowFilter | NodeRole::Split => stage.is_transform(),
            NodeRole::Fit => stage == Stage::Training,
            NodeRole::Evaluate | NodeRole::CrossValidate => stage == Stage::Evaluation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeRole::Transform => "transform",
            NodeRole::RowFilter => "row_filter",
            NodeRole::Split => "split",
            NodeRole::Fit => "fit",
            NodeRole::Evaluate => "evaluate",
            NodeRole::CrossValidate => "cross_validate",
        }
    }
}

// =============================================================================
// BINDING VALUES
// =============================================================================

/// A literal bound to a keyword parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<BindingValue>),
}

impl BindingValue {
    pub fn string(s: impl Into<String>) -> Self {
        BindingValue::String(s.into())
    }

    pub fn number(n: f64) -> Self {
        BindingValue::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_normalize_out_of_range() {
        assert_eq!(Stage::normalize(0), Stage::Preprocessing);
        assert_eq!(Stage::normalize(7), Stage::Preprocessing);
        assert_eq!(Stage::normalize(-3), Stage::Preprocessing);
        assert_eq!(Stage::normalize(3), Stage::Training);
    }

    #[test]
    fn stage_from_str_accepts_both_spellings() {
        assert_eq!("stage2".parse::<Stage>(), Ok(Stage::FeatureEngineering));
        assert_eq!("4".parse::<Stage>(), Ok(Stage::Evaluation));
        assert!("stage9".parse::<Stage>().is_err());
        assert!("train".parse::<Stage>().is_err());
    }

    #[test]
    fn stage_serializes_as_stage_tag() {
        let json = serde_json::to_string(&Stage::Training).unwrap();
        assert_eq!(json, "\"stage3\"");
    }

    #[test]
    fn role_applicability() {
        assert!(NodeRole::Split.allowed_in(Stage::FeatureEngineering));
        assert!(!NodeRole::Split.allowed_in(Stage::Training));
        assert!(NodeRole::Fit.allowed_in(Stage::Training));
        assert!(NodeRole::CrossValidate.allowed_in(Stage::Evaluation));
        assert!(!NodeRole::Evaluate.allowed_in(Stage::Preprocessing));
    }

    #[test]
    fn binding_values_deserialize_by_shape() {
        let vars: BTreeMap<String, BindingValue> = serde_json::from_str(
            r#"{"a": null, "b": true, "c": 3, "d": "x", "e": [1, "y"]}"#,
        )
        .unwrap();
        assert_eq!(vars["a"], BindingValue::Null);
        assert_eq!(vars["b"], BindingValue::Bool(true));
        assert_eq!(vars["c"], BindingValue::Number(3.0));
        assert_eq!(vars["d"], BindingValue::string("x"));
        assert_eq!(
            vars["e"],
            BindingValue::Sequence(vec![BindingValue::Number(1.0), BindingValue::string("y")])
        );
    }

    #[test]
    fn label_falls_back_to_code() {
        let node: PipelineNode =
            serde_json::from_str(r#"{"id": "n1", "code": "scale_features", "stage": 1}"#).unwrap();
        assert_eq!(node.label(), "scale_features");
    }
}
