//! Component records and the read-only store interface the compiler pulls
//! component bodies from.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parse::types::{ComponentInput, ComponentOutput, Stage, WorkflowManifest};

/// A reusable component as kept in the component library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Source text defining the component function.
    pub code: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub stage: Stage,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<ComponentInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ComponentOutput>,
}

fn default_language() -> String {
    "python".into()
}

impl Component {
    /// Output type `none` means the component returns nothing useful.
    pub fn has_output(&self) -> bool {
        self.output.as_ref().is_some_and(|o| o.data_type != "none")
    }

    pub fn required_inputs(&self) -> impl Iterator<Item = &ComponentInput> {
        self.inputs.iter().filter(|i| i.required)
    }

    pub fn optional_inputs(&self) -> impl Iterator<Item = &ComponentInput> {
        self.inputs.iter().filter(|i| !i.required)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Component not found: {0}")]
    NotFound(String),

    #[error("Component not found at index {index}: {id}")]
    MissingItem { index: usize, id: String },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Read access to the component library.
pub trait ComponentStore {
    fn fetch(&self, id: &str) -> Result<Component, StoreError>;

    /// All components of one stage, ordered by id.
    fn fetch_by_stage(&self, stage: Stage) -> Result<Vec<Component>, StoreError>;
}

/// In-memory store, used by the CLI (loaded from a JSON file) and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    components: BTreeMap<String, Component>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later components with an existing id replace the earlier entry.
    pub fn insert(&mut self, component: Component) {
        self.components.insert(component.id.clone(), component);
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<Component> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut store = MemoryStore::new();
        for component in iter {
            store.insert(component);
        }
        store
    }
}

impl ComponentStore for MemoryStore {
    fn fetch(&self, id: &str) -> Result<Component, StoreError> {
        self.components
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn fetch_by_stage(&self, stage: Stage) -> Result<Vec<Component>, StoreError> {
        Ok(self
            .components
            .values()
            .filter(|c| c.stage == stage)
            .cloned()
            .collect())
    }
}

/// One entry of an ordered concatenation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum WorkflowItem {
    /// Component identifier, resolved through the store.
    Id(String),
    /// Raw code inserted as-is.
    Code(String),
}

/// Join the code of every item with a blank line between items.
pub fn concatenate(
    items: &[WorkflowItem],
    store: &dyn ComponentStore,
) -> Result<String, StoreError> {
    let mut blocks = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            WorkflowItem::Id(id) => {
                let component = store.fetch(id).map_err(|e| match e {
                    StoreError::NotFound(id) => StoreError::MissingItem { index, id },
                    other => other,
                })?;
                // A transform's return value replaces the working data.
                let declared_none = component.output.is_some() && !component.has_output();
                if component.stage.is_transform() && declared_none {
                    tracing::warn!(
                        component = %component.id,
                        "transform component declares output type none"
                    );
                }
                blocks.push(component.code);
            }
            WorkflowItem::Code(code) => blocks.push(code.clone()),
        }
    }
    Ok(blocks.join("\n\n"))
}

/// Component bodies for a manifest, treating node ids as component ids.
/// Each distinct id is fetched once, in first-appearance order.
pub fn component_code_for(
    manifest: &WorkflowManifest,
    store: &dyn ComponentStore,
) -> Result<String, StoreError> {
    let mut seen = BTreeSet::new();
    let items: Vec<WorkflowItem> = manifest
        .nodes
        .iter()
        .filter(|n| seen.insert(n.id.as_str()))
        .map(|n| WorkflowItem::Id(n.id.clone()))
        .collect();
    tracing::debug!(components = items.len(), "gathering component code");
    concatenate(&items, store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(id: &str, stage: Stage, code: &str) -> Component {
        Component {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            code: code.into(),
            language: "python".into(),
            stage,
            tags: vec![],
            inputs: vec![],
            output: None,
        }
    }

    fn store() -> MemoryStore {
        [
            component("a", Stage::Preprocessing, "def a(df):\n    return df"),
            component("b", Stage::Training, "def b(X, y):\n    return None"),
            component("c", Stage::Preprocessing, "def c(df):\n    return df"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn concatenate_mixes_ids_and_raw_code() {
        let items = vec![
            WorkflowItem::Id("a".into()),
            WorkflowItem::Code("x = 1".into()),
            WorkflowItem::Id("b".into()),
        ];
        let code = concatenate(&items, &store()).unwrap();
        assert_eq!(
            code,
            "def a(df):\n    return df\n\nx = 1\n\ndef b(X, y):\n    return None"
        );
    }

    #[test]
    fn missing_component_reports_index() {
        let items = vec![WorkflowItem::Code("x = 1".into()), WorkflowItem::Id("zzz".into())];
        let err = concatenate(&items, &store()).unwrap_err();
        assert!(matches!(err, StoreError::MissingItem { index: 1, ref id } if id == "zzz"));
        assert_eq!(err.to_string(), "Component not found at index 1: zzz");
    }

    #[test]
    fn transform_without_output_is_still_concatenated() {
        let mut silent = component("s", Stage::FeatureEngineering, "def s(df):\n    print(df)");
        silent.output = Some(ComponentOutput {
            data_type: "none".into(),
            description: String::new(),
        });
        assert!(!silent.has_output());
        let store: MemoryStore = [silent].into_iter().collect();
        let code = concatenate(&[WorkflowItem::Id("s".into())], &store).unwrap();
        assert_eq!(code, "def s(df):\n    print(df)");
    }

    #[test]
    fn fetch_by_stage_filters() {
        let stage1 = store().fetch_by_stage(Stage::Preprocessing).unwrap();
        let ids: Vec<&str> = stage1.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(store().fetch_by_stage(Stage::Evaluation).unwrap().is_empty());
    }

    #[test]
    fn workflow_item_json_shape() {
        let json = r#"[{"type": "id", "value": "a"}, {"type": "code", "value": "pass"}]"#;
        let items: Vec<WorkflowItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items, vec![WorkflowItem::Id("a".into()), WorkflowItem::Code("pass".into())]);
    }

    #[test]
    fn component_stage_uses_stage_tag() {
        let c: Component = serde_json::from_str(
            r#"{"id": "a", "name": "A", "code": "def a(): pass", "stage": "stage3",
                "output": {"type": "none"}}"#,
        )
        .unwrap();
        assert_eq!(c.stage, Stage::Training);
        assert_eq!(c.language, "python");
        assert!(!c.has_output());
    }
}
