//! Parse phase: manifest JSON → Rust types.

pub mod types;

pub use types::*;

use crate::error::CompilerError;

/// Deserialize a workflow manifest JSON string into a `WorkflowManifest`.
pub fn parse(json: &str) -> Result<WorkflowManifest, Vec<CompilerError>> {
    serde_json::from_str::<WorkflowManifest>(json).map_err(|e| {
        vec![CompilerError::parse(
            "P001",
            format!("Failed to parse workflow manifest JSON: {}", e),
        )]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_manifest() {
        let json = r#"{
            "version": "1.0",
            "nodes": [{ "id": "n1", "name": "Scale Features", "stage": 2 }]
        }"#;
        let manifest = parse(json).expect("should parse");
        assert_eq!(manifest.version, "1.0");
        assert_eq!(manifest.nodes.len(), 1);
        assert_eq!(manifest.nodes[0].stage, 2);
        assert!(manifest.nodes[0].variables.is_empty());
        assert!(manifest.nodes[0].role.is_none());
    }

    #[test]
    fn parse_rejects_object_binding() {
        let json = r#"{
            "version": "1.0",
            "nodes": [{ "id": "n1", "name": "x", "stage": 1, "variables": { "opts": { "a": 1 } } }]
        }"#;
        let errors = parse(json).unwrap_err();
        assert_eq!(errors[0].code, "P001");
    }

    #[test]
    fn parse_garbage_is_p001() {
        let errors = parse("{ nope").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "P001");
    }
}
