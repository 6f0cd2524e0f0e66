//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::error::CompilerError;

/// Validate a manifest JSON: parse + manifest rules + lowering + IR checks.
/// Returns a JSON array of CompilerError objects (empty when valid).
#[wasm_bindgen]
pub fn validate_manifest(json: &str) -> JsValue {
    let result = validate_manifest_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_manifest_inner(json: &str) -> Vec<ErrorDto> {
    let manifest = match crate::parse::parse(json) {
        Ok(m) => m,
        Err(errors) => return errors.into_iter().map(ErrorDto::from).collect(),
    };

    match crate::build_ir(&manifest) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.into_iter().map(ErrorDto::from).collect(),
    }
}

/// Full pipeline: parse → validate → lower → IR validate → codegen.
/// Returns a JSON object with either `script` (success) or `errors` (failure).
#[wasm_bindgen]
pub fn generate_script(json: &str, component_code: &str) -> JsValue {
    let result = generate_script_inner(json, component_code);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn generate_script_inner(json: &str, component_code: &str) -> GenerateResult {
    match crate::compile(json, component_code) {
        Ok(script) => GenerateResult::Success { script },
        Err(errors) => GenerateResult::Errors {
            errors: errors.into_iter().map(ErrorDto::from).collect(),
        },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node_id: Option<String>,
}

impl From<CompilerError> for ErrorDto {
    fn from(e: CompilerError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            node_id: e.node_id,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum GenerateResult {
    #[serde(rename = "success")]
    Success { script: String },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_reports_parse_error() {
        let errors = validate_manifest_inner("{");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "P001");
        assert_eq!(errors[0].phase, "Parse");
    }

    #[test]
    fn validate_accepts_minimal_manifest() {
        let json = r#"{"version": "1.0", "nodes": [{"id": "n1", "name": "Scale", "stage": 1}]}"#;
        assert!(validate_manifest_inner(json).is_empty());
    }

    #[test]
    fn generate_result_is_tagged() {
        let json = r#"{"version": "1.0", "nodes": []}"#;
        let value = serde_json::to_value(generate_script_inner(json, "")).unwrap();
        assert_eq!(value["status"], "errors");
        assert_eq!(value["errors"][0]["code"], "V001");
    }
}
