//! Codegen pass: PipelineIR → self-contained Python script.
//!
//! Public API: `codegen(ir, component_code, generated_at) -> String`

mod entry;
mod header;
mod imports;
mod invocation;
mod literal;
mod pipeline;
mod writer;

use chrono::{DateTime, Utc};

use crate::ir::types::PipelineIR;
use writer::CodeWriter;

pub use entry::{EXIT_FAILURE, EXIT_FILE_NOT_FOUND, EXIT_MISSING_COLUMN};
pub use invocation::synthesize;
pub use literal::{emit_binding_value, emit_keyword_args};

/// Generate the complete script from a validated PipelineIR.
///
/// `component_code` is inserted verbatim after the imports. The output is a
/// pure function of its inputs; `generated_at` is the only part that varies
/// between otherwise identical runs.
pub fn codegen(ir: &PipelineIR, component_code: &str, generated_at: DateTime<Utc>) -> String {
    let mut w = CodeWriter::new();

    // 1. PREAMBLE + COMPONENT BODIES
    header::emit_header(ir, component_code, generated_at, &mut w);

    // 2. EXECUTE_PIPELINE
    pipeline::emit_execute_pipeline(ir, &mut w);
    w.blank();
    w.blank();

    // 3. ARGPARSE MAIN
    entry::emit_entry_point(&mut w);

    tracing::debug!(
        invocations = ir.invocations().count(),
        bytes = w.len(),
        "generated script"
    );

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::types::*;
    use chrono::TimeZone;

    #[test]
    fn codegen_orders_sections() {
        let ir = PipelineIR {
            metadata: PipelineMetadata {
                version: "1.0".into(),
                node_count: 1,
            },
            stages: vec![StageBlock {
                stage: Stage::Training,
                invocations: vec![Invocation {
                    node_id: "n1".into(),
                    label: "Random Forest".into(),
                    callable: "random_forest".into(),
                    role: NodeRole::Fit,
                    arguments: vec![KeywordArg::new("n_estimators", BindingValue::Number(100.0))],
                }],
            }],
        };
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let script = codegen(&ir, "def random_forest(X, y, n_estimators=10):\n    pass\n", at);

        let positions: Vec<usize> = [
            "#!/usr/bin/env python3",
            "import pandas as pd",
            "def random_forest(X, y",
            "def execute_pipeline(",
            "# STAGE 3: MODEL TRAINING",
            "from sklearn.preprocessing import LabelEncoder",
            "model = random_forest(X_fit, y_encoded, n_estimators=100)",
            "def main():",
            "if __name__ == \"__main__\":",
        ]
        .iter()
        .map(|needle| script.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
        assert!(positions.windows(2).all(|p| p[0] < p[1]), "{positions:?}");
    }
}
