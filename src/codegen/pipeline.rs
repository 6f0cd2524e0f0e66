//! The `execute_pipeline` function: data loading, the stage blocks, the
//! split warning, output persistence and the returned state mapping.

use super::invocation;
use super::writer::CodeWriter;
use crate::ir::types::*;

pub fn emit_execute_pipeline(ir: &PipelineIR, w: &mut CodeWriter) {
    w.banner("PIPELINE EXECUTION");
    w.blank();
    w.block_open(
        "def execute_pipeline(data_file, target_column='target', \
         output_file='output.csv', skip_split_warning=False)",
    );
    w.line("\"\"\"Execute the complete pipeline\"\"\"");
    w.line("print(\"=\" * 60)");
    w.line("print(\"PIPELINE EXECUTION\")");
    w.line("print(\"=\" * 60)");
    w.blank();

    emit_load_data(w);

    for block in &ir.stages {
        if block.invocations.is_empty() {
            continue;
        }
        emit_stage_block(block, w);
    }

    emit_split_warning(w);
    emit_save_output(w);
    emit_return(w);
    w.block_close();
}

fn emit_load_data(w: &mut CodeWriter) {
    w.line("print(\"\\n[LOADING DATA]\")");
    w.line("df = pd.read_csv(data_file)");
    w.line(r#"print(f"✓ Loaded {len(df)} samples")"#);
    w.line(r#"print(f"✓ Columns: {list(df.columns)}")"#);
    w.blank();

    w.block_open("if target_column in df.columns");
    w.line("X = df.drop(columns=[target_column])");
    w.line("y = df[target_column]");
    w.line(r#"print(f"✓ Target column: {target_column}")"#);
    w.block_continue("else");
    w.line("X = df");
    w.line("y = None");
    w.line(r#"print("⚠ No target column found, processing features only")"#);
    w.block_close();
    w.blank();

    w.line("current_data = X");
    w.line("model = None");
    w.line("le = None");
    w.line("X_train, X_test, y_train, y_test = None, None, None, None");
    w.line("split_performed = False");
    w.blank();
}

fn emit_stage_block(block: &StageBlock, w: &mut CodeWriter) {
    let number = block.stage.number();
    let title = block.stage.title();
    w.banner(&format!("STAGE {}: {}", number, title));
    w.line(&format!("print(\"\\n[STAGE {}] {}\")", number, title));
    w.blank();

    let total = block.invocations.len();
    for (i, inv) in block.invocations.iter().enumerate() {
        invocation::emit_invocation(inv, i + 1, total, w);
    }
}

fn emit_split_warning(w: &mut CodeWriter) {
    w.banner("VALIDATION CHECK");
    w.block_open("if model is not None and not split_performed and not skip_split_warning");
    w.line(r#"print("\n⚠ WARNING: Model was trained but no train/test split was performed!")"#);
    w.line(r#"print("  Metrics shown are from training data and may be overly optimistic.")"#);
    w.line(r#"print("  Consider adding a train/test split component to Stage 1.")"#);
    w.block_close();
    w.blank();
}

fn emit_save_output(w: &mut CodeWriter) {
    w.banner("SAVE OUTPUT");
    w.line(r#"print("\n[SAVING OUTPUT]")"#);
    w.block_open("if isinstance(current_data, pd.DataFrame)");
    w.line("current_data.to_csv(output_file, index=False)");
    w.line(r#"print(f"✓ Processed features saved to: {output_file}")"#);
    w.block_continue("else");
    w.line(r#"print("⚠ Could not save output (unsupported data type)")"#);
    w.block_close();
    w.blank();

    w.block_open("if X_test is not None");
    w.line("test_root, test_ext = os.path.splitext(output_file)");
    w.line("test_file = f\"{test_root}_test{test_ext}\"");
    w.block_open("if isinstance(X_test, pd.DataFrame)");
    w.line("X_test.to_csv(test_file, index=False)");
    w.line(r#"print(f"✓ Test features saved to: {test_file}")"#);
    w.block_close();
    w.block_close();
    w.blank();

    w.line("print(\"\\n\" + \"=\" * 60)");
    w.line("print(\"PIPELINE COMPLETED\")");
    w.line("print(\"=\" * 60)");
    w.blank();
}

fn emit_return(w: &mut CodeWriter) {
    w.line("return {");
    w.indent();
    w.lines(&[
        "'data': current_data,",
        "'model': model,",
        "'label_encoder': le,",
        "'X_train': X_train,",
        "'X_test': X_test,",
        "'y_train': y_train,",
        "'y_test': y_test,",
        "'split_performed': split_performed,",
    ]);
    w.dedent();
    w.line("}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ir_with(blocks: Vec<StageBlock>) -> PipelineIR {
        PipelineIR {
            metadata: PipelineMetadata {
                version: "1.0".into(),
                node_count: blocks.iter().map(|b| b.invocations.len()).sum(),
            },
            stages: blocks,
        }
    }

    fn call(callable: &str, role: NodeRole) -> Invocation {
        Invocation {
            node_id: callable.into(),
            label: callable.into(),
            callable: callable.into(),
            role,
            arguments: vec![],
        }
    }

    #[test]
    fn empty_stages_get_no_banner() {
        let ir = ir_with(vec![
            StageBlock {
                stage: Stage::Preprocessing,
                invocations: vec![call("clean", NodeRole::Transform)],
            },
            StageBlock {
                stage: Stage::FeatureEngineering,
                invocations: vec![],
            },
        ]);
        let mut w = CodeWriter::new();
        emit_execute_pipeline(&ir, &mut w);
        let out = w.finish();
        assert!(out.contains("    # STAGE 1: PREPROCESSING\n"));
        assert!(out.contains("    print(\"\\n[STAGE 1] PREPROCESSING\")\n"));
        assert!(!out.contains("STAGE 2"));
    }

    #[test]
    fn test_split_path_keeps_extension() {
        let mut w = CodeWriter::new();
        emit_execute_pipeline(&ir_with(vec![]), &mut w);
        let out = w.finish();
        assert!(out.contains("test_root, test_ext = os.path.splitext(output_file)"));
        assert!(out.contains("test_file = f\"{test_root}_test{test_ext}\""));
    }

    #[test]
    fn split_warning_precedes_saving() {
        let mut w = CodeWriter::new();
        emit_execute_pipeline(&ir_with(vec![]), &mut w);
        let out = w.finish();
        let warn = out.find("not skip_split_warning").unwrap();
        let save = out.find("[SAVING OUTPUT]").unwrap();
        assert!(warn < save);
        assert!(out.ends_with("        'split_performed': split_performed,\n    }\n"));
    }
}
