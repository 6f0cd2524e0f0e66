//! Per-role Python emission for a single component invocation.
//!
//! Each function emits the statements for one call shape. Every call is wrapped
//! in `try`/`except` so that a failing component is reported and skipped while
//! the pipeline keeps the state it had before the call.

use super::literal::{emit_keyword_args, quote_double};
use super::writer::CodeWriter;
use crate::ir::types::*;

/// Parameter the split call receives positionally, so it is never passed as a keyword.
const SPLIT_TARGET_PARAM: &str = "target_column";

/// Render one invocation as a block of statements indented for the body of
/// `execute_pipeline`. `index` is 1-based within the stage.
pub fn synthesize(inv: &Invocation, index: usize, total: usize) -> String {
    let mut w = CodeWriter::with_indent(1);
    emit_invocation(inv, index, total, &mut w);
    w.finish()
}

pub fn emit_invocation(inv: &Invocation, index: usize, total: usize, w: &mut CodeWriter) {
    match inv.role {
        NodeRole::Transform | NodeRole::RowFilter => emit_transform(inv, index, total, w),
        NodeRole::Split => emit_split(inv, index, total, w),
        NodeRole::Fit => emit_fit(inv, index, total, w),
        NodeRole::CrossValidate => emit_cross_validation(inv, index, total, w),
        NodeRole::Evaluate => emit_evaluation(inv, index, total, w),
    }
    w.blank();
}

/// `name(pos1, pos2, k=v, ...)`.
pub fn call_expr(
    callable: &str,
    positional: &[&str],
    args: &[KeywordArg],
    exclude: &[&str],
) -> String {
    let mut parts: Vec<String> = positional.iter().map(|p| p.to_string()).collect();
    let keywords = emit_keyword_args(args, exclude);
    if !keywords.is_empty() {
        parts.push(keywords);
    }
    format!("{}({})", callable, parts.join(", "))
}

fn progress_line(verb: &str, inv: &Invocation, index: usize, total: usize) -> String {
    let message = format!("  [{}/{}] {}: {}", index, total, verb, inv.label);
    format!("print({})", quote_double(&message))
}

/// `target = source.values if isinstance(source, pd.DataFrame) else source`.
fn emit_as_matrix(target: &str, source: &str, w: &mut CodeWriter) {
    w.line(&format!(
        "{} = {}.values if isinstance({}, pd.DataFrame) else {}",
        target, source, source, source
    ));
}

/// Encode object-typed labels held in `source` into `y_encoded`.
/// In training a fresh encoder is always fitted; later stages reuse it.
fn emit_label_encoding(source: &str, reuse_encoder: bool, w: &mut CodeWriter) {
    w.block_open(&format!(
        "if hasattr({}, 'dtype') and {}.dtype == 'object'",
        source, source
    ));
    w.line("from sklearn.preprocessing import LabelEncoder");
    if reuse_encoder {
        w.block_open("if le is None");
        w.line("le = LabelEncoder()");
        w.line(&format!("y_encoded = le.fit_transform({})", source));
        w.block_continue("else");
        w.line(&format!("y_encoded = le.transform({})", source));
        w.block_close();
    } else {
        w.line("le = LabelEncoder()");
        w.line(&format!("y_encoded = le.fit_transform({})", source));
        w.line(r#"print(f"    ✓ Encoded {len(le.classes_)} classes: {list(le.classes_)}")"#);
    }
    w.block_continue("else");
    w.line(&format!(
        "y_encoded = {}.values if hasattr({}, 'values') else {}",
        source, source, source
    ));
    w.block_close();
}

fn emit_soft_fail(message: &str, with_trace: bool, w: &mut CodeWriter) {
    w.block_continue("except Exception as e");
    w.line(&format!(r#"print(f"    ⚠ {}: {{e}}")"#, message));
    if with_trace {
        w.line("traceback.print_exc()");
    }
}

// ---------------------------------------------------------------------------
// Stages 1 & 2
// ---------------------------------------------------------------------------

/// Plain transform: `result = fn(current_data, ...)`, unwrapping tuples.
/// Row filters also re-align `y` with the surviving rows.
pub fn emit_transform(inv: &Invocation, index: usize, total: usize, w: &mut CodeWriter) {
    w.line(&progress_line("Executing", inv, index, total));
    w.block_open("try");
    w.line(&format!(
        "result = {}",
        call_expr(&inv.callable, &["current_data"], &inv.arguments, &[])
    ));
    w.block_open("if isinstance(result, tuple)");
    w.line("current_data = result[0]");
    w.block_continue("else");
    w.line("current_data = result");
    w.block_close();

    if inv.role == NodeRole::RowFilter {
        w.line("# Keep labels aligned with the rows that survived");
        w.block_open("if y is not None and not split_performed");
        w.block_open("if isinstance(current_data, pd.DataFrame) and len(current_data) != len(y)");
        w.line("y = y.loc[current_data.index]");
        w.line(r#"print(f"    ⚠ Synced target variable: {len(y)} samples remaining")"#);
        w.block_close();
        w.block_close();
    }

    w.line(r#"print("    ✓ Completed")"#);
    emit_soft_fail("Error", false, w);
    w.line(r#"print("    Skipping component...")"#);
    w.block_close();
}

/// Train/test split: `X_train, X_test, y_train, y_test = fn(frame, target_column, ...)`.
/// The frame is the working data with the labels re-attached, or the raw
/// input when the two no longer line up.
pub fn emit_split(inv: &Invocation, index: usize, total: usize, w: &mut CodeWriter) {
    w.line(&progress_line("Executing", inv, index, total));
    w.block_open("try");
    w.block_open("if y is not None");
    w.block_open("if isinstance(current_data, pd.DataFrame) and len(current_data) == len(y)");
    w.line("split_frame = current_data.assign(**{target_column: y.values})");
    w.block_continue("else");
    w.line("split_frame = df");
    w.block_close();
    w.line(&format!(
        "X_train, X_test, y_train, y_test = {}",
        call_expr(
            &inv.callable,
            &["split_frame", "target_column"],
            &inv.arguments,
            &[SPLIT_TARGET_PARAM],
        )
    ));
    w.line("current_data = X_train");
    w.line("split_performed = True");
    w.line(r#"print(f"    ✓ Split into train ({len(X_train)}) and test ({len(X_test)}) sets")"#);
    w.block_continue("else");
    w.line(r#"print("    ⚠ No target column, skipping train/test split")"#);
    w.block_close();
    w.line(r#"print("    ✓ Completed")"#);
    emit_soft_fail("Error", false, w);
    w.line(r#"print("    Skipping component...")"#);
    w.block_close();
}

// ---------------------------------------------------------------------------
// Stage 3
// ---------------------------------------------------------------------------

/// Model fitting: `model = fn(X_fit, y_encoded, ...)`.
pub fn emit_fit(inv: &Invocation, index: usize, total: usize, w: &mut CodeWriter) {
    w.line(&progress_line("Training", inv, index, total));
    w.block_open("if y is not None or y_train is not None");
    w.block_open("try");

    w.block_open("if split_performed and X_train is not None");
    emit_as_matrix("X_fit", "X_train", w);
    w.line("y_fit = y_train");
    w.line(r#"print(f"    ℹ Using training split: {len(X_fit)} samples")"#);
    w.block_continue("else");
    emit_as_matrix("X_fit", "current_data", w);
    w.line("y_fit = y");
    w.line(r#"print(f"    ℹ Using all data: {len(X_fit)} samples")"#);
    w.block_close();

    emit_label_encoding("y_fit", false, w);

    w.line(&format!(
        "model = {}",
        call_expr(&inv.callable, &["X_fit", "y_encoded"], &inv.arguments, &[])
    ));
    w.line(r#"print("    ✓ Model trained successfully")"#);
    emit_soft_fail("Training failed", true, w);
    w.line("model = None");
    w.block_close();

    w.block_continue("else");
    w.line(r#"print("    ⚠ No target column, skipping training")"#);
    w.line("model = None");
    w.block_close();
}

// ---------------------------------------------------------------------------
// Stage 4
// ---------------------------------------------------------------------------

/// Cross-validation: `cv_results = fn(model, X_cv, y_encoded, ...)`.
pub fn emit_cross_validation(inv: &Invocation, index: usize, total: usize, w: &mut CodeWriter) {
    w.line(&progress_line("Evaluating", inv, index, total));
    w.block_open("if model is not None and (y is not None or y_train is not None)");
    w.block_open("try");

    w.block_open("if split_performed and X_train is not None");
    emit_as_matrix("X_cv", "X_train", w);
    w.line("y_cv = y_train");
    w.block_continue("else");
    emit_as_matrix("X_cv", "current_data", w);
    w.line("y_cv = y");
    w.block_close();

    emit_label_encoding("y_cv", true, w);

    w.line(&format!(
        "cv_results = {}",
        call_expr(&inv.callable, &["model", "X_cv", "y_encoded"], &inv.arguments, &[])
    ));
    w.block_open("if isinstance(cv_results, dict)");
    w.line(r#"print("\n    Cross-Validation Results:")"#);
    w.block_open("if 'mean_test_score' in cv_results");
    w.line(concat!(
        r#"print(f"      Mean Test Score: {cv_results['mean_test_score']:.4f} "#,
        r#"(+/- {cv_results.get('std_test_score', 0):.4f})")"#,
    ));
    w.block_close();
    w.block_open("if 'mean_train_score' in cv_results");
    w.line(concat!(
        r#"print(f"      Mean Train Score: {cv_results['mean_train_score']:.4f} "#,
        r#"(+/- {cv_results.get('std_train_score', 0):.4f})")"#,
    ));
    w.block_close();
    w.block_open("if 'test_scores' in cv_results");
    w.line(concat!(
        r#"print(f"      Individual Fold Scores: "#,
        r#"{[f'{score:.4f}' for score in cv_results['test_scores']]}")"#,
    ));
    w.block_close();
    w.block_close();
    w.line(r#"print("    ✓ Cross-validation completed")"#);
    emit_soft_fail("Cross-validation failed", true, w);
    w.block_close();

    w.block_continue("else");
    w.line(r#"print("    ⚠ No model or target, skipping cross-validation")"#);
    w.block_close();
}

/// Metrics evaluation: `metrics = fn(y_encoded, y_pred, y_pred_proba, ...)`.
/// Prefers the test split, then the training split, then all data.
pub fn emit_evaluation(inv: &Invocation, index: usize, total: usize, w: &mut CodeWriter) {
    w.line(&progress_line("Evaluating", inv, index, total));
    w.block_open("if model is not None and (y is not None or y_train is not None)");
    w.block_open("try");

    w.block_open("if split_performed and X_test is not None and y_test is not None");
    emit_as_matrix("X_eval", "X_test", w);
    w.line("y_eval = y_test");
    w.line("eval_type = 'test'");
    w.line(r#"print(f"    ℹ Evaluating on test set: {len(X_eval)} samples")"#);
    w.block_continue("elif split_performed and X_train is not None");
    emit_as_matrix("X_eval", "X_train", w);
    w.line("y_eval = y_train");
    w.line("eval_type = 'training'");
    w.line(r#"print(f"    ⚠ Evaluating on training set: {len(X_eval)} samples")"#);
    w.block_continue("else");
    emit_as_matrix("X_eval", "current_data", w);
    w.line("y_eval = y");
    w.line("eval_type = 'all data'");
    w.line(r#"print(f"    ⚠ Evaluating on all data: {len(X_eval)} samples")"#);
    w.block_close();

    emit_label_encoding("y_eval", true, w);

    w.line("y_pred = model.predict(X_eval)");
    w.block_open("try");
    w.line("y_pred_proba = model.predict_proba(X_eval)");
    w.block_continue("except Exception");
    w.line("y_pred_proba = None");
    w.block_close();

    w.line(&format!(
        "metrics = {}",
        call_expr(
            &inv.callable,
            &["y_encoded", "y_pred", "y_pred_proba"],
            &inv.arguments,
            &[],
        )
    ));
    w.block_open("if isinstance(metrics, dict)");
    w.line(r#"print(f"\n    Metrics ({eval_type} set):")"#);
    w.block_open("for key, value in metrics.items()");
    w.block_open("if isinstance(value, (int, float, np.integer, np.floating))");
    w.line(r#"print(f"      {key}: {value:.4f}")"#);
    w.block_continue("elif key == 'confusion_matrix'");
    w.line(r#"print(f"      {key}:")"#);
    w.block_open("for row in value");
    w.line(r#"print(f"        {row}")"#);
    w.block_close();
    w.block_close();
    w.block_close();
    w.block_close();
    w.line(r#"print("    ✓ Evaluation completed")"#);
    emit_soft_fail("Evaluation failed", true, w);
    w.block_close();

    w.block_continue("else");
    w.line(r#"print("    ⚠ No model or target, skipping evaluation")"#);
    w.block_close();
}
