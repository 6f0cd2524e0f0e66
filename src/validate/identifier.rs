//! Python identifier rules shared by manifest and IR validation.

/// Python 3 hard keywords. Soft keywords (`match`, `case`, `type`, `_`) are
/// legal names and are not listed.
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Names bound by the generated script itself: module aliases, the entry
/// points, and every local of `execute_pipeline`, loop and `except` targets
/// included. Any assignment makes a name local to the whole function, so a
/// component sharing one of these names is unbound when it is called.
const SCRIPT_RESERVED_NAMES: &[&str] = &[
    "argparse", "os", "sys", "traceback", "warnings", "np", "pd", "LabelEncoder",
    "execute_pipeline", "main",
    "EXIT_FAILURE", "EXIT_FILE_NOT_FOUND", "EXIT_MISSING_COLUMN",
    "data_file", "target_column", "output_file", "skip_split_warning",
    "df", "X", "y", "current_data", "model", "le",
    "X_train", "X_test", "y_train", "y_test", "split_performed",
    "result", "split_frame", "X_fit", "y_fit", "y_encoded",
    "X_cv", "y_cv", "cv_results", "X_eval", "y_eval", "eval_type",
    "y_pred", "y_pred_proba", "metrics", "key", "value", "row",
    "test_root", "test_ext", "test_file", "e",
];

/// True if `name` can be used as a Python function or keyword-argument name.
/// Only ASCII identifiers are accepted.
pub fn is_python_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !is_python_keyword(name)
}

pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// True if `name` is already bound by the generated script.
pub fn is_script_reserved(name: &str) -> bool {
    SCRIPT_RESERVED_NAMES.contains(&name)
}
