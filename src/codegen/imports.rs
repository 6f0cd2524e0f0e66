//! Module-level imports of the generated script.
//!
//! Only modules the skeleton itself needs are imported at module level.
//! Optional packages (scikit-learn) are imported where they are used, inside a
//! node's soft-fail block, so a missing package fails that node alone.

use super::writer::CodeWriter;

/// Tracks which modules the script imports at module level.
#[derive(Default)]
pub struct ImportSet {
    // standard library
    pub argparse: bool,
    pub os: bool,
    pub sys: bool,
    pub traceback: bool,
    pub warnings: bool,

    // third party
    pub numpy: bool,
    pub pandas: bool,
}

impl ImportSet {
    /// Everything the pipeline skeleton and entry point use.
    pub fn script() -> Self {
        ImportSet {
            argparse: true,
            os: true,
            sys: true,
            traceback: true,
            warnings: true,
            numpy: true,
            pandas: true,
        }
    }
}

/// Emit the import statements to the writer.
pub fn emit_imports(imports: &ImportSet, w: &mut CodeWriter) {
    let mut stdlib: Vec<&str> = Vec::new();
    if imports.argparse {
        stdlib.push("argparse");
    }
    if imports.os {
        stdlib.push("os");
    }
    if imports.sys {
        stdlib.push("sys");
    }
    if imports.traceback {
        stdlib.push("traceback");
    }
    if imports.warnings {
        stdlib.push("warnings");
    }
    for module in &stdlib {
        w.line(&format!("import {}", module));
    }

    let has_third_party = imports.numpy || imports.pandas;
    if !stdlib.is_empty() && has_third_party {
        w.blank();
    }
    if imports.numpy {
        w.line("import numpy as np");
    }
    if imports.pandas {
        w.line("import pandas as pd");
    }

    if imports.warnings {
        w.blank();
        w.line("warnings.filterwarnings('ignore', category=FutureWarning)");
    }
}
