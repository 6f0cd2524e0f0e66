//! Script preamble: shebang, generation docstring, imports and the
//! verbatim component bodies.

use chrono::{DateTime, SecondsFormat, Utc};

use super::imports;
use super::writer::CodeWriter;
use crate::ir::types::PipelineIR;

pub fn emit_header(
    ir: &PipelineIR,
    component_code: &str,
    generated_at: DateTime<Utc>,
    w: &mut CodeWriter,
) {
    w.line("#!/usr/bin/env python3");
    w.line("\"\"\"");
    w.line("Auto-generated Pipeline Script");
    w.line(&format!(
        "Generated at: {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    w.line(&format!("Version: {}", docstring_safe(&ir.metadata.version)));
    w.line(&format!("Total Components: {}", ir.metadata.node_count));
    w.line("\"\"\"");
    w.blank();

    imports::emit_imports(&imports::ImportSet::script(), w);
    w.blank();

    w.banner("COMPONENT FUNCTIONS");
    w.blank();
    w.raw(component_code);
    w.blank();
}

/// The version string lands inside a triple-quoted docstring.
fn docstring_safe(s: &str) -> String {
    s.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::types::*;
    use chrono::TimeZone;

    fn empty_ir(version: &str) -> PipelineIR {
        PipelineIR {
            metadata: PipelineMetadata {
                version: version.into(),
                node_count: 3,
            },
            stages: vec![],
        }
    }

    #[test]
    fn header_carries_timestamp_version_and_count() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut w = CodeWriter::new();
        emit_header(&empty_ir("1.0"), "def f(df):\n    return df\n", at, &mut w);
        let out = w.finish();
        let preamble = "#!/usr/bin/env python3\n\"\"\"\nAuto-generated Pipeline Script\n";
        assert!(out.starts_with(preamble));
        assert!(out.contains("Generated at: 2024-05-01T12:30:00Z\n"));
        assert!(out.contains("Version: 1.0\n"));
        assert!(out.contains("Total Components: 3\n"));
        assert!(out.contains("# COMPONENT FUNCTIONS\n"));
        assert!(out.contains("\ndef f(df):\n    return df\n"));
    }

    #[test]
    fn version_cannot_close_docstring() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut w = CodeWriter::new();
        emit_header(&empty_ir("1\"\"\"x"), "", at, &mut w);
        assert!(w.finish().contains(r#"Version: 1\"\"\"x"#));
    }
}
