//! Command-line entry point of the generated script.

use super::writer::CodeWriter;

/// Generic failure.
pub const EXIT_FAILURE: u8 = 1;
/// Input file missing. 2 is left to argparse usage errors.
pub const EXIT_FILE_NOT_FOUND: u8 = 3;
/// Column lookup failed, usually the target column.
pub const EXIT_MISSING_COLUMN: u8 = 4;

pub fn emit_entry_point(w: &mut CodeWriter) {
    w.banner("MAIN ENTRY POINT");
    w.blank();
    w.line(&format!("EXIT_FAILURE = {}", EXIT_FAILURE));
    w.line(&format!("EXIT_FILE_NOT_FOUND = {}", EXIT_FILE_NOT_FOUND));
    w.line(&format!("EXIT_MISSING_COLUMN = {}", EXIT_MISSING_COLUMN));
    w.blank();
    w.blank();

    w.block_open("def main()");
    w.line("parser = argparse.ArgumentParser(description='Execute ML pipeline')");
    w.line("parser.add_argument('--data', required=True, help='Input CSV file')");
    w.line(
        "parser.add_argument('--target', default='target', \
         help='Target column name (default: target)')",
    );
    w.line(
        "parser.add_argument('--output', default='output.csv', \
         help='Output file (default: output.csv)')",
    );
    w.line(
        "parser.add_argument('--skip-split-warning', action='store_true', \
         help='Skip train/test split warning')",
    );
    w.line("args = parser.parse_args()");
    w.blank();

    w.block_open("try");
    w.line(
        "result = execute_pipeline(args.data, args.target, args.output, args.skip_split_warning)",
    );
    w.line(r#"print("\n✓ Pipeline executed successfully!")"#);
    w.block_open("if result['model'] is not None");
    w.line(r#"print("✓ Model trained and ready to use")"#);
    w.block_close();
    w.block_open("if result['split_performed']");
    w.line(r#"print("✓ Train/test split performed")"#);
    w.block_open("if result['X_test'] is not None");
    w.line(r#"print(f"  - Training samples: {len(result['X_train'])}")"#);
    w.line(r#"print(f"  - Test samples: {len(result['X_test'])}")"#);
    w.block_close();
    w.block_close();

    w.block_continue("except FileNotFoundError as e");
    w.line(r#"print(f"\n❌ Error: File not found - {e}")"#);
    w.line(r#"print(f"Make sure the file '{args.data}' exists")"#);
    w.line("sys.exit(EXIT_FILE_NOT_FOUND)");
    w.block_continue("except KeyError as e");
    w.line(r#"print(f"\n❌ Error: Column not found - {e}")"#);
    w.line(r#"print(f"Make sure the target column '{args.target}' exists in your CSV")"#);
    w.line("sys.exit(EXIT_MISSING_COLUMN)");
    w.block_continue("except Exception as e");
    w.line(r#"print(f"\n❌ Error: {e}")"#);
    w.line("traceback.print_exc()");
    w.line("sys.exit(EXIT_FAILURE)");
    w.block_close();
    w.block_close();
    w.blank();
    w.blank();

    w.block_open("if __name__ == \"__main__\"");
    w.line("main()");
    w.block_close();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> String {
        let mut w = CodeWriter::new();
        emit_entry_point(&mut w);
        w.finish()
    }

    #[test]
    fn cli_flags_and_defaults() {
        let out = entry();
        assert!(out.contains("'--data', required=True"));
        assert!(out.contains("'--target', default='target'"));
        assert!(out.contains("'--output', default='output.csv'"));
        assert!(out.contains("'--skip-split-warning', action='store_true'"));
    }

    #[test]
    fn exit_codes_are_distinct() {
        let out = entry();
        insta::assert_snapshot!(
            out.lines().filter(|l| l.starts_with("EXIT_")).collect::<Vec<_>>().join("; "),
            @"EXIT_FAILURE = 1; EXIT_FILE_NOT_FOUND = 3; EXIT_MISSING_COLUMN = 4"
        );
        let fnf = out.find("except FileNotFoundError").unwrap();
        let key = out.find("except KeyError").unwrap();
        let generic = out.find("except Exception").unwrap();
        assert!(fnf < key && key < generic);
    }

    #[test]
    fn ends_with_main_guard() {
        assert!(entry().ends_with("if __name__ == \"__main__\":\n    main()\n"));
    }
}
