//! Indent-aware string builder for Python code generation.
//!
//! Generated scripts use 4-space indentation.

/// Indent-aware string builder that produces formatted Python source code.
pub struct CodeWriter {
    buf: String,
    indent_level: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(8192),
            indent_level: 0,
        }
    }

    /// Start a writer already indented by `level` (for blocks inlined into a function body).
    pub fn with_indent(level: usize) -> Self {
        let mut w = Self::new();
        w.indent_level = level;
        w
    }

    /// Write a complete line (appends newline).
    pub fn line(&mut self, text: &str) {
        self.write_indent();
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write several lines at the current indent.
    pub fn lines(&mut self, lines: &[&str]) {
        for l in lines {
            self.line(l);
        }
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Append text verbatim, ignoring the current indent.
    pub fn raw(&mut self, text: &str) {
        self.buf.push_str(text);
        if !text.is_empty() && !text.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    /// Increase indent by one level.
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent by one level.
    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write `text:` and increase indent (e.g. `if x is None:`).
    pub fn block_open(&mut self, text: &str) {
        self.line(&format!("{}:", text));
        self.indent();
    }

    /// Close the current block.
    pub fn block_close(&mut self) {
        self.dedent();
    }

    /// Dedent, write `text:` and re-indent (`else`, `elif ...`, `except ...`).
    pub fn block_continue(&mut self, text: &str) {
        self.dedent();
        self.line(&format!("{}:", text));
        self.indent();
    }

    /// Write a `# ====` banner comment around `title`.
    pub fn banner(&mut self, title: &str) {
        let rule = format!("# {}", "=".repeat(60));
        self.line(&rule);
        self.line(&format!("# {}", title));
        self.line(&rule);
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the generated string.
    pub fn finish(self) -> String {
        self.buf
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buf.push_str("    ");
        }
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_line() {
        let mut w = CodeWriter::new();
        w.line("x = 1");
        assert_eq!(w.finish(), "x = 1\n");
    }

    #[test]
    fn block_open_close() {
        let mut w = CodeWriter::new();
        w.block_open("if True");
        w.line("do_stuff()");
        w.block_close();
        w.line("done()");
        assert_eq!(w.finish(), "if True:\n    do_stuff()\ndone()\n");
    }

    #[test]
    fn try_except() {
        let mut w = CodeWriter::new();
        w.block_open("try");
        w.line("a()");
        w.block_continue("except Exception as e");
        w.line("b()");
        w.block_close();
        assert_eq!(w.finish(), "try:\n    a()\nexcept Exception as e:\n    b()\n");
    }

    #[test]
    fn with_indent_starts_nested() {
        let mut w = CodeWriter::with_indent(1);
        w.line("pass");
        assert_eq!(w.finish(), "    pass\n");
    }

    #[test]
    fn blank_line_has_no_indent() {
        let mut w = CodeWriter::with_indent(2);
        w.line("a()");
        w.blank();
        w.line("b()");
        assert_eq!(w.finish(), "        a()\n\n        b()\n");
    }

    #[test]
    fn raw_terminates_line() {
        let mut w = CodeWriter::with_indent(1);
        w.raw("def f():\n    pass");
        assert_eq!(w.finish(), "def f():\n    pass\n");
    }

    #[test]
    fn dedent_saturates_at_zero() {
        let mut w = CodeWriter::new();
        w.dedent();
        w.line("x");
        assert_eq!(w.finish(), "x\n");
    }
}
