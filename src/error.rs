//! Error type shared by every compiler phase.
//!
//! Each error carries a stable code (`P001`, `V004`, `E003`, ...) so callers
//! can match on it without parsing messages.

use serde::Serialize;

use crate::ir::validate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Parse,
    Validate,
    Lower,
    IrValidate,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Parse => "Parse",
            Phase::Validate => "Validate",
            Phase::Lower => "Lower",
            Phase::IrValidate => "IR Validate",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompilerError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    /// Manifest node the error points at, when there is one.
    pub node_id: Option<String>,
}

impl CompilerError {
    fn new(phase: Phase, code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        CompilerError {
            code: code.to_string(),
            phase,
            message: message.into(),
            node_id,
        }
    }

    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        Self::new(Phase::Parse, code, message, None)
    }

    pub fn validate(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self::new(Phase::Validate, code, message, node_id)
    }

    pub fn lower(code: &str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self::new(Phase::Lower, code, message, node_id)
    }
}

impl std::fmt::Display for CompilerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.phase, self.code, self.message)?;
        if let Some(id) = &self.node_id {
            write!(f, " (node '{}')", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompilerError {}

impl From<ValidationError> for CompilerError {
    fn from(e: ValidationError) -> Self {
        Self::new(Phase::IrValidate, e.code, e.message, e.node_id)
    }
}

/// Render a list of errors one per line, for CLI and log output.
pub fn render_errors(errors: &[CompilerError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
