//! Compilation errors.
//!
//! Every fatal condition in this crate is reported as a [`CompilationError`]
//! tagged with the [`CompilationStep`] it occurred in. Legitimate refusals to
//! fold a constant are *not* errors; they are returned as `None`.

use std::fmt;

use thiserror::Error;

/// The compilation stage that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompilationStep {
    /// Not tied to a particular stage (lookups, evaluation).
    General,
    /// Instruction selection and encoding.
    CodeGeneration,
    /// Optimization passes (constant folding, simplification).
    Optimizer,
}

impl fmt::Display for CompilationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationStep::General => write!(f, "GENERAL"),
            CompilationStep::CodeGeneration => write!(f, "CODE_GENERATION"),
            CompilationStep::Optimizer => write!(f, "OPTIMIZER"),
        }
    }
}

/// A fatal error for the compilation unit being processed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{step}: {message}{}", context_suffix(.context))]
pub struct CompilationError {
    /// Stage that raised the error.
    pub step: CompilationStep,
    /// Human-readable description.
    pub message: String,
    /// Optional snippet of rendered text (instruction, value, mnemonic).
    pub context: Option<String>,
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(text) => format!(" ({})", text),
        None => String::new(),
    }
}

impl CompilationError {
    /// Create a new error without context.
    pub fn new(step: CompilationStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
            context: None,
        }
    }

    /// Attach a snippet of rendered text.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompilationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = CompilationError::new(CompilationStep::CodeGeneration, "Opcode specified for wrong ALU");
        assert_eq!(e.to_string(), "CODE_GENERATION: Opcode specified for wrong ALU");

        let e = CompilationError::new(CompilationStep::General, "No machine code operation for this op-code")
            .with_context("foo");
        assert_eq!(
            e.to_string(),
            "GENERAL: No machine code operation for this op-code (foo)"
        );
    }

    #[test]
    fn test_error_fields() {
        let e = CompilationError::new(CompilationStep::Optimizer, "x").with_context("ctx");
        assert_eq!(e.step, CompilationStep::Optimizer);
        assert_eq!(e.context.as_deref(), Some("ctx"));
    }
}
