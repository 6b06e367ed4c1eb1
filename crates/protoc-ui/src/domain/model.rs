//! Domain models for invocations, their results, and directory prompts.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One planned execution of the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured outcome of a single invocation.
///
/// When `exit_error` is set the output streams are best-effort diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub exit_error: Option<String>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.exit_error.is_none()
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            exit_error: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Outcome of asking the user for a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Selected(PathBuf),
    Cancelled,
    Failed(String),
}
