//! Domain-specific errors.

use thiserror::Error;

/// A selection problem detected before `protoc` is invoked.
///
/// The `Display` output is the exact line shown to the user.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("[ERROR] Input directory not selected")]
    MissingInputDirectory,
    #[error("[ERROR] Select at least 1 input file")]
    NoInputFiles,
    #[error("[ERROR] Output directory not selected")]
    MissingOutputDirectory,
    #[error("[ERROR] Output language not selected")]
    MissingOutputLanguage,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{}", join_messages(.0))]
    InvalidSelection(Vec<ValidationError>),
    #[error("a generation is already running")]
    GenerationInProgress,
}

/// Render accumulated validation errors one per line, in order.
pub fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
