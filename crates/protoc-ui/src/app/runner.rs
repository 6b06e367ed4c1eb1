//! Executing the compiler and capturing its output.

use std::process::{Command, Stdio};

use crate::domain::model::{CommandInvocation, ExecutionResult};

/// Something that can carry out an invocation.
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &CommandInvocation) -> ExecutionResult;
}

/// Runs invocations as child processes, buffering stdout and stderr separately.
///
/// There is a single attempt and no timeout; the call blocks until the child exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &CommandInvocation) -> ExecutionResult {
        tracing::info!(command = %invocation, "running protoc");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                let reason = format!(
                    "failed to launch {}: {err}",
                    invocation.program.display()
                );
                tracing::warn!(error = %reason, "protoc did not start");
                return ExecutionResult::failed(reason);
            }
        };

        let result = ExecutionResult {
            exit_error: (!output.status.success()).then(|| output.status.to_string()),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        match &result.exit_error {
            Some(reason) => tracing::warn!(
                error = %reason,
                stderr = %result.stderr,
                stdout = %result.stdout,
                "protoc failed"
            ),
            None => tracing::debug!("protoc finished"),
        }
        result
    }
}
