//! Non-interactive generation: selection from arguments, then a synchronous run.

use std::path::{self, PathBuf};

use anyhow::{Context, Result, bail};

use crate::app::command;
use crate::app::language::Language;
use crate::app::runner::CommandRunner;
use crate::app::scan::{Scanner, ScannerConfig};
use crate::app::selection::SelectionState;
use crate::domain::model::{CommandInvocation, ExecutionResult};
use crate::infra::config::Config;
use crate::infra::protoc;

/// Everything the command line can preselect.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub language: Option<Language>,
    /// When non-empty, only these filenames are included.
    pub files: Vec<String>,
    pub protoc: Option<PathBuf>,
}

impl GenerateRequest {
    /// Build the selection this request describes, scanning the input directory if given.
    pub fn selection(&self, config: &Config, scanner: &Scanner) -> Result<SelectionState> {
        let mut state = SelectionState::new();

        match self.language {
            Some(language) => state.set_output_language(language.label()),
            None => {
                if let Some(label) = config.defaults.language() {
                    state.set_output_language(label);
                }
            }
        }

        if let Some(input) = &self.input {
            let root = path::absolute(input)
                .with_context(|| format!("invalid input directory {}", input.display()))?;
            let scan = scanner.scan(&ScannerConfig::from_root(root, config))?;
            state.apply_scan(&scan);
        }

        if !self.files.is_empty() {
            state.set_all_included(false);
            for name in &self.files {
                if !state.set_included(name, true) {
                    bail!(
                        "{name} was not found in {}",
                        state.input_directory().unwrap_or("the input directory")
                    );
                }
            }
        }

        if let Some(output) = &self.output {
            let output = path::absolute(output)
                .with_context(|| format!("invalid output directory {}", output.display()))?;
            state.set_output_directory(output.display().to_string());
        }

        Ok(state)
    }

    /// Validate and build the invocation without running it.
    pub fn plan(&self, config: &Config, scanner: &Scanner) -> Result<CommandInvocation> {
        let state = self.selection(config, scanner)?;
        let program = protoc::locate(self.protoc.as_deref(), config);
        Ok(command::plan(&state, program)?)
    }

    /// Plan and run synchronously.
    pub fn run(
        &self,
        config: &Config,
        scanner: &Scanner,
        runner: &dyn CommandRunner,
    ) -> Result<(CommandInvocation, ExecutionResult)> {
        let invocation = self.plan(config, scanner)?;
        let result = runner.run(&invocation);
        Ok((invocation, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::domain::errors::{DomainError, ValidationError};

    struct Echo;

    impl CommandRunner for Echo {
        fn run(&self, invocation: &CommandInvocation) -> ExecutionResult {
            ExecutionResult {
                exit_error: None,
                stdout: invocation.args.join(" "),
                stderr: String::new(),
            }
        }
    }

    fn protos() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a.proto"), "").unwrap();
        fs::write(temp.path().join("b.proto"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        temp
    }

    #[test]
    fn scans_and_includes_every_proto_by_default() -> Result<()> {
        let dir = protos();
        let request = GenerateRequest {
            input: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let state = request.selection(&Config::default(), &Scanner::new())?;
        let files: Vec<_> = state.files().iter().collect();
        assert_eq!(
            files,
            vec![(&"a.proto".to_string(), &true), (&"b.proto".to_string(), &true)]
        );
        Ok(())
    }

    #[test]
    fn named_files_restrict_the_selection() -> Result<()> {
        let dir = protos();
        let out = tempfile::tempdir()?;
        let request = GenerateRequest {
            input: Some(dir.path().to_path_buf()),
            output: Some(out.path().to_path_buf()),
            language: Some(Language::Go),
            files: vec!["b.proto".into()],
            protoc: Some(PathBuf::from("/nonexistent/protoc")),
        };

        let (invocation, result) = request.run(&Config::default(), &Scanner::new(), &Echo)?;
        let input = dir.path().display().to_string();
        assert_eq!(
            invocation.args,
            vec![
                format!("{input}/b.proto"),
                "--proto_path".to_string(),
                input.clone(),
                "--go_out".to_string(),
                out.path().display().to_string(),
            ]
        );
        assert_eq!(invocation.program, PathBuf::from("/nonexistent/protoc"));
        assert!(result.is_success());
        Ok(())
    }

    #[test]
    fn unknown_named_file_is_rejected() {
        let dir = protos();
        let request = GenerateRequest {
            input: Some(dir.path().to_path_buf()),
            files: vec!["notes.txt".into()],
            ..Default::default()
        };
        let err = request
            .selection(&Config::default(), &Scanner::new())
            .unwrap_err();
        assert!(err.to_string().contains("notes.txt was not found"));
    }

    #[test]
    fn configured_language_is_used_when_none_given() -> Result<()> {
        let mut config = Config::default();
        config.defaults.language = "Java".into();
        let state = GenerateRequest::default().selection(&config, &Scanner::new())?;
        assert_eq!(state.output_flag(), "--java_out");
        Ok(())
    }

    #[test]
    fn empty_request_fails_validation() {
        let err = GenerateRequest::default()
            .plan(&Config::default(), &Scanner::new())
            .unwrap_err();
        let domain = err.downcast_ref::<DomainError>().expect("domain error");
        assert_eq!(
            domain,
            &DomainError::InvalidSelection(vec![
                ValidationError::MissingInputDirectory,
                ValidationError::NoInputFiles,
                ValidationError::MissingOutputDirectory,
                ValidationError::MissingOutputLanguage,
            ])
        );
    }
}
