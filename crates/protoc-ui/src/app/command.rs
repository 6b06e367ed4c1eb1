//! Building the `protoc` argument list from a selection.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::app::selection::SelectionState;
use crate::domain::errors::DomainError;
use crate::domain::model::CommandInvocation;

pub const PROTO_PATH_FLAG: &str = "--proto_path";

/// Assemble the ordered `protoc` arguments.
///
/// Included files come first as `input_directory/filename`, in ascending filename order,
/// followed by `--proto_path <input_directory> <output_flag> <output_directory>`. The caller is
/// responsible for rejecting selections with no included files before running the result.
pub fn build_arguments(
    input_directory: &str,
    files: &BTreeMap<String, bool>,
    output_directory: &str,
    output_flag: &str,
) -> Vec<String> {
    let mut args: Vec<String> = files
        .iter()
        .filter(|(_, included)| **included)
        .map(|(name, _)| format!("{input_directory}/{name}"))
        .collect();

    args.extend([
        PROTO_PATH_FLAG.to_string(),
        input_directory.to_string(),
        output_flag.to_string(),
        output_directory.to_string(),
    ]);
    args
}

/// Validate the selection and turn it into an invocation of `program`.
pub fn plan(
    state: &SelectionState,
    program: impl Into<PathBuf>,
) -> Result<CommandInvocation, DomainError> {
    let errors = state.validate();
    if !errors.is_empty() {
        return Err(DomainError::InvalidSelection(errors));
    }

    let (Some(input), Some(output)) = (state.input_directory(), state.output_directory()) else {
        return Err(DomainError::InvalidSelection(state.validate()));
    };

    let args = build_arguments(input, state.files(), output, state.output_flag());
    Ok(CommandInvocation::new(program, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::errors::ValidationError;

    fn files(entries: &[(&str, bool)]) -> BTreeMap<String, bool> {
        entries
            .iter()
            .map(|(name, included)| (name.to_string(), *included))
            .collect()
    }

    #[test]
    fn excluded_files_never_appear() {
        let args = build_arguments(
            "/a",
            &files(&[("x.proto", true), ("y.proto", false)]),
            "/b",
            "--go_out",
        );
        assert_eq!(args, vec!["/a/x.proto", "--proto_path", "/a", "--go_out", "/b"]);
    }

    #[test]
    fn no_included_files_still_yields_trailing_tokens() {
        let args = build_arguments("/a", &files(&[("x.proto", false)]), "/b", "--go_out");
        assert_eq!(args, vec!["--proto_path", "/a", "--go_out", "/b"]);
    }

    // File order is deliberately sorted by filename so generated commands are reproducible.
    #[test]
    fn files_are_emitted_in_filename_order() {
        let args = build_arguments(
            "/protos",
            &files(&[("zeta.proto", true), ("alpha.proto", true), ("mid.proto", true)]),
            "/out",
            "--python_out",
        );
        assert_eq!(
            &args[..3],
            &["/protos/alpha.proto", "/protos/mid.proto", "/protos/zeta.proto"]
        );
    }

    #[test]
    fn plan_uses_selection_and_program() {
        let mut state = SelectionState::new();
        state.set_input_directory("/a");
        state.register_files(["x.proto".to_string(), "y.proto".to_string()]);
        state.set_included("y.proto", false);
        state.set_output_directory("/b");
        state.set_output_language("C++");

        let invocation = plan(&state, "protoc").expect("valid selection");
        assert_eq!(invocation.program, PathBuf::from("protoc"));
        assert_eq!(
            invocation.args,
            vec!["/a/x.proto", "--proto_path", "/a", "--cpp_out", "/b"]
        );
    }

    #[test]
    fn plan_rejects_invalid_selection() {
        let mut state = SelectionState::new();
        state.set_input_directory("/a");
        state.register_files(["x.proto".to_string()]);
        state.set_included("x.proto", false);

        let err = plan(&state, "protoc").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidSelection(vec![
                ValidationError::NoInputFiles,
                ValidationError::MissingOutputDirectory,
                ValidationError::MissingOutputLanguage,
            ])
        );
    }
}
