//! The user's current directory, file, and language choices.

use std::collections::BTreeMap;

use crate::app::language::flag_for_label;
use crate::app::scan::ScanResult;
use crate::domain::errors::ValidationError;

/// Tracks what will be handed to `protoc` on the next generation.
///
/// Input files are keyed by bare filename. Scans only ever add entries, so files discovered in
/// a previously selected directory stay registered until the process exits.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionState {
    input_directory: Option<String>,
    input_files: BTreeMap<String, bool>,
    output_directory: Option<String>,
    output_language: Option<String>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_directory(&self) -> Option<&str> {
        self.input_directory.as_deref()
    }

    /// Replace the input directory. Blank values clear it.
    pub fn set_input_directory<S: Into<String>>(&mut self, directory: S) {
        self.input_directory = clean(directory.into());
    }

    /// Register every file from a scan as included and adopt its root as the input directory.
    ///
    /// Returns how many filenames were not registered before.
    pub fn apply_scan(&mut self, scan: &ScanResult) -> usize {
        self.set_input_directory(scan.root.display().to_string());
        self.register_files(scan.files.iter().cloned())
    }

    /// Mark each filename as included, adding it when unknown. Returns the number of new names.
    pub fn register_files<I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        for name in names {
            if self.input_files.insert(name, true).is_none() {
                added += 1;
            }
        }
        added
    }

    /// All registered files with their inclusion flag, ordered by filename.
    pub fn files(&self) -> &BTreeMap<String, bool> {
        &self.input_files
    }

    pub fn is_included(&self, name: &str) -> bool {
        self.input_files.get(name).copied().unwrap_or(false)
    }

    /// Update the inclusion flag of a registered file. Returns `false` for unknown names.
    pub fn set_included(&mut self, name: &str, included: bool) -> bool {
        match self.input_files.get_mut(name) {
            Some(flag) => {
                *flag = included;
                true
            }
            None => false,
        }
    }

    /// Flip the inclusion flag of a registered file, returning the new value.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let flag = self.input_files.get_mut(name)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Include or exclude every registered file at once.
    pub fn set_all_included(&mut self, included: bool) {
        for flag in self.input_files.values_mut() {
            *flag = included;
        }
    }

    /// Number of files that are both registered and included.
    pub fn included_count(&self) -> usize {
        self.input_files.values().filter(|included| **included).count()
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.output_directory.as_deref()
    }

    /// Replace the output directory. Blank values clear it.
    pub fn set_output_directory<S: Into<String>>(&mut self, directory: S) {
        self.output_directory = clean(directory.into());
    }

    pub fn output_language(&self) -> Option<&str> {
        self.output_language.as_deref()
    }

    /// Replace the output language label. Blank values clear it.
    pub fn set_output_language<S: Into<String>>(&mut self, label: S) {
        self.output_language = clean(label.into());
    }

    /// Compiler flag for the chosen language, empty when none or unknown.
    pub fn output_flag(&self) -> &'static str {
        self.output_language.as_deref().map_or("", flag_for_label)
    }

    /// Every reason the selection cannot be turned into an invocation, in display order.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.input_directory.is_none() {
            errors.push(ValidationError::MissingInputDirectory);
        }
        if self.included_count() == 0 {
            errors.push(ValidationError::NoInputFiles);
        }
        if self.output_directory.is_none() {
            errors.push(ValidationError::MissingOutputDirectory);
        }
        if self.output_flag().is_empty() {
            errors.push(ValidationError::MissingOutputLanguage);
        }
        errors
    }
}

fn clean(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_selection_reports_every_problem_once_in_order() {
        let state = SelectionState::new();
        assert_eq!(
            state.validate(),
            vec![
                ValidationError::MissingInputDirectory,
                ValidationError::NoInputFiles,
                ValidationError::MissingOutputDirectory,
                ValidationError::MissingOutputLanguage,
            ]
        );
    }

    #[test]
    fn all_files_excluded_counts_as_no_input_files() {
        let mut state = SelectionState::new();
        state.set_input_directory("/protos");
        state.register_files(names(&["a.proto"]));
        state.set_output_directory("/out");
        state.set_output_language("Golang");
        assert!(state.validate().is_empty());

        state.set_included("a.proto", false);
        assert_eq!(state.validate(), vec![ValidationError::NoInputFiles]);
    }

    #[test]
    fn unknown_language_label_is_treated_as_missing() {
        let mut state = SelectionState::new();
        state.set_output_language("Rust");
        assert_eq!(state.output_flag(), "");
        assert!(
            state
                .validate()
                .contains(&ValidationError::MissingOutputLanguage)
        );
    }

    #[test]
    fn rescanning_adds_without_clearing() {
        let mut state = SelectionState::new();
        let first = ScanResult {
            root: PathBuf::from("/one"),
            files: names(&["a.proto", "b.proto"]),
        };
        let second = ScanResult {
            root: PathBuf::from("/two"),
            files: names(&["b.proto", "c.proto"]),
        };

        assert_eq!(state.apply_scan(&first), 2);
        state.set_included("a.proto", false);
        assert_eq!(state.apply_scan(&second), 1);

        assert_eq!(state.input_directory(), Some("/two"));
        let registered: Vec<_> = state.files().keys().cloned().collect();
        assert_eq!(registered, names(&["a.proto", "b.proto", "c.proto"]));
        assert!(!state.is_included("a.proto"));
        assert!(state.is_included("c.proto"));
    }

    #[test]
    fn toggle_and_bulk_updates() {
        let mut state = SelectionState::new();
        state.register_files(names(&["a.proto", "b.proto"]));

        assert_eq!(state.toggle("a.proto"), Some(false));
        assert_eq!(state.toggle("missing.proto"), None);
        assert_eq!(state.included_count(), 1);

        state.set_all_included(false);
        assert_eq!(state.included_count(), 0);
        state.set_all_included(true);
        assert_eq!(state.included_count(), 2);
    }

    #[test]
    fn blank_values_clear_fields() {
        let mut state = SelectionState::new();
        state.set_output_directory("/out");
        state.set_output_directory("   ");
        assert_eq!(state.output_directory(), None);
    }
}
