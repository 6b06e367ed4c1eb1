//! Collection of reusable TUI components.

pub mod file_list;
pub mod path_prompt;
pub mod report;
pub mod settings;
