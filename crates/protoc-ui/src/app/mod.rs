//! Application layer orchestrating selection, command building, and execution.

pub mod command;
pub mod format;
pub mod generate;
pub mod job;
pub mod language;
pub mod runner;
pub mod scan;
pub mod selection;
