//! Terminal user interface.

pub mod app;
pub mod components;
