//! Infrastructure adapters for configuration, logging, and the compiler toolchain.

pub mod config;
pub mod logging;
pub mod protoc;
