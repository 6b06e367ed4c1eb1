//! Locating the `protoc` executable.

use std::path::{Path, PathBuf};

use crate::infra::config::Config;

/// Resolve the compiler to run.
///
/// An explicit path wins over the configured one (which already carries the `PROTOC`
/// environment override). Bare names are looked up on the search path; when nothing resolves
/// the candidate is returned as-is so the launch failure surfaces as an execution error.
pub fn locate(explicit: Option<&Path>, config: &Config) -> PathBuf {
    let candidate = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(config.protoc.path()));

    match which::which(&candidate) {
        Ok(resolved) => {
            tracing::debug!(protoc = %resolved.display(), "resolved protoc");
            resolved
        }
        Err(err) => {
            tracing::warn!(
                protoc = %candidate.display(),
                error = %err,
                "protoc not found, invocations will fail"
            );
            candidate
        }
    }
}
