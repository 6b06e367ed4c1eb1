//! Discovery of protocol buffer definitions in an input directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::infra::config::Config;

/// Files found directly inside a scanned directory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Bare filenames, sorted.
    pub files: Vec<String>,
}

/// Configuration inputs for the scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub root: PathBuf,
    pub globs: Vec<String>,
    pub show_hidden: bool,
}

impl ScannerConfig {
    pub fn from_root(root: PathBuf, config: &Config) -> Self {
        Self {
            root,
            globs: config.scan.globs.clone(),
            show_hidden: config.scan.show_hidden(),
        }
    }
}

/// Lists matching files one level deep, skipping directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct Scanner;

impl Scanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan(&self, cfg: &ScannerConfig) -> Result<ScanResult> {
        let matcher = build_matcher(&cfg.globs)?;

        // The root itself may be a symlink; entries below it are never followed.
        let metadata = fs::metadata(&cfg.root)
            .with_context(|| format!("failed to read directory {}", cfg.root.display()))?;
        if !metadata.is_dir() {
            bail!("{} is not a directory", cfg.root.display());
        }
        let walk_root = fs::canonicalize(&cfg.root)
            .with_context(|| format!("failed to read directory {}", cfg.root.display()))?;

        let mut builder = WalkBuilder::new(&walk_root);
        builder
            .standard_filters(false)
            .hidden(!cfg.show_hidden)
            .follow_links(false)
            .max_depth(Some(1));

        let mut files = Vec::new();
        for result in builder.build() {
            let entry = result
                .with_context(|| format!("failed to read directory {}", cfg.root.display()))?;
            if entry.depth() == 0 || entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!(
                    file = %entry.path().display(),
                    "skipping file with a non UTF-8 name"
                );
                continue;
            };
            if matcher.is_match(name) {
                files.push(name.to_owned());
            } else {
                tracing::trace!(file = %name, "skipping non-matching file");
            }
        }

        files.sort();
        tracing::debug!(root = %cfg.root.display(), count = files.len(), "scanned input directory");

        Ok(ScanResult {
            root: cfg.root.clone(),
            files,
        })
    }
}

fn build_matcher(globs: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in globs {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            continue;
        }
        let glob =
            Glob::new(trimmed).with_context(|| format!("invalid scan glob '{trimmed}'"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build scan matcher")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scan(root: &std::path::Path) -> Result<ScanResult> {
        let cfg = ScannerConfig::from_root(root.to_path_buf(), &Config::default());
        Scanner::new().scan(&cfg)
    }

    #[test]
    fn registers_only_proto_files() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::write(root.join("a.proto"), "syntax = \"proto3\";")?;
        fs::write(root.join("b.proto"), "syntax = \"proto3\";")?;
        fs::write(root.join("notes.txt"), "not a proto")?;

        let result = scan(root)?;
        assert_eq!(result.files, vec!["a.proto".to_string(), "b.proto".to_string()]);
        assert_eq!(result.root, root.to_path_buf());
        Ok(())
    }

    #[test]
    fn skips_directories_and_does_not_recurse() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("nested.proto"))?;
        fs::create_dir_all(root.join("sub"))?;
        fs::write(root.join("sub/deep.proto"), "")?;
        fs::write(root.join("top.proto"), "")?;

        let result = scan(root)?;
        assert_eq!(result.files, vec!["top.proto".to_string()]);
        Ok(())
    }

    #[test]
    fn includes_hidden_and_gitignored_files_by_default() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::write(root.join(".hidden.proto"), "")?;
        fs::write(root.join("ignored.proto"), "")?;
        fs::write(root.join(".gitignore"), "ignored.proto\n")?;

        let result = scan(root)?;
        assert!(result.files.contains(&".hidden.proto".to_string()));
        assert!(result.files.contains(&"ignored.proto".to_string()));

        let mut config = Config::default();
        config.scan.globs = vec!["*.proto".into()];
        let mut cfg = ScannerConfig::from_root(root.to_path_buf(), &config);
        cfg.show_hidden = false;
        let result = Scanner::new().scan(&cfg)?;
        assert!(!result.files.contains(&".hidden.proto".to_string()));
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("does-not-exist");
        let err = scan(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to read directory"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_root_is_followed_but_keeps_its_path() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let real = temp.path().join("real");
        fs::create_dir_all(&real)?;
        fs::write(real.join("a.proto"), "")?;
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&real, &link)?;

        let result = scan(&link)?;
        assert_eq!(result.files, vec!["a.proto".to_string()]);
        assert_eq!(result.root, link);
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped() -> Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::write(root.join(OsStr::from_bytes(b"bad\xff.proto")), "")?;
        fs::write(root.join("good.proto"), "")?;

        let result = scan(root)?;
        assert_eq!(result.files, vec!["good.proto".to_string()]);
        Ok(())
    }

    #[test]
    fn file_root_is_an_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("a.proto");
        fs::write(&file, "")?;
        let err = scan(&file).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
        Ok(())
    }
}
