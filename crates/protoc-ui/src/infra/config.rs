//! Configuration management utilities.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::format::DEFAULT_WRAP_WIDTH;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".protoc-ui/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub protoc: Protoc,
    #[serde(default)]
    pub scan: Scan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub wrap_width: Option<usize>,
}

impl Defaults {
    /// Column at which stderr is hard-wrapped in reports.
    pub fn wrap_width(&self) -> usize {
        self.wrap_width.unwrap_or(DEFAULT_WRAP_WIDTH)
    }

    /// Preselected language label, if one is configured.
    pub fn language(&self) -> Option<&str> {
        let trimmed = self.language.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            language: String::new(),
            wrap_width: Some(DEFAULT_WRAP_WIDTH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protoc {
    #[serde(default)]
    pub path: Option<String>,
}

impl Protoc {
    const DEFAULT_PATH: &'static str = "protoc";

    /// Compiler to run when no `--protoc` flag is given.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(Self::DEFAULT_PATH)
    }
}

impl Default for Protoc {
    fn default() -> Self {
        Self {
            path: Some(Self::DEFAULT_PATH.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(default = "Scan::default_globs")]
    pub globs: Vec<String>,
    #[serde(default)]
    show_hidden: Option<bool>,
}

impl Scan {
    fn default_globs() -> Vec<String> {
        vec!["*.proto".into()]
    }

    fn default_show_hidden() -> bool {
        true
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden.unwrap_or_else(Self::default_show_hidden)
    }
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            globs: Self::default_globs(),
            show_hidden: Some(Self::default_show_hidden()),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    protoc: Option<String>,
    language: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            protoc: env::var("PROTOC").ok().filter(|value| !value.is_empty()),
            language: env::var("PROTOC_UI_LANGUAGE").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(protoc: &str, language: &str) -> Self {
        Self {
            protoc: Some(protoc.to_owned()),
            language: Some(language.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading user config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            protoc: merge_protoc(self.protoc, other.protoc),
            scan: merge_scan(self.scan, other.scan),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        language: if overlay.language().is_some() {
            overlay.language
        } else {
            base.language
        },
        wrap_width: overlay.wrap_width.or(base.wrap_width),
    }
}

fn merge_protoc(base: Protoc, overlay: Protoc) -> Protoc {
    Protoc {
        path: overlay.path.or(base.path),
    }
}

fn merge_scan(mut base: Scan, overlay: Scan) -> Scan {
    let mut globs: BTreeSet<String> = base.globs.into_iter().collect();
    globs.extend(overlay.globs);
    base.globs = globs.into_iter().collect();

    if let Some(value) = overlay.show_hidden {
        base.show_hidden = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("protoc-ui/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(protoc) = env.protoc {
        config.protoc.path = Some(protoc);
    }
    if let Some(language) = env.language {
        config.defaults.language = language;
    }
    config
}
