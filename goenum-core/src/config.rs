//! Configuration loading from goenum.toml, plus per-run options.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{GoenumError, GoenumResult, IoResultExt};

/// File name looked up in the target root.
pub const CONFIG_FILE: &str = "goenum.toml";

/// Main configuration structure for goenum.toml.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GoenumConfig {
    /// Directory names to skip while scanning.
    pub exclude: Option<Vec<String>>,
    /// Worker pool size.
    pub jobs: Option<usize>,
    /// Formatter command run over rewritten files, e.g. `["gofmt"]`.
    /// Unset means output is spliced as generated and never reformatted.
    pub formatter: Option<Vec<String>>,
}

/// Loads configuration from goenum.toml in `root` if it exists.
pub fn load_config(root: &Path) -> GoenumResult<Option<GoenumConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads an explicit configuration file.
pub fn load_config_file(path: &Path) -> GoenumResult<GoenumConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    let cfg: GoenumConfig =
        toml::from_str(&content).map_err(|e| GoenumError::config(path, e.to_string()))?;

    if cfg.jobs == Some(0) {
        return Err(GoenumError::config(path, "jobs must be at least 1"));
    }
    if cfg.formatter.as_ref().is_some_and(|f| f.is_empty()) {
        return Err(GoenumError::config(path, "formatter command is empty"));
    }
    Ok(cfg)
}

/// Settings for one run, threaded explicitly into the driver.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Echo per-file progress to stdout
    pub verbose: bool,
    /// Annotate edits with provenance comments instead of clean code
    pub debug: bool,
    /// Write results to stdout instead of the files
    pub print: bool,
    /// Worker pool size; overrides the config file
    pub jobs: Option<usize>,
    pub config: GoenumConfig,
}

impl RunOptions {
    /// Effective worker count (`None` leaves the choice to rayon).
    pub fn jobs(&self) -> Option<usize> {
        self.jobs.or(self.config.jobs).filter(|&n| n > 0)
    }

    pub fn excludes(&self) -> &[String] {
        self.config.exclude.as_deref().unwrap_or(&[])
    }

    pub fn formatter(&self) -> Option<&[String]> {
        self.config.formatter.as_deref()
    }
}

/// Resolves the config for a run: an explicit file wins, otherwise
/// goenum.toml next to the scanned root, otherwise defaults.
pub fn resolve_config(explicit: Option<&Path>, root: &Path) -> GoenumResult<GoenumConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    let dir: PathBuf = if root.is_file() {
        root.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        root.to_path_buf()
    };
    Ok(load_config(&dir)?.unwrap_or_default())
}
