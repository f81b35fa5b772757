//! Builder pattern API for goenum runs.
//!
//! ```rust,ignore
//! use goenum_core::prelude::*;
//!
//! let summary = Goenum::new("./pkg/...")
//!     .verbose(true)
//!     .jobs(4)
//!     .run()?;
//!
//! println!("{} files changed", summary.files_changed);
//! ```

use std::path::PathBuf;

use anyhow::Result;

use crate::config::{resolve_config, GoenumConfig, RunOptions};
use crate::rewrite::{rewrite_paths, RewriteSummary};
use crate::scan::PathSpec;

/// Builder for configuring a generation run.
#[derive(Debug, Clone)]
pub struct Goenum {
    /// Path argument, `dir/...` for recursive
    path: String,

    /// Explicit config file instead of goenum.toml lookup
    config_file: Option<PathBuf>,

    /// Skip goenum.toml entirely
    ignore_config: bool,

    verbose: bool,
    debug: bool,
    print: bool,
    jobs: Option<usize>,

    /// Extra excluded directory names
    excluded_dirs: Vec<String>,

    /// Formatter command overriding the config file
    formatter: Option<Vec<String>>,
}

impl Goenum {
    /// Create a builder for the given path argument.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            config_file: None,
            ignore_config: false,
            verbose: false,
            debug: false,
            print: false,
            jobs: None,
            excluded_dirs: Vec::new(),
            formatter: None,
        }
    }

    /// Echo every processed file to stdout.
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Annotate edits with provenance comments.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Print rewritten files instead of writing them.
    pub fn print(mut self, enabled: bool) -> Self {
        self.print = enabled;
        self
    }

    /// Worker pool size.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Load this config file instead of looking for goenum.toml.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Ignore any goenum.toml.
    pub fn ignore_config(mut self, enabled: bool) -> Self {
        self.ignore_config = enabled;
        self
    }

    /// Add directory names to exclude.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Run rewritten files through a formatter command.
    pub fn formatter(mut self, cmd: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.formatter = Some(cmd.into_iter().map(Into::into).collect());
        self
    }

    /// Resolves the config and returns the options the driver will see.
    pub fn options(&self) -> Result<(PathSpec, RunOptions)> {
        let spec = PathSpec::parse(&self.path);

        let mut config = if self.ignore_config {
            GoenumConfig::default()
        } else {
            resolve_config(self.config_file.as_deref(), &spec.root)?
        };
        if !self.excluded_dirs.is_empty() {
            config
                .exclude
                .get_or_insert_with(Vec::new)
                .extend(self.excluded_dirs.iter().cloned());
        }
        if self.formatter.is_some() {
            config.formatter = self.formatter.clone();
        }

        let opts = RunOptions {
            verbose: self.verbose,
            debug: self.debug,
            print: self.print,
            jobs: self.jobs,
            config,
        };
        Ok((spec, opts))
    }

    /// Execute the run.
    pub fn run(self) -> Result<RewriteSummary> {
        let (spec, opts) = self.options()?;
        rewrite_paths(&spec, &opts)
    }
}
