//! The driver: analyze, plan and patch every file, then write.
//!
//! All files are processed in memory first on a bounded rayon pool. If any
//! file fails, every failure is reported and nothing is written, so a run
//! never leaves a tree half-generated.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::RunOptions;
use crate::enums::find_enums;
use crate::error::{GoenumError, GoenumResult, IoResultExt};
use crate::fix::{apply_plan, ApplyMode};
use crate::logging::log_event;
use crate::parse::{parse_source, read_source};
use crate::plan::plan_file;
use crate::scan::{gather_go_files, PathSpec};

/// What happened to one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Enum type names found, in source order
    pub enums: Vec<String>,
    /// Number of planned ops
    pub ops: usize,
    pub changed: bool,
    /// New file text when it differs from the input
    #[serde(skip)]
    pub rewritten: Option<String>,
}

/// A file that failed analysis or patching.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
    /// The error comes from how an enum was written
    pub authoring: bool,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RewriteSummary {
    pub files_scanned: usize,
    pub enums_found: usize,
    pub files_changed: usize,
    /// Whether changed files were written (false on failure or `--print`)
    pub written: bool,
    pub outcomes: Vec<FileOutcome>,
    pub failures: Vec<FileFailure>,
}

impl RewriteSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn changed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.changed)
    }
}

/// Maps run options onto an apply mode.
pub fn apply_mode(opts: &RunOptions) -> ApplyMode {
    if opts.debug {
        ApplyMode::Debug
    } else {
        ApplyMode::Clean {
            formatter: opts.formatter().map(<[String]>::to_vec),
        }
    }
}

/// Runs the whole pipeline over one file's text. Pure: nothing is written.
pub fn rewrite_source(path: &Path, source: &str, mode: &ApplyMode) -> GoenumResult<FileOutcome> {
    let file = parse_source(path, source)?;
    let enums = find_enums(&file)?;
    let names: Vec<String> = enums.iter().map(|d| d.type_name.clone()).collect();

    let plan = plan_file(&enums)?;
    if plan.is_empty() {
        return Ok(FileOutcome {
            path: path.to_path_buf(),
            enums: names,
            ops: 0,
            changed: false,
            rewritten: None,
        });
    }

    let text = apply_plan(source, &file, &plan, mode)?;
    let rewritten = (text != source).then_some(text);

    tracing::debug!(
        file = %path.display(),
        enums = names.len(),
        ops = plan.ops.len(),
        changed = rewritten.is_some(),
        "file processed"
    );

    Ok(FileOutcome {
        path: path.to_path_buf(),
        enums: names,
        ops: plan.ops.len(),
        changed: rewritten.is_some(),
        rewritten,
    })
}

/// Reads one file from disk and runs [`rewrite_source`] over it.
pub fn rewrite_file(path: &Path, mode: &ApplyMode) -> GoenumResult<FileOutcome> {
    let source = read_source(path)?;
    rewrite_source(path, &source, mode)
}

/// Processes every Go file named by `spec` and writes changed files.
///
/// Per-file failures end up in [`RewriteSummary::failures`]; only setup
/// problems (bad path, pool creation, write errors) are returned as `Err`.
pub fn rewrite_paths(spec: &PathSpec, opts: &RunOptions) -> Result<RewriteSummary> {
    let files = gather_go_files(spec, opts.excludes())?;
    let mode = apply_mode(opts);

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = opts.jobs() {
        pool = pool.num_threads(jobs);
    }
    let pool = pool.build().context("Failed to build worker pool")?;

    log_event(
        "rewrite_start",
        &format!("{} files under {}", files.len(), spec.root.display()),
    );

    let results: Vec<(PathBuf, GoenumResult<FileOutcome>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| (path.clone(), rewrite_file(path, &mode)))
            .collect()
    });

    let mut summary = RewriteSummary {
        files_scanned: files.len(),
        ..RewriteSummary::default()
    };

    for (path, result) in results {
        if opts.verbose {
            println!("{}", path.display());
        }
        match result {
            Ok(outcome) => {
                summary.enums_found += outcome.enums.len();
                summary.files_changed += usize::from(outcome.changed);
                summary.outcomes.push(outcome);
            }
            Err(err) => {
                log_event("WARN", &err.to_string());
                summary.failures.push(failure(path, &err));
            }
        }
    }

    if !summary.is_success() {
        log_event(
            "ERROR",
            &format!("{} file(s) failed, nothing written", summary.failures.len()),
        );
        return Ok(summary);
    }

    if opts.print {
        for outcome in summary.changed() {
            if let Some(text) = &outcome.rewritten {
                print!("{text}");
            }
        }
    } else {
        write_changed(&summary)?;
        summary.written = summary.files_changed > 0;
    }

    log_event(
        "rewrite_done",
        &format!(
            "{} enums, {} files changed",
            summary.enums_found, summary.files_changed
        ),
    );
    Ok(summary)
}

fn failure(path: PathBuf, err: &GoenumError) -> FileFailure {
    FileFailure {
        path,
        error: err.to_string(),
        authoring: err.is_authoring_error(),
    }
}

fn write_changed(summary: &RewriteSummary) -> Result<()> {
    for outcome in summary.changed() {
        if let Some(text) = &outcome.rewritten {
            fs::write(&outcome.path, text).with_path(&outcome.path)?;
        }
    }
    Ok(())
}
