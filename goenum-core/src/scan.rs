//! Parallel, deterministic Go file discovery with directory pruning.
//!
//! Performance optimizations:
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel file filtering via Rayon's `par_bridge`
//!
//! Directory rules follow the `go` tool: `vendor` and `testdata` are never
//! descended into, nor is any directory whose name starts with `.` or `_`.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories excluded by default.
const EXCLUDED_DIRS: &[&str] = &["vendor", "testdata", ".git", "node_modules"];

/// Suffix marking a recursive path argument, as in `./pkg/...`.
pub const RECURSIVE_SUFFIX: &str = "...";

/// A path argument: a file, a directory, or a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub root: PathBuf,
    pub recursive: bool,
}

impl PathSpec {
    /// Parses a CLI path. `dir/...` (or plain `...`) walks the whole tree.
    pub fn parse(arg: &str) -> Self {
        if arg == RECURSIVE_SUFFIX {
            return Self {
                root: PathBuf::from("."),
                recursive: true,
            };
        }
        match arg.strip_suffix(RECURSIVE_SUFFIX).and_then(|r| r.strip_suffix('/')) {
            Some("") => Self {
                root: PathBuf::from("/"),
                recursive: true,
            },
            Some(root) => Self {
                root: PathBuf::from(root),
                recursive: true,
            },
            None => Self {
                root: PathBuf::from(arg),
                recursive: false,
            },
        }
    }
}

fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

/// Checks if a directory entry below the root should be pruned.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry.file_name().to_str().is_some_and(|name| {
        excludes.contains(name) || name.starts_with('.') || name.starts_with('_')
    })
}

/// Gathers the `.go` files named by `spec`, sorted by path.
///
/// Custom `excludes` are directory names pruned in addition to the defaults.
pub fn gather_go_files(spec: &PathSpec, excludes: &[String]) -> Result<Vec<PathBuf>> {
    let root = &spec.root;
    if !root.exists() {
        bail!("path does not exist: {}", root.display());
    }
    if root.is_file() {
        if !is_go_file(root) {
            bail!("not a Go source file: {}", root.display());
        }
        return Ok(vec![root.clone()]);
    }

    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().map(String::as_str))
        .collect();
    let max_depth = if spec.recursive { usize::MAX } else { 1 };

    let mut files = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && is_go_file(path) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather .go files from {}", root.display()))?;

    files.sort();
    Ok(files)
}
