//! Patch application: splicing planned ops into the original source.
//!
//! Never panics on malformed plans; overlapping edits surface as
//! [`GoenumError::Patch`] and the file is left untouched.
//!
//! Features:
//! - Back-to-front splicing so every op uses original offsets
//! - Import merging (standard library group first, then third-party)
//! - Optional external formatter (`gofmt`, `goimports`, ...)
//! - Debug mode that annotates every edit with its provenance

use std::collections::BTreeSet;
use std::io::Write;
use std::process::{Command, Stdio};

use crate::decl::{ImportDecl, ImportSpec, SourceFile};
use crate::error::{GoenumError, GoenumResult};
use crate::plan::{PatchOp, PatchPlan};

/// How planned ops are turned into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyMode {
    /// Plain generated code, imports merged, optionally reformatted
    Clean {
        /// Formatter command reading stdin and writing stdout
        formatter: Option<Vec<String>>,
    },
    /// Every edit wrapped in provenance comments; imports untouched
    Debug,
}

impl ApplyMode {
    pub fn clean() -> Self {
        ApplyMode::Clean { formatter: None }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, ApplyMode::Debug)
    }
}

/// A resolved text edit against the original source.
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
    seq: usize,
}

/// Applies `plan` to `source` and returns the new text.
pub fn apply_plan(
    source: &str,
    file: &SourceFile,
    plan: &PatchPlan,
    mode: &ApplyMode,
) -> GoenumResult<String> {
    plan.check_disjoint()?;

    let mut edits: Vec<Edit> = plan
        .ops
        .iter()
        .enumerate()
        .map(|(seq, op)| resolve(source, op, mode, seq))
        .collect::<GoenumResult<_>>()?;

    if !mode.is_debug() {
        if let Some(mut edit) = import_edit(source, file, &plan.imports) {
            edit.seq = edits.len();
            edits.push(edit);
        }
    }

    let mut out = splice(source, edits)?;

    if let ApplyMode::Clean {
        formatter: Some(cmd),
    } = mode
    {
        out = run_formatter(cmd, &out)?;
    }
    Ok(out)
}

fn resolve(source: &str, op: &PatchOp, mode: &ApplyMode, seq: usize) -> GoenumResult<Edit> {
    let (start, end) = op.range();
    if end > source.len() || !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        return Err(GoenumError::patch(format!(
            "edit {}..{} ({}) outside source of {} bytes",
            start,
            end,
            op.origin(),
            source.len()
        )));
    }

    let debug = mode.is_debug();
    let edit = match op {
        PatchOp::InsertAfter { text, origin, .. } => Edit {
            start,
            end,
            text: format!("\n\n{}", wrap(text, origin, debug)),
            seq,
        },
        PatchOp::Replace { text, origin, .. } => Edit {
            start,
            end,
            text: wrap(text, origin, debug),
            seq,
        },
        PatchOp::Remove { origin, .. } if debug => Edit {
            start,
            end,
            text: format!("// goenum: removed {origin}"),
            seq,
        },
        PatchOp::Remove { .. } => Edit {
            start: extend_over_whitespace(source, start),
            end,
            text: String::new(),
            seq,
        },
    };
    Ok(edit)
}

fn wrap(text: &str, origin: &str, debug: bool) -> String {
    if debug {
        format!("// goenum: begin {origin}\n{text}\n// goenum: end {origin}")
    } else {
        text.to_string()
    }
}

/// Moves `start` back over the whitespace that separates it from the
/// preceding code, so removals leave no blank-line runs.
fn extend_over_whitespace(source: &str, start: usize) -> usize {
    let prefix = &source[..start];
    prefix.trim_end().len()
}

fn splice(source: &str, mut edits: Vec<Edit>) -> GoenumResult<String> {
    // Insertions sort before a ranged edit at the same offset so that, applied
    // in reverse, their text ends up in front of it.
    edits.sort_by_key(|e| (e.start, e.end, e.seq));

    for pair in edits.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.end > b.start {
            return Err(GoenumError::patch(format!(
                "edits {}..{} and {}..{} overlap after resolution",
                a.start, a.end, b.start, b.end
            )));
        }
    }

    let mut out = source.to_string();
    for edit in edits.iter().rev() {
        out.replace_range(edit.start..edit.end, &edit.text);
    }
    Ok(out)
}

/// True for paths whose first element has no dot (`fmt`, `encoding/json`).
pub fn is_std_import(path: &str) -> bool {
    let first = path.split('/').next().unwrap_or(path);
    !first.contains('.')
}

fn has_import(file: &SourceFile, path: &str) -> bool {
    file.imports
        .iter()
        .flat_map(|d| &d.specs)
        .any(|s| s.name.is_none() && s.unquoted() == path)
}

fn import_line(spec: &ImportSpec) -> String {
    match &spec.name {
        Some(name) => format!("\t{} {}", name, spec.path),
        None => format!("\t{}", spec.path),
    }
}

/// Renders a grouped import block: standard library first, then the rest.
fn import_block(specs: &[ImportSpec]) -> String {
    let (mut std, mut other): (Vec<&ImportSpec>, Vec<&ImportSpec>) =
        specs.iter().partition(|s| is_std_import(s.unquoted()));
    std.sort_by(|a, b| (a.unquoted(), &a.name).cmp(&(b.unquoted(), &b.name)));
    other.sort_by(|a, b| (a.unquoted(), &a.name).cmp(&(b.unquoted(), &b.name)));

    let mut lines = vec!["import (".to_string()];
    lines.extend(std.iter().map(|s| import_line(s)));
    if !std.is_empty() && !other.is_empty() {
        lines.push(String::new());
    }
    lines.extend(other.iter().map(|s| import_line(s)));
    lines.push(")".to_string());
    lines.join("\n")
}

fn import_edit(source: &str, file: &SourceFile, required: &BTreeSet<&'static str>) -> Option<Edit> {
    let missing: Vec<ImportSpec> = required
        .iter()
        .filter(|p| !has_import(file, p))
        .map(|p| ImportSpec {
            name: None,
            path: format!("\"{p}\""),
        })
        .collect();
    if missing.is_empty() {
        return None;
    }
    tracing::debug!(file = %file.file_id(), missing = missing.len(), "merging imports");

    let Some(decl) = file.imports.first() else {
        let at = file.package_clause.end;
        return Some(Edit {
            start: at,
            end: at,
            text: format!("\n\n{}", import_block(&missing)),
            seq: 0,
        });
    };

    let text = &source[decl.span.start..decl.span.end];
    if !text.contains("//") && !text.contains("/*") {
        let mut specs = decl.specs.clone();
        specs.extend(missing);
        return Some(Edit {
            start: decl.span.start,
            end: decl.span.end,
            text: import_block(&specs),
            seq: 0,
        });
    }

    Some(commented_import_edit(text, decl, &missing))
}

/// Adds imports without disturbing a declaration that carries comments.
fn commented_import_edit(text: &str, decl: &ImportDecl, missing: &[ImportSpec]) -> Edit {
    let lines: Vec<String> = missing.iter().map(import_line).collect();

    if decl.grouped {
        if let Some(close) = text.rfind(')') {
            let line_start = text[..close].rfind('\n').map(|i| i + 1).unwrap_or(close);
            let at = decl.span.start + line_start;
            return Edit {
                start: at,
                end: at,
                text: format!("{}\n", lines.join("\n")),
                seq: 0,
            };
        }
    }

    let at = decl.span.end;
    Edit {
        start: at,
        end: at,
        text: format!("\n\nimport (\n{}\n)", lines.join("\n")),
        seq: 0,
    }
}

/// Pipes `text` through an external formatter command.
pub fn run_formatter(cmd: &[String], text: &str) -> GoenumResult<String> {
    let (program, args) = cmd
        .split_first()
        .ok_or_else(|| GoenumError::format("empty formatter command"))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| GoenumError::format(format!("failed to start {program}: {e}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| GoenumError::format(format!("no stdin for {program}")))?;
    let input = text.to_string();
    let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child
        .wait_with_output()
        .map_err(|e| GoenumError::format(format!("{program} failed: {e}")))?;
    match writer.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(GoenumError::format(format!("writing to {program}: {e}"))),
        Err(_) => return Err(GoenumError::format(format!("writer thread for {program} panicked"))),
    }

    if !output.status.success() {
        return Err(GoenumError::format(format!(
            "{program} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    String::from_utf8(output.stdout)
        .map_err(|e| GoenumError::format(format!("{program} produced invalid UTF-8: {e}")))
}
