//! goenum-core: enum method synthesis for Go source files
//!
//! Scans Go files for types marked with `//#enum`, collects their typed
//! constants, and generates the methods such types conventionally need:
//! validation, listing, string conversion, null handling, SQL persistence and
//! JSON schema. Generated code is patched into the file in place, replacing
//! stale copies of the same methods, so repeated runs are no-ops.
//!
//! # Pipeline
//!
//! ```text
//! parse ─▶ discover ─▶ collect values ─▶ census ─▶ synthesize ─▶ plan ─▶ apply
//! ```
//!
//! Each file runs through the pipeline independently; the driver in
//! [`rewrite`] spreads files over a rayon pool.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use goenum_core::prelude::*;
//!
//! let summary = Goenum::new("./...").run()?;
//! for outcome in summary.changed() {
//!     println!("updated {}", outcome.path.display());
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`parse`] / [`decl`]: tree-sitter based declaration tree
//! - [`enums`]: discovery, value collection, classification, method census
//! - [`synth`]: method block rendering
//! - [`plan`]: insert/replace/remove planning
//! - [`fix`]: splicing, import merging, formatting
//! - [`rewrite`]: parallel driver
//! - [`scan`]: Go file discovery
//! - [`config`]: goenum.toml and run options
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `fix` (default): apply plans and rewrite files
//! - `full`: all optional features

// Core modules (always available)
pub mod config;
pub mod decl;
pub mod enums;
pub mod error;
pub mod logging;
pub mod parse;
pub mod plan;
pub mod prelude;
pub mod scan;
pub mod synth;

// Feature-gated modules
#[cfg(feature = "fix")]
pub mod builder;
#[cfg(feature = "fix")]
pub mod fix;
#[cfg(feature = "fix")]
pub mod report;
#[cfg(feature = "fix")]
pub mod rewrite;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{GoenumError, GoenumResult, IoResultExt};

// Configuration
pub use config::{load_config, load_config_file, resolve_config, GoenumConfig, RunOptions};

// Declaration tree
pub use decl::{Decl, SourceFile, Span};
pub use parse::{parse_file, parse_source, read_source};

// Enum analysis
pub use enums::{
    find_enums, Capabilities, Capability, EnumDescriptor, KnownMethod, Representation,
    ENUM_MARKER, NULL_MARKER,
};

// Synthesis and planning
pub use plan::{plan_descriptor, plan_file, PatchOp, PatchPlan};
pub use synth::{synthesize, MethodSetBuilder, Synthesis};

// Logging
pub use logging::{init_structured_logging, log_event};

// File scanning
pub use scan::{gather_go_files, PathSpec};

// Feature-gated re-exports
#[cfg(feature = "fix")]
pub use builder::Goenum;
#[cfg(feature = "fix")]
pub use fix::{apply_plan, run_formatter, ApplyMode};
#[cfg(feature = "fix")]
pub use report::{print_json, print_plain};
#[cfg(feature = "fix")]
pub use rewrite::{
    rewrite_file, rewrite_paths, rewrite_source, FileFailure, FileOutcome, RewriteSummary,
};

#[cfg(all(test, feature = "fix"))]
mod tests;
