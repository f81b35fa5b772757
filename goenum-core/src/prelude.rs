//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use goenum_core::prelude::*;
//! ```

// Errors
pub use crate::error::{GoenumError, GoenumResult};

// Parsing and analysis
pub use crate::decl::SourceFile;
pub use crate::enums::{find_enums, EnumDescriptor};
pub use crate::parse::{parse_file, parse_source};

// Synthesis and planning
pub use crate::plan::{plan_file, PatchOp, PatchPlan};
pub use crate::synth::{synthesize, MethodSetBuilder, Synthesis};

// Scanning and configuration
pub use crate::config::{load_config, GoenumConfig, RunOptions};
pub use crate::scan::{gather_go_files, PathSpec};

// Applying patches
#[cfg(feature = "fix")]
pub use crate::builder::Goenum;
#[cfg(feature = "fix")]
pub use crate::fix::{apply_plan, ApplyMode};
#[cfg(feature = "fix")]
pub use crate::rewrite::{rewrite_paths, rewrite_source, RewriteSummary};
