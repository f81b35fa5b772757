//! Patch planning: turning descriptors into insert/replace/remove operations.
//!
//! Every descriptor produces either one insertion after its anchor (no known
//! methods yet) or one replacement of its first known method plus a removal
//! of every other known method. Operations carry source offsets of the
//! original text; the applicator in `fix.rs` splices them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::decl::Span;
use crate::enums::EnumDescriptor;
use crate::error::{GoenumError, GoenumResult};
use crate::synth::synthesize;

/// One edit against the original source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatchOp {
    /// Insert `text` right after byte offset `at`
    InsertAfter {
        at: usize,
        #[serde(skip)]
        text: String,
        origin: String,
    },
    /// Replace `range` with `text`
    Replace {
        range: Span,
        #[serde(skip)]
        text: String,
        origin: String,
    },
    /// Delete `range`
    Remove { range: Span, origin: String },
}

impl PatchOp {
    /// Byte range the op touches (empty for insertions).
    pub fn range(&self) -> (usize, usize) {
        match self {
            PatchOp::InsertAfter { at, .. } => (*at, *at),
            PatchOp::Replace { range, .. } | PatchOp::Remove { range, .. } => {
                (range.start, range.end)
            }
        }
    }

    /// The touched range as a span; insertions are zero-width.
    pub fn span(&self) -> Span {
        match self {
            PatchOp::InsertAfter { at, .. } => Span {
                start: *at,
                end: *at,
                ..Span::default()
            },
            PatchOp::Replace { range, .. } | PatchOp::Remove { range, .. } => *range,
        }
    }

    pub fn origin(&self) -> &str {
        match self {
            PatchOp::InsertAfter { origin, .. }
            | PatchOp::Replace { origin, .. }
            | PatchOp::Remove { origin, .. } => origin,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, PatchOp::InsertAfter { .. })
    }
}

/// All operations for one file plus the imports the generated code needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchPlan {
    pub ops: Vec<PatchOp>,
    pub imports: BTreeSet<&'static str>,
}

impl PatchPlan {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Fails if two ranged ops overlap or an insertion lands inside a range.
    pub fn check_disjoint(&self) -> GoenumResult<()> {
        let ranged: Vec<&PatchOp> = self.ops.iter().filter(|op| !op.is_insert()).collect();

        for (i, a) in ranged.iter().enumerate() {
            for b in &ranged[i + 1..] {
                let (sa, sb) = (a.span(), b.span());
                if sa.overlaps(&sb) {
                    return Err(GoenumError::patch(format!(
                        "overlapping edits {}..{} ({}) and {}..{} ({})",
                        sa.start,
                        sa.end,
                        a.origin(),
                        sb.start,
                        sb.end,
                        b.origin()
                    )));
                }
            }
        }

        for insert in self.ops.iter().filter(|op| op.is_insert()) {
            let at = insert.span();
            if let Some(hit) = ranged.iter().find(|r| r.span().overlaps(&at)) {
                return Err(GoenumError::patch(format!(
                    "insertion at {} ({}) falls inside edit of {}",
                    at.start,
                    insert.origin(),
                    hit.origin()
                )));
            }
        }
        Ok(())
    }
}

/// Provenance label attached to every op of one descriptor.
pub fn origin_of(desc: &EnumDescriptor) -> String {
    format!("Replacement for {}", desc.type_name)
}

/// Plans the ops for one descriptor and returns them with its imports.
pub fn plan_descriptor(
    desc: &EnumDescriptor,
) -> GoenumResult<(Vec<PatchOp>, BTreeSet<&'static str>)> {
    let synthesis = synthesize(desc)?;
    let origin = origin_of(desc);

    let mut ops = Vec::new();
    match desc.known_methods.split_first() {
        None => {
            let anchor = desc.anchor.ok_or_else(|| {
                GoenumError::render(&desc.type_name, "no constant declaration to insert after")
            })?;
            ops.push(PatchOp::InsertAfter {
                at: anchor.end,
                text: synthesis.text,
                origin,
            });
        }
        Some((first, rest)) => {
            ops.push(PatchOp::Replace {
                range: first.span,
                text: synthesis.text,
                origin: origin.clone(),
            });
            for stale in rest {
                ops.push(PatchOp::Remove {
                    range: stale.span,
                    origin: origin.clone(),
                });
            }
        }
    }
    Ok((ops, synthesis.imports))
}

/// Plans every descriptor of a file, in descriptor order.
pub fn plan_file(enums: &[EnumDescriptor]) -> GoenumResult<PatchPlan> {
    let mut plan = PatchPlan::default();
    for desc in enums {
        let (ops, imports) = plan_descriptor(desc)?;
        tracing::debug!(
            type_name = %desc.type_name,
            ops = ops.len(),
            replaced = desc.known_methods.len(),
            "planned descriptor"
        );
        plan.ops.extend(ops);
        plan.imports.extend(imports);
    }
    plan.check_disjoint()?;
    Ok(plan)
}
