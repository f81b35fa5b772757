//! Enum analysis for one Go file.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │    discover.rs      │     │     values.rs       │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  //#enum marked     │────▶│  typed constants,   │
//! │  type specs         │     │  //#null, anchor    │
//! └─────────────────────┘     └──────────┬──────────┘
//!                                        ▼
//!            ┌─────────────────────┐     ┌─────────────────────┐
//!            │    classify.rs      │◀────│     census.rs       │
//!            │  ─────────────────  │     │  ─────────────────  │
//!            │  representation,    │     │  known methods,     │
//!            │  capability gating  │     │  receiver name      │
//!            └─────────────────────┘     └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use goenum_core::enums::find_enums;
//!
//! let file = parse_source(&path, &content)?;
//! for desc in find_enums(&file)? {
//!     println!("{} has {} members", desc.type_name, desc.members.len());
//! }
//! ```

pub mod census;
pub mod classify;
pub mod descriptor;
pub mod discover;
pub mod values;

pub use census::take_census;
pub use classify::{
    is_known_method, representation_of, schema_literals, schema_type, Capabilities, Capability,
};
pub use descriptor::{EnumDescriptor, KnownMethod, Representation};
pub use discover::{discover, EnumMarker, ENUM_MARKER, JSONSCHEMA_MODIFIER};
pub use values::{collect_values, ensure_members, NULL_MARKER};

use crate::decl::SourceFile;
use crate::error::GoenumResult;

/// Runs discovery, value collection and census over one file.
///
/// Returns descriptors sorted by source line. Any authoring error aborts the
/// whole file.
pub fn find_enums(file: &SourceFile) -> GoenumResult<Vec<EnumDescriptor>> {
    let mut enums = discover(file);
    if enums.is_empty() {
        return Ok(enums);
    }

    collect_values(file, &mut enums)?;
    ensure_members(&enums)?;
    take_census(file, &mut enums);

    enums.sort_by_key(|d| d.line);
    Ok(enums)
}
