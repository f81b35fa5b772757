//! Enum discovery: type specs carrying the `//#enum` marker.

use crate::decl::SourceFile;

use super::descriptor::EnumDescriptor;

/// Marker on a type spec line.
pub const ENUM_MARKER: &str = "//#enum";
/// Modifier requesting a `JSONSchema` method.
pub const JSONSCHEMA_MODIFIER: &str = "jsonschema";

/// Parsed `//#enum[,modifier...]` comment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumMarker {
    pub json_schema: bool,
}

impl EnumMarker {
    /// Returns `None` unless the first comma-separated token is exactly the
    /// enum marker. Unknown modifiers are ignored.
    pub fn parse(comment: &str) -> Option<Self> {
        let mut tokens = comment.split(',');
        if tokens.next()? != ENUM_MARKER {
            return None;
        }
        let mut marker = EnumMarker::default();
        for token in tokens {
            if token == JSONSCHEMA_MODIFIER {
                marker.json_schema = true;
            }
        }
        Some(marker)
    }
}

/// Creates an empty descriptor for every marked type spec, in file order.
pub fn discover(file: &SourceFile) -> Vec<EnumDescriptor> {
    let mut found: Vec<EnumDescriptor> = Vec::new();
    for spec in file.type_specs() {
        let Some(marker) = spec.comments.iter().find_map(|c| EnumMarker::parse(c)) else {
            continue;
        };
        if found.iter().any(|d| d.type_name == spec.name) {
            continue;
        }
        let mut desc = EnumDescriptor::new(
            file.file_id(),
            spec.span.line,
            file.package.clone(),
            spec.name.clone(),
            spec.underlying.clone(),
        );
        desc.json_schema = marker.json_schema;
        tracing::debug!(
            file = %desc.file,
            type_name = %desc.type_name,
            underlying = %desc.underlying,
            json_schema = desc.json_schema,
            "discovered enum type"
        );
        found.push(desc);
    }
    found
}
