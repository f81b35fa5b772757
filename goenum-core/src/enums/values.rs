//! Value-set collection from typed constant specs.

use std::collections::HashMap;

use crate::decl::SourceFile;
use crate::error::{GoenumError, GoenumResult};

use super::descriptor::EnumDescriptor;

/// Marker on a constant spec naming the null member.
pub const NULL_MARKER: &str = "//#null";

/// Appends every typed constant to its enum, in declaration order.
///
/// The anchor of a descriptor is the last constant declaration that
/// contributed a member. Fails on a second null marker for one type, or on a
/// null marker attached to a multi-name spec or a blank constant.
pub fn collect_values(file: &SourceFile, enums: &mut [EnumDescriptor]) -> GoenumResult<()> {
    let index: HashMap<String, usize> = enums
        .iter()
        .enumerate()
        .map(|(i, d)| (d.type_name.clone(), i))
        .collect();

    for decl in file.const_decls() {
        for spec in &decl.specs {
            let Some(&i) = spec.type_expr.as_ref().and_then(|t| index.get(t)) else {
                continue;
            };
            let desc = &mut enums[i];
            desc.anchor = Some(decl.span);

            if spec.comments.iter().any(|c| c == NULL_MARKER) {
                if let Some(existing) = &desc.null_member {
                    return Err(GoenumError::DuplicateNullMarker {
                        type_name: desc.type_name.clone(),
                        member: spec.names.first().cloned().unwrap_or_default(),
                        existing: existing.clone(),
                    });
                }
                if spec.names.len() > 1 {
                    return Err(GoenumError::MultiNameNullMarker {
                        type_name: desc.type_name.clone(),
                        names: spec.names.clone(),
                    });
                }
                if spec.names.iter().any(|n| n == "_") {
                    return Err(GoenumError::BlankNullMarker {
                        type_name: desc.type_name.clone(),
                    });
                }
                desc.null_member = spec.names.first().cloned();
            }

            for (name, value) in spec.names.iter().zip(&spec.values) {
                // Blank constants cannot appear in a switch or slice literal
                if name == "_" || desc.members.contains(name) {
                    continue;
                }
                desc.members.push(name.clone());
                desc.literals.push(value.clone());
            }
        }
    }
    Ok(())
}

/// Fails with `EmptyEnum` for the first descriptor without members.
pub fn ensure_members(enums: &[EnumDescriptor]) -> GoenumResult<()> {
    match enums.iter().find(|d| d.members.is_empty()) {
        Some(d) => Err(GoenumError::EmptyEnum {
            package: d.package.clone(),
            type_name: d.type_name.clone(),
            file: d.file.clone(),
            line: d.line,
        }),
        None => Ok(()),
    }
}
