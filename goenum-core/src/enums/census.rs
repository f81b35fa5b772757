//! Method census: existing methods bound to each enum type.

use std::collections::HashMap;

use crate::decl::SourceFile;

use super::classify::{is_known_method, Capabilities};
use super::descriptor::{EnumDescriptor, KnownMethod};

/// Records known methods and infers the receiver name for every descriptor.
///
/// Must run after value collection since known-method gating depends on the
/// null member.
pub fn take_census(file: &SourceFile, enums: &mut [EnumDescriptor]) {
    let index: HashMap<String, usize> = enums
        .iter()
        .enumerate()
        .map(|(i, d)| (d.type_name.clone(), i))
        .collect();
    let caps: Vec<Capabilities> = enums.iter().map(Capabilities::of).collect();

    for method in file.methods() {
        let Some(&i) = index.get(method.recv_base_type()) else {
            continue;
        };
        let desc = &mut enums[i];

        if desc.recv.is_empty() {
            if let Some(name) = method.recv_name.as_deref().filter(|n| *n != "_") {
                desc.recv = name.to_string();
            }
        }

        if is_known_method(&method.name, &caps[i]) {
            desc.known_methods.push(KnownMethod {
                name: method.name.clone(),
                span: method.span_with_doc(),
            });
        }
    }

    for desc in enums.iter_mut() {
        if desc.recv.is_empty() {
            desc.recv = desc.default_recv();
        }
        tracing::debug!(
            type_name = %desc.type_name,
            recv = %desc.recv,
            known_methods = desc.known_methods.len(),
            "method census"
        );
    }
}
