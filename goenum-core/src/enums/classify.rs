//! Representation classification and capability gating.
//!
//! [`Capability`] is the single table that decides, per method group, which
//! method names the census may replace and whether the synthesizer renders
//! the group. Adding a group means adding a variant here and a renderer in
//! `synth::groups`.

use std::sync::OnceLock;

use regex::Regex;

use super::descriptor::{EnumDescriptor, Representation};

const INTEGER_TYPES: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr", "byte", "rune",
];

fn whitespace_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated at compile-test time.
    REGEX.get_or_init(|| Regex::new(r"\s+").expect("Hardcoded regex pattern is valid"))
}

/// Classifies a Go type expression.
pub fn representation_of(underlying: &str) -> Representation {
    let compact = whitespace_regex().replace_all(underlying, "");
    let t = compact.as_ref();
    match t {
        "string" => Representation::String,
        "bool" => Representation::Boolean,
        "float32" | "float64" => Representation::Float,
        "time.Time" => Representation::Time,
        "[]byte" | "[]uint8" => Representation::Bytes,
        _ if INTEGER_TYPES.contains(&t) => Representation::Integer,
        _ if t.starts_with('[') => Representation::Sequence,
        _ if t.starts_with("map[") || t.starts_with("struct{") => Representation::Structured,
        _ => Representation::Other,
    }
}

/// Generation flags derived from a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub is_string: bool,
    pub is_integer: bool,
    pub is_nullable: bool,
    pub json_schema: bool,
}

impl Capabilities {
    pub fn of(desc: &EnumDescriptor) -> Self {
        Self {
            is_string: desc.representation == Representation::String,
            is_integer: desc.representation == Representation::Integer,
            is_nullable: desc.is_nullable(),
            json_schema: desc.json_schema,
        }
    }
}

/// A group of generated methods.
///
/// `ALL` lists the groups in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `Valid`, `Validate`
    Validation,
    /// `Enums`, `EnumStrings`
    Listing,
    /// `String`
    Stringer,
    /// `IsNull`, `IsNotNull`, `SetNull`, `MarshalJSON`, `UnmarshalJSON`
    NullSentinel,
    /// `Scan`, `Value`
    Persistence,
    /// `JSONSchema`
    Schema,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::Validation,
        Capability::Listing,
        Capability::Stringer,
        Capability::NullSentinel,
        Capability::Persistence,
        Capability::Schema,
    ];

    pub fn method_names(self) -> &'static [&'static str] {
        match self {
            Capability::Validation => &["Valid", "Validate"],
            Capability::Listing => &["Enums", "EnumStrings"],
            Capability::Stringer => &["String"],
            Capability::NullSentinel => {
                &["IsNull", "IsNotNull", "SetNull", "MarshalJSON", "UnmarshalJSON"]
            }
            Capability::Persistence => &["Scan", "Value"],
            Capability::Schema => &["JSONSchema"],
        }
    }

    /// Whether existing methods of this group are treated as known.
    pub fn claimed(self, caps: &Capabilities) -> bool {
        match self {
            Capability::Validation | Capability::Listing => true,
            Capability::Stringer => caps.is_string,
            Capability::NullSentinel | Capability::Persistence => caps.is_nullable,
            Capability::Schema => caps.json_schema,
        }
    }

    /// Whether the group is rendered.
    pub fn emitted(self, caps: &Capabilities) -> bool {
        match self {
            Capability::Persistence => caps.is_nullable && (caps.is_string || caps.is_integer),
            other => other.claimed(caps),
        }
    }

    /// Import paths the rendered group needs.
    pub fn imports(self) -> &'static [&'static str] {
        match self {
            Capability::Validation => &["fmt"],
            Capability::Listing | Capability::Stringer => &[],
            Capability::NullSentinel => &["bytes", "encoding/json"],
            Capability::Persistence => &["database/sql/driver", "fmt"],
            Capability::Schema => &["github.com/invopop/jsonschema"],
        }
    }
}

/// True if `method` is a known (replaceable) method name under `caps`.
pub fn is_known_method(method: &str, caps: &Capabilities) -> bool {
    Capability::ALL
        .iter()
        .any(|c| c.claimed(caps) && c.method_names().contains(&method))
}

/// JSON schema type tag for a representation.
pub fn schema_type(repr: Representation) -> &'static str {
    match repr {
        Representation::String | Representation::Time | Representation::Other => "string",
        Representation::Integer | Representation::Float => "number",
        Representation::Boolean => "boolean",
        Representation::Bytes | Representation::Sequence => "array",
        Representation::Structured => "object",
    }
}

/// Literals for the schema enum list, null member excluded.
///
/// Non-string, non-integer literals are wrapped in a conversion to the
/// underlying type because untyped constants in `[]any` would otherwise
/// default to `int`/`float64`.
pub fn schema_literals(desc: &EnumDescriptor) -> Vec<String> {
    let caps = Capabilities::of(desc);
    desc.members
        .iter()
        .zip(&desc.literals)
        .filter(|(member, _)| desc.null_member.as_deref() != Some(member.as_str()))
        .map(|(_, lit)| {
            if caps.is_string || caps.is_integer {
                lit.clone()
            } else {
                format!("{}({})", desc.underlying, lit)
            }
        })
        .collect()
}
