//! Method synthesis.
//!
//! Renders the generated method block for one [`EnumDescriptor`]. Groups are
//! selected through the [`Capability`] table and rendered in its order, so a
//! descriptor always produces the same text.
//!
//! # Example
//!
//! ```ignore
//! use goenum_core::synth::MethodSetBuilder;
//!
//! let synthesis = MethodSetBuilder::new(&desc).all().build()?;
//! println!("{}", synthesis.text);
//! ```

pub mod groups;
pub mod writer;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::enums::{Capabilities, Capability, EnumDescriptor};
use crate::error::{GoenumError, GoenumResult};

pub use groups::RenderContext;
pub use writer::{go_quote, GoWriter};

/// Rendered method block plus the imports it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Synthesis {
    pub type_name: String,
    /// Methods separated by blank lines, no leading or trailing newline
    pub text: String,
    pub imports: BTreeSet<&'static str>,
    /// Generated method names in render order
    pub methods: Vec<&'static str>,
}

/// Builder selecting which method groups to render for one descriptor.
#[derive(Debug)]
pub struct MethodSetBuilder<'a> {
    desc: &'a EnumDescriptor,
    groups: Vec<Capability>,
}

impl<'a> MethodSetBuilder<'a> {
    pub fn new(desc: &'a EnumDescriptor) -> Self {
        Self {
            desc,
            groups: Vec::new(),
        }
    }

    /// Adds one group, ignoring duplicates.
    pub fn group(mut self, group: Capability) -> Self {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
        self
    }

    /// Adds every group the descriptor's capabilities emit.
    pub fn all(mut self) -> Self {
        let caps = Capabilities::of(self.desc);
        for group in Capability::ALL {
            if group.emitted(&caps) {
                self = self.group(group);
            }
        }
        self
    }

    /// Renders the selected groups in canonical order.
    pub fn build(self) -> GoenumResult<Synthesis> {
        self.check()?;

        let ctx = RenderContext::new(self.desc);
        let mut w = GoWriter::new();
        let mut imports = BTreeSet::new();
        let mut methods = Vec::new();

        for group in Capability::ALL {
            if !self.groups.contains(&group) {
                continue;
            }
            groups::render(group, &ctx, &mut w);
            imports.extend(group.imports().iter().copied());
            methods.extend(group.method_names().iter().copied());
        }

        Ok(Synthesis {
            type_name: self.desc.type_name.clone(),
            text: w.finish(),
            imports,
            methods,
        })
    }

    fn check(&self) -> GoenumResult<()> {
        let desc = self.desc;
        let fail = |message: &str| -> GoenumResult<()> {
            Err(GoenumError::render(&desc.type_name, message))
        };

        if desc.members.is_empty() {
            return fail("no members");
        }
        if desc.members.len() != desc.literals.len() {
            return fail("member and literal counts differ");
        }
        if desc.recv.is_empty() {
            return fail("no receiver name");
        }

        let caps = Capabilities::of(desc);
        let needs_null = self
            .groups
            .iter()
            .any(|g| matches!(g, Capability::NullSentinel | Capability::Persistence));
        if needs_null && !desc.is_nullable() {
            return fail("null handling requested without a null member");
        }
        if self.groups.contains(&Capability::Persistence) && !(caps.is_string || caps.is_integer) {
            return fail("persistence requires a string or integer representation");
        }
        Ok(())
    }
}

/// Renders every emitted group for `desc`.
pub fn synthesize(desc: &EnumDescriptor) -> GoenumResult<Synthesis> {
    let synthesis = MethodSetBuilder::new(desc).all().build()?;
    tracing::debug!(
        type_name = %desc.type_name,
        methods = synthesis.methods.len(),
        imports = synthesis.imports.len(),
        "synthesized method block"
    );
    Ok(synthesis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> EnumDescriptor {
        let mut d = EnumDescriptor::new("color.go", 3, "paint", "Color", "int");
        d.members = vec!["Red".into(), "Green".into(), "Blue".into()];
        d.literals = vec!["0".into(), "1".into(), "2".into()];
        d.recv = "c".into();
        d
    }

    fn status() -> EnumDescriptor {
        let mut d = EnumDescriptor::new("status.go", 3, "job", "Status", "string");
        d.members = vec![
            "StatusUndefined".into(),
            "StatusActive".into(),
            "StatusDone".into(),
        ];
        d.literals = vec!["\"\"".into(), "\"active\"".into(), "\"done\"".into()];
        d.null_member = Some("StatusUndefined".into());
        d.recv = "s".into();
        d
    }

    #[test]
    fn test_validation_order_and_text() {
        let s = synthesize(&color()).unwrap();
        assert!(s.text.starts_with(
            "// Valid indicates if c is any of the valid values for Color\nfunc (c Color) Valid() bool {\n\tswitch c {\n\tcase\n\t\tRed,\n\t\tGreen,\n\t\tBlue:\n\t\treturn true\n\t}\n\treturn false\n}"
        ));
        assert!(s.text.contains("fmt.Errorf(\"invalid value %#v for type paint.Color\", c)"));
        assert!(s.text.contains("\treturn []Color{\n\t\tRed,\n\t\tGreen,\n\t\tBlue,\n\t}"));
        assert!(s.text.contains("\treturn []string{\n\t\t\"0\",\n\t\t\"1\",\n\t\t\"2\",\n\t}"));
        assert!(!s.text.ends_with('\n'));
    }

    #[test]
    fn test_non_nullable_string_groups() {
        let mut d = status();
        d.null_member = None;
        let s = synthesize(&d).unwrap();
        assert_eq!(s.methods, vec!["Valid", "Validate", "Enums", "EnumStrings", "String"]);
        assert!(s.text.contains("func (s Status) String() string {\n\treturn string(s)\n}"));
        assert!(!s.text.contains("IsNull"));
        assert!(!s.text.contains("Scan"));
        assert!(!s.text.contains("JSONSchema"));
        assert_eq!(s.imports.into_iter().collect::<Vec<_>>(), vec!["fmt"]);
    }

    #[test]
    fn test_nullable_string_groups() {
        let s = synthesize(&status()).unwrap();
        assert_eq!(
            s.imports.iter().copied().collect::<Vec<_>>(),
            vec!["bytes", "database/sql/driver", "encoding/json", "fmt"]
        );
        assert!(s.text.contains("func (s *Status) SetNull() {\n\t*s = StatusUndefined\n}"));
        assert!(s.text.contains("return json.Unmarshal(j, (*string)(s))"));
        assert!(s.text.contains("\tcase string:\n\t\t*s = Status(value)\n\tcase []byte:\n"));
        assert!(s.text.contains("\tcase nil:\n\t\t*s = StatusUndefined\n"));
        assert!(s.text.contains("can't scan SQL value of type %T as job.Status"));
        assert!(s.text.contains("\treturn string(s), nil"));
    }

    #[test]
    fn test_nullable_integer_persistence() {
        let mut d = color();
        d.members.insert(0, "ColorNone".into());
        d.literals.insert(0, "-1".into());
        d.null_member = Some("ColorNone".into());
        let s = synthesize(&d).unwrap();
        assert!(s.text.contains("\tcase int64:\n\t\t*c = Color(value)\n\tcase float64:\n"));
        assert!(s.text.contains("\treturn int64(c), nil"));
        assert!(!s.text.contains("String() string"));
    }

    #[test]
    fn test_nullable_float_skips_persistence() {
        let mut d = EnumDescriptor::new("f.go", 1, "p", "Ratio", "float64");
        d.members = vec!["RatioNone".into(), "Half".into()];
        d.literals = vec!["0".into(), "0.5".into()];
        d.null_member = Some("RatioNone".into());
        d.recv = "r".into();
        let s = synthesize(&d).unwrap();
        assert!(s.methods.contains(&"IsNull"));
        assert!(!s.methods.contains(&"Scan"));
        assert!(!s.imports.contains("database/sql/driver"));
    }

    #[test]
    fn test_color_schema() {
        let mut d = color();
        d.json_schema = true;
        let s = synthesize(&d).unwrap();
        assert!(s.text.ends_with(
            "func (Color) JSONSchema() jsonschema.Schema {\n\treturn jsonschema.Schema{\n\t\tType: \"number\",\n\t\tEnum: []any{\n\t\t\t0,\n\t\t\t1,\n\t\t\t2,\n\t\t},\n\t}\n}"
        ));
        assert!(!s.text.contains("\"null\"},"));
        assert!(s.imports.contains("github.com/invopop/jsonschema"));
    }

    #[test]
    fn test_status_schema() {
        let mut d = status();
        d.json_schema = true;
        let s = synthesize(&d).unwrap();
        assert!(s.text.contains(
            "\t\tOneOf: []*jsonschema.Schema{\n\t\t\t{\n\t\t\t\tType: \"string\",\n\t\t\t\tEnum: []any{\n\t\t\t\t\t\"active\",\n\t\t\t\t\t\"done\",\n\t\t\t\t},\n\t\t\t},\n\t\t\t{Type: \"null\"},\n\t\t},\n\t\tDefault: StatusUndefined,\n"
        ));
    }

    #[test]
    fn test_builder_single_group() {
        let s = MethodSetBuilder::new(&color())
            .group(Capability::Listing)
            .group(Capability::Listing)
            .build()
            .unwrap();
        assert_eq!(s.methods, vec!["Enums", "EnumStrings"]);
        assert!(s.imports.is_empty());
        assert!(s.text.starts_with("// Enums returns all valid values for Color\nfunc (Color) Enums() []Color {"));
    }

    #[test]
    fn test_build_rejects_inconsistent_descriptor() {
        let mut d = color();
        d.literals.pop();
        assert!(matches!(
            synthesize(&d),
            Err(GoenumError::Render { .. })
        ));

        let err = MethodSetBuilder::new(&color())
            .group(Capability::NullSentinel)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("null member"));
    }
}
