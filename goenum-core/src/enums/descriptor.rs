//! Enum descriptor: everything known about one marked type in one file.

use serde::Serialize;

use crate::decl::Span;

/// Underlying representation of an enum type, derived from its type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Representation {
    String,
    Integer,
    Float,
    Boolean,
    /// `time.Time`
    Time,
    /// `[]byte`
    Bytes,
    /// Any other slice or array
    Sequence,
    /// `map[...]` or `struct{...}`
    Structured,
    Other,
}

/// A pre-existing method the tool is allowed to regenerate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownMethod {
    pub name: String,
    /// Method span including its doc comment
    #[serde(skip)]
    pub span: Span,
}

/// One discovered enum type.
///
/// Created at discovery with no members, filled by the value collector and
/// the method census, then consumed by synthesis and planning.
#[derive(Debug, Clone, Serialize)]
pub struct EnumDescriptor {
    /// File the type was found in
    pub file: String,
    /// Line of the type spec (1-indexed)
    pub line: usize,
    pub package: String,
    pub type_name: String,
    /// Type expression text as written
    pub underlying: String,
    pub representation: Representation,
    /// Receiver binding name used in generated methods
    pub recv: String,
    /// Member constant names in declaration order
    pub members: Vec<String>,
    /// Literal texts parallel to `members`
    pub literals: Vec<String>,
    pub null_member: Option<String>,
    /// Emit a `JSONSchema` method
    pub json_schema: bool,
    /// Last constant declaration holding members of this type
    #[serde(skip)]
    pub anchor: Option<Span>,
    /// Replaceable methods in file order
    pub known_methods: Vec<KnownMethod>,
}

impl EnumDescriptor {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        package: impl Into<String>,
        type_name: impl Into<String>,
        underlying: impl Into<String>,
    ) -> Self {
        let underlying = underlying.into();
        Self {
            file: file.into(),
            line,
            package: package.into(),
            type_name: type_name.into(),
            representation: super::classify::representation_of(&underlying),
            underlying,
            recv: String::new(),
            members: Vec::new(),
            literals: Vec::new(),
            null_member: None,
            json_schema: false,
            anchor: None,
            known_methods: Vec::new(),
        }
    }

    /// `package.Type` as used in generated error messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.type_name)
    }

    pub fn is_nullable(&self) -> bool {
        self.null_member.is_some()
    }

    /// Literal of the null member, if any.
    pub fn null_literal(&self) -> Option<&str> {
        let null = self.null_member.as_deref()?;
        self.members
            .iter()
            .position(|m| m == null)
            .and_then(|i| self.literals.get(i))
            .map(String::as_str)
    }

    /// Default receiver name: lowercase first character of the type name.
    pub fn default_recv(&self) -> String {
        self.type_name
            .chars()
            .next()
            .map(|c| c.to_lowercase().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_classifies_underlying() {
        let d = EnumDescriptor::new("a.go", 3, "p", "Color", "int");
        assert_eq!(d.representation, Representation::Integer);
        assert!(d.members.is_empty());
        assert!(!d.is_nullable());
    }

    #[test]
    fn test_default_recv() {
        let d = EnumDescriptor::new("a.go", 1, "p", "Status", "string");
        assert_eq!(d.default_recv(), "s");
    }

    #[test]
    fn test_null_literal() {
        let mut d = EnumDescriptor::new("a.go", 1, "p", "Status", "string");
        d.members = vec!["StatusUndefined".into(), "StatusActive".into()];
        d.literals = vec!["\"\"".into(), "\"active\"".into()];
        d.null_member = Some("StatusUndefined".into());
        assert_eq!(d.null_literal(), Some("\"\""));
        assert_eq!(d.qualified_name(), "p.Status");
    }
}
