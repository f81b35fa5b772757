//! Declaration tree of one Go source file.
//!
//! Only the three declaration kinds the enum pipeline looks at carry
//! structure: type declarations, constant groups and receiver-bound methods.
//! Everything else is kept as [`Decl::Other`] so positions stay ordered.

use std::path::PathBuf;

use serde::Serialize;

/// Byte range in the source text plus the 1-based line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    /// Extend this span backwards to `other.start` (used to pull in docs).
    pub fn with_prefix(self, other: Span) -> Self {
        Self {
            start: other.start.min(self.start),
            end: self.end,
            line: other.line.min(self.line),
        }
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One parsed Go file.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Name from the `package` clause
    pub package: String,
    /// Span of the `package` clause
    pub package_clause: Span,
    /// Import declarations in source order
    pub imports: Vec<ImportDecl>,
    /// Top-level declarations in source order
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// Human readable file id used in error messages.
    pub fn file_id(&self) -> String {
        self.path.display().to_string()
    }

    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Type(t) => Some(t.specs.iter()),
            _ => None,
        }).flatten()
    }

    pub fn const_decls(&self) -> impl Iterator<Item = &ConstDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Const(c) => Some(c),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Method(m) => Some(m),
            _ => None,
        })
    }
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Type(TypeDecl),
    Const(ConstDecl),
    Method(MethodDecl),
    /// Functions, vars, imports: positions only
    Other(Span),
}

/// `type X ...` or `type ( ... )`
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub span: Span,
    pub specs: Vec<TypeSpec>,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    /// Source text of the underlying type expression
    pub underlying: String,
    pub span: Span,
    /// Comments on the spec's last line, after the spec
    pub comments: Vec<String>,
}

/// `const X T = v` or `const ( ... )`
#[derive(Debug, Clone)]
pub struct ConstDecl {
    pub span: Span,
    pub specs: Vec<ValueSpec>,
}

#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<String>,
    /// Declared type text, `None` for untyped specs
    pub type_expr: Option<String>,
    /// Value expression texts, parallel to `names`
    pub values: Vec<String>,
    pub span: Span,
    pub comments: Vec<String>,
}

/// `func (r T) Name(...) ...`
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    /// Receiver binding name, `None` for `func (T) ...`
    pub recv_name: Option<String>,
    /// Receiver type text including any `*`
    pub recv_type: String,
    pub span: Span,
    /// Contiguous comment block directly above the method
    pub doc: Option<Span>,
}

impl MethodDecl {
    /// Receiver type without one leading pointer marker.
    pub fn recv_base_type(&self) -> &str {
        let t = self.recv_type.trim();
        t.strip_prefix('*').unwrap_or(t).trim()
    }

    /// Span covering the doc comment (if any) and the method itself.
    pub fn span_with_doc(&self) -> Span {
        match self.doc {
            Some(doc) => self.span.with_prefix(doc),
            None => self.span,
        }
    }
}

/// `import "x"` or `import ( ... )`
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub span: Span,
    /// Whether the declaration uses a parenthesized group
    pub grouped: bool,
    pub specs: Vec<ImportSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Alias, `_` or `.` if present
    pub name: Option<String>,
    /// Quoted path exactly as written
    pub path: String,
}

impl ImportSpec {
    /// Path without quotes.
    pub fn unquoted(&self) -> &str {
        self.path.trim_matches(|c| c == '"' || c == '`')
    }
}
