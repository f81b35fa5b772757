//! Go source parsing into a [`SourceFile`] declaration tree.
//!
//! Uses tree-sitter-go. Comments are extras in the grammar and may hang off
//! any node, so they are collected once per file and attached to specs and
//! methods by position:
//! - trailing comments start on the last line of a spec, after its start
//! - doc comments are whole-line comments on the lines directly above a method

use std::fs;
use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::decl::{
    ConstDecl, Decl, ImportDecl, ImportSpec, MethodDecl, SourceFile, Span, TypeDecl, TypeSpec,
    ValueSpec,
};
use crate::error::{GoenumError, GoenumResult, IoResultExt};

/// Maximum file size to parse (10 MB).
const MAX_FILE_SIZE: usize = 10_000_000;

/// A comment node with the positional facts needed for attachment.
#[derive(Debug, Clone)]
struct CommentInfo {
    text: String,
    start: usize,
    end: usize,
    start_row: usize,
    end_row: usize,
    /// Only whitespace precedes the comment on its first line
    whole_line: bool,
}

/// Reads a Go file, refusing anything above `MAX_FILE_SIZE`.
pub fn read_source(path: &Path) -> GoenumResult<String> {
    let metadata = fs::metadata(path).with_path(path)?;
    if metadata.len() > MAX_FILE_SIZE as u64 {
        return Err(GoenumError::parse(
            path,
            format!("file too large ({} bytes)", metadata.len()),
        ));
    }
    fs::read_to_string(path).with_path(path)
}

/// Reads and parses a Go file from disk.
pub fn parse_file(path: &Path) -> GoenumResult<SourceFile> {
    let source = read_source(path)?;
    parse_source(path, &source)
}

/// Parses Go source text into a declaration tree.
pub fn parse_source(path: &Path, source: &str) -> GoenumResult<SourceFile> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| GoenumError::parse(path, e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| GoenumError::parse(path, "Failed to parse"))?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, column) = first_error(root)
            .map(|n| (n.start_position().row + 1, n.start_position().column + 1))
            .unwrap_or((0, 0));
        return Err(GoenumError::parse_at(path, "Syntax error", line, column));
    }

    let mut reader = DeclReader::new(path, source);
    reader.collect_comments(root);
    reader.read_file(root)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

/// Walks a tree-sitter Go tree and builds declarations.
struct DeclReader<'a> {
    path: &'a Path,
    source: &'a str,
    comments: Vec<CommentInfo>,
}

impl<'a> DeclReader<'a> {
    fn new(path: &'a Path, source: &'a str) -> Self {
        Self {
            path,
            source,
            comments: Vec::new(),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn span(node: Node) -> Span {
        Span::new(node.start_byte(), node.end_byte(), node.start_position().row + 1)
    }

    fn collect_comments(&mut self, node: Node) {
        if node.kind() == "comment" {
            let start = node.start_byte();
            let line_start = self.source[..start].rfind('\n').map_or(0, |i| i + 1);
            let whole_line = self.source[line_start..start].trim().is_empty();
            self.comments.push(CommentInfo {
                text: self.node_text(node).trim_end().to_string(),
                start,
                end: node.end_byte(),
                start_row: node.start_position().row,
                end_row: node.end_position().row,
                whole_line,
            });
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_comments(child);
        }
    }

    /// Comments starting on the last row of `node`, at or after its start.
    fn trailing_comments(&self, node: Node) -> Vec<String> {
        let row = node.end_position().row;
        self.comments
            .iter()
            .filter(|c| c.start_row == row && c.start >= node.start_byte())
            .map(|c| c.text.clone())
            .collect()
    }

    /// Span of `node` widened over comments trailing on its last row.
    fn span_with_trailing(&self, node: Node) -> Span {
        let row = node.end_position().row;
        let mut span = Self::span(node);
        for c in &self.comments {
            if c.start_row == row && c.start >= span.end {
                span.end = c.end;
            }
        }
        span
    }

    /// Span of the whole-line comment block directly above `node`.
    fn doc_span(&self, node: Node) -> Option<Span> {
        let mut expected_end_row = node.start_position().row.checked_sub(1)?;
        let mut first: Option<&CommentInfo> = None;
        let mut last: Option<&CommentInfo> = None;

        for c in self.comments.iter().rev() {
            if c.start >= node.start_byte() {
                continue;
            }
            if !c.whole_line || c.end_row != expected_end_row {
                if first.is_some() || c.end_row < expected_end_row {
                    break;
                }
                continue;
            }
            if last.is_none() {
                last = Some(c);
            }
            first = Some(c);
            match c.start_row.checked_sub(1) {
                Some(row) => expected_end_row = row,
                None => break,
            }
        }

        match (first, last) {
            (Some(f), Some(l)) => Some(Span::new(f.start, l.end, f.start_row + 1)),
            _ => None,
        }
    }

    fn read_file(&self, root: Node) -> GoenumResult<SourceFile> {
        let mut file = SourceFile {
            path: self.path.to_path_buf(),
            ..SourceFile::default()
        };

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            match child.kind() {
                "comment" => {}
                "package_clause" => {
                    file.package_clause = Self::span(child);
                    let mut c = child.walk();
                    file.package = child
                        .named_children(&mut c)
                        .find(|n| n.kind() == "package_identifier")
                        .map(|n| self.node_text(n).to_string())
                        .unwrap_or_default();
                }
                "import_declaration" => {
                    file.imports.push(self.read_imports(child));
                    file.decls.push(Decl::Other(Self::span(child)));
                }
                "type_declaration" => file.decls.push(Decl::Type(self.read_type_decl(child))),
                "const_declaration" => {
                    file.decls.push(Decl::Const(self.read_const_decl(child)?));
                }
                "method_declaration" => match self.read_method(child) {
                    Some(method) => file.decls.push(Decl::Method(method)),
                    None => file.decls.push(Decl::Other(Self::span(child))),
                },
                _ if child.is_named() => file.decls.push(Decl::Other(Self::span(child))),
                _ => {}
            }
        }

        Ok(file)
    }

    fn read_imports(&self, node: Node) -> ImportDecl {
        let mut specs = Vec::new();
        let mut grouped = false;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => specs.extend(self.read_import_spec(child)),
                "import_spec_list" => {
                    grouped = true;
                    let mut c = child.walk();
                    for spec in child.named_children(&mut c) {
                        if spec.kind() == "import_spec" {
                            specs.extend(self.read_import_spec(spec));
                        }
                    }
                }
                _ => {}
            }
        }
        ImportDecl {
            span: Self::span(node),
            grouped,
            specs,
        }
    }

    fn read_import_spec(&self, node: Node) -> Option<ImportSpec> {
        let path = node.child_by_field_name("path")?;
        Some(ImportSpec {
            name: node
                .child_by_field_name("name")
                .map(|n| self.node_text(n).to_string()),
            path: self.node_text(path).to_string(),
        })
    }

    fn read_type_decl(&self, node: Node) -> TypeDecl {
        let mut specs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "type_spec" {
                continue;
            }
            let (Some(name), Some(ty)) = (
                child.child_by_field_name("name"),
                child.child_by_field_name("type"),
            ) else {
                continue;
            };
            specs.push(TypeSpec {
                name: self.node_text(name).to_string(),
                underlying: self.node_text(ty).trim().to_string(),
                span: Self::span(child),
                comments: self.trailing_comments(child),
            });
        }
        TypeDecl {
            span: Self::span(node),
            specs,
        }
    }

    fn read_const_decl(&self, node: Node) -> GoenumResult<ConstDecl> {
        let mut specs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "const_spec" {
                specs.push(self.read_value_spec(child)?);
            }
        }
        Ok(ConstDecl {
            span: self.span_with_trailing(node),
            specs,
        })
    }

    fn read_value_spec(&self, node: Node) -> GoenumResult<ValueSpec> {
        let mut cursor = node.walk();
        let names: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .filter(|n| n.kind() == "identifier")
            .map(|n| self.node_text(n).to_string())
            .collect();

        let type_expr = node
            .child_by_field_name("type")
            .map(|n| self.node_text(n).trim().to_string());

        let mut values = Vec::new();
        if let Some(list) = node.child_by_field_name("value") {
            let mut c = list.walk();
            values.extend(
                list.named_children(&mut c)
                    .filter(|n| n.kind() != "comment")
                    .map(|n| self.node_text(n).trim().to_string()),
            );
        }

        if type_expr.is_some() && values.len() < names.len() {
            let pos = node.start_position();
            return Err(GoenumError::parse_at(
                self.path,
                format!("typed constant {} without value", names.join(", ")),
                pos.row + 1,
                pos.column + 1,
            ));
        }

        Ok(ValueSpec {
            names,
            type_expr,
            values,
            span: Self::span(node),
            comments: self.trailing_comments(node),
        })
    }

    fn read_method(&self, node: Node) -> Option<MethodDecl> {
        let name = node.child_by_field_name("name")?;
        let receiver = node.child_by_field_name("receiver")?;
        let mut cursor = receiver.walk();
        let param = receiver
            .named_children(&mut cursor)
            .find(|n| n.kind() == "parameter_declaration")?;
        let recv_type = param.child_by_field_name("type")?;
        let recv_name = param
            .child_by_field_name("name")
            .map(|n| self.node_text(n).to_string());

        Some(MethodDecl {
            name: self.node_text(name).to_string(),
            recv_name,
            recv_type: self.node_text(recv_type).trim().to_string(),
            span: self.span_with_trailing(node),
            doc: self.doc_span(node),
        })
    }
}
