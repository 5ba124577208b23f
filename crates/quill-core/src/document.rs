//! Parsed documents
//!
//! A [`Document`] is an immutable snapshot: source text, its line index and
//! the lossless tree. Edits never mutate a document; fixers return the next
//! version instead.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cst::{QuillSyntaxNode, SyntaxError, parse_source};
use crate::error::QuillError;
use crate::text::SourceText;
use crate::Result;

#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: SourceText,
    root: QuillSyntaxNode,
    errors: Vec<SyntaxError>,
}

impl Document {
    /// Parse `source` into a document
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let source = source.into();
        let (root, errors) = parse_source(&source);
        Self {
            path: path.into(),
            text: SourceText::new(source),
            root,
            errors,
        }
    }

    /// Wrap a tree built elsewhere; its text becomes the document text
    pub fn from_root(path: impl Into<PathBuf>, root: QuillSyntaxNode) -> Self {
        Self {
            path: path.into(),
            text: SourceText::new(root.text().to_string()),
            root,
            errors: Vec::new(),
        }
    }

    /// Read and parse a file
    pub fn load(path: &Path) -> Result<Self> {
        let source =
            fs::read_to_string(path).map_err(|source| QuillError::io_error(path, source))?;
        Ok(Self::parse(path, source))
    }

    /// The next version of this document, built from an edited tree
    pub fn with_root(&self, root: QuillSyntaxNode) -> Self {
        Self {
            errors: self.errors.clone(),
            ..Self::from_root(&self.path, root)
        }
    }

    /// The next version of this document, reparsed from edited text
    pub fn with_text(&self, source: impl Into<String>) -> Self {
        Self::parse(&self.path, source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &SourceText {
        &self.text
    }

    pub fn source(&self) -> &str {
        self.text.as_str()
    }

    pub fn root(&self) -> &QuillSyntaxNode {
        &self.root
    }

    /// Lexer and parser errors found while building the tree
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_keeps_text_and_tree_in_sync() {
        let document = Document::parse("a.cs", "class C\n{\n}\n");
        assert_eq!(document.source(), document.root().text().to_string());
        assert_eq!(document.text().line_count(), 4);
        assert!(!document.has_errors());
    }

    #[test]
    fn from_root_uses_tree_text() {
        let (root, _) = parse_source("x;\r\ny;");
        let document = Document::from_root("b.cs", root);
        assert_eq!(document.source(), "x;\r\ny;");
        assert_eq!(document.text().line_count(), 2);
    }

    #[test]
    fn load_reports_missing_files_as_io_errors() {
        let dir = TempDir::new().unwrap();
        let error = Document::load(&dir.path().join("missing.cs")).unwrap_err();
        assert_eq!(error.kind(), crate::error::ErrorKind::Io);
    }
}
