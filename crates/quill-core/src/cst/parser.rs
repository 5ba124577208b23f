//! Structural parser for brace-delimited sources
//!
//! The parser only recovers the structure the rules need: a `Root` holding
//! `Member` nodes, where a member is a statement or declaration ending at a
//! top-level `;`, at a separating `,` (enum and initializer bodies), or after
//! its trailing body block. Every `{ ... }` becomes a block node whose kind
//! is derived from the member header:
//!
//! ```text
//! namespace N {            -> NamespaceBody
//!   enum E { A, B }        -> EnumBody (two comma-separated members)
//!   class C {              -> TypeBody
//!     void M() {           -> MemberBody
//!       if (x) { }         -> StatementBlock
//!       var p = new P { }; -> InitializerBody
//! ```
//!
//! Trivia never opens a node: it is flushed into the enclosing node before a
//! member starts, so every `Member` begins with a significant token. A
//! missing `}` is recorded as a zero-width `RBrace` token.

use rowan::{TextRange, TextSize};

use super::{CstBuilder, CstToken, QuillSyntaxKind, QuillSyntaxNode};

/// A lexer or parser error with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {:?}", self.message, self.range)
    }
}

/// Parse source text into a lossless CST
///
/// # Example
///
/// ```rust
/// use quill_core::cst::parse_source;
///
/// let source = "enum E\n{\n    A,\n}\n";
/// let (cst, errors) = parse_source(source);
/// assert!(errors.is_empty());
/// assert_eq!(cst.text().to_string(), source);
/// ```
pub fn parse_source(source: &str) -> (QuillSyntaxNode, Vec<SyntaxError>) {
    let (tokens, lexer_errors) = super::lex_with_trivia(source);
    let mut errors: Vec<SyntaxError> = lexer_errors
        .into_iter()
        .map(|err| SyntaxError::new(err.message, to_range(&err.span)))
        .collect();

    let mut parser = Parser::new(&tokens);
    parser.parse_root();
    errors.extend(parser.errors);
    (parser.builder.finish(), errors)
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: CstBuilder,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn parse_root(&mut self) {
        self.builder.start_node(QuillSyntaxKind::Root);
        self.parse_members(QuillSyntaxKind::Root);
        self.bump_trivia();
        if self.current().is_some_and(|t| t.kind == QuillSyntaxKind::Eof) {
            self.bump();
        } else {
            self.builder.token(QuillSyntaxKind::Eof, "");
        }
        self.builder.finish_node();
    }

    /// Parse members until the closing brace of `container` (or EOF)
    fn parse_members(&mut self, container: QuillSyntaxKind) {
        loop {
            self.bump_trivia();
            match self.current().map(|t| t.kind) {
                None | Some(QuillSyntaxKind::Eof) => break,
                Some(QuillSyntaxKind::RBrace) if container != QuillSyntaxKind::Root => break,
                Some(QuillSyntaxKind::RBrace) => {
                    let range = self.current_range();
                    self.errors.push(SyntaxError::new("Unmatched `}`", range));
                    self.bump_as(QuillSyntaxKind::Error);
                }
                Some(_) => self.parse_member(container),
            }
        }
    }

    fn parse_member(&mut self, container: QuillSyntaxKind) {
        self.builder.start_node(QuillSyntaxKind::Member);

        let mut header: Vec<(QuillSyntaxKind, &'a str)> = Vec::new();
        let mut depth = 0usize;

        while let Some(kind) = self.peek_significant() {
            match kind {
                QuillSyntaxKind::Eof | QuillSyntaxKind::RBrace => break,
                QuillSyntaxKind::LBrace => {
                    self.bump_trivia();
                    let block = classify_block(&header, container);
                    self.parse_block(block);
                    header.push((QuillSyntaxKind::RBrace, "}"));
                    if depth == 0
                        && !container.is_comma_separated_block()
                        && !self.continues_after_block(&header)
                    {
                        break;
                    }
                }
                QuillSyntaxKind::Semicolon => {
                    self.bump_significant(&mut header);
                    if depth == 0 {
                        break;
                    }
                }
                QuillSyntaxKind::Comma => {
                    self.bump_significant(&mut header);
                    if depth == 0 && container.is_comma_separated_block() {
                        break;
                    }
                }
                QuillSyntaxKind::LParen | QuillSyntaxKind::LBracket => {
                    depth += 1;
                    self.bump_significant(&mut header);
                }
                QuillSyntaxKind::RParen | QuillSyntaxKind::RBracket => {
                    depth = depth.saturating_sub(1);
                    self.bump_significant(&mut header);
                }
                _ => self.bump_significant(&mut header),
            }
        }

        self.builder.finish_node(); // MEMBER
    }

    fn parse_block(&mut self, kind: QuillSyntaxKind) {
        self.builder.start_node(kind);
        self.bump(); // `{`
        self.parse_members(kind);
        self.bump_trivia();
        if self.current().is_some_and(|t| t.kind == QuillSyntaxKind::RBrace) {
            self.bump();
        } else {
            let at = self.current_range().start();
            self.errors
                .push(SyntaxError::new("Expected `}`", TextRange::empty(at)));
            self.builder.token(QuillSyntaxKind::RBrace, "");
        }
        self.builder.finish_node();
    }

    /// Whether the member goes on after one of its blocks closed
    /// (`} else {`, `} catch`, `} while (...)` of a `do`, `} = 1;`, `});`)
    fn continues_after_block(&self, header: &[(QuillSyntaxKind, &str)]) -> bool {
        let Some(next) = self.peek_significant_token() else {
            return false;
        };
        match next.kind {
            QuillSyntaxKind::Semicolon
            | QuillSyntaxKind::Comma
            | QuillSyntaxKind::RParen
            | QuillSyntaxKind::RBracket
            | QuillSyntaxKind::Punct => true,
            QuillSyntaxKind::Ident => match next.text.as_str() {
                "else" | "catch" | "finally" => true,
                "while" => header.first().is_some_and(|(_, text)| *text == "do"),
                _ => false,
            },
            _ => false,
        }
    }

    fn current(&self) -> Option<&'a CstToken> {
        self.tokens.get(self.pos)
    }

    fn current_range(&self) -> TextRange {
        self.current()
            .map(|t| to_range(&t.span))
            .unwrap_or_else(|| TextRange::empty(self.end_offset()))
    }

    fn end_offset(&self) -> TextSize {
        self.tokens
            .last()
            .map(|t| TextSize::from(t.span.end as u32))
            .unwrap_or_default()
    }

    fn peek_significant_token(&self) -> Option<&'a CstToken> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .find(|t| !t.kind.is_trivia())
    }

    fn peek_significant(&self) -> Option<QuillSyntaxKind> {
        self.peek_significant_token().map(|t| t.kind)
    }

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind, &token.text);
            self.pos += 1;
        }
    }

    fn bump_as(&mut self, kind: QuillSyntaxKind) {
        if let Some(token) = self.current() {
            self.builder.token(kind, &token.text);
            self.pos += 1;
        }
    }

    fn bump_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_trivia()) {
            self.bump();
        }
    }

    /// Flush trivia, then bump the next significant token and record it in the header
    fn bump_significant(&mut self, header: &mut Vec<(QuillSyntaxKind, &'a str)>) {
        self.bump_trivia();
        if let Some(token) = self.current() {
            header.push((token.kind, token.text.as_str()));
            self.bump();
        }
    }
}

/// Decide the block kind for a `{` following `header` inside `container`
fn classify_block(header: &[(QuillSyntaxKind, &str)], container: QuillSyntaxKind) -> QuillSyntaxKind {
    if is_initializer_header(header) {
        return QuillSyntaxKind::InitializerBody;
    }

    let declared = header
        .iter()
        .take_while(|(kind, _)| *kind != QuillSyntaxKind::LParen)
        .find_map(|(kind, _)| match kind {
            QuillSyntaxKind::NamespaceKw => Some(QuillSyntaxKind::NamespaceBody),
            QuillSyntaxKind::EnumKw => Some(QuillSyntaxKind::EnumBody),
            QuillSyntaxKind::ClassKw
            | QuillSyntaxKind::StructKw
            | QuillSyntaxKind::InterfaceKw
            | QuillSyntaxKind::RecordKw => Some(QuillSyntaxKind::TypeBody),
            _ => None,
        });
    if let Some(kind) = declared {
        return kind;
    }

    match container {
        QuillSyntaxKind::TypeBody => QuillSyntaxKind::MemberBody,
        QuillSyntaxKind::EnumBody | QuillSyntaxKind::InitializerBody => {
            QuillSyntaxKind::InitializerBody
        }
        _ => QuillSyntaxKind::StatementBlock,
    }
}

/// `x = {`, `f(a, {`, `new T {`, `new T() {`
fn is_initializer_header(header: &[(QuillSyntaxKind, &str)]) -> bool {
    let Some(&(last_kind, last_text)) = header.last() else {
        return false;
    };
    let trailing_operator = matches!(
        (last_kind, last_text),
        (QuillSyntaxKind::Punct, "=") | (QuillSyntaxKind::Comma, _) | (QuillSyntaxKind::LParen, _)
    );
    trailing_operator || header.iter().any(|(kind, text)| *kind == QuillSyntaxKind::Ident && *text == "new")
}

fn to_range(span: &std::ops::Range<usize>) -> TextRange {
    TextRange::new(
        TextSize::from(span.start as u32),
        TextSize::from(span.end as u32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_kinds(source: &str) -> Vec<QuillSyntaxKind> {
        let (root, _) = parse_source(source);
        root.descendants()
            .map(|n| n.kind())
            .filter(|k| k.is_block())
            .collect()
    }

    fn member_count(node: &QuillSyntaxNode) -> usize {
        node.children()
            .filter(|c| c.kind() == QuillSyntaxKind::Member)
            .count()
    }

    #[test]
    fn test_parse_is_lossless() {
        let source = "namespace N\n{\n    /// doc\n    public class C {\n        #region R\n        void M() { if (a) { b(); } else { c(); } }\n        #endregion\n    }\n}\n";
        let (root, errors) = parse_source(source);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(root.text().to_string(), source);
        assert_eq!(root.kind(), QuillSyntaxKind::Root);
    }

    #[test]
    fn test_block_classification() {
        let source = "namespace N { enum E { A, B } class C { int[] xs = { 1, 2 }; void M() { var p = new P { X = 1 }; while (x) { } } } }";
        assert_eq!(
            block_kinds(source),
            vec![
                QuillSyntaxKind::NamespaceBody,
                QuillSyntaxKind::EnumBody,
                QuillSyntaxKind::TypeBody,
                QuillSyntaxKind::InitializerBody,
                QuillSyntaxKind::MemberBody,
                QuillSyntaxKind::InitializerBody,
                QuillSyntaxKind::StatementBlock,
            ]
        );
    }

    #[test]
    fn test_enum_members_split_on_commas() {
        let (root, _) = parse_source("enum E { A = F(1, 2), B, C, }");
        let body = root
            .descendants()
            .find(|n| n.kind() == QuillSyntaxKind::EnumBody)
            .unwrap();
        assert_eq!(member_count(&body), 3);
    }

    #[test]
    fn test_statement_members() {
        let (root, _) = parse_source(
            "void M() { for (int i = 0; i < n; i++) { a(); } if (x) { } else { } do { } while (y); z(); }",
        );
        let body = root
            .descendants()
            .find(|n| n.kind() == QuillSyntaxKind::MemberBody || n.kind() == QuillSyntaxKind::StatementBlock)
            .unwrap();
        assert_eq!(member_count(&body), 4);
    }

    #[test]
    fn test_empty_block_has_no_members() {
        let (root, _) = parse_source("class C { }");
        let body = root.descendants().find(|n| n.kind().is_block()).unwrap();
        assert_eq!(member_count(&body), 0);
    }

    #[test]
    fn test_missing_close_brace_is_zero_width() {
        let (root, errors) = parse_source("class C { void M() {");
        assert_eq!(errors.len(), 2);
        let missing: Vec<_> = root
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == QuillSyntaxKind::RBrace)
            .collect();
        assert_eq!(missing.len(), 2);
        assert!(missing.iter().all(|t| t.text_range().is_empty()));
        assert_eq!(root.text().to_string(), "class C { void M() {");
    }

    #[test]
    fn test_unmatched_close_brace_becomes_error_token() {
        let (root, errors) = parse_source("x(); }");
        assert_eq!(errors.len(), 1);
        assert!(
            root.descendants_with_tokens()
                .filter_map(|e| e.into_token())
                .any(|t| t.kind() == QuillSyntaxKind::Error && t.text() == "}")
        );
    }

    #[test]
    fn test_members_start_with_significant_tokens() {
        let (root, _) = parse_source("class C\n{\n    // c\n    int x;\n\n    int y;\n}\n");
        for member in root.descendants().filter(|n| n.kind() == QuillSyntaxKind::Member) {
            let first = member.first_token().unwrap();
            assert!(!first.kind().is_trivia(), "member starts with {first:?}");
        }
    }
}
