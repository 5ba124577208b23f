//! Concrete Syntax Tree (CST) for brace-delimited sources
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! Every byte of the input, whitespace, comments and directive lines
//! included, is kept in the tree, so `parse_source(s).0.text() == s`.
//!
//! ## Architecture
//!
//! - **Green tree**: immutable, position-independent storage shared between
//!   edited versions of a document
//! - **Red tree**: the [`QuillSyntaxNode`] view with parent pointers and
//!   absolute offsets, created on demand
//!
//! ## Trivia
//!
//! Trivia are plain tokens in the tree. [`TriviaMap`] regroups them into
//! the leading and trailing lists of the significant token that owns them,
//! and [`DirectiveGroups`] pairs the directive lines found in trivia.
//!
//! ## Example
//!
//! ```rust
//! use quill_core::cst::{parse_source, QuillSyntaxKind};
//!
//! let (cst, errors) = parse_source("class C { } // done\n");
//! assert!(errors.is_empty());
//!
//! let comments: Vec<_> = cst
//!     .descendants_with_tokens()
//!     .filter_map(|element| element.into_token())
//!     .filter(|token| token.kind() == QuillSyntaxKind::CommentLine)
//!     .collect();
//! assert_eq!(comments[0].text(), "// done");
//! ```

mod builder;
mod directives;
mod edit;
mod language;
mod lexer;
mod parser;
mod syntax_kind;
mod trivia;

pub use builder::CstBuilder;
pub use directives::{DirectiveGroups, DirectiveKind, DirectiveMarker};
pub use edit::{delete_ranges, remove_tokens};
pub use language::{QuillLanguage, QuillSyntaxElement, QuillSyntaxNode, QuillSyntaxToken};
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, is_horizontal_whitespace, lex_with_trivia};
pub use parser::{SyntaxError, parse_source};
pub use syntax_kind::{BlockKind, QuillSyntaxKind};
pub use trivia::{
    TokenId, TokenTrivia, TriviaKind, TriviaMap, TriviaPiece, TriviaPosition, is_missing,
};
