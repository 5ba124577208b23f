//! Rowan language implementation for Quill
//!
//! This module implements the `rowan::Language` trait, which connects
//! our QuillSyntaxKind enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::QuillSyntaxKind;

/// Language marker for Quill trees
///
/// This is a zero-sized type that implements `rowan::Language` to provide
/// the connection between our syntax kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuillLanguage;

impl Language for QuillLanguage {
    type Kind = QuillSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => QuillSyntaxKind::Whitespace,
            1 => QuillSyntaxKind::Newline,
            2 => QuillSyntaxKind::CommentLine,
            3 => QuillSyntaxKind::CommentBlock,
            4 => QuillSyntaxKind::DocComment,
            5 => QuillSyntaxKind::Directive,
            6 => QuillSyntaxKind::SkippedText,

            // Keywords
            10 => QuillSyntaxKind::NamespaceKw,
            11 => QuillSyntaxKind::ClassKw,
            12 => QuillSyntaxKind::StructKw,
            13 => QuillSyntaxKind::InterfaceKw,
            14 => QuillSyntaxKind::EnumKw,
            15 => QuillSyntaxKind::RecordKw,

            // Punctuation
            100 => QuillSyntaxKind::LBrace,
            101 => QuillSyntaxKind::RBrace,
            102 => QuillSyntaxKind::LParen,
            103 => QuillSyntaxKind::RParen,
            104 => QuillSyntaxKind::LBracket,
            105 => QuillSyntaxKind::RBracket,
            106 => QuillSyntaxKind::Semicolon,
            107 => QuillSyntaxKind::Comma,
            108 => QuillSyntaxKind::Punct,

            // Literals & identifiers
            150 => QuillSyntaxKind::Ident,
            151 => QuillSyntaxKind::Number,
            152 => QuillSyntaxKind::String,
            153 => QuillSyntaxKind::Char,

            // Structure nodes
            200 => QuillSyntaxKind::Root,
            201 => QuillSyntaxKind::Member,
            210 => QuillSyntaxKind::NamespaceBody,
            211 => QuillSyntaxKind::TypeBody,
            212 => QuillSyntaxKind::EnumBody,
            213 => QuillSyntaxKind::MemberBody,
            214 => QuillSyntaxKind::StatementBlock,
            215 => QuillSyntaxKind::InitializerBody,

            // Special tokens
            400 => QuillSyntaxKind::Error,
            401 => QuillSyntaxKind::Eof,

            _ => QuillSyntaxKind::Unknown,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// Red tree node
pub type QuillSyntaxNode = rowan::SyntaxNode<QuillLanguage>;
/// Red tree token
pub type QuillSyntaxToken = rowan::SyntaxToken<QuillLanguage>;
/// Node or token
pub type QuillSyntaxElement = rowan::SyntaxElement<QuillLanguage>;
