//! Syntax kinds for the Quill CST
//!
//! Values are grouped in numeric bands (trivia, keywords, punctuation,
//! literals, nodes) and must stay in sync with [`QuillLanguage`](super::QuillLanguage).

use serde::{Deserialize, Serialize};

/// Every token and node kind that can appear in a Quill tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum QuillSyntaxKind {
    // Trivia (0-9)
    Whitespace = 0,
    Newline = 1,
    CommentLine = 2,
    CommentBlock = 3,
    DocComment = 4,
    Directive = 5,
    SkippedText = 6,

    // Keywords that open declaration bodies (10-29)
    NamespaceKw = 10,
    ClassKw = 11,
    StructKw = 12,
    InterfaceKw = 13,
    EnumKw = 14,
    RecordKw = 15,

    // Punctuation (100-149)
    LBrace = 100,
    RBrace = 101,
    LParen = 102,
    RParen = 103,
    LBracket = 104,
    RBracket = 105,
    Semicolon = 106,
    Comma = 107,
    Punct = 108,

    // Literals & identifiers (150-199)
    Ident = 150,
    Number = 151,
    String = 152,
    Char = 153,

    // Structure nodes (200-299)
    Root = 200,
    Member = 201,
    NamespaceBody = 210,
    TypeBody = 211,
    EnumBody = 212,
    MemberBody = 213,
    StatementBlock = 214,
    InitializerBody = 215,

    // Special tokens (400+)
    Error = 400,
    Eof = 401,
    Unknown = 402,
}

impl QuillSyntaxKind {
    /// Formatting-only tokens
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::Newline
                | Self::CommentLine
                | Self::CommentBlock
                | Self::DocComment
                | Self::Directive
                | Self::SkippedText
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, Self::CommentLine | Self::CommentBlock | Self::DocComment)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::NamespaceKw
                | Self::ClassKw
                | Self::StructKw
                | Self::InterfaceKw
                | Self::EnumKw
                | Self::RecordKw
        )
    }

    /// Node kinds for `{ ... }` bodies
    pub fn is_block(self) -> bool {
        BlockKind::from_syntax(self).is_some()
    }

    /// Bodies whose members are separated by commas rather than terminated by `;`
    pub fn is_comma_separated_block(self) -> bool {
        matches!(self, Self::EnumBody | Self::InitializerBody)
    }

    /// Keyword kind for an identifier-like word
    pub fn from_keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "namespace" => Self::NamespaceKw,
            "class" => Self::ClassKw,
            "struct" => Self::StructKw,
            "interface" => Self::InterfaceKw,
            "enum" => Self::EnumKw,
            "record" => Self::RecordKw,
            _ => return None,
        };
        Some(kind)
    }
}

/// Block-bearing construct classification, one per `{ ... }` body node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Namespace,
    Type,
    Enum,
    Member,
    Statement,
    Initializer,
}

impl BlockKind {
    pub fn from_syntax(kind: QuillSyntaxKind) -> Option<Self> {
        let block = match kind {
            QuillSyntaxKind::NamespaceBody => Self::Namespace,
            QuillSyntaxKind::TypeBody => Self::Type,
            QuillSyntaxKind::EnumBody => Self::Enum,
            QuillSyntaxKind::MemberBody => Self::Member,
            QuillSyntaxKind::StatementBlock => Self::Statement,
            QuillSyntaxKind::InitializerBody => Self::Initializer,
            _ => return None,
        };
        Some(block)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Member => "member",
            Self::Statement => "statement",
            Self::Initializer => "initializer",
        }
    }
}

impl From<QuillSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: QuillSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}
