//! Token-attached trivia view over a Quill CST
//!
//! In the rowan tree trivia are ordinary tokens interleaved with significant
//! ones. Rules reason about trivia the way a token sees it, so
//! [`TriviaMap`] regroups them into per-token lists:
//!
//! - **Trailing trivia**: everything after a token up to and including the
//!   first line break
//! - **Leading trivia**: everything else before the next significant token
//!
//! Trivia after the last token belong to the zero-width `Eof` token. Missing
//! (zero-width) tokens produced by error recovery never own trivia.
//!
//! # Example
//!
//! ```rust
//! use quill_core::cst::{parse_source, TriviaKind, TriviaMap};
//!
//! let (cst, _) = parse_source("x; // note\ny;");
//! let map = TriviaMap::new(&cst);
//! let first = &map.tokens()[0];
//! assert_eq!(first.token.text(), "x");
//! assert!(first.trailing.is_empty());
//! let semi = &map.tokens()[1];
//! assert_eq!(semi.trailing.len(), 3); // whitespace, comment, newline
//! assert_eq!(semi.trailing[1].kind, TriviaKind::SingleLineComment);
//! ```

use rowan::TextRange;

use super::{DirectiveKind, QuillSyntaxKind, QuillSyntaxNode, QuillSyntaxToken};

/// Closed set of trivia classifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    Whitespace,
    EndOfLine,
    SingleLineComment,
    MultiLineComment,
    DocComment,
    Directive(DirectiveKind),
    Other,
}

impl TriviaKind {
    /// Classify a trivia token; `None` for significant tokens
    pub fn of(token: &QuillSyntaxToken) -> Option<Self> {
        let kind = match token.kind() {
            QuillSyntaxKind::Whitespace => Self::Whitespace,
            QuillSyntaxKind::Newline => Self::EndOfLine,
            QuillSyntaxKind::CommentLine => Self::SingleLineComment,
            QuillSyntaxKind::CommentBlock => Self::MultiLineComment,
            QuillSyntaxKind::DocComment => Self::DocComment,
            QuillSyntaxKind::Directive => Self::Directive(DirectiveKind::from_text(token.text())),
            QuillSyntaxKind::SkippedText => Self::Other,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::SingleLineComment | Self::MultiLineComment | Self::DocComment
        )
    }
}

/// Which of its owner's lists a trivia piece lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaPosition {
    Leading,
    Trailing,
}

/// Index of a significant token inside a [`TriviaMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub usize);

/// One trivia token together with its place in its owner's trivia list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriviaPiece {
    pub kind: TriviaKind,
    pub token: QuillSyntaxToken,
    pub owner: TokenId,
    pub position: TriviaPosition,
    pub index: usize,
}

impl TriviaPiece {
    pub fn range(&self) -> TextRange {
        self.token.text_range()
    }

    pub fn text(&self) -> &str {
        self.token.text()
    }
}

/// A significant token and the trivia it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTrivia {
    pub token: QuillSyntaxToken,
    pub leading: Vec<TriviaPiece>,
    pub trailing: Vec<TriviaPiece>,
}

impl TokenTrivia {
    pub fn list(&self, position: TriviaPosition) -> &[TriviaPiece] {
        match position {
            TriviaPosition::Leading => &self.leading,
            TriviaPosition::Trailing => &self.trailing,
        }
    }
}

/// Per-token trivia lists for a whole tree, in document order
#[derive(Debug, Clone, Default)]
pub struct TriviaMap {
    tokens: Vec<TokenTrivia>,
}

impl TriviaMap {
    pub fn new(root: &QuillSyntaxNode) -> Self {
        let mut tokens: Vec<TokenTrivia> = Vec::new();
        let mut pending: Vec<(TriviaKind, QuillSyntaxToken)> = Vec::new();
        let mut collecting_trailing = false;

        for token in root
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
        {
            if let Some(kind) = TriviaKind::of(&token) {
                let owner_id = TokenId(tokens.len().saturating_sub(1));
                match tokens.last_mut() {
                    Some(owner) if collecting_trailing => {
                        owner.trailing.push(TriviaPiece {
                            kind,
                            index: owner.trailing.len(),
                            owner: owner_id,
                            position: TriviaPosition::Trailing,
                            token,
                        });
                        if kind == TriviaKind::EndOfLine {
                            collecting_trailing = false;
                        }
                    }
                    _ => pending.push((kind, token)),
                }
                continue;
            }

            if is_missing(&token) {
                continue;
            }

            let owner = TokenId(tokens.len());
            let leading = pending
                .drain(..)
                .enumerate()
                .map(|(index, (kind, token))| TriviaPiece {
                    kind,
                    token,
                    owner,
                    position: TriviaPosition::Leading,
                    index,
                })
                .collect();
            tokens.push(TokenTrivia {
                token,
                leading,
                trailing: Vec::new(),
            });
            collecting_trailing = true;
        }

        // Trees without an `Eof` token: leftovers trail the last token.
        let owner = TokenId(tokens.len().saturating_sub(1));
        if !pending.is_empty()
            && let Some(last) = tokens.last_mut()
        {
            for (kind, token) in pending {
                last.trailing.push(TriviaPiece {
                    kind,
                    index: last.trailing.len(),
                    owner,
                    position: TriviaPosition::Trailing,
                    token,
                });
            }
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[TokenTrivia] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> &TokenTrivia {
        &self.tokens[id.0]
    }

    /// The token owning `piece`
    pub fn owner(&self, piece: &TriviaPiece) -> &TokenTrivia {
        self.token(piece.owner)
    }

    /// All trivia pieces in document order
    pub fn pieces(&self) -> impl Iterator<Item = &TriviaPiece> + '_ {
        self.tokens
            .iter()
            .flat_map(|token| token.leading.iter().chain(token.trailing.iter()))
    }

    /// The piece right after `piece` in the same list, never crossing into another list
    pub fn next_in_list(&self, piece: &TriviaPiece) -> Option<&TriviaPiece> {
        self.owner(piece).list(piece.position).get(piece.index + 1)
    }

    pub fn previous_in_list(&self, piece: &TriviaPiece) -> Option<&TriviaPiece> {
        let index = piece.index.checked_sub(1)?;
        self.owner(piece).list(piece.position).get(index)
    }
}

/// Zero-width tokens inserted by error recovery (the `Eof` token is not missing)
pub fn is_missing(token: &QuillSyntaxToken) -> bool {
    token.text_range().is_empty() && token.kind() != QuillSyntaxKind::Eof
}
