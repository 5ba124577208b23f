//! CST-aware lexer that preserves all trivia
//!
//! Every byte of the input ends up in exactly one token, so concatenating
//! token texts reproduces the source. Trivia produced here:
//! - `Whitespace`: runs of horizontal whitespace
//! - `Newline`: `\n`, `\r\n` or a lone `\r`
//! - `CommentLine`: `// ...` up to (not including) the line break
//! - `CommentBlock`: `/* ... */`, may span lines
//! - `DocComment`: `/** ... */`, or consecutive `///` lines merged into one token
//! - `Directive`: a `#...` line (only when `#` is the first non-blank character),
//!   up to (not including) the line break
//! - `SkippedText`: a leading byte order mark

use crate::cst::QuillSyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: QuillSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: QuillSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// The returned stream always ends with a zero-width `Eof` token.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;
    // True while only horizontal whitespace has been seen on the current line
    let mut at_line_start = true;

    if input.starts_with('\u{FEFF}') {
        let end = '\u{FEFF}'.len_utf8();
        tokens.push(CstToken::new(
            QuillSyntaxKind::SkippedText,
            &input[..end],
            span(0, end),
        ));
        i = end;
    }

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        match current {
            '\n' | '\r' => {
                let end = line_break_end(input, start).unwrap_or(start + size);
                tokens.push(CstToken::new(
                    QuillSyntaxKind::Newline,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                at_line_start = true;
                continue;
            }

            c if is_horizontal_whitespace(c) => {
                let end = skip_horizontal_whitespace(input, start);
                tokens.push(CstToken::new(
                    QuillSyntaxKind::Whitespace,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
                continue;
            }

            '#' if at_line_start => {
                let end = line_content_end(input, start);
                tokens.push(CstToken::new(
                    QuillSyntaxKind::Directive,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            '/' if input[start..].starts_with("//") => {
                let (kind, end) = if is_doc_line(input, start) {
                    (QuillSyntaxKind::DocComment, doc_run_end(input, start))
                } else {
                    (QuillSyntaxKind::CommentLine, line_content_end(input, start))
                };
                tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
                i = end;
            }

            '/' if input[start..].starts_with("/*") => {
                let kind = if input[start..].starts_with("/**") && !input[start..].starts_with("/**/")
                {
                    QuillSyntaxKind::DocComment
                } else {
                    QuillSyntaxKind::CommentBlock
                };
                let end = match input[start + 2..].find("*/") {
                    Some(rel) => start + 2 + rel + 2,
                    None => {
                        errors.push(LexerError::new(
                            "Unterminated block comment",
                            span(start, len),
                        ));
                        len
                    }
                };
                tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
                i = end;
            }

            '"' => {
                let (end, error) = lex_string(input, start, start + size, false);
                errors.extend(error);
                tokens.push(CstToken::new(
                    QuillSyntaxKind::String,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            '@' | '$' if string_prefix_len(input, start).is_some() => {
                let prefix = string_prefix_len(input, start).unwrap_or(1);
                let verbatim = input[start..start + prefix].contains('@');
                let (end, error) = lex_string(input, start, start + prefix + 1, verbatim);
                errors.extend(error);
                tokens.push(CstToken::new(
                    QuillSyntaxKind::String,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            '\'' => {
                let (end, error) = lex_char(input, start);
                errors.extend(error);
                tokens.push(CstToken::new(
                    QuillSyntaxKind::Char,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            c if c.is_ascii_digit() => {
                let end = lex_number(input, start);
                tokens.push(CstToken::new(
                    QuillSyntaxKind::Number,
                    &input[start..end],
                    span(start, end),
                ));
                i = end;
            }

            c if c.is_alphabetic() || c == '_' || c == '@' => {
                let end = lex_word(input, start + size);
                let text = &input[start..end];
                let kind = QuillSyntaxKind::from_keyword(text).unwrap_or(QuillSyntaxKind::Ident);
                tokens.push(CstToken::new(kind, text, span(start, end)));
                i = end;
            }

            _ => {
                let kind = match current {
                    '{' => QuillSyntaxKind::LBrace,
                    '}' => QuillSyntaxKind::RBrace,
                    '(' => QuillSyntaxKind::LParen,
                    ')' => QuillSyntaxKind::RParen,
                    '[' => QuillSyntaxKind::LBracket,
                    ']' => QuillSyntaxKind::RBracket,
                    ';' => QuillSyntaxKind::Semicolon,
                    ',' => QuillSyntaxKind::Comma,
                    c if c.is_ascii_punctuation() => QuillSyntaxKind::Punct,
                    _ => {
                        errors.push(LexerError::new(
                            format!("Unexpected character '{current}'"),
                            span(start, start + size),
                        ));
                        QuillSyntaxKind::Unknown
                    }
                };
                tokens.push(CstToken::new(
                    kind,
                    &input[start..start + size],
                    span(start, start + size),
                ));
                i += size;
            }
        }

        at_line_start = false;
    }

    tokens.push(CstToken::new(QuillSyntaxKind::Eof, "", span(len, len)));
    (tokens, errors)
}

/// Horizontal whitespace: any Unicode whitespace that is not a line break
pub fn is_horizontal_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\n' && c != '\r'
}

fn skip_horizontal_whitespace(input: &str, start: usize) -> usize {
    input[start..]
        .char_indices()
        .find(|&(_, c)| !is_horizontal_whitespace(c))
        .map_or(input.len(), |(rel, _)| start + rel)
}

/// End of the current line's content (position of the next line break or EOF)
fn line_content_end(input: &str, start: usize) -> usize {
    input[start..]
        .find(['\n', '\r'])
        .map_or(input.len(), |rel| start + rel)
}

/// End of a line break starting at `pos`, if there is one
fn line_break_end(input: &str, pos: usize) -> Option<usize> {
    let rest = &input[pos..];
    if rest.starts_with("\r\n") {
        Some(pos + 2)
    } else if rest.starts_with('\n') || rest.starts_with('\r') {
        Some(pos + 1)
    } else {
        None
    }
}

/// `///` but not `////`
fn is_doc_line(input: &str, pos: usize) -> bool {
    let rest = &input[pos..];
    rest.starts_with("///") && !rest.starts_with("////")
}

/// Consecutive `///` lines (each optionally indented) form one documentation comment.
/// The run ends before the line break that follows its last line.
fn doc_run_end(input: &str, start: usize) -> usize {
    let mut end = line_content_end(input, start);
    loop {
        let Some(after_break) = line_break_end(input, end) else {
            return end;
        };
        let next_content = skip_horizontal_whitespace(input, after_break);
        if !is_doc_line(input, next_content) {
            return end;
        }
        end = line_content_end(input, next_content);
    }
}

/// Length of an `@`, `$`, `$@` or `@$` prefix directly followed by `"`
fn string_prefix_len(input: &str, start: usize) -> Option<usize> {
    let rest = &input[start..];
    ["$@\"", "@$\"", "@\"", "$\""]
        .iter()
        .find(|prefix| rest.starts_with(*prefix))
        .map(|prefix| prefix.len() - 1)
}

/// Lex a string whose opening quote ends at `body_start`
fn lex_string(
    input: &str,
    start: usize,
    body_start: usize,
    verbatim: bool,
) -> (usize, Option<LexerError>) {
    let mut i = body_start;
    while let Some((c, size)) = next_char(input, i) {
        match c {
            '"' if verbatim && input[i + size..].starts_with('"') => i += 2 * size,
            '"' => return (i + size, None),
            '\\' if !verbatim => {
                i += size;
                if let Some((_, escaped)) = next_char(input, i) {
                    i += escaped;
                }
            }
            '\n' | '\r' if !verbatim => break,
            _ => i += size,
        }
    }
    (
        i,
        Some(LexerError::new("Unterminated string literal", span(start, i))),
    )
}

fn lex_char(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let mut i = start + 1;
    while let Some((c, size)) = next_char(input, i) {
        match c {
            '\'' => return (i + size, None),
            '\\' => {
                i += size;
                if let Some((_, escaped)) = next_char(input, i) {
                    i += escaped;
                }
            }
            '\n' | '\r' => break,
            _ => i += size,
        }
    }
    (
        i,
        Some(LexerError::new("Unterminated character literal", span(start, i))),
    )
}

fn lex_number(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        let continues = b.is_ascii_alphanumeric()
            || b == b'_'
            || (b == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit));
        if !continues {
            break;
        }
        i += 1;
    }
    i
}

fn lex_word(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(input.len(), |(rel, _)| from + rel)
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

fn span(start: usize, end: usize) -> CstSpan {
    start..end
}
