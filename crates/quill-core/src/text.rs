//! Read-only source text view
//!
//! [`SourceText`] wraps the document text and precomputes physical line
//! boundaries so rules can map any offset to its containing line. A line's
//! `range` never includes its line break; `end_including_break` does.
//! Recognized breaks are `\n`, `\r\n` and a lone `\r`.

use rowan::{TextRange, TextSize};
use std::sync::Arc;

/// A physical line of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    index: usize,
    range: TextRange,
    end_including_break: TextSize,
}

impl Line {
    /// Zero-based line number
    pub fn index(&self) -> usize {
        self.index
    }

    /// Span of the line content, without the line break
    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn start(&self) -> TextSize {
        self.range.start()
    }

    pub fn end(&self) -> TextSize {
        self.range.end()
    }

    /// Offset just past the line break (equal to `end()` for an unterminated last line)
    pub fn end_including_break(&self) -> TextSize {
        self.end_including_break
    }

    /// Width of the line break sequence (0, 1 or 2)
    pub fn break_len(&self) -> TextSize {
        self.end_including_break - self.range.end()
    }

    /// True if this line is the last one of a document of length `len`
    pub fn ends_document(&self, len: TextSize) -> bool {
        self.end_including_break == len
    }
}

/// One-based line/column position, used for human-facing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Immutable document text with a line index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: Arc<str>,
    lines: Vec<Line>,
}

impl SourceText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let lines = compute_lines(&text);
        Self { text, lines }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Total document length
    pub fn len(&self) -> TextSize {
        TextSize::from(self.text.len() as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of physical lines (an empty document has one empty line)
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.lines.iter().copied()
    }

    pub fn line(&self, index: usize) -> Option<Line> {
        self.lines.get(index).copied()
    }

    /// Index of the line containing `offset`
    ///
    /// Offsets inside a line break belong to the line the break terminates.
    /// Offsets at or past the end map to the last line.
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.min(self.len());
        self.lines
            .partition_point(|line| line.start() <= offset)
            .saturating_sub(1)
    }

    /// The line containing `offset`
    pub fn line_at(&self, offset: TextSize) -> Line {
        self.lines[self.line_index(offset)]
    }

    /// Character starting at `offset`, if `offset` is a char boundary inside the text
    pub fn char_at(&self, offset: TextSize) -> Option<char> {
        let offset = usize::from(offset);
        self.text.get(offset..)?.chars().next()
    }

    /// Text covered by `range`, or an empty string for an invalid range
    pub fn slice(&self, range: TextRange) -> &str {
        self.text
            .get(usize::from(range.start())..usize::from(range.end()))
            .unwrap_or("")
    }

    /// One-based line and column (columns count characters)
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self.line_at(offset);
        let prefix = self.slice(TextRange::new(line.start(), offset.min(line.end_including_break)));
        LineCol {
            line: line.index() as u32 + 1,
            column: prefix.chars().count() as u32 + 1,
        }
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

fn compute_lines(text: &str) -> Vec<Line> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let break_len = match bytes[i] {
            b'\n' => 1,
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
            b'\r' => 1,
            _ => {
                i += 1;
                continue;
            }
        };
        lines.push(Line {
            index: lines.len(),
            range: TextRange::new(to_size(start), to_size(i)),
            end_including_break: to_size(i + break_len),
        });
        i += break_len;
        start = i;
    }

    lines.push(Line {
        index: lines.len(),
        range: TextRange::new(to_size(start), to_size(bytes.len())),
        end_including_break: to_size(bytes.len()),
    });
    lines
}

fn to_size(offset: usize) -> TextSize {
    TextSize::from(offset as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: u32) -> TextSize {
        TextSize::from(n)
    }

    #[test]
    fn empty_document_has_one_line() {
        let text = SourceText::new("");
        assert_eq!(text.line_count(), 1);
        let line = text.line_at(size(0));
        assert!(line.ends_document(text.len()));
        assert_eq!(line.range(), TextRange::empty(size(0)));
    }

    #[test]
    fn mixed_line_breaks() {
        let text = SourceText::new("ab\r\ncd\ref\n");
        assert_eq!(text.line_count(), 4);

        let first = text.line(0).unwrap();
        assert_eq!(first.range(), TextRange::new(size(0), size(2)));
        assert_eq!(first.end_including_break(), size(4));
        assert_eq!(first.break_len(), size(2));

        let second = text.line(1).unwrap();
        assert_eq!(second.range(), TextRange::new(size(4), size(6)));
        assert_eq!(second.end_including_break(), size(7));

        let last = text.line(3).unwrap();
        assert!(last.range().is_empty());
        assert!(last.ends_document(text.len()));
    }

    #[test]
    fn offsets_inside_break_belong_to_terminated_line() {
        let text = SourceText::new("ab\r\ncd");
        assert_eq!(text.line_index(size(2)), 0);
        assert_eq!(text.line_index(size(3)), 0);
        assert_eq!(text.line_index(size(4)), 1);
        assert_eq!(text.line_index(size(100)), 1);
    }

    #[test]
    fn unterminated_last_line_ends_document() {
        let text = SourceText::new("a\nlast");
        let last = text.line_at(size(3));
        assert_eq!(last.index(), 1);
        assert_eq!(last.end_including_break(), last.end());
        assert!(last.ends_document(text.len()));
        assert!(!text.line(0).unwrap().ends_document(text.len()));
    }

    #[test]
    fn char_access_and_line_col() {
        let text = SourceText::new("x = 1;\n  é;");
        assert_eq!(text.char_at(size(0)), Some('x'));
        assert_eq!(text.char_at(size(9)), Some('é'));
        assert_eq!(text.char_at(size(10)), None);
        assert_eq!(text.line_col(size(9)), LineCol { line: 2, column: 3 });
        assert_eq!(text.line_col(size(11)).to_string(), "2:4");
    }
}
