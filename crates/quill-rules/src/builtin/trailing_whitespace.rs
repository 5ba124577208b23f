//! Trailing whitespace detection
//!
//! Trailing whitespace can hide in several trivia kinds: plain whitespace
//! before a line break, the end of a `//` comment, any line of a block or
//! documentation comment, and the end of a directive line. Each trivia piece
//! is examined once and only its own span is scanned, so no run is ever
//! reported twice.

use quill_core::cst::{TriviaKind, TriviaMap, TriviaPiece, is_horizontal_whitespace};
use quill_core::{
    Diagnostic, DiagnosticSink, LintRule, RuleCategory, RuleContext, RuleMetadata, Severity,
    SourceText,
};
use rowan::{TextRange, TextSize};

/// Rule ID for trailing whitespace
pub const NO_TRAILING_WHITESPACE: &str = "style/no-trailing-whitespace";

static METADATA: RuleMetadata = RuleMetadata {
    id: NO_TRAILING_WHITESPACE,
    name: "no-trailing-whitespace",
    description: "Disallow whitespace at the end of a line, including inside comments and directive lines",
    category: RuleCategory::Style,
    default_severity: Severity::Warning,
    fixable: true,
    recommended: true,
};

#[derive(Debug, Default)]
pub struct TrailingWhitespace;

impl LintRule for TrailingWhitespace {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut dyn DiagnosticSink) {
        let text = ctx.document().text();
        for range in find_trailing_whitespace(ctx.trivia(), text) {
            sink.report(Diagnostic::new(
                NO_TRAILING_WHITESPACE,
                ctx.severity(),
                "Trailing whitespace is not allowed",
                range,
            ));
        }
    }
}

/// Spans of every trailing whitespace run, in document order
pub fn find_trailing_whitespace(trivia: &TriviaMap, text: &SourceText) -> Vec<TextRange> {
    let mut runs = Vec::new();
    for piece in trivia.pieces() {
        scan_piece(trivia, piece, text, &mut runs);
    }
    runs
}

fn scan_piece(trivia: &TriviaMap, piece: &TriviaPiece, text: &SourceText, runs: &mut Vec<TextRange>) {
    match piece.kind {
        TriviaKind::Whitespace => {
            let before_line_break = trivia
                .next_in_list(piece)
                .is_some_and(|next| next.kind == TriviaKind::EndOfLine);
            if before_line_break {
                runs.push(piece.range());
            }
        }
        TriviaKind::SingleLineComment | TriviaKind::Directive(_) => {
            runs.extend(terminal_run(text, piece.range()));
        }
        TriviaKind::MultiLineComment | TriviaKind::DocComment => {
            scan_lines(text, piece.range(), runs);
        }
        TriviaKind::EndOfLine | TriviaKind::Other => {}
    }
}

/// Apply the terminal-run scan to each physical line a multi-line span touches
fn scan_lines(text: &SourceText, span: TextRange, runs: &mut Vec<TextRange>) {
    let len = text.len();
    let mut line = text.line_at(span.start());
    loop {
        if let Some(window) = line.range().intersect(span) {
            runs.extend(terminal_run(text, window));
        }
        if line.ends_document(len) {
            break;
        }
        let next = text.line_at(line.end_including_break());
        if next.index() <= line.index() || next.start() >= span.end() {
            break;
        }
        line = next;
    }
}

/// The run of horizontal whitespace ending exactly at `window.end()`, if any
fn terminal_run(text: &SourceText, window: TextRange) -> Option<TextRange> {
    let content = text.slice(window);
    let kept = content.trim_end_matches(is_horizontal_whitespace).len();
    let start = window.start() + TextSize::from(kept as u32);
    let run = TextRange::new(start, window.end());
    (!run.is_empty()).then_some(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Document;

    fn runs(source: &str) -> Vec<String> {
        let document = Document::parse("test.cs", source);
        let trivia = TriviaMap::new(document.root());
        find_trailing_whitespace(&trivia, document.text())
            .into_iter()
            .map(|range| {
                let location = document.text().line_col(range.start());
                format!("{location} len={}", u32::from(range.len()))
            })
            .collect()
    }

    #[test]
    fn clean_document_has_no_runs() {
        let source = "class C\n{\n    // ok\n    /* ok\n       ok */\n    int x; /* pad */ int y;\n}\n";
        assert!(runs(source).is_empty());
    }

    #[test]
    fn whitespace_before_line_break() {
        assert_eq!(runs("int x;   \nint y;\n"), vec!["1:7 len=3"]);
    }

    #[test]
    fn whitespace_on_blank_lines_and_crlf() {
        assert_eq!(runs("a;\r\n  \t\r\nb;\r\n"), vec!["2:1 len=3"]);
    }

    #[test]
    fn interior_padding_is_not_trailing() {
        assert!(runs("int x;   // note\n").is_empty());
    }

    #[test]
    fn whitespace_at_end_of_file_without_line_break_is_ignored() {
        assert!(runs("int x;   ").is_empty());
    }

    #[test]
    fn single_line_comment_run_ends_at_comment_end() {
        let source = "x; // note  \t\ny;\n";
        let document = Document::parse("test.cs", source);
        let trivia = TriviaMap::new(document.root());
        let found = find_trailing_whitespace(&trivia, document.text());
        assert_eq!(found.len(), 1);
        assert_eq!(u32::from(found[0].len()), 3);
        assert_eq!(usize::from(found[0].end()), source.find('\n').unwrap());
    }

    #[test]
    fn all_blank_comment_body_is_reported() {
        assert_eq!(runs("//   \n"), vec!["1:3 len=3"]);
    }

    #[test]
    fn multi_line_comment_reports_each_offending_line() {
        let source = "/* one  \n   two\n   three \n   four */\nx;\n";
        assert_eq!(runs(source), vec!["1:7 len=2", "3:9 len=1"]);
    }

    #[test]
    fn doc_comment_lines_are_scanned() {
        let source = "/// <summary> \n    /// Text\n    /// </summary>  \nclass C { }\n";
        assert_eq!(runs(source), vec!["1:14 len=1", "3:19 len=2"]);
    }

    #[test]
    fn comment_ending_the_document_stops_the_line_walk() {
        assert_eq!(runs("/* a \n b  */"), vec!["1:5 len=1"]);
    }

    #[test]
    fn directive_lines_are_scanned_once() {
        let source = "#region Fields  \nint x;\n#endregion\n";
        assert_eq!(runs(source), vec!["1:15 len=2"]);
    }

    #[test]
    fn runs_are_in_document_order() {
        let source = "a;  \n/* x \n y */ \n#if DEBUG \n#endif\n";
        assert_eq!(
            runs(source),
            vec!["1:3 len=2", "2:5 len=1", "3:6 len=1", "4:10 len=1"]
        );
    }
}
