//! Deletes trailing whitespace runs

use quill_core::cst::delete_ranges;
use quill_core::{BatchFixer, Diagnostic, Document, FixOutcome, Result};
use rowan::TextRange;

use crate::builtin::NO_TRAILING_WHITESPACE;

#[derive(Debug, Clone, Default)]
pub struct TrailingWhitespaceFix;

impl BatchFixer for TrailingWhitespaceFix {
    fn rule_id(&self) -> &'static str {
        NO_TRAILING_WHITESPACE
    }

    fn fix(&self, document: &Document, diagnostics: &[Diagnostic]) -> Result<FixOutcome> {
        let end = document.text().len();
        let fixed: Vec<Diagnostic> = diagnostics
            .iter()
            .filter(|d| d.rule_id == NO_TRAILING_WHITESPACE && !d.range.is_empty() && d.range.end() <= end)
            .cloned()
            .collect();
        if fixed.is_empty() {
            return Ok(FixOutcome::unchanged(document));
        }

        let ranges: Vec<TextRange> = fixed.iter().map(|d| d.range).collect();
        let source = delete_ranges(document.source(), &ranges);
        Ok(FixOutcome {
            document: document.with_text(source),
            fixed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::find_trailing_whitespace;
    use quill_core::Severity;
    use quill_core::cst::TriviaMap;

    fn diagnostics(document: &Document) -> Vec<Diagnostic> {
        let trivia = TriviaMap::new(document.root());
        find_trailing_whitespace(&trivia, document.text())
            .into_iter()
            .map(|range| Diagnostic::new(NO_TRAILING_WHITESPACE, Severity::Warning, "", range))
            .collect()
    }

    #[test]
    fn strips_every_run_in_one_pass() {
        let document = Document::parse("a.cs", "a;  \n/* x \n y */\t\n#region R \nb; // c  \r\n");
        let found = diagnostics(&document);
        assert_eq!(found.len(), 5);

        let outcome = TrailingWhitespaceFix.fix(&document, &found).unwrap();
        assert_eq!(
            outcome.document.source(),
            "a;\n/* x\n y */\n#region R\nb; // c\r\n"
        );
        assert_eq!(outcome.fixed.len(), 5);
        assert!(diagnostics(&outcome.document).is_empty());
    }

    #[test]
    fn nothing_to_fix_returns_the_input() {
        let document = Document::parse("a.cs", "a;\n");
        let outcome = TrailingWhitespaceFix.fix(&document, &[]).unwrap();
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.document.source(), "a;\n");
    }
}
