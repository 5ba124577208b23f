//! Structural edits on the green tree
//!
//! Fixers never splice text: they describe which tokens go away and
//! [`remove_tokens`] produces a new tree. Subtrees that contain no removed
//! token are shared with the input tree.

use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};

use super::{QuillSyntaxKind, QuillSyntaxNode};

/// Build a new tree equal to `root` minus every token whose span is in `removed`
///
/// When dropping tokens would make two word-like tokens touch (`int` and `x`
/// fusing into `intx`), a single space is inserted between them. Zero-width
/// ranges are ignored.
///
/// # Example
///
/// ```rust
/// use quill_core::cst::{parse_source, remove_tokens};
/// use rowan::{TextRange, TextSize};
///
/// let (root, _) = parse_source("a;\n#region R\nb;\n");
/// let directive = TextRange::new(TextSize::from(3), TextSize::from(12));
/// let newline = TextRange::new(TextSize::from(12), TextSize::from(13));
/// let edited = remove_tokens(&root, &[directive, newline]);
/// assert_eq!(edited.text().to_string(), "a;\nb;\n");
/// ```
pub fn remove_tokens(root: &QuillSyntaxNode, removed: &[TextRange]) -> QuillSyntaxNode {
    let mut removed: Vec<TextRange> = removed
        .iter()
        .copied()
        .filter(|range| !range.is_empty())
        .collect();
    if removed.is_empty() {
        return root.clone();
    }
    removed.sort_by_key(|range| (range.start(), range.end()));
    removed.dedup();

    let mut rebuild = Rebuild {
        removed: &removed,
        previous: None,
        gap: false,
    };
    QuillSyntaxNode::new_root(rebuild.node(root))
}

struct Rebuild<'a> {
    removed: &'a [TextRange],
    /// Last character emitted so far
    previous: Option<char>,
    /// Tokens were dropped since the last emitted token
    gap: bool,
}

impl Rebuild<'_> {
    fn node(&mut self, node: &QuillSyntaxNode) -> GreenNode {
        let mut children = Vec::new();
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(child) => {
                    if self.touches(child.text_range()) {
                        let green = self.node(&child);
                        children.push(NodeOrToken::Node(green));
                    } else {
                        let text = child.text();
                        if let Some(first) = text.char_at(TextSize::from(0)) {
                            self.separate(first, &mut children);
                            let last = child.last_token().and_then(|t| t.text().chars().last());
                            self.previous = last.or(self.previous);
                        }
                        children.push(NodeOrToken::Node(child.green().into_owned()));
                    }
                }
                NodeOrToken::Token(token) => {
                    let range = token.text_range();
                    if self
                        .removed
                        .binary_search_by_key(&(range.start(), range.end()), |r| (r.start(), r.end()))
                        .is_ok()
                    {
                        self.gap = true;
                        continue;
                    }
                    if let Some(first) = token.text().chars().next() {
                        self.separate(first, &mut children);
                        self.previous = token.text().chars().last();
                    }
                    children.push(NodeOrToken::Token(token.green().to_owned()));
                }
            }
        }
        GreenNode::new(node.kind().into(), children)
    }

    fn touches(&self, range: TextRange) -> bool {
        let first = self
            .removed
            .partition_point(|removed| removed.start() < range.start());
        self.removed
            .get(first)
            .is_some_and(|removed| range.contains_range(*removed))
    }

    fn separate(&mut self, next: char, children: &mut Vec<NodeOrToken<GreenNode, GreenToken>>) {
        if std::mem::take(&mut self.gap)
            && self.previous.is_some_and(is_word_char)
            && is_word_char(next)
        {
            children.push(NodeOrToken::Token(GreenToken::new(
                QuillSyntaxKind::Whitespace.into(),
                " ",
            )));
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Delete byte ranges from `text`, applying them from last to first
///
/// Overlapping ranges are merged first, so the result does not depend on
/// the order they are given in.
pub fn delete_ranges(text: &str, ranges: &[TextRange]) -> String {
    let mut ranges: Vec<TextRange> = ranges.to_vec();
    ranges.sort_by_key(|range| (range.start(), range.end()));

    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start() <= last.end() => *last = last.cover(range),
            _ => merged.push(range),
        }
    }

    let mut output = text.to_string();
    for range in merged.iter().rev() {
        let start = usize::from(range.start()).min(output.len());
        let end = usize::from(range.end()).min(output.len());
        output.replace_range(start..end, "");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_source;

    fn range_of(source: &str, needle: &str) -> TextRange {
        let start = source.find(needle).unwrap();
        TextRange::at(TextSize::from(start as u32), TextSize::of(needle))
    }

    #[test]
    fn untouched_subtrees_are_shared() {
        let source = "class A { int x; }\n#region R\nclass B { }\n";
        let (root, _) = parse_source(source);
        let directive = range_of(source, "#region R");
        let newline = TextRange::at(directive.end(), TextSize::from(1));
        let edited = remove_tokens(&root, &[directive, newline]);

        assert_eq!(edited.text().to_string(), "class A { int x; }\nclass B { }\n");
        let original_member = root.children().next().unwrap();
        let edited_member = edited.children().next().unwrap();
        assert_eq!(original_member.green(), edited_member.green());
    }

    #[test]
    fn fused_words_are_separated() {
        let source = "int /* x */ y;";
        let (root, _) = parse_source(source);
        let removed = [
            TextRange::at(TextSize::from(3), TextSize::from(1)),
            range_of(source, "/* x */"),
            TextRange::at(TextSize::from(11), TextSize::from(1)),
        ];
        let edited = remove_tokens(&root, &removed);
        assert_eq!(edited.text().to_string(), "int y;");
    }

    #[test]
    fn punctuation_does_not_need_separation() {
        let source = "f( /* a */ x);";
        let (root, _) = parse_source(source);
        let removed = [
            TextRange::at(TextSize::from(2), TextSize::from(1)),
            range_of(source, "/* a */"),
            TextRange::at(TextSize::from(10), TextSize::from(1)),
        ];
        let edited = remove_tokens(&root, &removed);
        assert_eq!(edited.text().to_string(), "f(x);");
    }

    #[test]
    fn no_removals_returns_same_tree() {
        let (root, _) = parse_source("a;");
        let edited = remove_tokens(&root, &[]);
        assert_eq!(edited, root);
    }

    #[test]
    fn delete_ranges_merges_overlaps() {
        let text = "abcdefgh";
        let ranges = [
            TextRange::new(TextSize::from(5), TextSize::from(7)),
            TextRange::new(TextSize::from(1), TextSize::from(3)),
            TextRange::new(TextSize::from(2), TextSize::from(4)),
        ];
        assert_eq!(delete_ranges(text, &ranges), "aeh");
    }
}
