//! Preprocessor-style directive markers and their balanced groups
//!
//! Directive lines live in trivia. [`DirectiveGroups`] walks a tree once and
//! pairs markers the way a preprocessor would: every `#region` with the
//! `#endregion` that closes it, every `#if` with its `#elif`/`#else`
//! branches and `#endif`. Groups nest but never interleave. Markers that
//! cannot be paired (an input defect) end up in singleton groups.

use rowan::TextRange;

use super::{QuillSyntaxKind, QuillSyntaxNode, QuillSyntaxToken};

/// The directive named after `#`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    If,
    Elif,
    Else,
    EndIf,
    Region,
    EndRegion,
    Define,
    Undef,
    Warning,
    Error,
    Line,
    Pragma,
    Nullable,
    Unknown,
}

impl DirectiveKind {
    /// Classify a directive line such as `#region Foo` or `#  endif`
    pub fn from_text(text: &str) -> Self {
        let name = text
            .trim_start()
            .strip_prefix('#')
            .unwrap_or(text)
            .trim_start()
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or("");
        match name {
            "if" => Self::If,
            "elif" => Self::Elif,
            "else" => Self::Else,
            "endif" => Self::EndIf,
            "region" => Self::Region,
            "endregion" => Self::EndRegion,
            "define" => Self::Define,
            "undef" => Self::Undef,
            "warning" => Self::Warning,
            "error" => Self::Error,
            "line" => Self::Line,
            "pragma" => Self::Pragma,
            "nullable" => Self::Nullable,
            _ => Self::Unknown,
        }
    }

    pub fn is_region_marker(self) -> bool {
        matches!(self, Self::Region | Self::EndRegion)
    }

    pub fn is_conditional(self) -> bool {
        matches!(self, Self::If | Self::Elif | Self::Else | Self::EndIf)
    }
}

/// A directive trivia token with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMarker {
    pub kind: DirectiveKind,
    pub token: QuillSyntaxToken,
    group: Option<usize>,
}

impl DirectiveMarker {
    pub fn range(&self) -> TextRange {
        self.token.text_range()
    }
}

/// All directive markers of a tree, grouped into balanced sets
#[derive(Debug, Clone, Default)]
pub struct DirectiveGroups {
    markers: Vec<DirectiveMarker>,
    groups: Vec<Vec<usize>>,
}

impl DirectiveGroups {
    pub fn new(root: &QuillSyntaxNode) -> Self {
        let mut markers = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut open_regions: Vec<usize> = Vec::new();
        let mut open_conditionals: Vec<usize> = Vec::new();

        let directives = root
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| token.kind() == QuillSyntaxKind::Directive);

        for token in directives {
            let kind = DirectiveKind::from_text(token.text());
            let index = markers.len();
            let group = match kind {
                DirectiveKind::Region => {
                    groups.push(vec![index]);
                    open_regions.push(groups.len() - 1);
                    Some(groups.len() - 1)
                }
                DirectiveKind::If => {
                    groups.push(vec![index]);
                    open_conditionals.push(groups.len() - 1);
                    Some(groups.len() - 1)
                }
                DirectiveKind::EndRegion => open_regions.pop(),
                DirectiveKind::Elif | DirectiveKind::Else => open_conditionals.last().copied(),
                DirectiveKind::EndIf => open_conditionals.pop(),
                _ => None,
            };

            if let Some(group) = group
                && !matches!(kind, DirectiveKind::Region | DirectiveKind::If)
            {
                groups[group].push(index);
            }
            markers.push(DirectiveMarker { kind, token, group });
        }

        Self { markers, groups }
    }

    pub fn markers(&self) -> &[DirectiveMarker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The marker whose token span equals `range`
    pub fn marker_at(&self, range: TextRange) -> Option<&DirectiveMarker> {
        self.markers.iter().find(|marker| marker.range() == range)
    }

    /// The balanced group `marker` belongs to, in document order (the marker itself included)
    pub fn related(&self, marker: &DirectiveMarker) -> Vec<&DirectiveMarker> {
        match marker.group {
            Some(group) => self.groups[group]
                .iter()
                .map(|&index| &self.markers[index])
                .collect(),
            None => self
                .markers
                .iter()
                .filter(|candidate| candidate.range() == marker.range())
                .collect(),
        }
    }

    /// [`related`](Self::related), widened for a balanced region pair to
    /// every region marker between its `#region` and `#endregion`
    ///
    /// Region markers nest strictly, so the markers in between always form
    /// complete groups of their own.
    pub fn with_nested(&self, marker: &DirectiveMarker) -> Vec<&DirectiveMarker> {
        let group = self.related(marker);
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            return group;
        };
        if first.kind != DirectiveKind::Region || last.kind != DirectiveKind::EndRegion {
            return group;
        }
        let extent = TextRange::new(first.range().start(), last.range().end());
        self.markers
            .iter()
            .filter(|candidate| {
                candidate.kind.is_region_marker() && extent.contains_range(candidate.range())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_source;

    fn texts(markers: &[&DirectiveMarker]) -> Vec<String> {
        markers.iter().map(|m| m.token.text().to_string()).collect()
    }

    #[test]
    fn classifies_directive_names() {
        assert_eq!(DirectiveKind::from_text("#region Fields"), DirectiveKind::Region);
        assert_eq!(DirectiveKind::from_text("#  endregion"), DirectiveKind::EndRegion);
        assert_eq!(DirectiveKind::from_text("#if DEBUG"), DirectiveKind::If);
        assert_eq!(DirectiveKind::from_text("#pragma warning disable"), DirectiveKind::Pragma);
        assert_eq!(DirectiveKind::from_text("#bogus"), DirectiveKind::Unknown);
    }

    #[test]
    fn nested_regions_pair_inside_out() {
        let source = "#region Outer\n#region Inner\nint x;\n#endregion Inner\n#endregion Outer\n";
        let (root, _) = parse_source(source);
        let groups = DirectiveGroups::new(&root);
        assert_eq!(groups.markers().len(), 4);

        let outer = &groups.markers()[0];
        assert_eq!(
            texts(&groups.related(outer)),
            vec!["#region Outer", "#endregion Outer"]
        );
        let inner_end = &groups.markers()[2];
        assert_eq!(
            texts(&groups.related(inner_end)),
            vec!["#region Inner", "#endregion Inner"]
        );
    }

    #[test]
    fn region_pair_widens_to_nested_groups() {
        let source = "#region Outer\n#region Inner\n#if X\n#endif\n#endregion Inner\n#endregion Outer\n#region Next\n#endregion\n";
        let (root, _) = parse_source(source);
        let groups = DirectiveGroups::new(&root);

        let outer = &groups.markers()[0];
        assert_eq!(
            texts(&groups.with_nested(outer)),
            vec!["#region Outer", "#region Inner", "#endregion Inner", "#endregion Outer"]
        );
        let inner = &groups.markers()[1];
        assert_eq!(
            texts(&groups.with_nested(inner)),
            vec!["#region Inner", "#endregion Inner"]
        );
        let endif = &groups.markers()[3];
        assert_eq!(texts(&groups.with_nested(endif)), vec!["#if X", "#endif"]);
    }

    #[test]
    fn unmatched_region_does_not_widen() {
        let (root, _) = parse_source("#region Open\n#region Inner\n#endregion\n");
        let groups = DirectiveGroups::new(&root);
        assert_eq!(texts(&groups.with_nested(&groups.markers()[0])), vec!["#region Open"]);
    }

    #[test]
    fn conditional_chain_is_one_group() {
        let source = "#if A\na();\n#elif B\nb();\n#else\nc();\n#endif\n";
        let (root, _) = parse_source(source);
        let groups = DirectiveGroups::new(&root);
        let else_marker = &groups.markers()[2];
        assert_eq!(else_marker.kind, DirectiveKind::Else);
        assert_eq!(groups.related(else_marker).len(), 4);
    }

    #[test]
    fn unbalanced_markers_are_singletons() {
        let (root, _) = parse_source("#endregion\n#region Open\n");
        let groups = DirectiveGroups::new(&root);
        for marker in groups.markers() {
            assert_eq!(groups.related(marker).len(), 1);
        }
    }
}
