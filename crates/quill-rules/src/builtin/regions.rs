//! `#region` rules
//!
//! Both rules report the opening `#region` marker only. The directive-removal
//! fixer expands each report to the whole balanced group.

use quill_core::cst::{DirectiveKind, DirectiveMarker, QuillSyntaxKind};
use quill_core::{
    Diagnostic, DiagnosticSink, LintRule, RuleCategory, RuleContext, RuleMetadata, Severity,
};

/// Rule ID for any use of regions
pub const NO_REGIONS: &str = "readability/no-regions";

/// Rule ID for regions inside member bodies and statement blocks
pub const NO_REGIONS_IN_ELEMENTS: &str = "readability/no-regions-in-elements";

static NO_REGIONS_METADATA: RuleMetadata = RuleMetadata {
    id: NO_REGIONS,
    name: "no-regions",
    description: "Disallow #region directives",
    category: RuleCategory::Readability,
    default_severity: Severity::Info,
    fixable: true,
    recommended: false,
};

static NO_REGIONS_IN_ELEMENTS_METADATA: RuleMetadata = RuleMetadata {
    id: NO_REGIONS_IN_ELEMENTS,
    name: "no-regions-in-elements",
    description: "Disallow #region directives inside method bodies and statement blocks",
    category: RuleCategory::Readability,
    default_severity: Severity::Warning,
    fixable: true,
    recommended: true,
};

#[derive(Debug, Default)]
pub struct NoRegions;

impl LintRule for NoRegions {
    fn metadata(&self) -> &RuleMetadata {
        &NO_REGIONS_METADATA
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut dyn DiagnosticSink) {
        for marker in region_starts(ctx) {
            sink.report(Diagnostic::new(
                NO_REGIONS,
                ctx.severity(),
                "Regions are not allowed",
                marker.range(),
            ));
        }
    }
}

#[derive(Debug, Default)]
pub struct NoRegionsInElements;

impl LintRule for NoRegionsInElements {
    fn metadata(&self) -> &RuleMetadata {
        &NO_REGIONS_IN_ELEMENTS_METADATA
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut dyn DiagnosticSink) {
        for marker in region_starts(ctx).filter(|marker| inside_element(marker)) {
            sink.report(Diagnostic::new(
                NO_REGIONS_IN_ELEMENTS,
                ctx.severity(),
                "Regions must not appear inside a member body",
                marker.range(),
            ));
        }
    }
}

fn region_starts<'c>(ctx: &'c RuleContext<'_>) -> impl Iterator<Item = &'c DirectiveMarker> + 'c {
    ctx.directives()
        .markers()
        .iter()
        .filter(|marker| marker.kind == DirectiveKind::Region)
}

fn inside_element(marker: &DirectiveMarker) -> bool {
    marker.token.parent_ancestors().any(|node| {
        matches!(
            node.kind(),
            QuillSyntaxKind::MemberBody | QuillSyntaxKind::StatementBlock
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::{DiagnosticCollector, Document};

    const SOURCE: &str = "\
#region Usings
using System;
#endregion
class C
{
    #region Fields
    int x;
    #endregion

    void M()
    {
        #region Body
        a();
        #endregion
        if (x)
        {
            #region Nested
            b();
            #endregion
        }
    }
}
";

    fn lines(rule: &dyn LintRule) -> Vec<u32> {
        let document = Document::parse("test.cs", SOURCE);
        let ctx = RuleContext::new(&document, rule.metadata().default_severity);
        let mut sink = DiagnosticCollector::new();
        rule.check(&ctx, &mut sink);
        sink.diagnostics()
            .iter()
            .map(|d| document.text().line_col(d.range.start()).line)
            .collect()
    }

    #[test]
    fn every_region_start_is_reported() {
        assert_eq!(lines(&NoRegions), vec![1, 6, 12, 17]);
    }

    #[test]
    fn only_regions_inside_bodies_are_reported() {
        assert_eq!(lines(&NoRegionsInElements), vec![12, 17]);
    }

    #[test]
    fn documents_without_directives_are_clean() {
        let document = Document::parse("test.cs", "class C { }");
        let ctx = RuleContext::new(&document, Severity::Warning);
        let mut sink = DiagnosticCollector::new();
        NoRegions.check(&ctx, &mut sink);
        assert!(sink.is_empty());
    }
}
