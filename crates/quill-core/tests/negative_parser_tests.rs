//! Malformed input: the parser reports errors, keeps every byte and never panics

use quill_core::Document;
use quill_core::cst::{DirectiveGroups, QuillSyntaxKind, TriviaMap, is_missing, parse_source};

fn messages(source: &str) -> Vec<String> {
    let (_, errors) = parse_source(source);
    errors.into_iter().map(|e| e.message).collect()
}

#[test]
fn test_unmatched_close_brace() {
    let source = "class C { }\n}\nint x;\n";
    let (root, errors) = parse_source(source);

    assert_eq!(root.text().to_string(), source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Unmatched `}`");
    assert_eq!(u32::from(errors[0].range.start()), 12);
    assert!(
        root.descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == QuillSyntaxKind::Error)
    );
}

#[test]
fn test_missing_close_brace_is_zero_width() {
    let source = "class C\n{\n    void M() {\n";
    let (root, errors) = parse_source(source);

    assert_eq!(root.text().to_string(), source);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.message == "Expected `}`"));

    let missing: Vec<_> = root
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(is_missing)
        .collect();
    assert_eq!(missing.len(), 2);
    assert!(missing.iter().all(|t| t.kind() == QuillSyntaxKind::RBrace));
}

#[test]
fn test_unterminated_literals_and_comments() {
    assert!(messages("/* open").contains(&"Unterminated block comment".to_string()));
    assert!(messages("var s = \"open;\n").contains(&"Unterminated string literal".to_string()));
    assert!(messages("var c = 'x;\n").contains(&"Unterminated character literal".to_string()));
}

#[test]
fn test_unbalanced_directives_are_kept() {
    let source = "#endregion\nclass C\n{\n    #region Open\n}\n#endif\n";
    let document = Document::parse("a.cs", source);
    let groups = DirectiveGroups::new(document.root());

    assert_eq!(document.source(), source);
    assert_eq!(groups.markers().len(), 3);
    for marker in groups.markers() {
        assert!(!groups.related(marker).is_empty());
    }
}

#[test]
fn test_trivia_map_on_garbage_input() {
    for source in ["}}}{{{", "{ /* } */", "\"\n'\n/*", "#region\n#region\n{", "\u{feff}\r\r\n\t"] {
        let (root, _) = parse_source(source);
        assert_eq!(root.text().to_string(), source);
        let map = TriviaMap::new(&root);
        let trivia = root
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind().is_trivia())
            .count();
        assert_eq!(map.pieces().count(), trivia, "{source:?}");
    }
}
