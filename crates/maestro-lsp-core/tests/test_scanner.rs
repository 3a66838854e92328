//! Scanner tests
//!
//! Covers the classification of expression content, legacy variable
//! warnings and whole-document scanning of the demo flow.

use maestro_lsp_core::{flatten_spans, scan, scan_document, ScanResult, Severity, SpanKind};
use proptest::prelude::*;

const DEMO: &str = include_str!("fixtures/demo.yaml");

fn texts<'a>(source: &'a str, result: &ScanResult, kind: SpanKind) -> Vec<&'a str> {
    result.spans_of(kind).map(|s| s.text(source)).collect()
}

#[test]
fn test_property_chain_expression() {
    let source = r#"${output.strings.add + " 1 " + output.strings.item}"#;
    let result = scan(source, 0);

    assert_eq!(
        texts(source, &result, SpanKind::Identifier),
        vec!["output.strings.add", "output.strings.item"]
    );
    assert_eq!(texts(source, &result, SpanKind::StringLiteral), vec![r#"" 1 ""#]);
    assert_eq!(texts(source, &result, SpanKind::Operator), vec!["+", "+"]);
    assert_eq!(result.spans_of(SpanKind::ExpressionBackground).count(), 1);
}

#[test]
fn test_operator_inside_string_is_ignored() {
    let source = r#"${a + "x+y" + b}"#;
    let result = scan(source, 0);

    let literal = result.spans_of(SpanKind::StringLiteral).next().unwrap();
    assert_eq!(literal.text(source), r#""x+y""#);
    let operators: Vec<_> = result.spans_of(SpanKind::Operator).collect();
    assert_eq!(operators.len(), 2);
    assert!(operators
        .iter()
        .all(|op| op.start < literal.start || op.start >= literal.end));
}

#[test]
fn test_colon_leaf_is_skipped() {
    let result = scan(":", 42);
    assert!(result.spans.is_empty());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_offsets_are_shifted_by_leaf_offset() {
    let source = "${x} $Y";
    let result = scan(source, 1000);
    let ranges: Vec<_> = result.spans.iter().map(|s| (s.start, s.end, s.kind)).collect();
    assert_eq!(
        ranges,
        vec![
            (1000, 1004, SpanKind::ExpressionBackground),
            (1002, 1003, SpanKind::Identifier),
            (1005, 1007, SpanKind::BadVariable),
        ]
    );
}

#[test]
fn test_multiple_expressions_in_one_leaf() {
    let source = "${first} and ${second == 'x'}";
    let result = scan(source, 0);
    assert_eq!(
        texts(source, &result, SpanKind::ExpressionBackground),
        vec!["${first}", "${second == 'x'}"]
    );
    assert_eq!(texts(source, &result, SpanKind::Operator), vec!["=="]);
    assert_eq!(texts(source, &result, SpanKind::StringLiteral), vec!["'x'"]);
}

#[test]
fn test_demo_flow() {
    let result = scan_document(DEMO);

    assert_eq!(result.spans_of(SpanKind::ExpressionBackground).count(), 7);
    let bad: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(
        bad,
        vec![
            "Use ${VAR1} instead of $VAR1",
            "Use ${MISSING_BRACES} instead of $MISSING_BRACES"
        ]
    );
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.severity == Severity::Warning));

    let identifiers = texts(DEMO, &result, SpanKind::Identifier);
    assert!(identifiers.contains(&"user.firstName"));
    assert!(identifiers.contains(&"count.value"));
    assert!(!identifiers.contains(&"Hello"));
    assert!(texts(DEMO, &result, SpanKind::Operator).contains(&">"));
}

#[test]
fn test_demo_flow_flattens_without_overlap() {
    let flat = flatten_spans(&scan_document(DEMO).spans);
    for pair in flat.windows(2) {
        assert!(pair[0].end <= pair[1].start, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
}

proptest! {
    #[test]
    fn prop_simple_variable_spans(
        prefix in "[a-z :]{0,10}",
        name in "[A-Za-z_][A-Za-z0-9_]{0,8}(\\.[A-Za-z_][A-Za-z0-9_]{0,8}){0,3}",
        suffix in "[a-z :]{0,10}",
    ) {
        let source = format!("{}${{{}}}{}", prefix, name, suffix);
        let result = scan(&source, 0);

        let backgrounds: Vec<_> = result.spans_of(SpanKind::ExpressionBackground).collect();
        prop_assert_eq!(backgrounds.len(), 1);
        prop_assert_eq!(backgrounds[0].text(&source), format!("${{{}}}", name));

        let identifiers: Vec<_> = result.spans_of(SpanKind::Identifier).collect();
        prop_assert_eq!(identifiers.len(), 1);
        prop_assert_eq!(identifiers[0].text(&source), name.as_str());
        prop_assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn prop_bare_variable_is_flagged(
        prefix in "[a-z ]{0,10}",
        name in "[A-Za-z0-9_]{1,12}",
        suffix in "([ ,;][a-z ]{0,5})?",
    ) {
        let source = format!("{}${}{}", prefix, name, suffix);
        let result = scan(&source, 0);

        prop_assert_eq!(result.diagnostics.len(), 1);
        prop_assert_eq!(
            &result.diagnostics[0].message,
            &format!("Use ${{{}}} instead of ${}", name, name)
        );
    }

    #[test]
    fn prop_scan_is_idempotent_and_shift_invariant(
        source in "[a-z0-9_ .${}\"'\\\\+*/<>=!&|-]{0,40}",
        offset in 0usize..10_000,
    ) {
        let first = scan(&source, offset);
        let second = scan(&source, offset);
        prop_assert_eq!(&first, &second);

        let base = scan(&source, 0);
        let shifted: Vec<_> = base.spans.iter().map(|s| (s.start + offset, s.end + offset)).collect();
        let actual: Vec<_> = first.spans.iter().map(|s| (s.start, s.end)).collect();
        prop_assert_eq!(shifted, actual);
    }

    #[test]
    fn prop_spans_stay_inside_leaf(source in "\\PC{0,60}") {
        let result = scan(&source, 0);
        for span in &result.spans {
            prop_assert!(span.start <= span.end && span.end <= source.len());
            prop_assert!(source.is_char_boundary(span.start) && source.is_char_boundary(span.end));
        }
    }
}
