//! Highlight dump for a flow: every span the scanner finds, in document order.

use maestro_lsp_core::{scan_document, LineIndex, SpanKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ScannedSpan {
    pub line: usize,
    pub column: usize,
    pub kind: SpanKind,
    /// Theme attribute editors style this span with
    pub attribute: &'static str,
    pub text: String,
}

pub fn scan_flow(source: &str) -> Vec<ScannedSpan> {
    let index = LineIndex::new(source);
    let mut spans = scan_document(source).spans;
    // Containers before their contents
    spans.sort_by_key(|s| (s.start, std::cmp::Reverse(s.end)));

    spans
        .into_iter()
        .map(|span| {
            let (line, column) = index.position(span.start);
            ScannedSpan {
                line: line as usize + 1,
                column: column as usize + 1,
                kind: span.kind,
                attribute: span.kind.attribute_key(),
                text: span.text(source).to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_in_document_order() {
        let spans = scan_flow("---\n- assertTrue: ${a > 1}\n");
        let summary: Vec<_> = spans
            .iter()
            .map(|s| (s.line, s.column, s.kind, s.text.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (2, 15, SpanKind::ExpressionBackground, "${a > 1}"),
                (2, 17, SpanKind::Identifier, "a"),
                (2, 19, SpanKind::Operator, ">"),
            ]
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let spans = scan_flow("x: ${'s'}");
        let json = serde_json::to_value(&spans).unwrap();
        assert_eq!(json[0]["kind"], "expression_background");
        assert_eq!(json[1]["kind"], "string_literal");
        assert_eq!(json[0]["attribute"], "MAESTRO_EXPRESSION");
    }
}
