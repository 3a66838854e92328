use maestro_lsp_core::{flatten_spans, scan_document, utf16_len, SpanKind};
use tower_lsp::lsp_types::*;

use crate::document::Document;

/// Token types in legend order
const TOKEN_TYPES: [SemanticTokenType; 4] = [
    SemanticTokenType::MACRO,
    SemanticTokenType::STRING,
    SemanticTokenType::OPERATOR,
    SemanticTokenType::VARIABLE,
];

const DEPRECATED_BIT: u32 = 1;

pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_TYPES.to_vec(),
        token_modifiers: vec![SemanticTokenModifier::DEPRECATED],
    }
}

/// (token type index, modifier bitset)
fn encode_kind(kind: SpanKind) -> (u32, u32) {
    match kind {
        SpanKind::ExpressionBackground => (0, 0),
        SpanKind::StringLiteral => (1, 0),
        SpanKind::Operator => (2, 0),
        SpanKind::Identifier => (3, 0),
        SpanKind::BadVariable => (3, DEPRECATED_BIT),
    }
}

/// Highlight expressions of a flow document
pub fn get_semantic_tokens(doc: &Document) -> Vec<SemanticToken> {
    if !doc.is_flow() {
        return Vec::new();
    }

    let text = doc.text();
    let positions = doc.positions();
    let spans = flatten_spans(&scan_document(text).spans);

    let mut tokens = Vec::with_capacity(spans.len());
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for span in spans {
        let position = positions.position_at(span.start);
        let length = utf16_len(span.text(text));
        if length == 0 {
            continue;
        }

        let delta_line = position.line - prev_line;
        let delta_start = if delta_line == 0 {
            position.character - prev_start
        } else {
            position.character
        };
        let (token_type, token_modifiers_bitset) = encode_kind(span.kind);

        tokens.push(SemanticToken {
            delta_line,
            delta_start,
            length,
            token_type,
            token_modifiers_bitset,
        });

        prev_line = position.line;
        prev_start = position.character;
    }

    tokens
}
