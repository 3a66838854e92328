//! Expression and variable scanner.
//!
//! Finds `${...}` expressions in a leaf and classifies their content into
//! string literals, operators and identifiers. Also flags legacy `$NAME`
//! references that lack braces.
//!
//! # Example
//!
//! ```
//! use maestro_lsp_core::{scan, SpanKind};
//!
//! let result = scan("${user.name}", 10);
//! assert_eq!(result.spans[0].kind, SpanKind::ExpressionBackground);
//! assert_eq!((result.spans[0].start, result.spans[0].end), (10, 22));
//! ```

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::leaves::leaves;
use crate::span::{Diagnostic, SpanKind, TextSpan};

/// `${` up to the first `}`; nesting is not part of the language
static EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{[^}]+\}").expect("expression pattern compiles"));

/// Dotted property chains count as one identifier
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*\b")
        .expect("identifier pattern compiles")
});

static BAD_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[A-Za-z0-9_]+").expect("bad variable pattern compiles"));

/// Two-character operators come first so `==` never reads as `=` `=`
/// and `>=` never reads as `>`.
const OPERATORS: [&str; 12] = [
    "==", "!=", "<=", ">=", "&&", "||", "+", "-", "*", "/", "<", ">",
];

/// Spans and diagnostics found in one piece of text
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub spans: Vec<TextSpan>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && self.diagnostics.is_empty()
    }

    pub fn spans_of(&self, kind: SpanKind) -> impl Iterator<Item = &TextSpan> + '_ {
        self.spans.iter().filter(move |s| s.kind == kind)
    }

    fn extend(&mut self, other: ScanResult) {
        self.spans.extend(other.spans);
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Scan a single leaf whose first byte sits at `leaf_offset` in the document.
///
/// Returned offsets are absolute. Scanning never fails; text without
/// expressions simply yields an empty result.
pub fn scan(leaf_text: &str, leaf_offset: usize) -> ScanResult {
    let mut result = ScanResult::default();

    if leaf_text.len() < 2 {
        return result;
    }

    for expression in EXPRESSION.find_iter(leaf_text) {
        result.spans.push(TextSpan::new(
            leaf_offset + expression.start(),
            leaf_offset + expression.end(),
            SpanKind::ExpressionBackground,
        ));

        let content_start = expression.start() + 2;
        let content = &leaf_text[content_start..expression.end() - 1];
        classify_content(content, leaf_offset + content_start, &mut result.spans);
    }

    for variable in BAD_VARIABLE.find_iter(leaf_text) {
        // The tail of `${NAME}` would otherwise be reported twice
        if leaf_text[variable.end()..].starts_with('}') {
            continue;
        }

        let span = TextSpan::new(
            leaf_offset + variable.start(),
            leaf_offset + variable.end(),
            SpanKind::BadVariable,
        );
        let name = &variable.as_str()[1..];
        result.spans.push(span);
        result.diagnostics.push(Diagnostic::warning(
            span,
            format!("Use ${{{}}} instead of ${}", name, name),
        ));
    }

    result
}

/// Scan every leaf of a document
pub fn scan_document(text: &str) -> ScanResult {
    let mut result = ScanResult::default();
    for leaf in leaves(text) {
        result.extend(scan(leaf.text, leaf.offset));
    }
    result
}

/// Classify the text between `${` and `}`
fn classify_content(content: &str, base: usize, spans: &mut Vec<TextSpan>) {
    let strings = string_literals(content);
    let in_string = |offset: usize| strings.iter().any(|s| s.contains(&offset));

    for literal in &strings {
        spans.push(TextSpan::new(
            base + literal.start,
            base + literal.end,
            SpanKind::StringLiteral,
        ));
    }

    let bytes = content.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if let Some(literal) = strings.iter().find(|s| s.contains(&i)) {
            i = literal.end;
            continue;
        }
        match OPERATORS
            .iter()
            .find(|op| bytes[i..].starts_with(op.as_bytes()))
        {
            Some(op) => {
                spans.push(TextSpan::new(base + i, base + i + op.len(), SpanKind::Operator));
                i += op.len();
            }
            None => i += 1,
        }
    }

    for identifier in IDENTIFIER.find_iter(content) {
        if in_string(identifier.start()) {
            continue;
        }
        spans.push(TextSpan::new(
            base + identifier.start(),
            base + identifier.end(),
            SpanKind::Identifier,
        ));
    }
}

/// Quoted literals in `content`, left to right, first match wins.
///
/// A literal runs from a `"` or `'` to the next unescaped copy of the same
/// quote on the same line. A quote with no partner is plain text.
fn string_literals(content: &str) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let mut literals = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let quote = bytes[i];
        if quote == b'"' || quote == b'\'' {
            if let Some(close) = closing_quote(bytes, i + 1, quote) {
                literals.push(i..close + 1);
                i = close + 1;
                continue;
            }
        }
        i += 1;
    }

    literals
}

fn closing_quote(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while i < bytes.len() {
        match bytes[i] {
            b'\n' | b'\r' => return None,
            b'\\' => match bytes.get(i + 1) {
                None | Some(b'\n') | Some(b'\r') => return None,
                Some(_) => i += 2,
            },
            b if b == quote => return Some(i),
            _ => i += 1,
        }
    }
    None
}
